//! Reed-Solomon error correction over GF(2^8/0x11D), as used by QR codes.

/// Computes Reed-Solomon ECC codewords for blocks of data codewords.
///
/// The generator polynomial has degree `degree` and roots 2^0, 2^1, ..., 2^(degree-1).
/// Its coefficients are stored highest to lowest power, excluding the leading term,
/// which is always 1.
pub(crate) struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Builds the divisor polynomial for the given degree, which must be in [1, 255].
    pub fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");
        // Start with the monomial x^0
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;

        // Multiply the current product by (x - r^i) for i = 0, 1, ..., degree-1,
        // where r = 0x02 generates the field.
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Self { divisor }
    }

    /// Returns the remainder of `data` (as a polynomial, times x^degree) divided by the
    /// divisor. The result has one byte per degree of the divisor.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            let last = result.len() - 1;
            result[last] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
        result
    }

    /// Returns the product of the two given field elements modulo
    /// x^8 + x^4 + x^3 + x^2 + 1 (0x11D).
    pub fn multiply(x: u8, y: u8) -> u8 {
        // Russian peasant multiplication; the x^8 term is implicit in the u8 overflow
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}
