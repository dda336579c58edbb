//! QR code encoding functionality.
//!
//! This module provides the core logic for encoding data into QR codes, supporting the QR Code Model
//! 2 specification. It includes structs and functions for creating QR codes with customizable versions
//! (1–40), error correction levels, and mask patterns.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use tracing::{debug, trace};

use crate::error::{DataTooLong, QrError};
use crate::penalty::penalty_score;
use crate::reed_solomon::ReedSolomonGenerator;
use crate::segment::{get_bit, BitBuffer, QrSegment};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct supports QR Code Model 2, covering versions 1 to 40, all four error correction levels,
/// and four encoding modes (numeric, alphanumeric, byte, ECI). Instances are immutable after creation.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: Use [`QrCode::encode_segments`] or [`QrCode::encode_segments_advanced`].
/// - Low-level: Use [`QrCode::encode_segments_to_codewords`] and [`QrCode::encode_codewords`].
///
/// # Example
///
/// ```rust
/// use qrsvg::qrcode::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
///
/// assert_eq!(qr.size(), qr.version().value() as i32 * 4 + 17);
/// println!("Version: {}", qr.version().value());
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,

    /// The width and height of this QR Code, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    errorcorrectionlevel: QrCodeEcc,

    mask: Mask,

    /// The modules of this QR Code (false = light, true = dark), row-major.
    /// Immutable after construction. Accessed through get_module().
    modules: Vec<bool>,
}

impl QrCode {
    /// Encodes a text string into a QR code at the given error correction level.
    ///
    /// The segment mode is chosen automatically (numeric, alphanumeric or UTF-8 bytes), the
    /// smallest fitting version is used, the error correction level may be boosted, and the
    /// mask is chosen automatically.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::DataTooLong`] if the text does not fit in version 40.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self, QrError> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        QrCode::encode_segments(&segs, ecl)
    }

    /// Encodes arbitrary binary data into a QR code in byte mode.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::DataTooLong`] if the data does not fit in version 40.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self, QrError> {
        let segs: [QrSegment; 1] = [QrSegment::make_bytes(data)];
        QrCode::encode_segments(&segs, ecl)
    }

    /// Encodes the given segments with default parameters: any version, automatic mask,
    /// boosted error correction.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self, QrError> {
        QrCode::encode_segments_advanced(segs, ecl, Version::MIN, Version::MAX, None, true)
    }

    /// Encodes the given segments into a QR code.
    ///
    /// Automatically selects the smallest version within the given range that can hold the data.
    /// If `boostecl` is `true`, the error correction level may be increased if it doesn't increase
    /// the version. The `mask` can be `None` for automatic selection (slower) or a value from 0 to 7.
    ///
    /// # Arguments
    ///
    /// * `segs` - The segments to encode, in order.
    /// * `ecl` - Error correction level.
    /// * `minversion` - Minimum QR code version.
    /// * `maxversion` - Maximum QR code version.
    /// * `mask` - Optional mask pattern.
    /// * `boostecl` - Whether to boost error correction if possible.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `minversion > maxversion`, or
    /// [`QrError::DataTooLong`] if the data does not fit in `maxversion`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qrsvg::qrcode::{Mask, QrCode, QrCodeEcc, Version};
    /// use qrsvg::segment::QrSegment;
    ///
    /// let segs = QrSegment::make_segments("314159265358979323846");
    /// let qr = QrCode::encode_segments_advanced(
    ///     &segs,
    ///     QrCodeEcc::Medium,
    ///     Version::new(2),
    ///     Version::new(10),
    ///     Some(Mask::new(3)),
    ///     false,
    /// ).unwrap();
    ///
    /// assert_eq!(qr.version(), Version::new(2));
    /// assert_eq!(qr.error_correction_level(), QrCodeEcc::Medium);
    /// assert_eq!(qr.mask(), Mask::new(3));
    /// ```
    pub fn encode_segments_advanced(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, QrError> {
        let (datacodewords, ecl, version) =
            QrCode::encode_segments_to_codewords(segs, ecl, minversion, maxversion, boostecl)?;
        QrCode::encode_codewords(version, ecl, &datacodewords, mask)
    }

    /// Returns the data codewords for the given segments, together with the
    /// error correction level and version they were laid out for.
    ///
    /// The smallest possible QR Code version within the given range is chosen. If `boostecl`
    /// is `true`, the ECC level may be higher than the `ecl` argument if it can be done without
    /// increasing the version. The result can be passed to [`QrCode::encode_codewords`].
    pub fn encode_segments_to_codewords(
        segs: &[QrSegment],
        mut ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        boostecl: bool,
    ) -> Result<(Vec<u8>, QrCodeEcc, Version), QrError> {
        if minversion > maxversion {
            return Err(QrError::InvalidArgument("Minimum version exceeds maximum version"));
        }

        // Find the minimal version number to use
        let mut version: Version = minversion;
        let datausedbits: usize = loop {
            let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
            let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
            match dataused {
                Some(n) if n <= datacapacitybits => break n,
                _ if version >= maxversion => {
                    return Err(match dataused {
                        None => DataTooLong::SegmentTooLong,
                        Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
                    }
                    .into());
                }
                _ => version = Version::new(version.value() + 1),
            }
        };

        // Increase the error correction level while the data still fits
        for &newecl in &[QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            if boostecl && datausedbits <= QrCode::get_num_data_codewords(version, newecl) * 8 {
                ecl = newecl;
            }
        }
        debug!(
            version = version.value(),
            ecl = %ecl,
            data_bits = datausedbits,
            "selected version"
        );

        // Concatenate all segments to create the data bit string
        let mut bb = BitBuffer(Vec::new());
        for seg in segs {
            bb.append_bits(seg.mode().mode_bits(), 4);
            // get_total_bits() succeeded, so the count fits its field (at most 16 bits)
            bb.append_bits(
                seg.num_chars() as u32,
                seg.mode().num_char_count_bits(version),
            );
            bb.0.extend_from_slice(seg.data());
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Add terminator and pad up to a byte if applicable
        let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
        debug_assert!(bb.len() <= datacapacitybits);
        let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }
        debug_assert_eq!(bb.len(), datacapacitybits);
        Ok((bb.to_bytes(), ecl, version))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    /// A mid-level API is the `encode_segments_advanced()` function.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `datacodewords` does not hold exactly
    /// the number of data codewords of `ver` at `ecl`.
    pub fn encode_codewords(
        ver: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        msk: Option<Mask>,
    ) -> Result<Self, QrError> {
        if datacodewords.len() != QrCode::get_num_data_codewords(ver, ecl) {
            return Err(QrError::InvalidArgument(
                "Data codeword count does not match version and error correction level",
            ));
        }

        // Compute ECC, draw modules
        let mut canvas = Canvas::new(ver, ecl);
        canvas.draw_function_patterns();
        let allcodewords: Vec<u8> = QrCode::add_ecc_and_interleave(datacodewords, ver, ecl);
        canvas.draw_codewords(&allcodewords);

        // Do masking
        let msk: Mask = match msk {
            Some(m) => m,
            None => canvas.choose_mask(),
        };
        canvas.apply_mask(msk); // Apply the final choice of mask
        canvas.draw_format_bits(msk); // Overwrite old format bits
        Ok(canvas.finish(msk))
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules[(y * self.size + x) as usize]
    }

    /// Returns the mask-selection penalty of this symbol's final grid.
    ///
    /// When the mask was chosen automatically this is the smallest penalty among
    /// the eight candidates.
    pub fn penalty_score(&self) -> i32 {
        penalty_score(&self.modules, self.size)
    }

    /// Returns a new byte string representing the given data with the appropriate error correction
    /// codewords appended to it, based on this object's version and error correction level.
    fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
        assert_eq!(data.len(), QrCode::get_num_data_codewords(ver, ecl), "Illegal argument");

        // Calculate parameter numbers
        let numblocks: usize = QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen: usize = QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords: usize = QrCode::get_num_raw_data_modules(ver) / 8;
        let numshortblocks: usize = numblocks - rawcodewords % numblocks;
        let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

        // Split data into blocks, calculate ECC, and interleave
        // (not concatenate) the bytes into a single sequence
        let mut result = vec![0u8; rawcodewords];
        let rs = ReedSolomonGenerator::new(blockecclen);
        let mut dat: &[u8] = data;
        for i in 0..numblocks {
            let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
            let ecc: Vec<u8> = rs.compute_remainder(&dat[..datlen]);
            let mut k: usize = i;
            for (j, &b) in dat[..datlen].iter().enumerate() {
                if j == shortblockdatalen {
                    // Long blocks' last byte goes after all short blocks' columns
                    k -= numshortblocks;
                }
                result[k] = b;
                k += numblocks;
            }
            let mut k: usize = data.len() + i;
            for &b in &ecc {
                result[k] = b;
                k += numblocks;
            }
            dat = &dat[datlen..];
        }
        debug_assert_eq!(dat.len(), 0);
        result
    }

    /// Returns the number of data bits that can be stored in a QR Code of the given version number,
    /// after all function modules are excluded. This includes remainder bits, so it might not be a
    /// multiple of 8. The result is in the range [208, 29648].
    pub fn get_num_raw_data_modules(ver: Version) -> usize {
        let ver = usize::from(ver.value());
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        debug_assert!((208..=29648).contains(&result));
        result
    }

    /// Returns the number of 8-bit data (i.e. not error correction) codewords contained in any
    /// QR Code of the given version number and error correction level, with remainder bits discarded.
    pub fn get_num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
        QrCode::get_num_raw_data_modules(ver) / 8
            - QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
                * QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
    }

    fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
        table[ecl.ordinal()][usize::from(ver.value())] as usize
    }
}

/// A symbol under construction.
///
/// Tracks which modules belong to function patterns so that codeword placement and
/// masking leave them alone. The function map is dropped by [`Canvas::finish`].
struct Canvas {
    version: Version,
    size: i32,
    ecl: QrCodeEcc,
    modules: Vec<bool>,
    isfunction: Vec<bool>,
}

impl Canvas {
    fn new(version: Version, ecl: QrCodeEcc) -> Self {
        let size: i32 = version.size();
        Self {
            version,
            size,
            ecl,
            modules: vec![false; (size * size) as usize], // Initially all light
            isfunction: vec![false; (size * size) as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!((0..self.size).contains(&x) && (0..self.size).contains(&y));
        (y * self.size + x) as usize
    }

    fn is_function(&self, x: i32, y: i32) -> bool {
        self.isfunction[self.index(x, y)]
    }

    /// Sets the color of a module and marks it as a function module.
    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.isfunction[i] = true;
    }

    /// Draws timing, finder, alignment, format and version patterns.
    fn draw_function_patterns(&mut self) {
        // Draw horizontal and vertical timing patterns
        let size: i32 = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // Draw 3 finder patterns (all corners except bottom right; overwrites some timing modules)
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Draw numerous alignment patterns
        let alignpatpos: Vec<i32> = self.version.alignment_pattern_positions();
        let numalign: usize = alignpatpos.len();
        for i in 0..numalign {
            for j in 0..numalign {
                // Don't draw on the three finder corners
                if !(i == 0 && j == 0 || i == 0 && j == numalign - 1 || i == numalign - 1 && j == 0) {
                    self.draw_alignment_pattern(alignpatpos[i], alignpatpos[j]);
                }
            }
        }

        // Draw configuration data
        self.draw_format_bits(Mask::new(0)); // Dummy mask value; overwritten later
        self.draw_version();
    }

    /// Draws two copies of the format bits (with its own error correction code)
    /// based on the given mask and this object's error correction level field.
    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = format_bits(self.ecl, mask);

        // Draw first copy
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i as u8));
        }

        // Draw second copy
        let size: i32 = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, size - 8, true); // Always dark
    }

    /// Draws two copies of the version bits (with its own error correction code),
    /// based on this object's version field, iff 7 <= version <= 40.
    fn draw_version(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let bits: u32 = version_bits(self.version);

        // Draw two copies
        for i in 0u8..18 {
            let bit: bool = get_bit(bits, i);
            let a: i32 = self.size - 11 + i32::from(i % 3);
            let b: i32 = i32::from(i / 3);
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Draws a 9*9 finder pattern including the border separator,
    /// with the center module at (x, y). Modules can be out of bounds.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx: i32 = x + dx;
                let yy: i32 = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs()); // Chebyshev/infinity norm
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    /// Draws a 5*5 alignment pattern, with the center module
    /// at (x, y). All modules must be in bounds.
    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Draws the given sequence of 8-bit codewords (data and error correction)
    /// onto the entire data area of this QR Code, based on the given bits.
    fn draw_codewords(&mut self, data: &[u8]) {
        assert_eq!(
            data.len(),
            QrCode::get_num_raw_data_modules(self.version) / 8,
            "Illegal argument"
        );

        let mut i: usize = 0; // Bit index into the data
        for (x, y) in zigzag(self.size) {
            if !self.is_function(x, y) && i < data.len() * 8 {
                let idx = self.index(x, y);
                self.modules[idx] = get_bit(u32::from(data[i >> 3]), 7 - ((i & 7) as u8));
                i += 1;
            }
            // If this QR Code has any remainder bits (0 to 7), they were assigned as
            // 0/false/light by the constructor and are left unchanged by this method
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    /// XORs the codeword modules in this QR Code with the given mask pattern.
    /// The function modules are left unchanged. Calling this twice with the
    /// same mask restores the previous grid.
    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let i = self.index(x, y);
                if !self.isfunction[i] && mask.inverts(x, y) {
                    self.modules[i] = !self.modules[i];
                }
            }
        }
    }

    /// Tries all eight masks and returns the first one with the lowest penalty.
    /// Leaves the data area unmasked.
    fn choose_mask(&mut self) -> Mask {
        let mut best = Mask::new(0);
        let mut minpenalty = i32::MAX;
        for i in 0u8..8 {
            let msk = Mask::new(i);
            self.apply_mask(msk);
            self.draw_format_bits(msk);
            let penalty: i32 = penalty_score(&self.modules, self.size);
            trace!(mask = i, penalty, "scored mask");
            if penalty < minpenalty {
                best = msk;
                minpenalty = penalty;
            }
            self.apply_mask(msk); // Undoes the mask due to XOR
        }
        debug!(mask = best.value(), penalty = minpenalty, "selected mask");
        best
    }

    fn finish(self, mask: Mask) -> QrCode {
        QrCode {
            version: self.version,
            size: self.size,
            errorcorrectionlevel: self.ecl,
            mask,
            modules: self.modules,
        }
    }
}

/// Visits every module in codeword placement order: column pairs from right to left
/// (skipping the vertical timing column), alternating upward and downward.
fn zigzag(size: i32) -> impl Iterator<Item = (i32, i32)> {
    (0..(size - 1) / 2).flat_map(move |pair| {
        let mut right: i32 = size - 1 - pair * 2;
        if right <= 6 {
            right -= 1;
        }
        let upward: bool = ((right + 1) & 2) == 0;
        (0..size).flat_map(move |vert| {
            let y: i32 = if upward { size - 1 - vert } else { vert };
            [(right, y), (right - 1, y)]
        })
    })
}

/// Returns the 15-bit format word: (ECC format bits, mask) with its BCH code, masked.
fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    // errcorrlvl is uint2, mask is uint3
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    let bits = ((data << 10) | rem) ^ 0x5412; // uint15
    debug_assert_eq!(bits >> 15, 0);
    bits
}

/// Returns the 18-bit version word with its BCH code.
fn version_bits(ver: Version) -> u32 {
    let ver = u32::from(ver.value());
    let mut rem: u32 = ver; // version is uint6, in the range [7, 40]
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    let bits = (ver << 12) | rem; // uint18
    debug_assert_eq!(bits >> 18, 0);
    bits
}

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    // Version: (note that index 0 is for padding, and is set to an illegal value)
    //0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    // Version: (note that index 0 is for padding, and is set to an illegal value)
    //0, 1, 2, 3, 4, 5, 6, 7, 8, 9,10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
///
/// Parses from the names `low`, `medium`, `quartile` and `high` (any case). The default
/// is `Medium`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Returns an unsigned 2-bit integer (in the range 0 to 3) used to index the ECC tables.
    pub(crate) fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value written into the format information (in the range 0 to 3).
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

impl fmt::Display for QrCodeEcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QrCodeEcc::Low => "low",
            QrCodeEcc::Medium => "medium",
            QrCodeEcc::Quartile => "quartile",
            QrCodeEcc::High => "high",
        })
    }
}

impl FromStr for QrCodeEcc {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(QrCodeEcc::Low),
            "medium" => Ok(QrCodeEcc::Medium),
            "quartile" => Ok(QrCodeEcc::Quartile),
            "high" => Ok(QrCodeEcc::High),
            _ => Err(QrError::InvalidArgument("Unknown error correction level")),
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40]. Use `Version::try_from`
    /// for untrusted input.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the side length of a symbol of this version, in modules.
    pub const fn size(self) -> i32 {
        self.0 as i32 * 4 + 17
    }

    /// Returns an ascending list of positions of alignment patterns for this version number.
    /// Each position is in the range [0,177), and are used on both the x and y axes.
    /// This could be implemented as lookup table of 40 variable-length lists of integers.
    pub fn alignment_pattern_positions(self) -> Vec<i32> {
        let ver = i32::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let numalign: i32 = ver / 7 + 2;
        let step: i32 = if ver == 32 {
            26
        } else {
            (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1)
            .map(|i| self.size() - 7 - i * step)
            .collect();
        result.push(6);
        result.reverse();
        result
    }
}

impl TryFrom<u8> for Version {
    type Error = QrError;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&ver) {
            Ok(Version(ver))
        } else {
            Err(QrError::InvalidArgument("Version number out of range"))
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7]. Use `Mask::try_from`
    /// for untrusted input.
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns whether this mask flips the module at (x, y).
    pub fn inverts(self, x: i32, y: i32) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => x * y % 2 + x * y % 3 == 0,
            6 => (x * y % 2 + x * y % 3) % 2 == 0,
            7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = QrError;

    fn try_from(mask: u8) -> Result<Self, Self::Error> {
        if mask <= 7 {
            Ok(Mask(mask))
        } else {
            Err(QrError::InvalidArgument("Mask value out of range"))
        }
    }
}

#[cfg(test)]
mod tests;
