//! Data segments and the bit buffer they are built with.
//!
//! A segment is a run of input data encoded under one mode (numeric, alphanumeric,
//! byte or ECI). The encoder concatenates segments, each preceded by its mode
//! indicator and character count, to form the data bit stream of a symbol.

use crate::error::QrError;
use crate::qrcode::Version;

/// The set of all legal characters in alphanumeric mode, in code order.
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// A segment of data in a QR code.
///
/// Supports numeric, alphanumeric, byte, or ECI modes. Segments are immutable and created using
/// factory functions like [`QrSegment::make_numeric`], [`QrSegment::make_alphanumeric`], or
/// [`QrSegment::make_bytes`].
///
/// # Example
///
/// ```rust
/// use qrsvg::segment::{QrSegment, QrSegmentMode};
///
/// let seg = QrSegment::make_alphanumeric("HELLO WORLD").unwrap();
/// assert_eq!(seg.mode(), QrSegmentMode::Alphanumeric);
/// assert_eq!(seg.num_chars(), 11);
/// assert_eq!(seg.data().len(), 61);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<bool>,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    ///
    /// Any byte sequence is acceptable; each byte becomes eight bits verbatim.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer(Vec::with_capacity(data.len() * 8));
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        QrSegment::new(QrSegmentMode::Byte, data.len(), bb.0)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// Digits are packed three at a time into 10 bits; a trailing group of one or two
    /// digits takes 4 or 7 bits.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `text` contains non-digit characters.
    pub fn make_numeric(text: &str) -> Result<Self, QrError> {
        if !QrSegment::is_numeric(text) {
            return Err(QrError::InvalidArgument("String contains non-numeric characters"));
        }
        let mut bb = BitBuffer(Vec::with_capacity(text.len() * 10 / 3 + 4));
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Ok(QrSegment::new(QrSegmentMode::Numeric, text.len(), bb.0))
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `text` contains any other character.
    pub fn make_alphanumeric(text: &str) -> Result<Self, QrError> {
        let mut bb = BitBuffer(Vec::with_capacity(text.len() * 11 / 2 + 6));
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let i: usize = ALPHANUMERIC_CHARSET.find(c).ok_or(QrError::InvalidArgument(
                "String contains unencodable characters in alphanumeric mode",
            ))?;
            // The charset is ASCII, so the byte index is the code value.
            accumdata = accumdata * 45 + i as u32;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        Ok(QrSegment::new(QrSegmentMode::Alphanumeric, text.len(), bb.0))
    }

    /// Returns zero or one segment for the given text, in the most compact mode
    /// that can hold all of it.
    ///
    /// Empty text yields no segments. Text that is neither all-numeric nor
    /// all-alphanumeric is encoded as UTF-8 bytes.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            Vec::new()
        } else if QrSegment::is_numeric(text) {
            vec![QrSegment::numeric_unchecked(text)]
        } else if QrSegment::is_alphanumeric(text) {
            vec![QrSegment::alphanumeric_unchecked(text)]
        } else {
            vec![QrSegment::make_bytes(text.as_bytes())]
        }
    }

    /// Creates a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `assignval` is 1,000,000 or more.
    pub fn make_eci(assignval: u32) -> Result<Self, QrError> {
        let mut bb = BitBuffer(Vec::with_capacity(24));
        if assignval < 1 << 7 {
            bb.append_bits(assignval, 8);
        } else if assignval < 1 << 14 {
            bb.append_bits(0b10, 2);
            bb.append_bits(assignval, 14);
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assignval, 21);
        } else {
            return Err(QrError::InvalidArgument("ECI assignment value out of range"));
        }
        Ok(QrSegment::new(QrSegmentMode::Eci, 0, bb.0))
    }

    /// Creates a segment from raw parts.
    ///
    /// The bit data is taken as-is; callers are responsible for it matching `mode`
    /// and `numchars`.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: Vec<bool>) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    /// Length of the original input in characters (or bytes), not in bits.
    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Calculates the number of bits needed to encode the given segments at the given version.
    ///
    /// Returns `None` if a segment has too many characters to fit its length field, or the
    /// total bits exceeds `usize::MAX`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    /// Tests whether the given string can be encoded as a segment in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the given string can be encoded as a segment in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }

    fn numeric_unchecked(text: &str) -> Self {
        match QrSegment::make_numeric(text) {
            Ok(seg) => seg,
            Err(_) => unreachable!("text was checked to be numeric"),
        }
    }

    fn alphanumeric_unchecked(text: &str) -> Self {
        match QrSegment::make_alphanumeric(text) {
            Ok(seg) => seg,
            Err(_) => unreachable!("text was checked to be alphanumeric"),
        }
    }
}

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// Returns the 4-bit mode indicator written before each segment.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Returns the bit width of the character count field for a segment in
    /// this mode at the given version (bands 1–9, 10–26, 27–40).
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[usize::from((ver.value() + 7) / 17)]
    }
}

/// An appendable sequence of bits (0s and 1s).
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BitBuffer(pub Vec<bool>);

impl BitBuffer {
    /// Appends the given number of low-order bits of the given value to this buffer,
    /// most significant bit first.
    ///
    /// # Panics
    ///
    /// Panics unless `len <= 31` and `val < 2^len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && val >> len == 0, "Value out of range");
        self.0.extend((0..len).rev().map(|i| get_bit(val, i)));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Packs the bits into bytes, big endian within each byte. A trailing partial
    /// byte is padded with zero bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = vec![0u8; (self.0.len() + 7) / 8];
        for (i, &bit) in self.0.iter().enumerate() {
            result[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        result
    }
}

pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}
