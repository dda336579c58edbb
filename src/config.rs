//! Encoding options.
//!
//! [`EncodeOptions`] collects the knobs of [`QrCode::encode_segments_advanced`] behind a
//! builder with the usual defaults, so callers only spell out what they change.

use crate::error::QrError;
use crate::qrcode::{Mask, QrCode, QrCodeEcc, Version};
use crate::segment::QrSegment;

/// Parameters for encoding a symbol.
///
/// # Example
///
/// ```rust
/// use qrsvg::config::EncodeOptions;
/// use qrsvg::qrcode::{QrCodeEcc, Version};
///
/// let qr = EncodeOptions::new()
///     .ecl(QrCodeEcc::Low)
///     .version_range(Version::new(5), Version::new(10))
///     .boost_ecl(false)
///     .encode_text("https://example.com")
///     .unwrap();
///
/// assert_eq!(qr.version(), Version::new(5));
/// assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodeOptions {
    /// Minimum error correction level. May be raised when `boost_ecl` is set.
    pub ecl: QrCodeEcc,
    pub min_version: Version,
    pub max_version: Version,
    /// `None` picks the mask with the lowest penalty.
    pub mask: Option<Mask>,
    /// Raise the error correction level as far as the chosen version allows.
    pub boost_ecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ecl: QrCodeEcc::default(),
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ecl(mut self, ecl: QrCodeEcc) -> Self {
        self.ecl = ecl;
        self
    }

    pub fn version_range(mut self, min: Version, max: Version) -> Self {
        self.min_version = min;
        self.max_version = max;
        self
    }

    pub fn min_version(mut self, min: Version) -> Self {
        self.min_version = min;
        self
    }

    pub fn max_version(mut self, max: Version) -> Self {
        self.max_version = max;
        self
    }

    pub fn mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }

    /// Checks the version bounds.
    pub fn validate(&self) -> Result<(), QrError> {
        if self.min_version > self.max_version {
            return Err(QrError::InvalidArgument("Minimum version exceeds maximum version"));
        }
        Ok(())
    }

    /// Encodes text, choosing the segment mode automatically.
    pub fn encode_text(&self, text: &str) -> Result<QrCode, QrError> {
        self.encode_segments(&QrSegment::make_segments(text))
    }

    /// Encodes binary data in byte mode.
    pub fn encode_binary(&self, data: &[u8]) -> Result<QrCode, QrError> {
        self.encode_segments(&[QrSegment::make_bytes(data)])
    }

    pub fn encode_segments(&self, segs: &[QrSegment]) -> Result<QrCode, QrError> {
        self.validate()?;
        QrCode::encode_segments_advanced(
            segs,
            self.ecl,
            self.min_version,
            self.max_version,
            self.mask,
            self.boost_ecl,
        )
    }
}
