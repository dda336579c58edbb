//! Error types for encoding and rendering.

use thiserror::Error;

/// Main error type for QR encoding operations.
///
/// Internal invariant violations (bytes out of range, bit-count mismatches) are not
/// represented here: they indicate a bug in this crate and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// A call parameter was malformed (version bounds, mask value, characters outside
    /// a segment mode's alphabet, ECI value, codeword count).
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The payload does not fit in any allowed version.
    #[error(transparent)]
    DataTooLong(#[from] DataTooLong),
}

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maximum version if it was less than `Version::MAX`.
/// - Split the text data into better or optimal segments to reduce the number of bits required.
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataTooLong {
    /// A segment's character count does not fit its count field, even at the largest
    /// allowed version.
    #[error("Segment too long")]
    SegmentTooLong,

    /// Data length exceeds capacity: (bits needed, bits available).
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// Error type for the rendering helpers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A colour was not `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
    #[error("Invalid color: {0} (expected a hex color such as #FFFFFF)")]
    InvalidColor(String),

    /// Border widths must be non-negative.
    #[error("Invalid border: {0}")]
    InvalidBorder(i32),

    /// Pixel scale must be at least 1.
    #[error("Invalid scale: {0}")]
    InvalidScale(u32),

    /// Image encoding or file output failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
