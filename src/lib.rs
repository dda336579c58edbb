//! # qrsvg
//!
//! A Rust library for encoding text or binary data into QR Code symbols.
//!
//! `qrsvg` implements the QR Code Model 2 encoding pipeline: segment construction, version
//! and error correction selection, Reed-Solomon error correction with block interleaving,
//! function-pattern drawing, data placement, and penalty-based mask selection. It supports
//! versions 1 to 40 and all four error correction levels. The finished symbol is a grid of
//! dark/light modules that the [`render`] helpers can turn into SVG, text or images.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric, byte, or ECI modes.
//! - Support four error correction levels: Low, Medium, Quartile, High.
//! - Automatic or fixed mask selection, optional error correction boosting.
//! - Render QR codes as SVG documents, SVG path data, text, or in-memory image buffers.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! ```rust
//! use qrsvg::{QrCode, QrCodeEcc};
//! use qrsvg::render::{to_svg_string, RenderOptions};
//!
//! let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Medium).unwrap();
//! for y in 0..qr.size() {
//!     for x in 0..qr.size() {
//!         let _dark: bool = qr.get_module(x, y);
//!     }
//! }
//! let svg = to_svg_string(&qr, &RenderOptions::default()).unwrap();
//! assert!(svg.contains("<path"));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Symbol encoding: version selection, error correction, drawing and masking.
//! - [`segment`]: Data segments and the bit buffer.
//! - [`config`]: The [`EncodeOptions`] builder.
//! - [`render`]: Utilities for rendering QR codes in various formats.
//! - [`error`]: Error types.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod penalty;
pub mod qrcode;
mod reed_solomon;
pub mod render;
pub mod segment;

pub use config::EncodeOptions;
pub use error::{DataTooLong, QrError, RenderError};
pub use penalty::MAX_PENALTY;
pub use qrcode::{Mask, QrCode, QrCodeEcc, Version};
pub use segment::{QrSegment, QrSegmentMode};
