//! Rendering helpers: SVG, text and raster output for a finished [`QrCode`].
//!
//! Renderers only read [`QrCode::size`] and [`QrCode::get_module`]; a quiet-zone border
//! of `border` light modules is added on every side.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::error::RenderError;
use crate::qrcode::QrCode;

/// Output settings shared by the renderers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RenderOptions {
    /// Quiet zone width, in modules.
    pub border: i32,
    /// Pixels per module for raster output.
    pub scale: u32,
    /// Fill for dark modules, as a hex color.
    pub dark_color: String,
    /// Background fill, as a hex color.
    pub light_color: String,
    /// Value of the SVG `width`/`height` attributes; omitted when `None`.
    pub width: Option<u32>,
    /// SVG `alt` attribute.
    pub alt: Option<String>,
    /// SVG `aria-label` attribute.
    pub aria_label: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            border: 4,
            scale: 1,
            dark_color: "#000000".to_string(),
            light_color: "#FFFFFF".to_string(),
            width: None,
            alt: None,
            aria_label: None,
        }
    }
}

impl RenderOptions {
    pub fn border(mut self, border: i32) -> Self {
        self.border = border;
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn colors(mut self, dark: &str, light: &str) -> Self {
        self.dark_color = dark.to_string();
        self.light_color = light.to_string();
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn alt(mut self, alt: &str) -> Self {
        self.alt = Some(alt.to_string());
        self
    }

    pub fn aria_label(mut self, label: &str) -> Self {
        self.aria_label = Some(label.to_string());
        self
    }

    /// Checks the border, scale and both colors.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.border < 0 {
            return Err(RenderError::InvalidBorder(self.border));
        }
        if self.scale == 0 {
            return Err(RenderError::InvalidScale(self.scale));
        }
        self.palette().map(|_| ())
    }

    /// Returns the (dark, light) pixel colors.
    fn palette(&self) -> Result<(Rgba<u8>, Rgba<u8>), RenderError> {
        let parse = |color: &String| {
            parse_hex_color(color).ok_or_else(|| RenderError::InvalidColor(color.clone()))
        };
        Ok((parse(&self.dark_color)?, parse(&self.light_color)?))
    }
}

/// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`. Alpha defaults to opaque.
fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits: Vec<u8> = hex
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect();
    let channels: Vec<u8> = match digits.len() {
        3 | 4 => digits.iter().map(|&d| d * 17).collect(),
        6 | 8 => digits.chunks(2).map(|p| p[0] * 16 + p[1]).collect(),
        _ => return None,
    };
    let alpha = channels.get(3).copied().unwrap_or(255);
    Some(Rgba([channels[0], channels[1], channels[2], alpha]))
}

/// Side length in modules including the border on both sides.
fn bordered_size(qr: &QrCode, border: i32) -> Result<i32, RenderError> {
    border
        .checked_mul(2)
        .and_then(|b| b.checked_add(qr.size()))
        .ok_or(RenderError::InvalidBorder(border))
}

fn escape_attr(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Returns SVG path data with one unit square per dark module, offset by `border`.
pub fn svg_path(qr: &QrCode, border: i32) -> String {
    let border = i64::from(border);
    let mut parts: Vec<String> = Vec::new();
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                parts.push(format!(
                    "M{},{}h1v1h-1z",
                    i64::from(x) + border,
                    i64::from(y) + border
                ));
            }
        }
    }
    parts.join(" ")
}

/// Returns a string of SVG code for an image depicting the given QR Code.
/// The string always uses Unix newlines (\n), regardless of the platform.
///
/// # Example
///
/// ```rust
/// use qrsvg::qrcode::{QrCode, QrCodeEcc};
/// use qrsvg::render::{to_svg_string, RenderOptions};
///
/// let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
/// let svg = to_svg_string(&qr, &RenderOptions::default().border(2)).unwrap();
/// assert!(svg.contains("viewBox=\"0 0 25 25\""));
/// ```
pub fn to_svg_string(qr: &QrCode, options: &RenderOptions) -> Result<String, RenderError> {
    options.validate()?;
    let border = options.border;
    let dimension = bordered_size(qr, border)?;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\"";
    if let Some(width) = options.width {
        result += &format!(" width=\"{0}\" height=\"{0}\"", width);
    }
    if let Some(alt) = &options.alt {
        result += &format!(" alt=\"{}\"", escape_attr(alt));
    }
    if let Some(label) = &options.aria_label {
        result += &format!(" aria-label=\"{}\"", escape_attr(label));
    }
    result += &format!(" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n", dimension);
    result += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        options.light_color
    );
    result += &format!(
        "\t<path d=\"{}\" fill=\"{}\"/>\n",
        svg_path(qr, border),
        options.dark_color
    );
    result += "</svg>\n";
    Ok(result)
}

/// Renders the QR Code as text, two characters per module, one line per row.
pub fn to_text(qr: &QrCode, border: i32) -> Result<String, RenderError> {
    if border < 0 {
        return Err(RenderError::InvalidBorder(border));
    }
    let end = qr
        .size()
        .checked_add(border)
        .ok_or(RenderError::InvalidBorder(border))?;
    let mut result = String::new();
    for y in -border..end {
        for x in -border..end {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    Ok(result)
}

/// Converts a QR Code to an RGBA image buffer in the configured dark and light colors,
/// `scale` pixels per module, with the border included.
pub fn to_image_buffer(
    qr: &QrCode,
    options: &RenderOptions,
) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, RenderError> {
    options.validate()?;
    let (dark, light) = options.palette()?;
    let border = options.border;
    let scale = options.scale;
    let side = (bordered_size(qr, border)? as u32)
        .checked_mul(scale)
        .filter(|&s| {
            (s as usize)
                .checked_mul(s as usize)
                .and_then(|n| n.checked_mul(4))
                .is_some()
        })
        .ok_or(RenderError::InvalidScale(scale))?;
    let mut img = ImageBuffer::new(side, side);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / scale) as i32 - border;
        let qr_y = (y / scale) as i32 - border;
        *pixel = if qr.get_module(qr_x, qr_y) { dark } else { light };
    }

    Ok(img)
}

/// Renders the QR Code with [`to_image_buffer`] and saves it to `path`. The format
/// follows the file extension and must accept RGBA pixels (PNG does). Missing parent
/// directories are created.
pub fn save_image(qr: &QrCode, path: &Path, options: &RenderOptions) -> Result<(), RenderError> {
    let img = to_image_buffer(qr, options)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    img.save(path)?;
    Ok(())
}
