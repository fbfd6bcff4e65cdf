//! Upload option parsing.
//!
//! Multipart text fields arrive as strings. Parsing is tolerant: a missing or
//! non-numeric value becomes "absent" instead of failing the request, so a bad
//! `width` degrades to "no resize" and a bad `quality` to "codec default".

use imagepost_common::OutputFormat;

/// Raw option fields collected from a multipart upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    pub width: Option<String>,
    pub height: Option<String>,
    pub quality: Option<String>,
    pub format: Option<String>,
}

impl RawOptions {
    /// Record a text field by name. Returns `false` for names that are not
    /// transform options.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "width" => &mut self.width,
            "height" => &mut self.height,
            "quality" => &mut self.quality,
            "format" => &mut self.format,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Parse into validated transform options.
    pub fn parse(&self) -> TransformOptions {
        TransformOptions::from_fields(
            self.width.as_deref(),
            self.height.as_deref(),
            self.quality.as_deref(),
            self.format.as_deref(),
        )
    }
}

/// Validated transform options. Every field is optional; `None` leaves that
/// aspect of the image unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Target width in pixels. Only applied together with `height`.
    pub width: Option<u32>,
    /// Target height in pixels. Only applied together with `width`.
    pub height: Option<u32>,
    /// Encoder quality. Kept as given; the transformer rejects values outside
    /// `1..=100` when the chosen encoder uses it.
    pub quality: Option<i64>,
    /// Lowercased format token, not yet checked against supported formats.
    pub format: Option<String>,
}

impl TransformOptions {
    /// Build options from raw field values.
    pub fn from_fields(
        width: Option<&str>,
        height: Option<&str>,
        quality: Option<&str>,
        format: Option<&str>,
    ) -> Self {
        Self {
            width: parse_dimension(width),
            height: parse_dimension(height),
            quality: quality.and_then(|q| q.trim().parse::<i64>().ok()),
            format: format
                .map(|f| f.trim().to_lowercase())
                .filter(|f| !f.is_empty()),
        }
    }

    /// Resize target, present only when both dimensions are.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }

    /// The requested format if the token names one we can encode.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(|f| f.parse().ok())
    }
}

fn parse_dimension(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}
