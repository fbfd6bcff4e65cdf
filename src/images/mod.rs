//! Image processing and storage module.
//!
//! Turns an upload into a stored image in three steps: [`options`] parses the
//! raw form fields, [`transform`] resizes and re-encodes the bytes, and
//! [`store`] persists the result through `imagepost_db`.

pub mod options;
pub mod store;
pub mod transform;

pub use options::{RawOptions, TransformOptions};
pub use store::ImageStore;
pub use transform::{transform, Transformed};

/// Filename to store a processed upload under.
///
/// When a format token was supplied the extension is replaced by the resolved
/// format's, so `photo.jpg` + `format=png` becomes `photo.png`. Only the last
/// extension is replaced. Without a format token the original name is kept.
pub fn output_filename(
    original: &str,
    format_requested: bool,
    resolved: imagepost_common::OutputFormat,
) -> String {
    if !format_requested {
        return original.to_string();
    }

    let base = match original.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => original,
    };
    format!("{}.{}", base, resolved.extension())
}

/// Content type for a stored filename: `image/<extension>`.
///
/// The extension is lowercased. Names without one are served as
/// `application/octet-stream`.
pub fn content_type_for(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("image/{}", ext.to_lowercase()),
        _ => "application/octet-stream".to_string(),
    }
}
