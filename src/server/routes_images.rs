//! Image ingest and retrieval routes.
//!
//! `POST /processImage` takes a multipart upload, transforms it and stores
//! the result. `GET /images/:id` serves a stored image back.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use imagepost_common::{Error, ImageId};

use super::error::AppError;
use super::AppContext;
use crate::config::ServerConfig;
use crate::images::{self, RawOptions};

/// Multipart field carrying the uploaded file.
const IMAGE_FIELD: &str = "image";

/// Filename used when the client sends none.
const DEFAULT_FILENAME: &str = "image";

const PROCESS_ERROR: &str = "Error processing image";
const FETCH_ERROR: &str = "Error fetching image";
const NOT_FOUND: &str = "Image not found";
const UPLOAD_TOO_LARGE: &str = "Upload too large";

/// Create image-related routes.
pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/processImage", post(process_image))
        .route("/images/:id", get(serve_image))
}

// ============================================================================
// Handlers
// ============================================================================

/// Ingest an upload: receive, parse options, transform, store, respond.
///
/// Responds with a plain-text message containing the URL of the stored image.
async fn process_image(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<String, AppError> {
    // Receive
    let (upload, raw) = read_upload(multipart).await?;
    let Some((filename, data)) = upload else {
        return Err(AppError::bad_request("No image file provided"));
    };

    // Parse
    let options = raw.parse();
    tracing::debug!(
        filename = %filename,
        bytes = data.len(),
        ?options,
        "Received image upload"
    );
    let format_requested = options.format.is_some();

    // Transform
    let transformed = tokio::task::spawn_blocking(move || images::transform(&data, &options))
        .await
        .map_err(|e| AppError::new(Error::internal(format!("Transform task failed: {}", e)), PROCESS_ERROR))?
        .map_err(|e| AppError::new(e, PROCESS_ERROR))?;

    // Store
    let (width, height) = (transformed.width, transformed.height);
    let stored_name = images::output_filename(&filename, format_requested, transformed.format);
    let store = ctx.store.clone();
    let name = stored_name.clone();
    let id = tokio::task::spawn_blocking(move || store.save(&name, &transformed.data))
        .await
        .map_err(|e| AppError::new(Error::internal(format!("Store task failed: {}", e)), PROCESS_ERROR))?
        .map_err(|e| AppError::new(e, PROCESS_ERROR))?;

    tracing::info!(
        "Saved processed image {} as {} ({}x{})",
        id,
        stored_name,
        width,
        height
    );

    // Respond
    let url = image_url(&ctx.config.server, &headers, id);
    Ok(format!(
        "Processed image saved successfully! View it at: {}",
        url
    ))
}

/// Serve a stored image by ID with `Content-Type: image/<ext>`.
async fn serve_image(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let store = ctx.store.clone();
    let image = tokio::task::spawn_blocking(move || store.fetch(&id))
        .await
        .map_err(|e| AppError::new(Error::internal(format!("Fetch task failed: {}", e)), FETCH_ERROR))?
        .map_err(|e| match e {
            Error::NotFound(_) => AppError::new(e, NOT_FOUND),
            other => AppError::new(other, FETCH_ERROR),
        })?;

    let content_type = images::content_type_for(&image.filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        image.data,
    )
        .into_response())
}

// ============================================================================
// Helpers
// ============================================================================

/// Collect the uploaded file and option fields from a multipart body.
///
/// Returns `None` for the upload when no `image` field was present. Fields
/// other than the image and the four options are skipped.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(Option<(String, Bytes)>, RawOptions), AppError> {
    let mut upload = None;
    let mut raw = RawOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart data", e))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let filename = field
                .file_name()
                .filter(|f| !f.is_empty())
                .unwrap_or(DEFAULT_FILENAME)
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read image data", e))?;
            upload = Some((filename, data));
        } else if matches!(name.as_str(), "width" | "height" | "quality" | "format") {
            let value = field
                .text()
                .await
                .map_err(|e| multipart_error(&format!("Failed to read field {}", name), e))?;
            raw.set(&name, value);
        }
    }

    Ok((upload, raw))
}

/// Keep the status axum assigns: 413 for a body over the limit, else 400.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let msg = format!("{}: {}", context, e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(Error::payload_too_large(msg), UPLOAD_TOO_LARGE)
    } else {
        AppError::bad_request(msg)
    }
}

/// Absolute URL of the retrieve endpoint for `id`.
///
/// Uses `server.public_url` when configured, otherwise the request's
/// `X-Forwarded-Proto` (default `http`) and `Host` headers.
fn image_url(config: &ServerConfig, headers: &HeaderMap, id: ImageId) -> String {
    if let Some(ref base) = config.public_url {
        return format!("{}/images/{}", base.trim_end_matches('/'), id);
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", config.port));

    format!("{}://{}/images/{}", scheme, host, id)
}
