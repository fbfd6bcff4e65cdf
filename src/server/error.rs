//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, AppError>`. The status comes from
//! [`Error::http_status`]; the body is a short plain-text message chosen by
//! the handler. Error details only go to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use imagepost_common::Error;

/// An [`Error`] paired with the message shown to the client.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
    message: String,
}

impl AppError {
    pub fn new(inner: Error, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }

    /// A `400` whose message is the detail itself.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        Self::new(Error::bad_request(msg.clone()), msg)
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.inner.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "{}",
                self.message
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        (status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn not_found_produces_404() {
        let err = AppError::new(Error::not_found("abc"), "Image not found");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Image not found");
    }

    #[tokio::test]
    async fn server_error_hides_detail() {
        let err = AppError::new(
            Error::database("disk I/O error at page 42"),
            "Error processing image",
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert_eq!(body, "Error processing image");
        assert!(!body.contains("page 42"));
    }

    #[test]
    fn bad_request_produces_400() {
        let err = AppError::bad_request("No image file provided");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err.inner, Error::BadRequest(_)));
    }

    #[test]
    fn payload_too_large_produces_413() {
        let err = AppError::new(Error::payload_too_large("limit 1024"), "Upload too large");
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn codec_errors_are_server_errors() {
        for inner in [Error::decode("bad"), Error::encode("bad")] {
            let err = AppError::new(inner, "Error processing image");
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
