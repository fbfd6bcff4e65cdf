//! Shared helpers for HTTP integration tests.
//!
//! Builds an [`AppContext`] over an in-memory database and hand-assembles
//! multipart bodies for the upload endpoint.

#![allow(dead_code)]

use std::io::Cursor;

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imagepost::config::Config;
use imagepost::images::ImageStore;
use imagepost::server::{create_router, AppContext};
use imagepost_db::pool::init_memory_pool;

pub const BOUNDARY: &str = "imagepost-test-boundary";

/// Context plus router over a fresh in-memory store.
pub struct TestApp {
    pub ctx: AppContext,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let pool = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, ImageStore::new(pool));
        let router = create_router(ctx.clone());
        Self { ctx, router }
    }

    pub fn stored_count(&self) -> u64 {
        self.ctx.store.count().unwrap()
    }
}

/// One part of a multipart body.
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::post("/processImage")
        .header(header::HOST, "localhost:3000")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_to_string(body: Body) -> String {
    String::from_utf8(body_bytes(body).await).unwrap()
}

/// Extract the retrieve path (`/images/<id>`) from an ingest response body.
pub fn image_path_from_message(message: &str) -> String {
    let url = message
        .strip_prefix("Processed image saved successfully! View it at: ")
        .unwrap_or_else(|| panic!("unexpected message: {}", message));
    let start = url.find("/images/").expect("url has no /images/ path");
    url[start..].to_string()
}

/// A noisy test image encoded as `format`.
pub fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let noise = ((x * 7919 + y * 104_729) % 61) as u8;
        Rgb([(x % 256) as u8, (y % 256) as u8, noise.wrapping_mul(4)])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}
