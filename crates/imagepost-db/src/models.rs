//! Internal Rust models matching the database schema.

use chrono::{DateTime, Utc};
use imagepost_common::ImageId;
use serde::{Deserialize, Serialize};

/// A processed image as persisted in the `images` table.
///
/// Created once at ingest time and never modified afterwards. `filename`
/// carries the resolved extension, which drives the served content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredImage {
    pub id: ImageId,
    pub filename: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}
