//! Image database queries.
//!
//! Images are write-once: this module only inserts and reads. A single
//! `INSERT` writes the whole row, so a reader either sees the complete record
//! or nothing.

use chrono::{DateTime, Utc};
use imagepost_common::{Error, ImageId, Result};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::models::StoredImage;

/// Parse an image from a database row.
///
/// Expects columns in order: id, filename, data, created_at.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<StoredImage> {
    let id: String = row.get(0)?;
    let id = id
        .parse::<ImageId>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let created_at: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(StoredImage {
        id,
        filename: row.get(1)?,
        data: row.get(2)?,
        created_at,
    })
}

/// Insert a new image record under a freshly generated ID.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `filename` - Stored filename, including the resolved extension
/// * `data` - Processed image bytes
///
/// # Returns
///
/// * `Ok(ImageId)` - The ID of the inserted image
/// * `Err(Error)` - If a database error occurs
pub fn insert_image(conn: &Connection, filename: &str, data: &[u8]) -> Result<ImageId> {
    let id = ImageId::new();

    conn.execute(
        "INSERT INTO images (id, filename, data, created_at)
         VALUES (:id, :filename, :data, :created_at)",
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":filename": filename,
            ":data": data,
            ":created_at": Utc::now().to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(id)
}

/// Get an image by ID.
///
/// # Returns
///
/// * `Ok(Some(StoredImage))` - The image if found
/// * `Ok(None)` - If the image does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<StoredImage>> {
    let result = conn.query_row(
        "SELECT id, filename, data, created_at FROM images WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Count stored images.
pub fn count_images(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get::<_, i64>(0))
        .map(|count| count as u64)
        .map_err(|e| Error::database(e.to_string()))
}
