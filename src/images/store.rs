//! Image store coordinating database access for processed images.
//!
//! Wraps the connection pool so handlers deal in filenames, bytes and IDs
//! instead of connections and rows.

use imagepost_common::{Error, ImageId, Result};
use imagepost_db::models::StoredImage;
use imagepost_db::pool::{get_conn, DbPool};
use imagepost_db::queries::images;

/// Persists processed images and retrieves them by ID.
///
/// Cheap to clone: the pool is reference counted. All methods block on
/// SQLite and are meant to run on the blocking thread pool.
#[derive(Clone)]
pub struct ImageStore {
    pool: DbPool,
}

impl ImageStore {
    /// Create a new `ImageStore` over an initialized pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new image and return its generated ID.
    ///
    /// # Arguments
    ///
    /// * `filename` - Stored filename, carrying the resolved extension
    /// * `data` - Processed image bytes
    pub fn save(&self, filename: &str, data: &[u8]) -> Result<ImageId> {
        let conn = get_conn(&self.pool)?;
        let id = images::insert_image(&conn, filename, data)?;
        tracing::debug!("Stored image {} as {} ({} bytes)", id, filename, data.len());
        Ok(id)
    }

    /// Fetch a previously saved image.
    ///
    /// An `id` that is not a valid identifier is reported the same way as a
    /// missing record: [`Error::NotFound`].
    pub fn fetch(&self, id: &str) -> Result<StoredImage> {
        let image_id = id
            .parse::<ImageId>()
            .map_err(|_| Error::not_found(id.to_string()))?;

        let conn = get_conn(&self.pool)?;
        images::get_image(&conn, image_id)?.ok_or_else(|| Error::not_found(id.to_string()))
    }

    /// Number of images currently stored.
    pub fn count(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        images::count_images(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagepost_db::pool::init_memory_pool;

    fn store() -> ImageStore {
        ImageStore::new(init_memory_pool().unwrap())
    }

    #[test]
    fn test_save_and_fetch() {
        let store = store();
        let data = b"\x89PNG\r\n\x1a\n rest of the file".to_vec();

        let id = store.save("cat.png", &data).unwrap();
        let image = store.fetch(&id.to_string()).unwrap();

        assert_eq!(image.id, id);
        assert_eq!(image.filename, "cat.png");
        assert_eq!(image.data, data);
    }

    #[test]
    fn test_fetch_is_idempotent() {
        let store = store();
        let id = store.save("a.jpeg", &[0xFF, 0xD8, 0xFF, 0x00]).unwrap();

        let first = store.fetch(&id.to_string()).unwrap();
        let second = store.fetch(&id.to_string()).unwrap();
        assert_eq!(first.data, second.data);
        assert_eq!(first.filename, second.filename);
    }

    #[test]
    fn test_fetch_unknown_id() {
        let store = store();
        let err = store.fetch(&ImageId::new().to_string()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_fetch_malformed_id() {
        let store = store();
        for id in ["", "123", "not-a-uuid", "507f1f77bcf86cd799439011"] {
            let err = store.fetch(id).unwrap_err();
            assert!(matches!(err, Error::NotFound(_)), "id {:?}", id);
        }
    }

    #[test]
    fn test_count() {
        let store = store();
        assert_eq!(store.count().unwrap(), 0);
        store.save("one.png", &[1]).unwrap();
        store.save("two.png", &[2]).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }
}
