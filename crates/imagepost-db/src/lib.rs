//! Imagepost-DB: Database schema, migrations, and query operations
//!
//! This crate persists processed images in SQLite using rusqlite with r2d2
//! connection pooling. Each processed upload is one row holding its filename
//! and raw bytes.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use imagepost_db::pool::{init_pool, get_conn};
//! use imagepost_db::queries::images;
//!
//! let pool = init_pool("/var/lib/imagepost/image-api.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let id = images::insert_image(&conn, "cat.png", b"\x89PNG...").unwrap();
//! let stored = images::get_image(&conn, id).unwrap().unwrap();
//! println!("Stored {} ({} bytes)", stored.filename, stored.data.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
