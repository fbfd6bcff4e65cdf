//! Database query modules.
//!
//! - images: insert and lookup of processed images

pub mod images;
