//! Imagepost-Common: Shared types, IDs, and errors.
//!
//! This crate provides functionality shared between the imagepost server and
//! its storage layer:
//!
//! - **Typed IDs**: [`ImageId`], a UUID wrapper generated when an image is stored
//! - **Core Types**: [`OutputFormat`], the set of encodable output formats
//! - **Error Handling**: the common [`Error`] type, its HTTP status table, and [`Result`]
//!
//! # Examples
//!
//! ```
//! use imagepost_common::{Error, ImageId, OutputFormat, Result};
//!
//! let id = ImageId::new();
//! assert_eq!(id.to_string().parse::<ImageId>().unwrap(), id);
//!
//! assert_eq!("jpg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
//!
//! fn lookup() -> Result<()> {
//!     Err(Error::not_found("image"))
//! }
//! assert_eq!(lookup().unwrap_err().http_status(), 404);
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
