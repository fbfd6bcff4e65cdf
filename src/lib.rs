//! Imagepost - image upload, transform and hosting service
//!
//! This library crate exposes the service internals for integration testing.

pub mod config;
pub mod images;
pub mod server;
