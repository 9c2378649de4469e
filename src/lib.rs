//! METS Workspace Library
//!
//! A Rust library for resolving digitised-document workspaces from METS
//! manifests: download-once resource caching with atomic writes, safe
//! destination-path handling, page-image region extraction, and
//! normalized technical image metadata across raster codecs.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
