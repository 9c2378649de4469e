//! Download-once resource caching with atomic writes
//!
//! This module guarantees that a resource identified by a locator exists
//! under a destination root exactly once, no matter how many callers ask
//! for it or how concurrently they do so.
//!
//! # Key Features
//!
//! - **At-most-one fetch**: a resource already present on disk is never
//!   fetched again unless the overwrite policy says otherwise
//! - **Atomic operations**: file integrity via the temp-file + rename
//!   pattern, so readers never observe a partially written resource
//! - **Per-target serialization**: concurrent `ensure` calls for the same
//!   destination share one fetch and all observe the completed file
//! - **Structured storage**: relative destinations may carry a
//!   subdirectory prefix mirroring the manifest's logical grouping
//!
//! # Module Organization
//!
//! - [`manager`] - the [`ResourceCache`] implementation

pub mod manager;

pub use manager::{EnsureOptions, ResourceCache};
