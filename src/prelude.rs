//! Prelude module for the METS Workspace Library
//!
//! Re-exports the most commonly used items, providing a convenient way
//! to import everything needed for typical usage with a single
//! `use mets_workspace::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use mets_workspace::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let resolver = Resolver::new()?;
//!     let workspace = resolver
//!         .workspace_from_url(WorkspaceFromUrl {
//!             mets_url: Some("https://example.org/doc/mets.xml".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("workspace at {}", workspace.directory().display());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components
pub use crate::app::{
    DownloadOptions, EnsureOptions, FetchedResource, Fetcher, FetcherConfig, ImageExif, Mets,
    MetsFile, PixelRegion, ResolutionUnit, Resolver, ResourceCache, Workspace, WorkspaceFromUrl,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_METS_BASENAME, DEFAULT_WORKER_COUNT, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _config = FetcherConfig::default();
        let _options = WorkspaceFromUrl::default();
        let _ensure = EnsureOptions::default();

        assert_eq!(DEFAULT_METS_BASENAME, "mets.xml");
        assert!(USER_AGENT.contains("mets-workspace"));
    }

    #[test]
    fn test_std_reexports() {
        let _path = PathBuf::from("/tmp/ws");
        let data = Arc::new(7);
        assert_eq!(*data, 7);
    }
}
