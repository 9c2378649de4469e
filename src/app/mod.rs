//! Core application logic for the METS workspace resolver
//!
//! This module contains the main components: destination path
//! resolution, the locator fetcher, the download-once resource cache,
//! the read-only manifest adapter, workspace orchestration, and page
//! image cropping/metadata.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mets_workspace::app::workspace::{Resolver, WorkspaceFromUrl};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::new()?;
//! let workspace = resolver
//!     .workspace_from_url(WorkspaceFromUrl {
//!         mets_url: Some("https://example.org/doc/mets.xml".to_string()),
//!         download: true,
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! for file in workspace.mets().files_in_group("OCR-D-IMG") {
//!     println!("page image: {}", file.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod fetcher;
pub mod image;
pub mod mets;
pub mod path;
pub mod workspace;

// Re-export main public API
pub use self::cache::{EnsureOptions, ResourceCache};
pub use self::fetcher::{FetchedResource, Fetcher, FetcherConfig};
pub use self::image::{ImageExif, PixelRegion, ResolutionUnit};
pub use self::mets::{Mets, MetsFile};
pub use self::workspace::{DownloadOptions, Resolver, Workspace, WorkspaceFromUrl};
