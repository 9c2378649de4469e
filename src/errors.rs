//! Error types for the METS workspace resolver
//!
//! This module defines the error types for all components of the crate.
//! Errors are designed to be actionable: each names the offending argument
//! or condition explicitly so batch and CLI usage can diagnose failures
//! without digging through logs.

use std::path::PathBuf;
use thiserror::Error;

/// Path resolution errors
#[derive(Error, Debug)]
pub enum PathError {
    /// The base directory handed to the resolver was not absolute
    #[error("Base directory must be absolute, got: {path}")]
    BaseNotAbsolute { path: PathBuf },
}

/// Fetch and HTTP transport errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport failure
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Request exceeded the configured timeout
    #[error("Fetch timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// I/O error reading a local locator
    #[error("Failed to read local resource")]
    Io(#[from] std::io::Error),
}

/// Resource cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Locator has no usable basename to store the resource under
    #[error("Cannot derive a file name from locator: {locator}")]
    InvalidLocator { locator: String },

    /// Atomic rename from temp file to final destination failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicRename {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// I/O error during cache file operations
    #[error("Cache file I/O error")]
    Io(#[from] std::io::Error),
}

/// METS manifest reading errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest document is not well-formed XML
    #[error("Manifest is not well-formed XML")]
    Xml(#[from] roxmltree::Error),

    /// I/O error reading the manifest
    #[error("I/O error reading manifest")]
    Io(#[from] std::io::Error),
}

/// Workspace orchestration errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// No source URL/path given where one is required
    #[error("Must pass 'mets_url' to create a workspace from a URL")]
    MissingSource,

    /// Refusal to overwrite an existing manifest
    #[error("METS '{basename}' already exists in '{directory}' and clobber not set")]
    MetsExists { basename: String, directory: PathBuf },

    /// Bad caller input, names the offending argument
    #[error("'{name}' must be a non-empty string")]
    InvalidArgument { name: &'static str },

    /// Path resolution failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// Cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Manifest could not be read or parsed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Image decoding or cropping failed
    #[error(transparent)]
    Image(#[from] ImageError),

    /// I/O error during workspace operations
    #[error("Workspace I/O error")]
    Io(#[from] std::io::Error),
}

/// Image decoding, cropping and metadata errors
#[derive(Error, Debug)]
pub enum ImageError {
    /// Image bytes could not be decoded
    #[error("Failed to decode image")]
    Decode(#[from] image::ImageError),

    /// PNG metadata could not be read
    #[error("Failed to read PNG metadata")]
    Png(#[from] png::DecodingError),

    /// TIFF metadata could not be read
    #[error("Failed to read TIFF metadata")]
    Tiff(#[from] tiff::TiffError),

    /// A pixel region needs at least two corner points
    #[error("Pixel region needs at least 2 points, got {points}")]
    DegenerateRegion { points: usize },

    /// I/O error reading image bytes
    #[error("Image I/O error")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// I/O error reading configuration
    #[error("I/O error reading configuration")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Path resolution error
    #[error(transparent)]
    Path(#[from] PathError),

    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Workspace error
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Image error
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(FetchError::Http(_))
                | AppError::Fetch(FetchError::Timeout { .. })
                | AppError::Cache(CacheError::Fetch(FetchError::Http(_)))
                | AppError::Cache(CacheError::Fetch(FetchError::Timeout { .. }))
                | AppError::Workspace(WorkspaceError::Cache(CacheError::Fetch(
                    FetchError::Http(_)
                )))
                | AppError::Workspace(WorkspaceError::Cache(CacheError::Fetch(
                    FetchError::Timeout { .. }
                )))
        )
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Path(_) => "path",
            AppError::Fetch(_) => "fetch",
            AppError::Cache(_) => "cache",
            AppError::Manifest(_) => "manifest",
            AppError::Workspace(_) => "workspace",
            AppError::Image(_) => "image",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Path resolution result type alias
pub type PathResult<T> = std::result::Result<T, PathError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Workspace result type alias
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

/// Image result type alias
pub type ImageResult<T> = std::result::Result<T, ImageError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
