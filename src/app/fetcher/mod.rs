//! Resource fetching for local paths and remote URLs
//!
//! The fetcher is the single primitive that turns a locator into bytes.
//! It keeps no caching policy of its own: every call performs exactly one
//! HTTP GET or one local read. Callers that need at-most-once semantics
//! layer them on top (see [`crate::app::cache`]).
//!
//! # Module Organization
//!
//! - [`config`] - HTTP client configuration and construction
//! - [`http`] - the single-shot GET primitive

pub mod config;
mod http;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use url::Url;

use crate::errors::FetchResult;

pub use config::FetcherConfig;

/// A fetched resource: raw bytes plus a declared content type, when one
/// was available (HTTP header or extension inference).
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Locator-to-bytes fetcher with a monotonic operation counter.
///
/// The counter makes at-most-once caching observable in tests without a
/// live server.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
    fetches: AtomicU64,
}

impl Fetcher {
    /// Create a fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be constructed.
    pub fn new(config: FetcherConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self {
            client,
            config,
            fetches: AtomicU64::new(0),
        })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> FetchResult<Self> {
        Self::new(FetcherConfig::default())
    }

    /// Number of fetch operations performed so far (remote and local).
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Resolve a locator to bytes.
    ///
    /// `http`/`https` locators perform one GET; everything else is read
    /// from the local filesystem (a `file://` prefix is stripped). The
    /// content type comes from the response header for remote resources
    /// and from the file extension for local ones.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure, non-success status,
    /// timeout, or unreadable local path. No retry is attempted.
    pub async fn fetch(&self, locator: &str) -> FetchResult<FetchedResource> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(url) = parse_remote(locator) {
            let timeout_secs = self.config.request_timeout.as_secs();
            let (bytes, content_type) = http::get_once(&self.client, &url, timeout_secs).await?;
            return Ok(FetchedResource {
                bytes,
                content_type,
            });
        }

        let path = locator.strip_prefix("file://").unwrap_or(locator);
        tracing::debug!("reading local resource {}", path);
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_for_extension(Path::new(path)).map(|m| m.to_string());
        Ok(FetchedResource {
            bytes,
            content_type,
        })
    }
}

/// Parse a locator as a remote URL, returning `None` for local paths.
fn parse_remote(locator: &str) -> Option<Url> {
    let url = Url::parse(locator).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Infer a content type from a file extension.
fn mime_for_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "xml" => Some("text/xml"),
        "tif" | "tiff" => Some("image/tiff"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "jp2" => Some("image/jp2"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}
