//! Core cache manager with atomic operations
//!
//! `ensure` is the only entry point: given a locator and a destination
//! root it returns the relative path the resource lives at, fetching at
//! most once. All fetch/skip decisions and the atomic write live here so
//! callers never have to reason about partially written files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::app::fetcher::Fetcher;
use crate::constants::files;
use crate::errors::{CacheError, CacheResult};

/// Options for a single `ensure` call.
#[derive(Debug, Clone, Default)]
pub struct EnsureOptions {
    /// Basename to store the resource under; defaults to the locator's
    /// own basename
    pub basename: Option<String>,
    /// Subdirectory prefix under the destination root
    pub subdir: Option<String>,
    /// Re-fetch even if the target already exists
    pub overwrite: bool,
}

/// Download-once cache over a [`Fetcher`].
///
/// On-disk state under a destination root may be shared by any number of
/// concurrent callers; per-target locks serialize `ensure` calls for the
/// same destination so at most one fetch occurs.
#[derive(Debug)]
pub struct ResourceCache {
    fetcher: Arc<Fetcher>,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ResourceCache {
    /// Create a cache delegating fetches to the given fetcher.
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self {
            fetcher,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Access the underlying fetcher (used for fetch accounting).
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Ensure a resource exists locally under `dest_root`, fetching it at
    /// most once, and return the relative path it is stored at.
    ///
    /// If the target already exists and `overwrite` is not set, no fetch
    /// happens at all. Otherwise the resource is fetched exactly once and
    /// written atomically (temp file + rename), creating intermediate
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Fetch` if the fetch fails (leaving no partial
    /// file behind), `CacheError::InvalidLocator` if no basename can be
    /// derived, and `CacheError::Io`/`CacheError::AtomicRename` on file
    /// system failures.
    pub async fn ensure(
        &self,
        locator: &str,
        dest_root: &Path,
        options: EnsureOptions,
    ) -> CacheResult<String> {
        let basename = match options.basename {
            Some(name) => name,
            None => locator_basename(locator)?,
        };
        let relative = match &options.subdir {
            Some(subdir) => format!("{}/{}", subdir.trim_matches('/'), basename),
            None => basename,
        };
        let target = dest_root.join(&relative);

        // One lock per target path: the second caller for the same
        // (locator, dest_root) blocks here and then observes the file the
        // first caller completed.
        let target_lock = self.lock_for(&target).await;
        let _guard = target_lock.lock().await;

        if target.exists() && !options.overwrite {
            debug!(
                "{} already present at {}, skipping fetch",
                locator,
                target.display()
            );
            return Ok(relative);
        }

        let resource = self.fetcher.fetch(locator).await?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(&target);
        if let Err(e) = fs::write(&temp_path, &resource.bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Io(e));
        }
        fs::rename(&temp_path, &target).await.map_err(|_| {
            CacheError::AtomicRename {
                temp_path: temp_path.clone(),
                final_path: target.clone(),
            }
        })?;

        info!("cached {} at {}", locator, relative);
        Ok(relative)
    }

    async fn lock_for(&self, target: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(target.to_path_buf())
            .or_insert_with(Default::default)
            .clone()
    }
}

/// Temp-file sibling of the final target for the atomic rename.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    target.with_file_name(name)
}

/// Derive the storage basename from a locator (URL or local path).
fn locator_basename(locator: &str) -> CacheResult<String> {
    let name = match Url::parse(locator) {
        Ok(url) if !url.cannot_be_a_base() => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(|s| s.to_string()),
        _ => Path::new(locator)
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string()),
    };
    name.filter(|n| !n.is_empty())
        .ok_or_else(|| CacheError::InvalidLocator {
            locator: locator.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn new_cache() -> Arc<ResourceCache> {
        let fetcher = Arc::new(Fetcher::with_defaults().unwrap());
        Arc::new(ResourceCache::new(fetcher))
    }

    fn source_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".xml").unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_locator_basename_from_url_and_path() {
        assert_eq!(
            locator_basename("https://example.org/data/mets.xml").unwrap(),
            "mets.xml"
        );
        assert_eq!(
            locator_basename("https://example.org/data/mets.xml?raw=1").unwrap(),
            "mets.xml"
        );
        assert_eq!(locator_basename("/var/data/page.tif").unwrap(), "page.tif");
        assert_eq!(locator_basename("data/page.tif").unwrap(), "page.tif");
        assert!(locator_basename("").is_err());
    }

    #[test]
    fn test_temp_path_keeps_extension_prefix() {
        assert!(temp_path_for(Path::new("/ws/mets.xml"))
            .to_string_lossy()
            .ends_with("mets.xml.tmp"));
        assert!(temp_path_for(Path::new("/ws/noext"))
            .to_string_lossy()
            .ends_with("noext.tmp"));
    }

    #[tokio::test]
    async fn test_ensure_fetches_once_and_is_idempotent() {
        let cache = new_cache();
        let source = source_file(b"<mets/>");
        let dest = TempDir::new().unwrap();
        let locator = source.path().to_str().unwrap().to_string();

        let first = cache
            .ensure(&locator, dest.path(), EnsureOptions::default())
            .await
            .unwrap();
        let second = cache
            .ensure(&locator, dest.path(), EnsureOptions::default())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.fetcher().fetch_count(), 1);
        let stored = std::fs::read(dest.path().join(&first)).unwrap();
        assert_eq!(stored, b"<mets/>");
    }

    #[tokio::test]
    async fn test_ensure_overwrite_refetches() {
        let cache = new_cache();
        let source = source_file(b"v1");
        let dest = TempDir::new().unwrap();
        let locator = source.path().to_str().unwrap().to_string();

        cache
            .ensure(&locator, dest.path(), EnsureOptions::default())
            .await
            .unwrap();
        cache
            .ensure(
                &locator,
                dest.path(),
                EnsureOptions {
                    overwrite: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(cache.fetcher().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_ensure_subdir_and_basename_override() {
        let cache = new_cache();
        let source = source_file(b"image bytes");
        let dest = TempDir::new().unwrap();
        let locator = source.path().to_str().unwrap().to_string();

        let relative = cache
            .ensure(
                &locator,
                dest.path(),
                EnsureOptions {
                    basename: Some("page_0001.tif".to_string()),
                    subdir: Some("OCR-D-IMG".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(relative, "OCR-D-IMG/page_0001.tif");
        assert!(dest.path().join("OCR-D-IMG/page_0001.tif").is_file());
    }

    #[tokio::test]
    async fn test_concurrent_ensure_single_fetch() {
        let cache = new_cache();
        let source = source_file(b"shared");
        let dest = TempDir::new().unwrap();
        let locator = source.path().to_str().unwrap().to_string();

        let (a, b) = tokio::join!(
            cache.ensure(&locator, dest.path(), EnsureOptions::default()),
            cache.ensure(&locator, dest.path(), EnsureOptions::default()),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(cache.fetcher().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_no_partial_file() {
        let cache = new_cache();
        let dest = TempDir::new().unwrap();

        let result = cache
            .ensure("/no/such/source.bin", dest.path(), EnsureOptions::default())
            .await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert!(std::fs::read_dir(dest.path()).unwrap().next().is_none());
    }
}
