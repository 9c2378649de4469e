//! Workspace materialization facade
//!
//! The resolver turns a manifest locator (remote URL or local path) into
//! a ready-to-use [`Workspace`], creating directories, fetching the
//! manifest through the download-once cache, and optionally pre-fetching
//! every referenced file. It is the only component that decides *where*
//! things go; the cache decides *whether* anything is fetched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info};

use crate::app::cache::{EnsureOptions, ResourceCache};
use crate::app::fetcher::{Fetcher, FetcherConfig};
use crate::app::mets::Mets;
use crate::app::path;
use crate::constants::workspace::{DEFAULT_METS_BASENAME, DEFAULT_WORKER_COUNT};
use crate::errors::{FetchResult, WorkspaceError, WorkspaceResult};

use super::Workspace;

/// Options for [`Resolver::workspace_from_url`].
#[derive(Debug, Clone)]
pub struct WorkspaceFromUrl {
    /// Locator of the manifest; required
    pub mets_url: Option<String>,
    /// Destination directory; a fresh temporary directory when absent
    pub dst_dir: Option<PathBuf>,
    /// Basename to store the manifest under
    pub mets_basename: String,
    /// Re-fetch the manifest even if one is already present
    pub clobber_mets: bool,
    /// Immediately ensure every referenced file locally
    pub download: bool,
}

impl Default for WorkspaceFromUrl {
    fn default() -> Self {
        Self {
            mets_url: None,
            dst_dir: None,
            mets_basename: DEFAULT_METS_BASENAME.to_string(),
            clobber_mets: true,
            download: false,
        }
    }
}

/// Options for [`Resolver::download_to_directory`].
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Basename override; defaults to the locator's basename
    pub basename: Option<String>,
    /// Subdirectory prefix under the destination
    pub subdir: Option<String>,
}

/// Entry facade binding a fetcher and a resource cache.
///
/// Independent of any particular workspace; one resolver can materialize
/// any number of them, sharing the fetcher's connection pool.
#[derive(Debug)]
pub struct Resolver {
    fetcher: Arc<Fetcher>,
    cache: Arc<ResourceCache>,
}

impl Resolver {
    /// Create a resolver with default fetcher configuration.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be constructed.
    pub fn new() -> FetchResult<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a resolver with explicit fetcher configuration.
    pub fn with_config(config: FetcherConfig) -> FetchResult<Self> {
        let fetcher = Arc::new(Fetcher::new(config)?);
        let cache = Arc::new(ResourceCache::new(fetcher.clone()));
        Ok(Self { fetcher, cache })
    }

    /// The underlying fetcher (exposes fetch accounting).
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Materialize a workspace from a manifest locator.
    ///
    /// When a manifest already exists at the destination and
    /// `clobber_mets` is unset, it is reused verbatim and nothing is
    /// fetched at all. With `download` set, every referenced file is
    /// ensured locally after the manifest; the manifest fetch strictly
    /// precedes any referenced-file fetch.
    ///
    /// # Errors
    ///
    /// `WorkspaceError::MissingSource` without a locator; fetch, path and
    /// manifest errors propagate unchanged.
    pub async fn workspace_from_url(
        &self,
        options: WorkspaceFromUrl,
    ) -> WorkspaceResult<Workspace> {
        let mets_url = options
            .mets_url
            .filter(|url| !url.is_empty())
            .ok_or(WorkspaceError::MissingSource)?;

        let directory = self.prepare_directory(options.dst_dir).await?;
        let mets_target = directory.join(&options.mets_basename);

        if mets_target.exists() && !options.clobber_mets {
            debug!(
                "reusing existing manifest at {}, skipping fetch",
                mets_target.display()
            );
        } else {
            self.cache
                .ensure(
                    &mets_url,
                    &directory,
                    EnsureOptions {
                        basename: Some(options.mets_basename.clone()),
                        overwrite: options.clobber_mets,
                        ..Default::default()
                    },
                )
                .await?;
        }

        let xml = fs::read_to_string(&mets_target)
            .await
            .map_err(WorkspaceError::Io)?;
        let mets = Mets::parse(&xml).map_err(WorkspaceError::Manifest)?;
        info!(
            "workspace at {} with {} referenced files",
            directory.display(),
            mets.file_count()
        );

        let workspace = Workspace::new(
            directory,
            options.mets_basename,
            mets,
            locator_parent(&mets_url),
            self.cache.clone(),
        );
        if options.download {
            workspace.download_all(DEFAULT_WORKER_COUNT).await?;
        }
        Ok(workspace)
    }

    /// Create an empty workspace with a fresh manifest.
    ///
    /// The directory (and its parents) are created if absent; a missing
    /// `directory` argument means a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// `WorkspaceError::MetsExists` if a manifest is already present;
    /// this operation never overwrites.
    pub async fn workspace_from_nothing(
        &self,
        directory: Option<PathBuf>,
    ) -> WorkspaceResult<Workspace> {
        let directory = self.prepare_directory(directory).await?;
        let target = directory.join(DEFAULT_METS_BASENAME);
        if target.exists() {
            return Err(WorkspaceError::MetsExists {
                basename: DEFAULT_METS_BASENAME.to_string(),
                directory,
            });
        }

        let xml = Mets::empty_xml();
        fs::write(&target, &xml).await?;
        info!("created empty workspace at {}", directory.display());

        let mets = Mets::parse(&xml).map_err(WorkspaceError::Manifest)?;
        Ok(Workspace::new(
            directory,
            DEFAULT_METS_BASENAME.to_string(),
            mets,
            None,
            self.cache.clone(),
        ))
    }

    /// Open an already-materialized workspace directory.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error when no manifest exists at the expected
    /// basename.
    pub async fn workspace_from_directory(
        &self,
        directory: &Path,
        mets_basename: &str,
    ) -> WorkspaceResult<Workspace> {
        let directory = path::resolve_absolute(&std::env::current_dir()?, directory)?;
        let target = directory.join(mets_basename);
        let xml = fs::read_to_string(&target).await?;
        let mets = Mets::parse(&xml).map_err(WorkspaceError::Manifest)?;
        Ok(Workspace::new(
            directory,
            mets_basename.to_string(),
            mets,
            None,
            self.cache.clone(),
        ))
    }

    /// Download a single resource into a directory and return the
    /// relative path it was stored at.
    ///
    /// Both `url` and `directory` must be non-empty; the failure names
    /// the offending argument, checking `url` first.
    pub async fn download_to_directory(
        &self,
        directory: &str,
        url: &str,
        options: DownloadOptions,
    ) -> WorkspaceResult<String> {
        if url.is_empty() {
            return Err(WorkspaceError::InvalidArgument { name: "url" });
        }
        if directory.is_empty() {
            return Err(WorkspaceError::InvalidArgument { name: "directory" });
        }

        let dest_root =
            path::resolve_absolute(&std::env::current_dir()?, Path::new(directory))?;
        fs::create_dir_all(&dest_root).await?;
        Ok(self
            .cache
            .ensure(
                url,
                &dest_root,
                EnsureOptions {
                    basename: options.basename,
                    subdir: options.subdir,
                    ..Default::default()
                },
            )
            .await?)
    }

    /// Resolve the destination directory, creating a temp dir when none
    /// was given, and make sure it exists.
    async fn prepare_directory(&self, directory: Option<PathBuf>) -> WorkspaceResult<PathBuf> {
        let directory = match directory {
            Some(dir) => path::resolve_absolute(&std::env::current_dir()?, &dir)?,
            None => tempfile::tempdir()?.into_path(),
        };
        fs::create_dir_all(&directory).await?;
        Ok(directory)
    }
}

/// Everything before the basename of a locator, used to resolve relative
/// file references in the manifest.
fn locator_parent(locator: &str) -> Option<String> {
    locator
        .rsplit_once('/')
        .map(|(parent, _)| parent.to_string())
        .filter(|parent| !parent.is_empty())
}
