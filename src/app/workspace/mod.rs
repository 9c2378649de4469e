//! Workspace orchestration for METS-described documents
//!
//! A workspace is a local directory bound to one METS manifest. It is
//! the unit of resolution and caching: referenced files are downloaded
//! on demand through the resource cache, stored under
//! `<group>/<basename>` subpaths mirroring the manifest's grouping, and
//! page images can be decoded and cropped directly from it.
//!
//! # Module Organization
//!
//! - [`resolver`] - the [`Resolver`] entry facade that materializes
//!   workspaces from URLs, local paths, or nothing

pub mod resolver;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use image::DynamicImage;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::app::cache::{EnsureOptions, ResourceCache};
use crate::app::image::{decode, PixelRegion};
use crate::app::mets::{Mets, MetsFile};
use crate::errors::WorkspaceResult;

pub use resolver::{DownloadOptions, Resolver, WorkspaceFromUrl};

/// A materialized workspace directory bound to a parsed manifest.
///
/// The root directory always exists and is absolute by the time any file
/// operation runs. Deleting the directory is the caller's business; the
/// workspace never removes it.
#[derive(Debug)]
pub struct Workspace {
    directory: PathBuf,
    mets_basename: String,
    mets: Mets,
    /// Locator the manifest came from, minus its basename; relative file
    /// URLs in the manifest resolve against this
    baseurl: Option<String>,
    cache: Arc<ResourceCache>,
}

impl Workspace {
    pub(crate) fn new(
        directory: PathBuf,
        mets_basename: String,
        mets: Mets,
        baseurl: Option<String>,
        cache: Arc<ResourceCache>,
    ) -> Self {
        Self {
            directory,
            mets_basename,
            mets,
            baseurl,
            cache,
        }
    }

    /// Absolute root directory of the workspace.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Basename of the manifest inside the workspace.
    pub fn mets_basename(&self) -> &str {
        &self.mets_basename
    }

    /// Absolute path of the manifest inside the workspace.
    pub fn mets_target(&self) -> PathBuf {
        self.directory.join(&self.mets_basename)
    }

    /// The parsed manifest.
    pub fn mets(&self) -> &Mets {
        &self.mets
    }

    /// Ensure one referenced file exists locally and return the relative
    /// path it is stored at (`<group>/<basename>`).
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::Cache` when the underlying fetch or write
    /// fails; already-cached files never re-fetch.
    pub async fn download_file(&self, file: &MetsFile) -> WorkspaceResult<String> {
        let locator = self.resolve_locator(&file.url);
        let relative = self
            .cache
            .ensure(
                &locator,
                &self.directory,
                EnsureOptions {
                    basename: Some(file.basename().to_string()),
                    subdir: Some(file.group.clone()),
                    ..Default::default()
                },
            )
            .await?;
        debug!("file {} available at {}", file.id, relative);
        Ok(relative)
    }

    /// Ensure every referenced file exists locally, with bounded
    /// concurrency. The order among files is unspecified; a failure
    /// aborts outstanding downloads but leaves completed files in place.
    pub async fn download_all(&self, workers: usize) -> WorkspaceResult<Vec<String>> {
        let files = self.mets.all_files();
        info!(
            "downloading {} referenced files into {}",
            files.len(),
            self.directory.display()
        );
        stream::iter(files.iter().map(|file| self.download_file(file)))
            .buffer_unordered(workers.max(1))
            .try_collect()
            .await
    }

    /// Raw bytes of a referenced file, downloading it first if needed.
    pub async fn file_bytes(&self, file: &MetsFile) -> WorkspaceResult<Vec<u8>> {
        let relative = self.download_file(file).await?;
        Ok(fs::read(self.directory.join(relative)).await?)
    }

    /// Decode a referenced page image, optionally restricted to a pixel
    /// region of the full-resolution image.
    pub async fn image_from_file(
        &self,
        file: &MetsFile,
        region: Option<&PixelRegion>,
    ) -> WorkspaceResult<DynamicImage> {
        let bytes = self.file_bytes(file).await?;
        Ok(decode(&bytes, region)?)
    }

    /// Decode a page image addressed by a bare locator instead of a
    /// manifest entry.
    #[deprecated(note = "use image_from_file with a manifest file entry")]
    pub async fn resolve_image(
        &self,
        locator: &str,
        region: Option<&PixelRegion>,
    ) -> WorkspaceResult<DynamicImage> {
        warn!("resolve_image is deprecated, use image_from_file");
        self.image_from_locator(locator, region).await
    }

    async fn image_from_locator(
        &self,
        locator: &str,
        region: Option<&PixelRegion>,
    ) -> WorkspaceResult<DynamicImage> {
        let local = self.directory.join(locator);
        let bytes = if local.is_file() {
            fs::read(&local).await?
        } else {
            let resolved = self.resolve_locator(locator);
            let subdir = Path::new(locator)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().into_owned());
            let relative = self
                .cache
                .ensure(
                    &resolved,
                    &self.directory,
                    EnsureOptions {
                        subdir,
                        ..Default::default()
                    },
                )
                .await?;
            fs::read(self.directory.join(relative)).await?
        };
        Ok(decode(&bytes, region)?)
    }

    /// Resolve a possibly-relative manifest locator against the manifest
    /// origin.
    fn resolve_locator(&self, url: &str) -> String {
        let is_remote = url.starts_with("http://") || url.starts_with("https://");
        if is_remote || Path::new(url).is_absolute() {
            return url.to_string();
        }
        match &self.baseurl {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), url),
            None => url.to_string(),
        }
    }
}
