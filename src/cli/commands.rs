//! CLI command handlers
//!
//! Each handler wires parsed arguments and configuration into the
//! library API and prints user-facing results to stdout.

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::app::image::ImageExif;
use crate::app::workspace::{Resolver, WorkspaceFromUrl};
use crate::config::AppConfig;
use crate::errors::Result;

use super::args::{CloneArgs, DownloadArgs, InitArgs, InspectArgs};
use super::progress::ProgressDisplay;

/// Handle the clone command
pub async fn handle_clone(args: CloneArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let resolver = Resolver::with_config(config.fetcher.clone())?;
    let mets_basename = args
        .mets_basename
        .unwrap_or_else(|| config.workspace.mets_basename.clone());

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(args.mets_url),
            dst_dir: args.directory,
            mets_basename,
            clobber_mets: !args.no_clobber,
            download: false,
        })
        .await?;

    if args.download {
        let files: Vec<_> = workspace.mets().all_files().to_vec();
        let progress = ProgressDisplay::new(files.len() as u64, quiet);
        for file in &files {
            let relative = workspace.download_file(file).await?;
            progress.inc(&relative);
        }
        progress.finish("all referenced files downloaded");
    }

    info!(
        "fetched {} resources",
        resolver.fetcher().fetch_count()
    );
    println!("{}", workspace.directory().display());
    Ok(())
}

/// Handle the init command
pub async fn handle_init(args: InitArgs, config: &AppConfig) -> Result<()> {
    let resolver = Resolver::with_config(config.fetcher.clone())?;
    let workspace = resolver.workspace_from_nothing(args.directory).await?;
    println!("{}", workspace.directory().display());
    Ok(())
}

/// Handle the download command
pub async fn handle_download(args: DownloadArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let resolver = Resolver::with_config(config.fetcher.clone())?;
    let workspace = resolver
        .workspace_from_directory(&args.directory, &config.workspace.mets_basename)
        .await?;

    let files: Vec<_> = match &args.group {
        Some(group) => workspace
            .mets()
            .files_in_group(group)
            .into_iter()
            .cloned()
            .collect(),
        None => workspace.mets().all_files().to_vec(),
    };

    let progress = ProgressDisplay::new(files.len() as u64, quiet);
    let workers = args.workers.unwrap_or(config.workspace.worker_count);
    info!("downloading {} files with {} workers", files.len(), workers);
    let mut downloads = stream::iter(files.iter().map(|file| workspace.download_file(file)))
        .buffer_unordered(workers.max(1));
    while let Some(result) = downloads.next().await {
        progress.inc(&result?);
    }
    progress.finish("done");
    println!(
        "{} files available under {}",
        files.len(),
        workspace.directory().display()
    );
    Ok(())
}

/// Handle the inspect command
pub async fn handle_inspect(args: InspectArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.image).await?;
    let exif = ImageExif::from_bytes(&bytes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&exif).map_err(|e| {
            crate::errors::AppError::generic(format!("JSON serialization failed: {e}"))
        })?);
    } else {
        println!("{}", exif.to_xml());
    }
    Ok(())
}
