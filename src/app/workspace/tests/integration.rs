//! End-to-end workspace scenarios

use std::path::PathBuf;

use tempfile::TempDir;

use crate::app::image::PixelRegion;
use crate::app::workspace::resolver::{DownloadOptions, Resolver, WorkspaceFromUrl};
use crate::errors::WorkspaceError;

use super::{png_bytes, SourceTree};

fn resolver() -> Resolver {
    Resolver::new().unwrap()
}

#[tokio::test]
async fn test_workspace_from_url_requires_source() {
    let result = resolver()
        .workspace_from_url(WorkspaceFromUrl::default())
        .await;
    match result {
        Err(WorkspaceError::MissingSource) => {
            assert!(WorkspaceError::MissingSource.to_string().contains("mets_url"));
        }
        other => panic!("expected MissingSource, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_workspace_from_url_with_basename_override() {
    let source = SourceTree::build();
    let resolver = resolver();
    let dst = TempDir::new().unwrap();

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            mets_basename: "foo.xml".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(dst.path().join("foo.xml").is_file());
    assert_eq!(workspace.mets_target(), dst.path().join("foo.xml"));
    // exactly the manifest was fetched
    assert_eq!(resolver.fetcher().fetch_count(), 1);
}

#[tokio::test]
async fn test_workspace_from_url_with_download_fetches_all_resources() {
    let source = SourceTree::build();
    let resolver = resolver();
    let dst = TempDir::new().unwrap();

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            download: true,
            ..Default::default()
        })
        .await
        .unwrap();

    // 1 manifest + 2 images + 4 OCR files = 7 fetches
    assert_eq!(resolver.fetcher().fetch_count(), 7);
    assert_eq!(workspace.mets().file_count(), 6);
    assert!(dst.path().join("OCR-D-IMG/INPUT_0017.png").is_file());
    assert!(dst.path().join("OCR-D-GT-PAGE/PAGE_0017_PAGE.xml").is_file());
}

#[tokio::test]
async fn test_existing_manifest_reused_without_any_fetch() {
    let source = SourceTree::build();
    let resolver = resolver();
    let dst = TempDir::new().unwrap();

    // A different manifest is already present at the destination
    let existing = crate::app::mets::Mets::empty_xml();
    std::fs::write(dst.path().join("mets.xml"), &existing).unwrap();

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            clobber_mets: false,
            ..Default::default()
        })
        .await
        .unwrap();

    // no fetch was made, the existing manifest stands as-is
    assert_eq!(resolver.fetcher().fetch_count(), 0);
    assert_eq!(workspace.mets().file_count(), 0);
    assert_eq!(
        std::fs::read_to_string(dst.path().join("mets.xml")).unwrap(),
        existing
    );
}

#[tokio::test]
async fn test_workspace_from_url_with_over_relative_dst_dir() {
    let source = SourceTree::build();
    let resolver = resolver();
    let target = TempDir::new().unwrap();

    // Climb far above the filesystem root, then descend into the target:
    // the excess parent segments must be absorbed, not escape or error.
    let tail = target.path().to_string_lossy();
    let bogus = format!("{}{}", "../".repeat(24), &tail[1..]);

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(PathBuf::from(bogus)),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(workspace.directory(), target.path());
    assert_eq!(workspace.mets_target(), target.path().join("mets.xml"));
}

#[tokio::test]
async fn test_workspace_from_nothing_defaults_to_temp_dir() {
    let workspace = resolver().workspace_from_nothing(None).await.unwrap();
    assert!(workspace.directory().is_absolute());
    assert!(workspace.mets_target().is_file());
    assert_eq!(workspace.mets().file_count(), 0);
}

#[tokio::test]
async fn test_workspace_from_nothing_creates_missing_directories() {
    let base = TempDir::new().unwrap();
    let nested = base.path().join("deep/nested/target");

    let workspace = resolver()
        .workspace_from_nothing(Some(nested.clone()))
        .await
        .unwrap();

    assert_eq!(workspace.directory(), nested);
    assert!(nested.join("mets.xml").is_file());
}

#[tokio::test]
async fn test_workspace_from_nothing_refuses_to_clobber() {
    let dir = TempDir::new().unwrap();
    let resolver = resolver();

    resolver
        .workspace_from_nothing(Some(dir.path().to_path_buf()))
        .await
        .unwrap();
    let result = resolver
        .workspace_from_nothing(Some(dir.path().to_path_buf()))
        .await;

    match result {
        Err(WorkspaceError::MetsExists { basename, directory }) => {
            assert_eq!(basename, "mets.xml");
            assert_eq!(directory, dir.path());
            let message = WorkspaceError::MetsExists { basename, directory }.to_string();
            assert!(message.contains("already exists"));
            assert!(message.contains("clobber not set"));
        }
        other => panic!("expected MetsExists, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_download_file_mirrors_group_layout_and_caches() {
    let source = SourceTree::build();
    let resolver = resolver();
    let dst = TempDir::new().unwrap();

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            ..Default::default()
        })
        .await
        .unwrap();

    let images = workspace.mets().files_in_group("OCR-D-IMG");
    let first = workspace.download_file(images[0]).await.unwrap();
    assert_eq!(first, "OCR-D-IMG/INPUT_0017.png");
    assert!(dst.path().join(&first).is_file());

    // second request for the same file is a no-op
    let again = workspace.download_file(images[0]).await.unwrap();
    assert_eq!(again, first);
    assert_eq!(resolver.fetcher().fetch_count(), 2); // manifest + one image
}

#[tokio::test]
async fn test_file_bytes_roundtrip() {
    let source = SourceTree::build();
    let dst = TempDir::new().unwrap();
    let workspace = resolver()
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            ..Default::default()
        })
        .await
        .unwrap();

    let images = workspace.mets().files_in_group("OCR-D-IMG");
    let bytes = workspace.file_bytes(images[0]).await.unwrap();
    assert_eq!(bytes, png_bytes(60, 40));
}

#[tokio::test]
async fn test_image_from_file_full_and_region() {
    let source = SourceTree::build();
    let dst = TempDir::new().unwrap();
    let workspace = resolver()
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            ..Default::default()
        })
        .await
        .unwrap();

    let images = workspace.mets().files_in_group("OCR-D-IMG");
    let full = workspace.image_from_file(images[0], None).await.unwrap();
    assert_eq!((full.width(), full.height()), (60, 40));

    let probe = PixelRegion::from_corners((0, 0), (1, 1));
    let cropped = workspace
        .image_from_file(images[0], Some(&probe))
        .await
        .unwrap();
    assert_eq!((cropped.width(), cropped.height()), (1, 1));
}

#[tokio::test]
async fn test_deprecated_locator_image_accessor_still_works() {
    let source = SourceTree::build();
    let dst = TempDir::new().unwrap();
    let workspace = resolver()
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            download: true,
            ..Default::default()
        })
        .await
        .unwrap();

    #[allow(deprecated)]
    let image = workspace
        .resolve_image("OCR-D-IMG/INPUT_0020.png", None)
        .await
        .unwrap();
    assert_eq!((image.width(), image.height()), (60, 40));
}

#[tokio::test]
async fn test_workspace_from_directory_opens_existing() {
    let source = SourceTree::build();
    let resolver = resolver();

    let workspace = resolver
        .workspace_from_directory(&source.data_dir(), "mets.xml")
        .await
        .unwrap();
    assert_eq!(workspace.mets().file_count(), 6);
    // opening is a pure read, not a fetch
    assert_eq!(resolver.fetcher().fetch_count(), 0);
}

#[tokio::test]
async fn test_download_to_directory_validates_arguments_in_order() {
    let resolver = resolver();

    let result = resolver
        .download_to_directory("", "", DownloadOptions::default())
        .await;
    match result {
        Err(WorkspaceError::InvalidArgument { name }) => assert_eq!(name, "url"),
        other => panic!("expected InvalidArgument, got {:?}", other.map(|_| ())),
    }

    let result = resolver
        .download_to_directory("", "foo", DownloadOptions::default())
        .await;
    match result {
        Err(WorkspaceError::InvalidArgument { name }) => assert_eq!(name, "directory"),
        other => panic!("expected InvalidArgument, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_download_to_directory_default_basename() {
    let source = SourceTree::build();
    let dst = TempDir::new().unwrap();

    let relative = resolver()
        .download_to_directory(
            dst.path().to_str().unwrap(),
            &source.mets_locator(),
            DownloadOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(relative, "mets.xml");
    assert!(dst.path().join(relative).is_file());
}

#[tokio::test]
async fn test_download_to_directory_basename_override() {
    let source = SourceTree::build();
    let dst = TempDir::new().unwrap();

    let relative = resolver()
        .download_to_directory(
            dst.path().to_str().unwrap(),
            &source.mets_locator(),
            DownloadOptions {
                basename: Some("foo".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(relative, "foo");
    assert!(dst.path().join(relative).is_file());
}

#[tokio::test]
async fn test_download_to_directory_subdir() {
    let source = SourceTree::build();
    let dst = TempDir::new().unwrap();

    let relative = resolver()
        .download_to_directory(
            dst.path().to_str().unwrap(),
            &source.mets_locator(),
            DownloadOptions {
                subdir: Some("baz".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(relative, "baz/mets.xml");
    assert!(dst.path().join(relative).is_file());
}

#[tokio::test]
async fn test_download_failure_keeps_already_cached_files() {
    let source = SourceTree::build();
    let resolver = resolver();
    let dst = TempDir::new().unwrap();

    let workspace = resolver
        .workspace_from_url(WorkspaceFromUrl {
            mets_url: Some(source.mets_locator()),
            dst_dir: Some(dst.path().to_path_buf()),
            ..Default::default()
        })
        .await
        .unwrap();

    let images = workspace.mets().files_in_group("OCR-D-IMG");
    workspace.download_file(images[0]).await.unwrap();

    // break the second image at the source
    std::fs::remove_file(source.data_dir().join("OCR-D-IMG/INPUT_0020.png")).unwrap();
    assert!(workspace.download_file(images[1]).await.is_err());

    // the first file is untouched by the failure
    assert!(dst.path().join("OCR-D-IMG/INPUT_0017.png").is_file());
}
