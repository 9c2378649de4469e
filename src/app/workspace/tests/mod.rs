//! Integration tests for workspace materialization
//!
//! These tests exercise the full resolve-fetch-cache-decode pipeline
//! against a synthetic document source on the local filesystem, so fetch
//! accounting is observable without a live server.

mod integration;

use std::io::Cursor;
use std::path::PathBuf;

use image::RgbImage;
use tempfile::TempDir;

/// A synthetic "remote" document tree: one METS manifest referencing two
/// page images and four OCR ground-truth files by relative location.
pub(crate) struct SourceTree {
    root: TempDir,
}

pub(crate) const SOURCE_METS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
  <mets:fileSec>
    <mets:fileGrp USE="OCR-D-IMG">
      <mets:file ID="INPUT_0017" MIMETYPE="image/png">
        <mets:FLocat xlink:href="OCR-D-IMG/INPUT_0017.png"/>
      </mets:file>
      <mets:file ID="INPUT_0020" MIMETYPE="image/png">
        <mets:FLocat xlink:href="OCR-D-IMG/INPUT_0020.png"/>
      </mets:file>
    </mets:fileGrp>
    <mets:fileGrp USE="OCR-D-GT-ALTO">
      <mets:file ID="PAGE_0017_ALTO" MIMETYPE="text/xml">
        <mets:FLocat xlink:href="OCR-D-GT-ALTO/PAGE_0017_ALTO.xml"/>
      </mets:file>
      <mets:file ID="PAGE_0020_ALTO" MIMETYPE="text/xml">
        <mets:FLocat xlink:href="OCR-D-GT-ALTO/PAGE_0020_ALTO.xml"/>
      </mets:file>
    </mets:fileGrp>
    <mets:fileGrp USE="OCR-D-GT-PAGE">
      <mets:file ID="PAGE_0017_PAGE" MIMETYPE="text/xml">
        <mets:FLocat xlink:href="OCR-D-GT-PAGE/PAGE_0017_PAGE.xml"/>
      </mets:file>
      <mets:file ID="PAGE_0020_PAGE" MIMETYPE="text/xml">
        <mets:FLocat xlink:href="OCR-D-GT-PAGE/PAGE_0020_PAGE.xml"/>
      </mets:file>
    </mets:fileGrp>
  </mets:fileSec>
</mets:mets>
"#;

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 42])
    });
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

impl SourceTree {
    pub(crate) fn build() -> Self {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");

        for group in ["OCR-D-IMG", "OCR-D-GT-ALTO", "OCR-D-GT-PAGE"] {
            std::fs::create_dir_all(data.join(group)).unwrap();
        }
        std::fs::write(data.join("mets.xml"), SOURCE_METS).unwrap();
        std::fs::write(data.join("OCR-D-IMG/INPUT_0017.png"), png_bytes(60, 40)).unwrap();
        std::fs::write(data.join("OCR-D-IMG/INPUT_0020.png"), png_bytes(60, 40)).unwrap();
        for name in [
            "OCR-D-GT-ALTO/PAGE_0017_ALTO.xml",
            "OCR-D-GT-ALTO/PAGE_0020_ALTO.xml",
            "OCR-D-GT-PAGE/PAGE_0017_PAGE.xml",
            "OCR-D-GT-PAGE/PAGE_0020_PAGE.xml",
        ] {
            std::fs::write(data.join(name), "<alternatives/>").unwrap();
        }

        Self { root }
    }

    /// Locator of the manifest, as a caller would pass it.
    pub(crate) fn mets_locator(&self) -> String {
        self.data_dir().join("mets.xml").to_string_lossy().into_owned()
    }

    pub(crate) fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }
}
