//! Core types for manifest queries

/// One file entry of the METS manifest.
///
/// Immutable once parsed; the `url` is either an absolute remote URL or a
/// path relative to the manifest's own location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetsFile {
    /// Manifest-wide unique identifier of the entry
    pub id: String,
    /// File group (`USE` partition) the entry belongs to
    pub group: String,
    /// Declared location of the file content
    pub url: String,
    /// Declared media type
    pub mimetype: String,
}

impl MetsFile {
    /// Basename of the declared location, used for the on-disk layout.
    pub fn basename(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_from_url_and_bare_name() {
        let file = MetsFile {
            id: "FILE_0001".into(),
            group: "OCR-D-IMG".into(),
            url: "https://example.org/data/FILE_0001.tif".into(),
            mimetype: "image/tiff".into(),
        };
        assert_eq!(file.basename(), "FILE_0001.tif");

        let bare = MetsFile {
            url: "page.png".into(),
            ..file
        };
        assert_eq!(bare.basename(), "page.png");
    }
}
