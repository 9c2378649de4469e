//! Read-only METS manifest adapter
//!
//! The manifest is treated as an opaque collaborator: this module answers
//! "which files are in group X" and "where does file Y live" without
//! validating the METS schema. Anything well-formed is accepted; entries
//! without a location are skipped.
//!
//! # Module Organization
//!
//! - [`types`] - the [`MetsFile`] entry type

pub mod types;

use roxmltree::Document;

use crate::errors::ManifestResult;

pub use types::MetsFile;

/// Query-only view over one METS document.
///
/// File entries are extracted eagerly in document order at parse time, so
/// queries never re-touch the XML.
#[derive(Debug, Clone)]
pub struct Mets {
    files: Vec<MetsFile>,
}

impl Mets {
    /// Parse a METS document.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Xml` if the document is not well-formed.
    pub fn parse(xml: &str) -> ManifestResult<Self> {
        let doc = Document::parse(xml)?;
        let mut files = Vec::new();

        for group_node in doc
            .descendants()
            .filter(|node| node.tag_name().name() == "fileGrp")
        {
            let group = group_node.attribute("USE").unwrap_or_default();
            for file_node in group_node
                .children()
                .filter(|node| node.tag_name().name() == "file")
            {
                let href = file_node
                    .children()
                    .find(|node| node.tag_name().name() == "FLocat")
                    .and_then(|locat| {
                        locat
                            .attributes()
                            .find(|attr| attr.name() == "href")
                            .map(|attr| attr.value().to_string())
                    });
                let Some(url) = href else {
                    tracing::debug!(
                        "skipping file entry without location in group {}",
                        group
                    );
                    continue;
                };
                files.push(MetsFile {
                    id: file_node.attribute("ID").unwrap_or_default().to_string(),
                    group: group.to_string(),
                    url,
                    mimetype: file_node
                        .attribute("MIMETYPE")
                        .unwrap_or_default()
                        .to_string(),
                });
            }
        }

        Ok(Self { files })
    }

    /// All file entries in document order.
    pub fn all_files(&self) -> &[MetsFile] {
        &self.files
    }

    /// File entries of one group, in document order.
    pub fn files_in_group(&self, group: &str) -> Vec<&MetsFile> {
        self.files.iter().filter(|f| f.group == group).collect()
    }

    /// Declared location of a file entry by its identifier.
    pub fn file_url(&self, id: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.url.as_str())
    }

    /// Group names in first-seen order.
    pub fn file_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for file in &self.files {
            if !groups.contains(&file.group.as_str()) {
                groups.push(&file.group);
            }
        }
        groups
    }

    /// Total number of file entries.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Render the manifest of a freshly created, empty workspace.
    pub fn empty_xml() -> String {
        let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
  <mets:metsHdr CREATEDATE="{created}"/>
  <mets:fileSec/>
  <mets:structMap TYPE="PHYSICAL">
    <mets:div TYPE="physSequence"/>
  </mets:structMap>
</mets:mets>
"#
        )
    }
}
