//! SEPA export aggregation
//!
//! A batch run can produce several pain.001 files (one per creditor bank
//! day, one per funding pot). [`ExportResult`] groups them under a shared
//! correlation ID and turns them into a single download: the raw XML when
//! there is exactly one file, a ZIP archive otherwise. The archive is
//! assembled in memory, nothing is left behind on any exit path.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// One generated pain.001 export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SepaExport {
    /// Human-readable description, becomes the download filename stem
    pub description: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Path of the generated XML file; must be attached before the export
    /// may join an [`ExportResult`]
    pub xml_file: Option<PathBuf>,

    /// Correlation ID shared by all exports of one batch
    pub group_id: Option<Uuid>,
}

impl SepaExport {
    /// Create an export record without an attached file
    pub fn new(description: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            created_at,
            xml_file: None,
            group_id: None,
        }
    }

    /// Attach the generated XML file
    pub fn with_xml_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.xml_file = Some(path.into());
        self
    }

    /// Whether an XML file is attached
    pub fn has_xml_file(&self) -> bool {
        self.xml_file.is_some()
    }

    fn filename_stem(&self) -> String {
        format!(
            "{}_{}",
            self.description,
            self.created_at.format("%Y-%m-%d-%H%M%S")
        )
    }
}

/// Persistence boundary for export records.
///
/// `persist` is a write-side effect only; the caller commits.
pub trait ExportStore: Send + Sync {
    /// Hand one export record to durable storage
    fn persist(&self, export: &SepaExport) -> Result<()>;
}

/// In-memory export store
#[derive(Debug, Default)]
pub struct MemoryExportStore {
    exports: Mutex<Vec<SepaExport>>,
}

impl MemoryExportStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything persisted so far
    pub fn stored(&self) -> Vec<SepaExport> {
        self.exports.lock().clone()
    }
}

impl ExportStore for MemoryExportStore {
    fn persist(&self, export: &SepaExport) -> Result<()> {
        self.exports.lock().push(export.clone());
        Ok(())
    }
}

/// Transport-neutral download payload
#[derive(Debug, Clone)]
pub struct DownloadResponse {
    /// MIME type, `application/xml` or `application/zip`
    pub content_type: &'static str,

    /// Attachment filename
    pub filename: String,

    /// Response body
    pub body: Vec<u8>,
}

impl DownloadResponse {
    /// `Content-Disposition` header value for this payload
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// A batch of exports grouped under one correlation ID
#[derive(Debug, Clone)]
pub struct ExportResult {
    exports: Vec<SepaExport>,
    group_id: Uuid,
}

impl ExportResult {
    /// Group the exports, assigning a fresh correlation ID to every member.
    ///
    /// Rejects an empty list and any export without an attached XML file.
    pub fn build(mut exports: Vec<SepaExport>) -> Result<Self> {
        if exports.is_empty() {
            return Err(Error::InvalidArgument(
                "export result needs at least one export".to_string(),
            ));
        }
        for export in &exports {
            if !export.has_xml_file() {
                return Err(Error::InvalidArgument(format!(
                    "export '{}' has no XML file attached",
                    export.description
                )));
            }
        }

        let group_id = Uuid::new_v4();
        for export in &mut exports {
            export.group_id = Some(group_id);
        }

        tracing::debug!(%group_id, count = exports.len(), "grouped sepa exports");

        Ok(Self { exports, group_id })
    }

    /// Number of exports in the batch
    pub fn count(&self) -> usize {
        self.exports.len()
    }

    /// Correlation ID shared by the batch
    pub fn group_id(&self) -> Uuid {
        self.group_id
    }

    /// The grouped exports, in input order
    pub fn exports(&self) -> &[SepaExport] {
        &self.exports
    }

    /// Unique download filename per export, in input order.
    ///
    /// Filenames derive from description and creation timestamp; on
    /// collision a `_<n>` counter (from 2) goes before the extension.
    pub fn xml_files_by_name(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut used = HashSet::new();
        let mut files = Vec::with_capacity(self.exports.len());

        for export in &self.exports {
            let path = export.xml_file.clone().ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "export '{}' has no XML file attached",
                    export.description
                ))
            })?;

            let stem = export.filename_stem();
            let mut name = format!("{}.xml", stem);
            let mut n = 2;
            while used.contains(&name) {
                name = format!("{}_{}.xml", stem, n);
                n += 1;
            }
            used.insert(name.clone());
            files.push((name, path));
        }

        Ok(files)
    }

    /// Same mapping with file contents read into memory
    pub fn xml_strings(&self) -> Result<Vec<(String, String)>> {
        self.xml_files_by_name()?
            .into_iter()
            .map(|(name, path)| {
                let contents = std::fs::read_to_string(&path)?;
                Ok((name, contents))
            })
            .collect()
    }

    /// Download payload for the batch.
    ///
    /// A single export downloads as the raw XML unless `force_zip` is set;
    /// anything else becomes a ZIP archive of all files.
    pub fn download_response(&self, base_name: &str, force_zip: bool) -> Result<DownloadResponse> {
        if self.exports.len() == 1 && !force_zip {
            let files = self.xml_files_by_name()?;
            let body = std::fs::read(&files[0].1)?;
            return Ok(DownloadResponse {
                content_type: "application/xml",
                filename: format!("{}.xml", base_name),
                body,
            });
        }

        Ok(DownloadResponse {
            content_type: "application/zip",
            filename: format!("{}.zip", base_name),
            body: self.zip_archive()?,
        })
    }

    /// Hand every export to the persistence boundary; the caller commits
    pub fn persist_all(&self, store: &dyn ExportStore) -> Result<()> {
        for export in &self.exports {
            store.persist(export)?;
        }
        Ok(())
    }

    fn zip_archive(&self) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, path) in self.xml_files_by_name()? {
            writer
                .start_file(name, options)
                .map_err(|e| Error::Archive(e.to_string()))?;
            let contents = std::fs::read(&path)?;
            writer.write_all(&contents)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn timestamp(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn export_with_file(
        dir: &Path,
        description: &str,
        created_at: &str,
        contents: &str,
    ) -> SepaExport {
        let path = dir.join(format!("{}-{}.xml", description, contents.len()));
        std::fs::write(&path, contents).unwrap();
        SepaExport::new(description, timestamp(created_at)).with_xml_file(path)
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = ExportResult::build(vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_export_without_file() {
        let export = SepaExport::new("party", timestamp("2021-06-15T12:00:00Z"));
        let err = ExportResult::build(vec![export]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_assigns_one_group_id_to_all_members() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![
            export_with_file(dir.path(), "a", "2021-06-15T12:00:00Z", "<one/>"),
            export_with_file(dir.path(), "b", "2021-06-15T12:00:00Z", "<two/>"),
        ])
        .unwrap();

        assert_eq!(result.count(), 2);
        for export in result.exports() {
            assert_eq!(export.group_id, Some(result.group_id()));
        }
    }

    #[test]
    fn test_filename_collisions_get_counters() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![
            export_with_file(dir.path(), "party", "2021-06-15T12:00:00Z", "<one/>"),
            export_with_file(dir.path(), "party", "2021-06-15T12:00:00Z", "<second/>"),
            export_with_file(dir.path(), "party", "2021-06-15T12:00:00Z", "<number3/>"),
        ])
        .unwrap();

        let names: Vec<String> = result
            .xml_files_by_name()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "party_2021-06-15-120000.xml",
                "party_2021-06-15-120000_2.xml",
                "party_2021-06-15-120000_3.xml",
            ]
        );
    }

    #[test]
    fn test_xml_strings_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![export_with_file(
            dir.path(),
            "party",
            "2021-06-15T12:00:00Z",
            "<payload/>",
        )])
        .unwrap();

        let strings = result.xml_strings().unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].0, "party_2021-06-15-120000.xml");
        assert_eq!(strings[0].1, "<payload/>");
    }

    #[test]
    fn test_single_export_downloads_as_raw_xml() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![export_with_file(
            dir.path(),
            "party",
            "2021-06-15T12:00:00Z",
            "<payload/>",
        )])
        .unwrap();

        let response = result.download_response("transfers", false).unwrap();
        assert_eq!(response.content_type, "application/xml");
        assert_eq!(response.filename, "transfers.xml");
        assert_eq!(response.body, b"<payload/>");
        assert_eq!(
            response.content_disposition(),
            "attachment; filename=\"transfers.xml\""
        );
    }

    #[test]
    fn test_force_zip_bundles_a_single_export() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![export_with_file(
            dir.path(),
            "party",
            "2021-06-15T12:00:00Z",
            "<payload/>",
        )])
        .unwrap();

        let response = result.download_response("transfers", true).unwrap();
        assert_eq!(response.content_type, "application/zip");
        assert_eq!(response.filename, "transfers.zip");
        assert!(response.body.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_multiple_exports_download_as_zip_archive() {
        use std::io::Read;

        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![
            export_with_file(dir.path(), "a", "2021-06-15T12:00:00Z", "<one/>"),
            export_with_file(dir.path(), "b", "2021-06-15T13:30:00Z", "<two/>"),
        ])
        .unwrap();

        let response = result.download_response("transfers", false).unwrap();
        assert_eq!(response.content_type, "application/zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(response.body)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("a_2021-06-15-120000.xml")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "<one/>");

        contents.clear();
        archive
            .by_name("b_2021-06-15-133000.xml")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "<two/>");
    }

    #[test]
    fn test_persist_all_hands_over_every_export() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::build(vec![
            export_with_file(dir.path(), "a", "2021-06-15T12:00:00Z", "<one/>"),
            export_with_file(dir.path(), "b", "2021-06-15T12:00:00Z", "<two/>"),
        ])
        .unwrap();

        let store = MemoryExportStore::new();
        result.persist_all(&store).unwrap();

        let stored = store.stored();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|e| e.group_id == Some(result.group_id())));
    }
}
