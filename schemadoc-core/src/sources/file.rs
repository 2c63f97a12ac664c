//! File uploads.
//!
//! JSON files are full schema documents and go through validation. DDL
//! scripts (`.sql`, `.ddl`, `.txt`) are never parsed; they only get a
//! preview: a leading excerpt, the byte size and a count of `CREATE`
//! statements by object kind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::SchemaSource;
use crate::error::SchemaDocError;
use crate::models::SchemaDocument;
use crate::validation::validate_and_parse_document;
use crate::Result;

/// Characters kept in an upload preview excerpt
pub const PREVIEW_CHARS: usize = 1000;

/// How an uploaded file is treated, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// A schema document in JSON form
    Document,
    /// A DDL script or plain text export
    Script,
}

impl UploadKind {
    /// Classifies a path by extension (case-insensitive).
    ///
    /// # Errors
    /// Returns a configuration error for unsupported extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Document),
            "sql" | "ddl" | "txt" => Ok(Self::Script),
            _ => Err(SchemaDocError::configuration(format!(
                "Unsupported upload '{}': expected .json, .sql, .ddl or .txt",
                path.display()
            ))),
        }
    }
}

/// Preview of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPreview {
    pub file_name: String,
    pub size_bytes: usize,
    /// First [`PREVIEW_CHARS`] characters, with "..." appended when cut
    pub excerpt: String,
    pub truncated: bool,
    /// `CREATE` statement counts keyed by upper-cased object kind
    pub statement_counts: BTreeMap<String, usize>,
}

fn create_statement_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    if let Some(pattern) = PATTERN.get() {
        return Ok(pattern);
    }

    let compiled = Regex::new(
        r"(?im)^\s*CREATE\s+(?:OR\s+REPLACE\s+)?(?:(?:UNIQUE|CLUSTERED|NONCLUSTERED|GLOBAL|TEMPORARY|TEMP|MATERIALIZED)\s+)*(TABLE|VIEW|INDEX|FUNCTION|PROCEDURE|TRIGGER|SEQUENCE|SCHEMA|TYPE)\b",
    )
    .map_err(|e| SchemaDocError::configuration(format!("Invalid statement pattern: {}", e)))?;

    Ok(PATTERN.get_or_init(|| compiled))
}

impl UploadPreview {
    /// Builds a preview from file contents.
    ///
    /// # Errors
    /// Only fails if the statement pattern cannot be compiled.
    pub fn from_content(file_name: impl Into<String>, content: &str) -> Result<Self> {
        let truncated = content.chars().count() > PREVIEW_CHARS;
        let excerpt = if truncated {
            let mut excerpt: String = content.chars().take(PREVIEW_CHARS).collect();
            excerpt.push_str("...");
            excerpt
        } else {
            content.to_string()
        };

        let mut statement_counts = BTreeMap::new();
        for captures in create_statement_pattern()?.captures_iter(content) {
            if let Some(kind) = captures.get(1) {
                *statement_counts
                    .entry(kind.as_str().to_ascii_uppercase())
                    .or_insert(0) += 1;
            }
        }

        Ok(Self {
            file_name: file_name.into(),
            size_bytes: content.len(),
            excerpt,
            truncated,
            statement_counts,
        })
    }

    /// Total number of `CREATE` statements found
    pub fn statement_total(&self) -> usize {
        self.statement_counts.values().sum()
    }
}

/// A schema file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    async fn read_text(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            SchemaDocError::io(format!("Failed to read {}", self.path.display()), e)
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Previews the file without interpreting it.
    ///
    /// # Errors
    /// Returns error for unsupported extensions or unreadable files.
    pub async fn preview(&self) -> Result<UploadPreview> {
        UploadKind::from_path(&self.path)?;
        let content = self.read_text().await?;
        let preview = UploadPreview::from_content(self.file_name(), &content)?;

        tracing::info!(
            "Previewed {} ({} bytes, {} CREATE statements)",
            preview.file_name,
            preview.size_bytes,
            preview.statement_total()
        );

        Ok(preview)
    }
}

#[async_trait]
impl SchemaSource for FileSource {
    fn describe(&self) -> String {
        format!("Schema file {}", self.path.display())
    }

    async fn load(&self) -> Result<SchemaDocument> {
        match UploadKind::from_path(&self.path)? {
            UploadKind::Document => {
                let content = self.read_text().await?;
                let parsed = validate_and_parse_document(&content)?;
                tracing::info!(
                    "Loaded {} document from {} ({} tables, {} warnings)",
                    parsed.document.platform_name,
                    self.path.display(),
                    parsed.document.tables.len(),
                    parsed.warnings.len()
                );
                Ok(parsed.document)
            }
            UploadKind::Script => Err(SchemaDocError::configuration(format!(
                "Unsupported upload '{}': DDL scripts can be previewed but not documented",
                self.file_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DDL: &str = "CREATE TABLE customers (id INT);\n\
        create unique index idx_email ON customers(email);\n\
        CREATE OR REPLACE VIEW v AS SELECT 1;\n\
        CREATE TABLE orders (id INT);\n\
        -- CREATE TABLE commented (id INT);\n\
        CREATE NONCLUSTERED INDEX IX_Orders ON orders(id);\n";

    #[test]
    fn test_upload_kind_from_extension() {
        assert_eq!(
            UploadKind::from_path(Path::new("schema.JSON")).ok(),
            Some(UploadKind::Document)
        );
        assert_eq!(
            UploadKind::from_path(Path::new("schema.ddl")).ok(),
            Some(UploadKind::Script)
        );
        assert!(UploadKind::from_path(Path::new("schema.xml")).is_err());
        assert!(UploadKind::from_path(Path::new("schema")).is_err());
    }

    #[test]
    fn test_preview_counts_create_statements() {
        let preview = UploadPreview::from_content("schema.sql", DDL).expect("preview");
        assert_eq!(preview.statement_counts.get("TABLE"), Some(&2));
        assert_eq!(preview.statement_counts.get("INDEX"), Some(&2));
        assert_eq!(preview.statement_counts.get("VIEW"), Some(&1));
        assert_eq!(preview.statement_total(), 5);
        assert!(!preview.truncated);
        assert_eq!(preview.excerpt, DDL);
        assert_eq!(preview.size_bytes, DDL.len());
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let content = "x".repeat(PREVIEW_CHARS + 1);
        let preview = UploadPreview::from_content("big.txt", &content).expect("preview");
        assert!(preview.truncated);
        assert_eq!(preview.excerpt.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.excerpt.ends_with("..."));
    }

    #[test]
    fn test_preview_exact_limit_not_truncated() {
        let content = "é".repeat(PREVIEW_CHARS);
        let preview = UploadPreview::from_content("exact.txt", &content).expect("preview");
        assert!(!preview.truncated);
        assert_eq!(preview.excerpt, content);
        assert_eq!(preview.size_bytes, PREVIEW_CHARS * 2);
    }

    #[tokio::test]
    async fn test_file_preview_reads_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".sql")
            .tempfile()
            .expect("temp file");
        file.write_all(DDL.as_bytes()).expect("write");

        let source = FileSource::new(file.path());
        let preview = source.preview().await.expect("preview");
        assert_eq!(preview.statement_total(), 5);
    }

    #[tokio::test]
    async fn test_loading_script_is_unsupported() {
        let mut file = tempfile::Builder::new()
            .suffix(".sql")
            .tempfile()
            .expect("temp file");
        file.write_all(DDL.as_bytes()).expect("write");

        let error = FileSource::new(file.path())
            .load()
            .await
            .expect_err("scripts are not documents");
        assert!(matches!(error, SchemaDocError::Configuration { .. }));
        assert!(error.to_string().contains("Unsupported upload"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = FileSource::new(dir.path().join("missing.json"))
            .load()
            .await
            .expect_err("missing file");
        assert!(matches!(error, SchemaDocError::Io { .. }));
    }
}
