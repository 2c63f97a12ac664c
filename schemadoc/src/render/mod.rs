//! Documentation renderers and the export dispatcher.
//!
//! Every renderer is a pure function of the document (plus the options
//! for PDF and a generation time). The `_at` variants take that time
//! explicitly so output is reproducible.

pub mod format;
pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;
mod view;

use chrono::{DateTime, Local};
use schemadoc_core::{DocumentationOptions, Result, SchemaDocError, SchemaDocument};
use serde::{Deserialize, Serialize};

pub use html::{render_html_fragment, render_html_fragment_at, render_standalone_html, render_standalone_html_at};
pub use json::{render_json_schema, render_json_schema_at};
pub use markdown::{render_markdown, render_markdown_at};
pub use pdf::render_pdf;

/// Output formats supported by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Markdown,
    Json,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Html,
        ExportFormat::Markdown,
        ExportFormat::Json,
        ExportFormat::Pdf,
    ];

    /// Suffix appended to the document's file stem
    pub fn file_suffix(self) -> &'static str {
        match self {
            ExportFormat::Html => "_documentation.html",
            ExportFormat::Markdown => "_documentation.md",
            ExportFormat::Json => "_schema.json",
            ExportFormat::Pdf => "_documentation.pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Json => "application/json",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Html => "HTML",
            ExportFormat::Markdown => "Markdown",
            ExportFormat::Json => "JSON",
            ExportFormat::Pdf => "PDF",
        }
    }

    /// File name for a document exported in this format
    pub fn file_name(self, doc: &SchemaDocument) -> String {
        format!("{}{}", doc.file_stem(), self.file_suffix())
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = SchemaDocError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(SchemaDocError::configuration(format!(
                "Unknown export format '{}': expected html, markdown, json or pdf",
                other
            ))),
        }
    }
}

/// A rendered export ready to be written or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Result of one format within [`export_all`]
#[derive(Debug)]
pub struct ExportOutcome {
    pub format: ExportFormat,
    pub result: Result<ExportArtifact>,
}

impl ExportOutcome {
    /// User-facing message for a failed export
    pub fn notice(&self) -> Option<String> {
        self.result
            .as_ref()
            .err()
            .map(|e| format!("{} export failed: {}", self.format, e))
    }
}

/// Renders one format.
///
/// # Errors
/// Returns `InvalidDocument` when no document is supplied, otherwise the
/// renderer's own error.
pub fn export(
    doc: Option<&SchemaDocument>,
    format: ExportFormat,
    options: &DocumentationOptions,
) -> Result<ExportArtifact> {
    export_at(doc, format, options, &Local::now())
}

pub fn export_at(
    doc: Option<&SchemaDocument>,
    format: ExportFormat,
    options: &DocumentationOptions,
    at: &DateTime<Local>,
) -> Result<ExportArtifact> {
    let doc = doc.ok_or_else(|| {
        SchemaDocError::invalid_document("no schema document loaded; select a platform or upload a file")
    })?;

    let bytes = match format {
        ExportFormat::Html => html::render_document_at(doc, at)?.into_bytes(),
        ExportFormat::Markdown => markdown::render_markdown_at(doc, at)?.into_bytes(),
        ExportFormat::Json => json::render_json_text_at(doc, at)?.into_bytes(),
        ExportFormat::Pdf => {
            pdf::render_pdf_with(pdf::default_backend().as_ref(), doc, options, at)?
        }
    };

    tracing::debug!("Rendered {} export ({} bytes)", format, bytes.len());

    Ok(ExportArtifact {
        format,
        file_name: format.file_name(doc),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Renders each format independently; one failure never stops the rest.
pub fn export_all(
    doc: Option<&SchemaDocument>,
    formats: &[ExportFormat],
    options: &DocumentationOptions,
) -> Vec<ExportOutcome> {
    let at = Local::now();
    formats
        .iter()
        .map(|&format| {
            let result = export_at(doc, format, options, &at);
            if let Err(e) = &result {
                tracing::warn!("{} export failed: {}", format, e);
            }
            ExportOutcome { format, result }
        })
        .collect()
}
