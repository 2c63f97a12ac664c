//! PDF output.
//!
//! Rendering happens in three steps: the document becomes a story of
//! logical blocks, the story is laid out on A4 pages, and a backend
//! writes the pages as PDF bytes. The backend is a trait so builds
//! without the `pdf` feature can still report a clear error.

pub mod layout;
#[cfg(feature = "pdf")]
mod printpdf_backend;
pub mod story;
pub mod truncate;

use chrono::{DateTime, Local};
use schemadoc_core::{DocumentationOptions, Result, SchemaDocError, SchemaDocument};

pub use layout::{FontKind, Page, TextItem, layout, wrap};
#[cfg(feature = "pdf")]
pub use printpdf_backend::PrintPdfBackend;
pub use story::{Block, build_story};

/// Writes laid-out pages as a PDF file.
pub trait PdfBackend {
    fn name(&self) -> &str;

    /// Writes `pages` as one file. Output must depend only on the
    /// arguments, with `generated_at` used for the file metadata dates.
    ///
    /// # Errors
    /// Returns `RenderingUnavailable` when the backend cannot produce output.
    fn render(&self, title: &str, generated_at: &DateTime<Local>, pages: &[Page])
    -> Result<Vec<u8>>;
}

/// Backend used when PDF support is not compiled in
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl PdfBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn render(
        &self,
        _title: &str,
        _generated_at: &DateTime<Local>,
        _pages: &[Page],
    ) -> Result<Vec<u8>> {
        Err(SchemaDocError::rendering_unavailable(
            "PDF",
            "this build does not include the `pdf` feature",
        ))
    }
}

/// The backend selected at compile time
pub fn default_backend() -> Box<dyn PdfBackend> {
    #[cfg(feature = "pdf")]
    {
        Box::new(PrintPdfBackend)
    }
    #[cfg(not(feature = "pdf"))]
    {
        Box::new(UnavailableBackend)
    }
}

/// Renders the document as PDF bytes.
///
/// # Errors
/// Returns `RenderingUnavailable` if PDF support is missing or fails.
pub fn render_pdf(doc: &SchemaDocument, options: &DocumentationOptions) -> Result<Vec<u8>> {
    render_pdf_with(default_backend().as_ref(), doc, options, &Local::now())
}

/// Renders with an explicit backend and generation time.
pub fn render_pdf_with(
    backend: &dyn PdfBackend,
    doc: &SchemaDocument,
    options: &DocumentationOptions,
    at: &DateTime<Local>,
) -> Result<Vec<u8>> {
    let story = build_story(doc, options, at);
    let pages = layout(&story, true);
    tracing::debug!(
        "Laid out {} PDF pages for {} using {}",
        pages.len(),
        doc.platform_name,
        backend.name()
    );

    let title = format!("{} Database Documentation", doc.platform_name);
    backend.render(&title, at, &pages)
}
