//! HTML output.
//!
//! The fragment is the documentation body on its own, suitable for
//! embedding. The standalone page wraps a fragment in a styled shell.

use askama::Template;
use chrono::{DateTime, Local};
use schemadoc_core::{Result, SchemaDocError, SchemaDocument};

use super::view::DocumentView;

#[derive(Template)]
#[template(path = "fragment.html", escape = "none")]
struct FragmentTemplate {
    view: DocumentView,
}

impl std::ops::Deref for FragmentTemplate {
    type Target = DocumentView;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

#[derive(Template)]
#[template(path = "document.html", escape = "none")]
struct StandaloneTemplate<'a> {
    title: &'a str,
    generated_at: String,
    version: &'a str,
    fragment: &'a str,
}

/// Renders the documentation body as an HTML fragment.
///
/// # Errors
/// Returns a template error if rendering fails.
pub fn render_html_fragment(doc: &SchemaDocument) -> Result<String> {
    render_html_fragment_at(doc, &Local::now())
}

/// Same as [`render_html_fragment`] with a fixed generation time.
pub fn render_html_fragment_at(doc: &SchemaDocument, at: &DateTime<Local>) -> Result<String> {
    let template = FragmentTemplate {
        view: DocumentView::new(doc, at),
    };
    template
        .render()
        .map_err(|e| SchemaDocError::template("HTML fragment", e))
}

/// Wraps a rendered fragment in a complete HTML page.
///
/// # Errors
/// Returns a template error if rendering fails.
pub fn render_standalone_html(doc: &SchemaDocument, fragment: &str) -> Result<String> {
    render_standalone_html_at(doc, fragment, &Local::now())
}

pub fn render_standalone_html_at(
    doc: &SchemaDocument,
    fragment: &str,
    at: &DateTime<Local>,
) -> Result<String> {
    let template = StandaloneTemplate {
        title: &doc.platform_name,
        generated_at: super::format::timestamp(at),
        version: env!("CARGO_PKG_VERSION"),
        fragment,
    };
    template
        .render()
        .map_err(|e| SchemaDocError::template("standalone HTML", e))
}

/// Fragment plus shell in one call.
pub(crate) fn render_document_at(doc: &SchemaDocument, at: &DateTime<Local>) -> Result<String> {
    let fragment = render_html_fragment_at(doc, at)?;
    render_standalone_html_at(doc, &fragment, at)
}
