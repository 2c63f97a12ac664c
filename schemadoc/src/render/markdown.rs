//! Markdown output.

use askama::Template;
use chrono::{DateTime, Local};
use schemadoc_core::{Result, SchemaDocError, SchemaDocument};

use super::view::DocumentView;

#[derive(Template)]
#[template(path = "documentation.md", escape = "none")]
struct MarkdownTemplate {
    view: DocumentView,
}

impl std::ops::Deref for MarkdownTemplate {
    type Target = DocumentView;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

/// Keeps a value on a single pipe-table row.
fn table_cell(value: &str) -> String {
    value
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

fn flatten(value: &mut String) {
    *value = table_cell(value);
}

/// Applies [`table_cell`] to every value shown inside a pipe table
fn for_pipe_tables(mut view: DocumentView) -> DocumentView {
    for value in [&mut view.database_name, &mut view.version, &mut view.size] {
        flatten(value);
    }
    for table in &mut view.tables {
        for column in &mut table.columns {
            for value in [
                &mut column.name,
                &mut column.data_type,
                &mut column.default,
                &mut column.description,
            ] {
                flatten(value);
            }
        }
        for index in &mut table.indexes {
            for value in [&mut index.name, &mut index.columns, &mut index.index_type] {
                flatten(value);
            }
        }
        for constraint in &mut table.constraints {
            for value in [
                &mut constraint.name,
                &mut constraint.columns,
                &mut constraint.definition,
            ] {
                flatten(value);
            }
        }
    }
    view
}

/// Renders the document as Markdown.
///
/// # Errors
/// Returns a template error if rendering fails.
pub fn render_markdown(doc: &SchemaDocument) -> Result<String> {
    render_markdown_at(doc, &Local::now())
}

/// Same as [`render_markdown`] with a fixed generation time.
pub fn render_markdown_at(doc: &SchemaDocument, at: &DateTime<Local>) -> Result<String> {
    let template = MarkdownTemplate {
        view: for_pipe_tables(DocumentView::new(doc, at)),
    };
    template
        .render()
        .map_err(|e| SchemaDocError::template("Markdown documentation", e))
}
