//! JSON schema export.
//!
//! The export carries the database info object, a generation timestamp
//! and the tables with their columns, indexes and constraints. Views and
//! routines are not part of this format.

use chrono::{DateTime, Local};
use schemadoc_core::{
    Column, Constraint, DatabaseInfo, Index, Result, SchemaDocError, SchemaDocument, Table,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct SchemaExport<'a> {
    database: &'a DatabaseInfo,
    generated_at: String,
    tables: Vec<TableExport<'a>>,
}

#[derive(Serialize)]
struct TableExport<'a> {
    name: &'a str,
    schema: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    row_count: u64,
    size_mb: f64,
    description: Option<&'a str>,
    columns: &'a [Column],
    indexes: &'a [Index],
    constraints: &'a [Constraint],
}

impl<'a> From<&'a Table> for TableExport<'a> {
    fn from(table: &'a Table) -> Self {
        Self {
            name: &table.name,
            schema: &table.schema,
            kind: &table.kind,
            row_count: table.row_count,
            size_mb: table.size_mb,
            description: table.description.as_deref(),
            columns: &table.columns,
            indexes: &table.indexes,
            constraints: &table.constraints,
        }
    }
}

/// Builds the JSON export as a value.
///
/// # Errors
/// Returns a serialization error if the document cannot be encoded.
pub fn render_json_schema(doc: &SchemaDocument) -> Result<Value> {
    render_json_schema_at(doc, &Local::now())
}

pub fn render_json_schema_at(doc: &SchemaDocument, at: &DateTime<Local>) -> Result<Value> {
    let export = SchemaExport {
        database: &doc.database_info,
        generated_at: at.to_rfc3339(),
        tables: doc.tables.iter().map(TableExport::from).collect(),
    };
    serde_json::to_value(&export)
        .map_err(|e| SchemaDocError::serialization("Failed to encode JSON schema export", e))
}

/// Pretty-printed form of [`render_json_schema_at`].
pub(crate) fn render_json_text_at(doc: &SchemaDocument, at: &DateTime<Local>) -> Result<String> {
    let value = render_json_schema_at(doc, at)?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| SchemaDocError::serialization("Failed to format JSON schema export", e))
}
