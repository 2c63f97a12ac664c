//! Integration tests for loading schema documents from disk.
//!
//! These tests write documents to temporary files and load them back
//! through the `SchemaSource` trait, exercising validation and the
//! integrity check end to end.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]

use proptest::prelude::*;
use schemadoc_core::{
    FileSource, Platform, SchemaDocError, SchemaDocument, SchemaSource, sample_document,
};
use std::io::Write;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[tokio::test]
async fn test_integration_sample_documents_load_from_file() {
    for platform in Platform::ALL {
        let original = sample_document(platform);
        let json = serde_json::to_string_pretty(&original).expect("serialize");
        let file = write_temp(".json", &json);

        let loaded = FileSource::new(file.path())
            .load()
            .await
            .expect("sample document loads");
        assert_eq!(loaded, original, "{}", platform);
    }
}

#[tokio::test]
async fn test_integration_invalid_document_rejected() {
    let file = write_temp(".json", r#"{ "platform": "PostgreSQL", "tables": [] }"#);

    let error = FileSource::new(file.path())
        .load()
        .await
        .expect_err("missing database_info");
    assert!(matches!(error, SchemaDocError::InvalidDocument { .. }));
}

#[tokio::test]
async fn test_integration_duplicate_tables_rejected() {
    let mut doc = sample_document(Platform::PostgreSQL);
    let first = doc.tables[0].clone();
    doc.tables.push(first);
    let file = write_temp(".json", &serde_json::to_string(&doc).expect("serialize"));

    let error = FileSource::new(file.path())
        .load()
        .await
        .expect_err("duplicate table");
    assert!(error.to_string().contains("duplicate table name"));
}

#[tokio::test]
async fn test_integration_dangling_foreign_key_is_only_a_warning() {
    let mut doc = sample_document(Platform::PostgreSQL);
    doc.tables.retain(|t| t.name == "orders");
    let file = write_temp(".json", &serde_json::to_string(&doc).expect("serialize"));

    let loaded = FileSource::new(file.path())
        .load()
        .await
        .expect("warnings do not block loading");
    assert_eq!(loaded.tables.len(), 1);
}

#[tokio::test]
async fn test_integration_preview_of_json_upload() {
    let json = serde_json::to_string(&sample_document(Platform::Oracle)).expect("serialize");
    let file = write_temp(".json", &json);

    let preview = FileSource::new(file.path())
        .preview()
        .await
        .expect("json files can be previewed");
    assert_eq!(preview.size_bytes, json.len());
    assert_eq!(preview.statement_total(), 0);
}

proptest! {
    #[test]
    fn prop_document_json_roundtrip(
        rows in proptest::collection::vec(0u64..10_000_000, 0..6),
        tenths in proptest::collection::vec(0u32..100_000, 6),
    ) {
        let mut doc: SchemaDocument = sample_document(Platform::SqlServer);
        let template = doc.tables[0].clone();
        doc.tables = rows
            .iter()
            .zip(tenths.iter())
            .enumerate()
            .map(|(i, (rows, tenths))| {
                let mut table = template.clone();
                table.name = format!("Table{}", i);
                table.row_count = *rows;
                table.size_mb = f64::from(*tenths) / 10.0;
                table.constraints.clear();
                table
            })
            .collect();

        let json = serde_json::to_string(&doc).expect("serialize");
        let parsed = schemadoc_core::validate_and_parse_document(&json).expect("valid");
        prop_assert_eq!(parsed.document, doc);
        prop_assert!(parsed.warnings.is_empty());
    }
}
