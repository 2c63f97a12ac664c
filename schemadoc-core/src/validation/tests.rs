//! Tests for document validation and integrity checking.

use super::*;
use crate::models::{Constraint, DatabaseInfo, Index, Table};
use crate::samples::sample_document;
use crate::Platform;
use serde_json::json;

fn minimal_document() -> Value {
    json!({
        "platform": "PostgreSQL",
        "database_info": { "name": "ecommerce_db", "version": "PostgreSQL 15.2" },
        "tables": [{
            "table_name": "customers",
            "schema": "public",
            "table_type": "BASE TABLE",
            "row_count": 125000,
            "size_mb": 45.2,
            "columns": [{
                "column_name": "customer_id",
                "data_type": "SERIAL",
                "is_nullable": false
            }],
            "indexes": [{
                "index_name": "customers_pkey",
                "columns": ["customer_id"],
                "index_type": "PRIMARY KEY",
                "is_unique": true
            }],
            "constraints": [{
                "constraint_name": "customers_pkey",
                "constraint_type": "PRIMARY KEY",
                "columns": ["customer_id"]
            }]
        }]
    })
}

fn empty_table(name: &str) -> Table {
    Table {
        name: name.to_string(),
        schema: "public".to_string(),
        kind: "BASE TABLE".to_string(),
        row_count: 0,
        size_mb: 0.0,
        description: None,
        columns: Vec::new(),
        indexes: Vec::new(),
        constraints: Vec::new(),
    }
}

#[test]
fn test_schema_initialization_success() {
    assert!(initialize_document_validator().is_ok());
    // Idempotent
    assert!(initialize_document_validator().is_ok());
}

#[test]
fn test_valid_minimal_document_passes() {
    assert!(validate_document_json(&minimal_document()).is_ok());
}

#[test]
fn test_sample_documents_pass_schema() {
    for platform in Platform::ALL {
        let value = serde_json::to_value(sample_document(platform)).expect("serialize");
        let result = validate_document_json(&value);
        assert!(result.is_ok(), "{}: {:?}", platform, result);
    }
}

#[test]
fn test_missing_database_info_fails() {
    let invalid = json!({ "platform": "Oracle" });
    match validate_document_json(&invalid) {
        Err(ValidationError::ValidationFailed { error_count, .. }) => assert!(error_count >= 1),
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_negative_row_count_fails() {
    let mut doc = minimal_document();
    doc["tables"][0]["row_count"] = json!(-1);
    assert!(validate_document_json(&doc).is_err());
}

#[test]
fn test_unknown_constraint_type_fails() {
    let mut doc = minimal_document();
    doc["tables"][0]["constraints"][0]["constraint_type"] = json!("EXCLUDE");
    assert!(validate_document_json(&doc).is_err());
}

#[test]
fn test_all_violations_are_reported() {
    let mut doc = minimal_document();
    doc["tables"][0]["row_count"] = json!("lots");
    doc["tables"][0]["columns"][0]["is_nullable"] = json!("NO");
    match validate_document_json(&doc) {
        Err(ValidationError::ValidationFailed {
            error_count,
            errors,
        }) => {
            assert_eq!(error_count, errors.len());
            assert!(error_count >= 2, "{:?}", errors);
        }
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_validate_and_parse_document() {
    let parsed = validate_and_parse_document(&minimal_document().to_string())
        .expect("valid document");
    assert_eq!(parsed.document.platform_name, "PostgreSQL");
    assert_eq!(parsed.document.tables[0].row_count, 125_000);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_validate_and_parse_rejects_malformed_json() {
    let result = validate_and_parse_document("{ not json");
    assert!(matches!(result, Err(ValidationError::JsonParsing { .. })));
}

#[test]
fn test_validate_and_parse_surfaces_integrity_failures() {
    let mut doc = minimal_document();
    let table = doc["tables"][0].clone();
    doc["tables"].as_array_mut().expect("tables").push(table);

    let result = validate_and_parse_document(&doc.to_string());
    assert!(matches!(result, Err(ValidationError::Integrity { .. })));
}

#[test]
fn test_integrity_duplicate_tables_fatal() {
    let mut doc = SchemaDocument::new("PostgreSQL", DatabaseInfo::new("db"));
    doc.tables.push(empty_table("customers"));
    doc.tables.push(empty_table("customers"));

    let error = check_integrity(&doc).expect_err("duplicate names");
    assert!(error.to_string().contains("duplicate table name 'customers'"));
}

#[test]
fn test_integrity_invalid_size_fatal() {
    for size in [-1.0, f64::NAN, f64::INFINITY] {
        let mut doc = SchemaDocument::new("PostgreSQL", DatabaseInfo::new("db"));
        let mut table = empty_table("t");
        table.size_mb = size;
        doc.tables.push(table);
        assert!(check_integrity(&doc).is_err(), "size {} accepted", size);
    }
}

#[test]
fn test_integrity_empty_index_fatal() {
    let mut doc = SchemaDocument::new("PostgreSQL", DatabaseInfo::new("db"));
    let mut table = empty_table("t");
    table.indexes.push(Index {
        name: "idx_empty".to_string(),
        columns: Vec::new(),
        index_type: "BTREE".to_string(),
        is_unique: false,
    });
    doc.tables.push(table);

    let error = check_integrity(&doc).expect_err("empty index");
    assert!(error.to_string().contains("idx_empty"));
}

#[test]
fn test_integrity_warnings() {
    let mut doc = SchemaDocument::new("PostgreSQL", DatabaseInfo::new("db"));
    let mut table = empty_table("orders");
    table.indexes.push(Index {
        name: "idx_missing".to_string(),
        columns: vec!["ghost".to_string()],
        index_type: "BTREE".to_string(),
        is_unique: false,
    });
    table.constraints.push(Constraint {
        name: "fk_orders_customer".to_string(),
        kind: ConstraintKind::ForeignKey,
        columns: Vec::new(),
        definition_or_reference: Some("customers(customer_id)".to_string()),
    });
    doc.tables.push(table);

    let issues = check_integrity(&doc).expect("only warnings");
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].location, "orders.idx_missing");
    assert!(issues[0].message.contains("ghost"));
    assert_eq!(
        issues[1].to_string(),
        "orders.fk_orders_customer: foreign key references unknown table 'customers'"
    );
}

#[test]
fn test_empty_document_has_no_issues() {
    let doc = SchemaDocument::new("Oracle", DatabaseInfo::new("ORCL"));
    assert!(check_integrity(&doc).expect("valid").is_empty());
}

#[test]
fn test_validation_error_converts_to_invalid_document() {
    let error: crate::SchemaDocError = ValidationError::Integrity {
        reason: "duplicate table name 't'".to_string(),
    }
    .into();
    assert!(matches!(error, crate::SchemaDocError::InvalidDocument { .. }));
}

#[test]
fn test_get_schema_definition() {
    let schema = get_schema_definition().expect("embedded schema parses");
    assert_eq!(schema["title"], "SchemaDoc Schema Document");
}
