//! Validation for uploaded schema documents.
//!
//! Uploaded JSON goes through three stages before any renderer sees it:
//! structural validation against an embedded JSON Schema, deserialization
//! into [`SchemaDocument`], and a model integrity check. The integrity
//! check separates fatal findings (the document cannot be rendered
//! sensibly) from warnings (it can, but something looks wrong).
//!
//! # Example
//! ```rust
//! use schemadoc_core::validation::validate_and_parse_document;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let parsed = validate_and_parse_document(r#"{
//!     "platform": "PostgreSQL",
//!     "database_info": { "name": "ecommerce_db" },
//!     "tables": []
//! }"#)?;
//! assert_eq!(parsed.document.platform_name, "PostgreSQL");
//! assert!(parsed.warnings.is_empty());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::models::{ConstraintKind, SchemaDocument};

/// Validation errors with field-level reporting
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// Structural validation failed
    #[error("Schema validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// The document is well-formed but violates a model invariant
    #[error("Integrity check failed: {reason}")]
    Integrity { reason: String },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Embedded JSON Schema for the document format
const DOCUMENT_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "SchemaDoc Schema Document",
  "type": "object",
  "required": ["platform", "database_info"],
  "properties": {
    "platform": { "type": "string", "minLength": 1 },
    "database_info": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "type": "string", "minLength": 1 },
        "version": { "type": ["string", "null"] },
        "size": { "type": ["string", "null"] },
        "created": { "type": ["string", "null"] },
        "last_backup": { "type": ["string", "null"] }
      }
    },
    "tables": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["table_name", "schema", "table_type", "row_count", "size_mb"],
        "properties": {
          "table_name": { "type": "string", "minLength": 1 },
          "schema": { "type": "string" },
          "table_type": { "type": "string" },
          "row_count": { "type": "integer", "minimum": 0 },
          "size_mb": { "type": "number", "minimum": 0 },
          "description": { "type": ["string", "null"] },
          "columns": {
            "type": "array",
            "items": {
              "type": "object",
              "required": ["column_name", "data_type", "is_nullable"],
              "properties": {
                "column_name": { "type": "string", "minLength": 1 },
                "data_type": { "type": "string" },
                "is_nullable": { "type": "boolean" },
                "default": { "type": ["string", "null"] },
                "description": { "type": ["string", "null"] }
              }
            }
          },
          "indexes": {
            "type": "array",
            "items": {
              "type": "object",
              "required": ["index_name", "columns", "index_type", "is_unique"],
              "properties": {
                "index_name": { "type": "string", "minLength": 1 },
                "columns": { "type": "array", "items": { "type": "string" } },
                "index_type": { "type": "string" },
                "is_unique": { "type": "boolean" }
              }
            }
          },
          "constraints": {
            "type": "array",
            "items": {
              "type": "object",
              "required": ["constraint_name", "constraint_type"],
              "properties": {
                "constraint_name": { "type": "string", "minLength": 1 },
                "constraint_type": { "enum": ["PRIMARY KEY", "UNIQUE", "CHECK", "FOREIGN KEY"] },
                "columns": { "type": "array", "items": { "type": "string" } },
                "definition": { "type": ["string", "null"] },
                "references": { "type": ["string", "null"] }
              }
            }
          }
        }
      }
    },
    "views": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["view_name", "schema", "definition"],
        "properties": {
          "view_name": { "type": "string", "minLength": 1 },
          "schema": { "type": "string" },
          "definition": { "type": "string" },
          "description": { "type": ["string", "null"] }
        }
      }
    },
    "routines": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["schema", "routine_type"],
        "properties": {
          "schema": { "type": "string" },
          "routine_type": { "enum": ["function", "procedure"] },
          "parameters": { "type": "string" },
          "return_type": { "type": ["string", "null"] },
          "description": { "type": ["string", "null"] }
        }
      }
    }
  }
}"#;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Initialize and compile the document JSON Schema.
///
/// Safe to call more than once; later calls are no-ops.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_document_validator() -> Result<(), ValidationError> {
    if COMPILED_SCHEMA.get().is_some() {
        return Ok(());
    }

    let schema_json = get_schema_definition()?;
    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    // Another thread may have won the race; either instance is equivalent
    let _ = COMPILED_SCHEMA.set(compiled);

    Ok(())
}

fn compiled_schema() -> Result<&'static Validator, ValidationError> {
    initialize_document_validator()?;
    COMPILED_SCHEMA
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "Schema validator not initialized".to_string(),
        })
}

/// Validate a JSON value against the document schema.
///
/// Every structural violation is collected, not just the first.
///
/// # Errors
/// Returns `ValidationError::ValidationFailed` listing each violation.
pub fn validate_document_json(json_value: &Value) -> Result<(), ValidationError> {
    let schema = compiled_schema()?;

    let errors: Vec<String> = schema
        .iter_errors(json_value)
        .map(|error| error.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        })
    }
}

/// A non-fatal integrity finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityIssue {
    /// Where the issue was found, e.g. `orders.fk_orders_customer`
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Check model invariants that the JSON Schema cannot express.
///
/// Duplicate table names, negative or non-finite sizes and indexes without
/// columns are fatal. Index or constraint columns missing from their table
/// and foreign keys to unknown tables are returned as warnings.
///
/// # Errors
/// Returns `ValidationError::Integrity` on the first fatal finding.
pub fn check_integrity(document: &SchemaDocument) -> Result<Vec<IntegrityIssue>, ValidationError> {
    let mut seen = HashSet::new();
    for table in &document.tables {
        if !seen.insert(table.name.as_str()) {
            return Err(ValidationError::Integrity {
                reason: format!("duplicate table name '{}'", table.name),
            });
        }
        if !table.size_mb.is_finite() || table.size_mb < 0.0 {
            return Err(ValidationError::Integrity {
                reason: format!(
                    "table '{}' has invalid size_mb {}",
                    table.name, table.size_mb
                ),
            });
        }
        if let Some(index) = table.indexes.iter().find(|i| i.columns.is_empty()) {
            return Err(ValidationError::Integrity {
                reason: format!("index '{}' on '{}' has no columns", index.name, table.name),
            });
        }
    }

    let mut issues = Vec::new();
    for table in &document.tables {
        for index in &table.indexes {
            for column in &index.columns {
                if table.column(column).is_none() {
                    issues.push(IntegrityIssue {
                        location: format!("{}.{}", table.name, index.name),
                        message: format!("index column '{}' not found in table", column),
                    });
                }
            }
        }

        for constraint in &table.constraints {
            for column in &constraint.columns {
                if table.column(column).is_none() {
                    issues.push(IntegrityIssue {
                        location: format!("{}.{}", table.name, constraint.name),
                        message: format!("constraint column '{}' not found in table", column),
                    });
                }
            }

            if constraint.kind == ConstraintKind::ForeignKey {
                match constraint.referenced_table() {
                    Some(target) if document.table(target).is_some() => {}
                    Some(target) => issues.push(IntegrityIssue {
                        location: format!("{}.{}", table.name, constraint.name),
                        message: format!("foreign key references unknown table '{}'", target),
                    }),
                    None => issues.push(IntegrityIssue {
                        location: format!("{}.{}", table.name, constraint.name),
                        message: "foreign key has no referenced table".to_string(),
                    }),
                }
            }
        }
    }

    Ok(issues)
}

/// A validated document plus its integrity warnings
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: SchemaDocument,
    pub warnings: Vec<IntegrityIssue>,
}

/// Parse, validate and integrity-check a document in one step.
///
/// Warnings are logged and returned alongside the document.
///
/// # Errors
/// Returns validation errors for malformed JSON, schema violations or
/// fatal integrity findings.
pub fn validate_and_parse_document(json_str: &str) -> Result<ParsedDocument, ValidationError> {
    let json_value: Value = serde_json::from_str(json_str)?;

    validate_document_json(&json_value)?;

    let document: SchemaDocument = serde_json::from_value(json_value)?;
    let warnings = check_integrity(&document)?;

    for warning in &warnings {
        tracing::warn!("Document integrity: {}", warning);
    }

    Ok(ParsedDocument { document, warnings })
}

/// The embedded document JSON Schema as a parsed value
pub fn get_schema_definition() -> Result<Value, ValidationError> {
    serde_json::from_str(DOCUMENT_SCHEMA).map_err(|e| ValidationError::SchemaCompilation {
        message: format!("Failed to parse embedded schema: {}", e),
    })
}

#[cfg(test)]
mod tests;
