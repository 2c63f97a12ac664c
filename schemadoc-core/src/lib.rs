//! Core data structures and utilities for SchemaDoc.
//!
//! This crate holds everything the renderers read and nothing they write:
//! the schema document model, the built-in platform samples, document
//! validation, documentation options and the simulated schema sources.
//!
//! # Guarantees
//! - Documents are immutable once built
//! - No credentials are stored in any serializable structure
//! - Simulated connections never open a socket
//!
//! # Architecture
//! - Sources produce a [`SchemaDocument`] behind the [`sources::SchemaSource`] trait
//! - Uploaded documents pass JSON Schema validation and an integrity check
//! - Errors carry enough context to become user-visible notices

pub mod error;
pub mod logging;
pub mod models;
pub mod options;
pub mod samples;
pub mod sources;
pub mod validation;

// Re-export commonly used types
pub use error::{Result, SchemaDocError};
pub use models::{
    Column, Constraint, ConstraintKind, DatabaseInfo, Index, Platform, Routine, RoutineKind,
    SchemaDocument, Table, View,
};
pub use options::DocumentationOptions;
pub use samples::{all_samples, sample_document};
pub use sources::{
    ConnectionConfig, ConnectionOutcome, Credentials, FileSource, SampleSource, SchemaSource,
    SimulatedConnection, UploadPreview,
};
pub use validation::{
    IntegrityIssue, ParsedDocument, ValidationError, check_integrity, initialize_document_validator,
    validate_and_parse_document, validate_document_json,
};
