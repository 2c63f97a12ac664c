//! Schema sources.
//!
//! A source is anything that can describe itself and produce a
//! [`SchemaDocument`]. Three exist:
//! - `sample`: the built-in per-platform documents
//! - `file`: JSON documents on disk, plus previews of DDL uploads
//! - `connection`: a simulated live connection that never opens a socket

use async_trait::async_trait;

use crate::{Result, models::SchemaDocument};

pub mod connection;
pub mod file;
pub mod sample;

pub use connection::{ConnectionConfig, ConnectionOutcome, Credentials, SimulatedConnection};
pub use file::{FileSource, UploadKind, UploadPreview};
pub use sample::SampleSource;

/// Producer of schema documents.
///
/// # Object Safety
/// This trait is object-safe, so callers can hold a `Box<dyn SchemaSource>`
/// chosen at runtime from CLI arguments.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Short human-readable description for logs and notices.
    ///
    /// Never contains credentials.
    fn describe(&self) -> String;

    /// Produces the schema document.
    ///
    /// # Errors
    /// Returns error if the document cannot be read, fails validation, or
    /// the source cannot produce documents at all.
    async fn load(&self) -> Result<SchemaDocument>;
}
