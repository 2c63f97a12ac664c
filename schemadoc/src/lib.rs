//! Documentation generation for SchemaDoc.
//!
//! This crate turns a [`schemadoc_core::SchemaDocument`] into readable
//! documentation. Renderers are pure functions; the only side effects in
//! the crate are the optional narrative requests and reading the clock
//! for generation timestamps.
//!
//! # Modules
//! - [`render`]: HTML, Markdown, JSON and PDF output plus the export dispatcher
//! - [`narrative`]: optional model-generated performance and migration notes
//! - [`compare`]: cross-platform statistics and column type mapping

pub mod compare;
pub mod narrative;
pub mod render;

pub use compare::{Compatibility, ComparisonReport, PlatformStats, compare};
pub use narrative::{
    AnthropicNarrator, Narrative, NarrativeConfig, NarrativeProvider, NarrativeSection,
    collect_narrative, migration_narrative,
};
pub use render::{ExportArtifact, ExportFormat, ExportOutcome, export, export_all};
