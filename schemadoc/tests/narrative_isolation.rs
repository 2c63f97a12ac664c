//! Narrative failures must never affect the generated documentation.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use schemadoc::narrative::{NarrativeProvider, collect_narrative, migration_narrative};
use schemadoc::render::{ExportFormat, export_all};
use schemadoc_core::{DocumentationOptions, Platform, Result, SchemaDocError, sample_document};

struct FailingProvider;

#[async_trait]
impl NarrativeProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        Err(SchemaDocError::external_service_message("connection refused"))
    }
}

#[tokio::test]
async fn test_narrative_failure_leaves_exports_intact() {
    let doc = sample_document(Platform::PostgreSQL);
    let formats = [ExportFormat::Html, ExportFormat::Markdown, ExportFormat::Json];

    let before = export_all(Some(&doc), &formats, &DocumentationOptions::default());
    let narrative = collect_narrative(&FailingProvider, &doc).await;
    let after = export_all(Some(&doc), &formats, &DocumentationOptions::default());

    assert!(narrative.is_empty());
    assert_eq!(narrative.notices.len(), doc.tables.len());
    assert!(narrative.notices.iter().all(|n| n.contains("connection refused")));

    for (a, b) in before.iter().zip(&after) {
        assert!(a.result.is_ok());
        assert!(b.result.is_ok());
    }
}

#[tokio::test]
async fn test_migration_narrative_failure_is_a_notice() {
    let pg = sample_document(Platform::PostgreSQL);
    let ora = sample_document(Platform::Oracle);
    let narrative = migration_narrative(&FailingProvider, &[&pg, &ora]).await;

    assert!(narrative.sections.is_empty());
    assert_eq!(narrative.notices.len(), 1);
    assert!(narrative.notices[0].starts_with("Could not generate Migration Recommendations"));
}
