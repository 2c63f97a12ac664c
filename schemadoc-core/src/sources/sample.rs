//! Built-in sample source.

use async_trait::async_trait;

use super::SchemaSource;
use crate::models::{Platform, SchemaDocument};
use crate::{Result, samples};

/// Serves the built-in sample document for one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSource {
    pub platform: Platform,
}

impl SampleSource {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl SchemaSource for SampleSource {
    fn describe(&self) -> String {
        format!("Built-in {} sample", self.platform)
    }

    async fn load(&self) -> Result<SchemaDocument> {
        tracing::debug!("Loading built-in sample for {}", self.platform);
        Ok(samples::sample_document(self.platform))
    }
}
