//! Optional narrative text from a hosted language model.
//!
//! The narrative is a supplement to the generated documentation: a
//! performance review per table and, for comparisons, a migration
//! assessment. Every request is independent and a failed one only
//! produces a notice.

use async_trait::async_trait;
use reqwest::Client;
use schemadoc_core::{Result, SchemaDocError, SchemaDocument, Table};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::render::format;

/// Anthropic API base URL
pub const API_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const TEMPERATURE: f32 = 0.1;

/// Token budget for a single table review
pub const PERFORMANCE_MAX_TOKENS: u32 = 1000;
/// Token budget for a migration assessment
pub const MIGRATION_MAX_TOKENS: u32 = 2000;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Environment variable overriding the model
pub const MODEL_ENV: &str = "SCHEMADOC_MODEL";

/// A text-generation service
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Sends one prompt and returns the generated text.
    ///
    /// # Errors
    /// Returns `ExternalService` for transport, status or decoding failures.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Connection settings for the Anthropic Messages API
#[derive(Clone)]
pub struct NarrativeConfig {
    api_key: Zeroizing<String>,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for NarrativeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeConfig")
            .field("api_key", &"****")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NarrativeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Zeroizing::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads `ANTHROPIC_API_KEY` and the optional `SCHEMADOC_MODEL`.
    ///
    /// # Errors
    /// Returns a configuration error when the key is missing or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SchemaDocError::configuration(format!(
                    "{} is not set; narrative generation needs an API key",
                    API_KEY_ENV
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(MODEL_ENV)
            && !model.trim().is_empty()
        {
            config.model = model;
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn request_body<'a>(model: &'a str, prompt: &'a str, max_tokens: u32) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens,
        temperature: TEMPERATURE,
        messages: [RequestMessage {
            role: "user",
            content: prompt,
        }],
    }
}

/// Extracts the text blocks of a Messages API response.
fn parse_response(body: &str) -> Result<String> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| SchemaDocError::external_service("Malformed narrative response", e))?;

    let text = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        return Err(SchemaDocError::external_service_message(
            "Narrative response contained no text",
        ));
    }
    Ok(text)
}

/// Anthropic Messages API client
pub struct AnthropicNarrator {
    client: Client,
    config: NarrativeConfig,
}

impl AnthropicNarrator {
    /// # Errors
    /// Returns `ExternalService` if the HTTP client cannot be built.
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("schemadoc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SchemaDocError::external_service("Failed to build HTTP client", e))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }
}

#[async_trait]
impl NarrativeProvider for AnthropicNarrator {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/messages", self.config.base_url.trim_end_matches('/'));
        let body = request_body(&self.config.model, prompt, max_tokens);

        tracing::debug!("Requesting narrative from {} ({} max tokens)", self.config.model, max_tokens);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.config.api_key.as_str())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SchemaDocError::external_service("Narrative request failed", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SchemaDocError::external_service("Failed to read narrative response", e))?;

        if !status.is_success() {
            return Err(SchemaDocError::external_service_message(format!(
                "Narrative service returned {}: {}",
                status, text
            )));
        }

        parse_response(&text)
    }
}

/// Prompt asking for a performance review of one table.
///
/// # Errors
/// Returns a serialization error if the column or index lists cannot be encoded.
pub fn performance_prompt(platform: &str, table: &Table) -> Result<String> {
    let columns = serde_json::to_string_pretty(&table.columns)
        .map_err(|e| SchemaDocError::serialization("Failed to encode columns for prompt", e))?;
    let indexes = serde_json::to_string_pretty(&table.indexes)
        .map_err(|e| SchemaDocError::serialization("Failed to encode indexes for prompt", e))?;

    Ok(format!(
        "Analyze the performance characteristics of this {platform} table:\n\
         \n\
         Table: {name}\n\
         Row Count: {rows}\n\
         Size: {size:.1} MB\n\
         Columns: {column_count}\n\
         Indexes: {index_count}\n\
         \n\
         Columns:\n\
         {columns}\n\
         \n\
         Indexes:\n\
         {indexes}\n\
         \n\
         Provide:\n\
         1. Performance assessment (Good/Warning/Critical)\n\
         2. Potential bottlenecks\n\
         3. Index optimization recommendations\n\
         4. Query performance tips\n\
         5. Maintenance considerations\n\
         \n\
         Keep it concise and actionable.",
        name = table.name,
        rows = format::thousands(table.row_count),
        size = table.size_mb,
        column_count = table.columns.len(),
        index_count = table.indexes.len(),
    ))
}

/// Prompt asking for a migration assessment across platforms.
pub fn migration_prompt(docs: &[&SchemaDocument]) -> String {
    let mut summary = String::new();
    for doc in docs {
        summary.push_str(&format!(
            "- {}: {} tables, {} views, {} routines, {} rows\n",
            doc.platform_name,
            doc.tables.len(),
            doc.views.len(),
            doc.routines.len(),
            format::thousands(doc.total_rows())
        ));
    }
    let platforms = docs
        .iter()
        .map(|d| d.platform_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the provided database schemas across {platforms}.\n\
         \n\
         {summary}\n\
         Provide:\n\
         \n\
         1. **Migration Complexity Assessment** (Low/Medium/High)\n\
         2. **Key Challenges** for each migration path\n\
         3. **Data Type Conversion Strategy**\n\
         4. **Performance Impact Analysis**\n\
         5. **Recommended Migration Approach**\n\
         6. **Timeline Estimates**\n\
         \n\
         Focus on practical, actionable recommendations for database administrators."
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeSection {
    pub title: String,
    pub body: String,
}

/// Generated narrative plus notices for the parts that failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub platform: String,
    pub sections: Vec<NarrativeSection>,
    pub notices: Vec<String>,
}

impl Narrative {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {} Narrative Analysis\n", self.platform);
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n{}\n", section.title, section.body.trim_end()));
        }
        out
    }

    fn record(&mut self, title: String, result: Result<String>) {
        match result {
            Ok(body) => self.sections.push(NarrativeSection { title, body }),
            Err(e) => {
                tracing::warn!("Could not generate {}: {}", title, e);
                self.notices.push(format!("Could not generate {}: {}", title, e));
            }
        }
    }
}

/// Requests a performance review for every table in the document.
///
/// Failures are logged and kept as notices; they never abort the run.
pub async fn collect_narrative(
    provider: &dyn NarrativeProvider,
    doc: &SchemaDocument,
) -> Narrative {
    let mut narrative = Narrative {
        platform: doc.platform_name.clone(),
        ..Narrative::default()
    };

    for table in &doc.tables {
        let title = format!("Performance Analysis: {}", table.name);
        let result = match performance_prompt(&doc.platform_name, table) {
            Ok(prompt) => provider.complete(&prompt, PERFORMANCE_MAX_TOKENS).await,
            Err(e) => Err(e),
        };
        narrative.record(title, result);
    }

    tracing::info!(
        "Narrative for {}: {} sections, {} notices (provider {})",
        doc.platform_name,
        narrative.sections.len(),
        narrative.notices.len(),
        provider.name()
    );
    narrative
}

/// Requests a migration assessment for a set of documents.
pub async fn migration_narrative(
    provider: &dyn NarrativeProvider,
    docs: &[&SchemaDocument],
) -> Narrative {
    let mut narrative = Narrative {
        platform: docs
            .iter()
            .map(|d| d.platform_name.as_str())
            .collect::<Vec<_>>()
            .join(" / "),
        ..Narrative::default()
    };
    let result = provider
        .complete(&migration_prompt(docs), MIGRATION_MAX_TOKENS)
        .await;
    narrative.record("Migration Recommendations".to_string(), result);
    narrative
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadoc_core::{Platform, sample_document};
    use std::sync::Mutex;

    struct ScriptedProvider {
        fail_on: Option<&'static str>,
        prompts: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedProvider {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                fail_on,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NarrativeProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
            self.prompts
                .lock()
                .expect("lock")
                .push((prompt.to_string(), max_tokens));
            match self.fail_on {
                Some(marker) if prompt.contains(marker) => {
                    Err(SchemaDocError::external_service_message("service unavailable"))
                }
                _ => Ok("Performance assessment: Good".to_string()),
            }
        }
    }

    #[test]
    fn test_narrative_request_body() {
        let body = serde_json::to_value(request_body("m", "hello", 1000)).expect("json");
        assert_eq!(
            body,
            serde_json::json!({
                "model": "m",
                "max_tokens": 1000,
                "temperature": 0.1f32,
                "messages": [{ "role": "user", "content": "hello" }]
            })
        );
    }

    #[test]
    fn test_narrative_parse_response() {
        let body = r#"{"id":"msg","content":[{"type":"text","text":"All good"}],"role":"assistant"}"#;
        assert_eq!(parse_response(body).expect("text"), "All good");

        let empty = r#"{"content":[]}"#;
        assert!(matches!(
            parse_response(empty),
            Err(SchemaDocError::ExternalService { .. })
        ));
        assert!(parse_response("not json").is_err());
    }

    #[test]
    fn test_narrative_performance_prompt() {
        let doc = sample_document(Platform::PostgreSQL);
        let prompt = performance_prompt(&doc.platform_name, &doc.tables[0]).expect("prompt");

        assert!(prompt.starts_with("Analyze the performance characteristics of this PostgreSQL table:"));
        assert!(prompt.contains("Table: customers"));
        assert!(prompt.contains("Row Count: 125,000"));
        assert!(prompt.contains("Size: 45.2 MB"));
        assert!(prompt.contains("Columns: 9"));
        assert!(prompt.contains("\"column_name\": \"customer_id\""));
        assert!(prompt.contains("5. Maintenance considerations"));
        assert!(prompt.ends_with("Keep it concise and actionable."));
    }

    #[test]
    fn test_narrative_migration_prompt() {
        let pg = sample_document(Platform::PostgreSQL);
        let ora = sample_document(Platform::Oracle);
        let prompt = migration_prompt(&[&pg, &ora]);

        assert!(prompt.contains("across PostgreSQL, Oracle"));
        assert!(prompt.contains("6. **Timeline Estimates**"));
    }

    #[test]
    fn test_narrative_config_from_env() {
        temp_env::with_vars(
            [(API_KEY_ENV, Some("test-key")), (MODEL_ENV, Some("custom-model"))],
            || {
                let config = NarrativeConfig::from_env().expect("config");
                assert_eq!(config.model, "custom-model");
                assert_eq!(config.base_url, API_BASE_URL);
                assert!(!format!("{:?}", config).contains("test-key"));
            },
        );

        temp_env::with_vars([(API_KEY_ENV, None::<&str>), (MODEL_ENV, None)], || {
            let error = NarrativeConfig::from_env().expect_err("missing key");
            assert!(matches!(error, SchemaDocError::Configuration { .. }));
        });
    }

    #[tokio::test]
    async fn test_narrative_collects_every_table() {
        let provider = ScriptedProvider::new(None);
        let doc = sample_document(Platform::Oracle);
        let narrative = collect_narrative(&provider, &doc).await;

        assert_eq!(narrative.sections.len(), 2);
        assert!(narrative.notices.is_empty());
        let prompts = provider.prompts.lock().expect("lock");
        assert!(prompts.iter().all(|(_, tokens)| *tokens == PERFORMANCE_MAX_TOKENS));

        let markdown = narrative.to_markdown();
        assert!(markdown.starts_with("# Oracle Narrative Analysis"));
        assert!(markdown.contains("## Performance Analysis: CUSTOMERS"));
    }

    #[tokio::test]
    async fn test_narrative_failure_becomes_notice() {
        let provider = ScriptedProvider::new(Some("Table: orders"));
        let doc = sample_document(Platform::PostgreSQL);
        let narrative = collect_narrative(&provider, &doc).await;

        assert_eq!(narrative.sections.len(), 1);
        assert_eq!(narrative.sections[0].title, "Performance Analysis: customers");
        assert_eq!(narrative.notices.len(), 1);
        assert!(narrative.notices[0].contains("orders"));
    }

    #[tokio::test]
    async fn test_narrative_migration_uses_larger_budget() {
        let provider = ScriptedProvider::new(None);
        let pg = sample_document(Platform::PostgreSQL);
        let mssql = sample_document(Platform::SqlServer);
        let narrative = migration_narrative(&provider, &[&pg, &mssql]).await;

        assert_eq!(narrative.platform, "PostgreSQL / SQL Server");
        assert_eq!(narrative.sections.len(), 1);
        let prompts = provider.prompts.lock().expect("lock");
        assert_eq!(prompts[0].1, MIGRATION_MAX_TOKENS);
    }
}
