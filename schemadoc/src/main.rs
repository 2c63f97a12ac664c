//! SchemaDoc command-line interface.
//!
//! Generates database schema documentation from the built-in platform
//! samples or from JSON schema documents on disk.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use schemadoc::narrative::{self, AnthropicNarrator, Narrative, NarrativeConfig};
use schemadoc::render::{ExportFormat, export_all};
use schemadoc_core::logging::init_logging;
use schemadoc_core::{
    ConnectionConfig, Credentials, DocumentationOptions, FileSource, Platform, SampleSource,
    SchemaDocument, SchemaSource, SimulatedConnection, initialize_document_validator,
    validate_and_parse_document,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(about = "Database schema documentation generator")]
#[command(version)]
#[command(long_about = "
SchemaDoc - Database schema documentation generator

Produces documentation for a database schema in several formats:
- HTML (standalone page)
- Markdown
- JSON schema export
- PDF report with table of contents

SUPPORTED PLATFORMS:
- PostgreSQL
- Oracle
- SQL Server

EXAMPLES:
  schemadoc render --platform postgresql --format all -o docs/
  schemadoc render --input schema.json --format pdf
  schemadoc compare --source postgresql --target oracle
  schemadoc preview schema.sql
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported database platforms
    Platforms,
    /// Generate documentation
    Render(RenderArgs),
    /// Simulate a connection to a database server
    Connect(ConnectArgs),
    /// Preview an uploaded schema file
    Preview(FileArgs),
    /// Compare the samples of two platforms
    Compare(CompareArgs),
    /// Validate a JSON schema document
    Validate(FileArgs),
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Output format selection on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// Standalone HTML page
    Html,
    /// Markdown documentation
    Markdown,
    /// JSON schema export
    Json,
    /// PDF report
    Pdf,
    /// Every format
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Html => vec![ExportFormat::Html],
            FormatArg::Markdown => vec![ExportFormat::Markdown],
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::Pdf => vec![ExportFormat::Pdf],
            FormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    value.parse::<Platform>().map_err(|e| e.to_string())
}

#[derive(Args)]
pub struct NarrativeArgs {
    /// Request narrative analysis from the language model service
    #[arg(long)]
    pub narrative: bool,

    /// API key for the narrative service
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, hide = true)]
    pub api_key: Option<String>,

    /// Model used for narrative analysis
    #[arg(long, env = "SCHEMADOC_MODEL")]
    pub model: Option<String>,
}

impl NarrativeArgs {
    /// Builds a narrator when `--narrative` is set and a key is available.
    fn narrator(&self) -> Option<AnthropicNarrator> {
        if !self.narrative {
            return None;
        }
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            warn!("Narrative analysis requested but {} is not set", narrative::API_KEY_ENV);
            println!("Notice: narrative analysis needs an API key; skipping");
            return None;
        };

        let mut config = NarrativeConfig::new(api_key);
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        match AnthropicNarrator::new(config) {
            Ok(narrator) => Some(narrator),
            Err(e) => {
                warn!("Narrative client unavailable: {}", e);
                println!("Notice: {}", e);
                None
            }
        }
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// Built-in sample to document
    #[arg(long, value_parser = parse_platform, conflicts_with = "input", required_unless_present = "input")]
    pub platform: Option<Platform>,

    /// JSON schema document to document
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "all")]
    pub format: FormatArg,

    /// Directory for generated files
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, help = "Mark AI-enhanced descriptions as disabled")]
    pub no_ai_descriptions: bool,

    #[arg(long, help = "Mark ER diagrams as disabled")]
    pub no_diagrams: bool,

    #[arg(long, help = "Mark the data dictionary as disabled")]
    pub no_data_dictionary: bool,

    #[arg(long, help = "Mark performance notes as disabled")]
    pub no_performance_notes: bool,

    #[arg(long, help = "Mark security analysis as disabled")]
    pub no_security_analysis: bool,

    #[command(flatten)]
    pub narrative: NarrativeArgs,
}

impl RenderArgs {
    fn options(&self) -> DocumentationOptions {
        DocumentationOptions {
            ai_descriptions: !self.no_ai_descriptions,
            er_diagrams: !self.no_diagrams,
            data_dictionary: !self.no_data_dictionary,
            performance_notes: !self.no_performance_notes,
            security_analysis: !self.no_security_analysis,
        }
    }

    fn source(&self) -> Box<dyn SchemaSource> {
        match (&self.input, self.platform) {
            (Some(path), _) => Box::new(FileSource::new(path)),
            (None, Some(platform)) => Box::new(SampleSource::new(platform)),
            (None, None) => Box::new(SampleSource::new(Platform::PostgreSQL)),
        }
    }
}

#[derive(Args)]
pub struct ConnectArgs {
    /// Database platform
    #[arg(long, value_parser = parse_platform, required_unless_present = "url")]
    pub platform: Option<Platform>,

    /// Connection URL (credentials are never logged)
    #[arg(long, conflicts_with_all = ["platform", "host", "port", "database", "username"])]
    pub url: Option<String>,

    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port; defaults to the platform's standard port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database or service name
    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub schema: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    /// Simulated connection delay in milliseconds
    #[arg(long, default_value = "2000")]
    pub delay_ms: u64,
}

impl ConnectArgs {
    fn connection(&self) -> anyhow::Result<SimulatedConnection> {
        let delay = Duration::from_millis(self.delay_ms);

        if let Some(url) = &self.url {
            let (config, credentials) = ConnectionConfig::from_url(url)?;
            let config = match &self.schema {
                Some(schema) => config.with_schema(schema),
                None => config,
            };
            return Ok(SimulatedConnection::new(
                config.with_connect_delay(delay),
                Some(credentials),
            ));
        }

        let platform = self
            .platform
            .context("--platform is required without --url")?;
        let mut config = ConnectionConfig::new(platform, &self.host).with_connect_delay(delay);
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(database) = &self.database {
            config = config.with_database(database);
        }
        if let Some(schema) = &self.schema {
            config = config.with_schema(schema);
        }
        let credentials = match &self.username {
            Some(user) => {
                config = config.with_username(user);
                Some(Credentials::new(user.clone(), None))
            }
            None => None,
        };
        Ok(SimulatedConnection::new(config, credentials))
    }
}

#[derive(Args)]
pub struct FileArgs {
    /// File to read
    pub file: PathBuf,
}

#[derive(Args)]
pub struct CompareArgs {
    #[arg(long, value_parser = parse_platform)]
    pub source: Platform,

    #[arg(long, value_parser = parse_platform)]
    pub target: Platform,

    /// Write the comparison to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub narrative: NarrativeArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    initialize_document_validator().context("Failed to initialize document validator")?;

    match &cli.command {
        Command::Platforms => {
            list_platforms();
            Ok(())
        }
        Command::Render(args) => render(args).await,
        Command::Connect(args) => connect(args).await,
        Command::Preview(args) => preview(&args.file).await,
        Command::Compare(args) => compare(args).await,
        Command::Validate(args) => validate(&args.file).await,
    }
}

fn list_platforms() {
    println!("Supported platforms:");
    for platform in Platform::ALL {
        println!("  {:<12} (default port {})", platform.to_string(), platform.default_port());
    }
}

async fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

async fn render(args: &RenderArgs) -> anyhow::Result<()> {
    let source = args.source();
    info!("Loading {}", source.describe());
    let doc = source.load().await?;

    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let formats = args.format.formats();
    let outcomes = export_all(Some(&doc), &formats, &args.options());

    let mut written = 0;
    for outcome in outcomes {
        match outcome.result {
            Ok(artifact) => {
                let path = write_file(&args.output_dir, &artifact.file_name, &artifact.bytes).await?;
                info!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
                println!("{} -> {}", artifact.format, path.display());
                written += 1;
            }
            Err(e) => println!("Notice: {} export failed: {}", outcome.format, e),
        }
    }

    if let Some(narrator) = args.narrative.narrator() {
        let narrative = narrative::collect_narrative(&narrator, &doc).await;
        write_narrative(&args.output_dir, &doc, &narrative).await?;
    }

    if written == 0 {
        bail!("No documentation could be generated for {}", doc.platform_name);
    }
    Ok(())
}

async fn write_narrative(
    dir: &Path,
    doc: &SchemaDocument,
    narrative: &Narrative,
) -> anyhow::Result<()> {
    for notice in &narrative.notices {
        println!("Notice: {}", notice);
    }
    if narrative.is_empty() {
        return Ok(());
    }
    let name = format!("{}_narrative.md", doc.file_stem());
    let path = write_file(dir, &name, narrative.to_markdown().as_bytes()).await?;
    println!("Narrative -> {}", path.display());
    Ok(())
}

async fn connect(args: &ConnectArgs) -> anyhow::Result<()> {
    let connection = args.connection()?;
    println!("Connecting to {}...", connection.config());

    let outcome = connection.connect().await?;
    println!("{}: {}", outcome.message, outcome.target);
    if !outcome.schema_extraction_available {
        println!("Schema extraction from live databases is not available; use `render --platform` or `render --input`");
    }
    Ok(())
}

async fn preview(path: &Path) -> anyhow::Result<()> {
    let preview = FileSource::new(path).preview().await?;

    println!("File: {} ({} bytes)", preview.file_name, preview.size_bytes);
    if preview.statement_counts.is_empty() {
        println!("No CREATE statements found");
    } else {
        println!("CREATE statements:");
        for (kind, count) in &preview.statement_counts {
            println!("  {:<10} {}", kind, count);
        }
    }
    println!();
    println!("{}", preview.excerpt);
    Ok(())
}

async fn compare(args: &CompareArgs) -> anyhow::Result<()> {
    let source = SampleSource::new(args.source).load().await?;
    let target = SampleSource::new(args.target).load().await?;
    let report = schemadoc::compare(&source, &target)?;

    let mut markdown = report.to_markdown();
    if let Some(narrator) = args.narrative.narrator() {
        let narrative = narrative::migration_narrative(&narrator, &[&source, &target]).await;
        for notice in &narrative.notices {
            println!("Notice: {}", notice);
        }
        for section in &narrative.sections {
            markdown.push_str(&format!("\n## {}\n\n{}\n", section.title, section.body.trim_end()));
        }
    }

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, markdown.as_bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Comparison -> {}", path.display());
        }
        None => print!("{}", markdown),
    }
    Ok(())
}

async fn validate(path: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = validate_and_parse_document(&content)
        .with_context(|| format!("{} is not a valid schema document", path.display()))?;

    println!(
        "{} is valid: {} document with {} tables, {} views, {} routines",
        path.display(),
        parsed.document.platform_name,
        parsed.document.tables.len(),
        parsed.document.views.len(),
        parsed.document.routines.len()
    );
    for warning in &parsed.warnings {
        println!("Warning: {}", warning);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_render_defaults() {
        let cli = Cli::parse_from(["schemadoc", "render", "--platform", "oracle"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.platform, Some(Platform::Oracle));
        assert_eq!(args.format, FormatArg::All);
        assert_eq!(args.format.formats().len(), 4);
        assert_eq!(args.options(), DocumentationOptions::default());
    }

    #[test]
    fn test_cli_render_option_toggles() {
        let cli = Cli::parse_from([
            "schemadoc",
            "render",
            "--input",
            "schema.json",
            "--format",
            "pdf",
            "--no-diagrams",
            "--no-security-analysis",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        let options = args.options();
        assert!(!options.er_diagrams);
        assert!(!options.security_analysis);
        assert!(options.data_dictionary);
        assert_eq!(args.format.formats(), vec![ExportFormat::Pdf]);
    }

    #[test]
    fn test_cli_render_requires_source() {
        assert!(Cli::try_parse_from(["schemadoc", "render"]).is_err());
        assert!(
            Cli::try_parse_from([
                "schemadoc", "render", "--platform", "oracle", "--input", "x.json"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_cli_connect_builds_config() {
        let cli = Cli::parse_from([
            "schemadoc",
            "connect",
            "--platform",
            "sql server",
            "--database",
            "ECommerceDB",
            "--username",
            "sa",
            "--delay-ms",
            "0",
        ]);
        let Command::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        let connection = args.connection().expect("connection");
        assert_eq!(connection.config().effective_port(), 1433);
        assert_eq!(connection.config().username.as_deref(), Some("sa"));
        assert_eq!(connection.config().connect_delay, Duration::ZERO);
    }
}
