//! PolicyLens CLI
//!
//! Command-line interface for vendor policy analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a document set (mapping of category -> text)
//! policylens analyze --documents acme.yaml
//!
//! # Analyze a directory of <category>.txt files
//! policylens analyze --dir ./acme-docs --format json
//!
//! # Reproducible JSON report
//! policylens analyze --documents acme.json --format json --analyzed-at 2025-12-20T00:00:00Z
//!
//! # Inspect the pattern catalog
//! policylens catalog
//! ```
//!
//! ## Exit Codes
//!
//! - 0: Evidence found
//! - 1: No relevant information found
//! - 3: Error

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use policylens_core::{Analysis, DocumentCategory, DocumentSet, Facet, PatternCatalog, Scope};
use policylens_runtime::{
    DirectorySource, DocumentSource, RuntimeConfig, RuntimeOrchestrator, RuntimeResult,
    StaticSource,
};

/// PolicyLens: evidence-backed analysis of vendor AI policies
#[derive(Parser)]
#[command(name = "policylens")]
#[command(version)]
#[command(about = "Analyze vendor policy documents for AI data-handling commitments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a vendor's policy documents
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Runtime configuration file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Show evidence and authoritative sources
        #[arg(long)]
        explain: bool,

        /// Explicit timestamp for the report (ISO 8601 / RFC 3339).
        /// Example: --analyzed-at 2025-12-20T00:00:00Z
        #[arg(long, value_parser = parse_datetime)]
        analyzed_at: Option<DateTime<Utc>>,

        /// Run extractors one after another instead of concurrently
        #[arg(long)]
        sequential: bool,
    },

    /// List the pattern catalog
    Catalog,

    /// List the document categories
    Categories,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Document set file mapping category names to text (YAML or JSON)
    #[arg(short, long)]
    documents: Option<PathBuf>,

    /// Directory containing <category>.txt or <category>.md files
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Parse ISO 8601 / RFC 3339 datetime string to DateTime<Utc>.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid datetime format: {}. Expected RFC 3339 (e.g., 2025-12-20T00:00:00Z)", e))
}

fn main() -> ExitCode {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(3)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            format,
            explain,
            analyzed_at,
            sequential,
        } => analyze_command(input, config, format, explain, analyzed_at, sequential),
        Commands::Catalog => catalog_command(),
        Commands::Categories => categories_command(),
    }
}

fn analyze_command(
    input: InputArgs,
    config_path: Option<PathBuf>,
    format: OutputFormat,
    explain: bool,
    analyzed_at: Option<DateTime<Utc>>,
    sequential: bool,
) -> Result<ExitCode> {
    let mut config = match &config_path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => RuntimeConfig::default(),
    };
    if analyzed_at.is_some() {
        config.determinism.analyzed_at = analyzed_at;
    }
    if sequential {
        config.parallel = false;
    }

    let source: Arc<dyn DocumentSource> = match (input.documents, input.dir) {
        (Some(path), _) => {
            let docs = DocumentSet::from_file(&path)
                .with_context(|| format!("Failed to load documents from {:?}", path))?;
            Arc::new(StaticSource::from_documents(path.display().to_string(), &docs))
        }
        (None, Some(dir)) => Arc::new(
            DirectorySource::new(&dir)
                .with_context(|| format!("Failed to open document directory {:?}", dir))?,
        ),
        (None, None) => anyhow::bail!("either --documents or --dir is required"),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let orchestrator = RuntimeOrchestrator::new(config);
    let result = runtime
        .block_on(orchestrator.analyze_source(source))
        .context("Analysis failed")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text_result(&result, explain),
    }

    Ok(if result.analysis.has_evidence() {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    })
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Snake-case form of an optional fact, matching the JSON output.
fn unknown_or<T: Serialize>(value: Option<T>) -> String {
    match value.map(serde_json::to_value) {
        Some(Ok(serde_json::Value::String(s))) => s,
        Some(Ok(other)) => other.to_string(),
        _ => "unknown".to_string(),
    }
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("{}: none", label);
    } else {
        println!("{}: {}", label, items.join(", "));
    }
}

fn print_text_result(result: &RuntimeResult, explain: bool) {
    let analysis: &Analysis = &result.analysis;

    println!("Source: {}", result.source);
    println!("Analyzed at: {}", result.analyzed_at.to_rfc3339());
    let covered: Vec<&str> = analysis
        .document_coverage
        .iter()
        .filter(|(_, covered)| **covered)
        .map(|(category, _)| category.as_str())
        .collect();
    println!("Documents: {}", covered.join(", "));
    if !result.failed_categories.is_empty() {
        let failed: Vec<&str> = result.failed_categories.iter().map(|c| c.as_str()).collect();
        println!("Failed to fetch: {}", failed.join(", "));
    }
    println!();

    println!("Opt-out");
    println!("  Available: {}", yes_no(analysis.opt_out_available));
    println!("  Enterprise: {}", yes_no(analysis.enterprise_opt_out));
    println!("  Method: {}", unknown_or(analysis.opt_out_method));
    println!("  Granularity: {}", unknown_or(analysis.opt_out_granularity));
    println!();

    println!("AI implementation");
    let native = match analysis.native_ai {
        Some(true) => "native",
        Some(false) => "third-party",
        None => "unknown",
    };
    println!("  Native AI: {}", native);
    print_list("  Providers", &analysis.third_party_providers);
    print_list("  Features", &analysis.ai_features);
    println!();

    println!("Data usage");
    println!("  Retention: {}", yes_no(analysis.data_retention));
    if let Some(period) = &analysis.retention_period {
        println!("  Retention period: {}", period);
    }
    println!("  Model training: {}", yes_no(analysis.model_training));
    println!("  Model sharing: {}", yes_no(analysis.model_sharing));
    if let Some(limitations) = &analysis.model_sharing_limitations {
        println!("  Sharing limitations: {}", limitations);
    }
    println!();

    println!("Protections");
    println!("  Contractual: {}", yes_no(analysis.contractual_protections));
    if let Some(details) = &analysis.contractual_details {
        println!("  Details: {}", details);
    }
    println!("  GDPR: {}", unknown_or(analysis.gdpr_compliant));
    println!("  CCPA: {}", unknown_or(analysis.ccpa_compliant));
    print_list("  Security measures", &analysis.security_measures);
    print_list("  Certifications", &analysis.security_certifications);
    println!("  Ethical considerations: {}", analysis.ethical_considerations.len());
    println!();

    if analysis.concerns.is_empty() {
        println!("Concerns: none");
    } else {
        println!("Concerns:");
        for (i, concern) in analysis.concerns.iter().enumerate() {
            println!("  {}. {}", i + 1, concern);
        }
    }
    println!();

    println!("Confidence:");
    for facet in Facet::ALL {
        let value = analysis.confidence(facet);
        if value > 0.0 {
            println!("  {}: {:.0}%", facet, value * 100.0);
        }
    }

    if explain {
        println!();
        println!("--- Evidence ---");
        println!();
        for (signal, items) in &analysis.evidence {
            println!("{}:", signal);
            for item in items {
                println!("  - {}: \"{}\"", item.pointer, item.context);
            }
        }

        if !analysis.authoritative_sources.is_empty() {
            println!();
            println!("--- Authoritative Sources ---");
            println!();
            for (facet, category) in &analysis.authoritative_sources {
                println!("  {}: {}", facet, category);
            }
        }
    }
}

fn catalog_command() -> Result<ExitCode> {
    for rule in PatternCatalog::global().rules() {
        let categories = match rule.scope {
            Scope::Any => "any".to_string(),
            Scope::Categories(categories) => categories
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        let facets = if rule.facets.is_empty() {
            "-".to_string()
        } else {
            rule.facets
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        println!("{}: {}", rule.signal, rule.description);
        println!("  categories: {}", categories);
        println!("  relevance: {:?}", rule.relevance);
        println!("  facets: {}", facets);
    }

    Ok(ExitCode::from(0))
}

fn categories_command() -> Result<ExitCode> {
    for category in DocumentCategory::ALL {
        println!("{}", category);
    }
    Ok(ExitCode::from(0))
}
