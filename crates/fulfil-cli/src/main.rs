//! # fulfil-cli
//!
//! Command-line front end for the item fulfillment registration engine.
//!
//! `validate` checks a request payload against the schema registry,
//! `register` runs the full registration against a fixture-backed host and
//! `schema` dumps the registry in use.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fulfil_host::MemoryHost;
use fulfil_pipeline::{FulfillmentService, ServiceConfig};
use fulfil_schema::{SchemaLoader, SchemaRegistry, fulfillment_registry};
use fulfil_validation::{ValidationEngine, ValidationReporter};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fulfil")]
#[command(about = "Item fulfillment registration engine CLI")]
#[command(version)]
struct Cli {
    /// Path to a service configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a request payload against the schema registry
    Validate {
        /// Request JSON file
        request: PathBuf,

        /// Schema file replacing the configured registry
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Root schema name
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Register a fulfillment against a fixture-backed host
    Register {
        /// Request JSON file
        request: PathBuf,

        /// Host fixture JSON file
        #[arg(long)]
        host: PathBuf,

        /// Have the host number saved records as <prefix><id>
        #[arg(long, value_name = "PREFIX")]
        auto_number: Option<String>,
    },

    /// Print the schema registry
    Schema {
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    match cli.command {
        Commands::Validate {
            request,
            schema,
            root,
        } => validate(&config, &request, schema.as_deref(), root.as_deref()),
        Commands::Register {
            request,
            host,
            auto_number,
        } => register(config, &request, &host, auto_number),
        Commands::Schema { format } => print_schema(&config, format),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn validate(
    config: &ServiceConfig,
    request: &Path,
    schema: Option<&Path>,
    root: Option<&str>,
) -> Result<ExitCode> {
    let registry = load_registry(schema.or(config.schema_file.as_deref()))?;
    let root = root.unwrap_or(&config.root_schema);
    let payload = read_json(request)?;

    info!(request = %request.display(), root, "Validating request");
    let result =
        ValidationEngine::with_config(&registry, config.validation()).validate(&payload, root);

    if result.is_valid {
        println!("{}: valid", request.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{}",
            ValidationReporter::summarize(&request.display().to_string(), &result.errors)
        );
        Ok(ExitCode::FAILURE)
    }
}

fn register(
    config: ServiceConfig,
    request: &Path,
    host: &Path,
    auto_number: Option<String>,
) -> Result<ExitCode> {
    let mut memory = MemoryHost::load_fixture(host)
        .with_context(|| format!("failed to load host fixture {}", host.display()))?;
    if let Some(prefix) = auto_number {
        memory = memory.with_auto_number(prefix);
    }

    let payload = read_json(request)?;
    let service = FulfillmentService::with_config(memory, config)?;

    info!(request = %request.display(), host = %host.display(), "Registering fulfillment");
    let response = service.register(&payload);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_schema(config: &ServiceConfig, format: Format) -> Result<ExitCode> {
    let registry = load_registry(config.schema_file.as_deref())?;
    let cycles = registry.find_cycles();
    if !cycles.is_empty() {
        warn!(schemas = ?cycles, "Schemas reference themselves through itemSchema");
    }
    let text = match format {
        Format::Yaml => SchemaLoader::to_yaml(&registry)?,
        Format::Json => SchemaLoader::to_json(&registry)?,
    };
    println!("{text}");
    Ok(ExitCode::SUCCESS)
}

fn load_registry(schema: Option<&Path>) -> Result<SchemaRegistry> {
    match schema {
        Some(path) => {
            debug!(schema = %path.display(), "Loading schema file");
            SchemaLoader::default()
                .load_from_file(path)
                .with_context(|| format!("failed to load schema {}", path.display()))
        }
        None => Ok(fulfillment_registry()),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
