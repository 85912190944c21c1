use crate::config::GatewayConfig;
use crate::openapi_builder::OpenApiBuilder;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// ESPv2 OpenAPI Generator - Generate the gateway Swagger document from a route configuration
#[derive(Parser, Debug)]
#[command(name = "espv2-openapi")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the gateway configuration file (YAML or JSON)
    #[arg(value_name = "CONFIG")]
    pub config_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.config_path.exists() {
        anyhow::bail!("Config file does not exist: {}", args.config_path.display());
    }

    if !args.config_path.is_file() {
        anyhow::bail!("Config path is not a file: {}", args.config_path.display());
    }

    info!("Config file: {}", args.config_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Validate `config` and render the gateway document it describes.
pub fn render(config: &GatewayConfig, format: OutputFormat) -> Result<String> {
    config.validate()?;

    let routes = config.route_table();
    if routes.is_empty() {
        log::warn!("No routes configured; the document will have an empty paths section");
    }

    let mut builder = OpenApiBuilder::new(config.service_name(), config.project_id.as_str());
    if let Some(info) = &config.info {
        builder = builder.with_info(info.clone());
    }
    builder.add_routes(&routes);
    let document = builder.build();
    info!(
        "Gateway document built: {} path(s), {} operation(s)",
        document.paths.len(),
        document.operation_count()
    );

    info!("Serializing to {:?} format...", format);
    match format {
        OutputFormat::Yaml => serialize_yaml(&document),
        OutputFormat::Json => serialize_json(&document),
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting gateway document generation...");

    let config = GatewayConfig::from_file(&args.config_path)
        .with_context(|| format!("Failed to load config: {}", args.config_path.display()))?;
    debug!("Loaded config: {:?}", config);

    let content = render(&config, args.output_format)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote gateway document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("  - Project: {}", config.project_id);
    info!("  - Service: {}", config.service_name());

    Ok(())
}
