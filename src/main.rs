//! ESPv2 OpenAPI Generator - Command-line tool for generating the gateway Swagger document.
//!
//! Reads a gateway configuration file (project id, backend services, extra routes) and
//! writes the Swagger 2.0 document the ESPv2 gateway is provisioned with.
//!
//! # Usage
//!
//! ```bash
//! espv2-openapi [OPTIONS] <CONFIG>
//! ```
//!
//! # Examples
//!
//! Generate YAML to a file:
//! ```bash
//! espv2-openapi gateway.yaml -o openapi.yaml
//! ```
//!
//! Generate JSON with verbose logging:
//! ```bash
//! espv2-openapi gateway.yaml -f json -v
//! ```

use anyhow::Result;
use clap::Parser;
use espv2_openapi::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("ESPv2 OpenAPI Generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Gateway document generation completed successfully");

    Ok(())
}
