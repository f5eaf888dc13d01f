//! Swagger generator - command-line tool for documenting an application's API.
//!
//! Reads an application manifest describing models, request types and routes,
//! and writes one Swagger 2.0 document per configured API version.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-models [OPTIONS] <MANIFEST>
//! ```
//!
//! # Examples
//!
//! Print the JSON document of every version:
//! ```bash
//! swagger-from-models app.yaml
//! ```
//!
//! Write the YAML document of version 2.0.0 into `public/`:
//! ```bash
//! swagger-from-models app.yaml --format yaml --api-version 2.0.0 -o public
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_models::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger generator starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
