use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger generator - document an application's routes and models as a Swagger 2.0 file
#[derive(Parser, Debug)]
#[command(name = "swagger-from-models")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the application manifest (JSON or YAML)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Output format (json or yaml)
    #[arg(long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// API version to document (all configured versions if not specified)
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,

    /// Only document routes starting with this prefix, such as /api or /v2/api
    #[arg(short = 'f', long = "filter", value_name = "PREFIX")]
    pub filter: Option<String>,

    /// Directory the swagger-<version>.<format> files are written to (stdout if not specified)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.is_file() {
        anyhow::bail!(
            "Manifest does not exist or is not a file: {}",
            args.manifest_path.display()
        );
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.api_version {
        Some(version) => info!("API version: {}", version),
        None => info!("API version: all"),
    }
    if let Some(ref filter) = args.filter {
        info!("Route filter: {}", filter);
    }
    if let Some(ref output) = args.output_dir {
        info!("Output directory: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::manifest::Manifest;
    use crate::serializer::{serialize, swagger_file_name, write_to_file};
    use crate::swagger_builder::SwaggerBuilder;

    info!("Loading manifest...");
    let manifest = Manifest::load(&args.manifest_path)
        .with_context(|| format!("Failed to load manifest {}", args.manifest_path.display()))?;
    let application = manifest.application()?;
    info!(
        "Loaded {} models and {} routes",
        application.registry.len(),
        application.routes.len()
    );

    let versions = match &args.api_version {
        Some(version) => vec![manifest.version(version)?],
        None => manifest.versions(),
    };

    for config in &versions {
        info!("Generating Swagger document for version {}...", config.app_version);

        let document = SwaggerBuilder::new(config, &application)
            .with_filter(args.filter.clone())
            .build()
            .with_context(|| {
                format!("Failed to generate document for version {}", config.app_version)
            })?;

        info!(
            "  - Paths: {}, definitions: {}",
            document.paths.len(),
            document.definitions.len()
        );

        let content = serialize(&document, args.output_format)?;

        if let Some(output_dir) = &args.output_dir {
            let path = output_dir.join(swagger_file_name(&config.app_version, args.output_format));
            write_to_file(&content, &path)?;
            info!("Successfully wrote Swagger document to {}", path.display());
        } else {
            println!("{}", content);
        }
    }

    info!("Generation complete! Documented {} version(s)", versions.len());

    Ok(())
}
