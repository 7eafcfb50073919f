//! RAML API Docs CLI
//!
//! Converts RAML definitions to OpenAPI 2.0 locally, using the same
//! conversion pipeline as the documentation widget.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use raml_api_docs_common::{ParserConfig, PluginConfig, RamlVersion};
use raml_api_docs_parser::RamlParser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "raml-api-docs")]
#[command(version, about = "Convert RAML 0.8/1.0 definitions to OpenAPI 2.0", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a RAML definition to OpenAPI 2.0 JSON
    #[command(after_help = "EXAMPLES:\n  \
        # Convert, detecting the version from the header\n  \
        raml-api-docs convert --spec api.raml\n\n  \
        # Force the RAML 0.8 grammar and write to a file\n  \
        raml-api-docs convert --spec legacy.raml --version 0.8 --output swagger.json\n\n  \
        # Use plugin configuration\n  \
        raml-api-docs convert --spec api.raml --config raml-docs.yaml")]
    Convert {
        /// Path to the RAML file
        #[arg(short, long)]
        spec: PathBuf,

        /// RAML version, "0.8" or "1.0" (detected from the header if not specified)
        #[arg(long)]
        version: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Plugin configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the RAML version a definition declares
    Detect {
        /// Path to the RAML file
        #[arg(short, long)]
        spec: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            spec,
            version,
            output,
            config,
        } => {
            convert_command(
                spec.as_path(),
                version.as_deref(),
                output.as_deref(),
                config.as_deref(),
                cli.verbose,
            )
            .await?;
        }
        Commands::Detect { spec } => {
            detect_command(spec.as_path())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn convert_command(
    spec_path: &Path,
    version: Option<&str>,
    output: Option<&Path>,
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    // status goes to stderr so stdout carries only the document
    eprintln!("{} Converting RAML file: {}", "→".cyan(), spec_path.display());

    let definition = read_definition(spec_path)?;
    let config = load_config(config_path)?;

    let version = resolve_version(&definition, version)?;
    if verbose {
        eprintln!("  Version: {}", version);
        eprintln!("  Cache enabled: {}", config.conversion.cache_enabled);
    }

    let parser = RamlParser::from_settings(&config.conversion);
    let openapi = parser
        .parse(&definition, &ParserConfig::new(version))
        .await
        .with_context(|| format!("Failed to convert RAML {} definition", version))?;

    match output {
        Some(path) => {
            std::fs::write(path, &openapi)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("\n{}", "✓ Conversion complete!".green().bold());
            eprintln!("  📄 {}", path.display());
        }
        None => {
            println!("{}", openapi);
            eprintln!("{} Converted RAML {}", "✓".green(), version.to_string().yellow());
        }
    }

    Ok(())
}

fn detect_command(spec_path: &Path) -> Result<()> {
    let definition = read_definition(spec_path)?;
    let version = RamlVersion::detect(&definition);

    let declared = definition.lines().next().unwrap_or_default().trim();
    if declared.starts_with("#%RAML") {
        println!("{} Declared header: {}", "→".cyan(), declared);
    } else {
        println!(
            "{} No RAML header found, assuming {}",
            "!".yellow(),
            version.header()
        );
    }
    println!("{} RAML {}", "✓".green(), version.to_string().yellow().bold());

    Ok(())
}

fn read_definition(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<PluginConfig> {
    match path {
        Some(path) => PluginConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PluginConfig::default()),
    }
}

/// Explicit version if given, otherwise the one the header declares
fn resolve_version(definition: &str, explicit: Option<&str>) -> Result<RamlVersion> {
    match explicit {
        Some(v) => v.parse::<RamlVersion>().context("Invalid --version"),
        None => Ok(RamlVersion::detect(definition)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_version_detects_header() {
        let version = resolve_version("#%RAML 0.8\ntitle: T", None).unwrap();
        assert_eq!(version, RamlVersion::V08);

        let version = resolve_version("title: T", None).unwrap();
        assert_eq!(version, RamlVersion::V10);
    }

    #[test]
    fn test_resolve_version_explicit_overrides_header() {
        let version = resolve_version("#%RAML 0.8\ntitle: T", Some("1.0")).unwrap();
        assert_eq!(version, RamlVersion::V10);
    }

    #[test]
    fn test_resolve_version_rejects_unknown() {
        let err = resolve_version("title: T", Some("2.0")).unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported RAML version: 2.0"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "conversion:\n  cache_enabled: false").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(!config.conversion.cache_enabled);
        assert_eq!(config.widget.raml_type, "raml");

        assert_eq!(load_config(None).unwrap(), PluginConfig::default());
    }

    #[tokio::test]
    async fn test_convert_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("api.raml");
        let output = dir.path().join("swagger.json");
        std::fs::write(&spec, "#%RAML 1.0\ntitle: Files\n/files:\n  get:\n").unwrap();

        convert_command(&spec, None, Some(&output), None, false)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"swagger\": \"2.0\""));
        assert!(written.contains("/files"));
    }
}
