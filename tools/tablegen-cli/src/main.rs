//! tablegen - generated header build tool
//!
//! Builds the pitch table and mesh headers declared in tablegen.toml.

mod generate;
mod manifest;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tablegen")]
#[command(about = "Build generated C headers from a tablegen.toml manifest")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every header in the manifest
    Build {
        /// Path to tablegen.toml manifest
        #[arg(default_value = "tablegen.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the manifest and report headers that are out of date
    Check {
        /// Path to tablegen.toml manifest
        #[arg(default_value = "tablegen.toml")]
        manifest: PathBuf,
    },
}

fn manifest_dir(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building headers from {:?}", manifest);
            let base_dir = manifest_dir(&manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config, &base_dir)?;

            let headers = generate::render_all(&config, &base_dir, output.as_deref())?;
            generate::write_all(&headers)?;
            tracing::info!("Build complete! {} headers", headers.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let base_dir = manifest_dir(&manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config, &base_dir)?;

            let headers = generate::render_all(&config, &base_dir, None)?;
            let stale = generate::stale_headers(&headers);
            for path in &stale {
                println!("✗ out of sync: {}", path.display());
            }
            if !stale.is_empty() {
                anyhow::bail!(
                    "{} of {} headers are out of sync. Run 'tablegen build' to regenerate.",
                    stale.len(),
                    headers.len()
                );
            }
            println!("✓ All {} headers are in sync!", headers.len());
        }
    }

    Ok(())
}
