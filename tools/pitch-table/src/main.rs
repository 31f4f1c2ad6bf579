//! pitch-table - bit-position table generator
//!
//! Writes the pitch table as a C header, checks an existing header is in
//! sync, or prints the column grid of a header.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pitch_table::{
    generate, parse_table, render_table, write_table, PitchTable, TableDimensions, TableStyle,
    DEFAULT_COLS, DEFAULT_ROWS,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pitch-table")]
#[command(about = "Generate the bit-position pitch table header")]
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
    /// Generate the header
    Generate {
        #[command(flatten)]
        table: TableArgs,

        /// Output header path
        #[arg(short, long, default_value = "pitchtable.h")]
        output: PathBuf,

        /// Print the column grid of every row
        #[arg(long)]
        grid: bool,
    },

    /// Check that an existing header matches a fresh generation
    Check {
        /// Header to compare against
        header: PathBuf,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Print the dimensions and column grid of an existing header
    Inspect {
        /// Header to read
        header: PathBuf,

        /// Array identifier
        #[arg(long, default_value = "pitchTable")]
        identifier: String,

        /// Prefix of the _ROWS/_COLS defines
        #[arg(long, default_value = "PITCH_TABLE")]
        prefix: String,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Number of rows
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u32,

    /// Number of columns (power of two, at most 64)
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: u32,

    /// Array identifier
    #[arg(long, default_value = "pitchTable")]
    identifier: String,

    /// Prefix of the _ROWS/_COLS defines
    #[arg(long, default_value = "PITCH_TABLE")]
    prefix: String,

    /// C element type
    #[arg(long, default_value = "unsigned long")]
    c_type: String,

    /// Emit the "do not edit" banner
    #[arg(long)]
    banner: bool,

    /// Include guard macro (default: no guard)
    #[arg(long)]
    guard: Option<String>,
}

impl TableArgs {
    fn dims(&self) -> Result<TableDimensions> {
        Ok(TableDimensions::new(self.rows, self.cols)?)
    }

    fn style(&self) -> TableStyle {
        TableStyle {
            c_type: self.c_type.clone(),
            identifier: self.identifier.clone(),
            prefix: self.prefix.clone(),
            banner: self.banner,
            guard: self.guard.clone(),
        }
    }
}

fn print_grid(table: &PitchTable) {
    for row in table.grid() {
        let cells: Vec<String> = row.iter().map(u8::to_string).collect();
        println!("[{}]", cells.join(", "));
    }
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
        Commands::Generate {
            table,
            output,
            grid,
        } => {
            let generated = generate(table.dims()?);
            if grid {
                print_grid(&generated);
            }
            write_table(&output, &generated, &table.style())?;
        }

        Commands::Check { header, table } => {
            let fresh = render_table(&generate(table.dims()?), &table.style())?;
            let existing = std::fs::read_to_string(&header)
                .with_context(|| format!("Failed to read {}", header.display()))?;

            if fresh != existing {
                anyhow::bail!(
                    "{} is out of sync. Run 'pitch-table generate' to regenerate.",
                    header.display()
                );
            }
            tracing::info!("{} is in sync", header.display());
        }

        Commands::Inspect {
            header,
            identifier,
            prefix,
        } => {
            let text = std::fs::read_to_string(&header)
                .with_context(|| format!("Failed to read {}", header.display()))?;
            let style = TableStyle {
                identifier,
                prefix,
                ..TableStyle::default()
            };
            let table = parse_table(&text, &style)
                .with_context(|| format!("Failed to parse {}", header.display()))?;

            println!(
                "{}: {} rows x {} columns",
                header.display(),
                table.dims().rows(),
                table.dims().cols()
            );
            print_grid(&table);

            if table != generate(table.dims()) {
                tracing::warn!("table contents differ from the generated placement order");
            }
        }
    }

    Ok(())
}
