//! mesh-header - mesh to C header exporter
//!
//! Reads an OBJ mesh and writes its attributes as statically initialized
//! C arrays.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mesh_header::{load_obj, write_mesh_header, ConstantStyle, ExportOptions, MissingLayerPolicy};
use std::path::{Path, PathBuf};
use tablegen_shared::c_identifier;

#[derive(Parser)]
#[command(name = "mesh-header")]
#[command(about = "Export mesh attributes as C arrays")]
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
    /// Export a mesh to a C header
    Export {
        /// Input OBJ file
        input: PathBuf,

        /// Output header (default: input with .h extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base name for arrays and constants (default: input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Omit the polygon index array
        #[arg(long)]
        no_indices: bool,

        /// Export the edge array
        #[arg(long)]
        edges: bool,

        /// Export per-vertex normals
        #[arg(long)]
        normals: bool,

        /// Export the first vertex color layer
        #[arg(long)]
        colors: bool,

        /// Export the first UV layer
        #[arg(long)]
        uvs: bool,

        /// Fan-triangulate polygons before export
        #[arg(long)]
        triangulate: bool,

        /// Skip requested layers the mesh does not have instead of failing
        #[arg(long)]
        skip_missing: bool,

        /// Declare counts as `const int` instead of `#define`
        #[arg(long)]
        const_int: bool,

        /// System header to include
        #[arg(long, default_value = "SDL_opengl.h")]
        include: String,

        /// Emit the "do not edit" banner
        #[arg(long)]
        banner: bool,

        /// Include guard macro (default: no guard)
        #[arg(long)]
        guard: Option<String>,
    },

    /// Print mesh statistics
    Info {
        /// Input OBJ file
        input: PathBuf,
    },
}

fn default_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    c_identifier(&stem)
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
        Commands::Export {
            input,
            output,
            name,
            no_indices,
            edges,
            normals,
            colors,
            uvs,
            triangulate,
            skip_missing,
            const_int,
            include,
            banner,
            guard,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("h"));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let mut mesh = load_obj(&input)?;
            if triangulate {
                mesh = mesh.triangulated();
            }

            let options = ExportOptions {
                name: name.unwrap_or_else(|| default_name(&input)),
                indices: !no_indices,
                edges,
                normals,
                colors,
                uvs,
                missing_layer: if skip_missing {
                    MissingLayerPolicy::Skip
                } else {
                    MissingLayerPolicy::Error
                },
                constants: if const_int {
                    ConstantStyle::ConstInt
                } else {
                    ConstantStyle::Define
                },
                include: (!include.is_empty()).then_some(include),
                banner,
                guard,
                ..ExportOptions::default()
            };
            write_mesh_header(&output, &mesh, &options)?;
            tracing::info!("Done!");
        }

        Commands::Info { input } => {
            let mesh = load_obj(&input)?;
            println!("{}", input.display());
            println!("  vertices: {}", mesh.vertex_count());
            println!("  polygons: {}", mesh.polygons.len());
            println!("  edges:    {}", mesh.edges.len());
            println!("  loops:    {}", mesh.loop_count());
            println!("  color layers: {}", mesh.color_layers.len());
            println!("  UV layers:    {}", mesh.uv_layers.len());
        }
    }

    Ok(())
}
