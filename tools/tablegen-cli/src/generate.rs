//! Rendering and writing every header a manifest declares

use anyhow::{Context, Result};
use mesh_header::{export_mesh, load_obj, ExportOptions};
use pitch_table::{generate, render_table, TableStyle};
use std::path::{Path, PathBuf};
use tablegen_shared::c_identifier;

use crate::manifest::{Manifest, MeshEntry, PitchTableSection};

/// One rendered header and where it belongs
#[derive(Debug)]
pub struct GeneratedHeader {
    pub path: PathBuf,
    pub text: String,
}

fn render_pitch_table(section: &PitchTableSection, banner: bool) -> Result<String> {
    let style = TableStyle {
        c_type: section.c_type.clone(),
        identifier: section.identifier.clone(),
        prefix: section.prefix.clone(),
        banner,
        guard: section.guard.clone(),
    };
    let table = generate(section.dims()?);
    Ok(render_table(&table, &style)?)
}

fn render_mesh(entry: &MeshEntry, base_dir: &Path, banner: bool) -> Result<String> {
    let input = base_dir.join(&entry.input);
    let mut mesh = load_obj(&input)?;
    if entry.triangulate {
        mesh = mesh.triangulated();
    }

    let name = match &entry.name {
        Some(name) => name.clone(),
        None => c_identifier(&entry.input.file_stem().unwrap_or_default().to_string_lossy()),
    };

    let defaults = ExportOptions::default();
    let include = match &entry.include {
        Some(include) if include.is_empty() => None,
        Some(include) => Some(include.clone()),
        None => defaults.include.clone(),
    };

    let options = ExportOptions {
        name,
        indices: entry.indices,
        edges: entry.edges,
        normals: entry.normals,
        colors: entry.colors,
        uvs: entry.uvs,
        missing_layer: entry.missing_layer,
        constants: entry.constants,
        include,
        banner,
        guard: entry.guard.clone(),
        ..defaults
    };

    let summary = export_mesh(&mesh, &options)
        .with_context(|| format!("Failed to export {}", input.display()))?;
    Ok(summary.header)
}

/// Render every header in memory.
///
/// `output_dir` overrides the manifest's output directory.
pub fn render_all(
    manifest: &Manifest,
    base_dir: &Path,
    output_dir: Option<&Path>,
) -> Result<Vec<GeneratedHeader>> {
    let out_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => match &manifest.output.dir {
            Some(dir) => base_dir.join(dir),
            None => base_dir.to_path_buf(),
        },
    };
    let banner = manifest.output.banner;

    let mut headers = Vec::new();

    if let Some(section) = &manifest.pitch_table {
        headers.push(GeneratedHeader {
            path: out_dir.join(&section.output),
            text: render_pitch_table(section, banner)?,
        });
    }

    for entry in &manifest.meshes {
        headers.push(GeneratedHeader {
            path: out_dir.join(entry.output_path()),
            text: render_mesh(entry, base_dir, banner)?,
        });
    }

    Ok(headers)
}

/// Write every rendered header, creating parent directories as needed
pub fn write_all(headers: &[GeneratedHeader]) -> Result<()> {
    for header in headers {
        if let Some(parent) = header.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&header.path, &header.text)
            .with_context(|| format!("Failed to write {}", header.path.display()))?;
        tracing::info!("Generated {}", header.path.display());
    }
    Ok(())
}

/// Compare rendered headers with the files on disk; returns the stale paths
pub fn stale_headers(headers: &[GeneratedHeader]) -> Vec<&Path> {
    headers
        .iter()
        .filter(|header| match std::fs::read_to_string(&header.path) {
            Ok(existing) => existing != header.text,
            Err(_) => true,
        })
        .map(|header| header.path.as_path())
        .collect()
}
