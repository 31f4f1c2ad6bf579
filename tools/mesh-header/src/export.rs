//! Mesh header writer

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tablegen_shared::{camel_case, upper_snake, CArray, CHeader, CValue};

use crate::mesh::{Attribute, Mesh};
use crate::ExportError;

/// What to do when a requested color/UV layer does not exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingLayerPolicy {
    /// Fail the export
    #[default]
    Error,
    /// Leave the array out and log a warning
    Skip,
}

/// How element counts are declared after each array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstantStyle {
    /// `#define NAME_NUM_VERTEX n` plus a byte-size define
    #[default]
    Define,
    /// `const int VERTICES = n;`, never prefixed with the mesh name
    ConstInt,
}

/// Export configuration
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Base name for arrays and constants; empty gives unprefixed names
    pub name: String,
    pub indices: bool,
    pub edges: bool,
    pub normals: bool,
    pub colors: bool,
    pub uvs: bool,
    pub missing_layer: MissingLayerPolicy,
    pub constants: ConstantStyle,
    /// System include written at the top (`<SDL_opengl.h>`)
    pub include: Option<String>,
    pub float_type: String,
    pub index_type: String,
    pub banner: bool,
    /// Wrap the header in `#ifndef` / `#endif`
    pub guard: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            name: "mesh".to_string(),
            indices: true,
            edges: false,
            normals: false,
            colors: false,
            uvs: false,
            missing_layer: MissingLayerPolicy::Error,
            constants: ConstantStyle::Define,
            include: Some("SDL_opengl.h".to_string()),
            float_type: "GLfloat".to_string(),
            index_type: "GLuint".to_string(),
            banner: false,
            guard: None,
        }
    }
}

impl ExportOptions {
    fn array_name(&self, attribute: Attribute) -> String {
        if self.name.is_empty() {
            // "VertexData" -> "vertexData"
            camel_case(attribute.array_suffix(), "")
        } else {
            camel_case(&self.name, attribute.array_suffix())
        }
    }

    fn constant_name(&self, base: &str) -> String {
        let prefix = upper_snake(&self.name);
        if self.name.is_empty() {
            base.to_string()
        } else {
            format!("{}_{}", prefix, base)
        }
    }
}

/// Result of a successful export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub header: String,
    /// Element count of every written array, in output order
    pub arrays: Vec<(Attribute, usize)>,
    /// Requested layers left out under [`MissingLayerPolicy::Skip`]
    pub skipped: Vec<Attribute>,
}

impl ExportSummary {
    pub fn count(&self, attribute: Attribute) -> Option<usize> {
        self.arrays
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|&(_, count)| count)
    }
}

fn float_rows<const N: usize>(values: &[[f32; N]]) -> Vec<Vec<CValue>> {
    values
        .iter()
        .map(|v| v.iter().map(|&x| CValue::Float(x)).collect())
        .collect()
}

fn index_rows<'a>(rows: impl Iterator<Item = &'a [u32]>) -> Vec<Vec<CValue>> {
    rows.map(|r| r.iter().map(|&i| CValue::Int(i64::from(i))).collect())
        .collect()
}

/// Render the header for `mesh`.
///
/// The vertex array is always written; the others follow in index, edge,
/// normal, color, UV order when enabled.
pub fn export_mesh(mesh: &Mesh, options: &ExportOptions) -> Result<ExportSummary, ExportError> {
    mesh.validate()?;

    let mut arrays: Vec<(Attribute, &str, Vec<Vec<CValue>>)> = Vec::new();
    let mut skipped = Vec::new();
    let float_type = options.float_type.as_str();
    let index_type = options.index_type.as_str();

    arrays.push((Attribute::Vertex, float_type, float_rows(&mesh.positions)));

    if options.indices {
        let rows = index_rows(mesh.polygons.iter().map(Vec::as_slice));
        arrays.push((Attribute::Index, index_type, rows));
    }

    if options.edges {
        let rows = index_rows(mesh.edges.iter().map(|e| e.as_slice()));
        arrays.push((Attribute::Edge, index_type, rows));
    }

    if options.normals {
        let normals = if mesh.normals.is_empty() {
            mesh.compute_normals()
        } else {
            mesh.normals.clone()
        };
        arrays.push((Attribute::Normal, float_type, float_rows(&normals)));
    }

    let mut layer = |attribute: Attribute, present: bool| -> Result<bool, ExportError> {
        if present {
            return Ok(true);
        }
        match options.missing_layer {
            MissingLayerPolicy::Error => Err(ExportError::MissingAttributeLayer(attribute)),
            MissingLayerPolicy::Skip => {
                tracing::warn!("Mesh has no {} layer, skipping", attribute);
                skipped.push(attribute);
                Ok(false)
            }
        }
    };

    if options.colors && layer(Attribute::Color, !mesh.color_layers.is_empty())? {
        if mesh.color_layers.len() > 1 {
            tracing::debug!("Using first of {} color layers", mesh.color_layers.len());
        }
        arrays.push((Attribute::Color, float_type, float_rows(&mesh.color_layers[0])));
    }

    if options.uvs && layer(Attribute::Uv, !mesh.uv_layers.is_empty())? {
        if mesh.uv_layers.len() > 1 {
            tracing::debug!("Using first of {} UV layers", mesh.uv_layers.len());
        }
        arrays.push((Attribute::Uv, float_type, float_rows(&mesh.uv_layers[0])));
    }

    let mut header = if options.banner {
        CHeader::with_banner("tools/mesh-header")?
    } else {
        CHeader::new()
    };
    if let Some(guard) = &options.guard {
        header.guard(guard)?;
    }
    header.blank_line()?;
    if let Some(include) = &options.include {
        header.include(include)?;
        header.blank_line()?;
    }

    let mut counts = Vec::new();
    for (attribute, c_type, rows) in arrays {
        let array = CArray::new(c_type, options.array_name(attribute)).with_rows(rows);
        let count = array.element_count();
        header.array(&array)?;

        match options.constants {
            ConstantStyle::Define => {
                let num = options.constant_name(&format!("NUM_{}", attribute.define_name()));
                let size = options.constant_name(&format!("{}_DATA_SIZE", attribute.define_name()));
                header.define(&num, count)?;
                header.define(&size, format!("({} * sizeof({}))", num, c_type))?;
            }
            ConstantStyle::ConstInt => {
                header.const_int(attribute.const_name(), count)?;
            }
        }
        header.blank_line()?;

        counts.push((attribute, count));
    }

    Ok(ExportSummary {
        header: header.finish()?,
        arrays: counts,
        skipped,
    })
}

/// Export `mesh` and write the header to `path`.
///
/// Nothing is written if the export fails.
pub fn write_mesh_header(path: &Path, mesh: &Mesh, options: &ExportOptions) -> Result<ExportSummary> {
    let summary = export_mesh(mesh, options).context("Failed to export mesh")?;
    std::fs::write(path, &summary.header)
        .with_context(|| format!("Failed to write mesh header to {}", path.display()))?;

    let counts: Vec<String> = summary
        .arrays
        .iter()
        .map(|(attribute, count)| format!("{}={}", attribute.define_name(), count))
        .collect();
    tracing::info!("Wrote {} ({})", path.display(), counts.join(", "));

    Ok(summary)
}
