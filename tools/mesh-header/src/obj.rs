//! OBJ mesh source
//!
//! Vertices stay shared between faces. Supported statements:
//! `v x y z [r g b [a]]`, `vt`, `vn`, `f` (any of `v`, `v/vt`, `v/vt/vn`,
//! `v//vn`, negative indices relative to the end) and `l` for loose edges.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::mesh::Mesh;

/// One face corner: vertex, texture coordinate, normal
type Corner = (u32, Option<usize>, Option<usize>);

/// Load an OBJ file
pub fn load_obj(input: &Path) -> Result<Mesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let mesh = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    tracing::debug!(
        "Loaded {:?}: {} vertices, {} polygons, {} edges",
        input,
        mesh.vertex_count(),
        mesh.polygons.len(),
        mesh.edges.len()
    );
    Ok(mesh)
}

/// Parse OBJ text into a mesh
pub fn parse_obj(reader: impl BufRead) -> Result<Mesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut colors: Vec<Option<[f32; 4]>> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();
    let mut faces: Vec<Vec<Corner>> = Vec::new();
    let mut loose_edges: Vec<[u32; 2]> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let line_no = line_no + 1;

        match parts[0] {
            "v" => {
                let values = parse_floats(&parts[1..], line_no)?;
                match values.len() {
                    3 => colors.push(None),
                    6 => colors.push(Some([values[3], values[4], values[5], 1.0])),
                    7 => colors.push(Some([values[3], values[4], values[5], values[6]])),
                    // x y z w
                    4 => colors.push(None),
                    n => bail!("line {}: vertex has {} components", line_no, n),
                }
                positions.push([values[0], values[1], values[2]]);
            }
            "vt" => {
                let values = parse_floats(&parts[1..], line_no)?;
                if values.len() < 2 {
                    bail!("line {}: texture coordinate needs u and v", line_no);
                }
                tex_coords.push([values[0], values[1]]);
            }
            "vn" => {
                let values = parse_floats(&parts[1..], line_no)?;
                if values.len() < 3 {
                    bail!("line {}: normal needs three components", line_no);
                }
                normals_raw.push([values[0], values[1], values[2]]);
            }
            "f" => {
                let corners = parts[1..]
                    .iter()
                    .map(|token| {
                        parse_corner(token, positions.len(), tex_coords.len(), normals_raw.len())
                            .with_context(|| format!("line {}: invalid face corner '{}'", line_no, token))
                    })
                    .collect::<Result<Vec<_>>>()?;

                if corners.len() < 3 {
                    tracing::warn!("line {}: skipping face with {} corners", line_no, corners.len());
                    continue;
                }
                faces.push(corners);
            }
            "l" => {
                let indices = parts[1..]
                    .iter()
                    .map(|token| {
                        // Line elements may carry texture coordinates: "v/vt"
                        let vertex = token.split('/').next().unwrap_or_default();
                        resolve_index(vertex, positions.len())
                            .map(|i| i as u32)
                            .with_context(|| format!("line {}: invalid line vertex '{}'", line_no, token))
                    })
                    .collect::<Result<Vec<_>>>()?;
                loose_edges.extend(indices.windows(2).map(|pair| [pair[0], pair[1]]));
            }
            // Groups, materials and smoothing have no counterpart in the mesh model
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    let polygons: Vec<Vec<u32>> = faces
        .iter()
        .map(|corners| corners.iter().map(|&(v, _, _)| v).collect())
        .collect();

    let mut mesh = Mesh {
        positions,
        polygons,
        edges: loose_edges,
        ..Mesh::default()
    };
    mesh.edges = mesh.derive_edges();
    mesh.normals = vertex_normals(&mesh, &faces, &normals_raw);

    let corners = || faces.iter().flatten();

    if colors.iter().any(Option::is_some) {
        let layer = corners()
            .map(|&(v, _, _)| colors[v as usize].unwrap_or([1.0; 4]))
            .collect();
        mesh.color_layers.push(layer);
    }

    let has_uvs = !faces.is_empty() && corners().all(|&(_, vt, _)| vt.is_some());
    if has_uvs {
        let layer = corners()
            .filter_map(|&(_, vt, _)| vt.map(|t| tex_coords[t]))
            .collect();
        mesh.uv_layers.push(layer);
    } else if corners().any(|&(_, vt, _)| vt.is_some()) {
        tracing::warn!("Some faces lack texture coordinates, ignoring UVs");
    }

    Ok(mesh)
}

/// Per-vertex normals: the first `vn` referenced for each vertex, computed
/// from the faces where none is given.
fn vertex_normals(mesh: &Mesh, faces: &[Vec<Corner>], normals_raw: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let mut assigned: Vec<Option<[f32; 3]>> = vec![None; mesh.vertex_count()];
    for &(v, _, vn) in faces.iter().flatten() {
        let slot = &mut assigned[v as usize];
        if slot.is_none() {
            *slot = vn.map(|n| normals_raw[n]);
        }
    }

    if assigned.iter().all(Option::is_some) {
        return assigned.into_iter().flatten().collect();
    }

    let computed = mesh.compute_normals();
    assigned
        .into_iter()
        .zip(computed)
        .map(|(given, computed)| given.unwrap_or(computed))
        .collect()
}

fn parse_floats(tokens: &[&str], line_no: usize) -> Result<Vec<f32>> {
    tokens
        .iter()
        .map(|t| {
            let value = t
                .parse::<f32>()
                .with_context(|| format!("line {}: invalid number '{}'", line_no, t))?;
            if !value.is_finite() {
                bail!("line {}: non-finite number '{}'", line_no, t);
            }
            Ok(value)
        })
        .collect()
}

/// Resolve a 1-based (or negative, relative) OBJ index against `len` elements
fn resolve_index(token: &str, len: usize) -> Option<usize> {
    let index: i64 = token.parse().ok()?;
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

/// Parse a face corner: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_corner(token: &str, vertices: usize, tex_coords: usize, normals: usize) -> Option<Corner> {
    let mut parts = token.split('/');

    let vi = resolve_index(parts.next()?, vertices)?;

    let optional = |part: Option<&str>, len: usize| -> Option<Option<usize>> {
        match part {
            None | Some("") => Some(None),
            Some(s) => resolve_index(s, len).map(Some),
        }
    };
    let vti = optional(parts.next(), tex_coords)?;
    let vni = optional(parts.next(), normals)?;

    Some((vi as u32, vti, vni))
}
