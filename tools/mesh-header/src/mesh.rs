//! In-memory mesh model
//!
//! Mirrors the layout of an editor mesh: vertices are shared between
//! polygons, and color/UV layers are stored per loop (one entry per
//! polygon corner, in polygon order).

use hashbrown::HashSet;
use std::fmt;

use crate::ExportError;

/// Exportable mesh attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Vertex,
    Index,
    Edge,
    Normal,
    Color,
    Uv,
}

impl Attribute {
    /// Upper-case name used in `#define` constants (`NUM_VERTEX`)
    pub fn define_name(self) -> &'static str {
        match self {
            Attribute::Vertex => "VERTEX",
            Attribute::Index => "INDEX",
            Attribute::Edge => "EDGE",
            Attribute::Normal => "NORMAL",
            Attribute::Color => "COLOR",
            Attribute::Uv => "UV",
        }
    }

    /// Plural name used by `const int` constants (`VERTICES`)
    pub fn const_name(self) -> &'static str {
        match self {
            Attribute::Vertex => "VERTICES",
            Attribute::Index => "INDICES",
            Attribute::Edge => "EDGES",
            Attribute::Normal => "NORMALS",
            Attribute::Color => "COLORS",
            Attribute::Uv => "UVS",
        }
    }

    /// Array identifier suffix (`VertexData`)
    pub fn array_suffix(self) -> &'static str {
        match self {
            Attribute::Vertex => "VertexData",
            Attribute::Index => "IndexData",
            Attribute::Edge => "EdgeData",
            Attribute::Normal => "NormalData",
            Attribute::Color => "ColorData",
            Attribute::Uv => "UvData",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Vertex => "vertex",
            Attribute::Index => "index",
            Attribute::Edge => "edge",
            Attribute::Normal => "normal",
            Attribute::Color => "vertex color",
            Attribute::Uv => "UV",
        };
        f.write_str(name)
    }
}

/// Mesh with shared vertices and optional per-loop layers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    /// Vertex indices of each polygon, in winding order
    pub polygons: Vec<Vec<u32>>,
    pub edges: Vec<[u32; 2]>,
    /// Per-vertex normals; empty or one per position
    pub normals: Vec<[f32; 3]>,
    pub color_layers: Vec<Vec<[f32; 4]>>,
    pub uv_layers: Vec<Vec<[f32; 2]>>,
}

impl Mesh {
    /// Build a mesh from positions and polygons, deriving edges and normals
    pub fn from_polygons(positions: Vec<[f32; 3]>, polygons: Vec<Vec<u32>>) -> Self {
        let mut mesh = Self {
            positions,
            polygons,
            ..Self::default()
        };
        mesh.edges = mesh.derive_edges();
        mesh.normals = mesh.compute_normals();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of polygon corners
    pub fn loop_count(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }

    /// Check indices are in range and layer lengths agree with the mesh
    pub fn validate(&self) -> Result<(), ExportError> {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return Err(ExportError::EmptyMesh);
        }

        for (polygon, corners) in self.polygons.iter().enumerate() {
            if corners.len() < 3 {
                return Err(ExportError::DegeneratePolygon {
                    polygon,
                    corners: corners.len(),
                });
            }
            if let Some(&index) = corners.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ExportError::InvalidIndex {
                    polygon,
                    index,
                    vertex_count,
                });
            }
        }

        for (edge, pair) in self.edges.iter().enumerate() {
            if let Some(&index) = pair.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ExportError::InvalidEdge {
                    edge,
                    index,
                    vertex_count,
                });
            }
        }

        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(ExportError::LayerLength {
                attribute: Attribute::Normal,
                expected: vertex_count,
                found: self.normals.len(),
            });
        }

        let loops = self.loop_count();
        let layer_lengths = self
            .color_layers
            .iter()
            .map(|layer| (Attribute::Color, layer.len()))
            .chain(self.uv_layers.iter().map(|layer| (Attribute::Uv, layer.len())));
        for (attribute, found) in layer_lengths {
            if found != loops {
                return Err(ExportError::LayerLength {
                    attribute,
                    expected: loops,
                    found,
                });
            }
        }

        check_finite(Attribute::Vertex, &self.positions)?;
        check_finite(Attribute::Normal, &self.normals)?;
        for layer in &self.color_layers {
            check_finite(Attribute::Color, layer)?;
        }
        for layer in &self.uv_layers {
            check_finite(Attribute::Uv, layer)?;
        }

        Ok(())
    }

    /// Unique undirected edges: polygon boundaries in first-seen order, then
    /// any existing edges (loose wires) not already covered.
    pub fn derive_edges(&self) -> Vec<[u32; 2]> {
        unique_edges(boundary_edges(&self.polygons).chain(self.edges.iter().copied()))
    }

    /// Area-weighted vertex normals accumulated from polygon normals.
    ///
    /// Vertices not used by any polygon get `+Z`.
    pub fn compute_normals(&self) -> Vec<[f32; 3]> {
        let mut sums = vec![[0.0f32; 3]; self.positions.len()];

        for corners in &self.polygons {
            let normal = self.polygon_normal(corners);
            for &index in corners {
                if let Some(sum) = sums.get_mut(index as usize) {
                    for axis in 0..3 {
                        sum[axis] += normal[axis];
                    }
                }
            }
        }

        sums.into_iter()
            .map(|[x, y, z]| {
                let len = (x * x + y * y + z * z).sqrt();
                if len > f32::EPSILON {
                    [x / len, y / len, z / len]
                } else {
                    [0.0, 0.0, 1.0]
                }
            })
            .collect()
    }

    /// Newell's method; magnitude is twice the polygon area
    fn polygon_normal(&self, corners: &[u32]) -> [f32; 3] {
        let mut normal = [0.0f32; 3];
        let position = |i: u32| self.positions.get(i as usize).copied().unwrap_or([0.0; 3]);

        for (i, &index) in corners.iter().enumerate() {
            let current = position(index);
            let next = position(corners[(i + 1) % corners.len()]);
            normal[0] += (current[1] - next[1]) * (current[2] + next[2]);
            normal[1] += (current[2] - next[2]) * (current[0] + next[0]);
            normal[2] += (current[0] - next[0]) * (current[1] + next[1]);
        }
        normal
    }

    /// Fan-triangulate every polygon, carrying per-loop layers along.
    ///
    /// Triangulation adds the fan diagonals to the edge list.
    pub fn triangulated(&self) -> Mesh {
        let mut polygons = Vec::new();
        // Source loop index for every new corner
        let mut loop_map = Vec::new();

        let mut first_loop = 0usize;
        for corners in &self.polygons {
            for i in 1..corners.len().saturating_sub(1) {
                polygons.push(vec![corners[0], corners[i], corners[i + 1]]);
                loop_map.extend([first_loop, first_loop + i, first_loop + i + 1]);
            }
            first_loop += corners.len();
        }

        let remap_color = |layer: &Vec<[f32; 4]>| {
            loop_map
                .iter()
                .map(|&l| layer.get(l).copied().unwrap_or_default())
                .collect()
        };
        let remap_uv = |layer: &Vec<[f32; 2]>| {
            loop_map
                .iter()
                .map(|&l| layer.get(l).copied().unwrap_or_default())
                .collect()
        };

        // Existing edges keep their order, diagonals are appended
        let edges = unique_edges(
            self.edges
                .iter()
                .copied()
                .chain(boundary_edges(&polygons)),
        );

        Mesh {
            positions: self.positions.clone(),
            edges,
            normals: self.normals.clone(),
            color_layers: self.color_layers.iter().map(remap_color).collect(),
            uv_layers: self.uv_layers.iter().map(remap_uv).collect(),
            polygons,
        }
    }
}

fn check_finite<const N: usize>(
    attribute: Attribute,
    values: &[[f32; N]],
) -> Result<(), ExportError> {
    match values.iter().position(|v| v.iter().any(|x| !x.is_finite())) {
        Some(index) => Err(ExportError::NonFinite { attribute, index }),
        None => Ok(()),
    }
}

/// Consecutive corner pairs of every polygon, closing each loop
fn boundary_edges(polygons: &[Vec<u32>]) -> impl Iterator<Item = [u32; 2]> + '_ {
    polygons.iter().flat_map(|corners| {
        let next = corners.iter().cycle().skip(1);
        corners.iter().zip(next).map(|(&a, &b)| [a, b])
    })
}

fn unique_edges(edges: impl Iterator<Item = [u32; 2]>) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    edges
        .filter(|&[a, b]| a != b && seen.insert((a.min(b), a.max(b))))
        .collect()
}
