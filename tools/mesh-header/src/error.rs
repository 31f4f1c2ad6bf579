//! Error types for mesh export

use crate::mesh::Attribute;

/// Mesh validation and export error
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Attribute requested but the mesh has no such layer
    #[error("mesh has no {0} layer")]
    MissingAttributeLayer(Attribute),

    /// Mesh has no vertices
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Polygon references a vertex that does not exist
    #[error("polygon {polygon} references vertex {index}, mesh has {vertex_count} vertices")]
    InvalidIndex {
        polygon: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Edge references a vertex that does not exist
    #[error("edge {edge} references vertex {index}, mesh has {vertex_count} vertices")]
    InvalidEdge {
        edge: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Polygon with fewer than three corners
    #[error("polygon {polygon} has {corners} corners (need at least 3)")]
    DegeneratePolygon { polygon: usize, corners: usize },

    /// Layer length does not match the vertex or loop count
    #[error("{attribute} layer has {found} entries, expected {expected}")]
    LayerLength {
        attribute: Attribute,
        expected: usize,
        found: usize,
    },

    /// NaN or infinite value, which has no C literal
    #[error("{attribute} {index} has a non-finite component")]
    NonFinite { attribute: Attribute, index: usize },

    #[error("failed to format header")]
    Format(#[from] std::fmt::Error),
}
