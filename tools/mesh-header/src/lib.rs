//! mesh-header library
//!
//! Turns a mesh (positions, polygons, edges, per-vertex normals and
//! per-loop color/UV layers) into a C header of statically initialized
//! arrays. Meshes are read from Wavefront OBJ files.

pub mod error;
pub mod export;
pub mod mesh;
pub mod obj;

pub use error::ExportError;
pub use export::{
    export_mesh, write_mesh_header, ConstantStyle, ExportOptions, ExportSummary,
    MissingLayerPolicy,
};
pub use mesh::{Attribute, Mesh};
pub use obj::{load_obj, parse_obj};
