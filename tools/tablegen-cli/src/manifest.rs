//! tablegen.toml manifest parsing

use anyhow::{Context, Result};
use mesh_header::{ConstantStyle, MissingLayerPolicy};
use pitch_table::{TableDimensions, DEFAULT_COLS, DEFAULT_ROWS};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// tablegen.toml manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputSection,
    pub pitch_table: Option<PitchTableSection>,
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
}

/// Output configuration section
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Directory for generated headers, relative to the manifest.
    /// Default: the manifest directory
    pub dir: Option<PathBuf>,
    /// Emit the "do not edit" banner in every header.
    /// Default: false
    #[serde(default)]
    pub banner: bool,
}

/// Pitch table section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitchTableSection {
    #[serde(default = "default_pitch_output")]
    pub output: PathBuf,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(default = "default_pitch_type")]
    pub c_type: String,
    #[serde(default = "default_pitch_identifier")]
    pub identifier: String,
    #[serde(default = "default_pitch_prefix")]
    pub prefix: String,
    /// Include guard macro; none when absent
    pub guard: Option<String>,
}

fn default_pitch_output() -> PathBuf {
    PathBuf::from("pitchtable.h")
}

fn default_rows() -> u32 {
    DEFAULT_ROWS
}

fn default_cols() -> u32 {
    DEFAULT_COLS
}

fn default_pitch_type() -> String {
    "unsigned long".to_string()
}

fn default_pitch_identifier() -> String {
    "pitchTable".to_string()
}

fn default_pitch_prefix() -> String {
    "PITCH_TABLE".to_string()
}

/// Single mesh export entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshEntry {
    /// OBJ file, relative to the manifest
    pub input: PathBuf,
    /// Header path, relative to the output directory.
    /// Default: input file name with a .h extension
    pub output: Option<PathBuf>,
    /// Base name for arrays and constants.
    /// Default: input file stem
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub indices: bool,
    #[serde(default)]
    pub edges: bool,
    #[serde(default)]
    pub normals: bool,
    #[serde(default)]
    pub colors: bool,
    #[serde(default)]
    pub uvs: bool,
    #[serde(default)]
    pub triangulate: bool,
    #[serde(default)]
    pub missing_layer: MissingLayerPolicy,
    #[serde(default)]
    pub constants: ConstantStyle,
    /// System include; empty string for none.
    /// Default: SDL_opengl.h
    pub include: Option<String>,
    /// Include guard macro; none when absent
    pub guard: Option<String>,
}

fn default_true() -> bool {
    true
}

impl PitchTableSection {
    pub fn dims(&self) -> Result<TableDimensions> {
        TableDimensions::new(self.rows, self.cols)
            .with_context(|| format!("[pitch_table] {} rows x {} cols", self.rows, self.cols))
    }
}

impl MeshEntry {
    /// Header path relative to the output directory
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => PathBuf::from(self.input.file_name().unwrap_or_default()).with_extension("h"),
        }
    }
}

/// Load a manifest from disk
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Check the manifest can be built: valid dimensions, inputs present,
/// no two entries writing the same header.
pub fn validate(manifest: &Manifest, base_dir: &Path) -> Result<()> {
    let mut outputs = Vec::new();

    if let Some(table) = &manifest.pitch_table {
        table.dims()?;
        outputs.push(table.output.clone());
    }

    for entry in &manifest.meshes {
        let input = base_dir.join(&entry.input);
        if !input.is_file() {
            anyhow::bail!("Mesh input not found: {}", input.display());
        }
        outputs.push(entry.output_path());
    }

    outputs.sort();
    if let Some(pair) = outputs.windows(2).find(|pair| pair[0] == pair[1]) {
        anyhow::bail!("Multiple entries write {}", pair[0].display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let manifest = parse_manifest("[pitch_table]\n\n[[meshes]]\ninput = \"a/tank.obj\"\n").unwrap();

        let table = manifest.pitch_table.unwrap();
        assert_eq!(table.output, PathBuf::from("pitchtable.h"));
        assert_eq!((table.rows, table.cols), (16, 32));
        assert_eq!(table.identifier, "pitchTable");
        assert!(!manifest.output.banner);

        let mesh = &manifest.meshes[0];
        assert!(mesh.indices);
        assert!(!mesh.uvs);
        assert_eq!(mesh.missing_layer, MissingLayerPolicy::Error);
        assert_eq!(mesh.constants, ConstantStyle::Define);
        assert_eq!(mesh.output_path(), PathBuf::from("tank.h"));
    }

    #[test]
    fn test_policies_parse() {
        let manifest = parse_manifest(
            "[[meshes]]\ninput = \"m.obj\"\nmissing_layer = \"skip\"\nconstants = \"const-int\"\n",
        )
        .unwrap();
        assert_eq!(manifest.meshes[0].missing_layer, MissingLayerPolicy::Skip);
        assert_eq!(manifest.meshes[0].constants, ConstantStyle::ConstInt);
    }

    #[test]
    fn test_guard_parses() {
        let manifest = parse_manifest(
            "[pitch_table]\nguard = \"PITCHTABLE_H\"\n\n[[meshes]]\ninput = \"m.obj\"\n",
        )
        .unwrap();
        assert_eq!(manifest.pitch_table.unwrap().guard.as_deref(), Some("PITCHTABLE_H"));
        assert_eq!(manifest.meshes[0].guard, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_manifest("[pitch_table]\nrowz = 4\n").is_err());
        assert!(parse_manifest("[extra]\n").is_err());
    }

    #[test]
    fn test_validate_dimensions() {
        let manifest = parse_manifest("[pitch_table]\nrows = 20\n").unwrap();
        let err = validate(&manifest, Path::new(".")).unwrap_err();
        assert!(format!("{:#}", err).contains("rows may not exceed half the columns"));
    }

    #[test]
    fn test_validate_duplicate_outputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.obj"), "v 0 0 0\n").unwrap();
        let manifest = parse_manifest(
            "[pitch_table]\noutput = \"m.h\"\n\n[[meshes]]\ninput = \"m.obj\"\n",
        )
        .unwrap();

        let err = validate(&manifest, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Multiple entries write m.h"));
    }

    #[test]
    fn test_validate_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = parse_manifest("[[meshes]]\ninput = \"nope.obj\"\n").unwrap();
        assert!(validate(&manifest, dir.path()).is_err());
    }
}
