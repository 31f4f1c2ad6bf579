//! Integration tests for tablegen
//!
//! Writes a manifest with a pitch table and a mesh, builds it, then checks
//! the output stays in sync.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const QUAD_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nf 1/1 2/2 3/3 4/4\n";

fn tablegen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tablegen"))
        .args(args)
        .output()
        .expect("Failed to run tablegen")
}

fn write_project(dir: &Path, manifest: &str) -> String {
    std::fs::create_dir_all(dir.join("assets")).expect("Failed to create assets dir");
    std::fs::write(dir.join("assets/quad.obj"), QUAD_OBJ).expect("Failed to write OBJ");
    let manifest_path = dir.join("tablegen.toml");
    std::fs::write(&manifest_path, manifest).expect("Failed to write manifest");
    manifest_path.to_string_lossy().to_string()
}

const MANIFEST: &str = r#"
[output]
dir = "include"

[pitch_table]
rows = 8
cols = 16

[[meshes]]
input = "assets/quad.obj"
uvs = true
triangulate = true
"#;

#[test]
fn test_build_then_check() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_project(dir.path(), MANIFEST);

    let output = tablegen(&["build", &manifest]);
    assert!(output.status.success(), "build failed: {:?}", output);

    let pitch = std::fs::read_to_string(dir.path().join("include/pitchtable.h"))
        .expect("pitch table should be generated");
    assert!(pitch.contains("#define PITCH_TABLE_ROWS 8\n#define PITCH_TABLE_COLS 16\n"));
    assert!(pitch.contains("     0x8000,\n     0x8080,\n"));

    let quad = std::fs::read_to_string(dir.path().join("include/quad.h"))
        .expect("mesh header should be generated");
    assert!(quad.contains("#define QUAD_NUM_INDEX 6\n"));
    assert!(quad.contains("#define QUAD_NUM_UV 12\n"));

    let output = tablegen(&["check", &manifest]);
    assert!(output.status.success(), "check failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("All 2 headers are in sync"));
}

#[test]
fn test_check_reports_stale_header() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_project(dir.path(), MANIFEST);

    assert!(tablegen(&["build", &manifest]).status.success());
    std::fs::write(dir.path().join("include/quad.h"), "// edited by hand\n")
        .expect("Failed to overwrite header");

    let output = tablegen(&["check", &manifest]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("out of sync"));
    assert!(stdout.contains("quad.h"));
    assert!(!stdout.contains("pitchtable.h"));
}

#[test]
fn test_build_rejects_invalid_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_project(dir.path(), "[pitch_table]\nrows = 16\ncols = 24\n");

    let output = tablegen(&["build", &manifest]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("power of two"));
    assert!(!dir.path().join("pitchtable.h").exists());
}

#[test]
fn test_build_output_override() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_project(
        dir.path(),
        "[[meshes]]\ninput = \"assets/quad.obj\"\noutput = \"meshes/q.h\"\nname = \"q\"\nconstants = \"const-int\"\n",
    );
    let out = dir.path().join("out");

    let output = tablegen(&["build", &manifest, "-o", out.to_str().expect("UTF-8 path")]);
    assert!(output.status.success(), "build failed: {:?}", output);

    let text = std::fs::read_to_string(out.join("meshes/q.h")).expect("header should exist");
    assert!(text.contains("GLfloat qVertexData[] = {"));
    assert!(text.contains("const int INDICES = 4;"));
}
