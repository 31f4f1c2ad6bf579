//! Integration tests for mesh-header
//!
//! Tests the full pipeline: generate OBJ -> export header -> verify output


use std::path::Path;
use std::process::{Command, Output};
use tablegen_shared::{parse_array, parse_define};
use tempfile::tempdir;

fn mesh_header(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mesh-header"))
        .args(args)
        .output()
        .expect("Failed to run mesh-header")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path should be UTF-8")
}

#[test]
fn test_quad_vertices_and_indices() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    let header_path = dir.path().join("quad.h");
    generate_test_assets::generate_quad_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&["export", path_arg(&obj_path)]);
    assert!(output.status.success(), "export failed: {:?}", output);

    let text = std::fs::read_to_string(&header_path).expect("Failed to read header");
    assert_eq!(text.matches("[] = {").count(), 2);
    assert_eq!(parse_array(&text, "quadVertexData").unwrap().len(), 12);
    assert_eq!(parse_array(&text, "quadIndexData").unwrap().len(), 6);
    assert_eq!(parse_define(&text, "QUAD_NUM_VERTEX"), Some("12"));
    assert_eq!(parse_define(&text, "QUAD_NUM_INDEX"), Some("6"));
}

#[test]
fn test_cube_all_layers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let header_path = dir.path().join("box.h");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&[
        "export",
        path_arg(&obj_path),
        "-o",
        path_arg(&header_path),
        "--name",
        "box",
        "--edges",
        "--normals",
        "--colors",
        "--uvs",
    ]);
    assert!(output.status.success(), "export failed: {:?}", output);

    let text = std::fs::read_to_string(&header_path).expect("Failed to read header");
    assert_eq!(text.matches("[] = {").count(), 6);
    assert_eq!(parse_define(&text, "BOX_NUM_VERTEX"), Some("24"));
    assert_eq!(parse_define(&text, "BOX_NUM_INDEX"), Some("24"));
    assert_eq!(parse_define(&text, "BOX_NUM_EDGE"), Some("24"));
    assert_eq!(parse_define(&text, "BOX_NUM_NORMAL"), Some("24"));
    assert_eq!(parse_define(&text, "BOX_NUM_COLOR"), Some("96"));
    assert_eq!(parse_define(&text, "BOX_NUM_UV"), Some("48"));
}

#[test]
fn test_triangulate_cube() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let header_path = dir.path().join("cube.h");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&["export", path_arg(&obj_path), "--triangulate", "--uvs"]);
    assert!(output.status.success(), "export failed: {:?}", output);

    let text = std::fs::read_to_string(&header_path).expect("Failed to read header");
    assert_eq!(parse_define(&text, "CUBE_NUM_INDEX"), Some("36"));
    assert_eq!(parse_define(&text, "CUBE_NUM_UV"), Some("72"));
}

#[test]
fn test_missing_uv_layer_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    let header_path = dir.path().join("quad.h");
    generate_test_assets::generate_quad_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&["export", path_arg(&obj_path), "--uvs"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mesh has no UV layer"));
    assert!(!header_path.exists());

    let output = mesh_header(&["export", path_arg(&obj_path), "--uvs", "--skip-missing"]);
    assert!(output.status.success());
    let text = std::fs::read_to_string(&header_path).expect("Failed to read header");
    assert!(!text.contains("UvData"));
}

#[test]
fn test_const_int_style() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    let header_path = dir.path().join("quad.h");
    generate_test_assets::generate_quad_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&["export", path_arg(&obj_path), "--const-int", "--name", ""]);
    assert!(output.status.success(), "export failed: {:?}", output);

    let text = std::fs::read_to_string(&header_path).expect("Failed to read header");
    assert!(text.contains("GLfloat vertexData[] = {"));
    assert!(text.contains("const int VERTICES = 12;"));
    assert!(text.contains("const int INDICES = 6;"));
}

#[test]
fn test_guard_flag() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    let header_path = dir.path().join("quad.h");
    generate_test_assets::generate_quad_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&["export", path_arg(&obj_path), "--guard", "QUAD_H"]);
    assert!(output.status.success(), "export failed: {:?}", output);

    let text = std::fs::read_to_string(&header_path).expect("Failed to read header");
    assert!(text.starts_with("#ifndef QUAD_H\n#define QUAD_H\n"));
    assert!(text.ends_with("#endif /* QUAD_H */\n"));
}

#[test]
fn test_info_reports_counts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");

    let output = mesh_header(&["info", path_arg(&obj_path)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vertices: 8"));
    assert!(stdout.contains("polygons: 6"));
    assert!(stdout.contains("edges:    12"));
    assert!(stdout.contains("UV layers:    1"));
}
