use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shapeport() -> Command {
    Command::cargo_bin("shapeport").unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Test that the engines command lists both engine families
#[test]
fn test_engines_lists_registry() {
    shapeport()
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available Engines (2 total)"))
        .stdout(predicate::str::contains("keyed"))
        .stdout(predicate::str::contains("ogr"));
}

/// Test schema resolution with colliding names on the keyed engine
#[test]
fn test_schema_keyed_resolves_collisions() {
    let dir = TempDir::new().unwrap();
    let fields = write(
        &dir,
        "fields.json",
        r#"[
            {"name": "description", "type": "text"},
            {"name": "description_short", "type": "char", "max_length": 40},
            {"name": "created", "type": "date_time"}
        ]"#,
    );

    let output = shapeport()
        .args(["schema", "--engine", "keyed", "--json", "--fields"])
        .arg(&fields)
        .output()
        .unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema[0]["name"], "descriptio");
    assert_eq!(schema[1]["name"], "descript_1");
    assert_eq!(schema[1]["type"], "str:40");
    assert_eq!(schema[2]["type"], "str:255");
}

/// Test the OGR engine keeps temporal types and prints a table
#[test]
fn test_schema_ogr_table() {
    let dir = TempDir::new().unwrap();
    let fields = write(
        &dir,
        "fields.json",
        r#"[{"name": "observed_on", "type": "date"}, {"name": "depth", "type": "float"}]"#,
    );

    shapeport()
        .args(["schema", "--engine", "ogr", "--fields"])
        .arg(&fields)
        .assert()
        .success()
        .stdout(predicate::str::contains("OFTDate"))
        .stdout(predicate::str::contains("OFTReal"))
        .stdout(predicate::str::contains("observed_o"));
}

/// Test a custom type table replaces the engine defaults
#[test]
fn test_schema_with_custom_mapping() {
    let dir = TempDir::new().unwrap();
    let fields = write(&dir, "fields.json", r#"[{"name": "key", "type": "uuid"}]"#);
    let mapping = write(&dir, "mapping.json", r#"{"uuid": "string"}"#);

    shapeport()
        .args(["schema", "--engine", "keyed", "--json", "--fields"])
        .arg(&fields)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .success()
        .stdout(predicate::str::contains("str:255"));
}

/// Test unknown engines fail with a hint
#[test]
fn test_schema_unknown_engine() {
    let dir = TempDir::new().unwrap();
    let fields = write(&dir, "fields.json", r#"[{"name": "a", "type": "integer"}]"#);

    shapeport()
        .args(["schema", "--engine", "fiona", "--fields"])
        .arg(&fields)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Engine 'fiona' not found"))
        .stderr(predicate::str::contains("shapeport engines"));
}

/// Test an empty field list is rejected
#[test]
fn test_schema_empty_field_list() {
    let dir = TempDir::new().unwrap();
    let fields = write(&dir, "fields.json", "[]");

    shapeport()
        .args(["schema", "--engine", "ogr", "--fields"])
        .arg(&fields)
        .assert()
        .failure()
        .stderr(predicate::str::contains("zero fields"));
}

/// Test coercing a 2D polygon to 3D with a fixed z value
#[test]
fn test_coerce_polygon_to_3d() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "polygon.geojson",
        r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}"#,
    );

    shapeport()
        .args(["coerce", "--dims", "3", "--z", "-2.5", "--format", "geojson", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1.0,1.0,-2.5]"));
}

/// Test coercing a 3D feature geometry down to 2D WKT
#[test]
fn test_coerce_feature_to_2d_wkt() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "feature.geojson",
        r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "MultiPoint", "coordinates": [[1, 2, 3], [4, 5, 6]]}}"#,
    );

    shapeport()
        .args(["coerce", "--dims", "2", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("MULTIPOINT"))
        .stdout(predicate::str::contains("3").not());
}

/// Test geometry collections are rejected
#[test]
fn test_coerce_geometry_collection_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "collection.geojson",
        r#"{"type": "GeometryCollection", "geometries": [{"type": "Point", "coordinates": [0, 0]}]}"#,
    );

    shapeport()
        .args(["coerce", "--dims", "2", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("GeometryCollection"));
}

/// Test invalid target dimensions are rejected
#[test]
fn test_coerce_invalid_dims() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "point.geojson", r#"{"type": "Point", "coordinates": [0, 0]}"#);

    shapeport()
        .args(["coerce", "--dims", "4", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only 2 or 3 are supported"));
}

/// Test a missing input file is reported
#[test]
fn test_coerce_missing_file() {
    shapeport()
        .args(["coerce", "--dims", "2", "--input", "/nonexistent/point.geojson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
