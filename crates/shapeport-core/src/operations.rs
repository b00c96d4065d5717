//! High-level operations used by writers and the CLI.
//!
//! This module glues the pure transforms to file input: loading field lists
//! and type tables from JSON, building a schema for a named engine, and
//! coercing `GeoJSON` geometries.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::coerce::GeometryCoercer;
use crate::config::MapperOptions;
use crate::conversions::parse_geojson;
use crate::engines::{Engine, TypeMapping};
use crate::error::{IoError, IoErrorExt, Result};
use crate::fields::FieldDescriptor;
use crate::geometry::{Geometry, Srid};
use crate::mapping::{FieldMapping, SchemaMapper, truncate_name};

fn read_file(path: &Path, format: &str) -> Result<String> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    fs::read_to_string(path).with_read_context(format, path)
}

/// Loads a JSON array of field descriptors.
///
/// # Errors
///
/// Returns an I/O error if the file is missing, unreadable or not a valid
/// descriptor list.
pub fn load_descriptors(path: impl AsRef<Path>) -> Result<Vec<FieldDescriptor>> {
    let path = path.as_ref();
    let text = read_file(path, "field list")?;
    let descriptors: Vec<FieldDescriptor> =
        serde_json::from_str(&text).with_read_context("field list", path)?;
    debug!("Loaded {} field descriptor(s) from {}", descriptors.len(), path.display());
    Ok(descriptors)
}

/// Loads a JSON object mapping field types to output types.
///
/// # Errors
///
/// Returns an I/O error if the file is missing, unreadable or malformed.
pub fn load_type_mapping(path: impl AsRef<Path>) -> Result<TypeMapping> {
    let path = path.as_ref();
    let text = read_file(path, "type mapping")?;
    let mapping: TypeMapping =
        serde_json::from_str(&text).with_read_context("type mapping", path)?;
    debug!("Loaded {} type mapping entries from {}", mapping.len(), path.display());
    Ok(mapping)
}

/// Builds the output schema of `descriptors` for `engine`.
///
/// `mapping` overrides the engine's default type table.
///
/// # Errors
///
/// Returns a schema error when mapping fails (empty list, unmapped type,
/// exhausted suffixes).
pub fn map_schema(
    descriptors: &[FieldDescriptor],
    engine: &Engine,
    mapping: Option<TypeMapping>,
    options: MapperOptions,
) -> Result<FieldMapping> {
    info!(
        "Mapping {} field(s) for engine '{}'",
        descriptors.len(),
        engine.short_name
    );

    let mapping = mapping.unwrap_or_else(|| engine.default_mapping());
    let max_length = options.max_name_length();
    let mapper = SchemaMapper::for_family(engine.family, mapping).with_options(options);
    let field_mapping = mapper.map_fields(descriptors)?;

    let renamed = field_mapping
        .iter()
        .filter(|fm| fm.output_name() != truncate_name(&fm.field_in().name, max_length))
        .count();
    info!("Schema has {} field(s), {renamed} renamed", field_mapping.len());
    Ok(field_mapping)
}

/// Parses `GeoJSON` text and coerces the geometry to `dimensions`.
///
/// # Errors
///
/// Returns a geometry error for invalid `GeoJSON`, invalid dimensions or
/// geometry collections.
pub fn coerce_geojson(
    text: &str,
    dimensions: u8,
    z_value: f64,
    srid: Option<&Srid>,
) -> Result<Geometry> {
    let geometry = parse_geojson(text, srid)?;
    info!(
        "Coercing {} ({}D) to {dimensions}D",
        geometry.geom_type(),
        geometry.dimension().size()
    );
    Ok(GeometryCoercer::new().coerce(geometry, dimensions, z_value)?)
}

/// Reads a `GeoJSON` geometry file and coerces it to `dimensions`.
///
/// # Errors
///
/// Returns an I/O error for unreadable files, otherwise as
/// [`coerce_geojson`].
pub fn coerce_geojson_file(
    path: impl AsRef<Path>,
    dimensions: u8,
    z_value: f64,
    srid: Option<&Srid>,
) -> Result<Geometry> {
    let path = path.as_ref();
    let text = read_file(path, "GeoJSON")?;
    coerce_geojson(&text, dimensions, z_value, srid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{EngineFamily, OutputType, find_engine};
    use crate::error::{GeometryError, SchemaError, ShapeportError};
    use crate::fields::FieldType;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_descriptors() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "fields.json",
            r#"[{"name": "name", "type": "char", "max_length": 50},
                {"name": "created_at", "type": "date_time"}]"#,
        );

        let descriptors = load_descriptors(&path).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[1].field_type, FieldType::DateTime);
    }

    #[test]
    fn test_load_descriptors_missing_file() {
        let err = load_descriptors("/nonexistent/fields.json").unwrap_err();
        assert!(matches!(err, ShapeportError::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_descriptors_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "fields.json", r#"{"name": "oops"}"#);
        let err = load_descriptors(&path).unwrap_err();
        assert!(matches!(err, ShapeportError::Io(IoError::Read { .. })));
    }

    #[test]
    fn test_map_schema_with_custom_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "table.json", r#"{"uuid": "string"}"#);
        let table = load_type_mapping(&path).unwrap();

        let engine = find_engine("ogr").unwrap();
        let mapping = map_schema(
            &[FieldDescriptor::new("identifier", FieldType::Uuid)],
            &engine,
            Some(table),
            MapperOptions::default(),
        )
        .unwrap();

        assert_eq!(mapping.engine(), EngineFamily::Ogr);
        let definitions = mapping.definitions().unwrap();
        assert_eq!(definitions[0].name, "identifier");
        assert_eq!(definitions[0].field_type, OutputType::String);
    }

    #[test]
    fn test_map_schema_propagates_schema_errors() {
        let engine = find_engine("keyed").unwrap();
        let err = map_schema(&[], &engine, None, MapperOptions::default()).unwrap_err();
        assert!(matches!(err, ShapeportError::Schema(SchemaError::EmptyMapping)));
    }

    #[test]
    fn test_coerce_geojson() {
        let geometry = coerce_geojson(
            r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#,
            3,
            12.5,
            Some(&Srid::Code(4326)),
        )
        .unwrap();
        assert!(geometry.has_z());
        assert_eq!(geometry.srid(), Some(&Srid::Code(4326)));
    }

    #[test]
    fn test_coerce_geojson_collection_fails() {
        let err = coerce_geojson(
            r#"{"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [0, 0]}
            ]}"#,
            3,
            0.0,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ShapeportError::Geometry(GeometryError::UnsupportedGeometry { .. })
        ));
    }

    #[test]
    fn test_coerce_geojson_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "point.geojson",
            r#"{"type": "Point", "coordinates": [1, 2, 3]}"#,
        );
        let geometry = coerce_geojson_file(&path, 2, 0.0, None).unwrap();
        assert!(!geometry.has_z());
    }
}
