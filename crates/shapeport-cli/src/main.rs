//! Command-line interface for `shapeport`, which prepares records for shapefile export.
//!
//! This binary provides a thin CLI over the [`shapeport_core`] library: it lists the
//! writer engines, resolves an attribute schema for an engine, and coerces `GeoJSON`
//! geometries to the dimension a shapefile layer expects.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! Library logs emitted through the `log` facade are bridged into `tracing`.
//!
//! # Available Commands
//!
//! - `engines` - List the writer engines and their type tables
//! - `schema` - Resolve the output schema of a field list
//! - `coerce` - Coerce a `GeoJSON` geometry to 2D or 3D

mod display;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use geozero::{GeozeroGeometry, ToWkt};
use tracing::{Level, debug, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use shapeport_core::coerce::DEFAULT_Z_VALUE;
use shapeport_core::config::MapperOptions;
use shapeport_core::conversions::to_geojson;
use shapeport_core::engines::{get_engines, require_engine};
use shapeport_core::error::ShapeportError;
use shapeport_core::geometry::{Geometry, Srid};
use shapeport_core::mapping::FieldMapping;
use shapeport_core::operations;

use crate::display::{display_engines, display_schema};

#[derive(Parser)]
#[command(
    name = "shapeport",
    version,
    about = "Prepare geometries and attribute schemas for shapefile export",
    long_about = "shapeport maps record field lists to shapefile attribute schemas \
                  (10-character names, engine-specific types) and coerces geometries \
                  between 2D and 3D."
)]
/// Command-line arguments and options for the `shapeport` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output encoding for coerced geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GeometryFormat {
    Wkt,
    Geojson,
}

/// Available subcommands for the `shapeport` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Lists the writer engines a schema can be built for.
    Engines,

    /// Resolves the shapefile attribute schema of a field list.
    ///
    /// The field list is a JSON array of objects with `name`, `type` and the
    /// optional `max_length` and `choices` keys.
    Schema {
        /// Path to the JSON field list.
        #[arg(short, long, value_name = "FILE")]
        fields: PathBuf,

        /// Engine to build the schema for (see `shapeport engines`).
        #[arg(short, long, value_name = "ENGINE")]
        engine: String,

        /// JSON object overriding the engine's type table.
        #[arg(short, long, value_name = "FILE")]
        mapping: Option<PathBuf>,

        /// Maximum output name length.
        #[arg(long, value_name = "N")]
        max_name_length: Option<usize>,

        /// Width of string fields without a declared length.
        #[arg(long, value_name = "N")]
        default_width: Option<u32>,

        /// Print the schema as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Coerces a `GeoJSON` geometry to 2D or 3D.
    Coerce {
        /// Path to a `GeoJSON` geometry or feature.
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Target dimension (2 or 3).
        #[arg(long, value_name = "DIMS")]
        dims: u8,

        /// Z value given to every coordinate when adding a dimension.
        #[arg(short, long, default_value_t = DEFAULT_Z_VALUE, allow_negative_numbers = true)]
        z: f64,

        /// Spatial reference identifier, numeric or a named token.
        #[arg(long, value_name = "SRID")]
        srid: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = GeometryFormat::Wkt)]
        format: GeometryFormat,
    },
}

/// Entry point for the `shapeport` command-line interface.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Engines => handle_engines(),
        Commands::Schema {
            fields,
            engine,
            mapping,
            max_name_length,
            default_width,
            json,
        } => {
            info!("Resolving schema of {} for '{engine}'", fields.display());
            let options = mapper_options(max_name_length, default_width)?;
            handle_schema(&fields, &engine, mapping.as_deref(), options, json)
        },
        Commands::Coerce {
            input,
            dims,
            z,
            srid,
            format,
        } => {
            info!("Coercing {} to {dims}D", input.display());
            let output = handle_coerce(&input, dims, z, srid.as_deref(), format)?;
            println!("{output}");
            Ok(())
        },
    }
}

/// Converts a library error into an `anyhow` error carrying the user-facing message.
fn report(err: ShapeportError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n\nHint: {hint}", err.user_message()),
        None => anyhow!(err.user_message()),
    }
}

fn mapper_options(max_name_length: Option<usize>, default_width: Option<u32>) -> Result<MapperOptions> {
    let mut options = MapperOptions::default();
    if let Some(length) = max_name_length {
        options = options
            .with_max_name_length(length)
            .map_err(|e| report(e.into()))?;
    }
    if let Some(width) = default_width {
        options = options
            .with_default_string_width(width)
            .map_err(|e| report(e.into()))?;
    }
    Ok(options)
}

#[allow(clippy::unnecessary_wraps)]
fn handle_engines() -> Result<()> {
    display_engines(&get_engines());
    Ok(())
}

/// Resolves the schema of the field list at `fields` for `engine_name`.
fn resolve_schema(
    fields: &Path,
    engine_name: &str,
    mapping: Option<&Path>,
    options: MapperOptions,
) -> Result<FieldMapping> {
    let engine = require_engine(engine_name).map_err(|e| report(e.into()))?;
    let descriptors = operations::load_descriptors(fields).map_err(report)?;
    let table = mapping
        .map(operations::load_type_mapping)
        .transpose()
        .map_err(report)?;
    debug!("Loaded {} descriptor(s)", descriptors.len());

    operations::map_schema(&descriptors, &engine, table, options).map_err(report)
}

fn handle_schema(
    fields: &Path,
    engine_name: &str,
    mapping: Option<&Path>,
    options: MapperOptions,
    json: bool,
) -> Result<()> {
    let schema = resolve_schema(fields, engine_name, mapping, options)?;

    if json {
        println!("{}", schema_json(&schema)?);
    } else {
        let engine = require_engine(engine_name).map_err(|e| report(e.into()))?;
        display_schema(&engine, &schema);
    }
    Ok(())
}

/// Encodes the resolved schema as a JSON array of `{field, name, type}` objects.
fn schema_json(schema: &FieldMapping) -> Result<String> {
    let entries: Vec<serde_json::Value> = schema
        .iter()
        .map(|fm| {
            serde_json::json!({
                "field": fm.field_in().name,
                "name": fm.output_name(),
                "type": fm.field_out().type_token(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn parse_srid(srid: &str) -> Srid {
    srid.parse::<i32>().map_or_else(|_| Srid::from(srid), Srid::Code)
}

fn handle_coerce(
    input: &Path,
    dims: u8,
    z: f64,
    srid: Option<&str>,
    format: GeometryFormat,
) -> Result<String> {
    let srid = srid.map(parse_srid);
    let geometry =
        operations::coerce_geojson_file(input, dims, z, srid.as_ref()).map_err(report)?;
    encode_geometry(&geometry, format)
}

fn encode_geometry(geometry: &Geometry, format: GeometryFormat) -> Result<String> {
    match format {
        GeometryFormat::Wkt => Ok(geometry.to_wkt_ndim(geometry.dims())?),
        GeometryFormat::Geojson => Ok(serde_json::to_string(&to_geojson(geometry))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_resolve_schema_keyed() -> Result<()> {
        let fields = temp_json(
            r#"[{"name": "description", "type": "text"},
                {"name": "description_long", "type": "text", "max_length": 500}]"#,
        );

        let schema = resolve_schema(fields.path(), "keyed", None, MapperOptions::default())?;
        assert_eq!(schema.output_names(), vec!["descriptio", "descript_1"]);
        assert_eq!(
            schema.properties(),
            vec![
                ("descriptio".to_string(), "str:255".to_string()),
                ("descript_1".to_string(), "str:500".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_resolve_schema_unknown_engine() {
        let fields = temp_json(r#"[{"name": "a", "type": "integer"}]"#);
        let err = resolve_schema(fields.path(), "fiona", None, MapperOptions::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Engine 'fiona' not found"));
        assert!(message.contains("Hint:"));
    }

    #[test]
    fn test_resolve_schema_unmapped_type() {
        let fields = temp_json(r#"[{"name": "blob", "type": "binary"}]"#);
        let err =
            resolve_schema(fields.path(), "ogr", None, MapperOptions::default()).unwrap_err();
        assert!(err.to_string().contains("blob"));
    }

    #[test]
    fn test_mapper_options_rejects_short_names() {
        assert!(mapper_options(Some(2), None).is_err());
        assert!(mapper_options(None, Some(0)).is_err());

        let options = mapper_options(Some(8), Some(80)).unwrap();
        assert_eq!(options.max_name_length(), 8);
        assert_eq!(options.default_string_width(), 80);
    }

    #[test]
    fn test_schema_json() -> Result<()> {
        let fields = temp_json(r#"[{"name": "count", "type": "integer"}]"#);
        let schema = resolve_schema(fields.path(), "ogr", None, MapperOptions::default())?;
        let value: serde_json::Value = serde_json::from_str(&schema_json(&schema)?)?;
        assert_eq!(value[0]["name"], "count");
        assert_eq!(value[0]["type"], "OFTInteger");
        Ok(())
    }

    #[test]
    fn test_parse_srid() {
        assert_eq!(parse_srid("4326"), Srid::Code(4326));
        assert_eq!(parse_srid("CRS84"), Srid::from("CRS84"));
    }

    #[test]
    fn test_handle_coerce_to_3d_wkt() -> Result<()> {
        let input = temp_json(r#"{"type": "Point", "coordinates": [1, 2]}"#);
        let output = handle_coerce(input.path(), 3, 7.0, None, GeometryFormat::Wkt)?;
        assert!(output.starts_with("POINT"));
        assert!(output.contains("1 2 7"));
        Ok(())
    }

    #[test]
    fn test_handle_coerce_to_2d_geojson() -> Result<()> {
        let input = temp_json(r#"{"type": "LineString", "coordinates": [[0, 0, 5], [1, 1, 5]]}"#);
        let output = handle_coerce(input.path(), 2, 0.0, Some("4326"), GeometryFormat::Geojson)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value["type"], "LineString");
        assert_eq!(value["coordinates"], serde_json::json!([[0.0, 0.0], [1.0, 1.0]]));
        Ok(())
    }

    #[test]
    fn test_handle_coerce_invalid_dimension() {
        let input = temp_json(r#"{"type": "Point", "coordinates": [1, 2]}"#);
        let err = handle_coerce(input.path(), 4, 0.0, None, GeometryFormat::Wkt).unwrap_err();
        assert!(err.to_string().contains("Hint: Use 2 or 3"));
    }
}
