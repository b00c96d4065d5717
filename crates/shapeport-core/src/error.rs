//! Custom error types for `shapeport` operations.
//!
//! This module provides structured error handling using `thiserror`. Each
//! subsystem owns a domain-specific error enum (geometry coercion, schema
//! mapping, engine lookup, configuration, I/O), and [`ShapeportError`] ties
//! them together for callers that drive several subsystems at once.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for `shapeport` operations.
///
/// It uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum ShapeportError {
    /// Geometry coercion and conversion errors
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Field schema mapping errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Engine lookup errors
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O errors (unreadable or missing files)
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Geometry-related errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Requested dimensionality is outside {2, 3}
    #[error("Cannot coerce a geometry to {dimensions} dimensions; only 2 or 3 are supported")]
    InvalidDimension {
        /// The rejected dimension count
        dimensions: u8,
    },

    /// The geometry variant cannot be coerced
    #[error("Geometry type '{geometry_type}' is not supported for coercion")]
    UnsupportedGeometry {
        /// Name of the offending geometry type
        geometry_type: String,
    },

    /// A geometry mixes 2D and 3D coordinates
    #[error("{geometry_type} mixes 2D and 3D coordinates")]
    MixedDimensions {
        /// Name of the geometry type being built
        geometry_type: String,
    },

    /// Conversion from an external geometry representation failed
    #[error("Failed to convert geometry: {message}")]
    Conversion {
        /// Description of the conversion problem
        message: String,
    },
}

/// Schema mapping errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The engine's type mapping table has no entry for the field type
    #[error("Field '{field}' has type '{field_type}' which the {engine} engine cannot map")]
    UnsupportedFieldType {
        /// The descriptor name
        field: String,
        /// The unmapped type tag
        field_type: String,
        /// Engine short name
        engine: String,
    },

    /// No descriptors were supplied
    #[error("Cannot build a field mapping from zero fields")]
    EmptyMapping,

    /// Collision resolution ran out of suffixes
    #[error("Could not find a free name for field '{field}' after {attempts} attempts")]
    NameResolutionExhausted {
        /// The descriptor name that kept colliding
        field: String,
        /// How many suffixes were tried
        attempts: usize,
    },

    /// A field map produced by one engine was mixed with another engine's maps
    #[error("Field map for '{field}' belongs to the {found} engine, expected {expected}")]
    EngineMismatch {
        /// The descriptor name
        field: String,
        /// Engine of the mapping
        expected: String,
        /// Engine of the stray field map
        found: String,
    },
}

/// Engine lookup errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine was not found in the registry
    #[error("Engine '{name}' not found. Available engines: {available}")]
    NotFound {
        /// The requested engine name
        name: String,
        /// Comma-separated list of available engines
        available: String,
    },
}

/// Configuration errors.
///
/// These errors occur when options or configuration are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },
}

/// I/O related errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to read from a file
    #[error("Failed to read {format} file '{path}': {source}")]
    Read {
        /// The format being read (e.g., "`GeoJSON`", "field list")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File was not found
    #[error("File not found: '{path}'")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
    },
}

/// Type alias for Results using `ShapeportError`.
pub type Result<T> = std::result::Result<T, ShapeportError>;

impl ShapeportError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Geometry(e) => format!("Geometry error: {e}"),
            Self::Schema(e) => format!("Schema error: {e}"),
            Self::Engine(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Io(e) => e.user_message(),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Geometry(e) => e.recovery_suggestion(),
            Self::Schema(e) => e.recovery_suggestion(),
            Self::Engine(_) => {
                Some("Run 'shapeport engines' to see all available engines.".to_string())
            },
            Self::Io(e) => e.recovery_suggestion(),
            Self::Config(_) => None,
        }
    }
}

impl GeometryError {
    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidDimension { .. } => Some("Use 2 or 3 as the target dimension.".to_string()),
            Self::UnsupportedGeometry { .. } => Some(
                "Split geometry collections into their members before coercing.".to_string(),
            ),
            Self::MixedDimensions { .. } | Self::Conversion { .. } => None,
        }
    }
}

impl SchemaError {
    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::UnsupportedFieldType { .. } => Some(
                "Add the field type to the engine's type mapping or drop the field.".to_string(),
            ),
            Self::EmptyMapping => Some("Select at least one attribute to export.".to_string()),
            Self::NameResolutionExhausted { .. } => {
                Some("Rename fields so their truncated names differ.".to_string())
            },
            Self::EngineMismatch { .. } => None,
        }
    }
}

impl EngineError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { name, available } => {
                format!(
                    "Engine '{name}' not found.\n\nAvailable engines:\n{}",
                    available
                        .split(", ")
                        .map(|e| format!("  - {e}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            },
        }
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { format, path, .. } => {
                format!("Failed to read {} file: {}", format, path.display())
            },
            Self::FileNotFound { path } => {
                format!("File not found: {}", path.display())
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Check that the file path is correct and the file exists.".to_string())
            },
            Self::Read { .. } => Some("Check the file contents and ensure they're valid.".to_string()),
        }
    }
}

/// Extension trait for adding file read context to errors.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Read`] if the underlying operation fails.
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            ShapeportError::Io(IoError::Read {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}

/// Helper to create `EngineError::NotFound` with available engines.
#[must_use]
pub fn engine_not_found(name: &str) -> EngineError {
    use crate::engines::get_engine_names;

    let available = get_engine_names().join(", ");
    EngineError::NotFound {
        name: name.to_string(),
        available,
    }
}
