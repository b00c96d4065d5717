//! Engine registry and type-mapping tables.
//!
//! An engine is a family of shapefile writers that share one way of describing
//! an output schema. The registry lists every engine this crate can build a
//! schema for, and each engine ships a default [`TypeMapping`] translating
//! declared [`FieldType`]s into [`OutputType`]s. Tables are plain values handed
//! to the schema mapper explicitly; nothing here probes the environment.
//!
//! # Examples
//!
//! ```
//! use shapeport_core::engines::{EngineFamily, OutputType, find_engine};
//! use shapeport_core::fields::FieldType;
//!
//! let engine = find_engine("OGR").expect("ogr engine should exist");
//! assert_eq!(engine.family, EngineFamily::Ogr);
//!
//! let table = engine.default_mapping();
//! assert_eq!(table.get(FieldType::Date), Some(OutputType::Date));
//! assert_eq!(table.get(FieldType::Uuid), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, engine_not_found};
use crate::fields::FieldType;

/// Schema representation family of a writer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineFamily {
    /// Schema is a list of `name -> "type[:width]"` properties.
    Keyed,
    /// Schema is a list of OGR field definitions.
    Ogr,
}

impl EngineFamily {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineFamily::Keyed => "keyed",
            EngineFamily::Ogr => "ogr",
        }
    }
}

impl fmt::Display for EngineFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-side attribute type a field is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    String,
    Integer,
    Real,
    Date,
    Time,
    DateTime,
}

impl OutputType {
    /// Returns `true` for types that carry a width.
    #[must_use]
    pub fn is_string_like(&self) -> bool {
        matches!(self, OutputType::String)
    }

    /// Property type token used by keyed schemas.
    #[must_use]
    pub fn keyed_token(&self) -> &'static str {
        match self {
            OutputType::String => "str",
            OutputType::Integer => "int",
            OutputType::Real => "float",
            OutputType::Date => "date",
            OutputType::Time => "time",
            OutputType::DateTime => "datetime",
        }
    }

    /// OGR `OGRFieldType` constant name.
    #[must_use]
    pub fn ogr_name(&self) -> &'static str {
        match self {
            OutputType::String => "OFTString",
            OutputType::Integer => "OFTInteger",
            OutputType::Real => "OFTReal",
            OutputType::Date => "OFTDate",
            OutputType::Time => "OFTTime",
            OutputType::DateTime => "OFTDateTime",
        }
    }

    /// OGR `OGRFieldType` numeric value.
    #[must_use]
    pub fn ogr_code(&self) -> i32 {
        match self {
            OutputType::Integer => 0,
            OutputType::Real => 2,
            OutputType::String => 4,
            OutputType::Date => 9,
            OutputType::Time => 10,
            OutputType::DateTime => 11,
        }
    }
}

/// Immutable table from declared field type to output type.
///
/// Deserializes from a JSON object such as `{"char": "string", "integer": "integer"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeMapping(BTreeMap<FieldType, OutputType>);

impl TypeMapping {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default table for keyed engines.
    ///
    /// Temporal values are written as strings.
    #[must_use]
    pub fn keyed_default() -> Self {
        Self::common()
            .with(FieldType::Date, OutputType::String)
            .with(FieldType::Time, OutputType::String)
            .with(FieldType::DateTime, OutputType::String)
    }

    /// Default table for OGR engines.
    #[must_use]
    pub fn ogr_default() -> Self {
        Self::common()
            .with(FieldType::Date, OutputType::Date)
            .with(FieldType::Time, OutputType::Time)
            .with(FieldType::DateTime, OutputType::DateTime)
    }

    /// Default table for `family`.
    #[must_use]
    pub fn for_family(family: EngineFamily) -> Self {
        match family {
            EngineFamily::Keyed => Self::keyed_default(),
            EngineFamily::Ogr => Self::ogr_default(),
        }
    }

    fn common() -> Self {
        use FieldType::{
            Auto, BigInteger, Boolean, Char, Decimal, Email, File, Float, ForeignKey, Image,
            Integer, NullBoolean, OneToOne, PositiveInteger, Slug, SmallInteger, Text, Url,
        };

        let strings = [
            Char,
            Text,
            Boolean,
            NullBoolean,
            Url,
            Email,
            Slug,
            File,
            Image,
            ForeignKey,
            OneToOne,
        ];
        let integers = [Auto, SmallInteger, PositiveInteger, Integer, BigInteger];
        let reals = [Decimal, Float];

        strings
            .into_iter()
            .map(|t| (t, OutputType::String))
            .chain(integers.into_iter().map(|t| (t, OutputType::Integer)))
            .chain(reals.into_iter().map(|t| (t, OutputType::Real)))
            .collect()
    }

    /// Returns a copy of the table with `field_type` mapped to `output`.
    #[must_use]
    pub fn with(mut self, field_type: FieldType, output: OutputType) -> Self {
        self.0.insert(field_type, output);
        self
    }

    /// Looks up the output type for `field_type`.
    #[must_use]
    pub fn get(&self, field_type: FieldType) -> Option<OutputType> {
        self.0.get(&field_type).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries ordered by field type.
    pub fn iter(&self) -> impl Iterator<Item = (FieldType, OutputType)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(FieldType, OutputType)> for TypeMapping {
    fn from_iter<I: IntoIterator<Item = (FieldType, OutputType)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Writer engine definition.
#[derive(Debug, Clone)]
pub struct Engine {
    /// Short name used in the CLI and for engine identification (e.g., `"keyed"`).
    pub short_name: &'static str,
    /// Long descriptive name for display purposes.
    pub long_name: &'static str,
    /// Schema representation family.
    pub family: EngineFamily,
}

impl Engine {
    #[must_use]
    pub const fn new(short_name: &'static str, long_name: &'static str, family: EngineFamily) -> Self {
        Self {
            short_name,
            long_name,
            family,
        }
    }

    /// Built-in type table for this engine.
    #[must_use]
    pub fn default_mapping(&self) -> TypeMapping {
        TypeMapping::for_family(self.family)
    }
}

/// Returns every registered engine.
#[must_use]
pub fn get_engines() -> Vec<Engine> {
    vec![
        Engine::new(
            "keyed",
            "Keyed property schema (name -> type token)",
            EngineFamily::Keyed,
        ),
        Engine::new("ogr", "OGR field definitions", EngineFamily::Ogr),
    ]
}

/// Finds an engine by its short name (case-insensitive).
#[must_use]
pub fn find_engine(name: &str) -> Option<Engine> {
    get_engines()
        .into_iter()
        .find(|e| e.short_name.eq_ignore_ascii_case(name))
}

/// Finds an engine by name, failing with the list of known engines.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] when no engine matches.
pub fn require_engine(name: &str) -> Result<Engine, EngineError> {
    find_engine(name).ok_or_else(|| engine_not_found(name))
}

/// Returns all engine short names in alphabetically sorted order.
#[must_use]
pub fn get_engine_names() -> Vec<&'static str> {
    let mut names: Vec<_> = get_engines().iter().map(|e| e.short_name).collect();
    names.sort_unstable();
    names
}
