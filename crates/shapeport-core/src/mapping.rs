//! Field schema mapping.
//!
//! [`SchemaMapper`] turns an ordered list of [`FieldDescriptor`]s into a
//! [`FieldMapping`]: one [`FieldMap`] per descriptor, carrying an
//! engine-specific output field whose name respects the dBASE name length
//! limit. Engines differ only in how a single field is rendered, which is the
//! job of a [`FieldStrategy`]; truncation collisions are resolved once, here,
//! for every engine.
//!
//! # Examples
//!
//! ```
//! use shapeport_core::engines::{EngineFamily, TypeMapping};
//! use shapeport_core::fields::{FieldDescriptor, FieldType};
//! use shapeport_core::mapping::SchemaMapper;
//!
//! let mapper = SchemaMapper::for_family(EngineFamily::Keyed, TypeMapping::keyed_default());
//! let mapping = mapper.map_fields(&[
//!     FieldDescriptor::new("description", FieldType::Text),
//!     FieldDescriptor::new("description_extra", FieldType::Char).with_max_length(40),
//!     FieldDescriptor::new("population", FieldType::BigInteger),
//! ])?;
//!
//! assert_eq!(
//!     mapping.properties(),
//!     vec![
//!         ("descriptio".to_string(), "str:255".to_string()),
//!         ("descript_1".to_string(), "str:40".to_string()),
//!         ("population".to_string(), "int".to_string()),
//!     ]
//! );
//! # Ok::<(), shapeport_core::error::SchemaError>(())
//! ```

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::config::MapperOptions;
use crate::engines::{EngineFamily, OutputType, TypeMapping};
use crate::error::SchemaError;
use crate::fields::FieldDescriptor;

/// Output field of a keyed engine: a name and a type token such as `"str:80"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedField {
    pub name: String,
    pub type_token: String,
}

/// Output field of an OGR engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: OutputType,
    /// Field width; set for string fields only.
    pub width: Option<u32>,
}

impl FieldDefinition {
    /// Numeric `OGRFieldType` of this definition.
    #[must_use]
    pub fn type_code(&self) -> i32 {
        self.field_type.ogr_code()
    }
}

/// Engine-specific output descriptor of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputField {
    Keyed(KeyedField),
    Definition(FieldDefinition),
}

impl OutputField {
    /// Output attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            OutputField::Keyed(field) => &field.name,
            OutputField::Definition(field) => &field.name,
        }
    }

    /// Type token including the width, e.g. `"str:255"` or `"OFTString:255"`.
    #[must_use]
    pub fn type_token(&self) -> String {
        match self {
            OutputField::Keyed(field) => field.type_token.clone(),
            OutputField::Definition(field) => match field.width {
                Some(width) => format!("{}:{width}", field.field_type.ogr_name()),
                None => field.field_type.ogr_name().to_string(),
            },
        }
    }

    /// Engine family that produces this kind of output field.
    #[must_use]
    pub fn family(&self) -> EngineFamily {
        match self {
            OutputField::Keyed(_) => EngineFamily::Keyed,
            OutputField::Definition(_) => EngineFamily::Ogr,
        }
    }

    /// Returns the same field under a different name.
    #[must_use]
    pub fn renamed(self, name: String) -> Self {
        match self {
            OutputField::Keyed(field) => OutputField::Keyed(KeyedField { name, ..field }),
            OutputField::Definition(field) => {
                OutputField::Definition(FieldDefinition { name, ..field })
            },
        }
    }
}

/// Pairs an input descriptor with the output field it is written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    engine: EngineFamily,
    field_in: FieldDescriptor,
    field_out: OutputField,
}

impl FieldMap {
    #[must_use]
    pub fn new(engine: EngineFamily, field_in: FieldDescriptor, field_out: OutputField) -> Self {
        Self {
            engine,
            field_in,
            field_out,
        }
    }

    #[must_use]
    pub fn engine(&self) -> EngineFamily {
        self.engine
    }

    #[must_use]
    pub fn field_in(&self) -> &FieldDescriptor {
        &self.field_in
    }

    #[must_use]
    pub fn field_out(&self) -> &OutputField {
        &self.field_out
    }

    #[must_use]
    pub fn output_name(&self) -> &str {
        self.field_out.name()
    }

    /// Returns a new map whose output field carries `name`.
    #[must_use]
    pub fn with_output_name(self, name: String) -> Self {
        Self {
            field_out: self.field_out.renamed(name),
            ..self
        }
    }
}

/// Ordered, engine-homogeneous list of field maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    engine: EngineFamily,
    field_maps: Vec<FieldMap>,
}

impl FieldMapping {
    /// Wraps `field_maps`, taking the engine from the first entry.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptyMapping`] for an empty list.
    /// - [`SchemaError::EngineMismatch`] when entries come from different engines.
    pub(crate) fn new(field_maps: Vec<FieldMap>) -> Result<Self, SchemaError> {
        let engine = field_maps
            .first()
            .map(FieldMap::engine)
            .ok_or(SchemaError::EmptyMapping)?;

        if let Some(stray) = field_maps.iter().find(|fm| fm.engine != engine) {
            return Err(SchemaError::EngineMismatch {
                field: stray.field_in.name.clone(),
                expected: engine.to_string(),
                found: stray.engine.to_string(),
            });
        }

        Ok(Self { engine, field_maps })
    }

    #[must_use]
    pub fn engine(&self) -> EngineFamily {
        self.engine
    }

    #[must_use]
    pub fn field_maps(&self) -> &[FieldMap] {
        &self.field_maps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.field_maps.len()
    }

    /// Always `false`; a mapping holds at least one field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_maps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMap> {
        self.field_maps.iter()
    }

    /// Output names in field order.
    #[must_use]
    pub fn output_names(&self) -> Vec<&str> {
        self.field_maps.iter().map(FieldMap::output_name).collect()
    }

    /// Schema as ordered `(output name, type token)` pairs.
    #[must_use]
    pub fn properties(&self) -> Vec<(String, String)> {
        self.field_maps
            .iter()
            .map(|fm| (fm.output_name().to_string(), fm.field_out.type_token()))
            .collect()
    }

    /// OGR field definitions in field order, or `None` for other engines.
    #[must_use]
    pub fn definitions(&self) -> Option<Vec<&FieldDefinition>> {
        self.field_maps
            .iter()
            .map(|fm| match &fm.field_out {
                OutputField::Definition(definition) => Some(definition),
                OutputField::Keyed(_) => None,
            })
            .collect()
    }

    /// Finds the map for the source attribute `name`.
    #[must_use]
    pub fn find_by_input(&self, name: &str) -> Option<&FieldMap> {
        self.field_maps.iter().find(|fm| fm.field_in.name == name)
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = &'a FieldMap;
    type IntoIter = std::slice::Iter<'a, FieldMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.field_maps.iter()
    }
}

/// Renders one descriptor as an engine-specific output field.
pub trait FieldStrategy: fmt::Debug + Send + Sync {
    /// Engine family of the produced fields.
    fn engine(&self) -> EngineFamily;

    /// Type table the strategy resolves field types against.
    fn type_mapping(&self) -> &TypeMapping;

    /// Maps `descriptor` to an output field named with its truncated name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedFieldType`] when the descriptor's
    /// type is missing from the type table.
    fn map_single_field(
        &self,
        descriptor: &FieldDescriptor,
        options: &MapperOptions,
    ) -> Result<OutputField, SchemaError>;
}

/// Strategy for keyed engines (`name -> "str:255"` style schemas).
#[derive(Debug, Clone)]
pub struct KeyedStrategy {
    mapping: TypeMapping,
}

impl KeyedStrategy {
    #[must_use]
    pub fn new(mapping: TypeMapping) -> Self {
        Self { mapping }
    }
}

impl FieldStrategy for KeyedStrategy {
    fn engine(&self) -> EngineFamily {
        EngineFamily::Keyed
    }

    fn type_mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    fn map_single_field(
        &self,
        descriptor: &FieldDescriptor,
        options: &MapperOptions,
    ) -> Result<OutputField, SchemaError> {
        let output_type = lookup(self, descriptor)?;
        let token = output_type.keyed_token();
        let type_token = if output_type.is_string_like() {
            format!("{token}:{}", string_width(descriptor, options))
        } else {
            token.to_string()
        };

        Ok(OutputField::Keyed(KeyedField {
            name: truncate_name(&descriptor.name, options.max_name_length()),
            type_token,
        }))
    }
}

/// Strategy for OGR engines (structured field definitions).
#[derive(Debug, Clone)]
pub struct OgrStrategy {
    mapping: TypeMapping,
}

impl OgrStrategy {
    #[must_use]
    pub fn new(mapping: TypeMapping) -> Self {
        Self { mapping }
    }
}

impl FieldStrategy for OgrStrategy {
    fn engine(&self) -> EngineFamily {
        EngineFamily::Ogr
    }

    fn type_mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    fn map_single_field(
        &self,
        descriptor: &FieldDescriptor,
        options: &MapperOptions,
    ) -> Result<OutputField, SchemaError> {
        let field_type = lookup(self, descriptor)?;

        Ok(OutputField::Definition(FieldDefinition {
            name: truncate_name(&descriptor.name, options.max_name_length()),
            field_type,
            width: field_type
                .is_string_like()
                .then(|| string_width(descriptor, options)),
        }))
    }
}

fn lookup(
    strategy: &dyn FieldStrategy,
    descriptor: &FieldDescriptor,
) -> Result<OutputType, SchemaError> {
    strategy
        .type_mapping()
        .get(descriptor.field_type)
        .ok_or_else(|| SchemaError::UnsupportedFieldType {
            field: descriptor.name.clone(),
            field_type: descriptor.field_type.to_string(),
            engine: strategy.engine().to_string(),
        })
}

/// Declared length, or the configured default when absent or zero.
fn string_width(descriptor: &FieldDescriptor, options: &MapperOptions) -> u32 {
    match descriptor.max_length {
        Some(length) if length > 0 => length,
        _ => options.default_string_width(),
    }
}

/// Keeps the first `max_chars` characters of `name`.
#[must_use]
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}

/// Builds field mappings for one engine.
///
/// The mapper is immutable; concurrent calls on a shared instance are safe.
#[derive(Debug)]
pub struct SchemaMapper {
    strategy: Box<dyn FieldStrategy>,
    options: MapperOptions,
}

impl SchemaMapper {
    /// Creates a mapper around `strategy` with default options.
    #[must_use]
    pub fn new(strategy: Box<dyn FieldStrategy>) -> Self {
        Self {
            strategy,
            options: MapperOptions::default(),
        }
    }

    /// Creates a mapper for `family` resolving types with `mapping`.
    #[must_use]
    pub fn for_family(family: EngineFamily, mapping: TypeMapping) -> Self {
        let strategy: Box<dyn FieldStrategy> = match family {
            EngineFamily::Keyed => Box::new(KeyedStrategy::new(mapping)),
            EngineFamily::Ogr => Box::new(OgrStrategy::new(mapping)),
        };
        Self::new(strategy)
    }

    #[must_use]
    pub fn with_options(mut self, options: MapperOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn engine(&self) -> EngineFamily {
        self.strategy.engine()
    }

    #[must_use]
    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Maps a single descriptor; the output name is truncated but not yet
    /// checked for collisions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedFieldType`] for unmapped types.
    pub fn map_field(&self, descriptor: &FieldDescriptor) -> Result<FieldMap, SchemaError> {
        let field_out = self.strategy.map_single_field(descriptor, &self.options)?;
        Ok(FieldMap::new(self.engine(), descriptor.clone(), field_out))
    }

    /// Maps every descriptor, in order, and resolves name collisions.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptyMapping`] when `descriptors` is empty.
    /// - [`SchemaError::UnsupportedFieldType`] for the first unmapped type.
    /// - [`SchemaError::NameResolutionExhausted`] when no free name is found.
    pub fn map_fields(&self, descriptors: &[FieldDescriptor]) -> Result<FieldMapping, SchemaError> {
        if descriptors.is_empty() {
            return Err(SchemaError::EmptyMapping);
        }

        let field_maps = descriptors
            .iter()
            .map(|descriptor| self.map_field(descriptor))
            .collect::<Result<Vec<_>, _>>()?;

        FieldMapping::new(self.resolve_field_conflicts(field_maps)?)
    }

    /// Gives every map a distinct output name, in input order.
    ///
    /// The first holder of a truncated name keeps it. Later holders get the
    /// name cut to `max_name_length - 2` characters plus `_1`, `_2`, ... using
    /// the smallest suffix not already taken.
    ///
    /// The base stays at `max_name_length - 2` characters for every suffix, so
    /// from `_10` onward the resolved name is longer than `max_name_length`.
    /// A writer that truncates names to the limit again would turn
    /// `descript_10` back into the taken `descript_1`; callers exporting ten or
    /// more fields that share one truncated name must check the lengths.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NameResolutionExhausted`] when every suffix up to
    /// the configured attempt limit is taken.
    pub fn resolve_field_conflicts(
        &self,
        field_maps: Vec<FieldMap>,
    ) -> Result<Vec<FieldMap>, SchemaError> {
        let max_length = self.options.max_name_length();
        let attempts = self.options.max_suffix_attempts();
        let mut assigned: HashSet<String> = HashSet::with_capacity(field_maps.len());
        let mut resolved = Vec::with_capacity(field_maps.len());

        for field_map in field_maps {
            let name = truncate_name(field_map.output_name(), max_length);

            if !assigned.contains(&name) {
                assigned.insert(name.clone());
                resolved.push(if name == field_map.output_name() {
                    field_map
                } else {
                    field_map.with_output_name(name)
                });
                continue;
            }

            let base = truncate_name(&name, max_length.saturating_sub(2));
            let free = (1..=attempts)
                .map(|suffix| format!("{base}_{suffix}"))
                .find(|candidate| !assigned.contains(candidate))
                .ok_or_else(|| SchemaError::NameResolutionExhausted {
                    field: field_map.field_in().name.clone(),
                    attempts,
                })?;

            debug!(
                "Field '{}' collides on '{name}', renamed to '{free}'",
                field_map.field_in().name
            );
            assigned.insert(free.clone());
            resolved.push(field_map.with_output_name(free));
        }

        Ok(resolved)
    }
}
