//! Attribute field descriptors.
//!
//! A [`FieldDescriptor`] is the engine-neutral description of one exported
//! attribute: its name, declared [`FieldType`], optional maximum length and
//! optional enumerated choices. Descriptors deserialize from JSON so that field
//! lists can be supplied from files:
//!
//! ```
//! use shapeport_core::fields::{FieldDescriptor, FieldType};
//!
//! let fields: Vec<FieldDescriptor> = serde_json::from_str(
//!     r#"[{"name": "title", "type": "char", "max_length": 80},
//!         {"name": "population", "type": "big_integer"}]"#,
//! )?;
//!
//! assert_eq!(fields[0].field_type, FieldType::Char);
//! assert_eq!(fields[0].max_length, Some(80));
//! assert_eq!(fields[1].max_length, None);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
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
    Auto,
    SmallInteger,
    PositiveInteger,
    Integer,
    BigInteger,
    Decimal,
    Float,
    Date,
    Time,
    DateTime,
    Uuid,
    Duration,
    Binary,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 24] = [
        FieldType::Char,
        FieldType::Text,
        FieldType::Boolean,
        FieldType::NullBoolean,
        FieldType::Url,
        FieldType::Email,
        FieldType::Slug,
        FieldType::File,
        FieldType::Image,
        FieldType::ForeignKey,
        FieldType::OneToOne,
        FieldType::Auto,
        FieldType::SmallInteger,
        FieldType::PositiveInteger,
        FieldType::Integer,
        FieldType::BigInteger,
        FieldType::Decimal,
        FieldType::Float,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Uuid,
        FieldType::Duration,
        FieldType::Binary,
    ];

    /// Snake-case tag used in JSON input and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Char => "char",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::NullBoolean => "null_boolean",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::Slug => "slug",
            FieldType::File => "file",
            FieldType::Image => "image",
            FieldType::ForeignKey => "foreign_key",
            FieldType::OneToOne => "one_to_one",
            FieldType::Auto => "auto",
            FieldType::SmallInteger => "small_integer",
            FieldType::PositiveInteger => "positive_integer",
            FieldType::Integer => "integer",
            FieldType::BigInteger => "big_integer",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "date_time",
            FieldType::Uuid => "uuid",
            FieldType::Duration => "duration",
            FieldType::Binary => "binary",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an enumerated choice set: stored value and display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// Engine-neutral description of one exported attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Source attribute name.
    pub name: String,
    /// Declared type tag.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Declared maximum length, meaningful for string-like fields.
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Enumerated values the attribute may take.
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

impl FieldDescriptor {
    /// Creates a descriptor with no length or choices.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            max_length: None,
            choices: None,
        }
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Returns `true` when the descriptor declares a non-empty choice set.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_serde() {
        for field_type in FieldType::ALL {
            let json = serde_json::to_string(&field_type).unwrap();
            assert_eq!(json, format!("\"{}\"", field_type.as_str()));
        }
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor: FieldDescriptor =
            serde_json::from_str(r#"{"name": "created", "type": "date_time"}"#).unwrap();
        assert_eq!(descriptor, FieldDescriptor::new("created", FieldType::DateTime));
        assert!(!descriptor.has_choices());
    }

    #[test]
    fn test_descriptor_with_choices() {
        let descriptor = FieldDescriptor::new("status", FieldType::Char)
            .with_max_length(1)
            .with_choices(vec![Choice {
                value: "a".to_string(),
                label: "Active".to_string(),
            }]);
        assert!(descriptor.has_choices());
        assert_eq!(descriptor.max_length, Some(1));

        let empty = FieldDescriptor::new("status", FieldType::Char).with_choices(vec![]);
        assert!(!empty.has_choices());
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let result: Result<FieldDescriptor, _> =
            serde_json::from_str(r#"{"name": "geom", "type": "geometry"}"#);
        assert!(result.is_err());
    }
}
