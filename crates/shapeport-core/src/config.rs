//! Options controlling schema mapping.

use crate::error::ConfigError;

/// Longest attribute name a dBASE table accepts.
pub const DEFAULT_FIELD_NAME_LENGTH: usize = 10;

/// Width assigned to string fields that declare no maximum length.
pub const DEFAULT_STRING_WIDTH: u32 = 255;

/// Upper bound on disambiguation suffixes tried for one field.
pub const DEFAULT_MAX_SUFFIX_ATTEMPTS: usize = 10_000;

/// Tunables for [`SchemaMapper`](crate::mapping::SchemaMapper).
///
/// # Examples
///
/// ```
/// use shapeport_core::config::MapperOptions;
///
/// let options = MapperOptions::default().with_max_name_length(8)?;
/// assert_eq!(options.max_name_length(), 8);
/// assert_eq!(options.default_string_width(), 255);
///
/// assert!(MapperOptions::default().with_max_name_length(2).is_err());
/// # Ok::<(), shapeport_core::error::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperOptions {
    max_name_length: usize,
    default_string_width: u32,
    max_suffix_attempts: usize,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_FIELD_NAME_LENGTH,
            default_string_width: DEFAULT_STRING_WIDTH,
            max_suffix_attempts: DEFAULT_MAX_SUFFIX_ATTEMPTS,
        }
    }
}

impl MapperOptions {
    /// Sets the output name length limit, in characters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] below 3, which would leave no
    /// room for a `_N` suffix.
    pub fn with_max_name_length(mut self, length: usize) -> Result<Self, ConfigError> {
        if length < 3 {
            return Err(invalid(
                "max-name-length",
                format!("must be at least 3, got {length}"),
            ));
        }
        self.max_name_length = length;
        Ok(self)
    }

    /// Sets the width used for string fields without a declared length.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for zero.
    pub fn with_default_string_width(mut self, width: u32) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(invalid("default-string-width", "must be positive".to_string()));
        }
        self.default_string_width = width;
        Ok(self)
    }

    /// Sets how many suffixes collision resolution tries per field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for zero.
    pub fn with_max_suffix_attempts(mut self, attempts: usize) -> Result<Self, ConfigError> {
        if attempts == 0 {
            return Err(invalid("max-suffix-attempts", "must be positive".to_string()));
        }
        self.max_suffix_attempts = attempts;
        Ok(self)
    }

    #[must_use]
    pub fn max_name_length(&self) -> usize {
        self.max_name_length
    }

    #[must_use]
    pub fn default_string_width(&self) -> u32 {
        self.default_string_width
    }

    #[must_use]
    pub fn max_suffix_attempts(&self) -> usize {
        self.max_suffix_attempts
    }
}

fn invalid(option: &str, message: String) -> ConfigError {
    ConfigError::InvalidOption {
        option: option.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MapperOptions::default();
        assert_eq!(options.max_name_length(), 10);
        assert_eq!(options.default_string_width(), 255);
        assert_eq!(options.max_suffix_attempts(), 10_000);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = MapperOptions::default().with_max_name_length(0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid max-name-length option: must be at least 3, got 0"
        );
        assert!(MapperOptions::default().with_default_string_width(0).is_err());
        assert!(MapperOptions::default().with_max_suffix_attempts(0).is_err());
    }

    #[test]
    fn test_setters_chain() {
        let options = MapperOptions::default()
            .with_max_name_length(3)
            .and_then(|o| o.with_default_string_width(80))
            .and_then(|o| o.with_max_suffix_attempts(5))
            .unwrap();
        assert_eq!(options.max_name_length(), 3);
        assert_eq!(options.default_string_width(), 80);
        assert_eq!(options.max_suffix_attempts(), 5);
    }
}
