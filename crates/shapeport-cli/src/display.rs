//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting engines and resolved schemas in a human-readable format.

use tabled::{Table, Tabled};

use shapeport_core::engines::Engine;
use shapeport_core::mapping::{FieldMap, FieldMapping};

/// Table row representation for displaying engine information.
#[derive(Tabled)]
pub struct EngineRow {
    /// Short identifier for the engine (e.g., `keyed`, `ogr`).
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the engine.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Schema representation family.
    #[tabled(rename = "Family")]
    pub family: String,
    /// Number of field types the built-in table maps.
    #[tabled(rename = "Mapped Types")]
    pub mapped_types: usize,
}

impl From<&Engine> for EngineRow {
    fn from(engine: &Engine) -> Self {
        Self {
            short_name: engine.short_name.to_string(),
            long_name: engine.long_name.to_string(),
            family: engine.family.to_string(),
            mapped_types: engine.default_mapping().len(),
        }
    }
}

/// Table row representation for one resolved field.
#[derive(Tabled)]
pub struct FieldMapRow {
    #[tabled(rename = "Field")]
    pub input_name: String,
    #[tabled(rename = "Type")]
    pub input_type: String,
    #[tabled(rename = "Output Name")]
    pub output_name: String,
    #[tabled(rename = "Output Type")]
    pub output_type: String,
    /// Whether the field carries a fixed list of choices.
    #[tabled(rename = "Choices")]
    pub choices: String,
}

impl From<&FieldMap> for FieldMapRow {
    fn from(field_map: &FieldMap) -> Self {
        let field_in = field_map.field_in();
        Self {
            input_name: field_in.name.clone(),
            input_type: field_in.field_type.to_string(),
            output_name: field_map.output_name().to_string(),
            output_type: field_map.field_out().type_token(),
            choices: if field_in.has_choices() { "Yes" } else { "No" }.to_string(),
        }
    }
}

/// Renders the engine table.
#[must_use]
pub fn engines_table(engines: &[Engine]) -> String {
    let rows: Vec<EngineRow> = engines.iter().map(EngineRow::from).collect();
    Table::new(rows).to_string()
}

/// Renders the resolved schema table.
#[must_use]
pub fn schema_table(mapping: &FieldMapping) -> String {
    let rows: Vec<FieldMapRow> = mapping.iter().map(FieldMapRow::from).collect();
    Table::new(rows).to_string()
}

/// Display the available engines in a formatted table.
pub fn display_engines(engines: &[Engine]) {
    println!("\nAvailable Engines ({} total):\n", engines.len());
    println!("{}", engines_table(engines));
}

/// Display a resolved schema in a formatted table.
pub fn display_schema(engine: &Engine, mapping: &FieldMapping) {
    println!("\nEngine: {} ({})", engine.short_name, engine.long_name);
    println!("\n=== Fields ({}) ===", mapping.len());
    println!("{}", schema_table(mapping));
}
