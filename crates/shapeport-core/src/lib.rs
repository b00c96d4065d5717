//! `shapeport-core` is the core library for the `shapeport` project, preparing records
//! for export to shapefile-format datasets.
//!
//! This crate includes:
//! - **Geometry model**: A closed sum type over simple-feature geometries with explicit
//!   dimension and spatial reference identifier.
//! - **Dimension coercion**: [`coerce::GeometryCoercer`] converts geometries between 2D and 3D.
//! - **Schema mapping**: [`mapping::SchemaMapper`] turns field descriptors into an
//!   engine-specific output schema with collision-free, length-limited names.
//! - **Engine registry**: The writer engines a schema can be built for and their default
//!   type tables.
//!
//! Writing the binary shapefile itself is left to the caller.

pub mod coerce;
pub mod config;
pub mod conversions;
pub mod engines;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod mapping;
pub mod operations;
pub mod wkt;
