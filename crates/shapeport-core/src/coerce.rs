//! Dimension coercion for geometries.
//!
//! Shapefile layers carry a single geometry type for every record, so a layer
//! declared as 2D cannot receive 3D features and vice versa. [`GeometryCoercer`]
//! rewrites a geometry into the requested dimension, walking composite
//! geometries member by member while preserving order, counts and the spatial
//! reference identifier.
//!
//! # Examples
//!
//! ```
//! use shapeport_core::coerce::GeometryCoercer;
//! use shapeport_core::geometry::{Coord, Geometry, Point};
//!
//! let coercer = GeometryCoercer::new();
//! let point = Geometry::from(Point::new(Coord::xy(1.0, 2.0), None));
//!
//! let raised = coercer.coerce(point.clone(), 3, 7.0)?;
//! assert_eq!(raised, Geometry::from(Point::new(Coord::xyz(1.0, 2.0, 7.0), None)));
//!
//! let flattened = coercer.coerce(raised, 2, 0.0)?;
//! assert_eq!(flattened, point);
//! # Ok::<(), shapeport_core::error::GeometryError>(())
//! ```

use log::debug;

use crate::error::GeometryError;
use crate::geometry::{
    Coord, Dimension, Geometry, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

/// Default elevation assigned when lifting 2D geometries to 3D.
pub const DEFAULT_Z_VALUE: f64 = 0.0;

/// Converts geometries between 2D and 3D.
///
/// The coercer holds no state; one instance can be shared freely across
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryCoercer;

impl GeometryCoercer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Coerces `geometry` to `dimensions` spatial dimensions.
    ///
    /// When lifting to 3D every coordinate receives `z_value` as its third
    /// ordinate; when flattening to 2D the third ordinate is dropped.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidDimension`] if `dimensions` is not 2 or 3.
    /// - [`GeometryError::UnsupportedGeometry`] for geometry collections.
    pub fn coerce(
        &self,
        geometry: Geometry,
        dimensions: u8,
        z_value: f64,
    ) -> Result<Geometry, GeometryError> {
        let target = Dimension::try_from(dimensions)?;
        self.coerce_to(geometry, target, z_value)
    }

    /// Coerces `geometry` to an already validated [`Dimension`].
    ///
    /// Geometries that are already in the target dimension are returned
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedGeometry`] for geometry collections.
    pub fn coerce_to(
        &self,
        geometry: Geometry,
        target: Dimension,
        z_value: f64,
    ) -> Result<Geometry, GeometryError> {
        if let Geometry::GeometryCollection(_) = geometry {
            return Err(unsupported(&geometry));
        }

        if geometry.dimension() == target {
            return Ok(geometry);
        }

        debug!(
            "Coercing {} from {}D to {}D",
            geometry.geom_type(),
            geometry.dimension().size(),
            target.size()
        );

        let coerced = match geometry {
            Geometry::Point(point) => Geometry::Point(coerce_point(point, target, z_value)),
            Geometry::LineString(line) => {
                Geometry::LineString(coerce_line_string(line, target, z_value))
            },
            Geometry::LinearRing(ring) => {
                Geometry::LinearRing(coerce_linear_ring(ring, target, z_value))
            },
            Geometry::Polygon(polygon) => {
                Geometry::Polygon(coerce_polygon(polygon, target, z_value))
            },
            Geometry::MultiPoint(multi) => {
                Geometry::MultiPoint(coerce_multi_point(multi, target, z_value))
            },
            Geometry::MultiLineString(multi) => {
                Geometry::MultiLineString(coerce_multi_line_string(multi, target, z_value))
            },
            Geometry::MultiPolygon(multi) => {
                Geometry::MultiPolygon(coerce_multi_polygon(multi, target, z_value))
            },
            collection @ Geometry::GeometryCollection(_) => {
                return Err(unsupported(&collection));
            },
        };

        Ok(coerced)
    }

    /// Flattens `geometry` to 2D.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedGeometry`] for geometry collections.
    pub fn to_2d(&self, geometry: Geometry) -> Result<Geometry, GeometryError> {
        self.coerce_to(geometry, Dimension::Xy, DEFAULT_Z_VALUE)
    }

    /// Lifts `geometry` to 3D using `z_value` for new ordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedGeometry`] for geometry collections.
    pub fn to_3d(&self, geometry: Geometry, z_value: f64) -> Result<Geometry, GeometryError> {
        self.coerce_to(geometry, Dimension::Xyz, z_value)
    }
}

fn unsupported(geometry: &Geometry) -> GeometryError {
    GeometryError::UnsupportedGeometry {
        geometry_type: geometry.geom_type().to_string(),
    }
}

fn coerce_coord(coord: Coord, target: Dimension, z_value: f64) -> Coord {
    match target {
        Dimension::Xy => Coord::xy(coord.x, coord.y),
        Dimension::Xyz => Coord::xyz(coord.x, coord.y, z_value),
    }
}

fn coerce_point(point: Point, target: Dimension, z_value: f64) -> Point {
    let coord = coerce_coord(point.coord(), target, z_value);
    Point::new(coord, point.srid().cloned())
}

fn coerce_line_string(line: LineString, target: Dimension, z_value: f64) -> LineString {
    let coords = line
        .coords()
        .iter()
        .map(|c| coerce_coord(*c, target, z_value))
        .collect();
    LineString::from_parts(coords, target, line.srid().cloned())
}

// Rings share the line string algorithm; closure is carried over untouched.
fn coerce_linear_ring(ring: LinearRing, target: Dimension, z_value: f64) -> LinearRing {
    LinearRing::from(coerce_line_string(ring.into_line_string(), target, z_value))
}

fn coerce_polygon(polygon: Polygon, target: Dimension, z_value: f64) -> Polygon {
    let srid = polygon.srid().cloned();
    let rings = polygon
        .rings()
        .iter()
        .cloned()
        .map(|ring| coerce_linear_ring(ring, target, z_value))
        .collect();
    Polygon::from_parts(rings, target, srid)
}

fn coerce_multi_point(multi: MultiPoint, target: Dimension, z_value: f64) -> MultiPoint {
    let points = multi
        .points()
        .iter()
        .cloned()
        .map(|p| coerce_point(p, target, z_value))
        .collect();
    MultiPoint::from_parts(points, target, multi.srid().cloned())
}

fn coerce_multi_line_string(
    multi: MultiLineString,
    target: Dimension,
    z_value: f64,
) -> MultiLineString {
    let lines = multi
        .line_strings()
        .iter()
        .cloned()
        .map(|l| coerce_line_string(l, target, z_value))
        .collect();
    MultiLineString::from_parts(lines, target, multi.srid().cloned())
}

fn coerce_multi_polygon(multi: MultiPolygon, target: Dimension, z_value: f64) -> MultiPolygon {
    let polygons = multi
        .polygons()
        .iter()
        .cloned()
        .map(|p| coerce_polygon(p, target, z_value))
        .collect();
    MultiPolygon::from_parts(polygons, target, multi.srid().cloned())
}
