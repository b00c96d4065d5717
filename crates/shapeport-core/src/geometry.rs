//! Geometry model exchanged with shapefile writers.
//!
//! Geometries form a closed sum type ([`Geometry`]) over the simple-feature
//! variants a shapefile layer can hold. Every value carries its
//! [`Dimension`] and an optional spatial reference identifier ([`Srid`]).
//! Constructors reject structures that mix 2D and 3D coordinates, so a
//! geometry's dimension always describes every coordinate inside it.
//!
//! # Examples
//!
//! ```
//! use shapeport_core::geometry::{Coord, Dimension, Geometry, LineString, Srid};
//!
//! let line = LineString::new(
//!     vec![Coord::xy(0.0, 0.0), Coord::xy(1.0, 1.0)],
//!     Some(Srid::Code(4326)),
//! )?;
//! let geometry = Geometry::from(line);
//!
//! assert_eq!(geometry.geom_type(), "LineString");
//! assert_eq!(geometry.dimension(), Dimension::Xy);
//! assert!(!geometry.has_z());
//! # Ok::<(), shapeport_core::error::GeometryError>(())
//! ```

use std::fmt;

use crate::error::GeometryError;

/// Number of spatial ordinates carried by each coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Planar coordinates (x, y).
    Xy,
    /// Coordinates with elevation (x, y, z).
    Xyz,
}

impl Dimension {
    /// Returns the number of ordinates, 2 or 3.
    #[must_use]
    pub fn size(self) -> u8 {
        match self {
            Dimension::Xy => 2,
            Dimension::Xyz => 3,
        }
    }
}

impl TryFrom<u8> for Dimension {
    type Error = GeometryError;

    fn try_from(dimensions: u8) -> Result<Self, Self::Error> {
        match dimensions {
            2 => Ok(Dimension::Xy),
            3 => Ok(Dimension::Xyz),
            _ => Err(GeometryError::InvalidDimension { dimensions }),
        }
    }
}

/// Spatial reference identifier attached to a geometry.
///
/// The identifier is opaque to this crate and is carried through every
/// transformation unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Srid {
    /// Numeric code, usually an EPSG code.
    Code(i32),
    /// Free-form token such as `"urn:ogc:def:crs:OGC::CRS84"`.
    Token(String),
}

impl Srid {
    /// Returns the numeric code, if this identifier is one.
    #[must_use]
    pub fn as_code(&self) -> Option<i32> {
        match self {
            Srid::Code(code) => Some(*code),
            Srid::Token(_) => None,
        }
    }
}

impl From<i32> for Srid {
    fn from(code: i32) -> Self {
        Srid::Code(code)
    }
}

impl From<&str> for Srid {
    fn from(token: &str) -> Self {
        Srid::Token(token.to_string())
    }
}

impl fmt::Display for Srid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Srid::Code(code) => write!(f, "{code}"),
            Srid::Token(token) => f.write_str(token),
        }
    }
}

/// A single coordinate tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// First ordinate (easting or longitude).
    pub x: f64,
    /// Second ordinate (northing or latitude).
    pub y: f64,
    /// Third ordinate, present only on 3D coordinates.
    pub z: Option<f64>,
}

impl Coord {
    /// Creates a 2D coordinate.
    #[must_use]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a 3D coordinate.
    #[must_use]
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Dimension implied by the presence of `z`.
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        if self.z.is_some() {
            Dimension::Xyz
        } else {
            Dimension::Xy
        }
    }
}

/// Checks that every item shares one dimension. Empty input is 2D.
fn uniform_dimension(
    mut dimensions: impl Iterator<Item = Dimension>,
    geometry_type: &str,
) -> Result<Dimension, GeometryError> {
    let Some(first) = dimensions.next() else {
        return Ok(Dimension::Xy);
    };
    if dimensions.all(|d| d == first) {
        Ok(first)
    } else {
        Err(GeometryError::MixedDimensions {
            geometry_type: geometry_type.to_string(),
        })
    }
}

/// A single position.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coord: Coord,
    srid: Option<Srid>,
}

impl Point {
    /// Creates a point; its dimension follows the coordinate.
    #[must_use]
    pub fn new(coord: Coord, srid: Option<Srid>) -> Self {
        Self { coord, srid }
    }

    /// The point's coordinate.
    #[must_use]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.coord.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.coord.y
    }

    #[must_use]
    pub fn z(&self) -> Option<f64> {
        self.coord.z
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.coord.dimension()
    }

    #[must_use]
    pub fn srid(&self) -> Option<&Srid> {
        self.srid.as_ref()
    }
}

/// An ordered sequence of coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    coords: Vec<Coord>,
    dimension: Dimension,
    srid: Option<Srid>,
}

impl LineString {
    /// Creates a line string from coordinates of one dimension.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MixedDimensions`] when 2D and 3D coordinates
    /// are mixed.
    pub fn new(coords: Vec<Coord>, srid: Option<Srid>) -> Result<Self, GeometryError> {
        let dimension = uniform_dimension(coords.iter().map(Coord::dimension), "LineString")?;
        Ok(Self {
            coords,
            dimension,
            srid,
        })
    }

    /// Creates an empty line string of the given dimension.
    #[must_use]
    pub fn empty(dimension: Dimension, srid: Option<Srid>) -> Self {
        Self {
            coords: Vec::new(),
            dimension,
            srid,
        }
    }

    /// Assembles a line string whose coordinates are already known to match
    /// `dimension`.
    pub(crate) fn from_parts(coords: Vec<Coord>, dimension: Dimension, srid: Option<Srid>) -> Self {
        Self {
            coords,
            dimension,
            srid,
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn srid(&self) -> Option<&Srid> {
        self.srid.as_ref()
    }
}

/// A line string used as a polygon boundary.
///
/// Closure is not enforced; rings keep whatever closure the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing(LineString);

impl LinearRing {
    /// Creates a ring from coordinates of one dimension.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MixedDimensions`] when 2D and 3D coordinates
    /// are mixed.
    pub fn new(coords: Vec<Coord>, srid: Option<Srid>) -> Result<Self, GeometryError> {
        let dimension = uniform_dimension(coords.iter().map(Coord::dimension), "LinearRing")?;
        Ok(Self(LineString::from_parts(coords, dimension, srid)))
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        self.0.coords()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when the first and last coordinates are equal.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.0.coords.first(), self.0.coords.last()) {
            (Some(first), Some(last)) => first == last,
            _ => true,
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.0.dimension()
    }

    #[must_use]
    pub fn srid(&self) -> Option<&Srid> {
        self.0.srid()
    }

    /// Borrows the ring as a plain line string.
    #[must_use]
    pub fn as_line_string(&self) -> &LineString {
        &self.0
    }

    #[must_use]
    pub fn into_line_string(self) -> LineString {
        self.0
    }
}

impl From<LineString> for LinearRing {
    fn from(line: LineString) -> Self {
        Self(line)
    }
}

/// A polygon made of an exterior ring followed by zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<LinearRing>,
    dimension: Dimension,
    srid: Option<Srid>,
}

impl Polygon {
    /// Creates a polygon; the first ring is the exterior.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MixedDimensions`] when rings disagree on
    /// dimension.
    pub fn new(rings: Vec<LinearRing>, srid: Option<Srid>) -> Result<Self, GeometryError> {
        let dimension = uniform_dimension(rings.iter().map(LinearRing::dimension), "Polygon")?;
        Ok(Self {
            rings,
            dimension,
            srid,
        })
    }

    pub(crate) fn from_parts(
        rings: Vec<LinearRing>,
        dimension: Dimension,
        srid: Option<Srid>,
    ) -> Self {
        Self {
            rings,
            dimension,
            srid,
        }
    }

    /// All rings, exterior first.
    #[must_use]
    pub fn rings(&self) -> &[LinearRing] {
        &self.rings
    }

    #[must_use]
    pub fn exterior(&self) -> Option<&LinearRing> {
        self.rings.first()
    }

    #[must_use]
    pub fn interiors(&self) -> &[LinearRing] {
        self.rings.get(1..).unwrap_or_default()
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn srid(&self) -> Option<&Srid> {
        self.srid.as_ref()
    }
}

/// Generates a homogeneous multi-geometry wrapper around a member type.
macro_rules! multi_geometry {
    ($(#[$meta:meta])* $name:ident, $member:ident, $accessor:ident, $type_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            members: Vec<$member>,
            dimension: Dimension,
            srid: Option<Srid>,
        }

        impl $name {
            #[doc = concat!("Creates a ", $type_name, " from members of one dimension.")]
            ///
            /// # Errors
            ///
            /// Returns [`GeometryError::MixedDimensions`] when members disagree on
            /// dimension.
            pub fn new(members: Vec<$member>, srid: Option<Srid>) -> Result<Self, GeometryError> {
                let dimension =
                    uniform_dimension(members.iter().map($member::dimension), $type_name)?;
                Ok(Self {
                    members,
                    dimension,
                    srid,
                })
            }

            #[must_use]
            pub fn $accessor(&self) -> &[$member] {
                &self.members
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.members.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.members.is_empty()
            }

            #[must_use]
            pub fn dimension(&self) -> Dimension {
                self.dimension
            }

            #[must_use]
            pub fn srid(&self) -> Option<&Srid> {
                self.srid.as_ref()
            }
        }
    };
}

multi_geometry!(
    /// An ordered set of points.
    MultiPoint,
    Point,
    points,
    "MultiPoint"
);
multi_geometry!(
    /// An ordered set of line strings.
    MultiLineString,
    LineString,
    line_strings,
    "MultiLineString"
);
multi_geometry!(
    /// An ordered set of polygons.
    MultiPolygon,
    Polygon,
    polygons,
    "MultiPolygon"
);
multi_geometry!(
    /// A heterogeneous, ordered set of geometries.
    GeometryCollection,
    Geometry,
    geometries,
    "GeometryCollection"
);

/// Unvalidated constructors for the multi-geometries the coercer rebuilds.
macro_rules! from_parts {
    ($($name:ident => $member:ident),* $(,)?) => {
        $(
            impl $name {
                pub(crate) fn from_parts(
                    members: Vec<$member>,
                    dimension: Dimension,
                    srid: Option<Srid>,
                ) -> Self {
                    Self {
                        members,
                        dimension,
                        srid,
                    }
                }
            }
        )*
    };
}

from_parts!(
    MultiPoint => Point,
    MultiLineString => LineString,
    MultiPolygon => Polygon,
);

/// Any geometry a shapefile export can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// Simple-feature type name, e.g. `"MultiPolygon"`.
    #[must_use]
    pub fn geom_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::LinearRing(_) => "LinearRing",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Geometry::Point(g) => g.dimension(),
            Geometry::LineString(g) => g.dimension(),
            Geometry::LinearRing(g) => g.dimension(),
            Geometry::Polygon(g) => g.dimension(),
            Geometry::MultiPoint(g) => g.dimension(),
            Geometry::MultiLineString(g) => g.dimension(),
            Geometry::MultiPolygon(g) => g.dimension(),
            Geometry::GeometryCollection(g) => g.dimension(),
        }
    }

    /// Returns `true` for 3D geometries.
    #[must_use]
    pub fn has_z(&self) -> bool {
        self.dimension() == Dimension::Xyz
    }

    #[must_use]
    pub fn srid(&self) -> Option<&Srid> {
        match self {
            Geometry::Point(g) => g.srid(),
            Geometry::LineString(g) => g.srid(),
            Geometry::LinearRing(g) => g.srid(),
            Geometry::Polygon(g) => g.srid(),
            Geometry::MultiPoint(g) => g.srid(),
            Geometry::MultiLineString(g) => g.srid(),
            Geometry::MultiPolygon(g) => g.srid(),
            Geometry::GeometryCollection(g) => g.srid(),
        }
    }
}

impl From<Point> for Geometry {
    fn from(g: Point) -> Self {
        Geometry::Point(g)
    }
}

impl From<LineString> for Geometry {
    fn from(g: LineString) -> Self {
        Geometry::LineString(g)
    }
}

impl From<LinearRing> for Geometry {
    fn from(g: LinearRing) -> Self {
        Geometry::LinearRing(g)
    }
}

impl From<Polygon> for Geometry {
    fn from(g: Polygon) -> Self {
        Geometry::Polygon(g)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(g: MultiPoint) -> Self {
        Geometry::MultiPoint(g)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(g: MultiLineString) -> Self {
        Geometry::MultiLineString(g)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(g: MultiPolygon) -> Self {
        Geometry::MultiPolygon(g)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(g: GeometryCollection) -> Self {
        Geometry::GeometryCollection(g)
    }
}
