//! `geozero` integration.
//!
//! Implementing [`GeozeroGeometry`] lets any `geozero` processor consume a
//! [`Geometry`], which gives WKT output through [`geozero::ToWkt`]:
//!
//! ```
//! use geozero::ToWkt;
//! use shapeport_core::geometry::{Coord, Geometry, Point};
//!
//! let point = Geometry::from(Point::new(Coord::xy(1.0, 2.0), None));
//! assert_eq!(point.to_wkt()?, "POINT(1 2)");
//! # Ok::<(), geozero::error::GeozeroError>(())
//! ```

use geozero::error::Result as GeozeroResult;
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry};

use crate::geometry::{Coord, Geometry, LineString, Polygon, Srid};

impl GeozeroGeometry for Geometry {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> GeozeroResult<()> {
        process_geometry(self, 0, processor)
    }

    fn dims(&self) -> CoordDimensions {
        if self.has_z() {
            CoordDimensions::xyz()
        } else {
            CoordDimensions::xy()
        }
    }

    fn srid(&self) -> Option<i32> {
        Geometry::srid(self).and_then(Srid::as_code)
    }
}

fn process_geometry<P: GeomProcessor>(
    geometry: &Geometry,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    match geometry {
        Geometry::Point(point) => {
            processor.point_begin(idx)?;
            process_coord(&point.coord(), 0, processor)?;
            processor.point_end(idx)
        },
        Geometry::LineString(line) => process_line_string(line, true, idx, processor),
        Geometry::LinearRing(ring) => {
            process_line_string(ring.as_line_string(), true, idx, processor)
        },
        Geometry::Polygon(polygon) => process_polygon(polygon, true, idx, processor),
        Geometry::MultiPoint(multi) => {
            processor.multipoint_begin(multi.len(), idx)?;
            for (i, point) in multi.points().iter().enumerate() {
                process_coord(&point.coord(), i, processor)?;
            }
            processor.multipoint_end(idx)
        },
        Geometry::MultiLineString(multi) => {
            processor.multilinestring_begin(multi.len(), idx)?;
            for (i, line) in multi.line_strings().iter().enumerate() {
                process_line_string(line, false, i, processor)?;
            }
            processor.multilinestring_end(idx)
        },
        Geometry::MultiPolygon(multi) => {
            processor.multipolygon_begin(multi.len(), idx)?;
            for (i, polygon) in multi.polygons().iter().enumerate() {
                process_polygon(polygon, false, i, processor)?;
            }
            processor.multipolygon_end(idx)
        },
        Geometry::GeometryCollection(collection) => {
            processor.geometrycollection_begin(collection.len(), idx)?;
            for (i, member) in collection.geometries().iter().enumerate() {
                process_geometry(member, i, processor)?;
            }
            processor.geometrycollection_end(idx)
        },
    }
}

fn process_coord<P: GeomProcessor>(
    coord: &Coord,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    if processor.multi_dim() {
        processor.coordinate(coord.x, coord.y, coord.z, None, None, None, idx)
    } else {
        processor.xy(coord.x, coord.y, idx)
    }
}

fn process_line_string<P: GeomProcessor>(
    line: &LineString,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.linestring_begin(tagged, line.len(), idx)?;
    for (i, coord) in line.coords().iter().enumerate() {
        process_coord(coord, i, processor)?;
    }
    processor.linestring_end(tagged, idx)
}

fn process_polygon<P: GeomProcessor>(
    polygon: &Polygon,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.polygon_begin(tagged, polygon.rings().len(), idx)?;
    for (i, ring) in polygon.rings().iter().enumerate() {
        process_line_string(ring.as_line_string(), false, i, processor)?;
    }
    processor.polygon_end(tagged, idx)
}

#[cfg(test)]
mod tests {
    use geozero::ToWkt;

    use super::*;
    use crate::geometry::{LinearRing, MultiPoint, Point};

    #[test]
    fn test_line_string_wkt() {
        let line = Geometry::from(
            LineString::new(vec![Coord::xy(0.0, 0.0), Coord::xy(1.5, 2.0)], None).unwrap(),
        );
        assert_eq!(line.to_wkt().unwrap(), "LINESTRING(0 0,1.5 2)");
    }

    #[test]
    fn test_polygon_wkt() {
        let ring = LinearRing::new(
            vec![
                Coord::xy(0.0, 0.0),
                Coord::xy(1.0, 0.0),
                Coord::xy(1.0, 1.0),
                Coord::xy(0.0, 0.0),
            ],
            None,
        )
        .unwrap();
        let polygon = Geometry::from(Polygon::new(vec![ring], None).unwrap());
        assert_eq!(polygon.to_wkt().unwrap(), "POLYGON((0 0,1 0,1 1,0 0))");
    }

    #[test]
    fn test_3d_coordinates_are_written() {
        let points = Geometry::from(
            MultiPoint::new(
                vec![
                    Point::new(Coord::xyz(1.0, 2.0, 3.0), None),
                    Point::new(Coord::xyz(4.0, 5.0, 6.0), None),
                ],
                None,
            )
            .unwrap(),
        );
        let wkt = points.to_wkt_ndim(points.dims()).unwrap();
        assert!(wkt.starts_with("MULTIPOINT"));
        assert!(wkt.contains("1 2 3"));
        assert!(wkt.contains("4 5 6"));
    }

    #[test]
    fn test_srid_code_is_exposed() {
        let point = Geometry::from(Point::new(Coord::xy(0.0, 0.0), Some(Srid::Code(4326))));
        assert_eq!(GeozeroGeometry::srid(&point), Some(4326));

        let named = Geometry::from(Point::new(Coord::xy(0.0, 0.0), Some(Srid::from("CRS84"))));
        assert_eq!(GeozeroGeometry::srid(&named), None);
    }
}
