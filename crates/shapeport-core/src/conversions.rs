//! Conversions between [`Geometry`] and `GeoJSON` geometries.
//!
//! Keyed writers take record geometries as `GeoJSON`, so exported geometries
//! pass through here on their way out. Positions with three ordinates are read
//! as 3D; a `GeoJSON` geometry must not mix 2- and 3-ordinate positions.
//! `GeoJSON` has no linear ring type, so rings are written as line strings.

use std::str::FromStr;

use geojson::{GeoJson, Value};

use crate::error::GeometryError;
use crate::geometry::{
    Coord, Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Srid,
};

/// Converts a `GeoJSON` geometry, tagging every part with `srid`.
///
/// # Errors
///
/// Returns [`GeometryError::Conversion`] for positions with fewer than two
/// ordinates and [`GeometryError::MixedDimensions`] for mixed 2D/3D input.
pub fn from_geojson(
    geometry: &geojson::Geometry,
    srid: Option<&Srid>,
) -> Result<Geometry, GeometryError> {
    convert_value(&geometry.value, srid)
}

/// Converts `geometry` to a `GeoJSON` geometry.
#[must_use]
pub fn to_geojson(geometry: &Geometry) -> geojson::Geometry {
    geojson::Geometry::new(to_value(geometry))
}

/// Parses `GeoJSON` text holding a geometry or a feature with a geometry.
///
/// # Errors
///
/// Returns [`GeometryError::Conversion`] when the text is not `GeoJSON`, is a
/// feature collection, or is a feature without geometry.
pub fn parse_geojson(text: &str, srid: Option<&Srid>) -> Result<Geometry, GeometryError> {
    let geojson = GeoJson::from_str(text).map_err(|err| GeometryError::Conversion {
        message: format!("Failed to parse GeoJSON: {err}"),
    })?;

    match geojson {
        GeoJson::Geometry(geometry) => from_geojson(&geometry, srid),
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => from_geojson(&geometry, srid),
            None => Err(GeometryError::Conversion {
                message: "Feature has no geometry".to_string(),
            }),
        },
        GeoJson::FeatureCollection(_) => Err(GeometryError::Conversion {
            message: "Expected a single geometry or feature, found a FeatureCollection"
                .to_string(),
        }),
    }
}

fn convert_value(value: &Value, srid: Option<&Srid>) -> Result<Geometry, GeometryError> {
    let geometry = match value {
        Value::Point(position) => Geometry::Point(point(position, srid)?),
        Value::LineString(positions) => Geometry::LineString(line_string(positions, srid)?),
        Value::Polygon(rings) => Geometry::Polygon(polygon(rings, srid)?),
        Value::MultiPoint(positions) => {
            let points = positions
                .iter()
                .map(|p| point(p, srid))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::MultiPoint(MultiPoint::new(points, srid.cloned())?)
        },
        Value::MultiLineString(lines) => {
            let lines = lines
                .iter()
                .map(|l| line_string(l, srid))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::MultiLineString(MultiLineString::new(lines, srid.cloned())?)
        },
        Value::MultiPolygon(polygons) => {
            let polygons = polygons
                .iter()
                .map(|p| polygon(p, srid))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::MultiPolygon(MultiPolygon::new(polygons, srid.cloned())?)
        },
        Value::GeometryCollection(geometries) => {
            let members = geometries
                .iter()
                .map(|g| from_geojson(g, srid))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::GeometryCollection(GeometryCollection::new(members, srid.cloned())?)
        },
    };
    Ok(geometry)
}

fn coord(position: &[f64]) -> Result<Coord, GeometryError> {
    match *position {
        [x, y] => Ok(Coord::xy(x, y)),
        [x, y, z, ..] => Ok(Coord::xyz(x, y, z)),
        _ => Err(GeometryError::Conversion {
            message: format!("Position needs at least 2 ordinates, got {}", position.len()),
        }),
    }
}

fn coords(positions: &[Vec<f64>]) -> Result<Vec<Coord>, GeometryError> {
    positions.iter().map(|p| coord(p)).collect()
}

fn point(position: &[f64], srid: Option<&Srid>) -> Result<Point, GeometryError> {
    Ok(Point::new(coord(position)?, srid.cloned()))
}

fn line_string(positions: &[Vec<f64>], srid: Option<&Srid>) -> Result<LineString, GeometryError> {
    LineString::new(coords(positions)?, srid.cloned())
}

fn polygon(rings: &[Vec<Vec<f64>>], srid: Option<&Srid>) -> Result<Polygon, GeometryError> {
    let rings = rings
        .iter()
        .map(|ring| LinearRing::new(coords(ring)?, srid.cloned()))
        .collect::<Result<Vec<_>, _>>()?;
    Polygon::new(rings, srid.cloned())
}

fn position(coord: &Coord) -> Vec<f64> {
    match coord.z {
        Some(z) => vec![coord.x, coord.y, z],
        None => vec![coord.x, coord.y],
    }
}

fn positions(coords: &[Coord]) -> Vec<Vec<f64>> {
    coords.iter().map(position).collect()
}

fn polygon_rings(polygon: &Polygon) -> Vec<Vec<Vec<f64>>> {
    polygon.rings().iter().map(|r| positions(r.coords())).collect()
}

fn to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(p) => Value::Point(position(&p.coord())),
        Geometry::LineString(l) => Value::LineString(positions(l.coords())),
        Geometry::LinearRing(r) => Value::LineString(positions(r.coords())),
        Geometry::Polygon(p) => Value::Polygon(polygon_rings(p)),
        Geometry::MultiPoint(m) => {
            Value::MultiPoint(m.points().iter().map(|p| position(&p.coord())).collect())
        },
        Geometry::MultiLineString(m) => Value::MultiLineString(
            m.line_strings().iter().map(|l| positions(l.coords())).collect(),
        ),
        Geometry::MultiPolygon(m) => {
            Value::MultiPolygon(m.polygons().iter().map(polygon_rings).collect())
        },
        Geometry::GeometryCollection(c) => {
            Value::GeometryCollection(c.geometries().iter().map(to_geojson).collect())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dimension;

    #[test]
    fn test_parse_3d_point() {
        let geometry =
            parse_geojson(r#"{"type": "Point", "coordinates": [1.0, 2.0, 3.0]}"#, None).unwrap();
        assert_eq!(geometry, Geometry::from(Point::new(Coord::xyz(1.0, 2.0, 3.0), None)));
    }

    #[test]
    fn test_parse_feature_polygon_with_srid() {
        let text = r#"{
            "type": "Feature",
            "properties": {"name": "block"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]],
                    [[1, 1], [2, 1], [2, 2], [1, 1]]
                ]
            }
        }"#;
        let srid = Srid::Code(4326);
        let geometry = parse_geojson(text, Some(&srid)).unwrap();

        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.rings().len(), 2);
        assert_eq!(polygon.interiors()[0].len(), 4);
        assert_eq!(polygon.dimension(), Dimension::Xy);
        assert_eq!(polygon.srid(), Some(&srid));
        assert_eq!(polygon.exterior().unwrap().srid(), Some(&srid));
    }

    #[test]
    fn test_mixed_positions_are_rejected() {
        let result = parse_geojson(
            r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1, 1]]}"#,
            None,
        );
        assert!(matches!(result, Err(GeometryError::MixedDimensions { .. })));
    }

    #[test]
    fn test_short_position_is_rejected() {
        let result = parse_geojson(r#"{"type": "Point", "coordinates": [1.0]}"#, None);
        assert!(matches!(result, Err(GeometryError::Conversion { .. })));
    }

    #[test]
    fn test_feature_collection_is_rejected() {
        let result = parse_geojson(r#"{"type": "FeatureCollection", "features": []}"#, None);
        assert!(matches!(result, Err(GeometryError::Conversion { .. })));
    }

    #[test]
    fn test_linear_ring_exports_as_line_string() {
        let ring = LinearRing::new(
            vec![
                Coord::xyz(0.0, 0.0, 1.0),
                Coord::xyz(1.0, 0.0, 1.0),
                Coord::xyz(0.0, 0.0, 1.0),
            ],
            None,
        )
        .unwrap();
        let geojson = to_geojson(&Geometry::from(ring));
        assert_eq!(
            geojson.value,
            Value::LineString(vec![
                vec![0.0, 0.0, 1.0],
                vec![1.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0]
            ])
        );
    }

    #[test]
    fn test_multi_polygon_survives_export_and_import() {
        let text = r#"{"type": "MultiPolygon", "coordinates": [
            [[[0, 0, 5], [1, 0, 5], [1, 1, 5], [0, 0, 5]]],
            [[[2, 2, 6], [3, 2, 6], [3, 3, 6], [2, 2, 6]]]
        ]}"#;
        let geometry = parse_geojson(text, None).unwrap();
        assert!(geometry.has_z());

        let exported = to_geojson(&geometry);
        assert_eq!(from_geojson(&exported, None).unwrap(), geometry);
    }
}
