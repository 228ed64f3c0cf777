//! Shapefile reading for country boundaries.

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::Winding;
use shapefile::{dbase::{FieldValue, Record}, Reader, Shape};

use crate::aggregate::CountryRecord;

/// Read boundaries and their `name_field` attribute from a `.shp` file.
///
/// Geometries and records are returned index-aligned, in file order.
pub fn read_boundaries_shp(path: &Path, name_field: &str) -> Result<(Vec<geo::MultiPolygon<f64>>, Vec<CountryRecord>)> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut geometries = Vec::with_capacity(reader.shape_count()?);
    let mut records = Vec::with_capacity(geometries.capacity());
    for (i, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.context("[io::shp] Error reading shape+record")?;
        geometries.push(shape_to_geo(&shape)
            .with_context(|| format!("[io::shp] Unsupported geometry for record {i}"))?);
        records.push(CountryRecord::new(record_name(&record, name_field)
            .with_context(|| format!("[io::shp] Record {i} has no usable `{name_field}`"))?));
    }
    Ok((geometries, records))
}

fn record_name(record: &Record, name_field: &str) -> Result<String> {
    match record.get(name_field) {
        Some(FieldValue::Character(Some(name))) | Some(FieldValue::Memo(name)) => Ok(name.trim().to_string()),
        Some(other) => bail!("field `{name_field}` is not text: {other:?}"),
        None => bail!("field `{name_field}` not found"),
    }
}

/// Convert a polygon shape (2-D, M or Z) to a MultiPolygon, ignoring M/Z.
fn shape_to_geo(shape: &Shape) -> Result<geo::MultiPolygon<f64>> {
    macro_rules! rings {
        ($polygon:expr) => {
            $polygon.rings().iter()
                .map(|ring| ring.points().iter().map(|pt| geo::Coord { x: pt.x, y: pt.y }).collect())
                .collect::<Vec<Vec<geo::Coord<f64>>>>()
        };
    }
    match shape {
        Shape::Polygon(p) => Ok(rings_to_geo(rings!(p))),
        Shape::PolygonM(p) => Ok(rings_to_geo(rings!(p))),
        Shape::PolygonZ(p) => Ok(rings_to_geo(rings!(p))),
        Shape::NullShape => Ok(geo::MultiPolygon(Vec::new())),
        other => bail!("expected a polygon, found {:?}", other.shapetype()),
    }
}

/// Group Shapefile rings into polygons: each clockwise (exterior) ring
/// starts a polygon, counter-clockwise rings that follow are its holes.
/// A hole with no preceding exterior is kept as its own polygon.
fn rings_to_geo(rings: Vec<Vec<geo::Coord<f64>>>) -> geo::MultiPolygon<f64> {
    let mut polygons: Vec<geo::Polygon<f64>> = Vec::new();
    for coords in rings {
        let mut ring = geo::LineString(coords);
        ring.close();
        match polygons.last_mut() {
            Some(polygon) if !ring.is_cw() => polygon.interiors_push(ring),
            _ => polygons.push(geo::Polygon::new(ring, Vec::new())),
        }
    }
    geo::MultiPolygon(polygons)
}
