//! GeoJSON reading for country boundaries.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::aggregate::CountryRecord;

/// Read boundaries and their `name_field` property from a GeoJSON file.
pub fn read_boundaries_geojson(path: &Path, name_field: &str) -> Result<(Vec<MultiPolygon<f64>>, Vec<CountryRecord>)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read GeoJSON file: {}", path.display()))?;
    read_boundaries_geojson_bytes(&bytes, name_field)
        .with_context(|| format!("[io::geojson] Invalid boundaries in {}", path.display()))
}

/// Read boundaries from GeoJSON FeatureCollection bytes.
///
/// Polygon and MultiPolygon features are accepted; a null geometry yields an
/// empty MultiPolygon so the feature still pairs with its record.
pub fn read_boundaries_geojson_bytes(bytes: &[u8], name_field: &str) -> Result<(Vec<MultiPolygon<f64>>, Vec<CountryRecord>)> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON bytes")?;
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] Expected a FeatureCollection with a `features` array"))?;

    let mut geometries = Vec::with_capacity(features.len());
    let mut records = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let name = feature["properties"][name_field].as_str()
            .ok_or_else(|| anyhow!("[io::geojson] Feature {i} has no string property `{name_field}`"))?;
        let geometry = parse_geometry(&feature["geometry"])
            .with_context(|| format!("[io::geojson] Feature {i} ({name}) has invalid geometry"))?;
        geometries.push(geometry);
        records.push(CountryRecord::new(name));
    }
    Ok((geometries, records))
}

fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    if geometry.is_null() {
        return Ok(MultiPolygon(Vec::new()));
    }
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("missing `coordinates`"))?;
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => Ok(MultiPolygon(
            coords.iter()
                .map(|polygon| parse_polygon(polygon.as_array().ok_or_else(|| anyhow!("polygon must be an array"))?))
                .collect::<Result<Vec<_>>>()?,
        )),
        Some(other) => bail!("unsupported geometry type `{other}`"),
        None => bail!("missing geometry `type`"),
    }
}

/// Parse `[exterior, hole, hole, ...]` ring arrays into a Polygon.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        parse_ring(ring.as_array().ok_or_else(|| anyhow!("ring must be an array"))?)
    });
    let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of `[x, y]` positions; closes the ring if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|position| {
            let x = position[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = position[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Square"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]], [[0.5,0.5],[1,0.5],[1,1]]]}},
            {"type": "Feature", "properties": {"name": "Islands"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[5,5],[6,5],[6,6]]], [[[8,8],[9,8],[9,9]]]]}},
            {"type": "Feature", "properties": {"name": "Nowhere"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn reads_polygons_multipolygons_and_null() {
        let (geoms, records) = read_boundaries_geojson_bytes(COLLECTION.as_bytes(), "name").unwrap();
        assert_eq!(geoms.len(), 3);
        assert_eq!(records.iter().map(|r| r.name()).collect::<Vec<_>>(), vec!["Square", "Islands", "Nowhere"]);
        assert_eq!(geoms[0].0[0].interiors().len(), 1);
        assert_eq!(geoms[0].0[0].interiors()[0].0.len(), 4); // closed
        assert_eq!(geoms[1].0.len(), 2);
        assert!(geoms[2].0.is_empty());
    }

    #[test]
    fn missing_name_property_is_an_error() {
        let err = read_boundaries_geojson_bytes(COLLECTION.as_bytes(), "NAME_LONG").unwrap_err();
        assert!(err.to_string().contains("NAME_LONG"));
    }
}
