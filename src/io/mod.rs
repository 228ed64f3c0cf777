//! IO module for format-specific reading and writing operations.
//!
//! # Format Modules
//!
//! - `csv` - long-format raster input and country-series export
//! - `shp` - Shapefile country boundaries
//! - `geojson` - GeoJSON country boundaries
//! - `report` - writing a whole report to a directory

mod csv;
mod geojson;
mod report;
mod shp;

pub use csv::*;
pub use geojson::*;
pub use report::*;
pub use shp::*;

use std::path::Path;

use anyhow::{bail, Result};

use crate::aggregate::CountryRecord;

/// Read country boundaries, picking the format from the file extension
/// (`.shp`, `.geojson` or `.json`).
pub fn read_boundaries(path: &Path, name_field: &str) -> Result<(Vec<geo::MultiPolygon<f64>>, Vec<CountryRecord>)> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("shp") => read_boundaries_shp(path, name_field),
        Some("geojson" | "json") => read_boundaries_geojson(path, name_field),
        _ => bail!("[io] Unsupported boundary file {} (expected .shp, .geojson or .json)", path.display()),
    }
}
