//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{bail, ensure, Context, Result};
use ndarray::Array2;
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReader, DataType}};

use crate::grid::{Raster, LAT, LON};

/// Read a long-format raster (`lat`, `lon`, `value` columns) from a CSV file.
///
/// Rows may come in any order but must cover every (lat, lon) pair of a
/// rectilinear grid exactly once. Empty values become NaN.
pub fn read_raster_csv(path: &Path) -> Result<Raster> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open raster CSV: {}", path.display()))?;
    let df = CsvReader::new(file).finish()
        .with_context(|| format!("[io::csv::read] Failed to parse raster CSV: {}", path.display()))?;
    raster_from_frame(&df)
        .with_context(|| format!("[io::csv::read] Invalid raster CSV: {}", path.display()))
}

/// Parse a long-format raster from CSV text.
pub fn read_raster_csv_string(csv: &str) -> Result<Raster> {
    let df = CsvReader::new(Cursor::new(csv.as_bytes())).finish()
        .context("[io::csv::read] Failed to parse raster CSV text")?;
    raster_from_frame(&df)
}

fn raster_from_frame(df: &DataFrame) -> Result<Raster> {
    let lats = float_column(df, LAT)?;
    let lons = float_column(df, LON)?;
    let values = float_column(df, "value")?;

    let lat_axis = unique_sorted(&lats, LAT)?;
    let lon_axis = unique_sorted(&lons, LON)?;
    ensure!(
        lat_axis.len() * lon_axis.len() == df.height(),
        "[io::csv::read] {} rows do not form a complete {}x{} grid",
        df.height(), lat_axis.len(), lon_axis.len()
    );

    let mut grid = Array2::from_elem((lat_axis.len(), lon_axis.len()), f64::NAN);
    let mut seen = Array2::from_elem((lat_axis.len(), lon_axis.len()), false);
    for ((lat, lon), value) in lats.iter().zip(&lons).zip(&values) {
        let (Some(lat), Some(lon)) = (lat, lon) else { bail!("[io::csv::read] lat/lon must not be empty") };
        let i = position(&lat_axis, *lat);
        let j = position(&lon_axis, *lon);
        ensure!(!seen[(i, j)], "[io::csv::read] cell (lat={lat}, lon={lon}) appears more than once");
        seen[(i, j)] = true;
        grid[(i, j)] = value.unwrap_or(f64::NAN);
    }

    Ok(Raster::from_lat_lon(lat_axis, lon_axis, grid)?)
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)
        .with_context(|| format!("[io::csv::read] Missing column `{name}`"))?
        .cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn unique_sorted(values: &[Option<f64>], name: &str) -> Result<Vec<f64>> {
    let mut axis = values.iter().flatten().copied().collect::<Vec<_>>();
    ensure!(axis.iter().all(|v| v.is_finite()), "[io::csv::read] `{name}` contains non-finite values");
    axis.sort_by(f64::total_cmp);
    axis.dedup();
    Ok(axis)
}

#[inline]
fn position(axis: &[f64], value: f64) -> usize {
    axis.partition_point(|&v| v < value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_unordered_rows_into_grid() {
        let raster = read_raster_csv_string("lat,lon,value\n1,0,3\n0,1,2\n0,0,1\n1,1,\n").unwrap();
        assert_eq!(raster.coord(LAT).unwrap().values(), &[0.0, 1.0]);
        assert_eq!(raster.coord(LON).unwrap().values(), &[0.0, 1.0]);
        assert_eq!(raster.get(&[0, 0]), Some(1.0));
        assert_eq!(raster.get(&[0, 1]), Some(2.0));
        assert_eq!(raster.get(&[1, 0]), Some(3.0));
        assert!(raster.get(&[1, 1]).unwrap().is_nan());
    }

    #[test]
    fn incomplete_grid_is_rejected() {
        assert!(read_raster_csv_string("lat,lon,value\n0,0,1\n0,1,2\n1,0,3\n").is_err());
    }

    #[test]
    fn duplicate_cells_are_rejected() {
        assert!(read_raster_csv_string("lat,lon,value\n0,0,1\n0,0,2\n1,1,3\n1,0,4\n").is_err());
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_raster_csv_string("lat,longitude,value\n0,0,1\n").unwrap_err();
        assert!(format!("{err:#}").contains("`lon`"));
    }
}
