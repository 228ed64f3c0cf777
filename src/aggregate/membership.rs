use geo::{BoundingRect, Intersects, MultiPolygon, Rect};
use rayon::prelude::*;
use rstar::{RTree, AABB};
use tracing::debug;

use crate::aggregate::cell::CellCenter;
use crate::aggregate::{CountryRecord, CountrySeries};
use crate::error::{MortalityError, Result};
use crate::grid::{Coordinate, Raster, LAT, LON};

/// Country boundaries paired one-to-one with their attribute records.
#[derive(Debug, Clone)]
pub struct CountryBoundaries {
    shapes: Vec<MultiPolygon<f64>>,
    bounds: Vec<Option<Rect<f64>>>,
    records: Vec<CountryRecord>,
}

impl CountryBoundaries {
    /// Pair geometries with records by index. Both sequences must have the
    /// same length; nothing is truncated.
    pub fn new(geometries: Vec<MultiPolygon<f64>>, records: Vec<CountryRecord>) -> Result<Self> {
        if geometries.len() != records.len() {
            return Err(MortalityError::IndexAlignment {
                geometries: geometries.len(),
                records: records.len(),
            });
        }
        Ok(Self {
            bounds: geometries.iter().map(|shape| shape.bounding_rect()).collect(),
            shapes: geometries,
            records,
        })
    }

    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    #[inline] pub fn records(&self) -> &[CountryRecord] { &self.records }
}

/// The grid cells whose centres fall inside each country boundary.
///
/// Computing membership is the expensive step; once built it aggregates any
/// raster on the same (lat, lon) grid in a single pass.
#[derive(Debug, Clone)]
pub struct CountryMembership {
    grid: [Coordinate; 2],
    records: Vec<CountryRecord>,
    cells: Vec<Vec<usize>>, // Sorted row-major cell indices per boundary
}

impl CountryMembership {
    /// Compute membership using an R-tree of cell centres as a bounding-box
    /// prefilter before the exact containment test.
    pub fn new(grid: &Raster, boundaries: &CountryBoundaries) -> Result<Self> {
        let (lat, lon) = lat_lon(grid)?;
        let centers: Vec<CellCenter> = cell_centers(lat, lon).collect();
        let rtree = RTree::bulk_load(centers);

        let cells: Vec<Vec<usize>> = boundaries.shapes.par_iter()
            .zip(boundaries.bounds.par_iter())
            .map(|(shape, bounds)| {
                let Some(rect) = bounds else { return Vec::new() };
                let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
                let mut inside: Vec<usize> = rtree.locate_in_envelope(&envelope)
                    .filter(|cell| shape.intersects(&cell.point()))
                    .map(|cell| cell.idx())
                    .collect();
                inside.sort_unstable();
                inside
            })
            .collect();

        Ok(Self::from_parts(grid, boundaries, cells))
    }

    /// Compute membership by testing every cell against every boundary.
    pub fn brute_force(grid: &Raster, boundaries: &CountryBoundaries) -> Result<Self> {
        let (lat, lon) = lat_lon(grid)?;

        let cells: Vec<Vec<usize>> = boundaries.shapes.par_iter()
            .map(|shape| {
                cell_centers(lat, lon)
                    .filter(|cell| shape.intersects(&cell.point()))
                    .map(|cell| cell.idx())
                    .collect::<Vec<usize>>()
            })
            .collect();

        Ok(Self::from_parts(grid, boundaries, cells))
    }

    fn from_parts(grid: &Raster, boundaries: &CountryBoundaries, cells: Vec<Vec<usize>>) -> Self {
        for (record, inside) in boundaries.records.iter().zip(&cells) {
            debug!(country = record.name(), cells = inside.len(), "country membership");
        }
        Self {
            grid: [grid.coords()[0].clone(), grid.coords()[1].clone()],
            records: boundaries.records.clone(),
            cells,
        }
    }

    /// Cell indices (row-major) inside boundary `i`.
    pub fn cells(&self, i: usize) -> &[usize] { &self.cells[i] }

    /// Sum `raster` within each country, skipping NaN cells.
    ///
    /// A country with no cells, or only NaN cells, sums to exactly 0.0.
    /// Boundaries sharing a name contribute to one entry.
    pub fn aggregate(&self, raster: &Raster) -> Result<CountrySeries> {
        let (lat, lon) = lat_lon(raster)?;
        if lat != self.grid[0].values() || lon != self.grid[1].values() {
            return Err(MortalityError::shape_mismatch(
                "aggregate: raster grid differs from the grid membership was computed on",
            ));
        }
        let contiguous = raster.values().as_standard_layout();
        let Some(values) = contiguous.as_slice() else {
            return Err(MortalityError::configuration("aggregate: raster values are not contiguous"));
        };

        let sums: Vec<f64> = self.cells.par_iter()
            .map(|inside| {
                inside.iter()
                    .map(|&i| values[i])
                    .filter(|v| !v.is_nan())
                    .fold(0.0, |acc, v| acc + v)
            })
            .collect();

        let mut series = CountrySeries::new();
        for (record, sum) in self.records.iter().zip(sums) {
            series.add(record.shared_name(), sum);
        }
        Ok(series)
    }
}

/// Sum `raster` over each country boundary (closed containment of cell
/// centres, NaN-as-zero), keyed by the record at the same index.
pub fn sum_within_country(
    raster: &Raster,
    geometries: Vec<MultiPolygon<f64>>,
    records: Vec<CountryRecord>,
) -> Result<CountrySeries> {
    let boundaries = CountryBoundaries::new(geometries, records)?;
    CountryMembership::new(raster, &boundaries)?.aggregate(raster)
}

/// Borrow the latitude and longitude coordinates of a 2-D (lat, lon) raster.
fn lat_lon(raster: &Raster) -> Result<(&[f64], &[f64])> {
    match raster.coords() {
        [lat, lon] if lat.name() == LAT && lon.name() == LON => Ok((lat.values(), lon.values())),
        coords => Err(MortalityError::configuration(format!(
            "aggregation needs a 2-D ({LAT}, {LON}) raster, got ({})",
            coords.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
        ))),
    }
}

/// Iterate over cell centres in row-major order.
fn cell_centers<'a>(lat: &'a [f64], lon: &'a [f64]) -> impl Iterator<Item = CellCenter> + 'a {
    lat.iter().enumerate().flat_map(move |(i, &y)| {
        lon.iter().enumerate().map(move |(j, &x)| CellCenter::new(i * lon.len() + j, x, y))
    })
}
