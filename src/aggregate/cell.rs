use geo::Point;
use rstar::{RTreeObject, AABB};

/// A grid cell centre in an R-tree, associated with a raster cell by flat index.
#[derive(Debug, Clone, Copy)]
pub(super) struct CellCenter {
    idx: usize, // Row-major index of the (lat, lon) cell
    lon: f64,
    lat: f64,
}

impl CellCenter {
    pub(super) fn new(idx: usize, lon: f64, lat: f64) -> Self {
        Self { idx, lon, lat }
    }

    /// Get the row-major index of the cell.
    pub(super) fn idx(&self) -> usize { self.idx }

    /// Get the centre as a lon/lat point.
    pub(super) fn point(&self) -> Point<f64> { Point::new(self.lon, self.lat) }
}

impl RTreeObject for CellCenter {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lon, self.lat])
    }
}
