mod normalize;
mod raster;

pub use normalize::{normalize_longitude, wrap_longitude};
pub use raster::{Coordinate, Raster, LAT, LON};
