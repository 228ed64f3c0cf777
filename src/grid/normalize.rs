use tracing::debug;

use crate::error::{MortalityError, Result};
use crate::grid::{Coordinate, Raster};

/// Map a longitude in degrees onto the half-open range [-180, 180).
///
/// Values already in range are returned untouched so that normalization is
/// exactly idempotent.
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..180.0).contains(&lon) {
        return lon;
    }
    let r = lon.rem_euclid(360.0);
    // rem_euclid may round up to the modulus itself for tiny negative inputs
    let r = if r >= 360.0 { r - 360.0 } else { r };
    if r >= 180.0 { r - 360.0 } else { r }
}

/// Relabel the longitude coordinate `name` into [-180, 180), sort it
/// ascending and permute the data along that axis to match.
///
/// Every other axis is carried over unchanged. The input is not modified.
pub fn normalize_longitude(raster: &Raster, name: &str) -> Result<Raster> {
    let axis = raster.axis_of(name).ok_or_else(|| {
        MortalityError::configuration(format!(
            "longitude coordinate `{name}` not found (available: {})",
            raster.coords().iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
        ))
    })?;
    let wrapped: Vec<f64> = raster.coords()[axis].values().iter().map(|&lon| wrap_longitude(lon)).collect();

    let mut order: Vec<usize> = (0..wrapped.len()).collect();
    order.sort_by(|&a, &b| wrapped[a].total_cmp(&wrapped[b]));

    let sorted: Vec<f64> = order.iter().map(|&i| wrapped[i]).collect();
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(MortalityError::configuration(format!(
            "longitude coordinate `{name}` has duplicate value {} after wrapping to [-180, 180)",
            w[0]
        )));
    }

    debug!(coordinate = name, cells = raster.len(), "normalized longitude");
    Ok(raster.reindexed(axis, Coordinate::new(name, sorted), &order))
}
