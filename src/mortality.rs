//! Concentration-response mortality per grid cell.

use ndarray::Zip;

use crate::error::Result;
use crate::grid::Raster;

/// Concentration-response coefficient applied to PM2.5 concentration.
pub const CONCENTRATION_RESPONSE_K: f64 = 1.1;

/// Baseline rates are supplied as deaths per this many people per year.
pub const RATE_PER_PEOPLE: f64 = 1000.0;

/// Convert a baseline rate raster from deaths per 1000 people per year into
/// deaths per person per year.
pub fn rate_per_person(rate_per_1000: &Raster) -> Raster {
    rate_per_1000.map(|rate| rate / RATE_PER_PEOPLE)
}

/// Estimated deaths in one cell.
///
/// No clamping: negative concentrations and very large rates pass through.
/// A zero rate or population gives 0.0 even when the response term
/// overflows; NaN inputs still give NaN.
#[inline]
pub fn cell_mortality(concentration: f64, rate: f64, population: f64) -> f64 {
    let deaths = rate * (1.0 - (-CONCENTRATION_RESPONSE_K * concentration).exp()) * population;
    if deaths.is_nan() && !(concentration.is_nan() || rate.is_nan() || population.is_nan()) {
        return 0.0; // zero times an infinite response
    }
    deaths
}

/// Apply the concentration-response function cell-wise.
///
/// `rate` must already be in deaths per person per year (see
/// [`rate_per_person`]). All three rasters must share one grid; NaN in any
/// input yields NaN in the output cell.
pub fn mortality(concentration: &Raster, rate: &Raster, population: &Raster) -> Result<Raster> {
    concentration.ensure_same_grid(rate, "mortality: concentration vs rate")?;
    concentration.ensure_same_grid(population, "mortality: concentration vs population")?;

    let values = Zip::from(concentration.values())
        .and(rate.values())
        .and(population.values())
        .par_map_collect(|&c, &r, &p| cell_mortality(c, r, p));

    concentration.with_values(values)
}
