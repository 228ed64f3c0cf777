#![doc = "Country-level excess mortality from wildfire PM2.5"]
mod aggregate;
mod config;
mod error;
mod grid;
mod io;
mod mortality;
mod pipeline;

#[doc(inline)]
pub use aggregate::{sum_within_country, CountryBoundaries, CountryMembership, CountryRecord, CountrySeries};

#[doc(inline)]
pub use config::{BoundarySource, RateUnits, RunConfig, YearSource};

#[doc(inline)]
pub use error::{MortalityError, Result};

#[doc(inline)]
pub use grid::{normalize_longitude, wrap_longitude, Coordinate, Raster, LAT, LON};

#[doc(inline)]
pub use io::{
    read_boundaries, read_boundaries_geojson, read_boundaries_geojson_bytes, read_boundaries_shp, read_raster_csv,
    read_raster_csv_string, write_country_series, write_country_series_string, write_report, write_summary,
    write_summary_string, SUMMARY_FILE,
};

#[doc(inline)]
pub use mortality::{cell_mortality, mortality, rate_per_person, CONCENTRATION_RESPONSE_K, RATE_PER_PEOPLE};

#[doc(inline)]
pub use pipeline::{Report, ScenarioPipeline, YearChange, YearInputs, YearOutcome, YearRequest, YearResult};
