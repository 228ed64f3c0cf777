//! CSV format reading and writing operations.

mod read;
mod write;

pub use read::{read_raster_csv, read_raster_csv_string};
pub use write::{write_country_series, write_country_series_string, write_summary, write_summary_string};
