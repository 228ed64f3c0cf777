use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use wildfire_mortality::{normalize_longitude, read_boundaries, read_raster_csv, sum_within_country, write_country_series};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::AggregateArgs) -> Result<()> {
    let raster = normalize_longitude(&read_raster_csv(&args.raster)?, &args.longitude)?;
    let (geometries, records) = read_boundaries(&args.boundaries, &args.name_field)?;
    let series = sum_within_country(&raster, geometries, records)?;
    info!(countries = series.len(), total = series.total(), "aggregated raster");

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("countries.csv"));
    let label = args.raster.file_stem().and_then(|s| s.to_str()).unwrap_or("value");
    write_country_series(&series, label, &output)?;
    println!("{}", output.display());
    Ok(())
}
