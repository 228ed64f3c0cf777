//! CSV writing operations.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter, NamedFrom}, series::Series};

use crate::aggregate::CountrySeries;

/// Encode a frame as CSV bytes with a header row.
fn encode(mut df: DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(&mut df)
        .context("[io::csv::write] Failed to encode CSV")?;
    Ok(buffer)
}

fn save(bytes: Vec<u8>, path: &Path) -> Result<()> {
    fs::write(path, bytes)
        .with_context(|| format!("[io::csv::write] Failed to write CSV file: {}", path.display()))
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).context("[io::csv::write] CSV output is not valid UTF-8")
}

/// Two-column (`country`, `label`) frame in series order. Values are not rounded.
fn series_frame(series: &CountrySeries, label: &str) -> Result<DataFrame> {
    let names: Vec<&str> = series.names().collect();
    Ok(DataFrame::new(vec![
        Series::new("country".into(), names).into(),
        Series::new(label.into(), series.values().to_vec()).into(),
    ])?)
}

/// Wide frame with one row per country and one column per labelled series.
///
/// Countries appear in order of first appearance; a country absent from a
/// series gets an empty cell, not zero.
fn summary_frame(columns: &[(String, &CountrySeries)]) -> Result<DataFrame> {
    let mut countries = CountrySeries::new();
    for (_, series) in columns {
        for name in series.names() {
            if !countries.contains(name) {
                countries.add(name, 0.0);
            }
        }
    }
    let names: Vec<&str> = countries.names().collect();

    let mut frame: Vec<Column> = vec![Series::new("country".into(), names.clone()).into()];
    for (label, series) in columns {
        let values: Vec<Option<f64>> = names.iter().map(|name| series.get(name)).collect();
        frame.push(Series::new(label.as_str().into(), values).into());
    }
    Ok(DataFrame::new(frame)?)
}

/// Write one country series as `country,<label>` rows.
pub fn write_country_series(series: &CountrySeries, label: &str, path: &Path) -> Result<()> {
    save(encode(series_frame(series, label)?)?, path)
}

/// Write one country series to a CSV string.
pub fn write_country_series_string(series: &CountrySeries, label: &str) -> Result<String> {
    utf8(encode(series_frame(series, label)?)?)
}

/// Write several labelled series side by side.
pub fn write_summary(columns: &[(String, &CountrySeries)], path: &Path) -> Result<()> {
    save(encode(summary_frame(columns)?)?, path)
}

/// Write several labelled series side by side to a CSV string.
pub fn write_summary_string(columns: &[(String, &CountrySeries)]) -> Result<String> {
    utf8(encode(summary_frame(columns)?)?)
}
