//! Report export: one CSV per country series plus a combined summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::io::csv::{write_country_series, write_summary};
use crate::pipeline::Report;

/// File name of the combined table written by [`write_report`].
pub const SUMMARY_FILE: &str = "summary.csv";

/// Create `dir` (and parents) unless it already is a directory.
fn prepare_output_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("[io::report] Output path {} exists and is not a directory", dir.display()),
        Err(_) => fs::create_dir_all(dir)
            .with_context(|| format!("[io::report] Failed to create output directory {}", dir.display())),
    }
}

/// Write every available series of `report` into `dir` as `<label>.csv`,
/// plus [`SUMMARY_FILE`]. Unavailable outputs are logged, not written.
///
/// Returns the paths written, summary last.
pub fn write_report(report: &Report, dir: &Path) -> Result<Vec<PathBuf>> {
    prepare_output_dir(dir)?;

    let columns = report.labelled_series();
    let mut written = Vec::with_capacity(columns.len() + 1);
    for (label, series) in &columns {
        let path = dir.join(format!("{label}.csv"));
        write_country_series(series, label, &path)?;
        info!(label = %label, countries = series.len(), total = series.total(), path = %path.display(), "wrote series");
        written.push(path);
    }
    for label in report.unavailable() {
        info!(label = %label, "output unavailable; not written");
    }

    let summary = dir.join(SUMMARY_FILE);
    write_summary(&columns, &summary)?;
    written.push(summary);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_writes_only_summary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let written = write_report(&Report::default(), &out).unwrap();
        assert_eq!(written, vec![out.join(SUMMARY_FILE)]);
        assert!(out.is_dir());
    }

    #[test]
    fn file_in_place_of_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, "x").unwrap();
        let err = write_report(&Report::default(), &file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
