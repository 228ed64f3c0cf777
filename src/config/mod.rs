//! JSON run manifest describing every input of one report.

mod load;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::MortalityError;

/// Units of the baseline mortality-rate raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateUnits {
    /// Deaths per 1000 people per year.
    #[default]
    #[serde(rename = "per_1000")]
    Per1000,
    /// Deaths per person per year.
    #[serde(rename = "per_person")]
    PerPerson,
}

/// Country boundary source and the attribute holding display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySource {
    pub path: PathBuf,
    #[serde(default = "default_name_field")]
    pub name_field: String,
}

/// Input rasters for one analysed year. An absent path means the input is
/// unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSource {
    pub year: u16,
    #[serde(default)]
    pub required: bool,
    pub baseline: Option<PathBuf>,
    pub no_fire: Option<PathBuf>,
    pub population: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub rate: PathBuf,
    #[serde(default)]
    pub rate_units: RateUnits,
    pub boundaries: BoundarySource,
    #[serde(default = "default_longitude")]
    pub longitude: String,
    pub years: Vec<YearSource>,
    /// Explicit (from, to) change pairs; defaults to consecutive years.
    #[serde(default)]
    pub changes: Option<Vec<(u16, u16)>>,
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(skip)]
    base_dir: PathBuf, // Relative paths resolve against this
}

fn default_name_field() -> String { "NAME".to_string() }

fn default_longitude() -> String { crate::grid::LON.to_string() }

impl RunConfig {
    /// Read and validate a manifest. Relative paths resolve against the
    /// manifest's directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read manifest: {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json(&text, base_dir)
            .with_context(|| format!("[config] Invalid manifest: {}", path.display()))
    }

    /// Parse and validate a manifest from JSON text.
    pub fn from_json(json: &str, base_dir: PathBuf) -> Result<Self> {
        let mut config: RunConfig = serde_json::from_str(json).context("[config] Failed to parse manifest JSON")?;
        config.base_dir = base_dir;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MortalityError> {
        if self.years.is_empty() {
            return Err(MortalityError::configuration("manifest lists no years"));
        }
        for (i, source) in self.years.iter().enumerate() {
            if self.years[..i].iter().any(|other| other.year == source.year) {
                return Err(MortalityError::configuration(format!("year {} listed more than once", source.year)));
            }
        }
        for &(from, to) in self.changes.iter().flatten() {
            if from == to {
                return Err(MortalityError::configuration(format!("change {from}->{to} compares a year with itself")));
            }
            if let Some(year) = [from, to].into_iter().find(|y| !self.years.iter().any(|s| s.year == *y)) {
                return Err(MortalityError::configuration(format!(
                    "change {from}->{to} references year {year} which is not configured"
                )));
            }
        }
        Ok(())
    }

    /// Change pairs to compute: explicit, or every consecutive pair of
    /// configured years.
    pub fn change_pairs(&self) -> Vec<(u16, u16)> {
        match &self.changes {
            Some(pairs) => pairs.clone(),
            None => self.years.windows(2).map(|w| (w[0].year, w[1].year)).collect(),
        }
    }

    /// Resolve a manifest path against the manifest's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
    }

    #[inline] pub fn base_dir(&self) -> &Path { &self.base_dir }
}
