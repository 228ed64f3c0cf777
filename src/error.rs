//! Error taxonomy shared by every stage of the pipeline.

use thiserror::Error;

/// Errors raised by the grid, mortality, aggregation and pipeline stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MortalityError {
    /// A required raster or polygon source could not be obtained.
    #[error("missing input `{input}`{}: {reason}", year_suffix(.year))]
    MissingInput {
        input: String,
        year: Option<u16>,
        reason: String,
    },

    /// Two rasters combined in one operation do not share a grid.
    #[error("raster grids do not match: {0}")]
    ShapeMismatch(String),

    /// Country geometries and records cannot be paired one-to-one.
    #[error("country geometries ({geometries}) and records ({records}) are not index-aligned")]
    IndexAlignment { geometries: usize, records: usize },

    /// A named coordinate is absent or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn year_suffix(year: &Option<u16>) -> String {
    year.map(|y| format!(" for year {y}")).unwrap_or_default()
}

impl MortalityError {
    /// Create a MissingInput error.
    pub fn missing_input(input: impl Into<String>, year: Option<u16>, reason: impl Into<String>) -> Self {
        Self::MissingInput { input: input.into(), year, reason: reason.into() }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, MortalityError>;
