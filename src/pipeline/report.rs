use crate::aggregate::CountrySeries;
use crate::error::MortalityError;
use crate::grid::Raster;

/// Pre-aligned rasters for one analysed year.
#[derive(Debug, Clone)]
pub struct YearInputs {
    pub year: u16,
    pub baseline: Raster,   // PM2.5 with wildfire emissions
    pub no_fire: Raster,    // PM2.5 without wildfire emissions
    pub population: Raster,
}

/// A year as requested at pipeline entry: its inputs, or why they are absent.
#[derive(Debug, Clone)]
pub struct YearRequest {
    pub year: u16,
    pub required: bool,
    pub inputs: Result<YearInputs, MortalityError>,
}

impl YearRequest {
    pub fn available(inputs: YearInputs, required: bool) -> Self {
        Self { year: inputs.year, required, inputs: Ok(inputs) }
    }

    pub fn missing(year: u16, required: bool, error: MortalityError) -> Self {
        Self { year, required, inputs: Err(error) }
    }
}

/// Every output of one year's run. Immutable once built.
#[derive(Debug, Clone)]
pub struct YearResult {
    pub year: u16,
    pub baseline_mortality: Raster,
    pub no_fire_mortality: Raster,
    pub fire_attributable: Raster,
    pub baseline_by_country: CountrySeries,
    pub no_fire_by_country: CountrySeries,
    pub fire_by_country: CountrySeries,
}

/// Result of one year, or the reason it produced nothing.
#[derive(Debug, Clone)]
pub enum YearOutcome {
    Complete(Box<YearResult>),
    Unavailable { required: bool, reason: MortalityError },
}

/// Change in fire-attributable mortality between two years.
///
/// `None` marks an output that is unavailable, never zero.
#[derive(Debug, Clone)]
pub struct YearChange {
    pub from: u16,
    pub to: u16,
    pub by_country: Option<CountrySeries>,
    pub raster: Option<Raster>,
}

impl YearChange {
    pub fn label(&self) -> String { format!("change_{}_{}", self.from, self.to) }

    pub fn is_available(&self) -> bool { self.by_country.is_some() }
}

/// All per-year outcomes and year-over-year changes of one run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub(crate) years: Vec<(u16, YearOutcome)>,
    pub(crate) changes: Vec<YearChange>,
}

impl Report {
    /// Years in request order with their outcomes.
    pub fn years(&self) -> &[(u16, YearOutcome)] { &self.years }

    pub fn changes(&self) -> &[YearChange] { &self.changes }

    pub fn outcome(&self, year: u16) -> Option<&YearOutcome> {
        self.years.iter().find(|(y, _)| *y == year).map(|(_, outcome)| outcome)
    }

    /// The completed result for `year`, if it ran.
    pub fn year(&self, year: u16) -> Option<&YearResult> {
        match self.outcome(year)? {
            YearOutcome::Complete(result) => Some(result.as_ref()),
            YearOutcome::Unavailable { .. } => None,
        }
    }

    pub fn change(&self, from: u16, to: u16) -> Option<&YearChange> {
        self.changes.iter().find(|c| c.from == from && c.to == to)
    }

    /// Every available country series with its export label, in a stable
    /// order: per year baseline, no-fire, fire-attributable; then changes.
    pub fn labelled_series(&self) -> Vec<(String, &CountrySeries)> {
        let mut out = Vec::new();
        for (_, outcome) in &self.years {
            if let YearOutcome::Complete(result) = outcome {
                out.push((format!("baseline_{}", result.year), &result.baseline_by_country));
                out.push((format!("no_fire_{}", result.year), &result.no_fire_by_country));
                out.push((format!("fire_{}", result.year), &result.fire_by_country));
            }
        }
        for change in &self.changes {
            if let Some(series) = &change.by_country {
                out.push((change.label(), series));
            }
        }
        out
    }

    /// The `n` largest countries of every available series, by label.
    pub fn top_countries(&self, n: usize) -> Vec<(String, Vec<(&str, f64)>)> {
        self.labelled_series().into_iter()
            .map(|(label, series)| (label, series.top(n)))
            .collect()
    }

    /// Labels of outputs that could not be produced.
    pub fn unavailable(&self) -> Vec<String> {
        let years = self.years.iter()
            .filter(|(_, outcome)| matches!(outcome, YearOutcome::Unavailable { .. }))
            .map(|(year, _)| format!("year_{year}"));
        let changes = self.changes.iter()
            .filter(|c| !c.is_available())
            .map(|c| c.label());
        years.chain(changes).collect()
    }
}
