use tracing::{error, info, warn};

use crate::aggregate::{CountryBoundaries, CountryMembership, CountrySeries};
use crate::error::{MortalityError, Result};
use crate::grid::Raster;
use crate::mortality::mortality;
use crate::pipeline::{Report, YearChange, YearInputs, YearOutcome, YearRequest, YearResult};

/// Runs fire and no-fire scenarios for each year against one shared baseline
/// rate raster and one set of country boundaries.
///
/// Country membership is computed once on the rate raster's grid and reused
/// for every year and scenario.
#[derive(Debug, Clone)]
pub struct ScenarioPipeline {
    rate: Raster, // Deaths per person per year
    membership: CountryMembership,
}

impl ScenarioPipeline {
    /// `rate` must be in deaths per person per year on the analysis grid.
    pub fn new(rate: Raster, boundaries: &CountryBoundaries) -> Result<Self> {
        let membership = CountryMembership::new(&rate, boundaries)?;
        info!(cells = rate.len(), countries = boundaries.len(), "prepared country membership");
        Ok(Self { rate, membership })
    }

    #[inline] pub fn rate(&self) -> &Raster { &self.rate }

    #[inline] pub fn membership(&self) -> &CountryMembership { &self.membership }

    /// Mortality rasters and country aggregates for a single year.
    pub fn run_year(&self, inputs: &YearInputs) -> Result<YearResult> {
        let year = inputs.year;
        let baseline_mortality = mortality(&inputs.baseline, &self.rate, &inputs.population)?;
        let no_fire_mortality = mortality(&inputs.no_fire, &self.rate, &inputs.population)?;
        let fire_attributable = baseline_mortality.difference(&no_fire_mortality)?;

        let baseline_by_country = self.membership.aggregate(&baseline_mortality)?;
        let no_fire_by_country = self.membership.aggregate(&no_fire_mortality)?;
        let fire_by_country = CountrySeries::difference(&baseline_by_country, &no_fire_by_country);

        info!(
            year,
            baseline = baseline_by_country.total(),
            no_fire = no_fire_by_country.total(),
            fire = fire_by_country.total(),
            "year complete"
        );

        Ok(YearResult {
            year,
            baseline_mortality,
            no_fire_mortality,
            fire_attributable,
            baseline_by_country,
            no_fire_by_country,
            fire_by_country,
        })
    }

    /// Run every requested year independently, then compute the requested
    /// `(from, to)` changes. Never fails as a whole: a year that cannot run
    /// is recorded as unavailable along with every change that needs it.
    pub fn run(&self, requests: Vec<YearRequest>, changes: &[(u16, u16)]) -> Report {
        let mut report = Report::default();

        for request in requests {
            let outcome = match request.inputs {
                Ok(inputs) => match self.run_year(&inputs) {
                    Ok(result) => YearOutcome::Complete(Box::new(result)),
                    Err(reason) => unavailable(request.year, request.required, reason),
                },
                Err(reason) => unavailable(request.year, request.required, reason),
            };
            report.years.push((request.year, outcome));
        }

        for &(from, to) in changes {
            report.changes.push(year_change(&report, from, to));
        }
        report
    }
}

fn unavailable(year: u16, required: bool, reason: MortalityError) -> YearOutcome {
    if required {
        error!(year, %reason, "required year failed; continuing with remaining years");
    } else {
        info!(year, %reason, "optional year unavailable; continuing with reduced scope");
    }
    YearOutcome::Unavailable { required, reason }
}

fn year_change(report: &Report, from: u16, to: u16) -> YearChange {
    let (Some(earlier), Some(later)) = (report.year(from), report.year(to)) else {
        info!(from, to, "change unavailable: a year it depends on did not run");
        return YearChange { from, to, by_country: None, raster: None };
    };

    let by_country = CountrySeries::difference(&later.fire_by_country, &earlier.fire_by_country);
    let raster = match later.fire_attributable.difference(&earlier.fire_attributable) {
        Ok(raster) => Some(raster),
        Err(err) => {
            warn!(from, to, %err, "change raster unavailable");
            None
        }
    };
    info!(from, to, total = by_country.total(), "change complete");
    YearChange { from, to, by_country: Some(by_country), raster }
}
