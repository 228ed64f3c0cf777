use std::path::Path;

use tracing::{debug, info};

use crate::aggregate::CountryBoundaries;
use crate::config::{RateUnits, RunConfig, YearSource};
use crate::error::{MortalityError, Result};
use crate::grid::{normalize_longitude, Raster};
use crate::io::{read_boundaries, read_raster_csv};
use crate::mortality::rate_per_person;
use crate::pipeline::{Report, ScenarioPipeline, YearInputs, YearRequest};

impl RunConfig {
    /// Load a raster input and normalize its longitude coordinate.
    fn load_raster(&self, input: &str, path: Option<&Path>, year: Option<u16>) -> Result<Raster> {
        let Some(path) = path else {
            return Err(MortalityError::missing_input(input, year, "no path configured"));
        };
        let path = self.resolve(path);
        let raster = read_raster_csv(&path)
            .map_err(|err| MortalityError::missing_input(input, year, format!("{err:#}")))?;
        debug!(input, ?year, path = %path.display(), shape = ?raster.shape(), "loaded raster");
        normalize_longitude(&raster, &self.longitude)
    }

    /// Load the baseline rate raster in deaths per person per year.
    pub fn load_rate(&self) -> Result<Raster> {
        let rate = self.load_raster("rate", Some(self.rate.as_path()), None)?;
        Ok(match self.rate_units {
            RateUnits::Per1000 => rate_per_person(&rate),
            RateUnits::PerPerson => rate,
        })
    }

    /// Load the country boundaries (`.shp`, `.geojson` or `.json`).
    pub fn load_boundaries(&self) -> Result<CountryBoundaries> {
        let path = self.resolve(&self.boundaries.path);
        let (geometries, records) = read_boundaries(&path, &self.boundaries.name_field)
            .map_err(|err| MortalityError::missing_input("boundaries", None, format!("{err:#}")))?;
        info!(countries = records.len(), path = %path.display(), "loaded boundaries");
        CountryBoundaries::new(geometries, records)
    }

    /// Load one year's rasters. Any failure marks the whole year unavailable.
    pub fn load_year(&self, source: &YearSource) -> YearRequest {
        let year = Some(source.year);
        let inputs = (|| -> Result<YearInputs> {
            Ok(YearInputs {
                year: source.year,
                baseline: self.load_raster("baseline", source.baseline.as_deref(), year)?,
                no_fire: self.load_raster("no_fire", source.no_fire.as_deref(), year)?,
                population: self.load_raster("population", source.population.as_deref(), year)?,
            })
        })();
        YearRequest { year: source.year, required: source.required, inputs }
    }

    /// Load every configured year, in manifest order.
    pub fn load_years(&self) -> Vec<YearRequest> {
        self.years.iter().map(|source| self.load_year(source)).collect()
    }

    /// Load everything and run the full report.
    ///
    /// Only the shared inputs (rate raster, boundaries) are fatal; per-year
    /// problems are recorded in the report.
    pub fn run(&self) -> Result<Report> {
        let rate = self.load_rate()?;
        let boundaries = self.load_boundaries()?;
        let pipeline = ScenarioPipeline::new(rate, &boundaries)?;
        Ok(pipeline.run(self.load_years(), &self.change_pairs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_and_normalizes_inputs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rate.csv", "lat,lon,value\n0,0,10\n0,270,20\n");
        write(dir.path(), "b.csv", "lat,lon,value\n0,0,1\n0,270,2\n");
        write(dir.path(), "n.csv", "lat,lon,value\n0,0,0\n0,270,0\n");
        write(dir.path(), "p.csv", "lat,lon,value\n0,0,5\n0,270,6\n");
        let json = r#"{
            "rate": "rate.csv",
            "boundaries": { "path": "world.geojson" },
            "years": [
                { "year": 2000, "required": true, "baseline": "b.csv", "no_fire": "n.csv", "population": "p.csv" },
                { "year": 2100, "baseline": "b.csv" }
            ]
        }"#;
        let config = RunConfig::from_json(json, dir.path().to_path_buf()).unwrap();

        let rate = config.load_rate().unwrap();
        assert_eq!(rate.coord("lon").unwrap().values(), &[-90.0, 0.0]);
        assert_eq!(rate.get(&[0, 0]), Some(0.02));
        assert_eq!(rate.get(&[0, 1]), Some(0.01));

        let requests = config.load_years();
        assert!(requests[0].inputs.is_ok());
        assert!(matches!(
            &requests[1].inputs,
            Err(MortalityError::MissingInput { input, year: Some(2100), .. }) if input == "no_fire"
        ));

        assert!(matches!(config.load_boundaries(), Err(MortalityError::MissingInput { .. })));
    }
}
