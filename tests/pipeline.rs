use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use geo::{polygon, MultiPolygon};
use ndarray::{array, Array2};
use wildfire_mortality::{
    mortality, read_raster_csv, write_report, CountryBoundaries, CountryRecord, MortalityError, Raster, RunConfig,
    ScenarioPipeline, YearInputs, YearOutcome, YearRequest, SUMMARY_FILE,
};

fn raster(values: Array2<f64>) -> Raster {
    Raster::from_lat_lon(vec![0.0, 1.0], vec![0.0, 1.0], values).unwrap()
}

fn whole_grid() -> CountryBoundaries {
    let square = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]]);
    CountryBoundaries::new(vec![square], vec![CountryRecord::new("Grid")]).unwrap()
}

/// Two countries, one per latitude row.
fn two_rows() -> CountryBoundaries {
    let row = |y: f64| MultiPolygon(vec![polygon![(x: -0.5, y: y - 0.5), (x: 1.5, y: y - 0.5), (x: 1.5, y: y + 0.4), (x: -0.5, y: y + 0.4)]]);
    CountryBoundaries::new(vec![row(0.0), row(1.0)], vec![CountryRecord::new("South"), CountryRecord::new("North")]).unwrap()
}

fn pipeline(boundaries: &CountryBoundaries) -> ScenarioPipeline {
    ScenarioPipeline::new(raster(array![[0.01, 0.01], [0.01, 0.01]]), boundaries).unwrap()
}

fn year(year: u16, fire: [[f64; 2]; 2]) -> YearRequest {
    YearRequest::available(
        YearInputs {
            year,
            baseline: raster(array![[fire[0][0], fire[0][1]], [fire[1][0], fire[1][1]]]),
            no_fire: raster(Array2::zeros((2, 2))),
            population: raster(Array2::from_elem((2, 2), 1000.0)),
        },
        true,
    )
}

#[test]
fn single_hot_cell_end_to_end() {
    let conc = raster(array![[10.0, 0.0], [0.0, 0.0]]);
    let rate = raster(array![[0.01, 0.01], [0.01, 0.01]]);
    let pop = raster(array![[1000.0, 1000.0], [1000.0, 1000.0]]);

    let cells = mortality(&conc, &rate, &pop).unwrap();
    assert_relative_eq!(cells.get(&[0, 0]).unwrap(), 9.9998, epsilon = 1e-4);
    assert_eq!(cells.get(&[0, 1]), Some(0.0));
    assert_eq!(cells.get(&[1, 1]), Some(0.0));

    let report = pipeline(&whole_grid()).run(vec![year(2000, [[10.0, 0.0], [0.0, 0.0]])], &[]);
    let result = report.year(2000).unwrap();
    assert_relative_eq!(result.baseline_by_country.get("Grid").unwrap(), 9.9998, epsilon = 1e-4);
    assert_eq!(result.no_fire_by_country.get("Grid"), Some(0.0));
    assert_relative_eq!(result.fire_by_country.total(), 9.9998, epsilon = 1e-4);
}

#[test]
fn missing_optional_year_leaves_other_years_intact() {
    let boundaries = two_rows();
    let changes = [(2000, 2050), (2050, 2100)];

    let alone = pipeline(&boundaries).run(
        vec![year(2000, [[5.0, 0.0], [0.0, 1.0]]), year(2050, [[8.0, 0.0], [2.0, 1.0]])],
        &changes[..1],
    );
    let missing = MortalityError::missing_input("baseline", Some(2100), "no path configured");
    let report = pipeline(&boundaries).run(
        vec![
            year(2000, [[5.0, 0.0], [0.0, 1.0]]),
            year(2050, [[8.0, 0.0], [2.0, 1.0]]),
            YearRequest::missing(2100, false, missing.clone()),
        ],
        &changes,
    );

    for y in [2000, 2050] {
        let (a, b) = (alone.year(y).unwrap(), report.year(y).unwrap());
        assert_eq!(a.fire_by_country.values(), b.fire_by_country.values());
    }
    assert!(matches!(
        report.outcome(2100),
        Some(YearOutcome::Unavailable { required: false, reason }) if *reason == missing
    ));

    assert!(report.change(2000, 2050).unwrap().is_available());
    let dropped = report.change(2050, 2100).unwrap();
    assert!(dropped.by_country.is_none());
    assert!(dropped.raster.is_none());
    assert_eq!(report.unavailable(), vec!["year_2100".to_string(), "change_2050_2100".to_string()]);
}

#[test]
fn change_is_anti_symmetric() {
    let report = pipeline(&two_rows()).run(
        vec![year(2000, [[5.0, 0.0], [0.0, 1.0]]), year(2050, [[8.0, 0.0], [2.0, 1.0]])],
        &[(2000, 2050), (2050, 2000)],
    );
    let forward = report.change(2000, 2050).unwrap().by_country.as_ref().unwrap();
    let backward = report.change(2050, 2000).unwrap().by_country.as_ref().unwrap();
    for (name, value) in forward.iter() {
        assert_eq!(value, -backward.get(name).unwrap());
    }
    assert!(forward.get("North").unwrap() > 0.0);

    let up = report.change(2000, 2050).unwrap().raster.as_ref().unwrap();
    let down = report.change(2050, 2000).unwrap().raster.as_ref().unwrap();
    assert_eq!(up.values(), &down.values().mapv(|v| -v));
}

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn manifest_run_writes_available_series() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    // Longitudes in [0, 360); the run normalizes them onto [-180, 180).
    write(root, "rate.csv", "lat,lon,value\n0,0,10\n0,350,10\n1,0,10\n1,350,10\n");
    write(root, "pop.csv", "lat,lon,value\n0,0,1000\n0,350,1000\n1,0,1000\n1,350,1000\n");
    write(root, "zero.csv", "lat,lon,value\n0,0,0\n0,350,0\n1,0,0\n1,350,0\n");
    write(root, "b2000.csv", "lat,lon,value\n0,0,10\n0,350,0\n1,0,0\n1,350,0\n");
    write(root, "b2050.csv", "lat,lon,value\n0,0,20\n0,350,0\n1,0,0\n1,350,0\n");
    write(root, "world.geojson", r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"NAME": "East"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[5,0],[5,1],[0,1],[0,0]]]}},
        {"type": "Feature", "properties": {"NAME": "West"},
         "geometry": {"type": "Polygon", "coordinates": [[[-15,0],[-5,0],[-5,1],[-15,1],[-15,0]]]}}
    ]}"#);
    write(root, "run.json", r#"{
        "rate": "rate.csv",
        "boundaries": { "path": "world.geojson" },
        "years": [
            { "year": 2000, "required": true, "baseline": "b2000.csv", "no_fire": "zero.csv", "population": "pop.csv" },
            { "year": 2050, "required": true, "baseline": "b2050.csv", "no_fire": "zero.csv", "population": "pop.csv" },
            { "year": 2100, "baseline": "b2100.csv", "no_fire": "zero.csv", "population": "pop.csv" }
        ],
        "output": "out"
    }"#);

    let config = RunConfig::from_path(&root.join("run.json")).unwrap();
    let report = config.run().unwrap();
    let out = config.resolve(config.output.as_ref().unwrap());
    let written = write_report(&report, &out).unwrap();

    assert_eq!(written.last().unwrap(), &out.join(SUMMARY_FILE));
    assert!(out.join("fire_2000.csv").exists());
    assert!(out.join("change_2000_2050.csv").exists());
    assert!(!out.join("change_2050_2100.csv").exists());
    assert!(!out.join("fire_2100.csv").exists());

    let fire_2000 = report.year(2000).unwrap().fire_by_country.get("East").unwrap();
    assert_relative_eq!(fire_2000, 0.01 * (1.0 - (-11.0f64).exp()) * 1000.0, max_relative = 1e-12);
    assert_eq!(report.year(2000).unwrap().fire_by_country.get("West"), Some(0.0));

    let summary = fs::read_to_string(out.join(SUMMARY_FILE)).unwrap();
    let header = summary.lines().next().unwrap();
    assert!(header.starts_with("country,baseline_2000"));
    assert!(header.ends_with("change_2000_2050"));
    assert_eq!(summary.lines().count(), 3);

    // Exported rasters and series stay readable as plain CSV.
    assert!(read_raster_csv(&root.join("b2050.csv")).is_ok());
}
