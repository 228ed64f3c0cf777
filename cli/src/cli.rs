use std::path::PathBuf;

/// Wildfire PM2.5 excess-mortality CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "wildfire-mortality", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run every year and change listed in a JSON manifest
    Run(RunArgs),

    /// Sum a single raster within each country
    Aggregate(AggregateArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// JSON run manifest
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub manifest: PathBuf,

    /// Output directory, defaults to the manifest's `output` or "./results"
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Number of countries to log per series (0 to disable)
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(clap::Args, Debug)]
pub struct AggregateArgs {
    /// Long-format raster CSV (lat, lon, value)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub raster: PathBuf,

    /// Country boundaries (.shp, .geojson or .json)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Attribute holding the country name
    #[arg(long, default_value = "NAME")]
    pub name_field: String,

    /// Longitude coordinate name
    #[arg(long, default_value = "lon")]
    pub longitude: String,

    /// Output CSV file, defaults to "./countries.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
