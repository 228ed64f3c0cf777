use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use wildfire_mortality::{write_report, RunConfig, YearOutcome};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RunArgs) -> Result<()> {
    let config = RunConfig::from_path(&args.manifest)?;
    let output = match (&args.output, &config.output) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => config.resolve(dir),
        (None, None) => PathBuf::from("results"),
    };

    let report = config.run()
        .with_context(|| format!("[run] Failed to run manifest {}", args.manifest.display()))?;

    for (label, ranked) in report.top_countries(args.top) {
        for (rank, (name, value)) in ranked.into_iter().enumerate() {
            info!(label = %label, rank = rank + 1, country = name, value, "top country");
        }
    }

    let written = write_report(&report, &output)?;
    for path in &written {
        println!("{}", path.display());
    }

    for (year, outcome) in report.years() {
        if let YearOutcome::Unavailable { required: true, reason } = outcome {
            warn!(year, %reason, "required year produced no output");
        }
    }
    let unavailable = report.unavailable();
    if !unavailable.is_empty() {
        eprintln!("Unavailable: {}", unavailable.join(", "));
    }
    Ok(())
}
