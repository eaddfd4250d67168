//! Production Tracker - report generator
//!
//! Prints the production report index as JSON and optionally exports it as
//! CSV.

use std::fs::File;
use std::io::BufWriter;

use production_tracker::{logging, Config, Tracker};

fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    logging::init(&config.logging)?;

    tracing::info!("Starting production report");
    tracing::info!("Environment: {}", config.environment);

    let tracker = Tracker::from_config(&config)?;

    let stats = tracker.dashboard.stats()?;
    tracing::info!(
        materials = stats.total_materials,
        active_plans = stats.active_plans,
        pending_items = stats.pending_items(),
        finished_goods = stats.finished_goods,
        total_fuel_used = %stats.total_fuel_used,
        "dashboard"
    );

    let reports = match tracker.reporting.build_report_index() {
        Ok(reports) => reports,
        Err(err) => {
            tracing::error!(code = err.code(), "report failed: {}", err);
            return Err(err.into());
        }
    };
    println!("{}", serde_json::to_string_pretty(&reports)?);

    if let Some(path) = &config.report.csv_path {
        let file = BufWriter::new(File::create(path)?);
        let rows = tracker.reporting.export_report_csv(file)?;
        tracing::info!(path = %path.display(), rows, "CSV export written");
    }

    Ok(())
}
