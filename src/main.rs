use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use flight_profit::{
    config::{home_bases_from, parse_delimiter, parse_home_base},
    model::base::HomeBase,
    ExportPolicy, Planner, PlanningConfig,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("Error: {e:?}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every flight was valid.
fn run(args: Args) -> anyhow::Result<bool> {
    let config = args.to_config()?;
    let planner = Planner::load(config).context("failed to load planning data")?;
    let summary = planner.run()?;

    if let Some(table) = &summary.table {
        print!("{table}");
    }
    info!(
        flights = summary.validation.checked(),
        invalid = summary.validation.failures().len(),
        exported = summary.exported,
        "planning run finished"
    );
    Ok(summary.validation.all_valid())
}

#[derive(Debug, Parser)]
#[clap(about = "Validate booked flights and compute their profit")]
struct Args {
    #[clap(long, default_value = "airports.csv")]
    airports: PathBuf,
    #[clap(long, default_value = "aeroplanes.csv")]
    aeroplanes: PathBuf,
    #[clap(long, default_value = "valid_flight_data.csv")]
    flights: PathBuf,
    #[clap(long, default_value = "flights_with_profits.csv")]
    output: PathBuf,
    #[clap(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,
    #[clap(long, default_value = "£")]
    currency: String,
    /// `CODE=Name`, given exactly twice; the first reads the first distance column.
    #[clap(long = "home-base", value_parser = parse_home_base)]
    home_bases: Vec<HomeBase>,
    #[clap(long, value_enum, default_value_t = ExportPolicy::Always)]
    export: ExportPolicy,
}

impl Args {
    fn to_config(&self) -> anyhow::Result<PlanningConfig> {
        let defaults = PlanningConfig::default();
        let home_bases = if self.home_bases.is_empty() {
            defaults.home_bases
        } else {
            home_bases_from(self.home_bases.clone())?
        };
        Ok(PlanningConfig {
            airports_path: self.airports.clone(),
            aeroplanes_path: self.aeroplanes.clone(),
            flights_path: self.flights.clone(),
            output_path: self.output.clone(),
            delimiter: self.delimiter,
            currency_symbol: self.currency.clone(),
            home_bases,
            export_policy: self.export,
        })
    }
}
