use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{Aeroplanes, Airports, LookupError};
use crate::config::{ExportPolicy, PlanningConfig};
use crate::loader::{read_table, LoadError, Table};
use crate::model::entity::{Flight, Money};
use crate::model::record::{records_from, RecordError};
use crate::profit::ProfitCalculator;
use crate::report::{export_csv, render_table, ExportError, ReportRow};
use crate::validation::{BatchValidation, Validator};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid record: {0}")]
    Record(#[from] RecordError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub validation: BatchValidation,
    /// Rendered only when every flight is valid.
    pub table: Option<String>,
    pub exported: bool,
}

/// Loaded catalogs and flights for one planning run.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlanningConfig,
    airports: Airports,
    aeroplanes: Aeroplanes,
    flight_table: Table,
    flights: Vec<Flight>,
}

impl Planner {
    pub fn load(config: PlanningConfig) -> Result<Self, PlanError> {
        let options = config.load_options();
        let airports = Airports::from_table(config.home_bases.clone(), &read_table(&config.airports_path, &options)?)?;
        let aeroplanes = Aeroplanes::from_table(&read_table(&config.aeroplanes_path, &options)?)?;
        let flight_table = read_table(&config.flights_path, &options)?;
        info!(
            airports = airports.len(),
            aeroplanes = aeroplanes.len(),
            flights = flight_table.len(),
            "loaded planning data"
        );
        Self::from_parts(config, airports, aeroplanes, flight_table)
    }

    pub fn from_parts(
        config: PlanningConfig,
        airports: Airports,
        aeroplanes: Aeroplanes,
        flight_table: Table,
    ) -> Result<Self, PlanError> {
        let flights = records_from(&flight_table.rows)?;
        Ok(Planner { config, airports, aeroplanes, flight_table, flights })
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.airports, &self.aeroplanes)
    }

    pub fn calculator(&self) -> ProfitCalculator<'_> {
        ProfitCalculator::new(&self.airports, &self.aeroplanes)
    }

    /// Validates every flight, renders the table if the batch is clean and
    /// writes the export according to the configured policy.
    pub fn run(&self) -> Result<RunSummary, PlanError> {
        let validation = self.validator().validate_batch(&self.flights);
        info!(
            checked = validation.checked(),
            invalid = validation.failures().len(),
            "validated flights"
        );

        let profits = self.profits(&validation)?;
        let table = if validation.all_valid() {
            let rows = self
                .flights
                .iter()
                .zip(&profits)
                .filter_map(|(flight, profit)| profit.map(|p| ReportRow::new(flight, &self.airports, p)))
                .collect::<Result<Vec<_>, _>>()?;
            Some(render_table(&rows, &self.config.currency_symbol))
        } else {
            warn!("not every flight is valid; skipping the flight table");
            None
        };

        let exported = match self.config.export_policy {
            ExportPolicy::Always => true,
            ExportPolicy::WhenValid => validation.all_valid(),
        };
        if exported {
            export_csv(
                &self.config.output_path,
                self.flight_table.header.as_deref(),
                &self.flight_table.rows,
                &profits,
                self.config.delimiter,
            )?;
        } else {
            warn!(path = %self.config.output_path.display(), "export skipped for an invalid batch");
        }

        Ok(RunSummary { validation, table, exported })
    }

    /// Profit per flight, `None` for flights that failed validation.
    fn profits(&self, validation: &BatchValidation) -> Result<Vec<Option<Money>>, LookupError> {
        let calculator = self.calculator();
        self.flights
            .iter()
            .enumerate()
            .map(|(index, flight)| {
                if validation.is_valid(index) {
                    calculator.profit(flight).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect()
    }
}
