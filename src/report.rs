use std::{fs, io, path::{Path, PathBuf}};

use csv::{QuoteStyle, WriterBuilder};
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{Airports, LookupError};
use crate::loader::Row;
use crate::model::entity::{Flight, Money, PerClass, Seats};
use crate::profit::format_money;

pub const PROFIT_COLUMN: &str = "Profit";

const HEADINGS: [&str; 10] = [
    "Home Airport",
    "Overseas Airport",
    "Aircraft Type",
    "# Economy Seats",
    "# Business Seats",
    "# First Class Seats",
    "Economy Seat Price",
    "Business Seat Price",
    "First Class Seat Price",
    "Profit",
];

/// A flight with its codes resolved to display names.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub home_airport: String,
    pub overseas_airport: String,
    pub aircraft_type: String,
    pub booked: PerClass<Seats>,
    pub prices: PerClass<Money>,
    pub profit: Money,
}

impl ReportRow {
    pub fn new(flight: &Flight, airports: &Airports, profit: Money) -> Result<Self, LookupError> {
        let home = airports
            .bases()
            .by_code(&flight.origin)
            .ok_or_else(|| LookupError::InvalidOrigin { code: flight.origin.clone() })?;
        let overseas = airports.search(&flight.destination)?;
        Ok(ReportRow {
            home_airport: home.name.clone(),
            overseas_airport: overseas.name.clone(),
            aircraft_type: flight.aircraft_type.clone(),
            booked: flight.booked,
            prices: flight.prices,
            profit,
        })
    }

    fn cells(&self, currency: &str) -> [String; 10] {
        [
            self.home_airport.clone(),
            self.overseas_airport.clone(),
            self.aircraft_type.clone(),
            self.booked.economy.to_string(),
            self.booked.business.to_string(),
            self.booked.first.to_string(),
            format!("{currency}{}", self.prices.economy),
            format!("{currency}{}", self.prices.business),
            format!("{currency}{}", self.prices.first),
            format!("{currency}{}", format_money(self.profit)),
        ]
    }
}

/// Renders rows as a left-aligned, pipe-separated table.
pub fn render_table(rows: &[ReportRow], currency: &str) -> String {
    let cells = rows.iter().map(|row| row.cells(currency)).collect_vec();
    let widths: Vec<usize> = (0..HEADINGS.len())
        .map(|col| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain([HEADINGS[col].chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = widths.iter().map(|&w| "-".repeat(w)).join("-+-");

    let mut out = String::new();
    out.push_str(padded_line(HEADINGS.iter().copied(), &widths).trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for row in &cells {
        out.push_str(padded_line(row.iter().map(String::as_str), &widths).trim_end());
        out.push('\n');
    }
    out
}

fn padded_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells.zip(widths).map(|(cell, &width)| format!("{cell:<width$}")).join(" | ")
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write `{}`: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to write `{}`: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("{rows} rows but {profits} profit values")]
    RowCount { rows: usize, profits: usize },
}

/// Writes the raw rows back out with a trailing profit column. A `None`
/// profit leaves the cell empty. Any existing file at `path` is replaced.
pub fn export_csv(
    path: impl AsRef<Path>,
    header: Option<&[String]>,
    rows: &[Row],
    profits: &[Option<Money>],
    delimiter: u8,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    if rows.len() != profits.len() {
        return Err(ExportError::RowCount { rows: rows.len(), profits: profits.len() });
    }
    let io_err = |source: io::Error| ExportError::Io { path: path.to_owned(), source };
    let csv_err = |source: csv::Error| ExportError::Csv { path: path.to_owned(), source };

    if path.exists() {
        debug!(path = %path.display(), "removing previous export");
        fs::remove_file(path).map_err(io_err)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    if let Some(header) = header {
        writer
            .write_record(header.iter().map(String::as_str).chain([PROFIT_COLUMN]))
            .map_err(csv_err)?;
    }
    for (row, profit) in rows.iter().zip(profits) {
        let cells = row
            .fields
            .iter()
            .map(ToString::to_string)
            .chain([profit.map(format_money).unwrap_or_default()]);
        writer.write_record(cells).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;

    info!(path = %path.display(), rows = rows.len(), "exported flights with profits");
    Ok(())
}
