use std::path::PathBuf;

use thiserror::Error;

use crate::loader::LoadOptions;
use crate::model::base::{HomeBase, HomeBases};

/// Whether the profit export waits for the whole batch to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportPolicy {
    #[default]
    Always,
    WhenValid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningConfig {
    pub airports_path: PathBuf,
    pub aeroplanes_path: PathBuf,
    pub flights_path: PathBuf,
    pub output_path: PathBuf,
    pub delimiter: u8,
    pub currency_symbol: String,
    pub home_bases: HomeBases,
    pub export_policy: ExportPolicy,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        PlanningConfig {
            airports_path: PathBuf::from("airports.csv"),
            aeroplanes_path: PathBuf::from("aeroplanes.csv"),
            flights_path: PathBuf::from("valid_flight_data.csv"),
            output_path: PathBuf::from("flights_with_profits.csv"),
            delimiter: b',',
            currency_symbol: "£".to_owned(),
            home_bases: HomeBases::default(),
            export_policy: ExportPolicy::default(),
        }
    }
}

impl PlanningConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions { delimiter: self.delimiter, has_header: true }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("home base `{0}` must look like CODE=Name")]
    MalformedHomeBase(String),
    #[error("expected exactly two home bases, got {0}")]
    HomeBaseCount(usize),
    #[error("both home bases use the code `{0}`")]
    DuplicateHomeBase(String),
    #[error("delimiter must be a single ASCII character, got `{0}`")]
    Delimiter(String),
}

/// Parses `CODE=Name`, e.g. `MAN=Manchester`.
pub fn parse_home_base(s: &str) -> Result<HomeBase, ConfigError> {
    match s.split_once('=') {
        Some((code, name)) if !code.trim().is_empty() && !name.trim().is_empty() => {
            Ok(HomeBase::new(code.trim(), name.trim()))
        }
        _ => Err(ConfigError::MalformedHomeBase(s.to_owned())),
    }
}

pub fn home_bases_from(bases: Vec<HomeBase>) -> Result<HomeBases, ConfigError> {
    let count = bases.len();
    let [a, b]: [HomeBase; 2] = bases.try_into().map_err(|_| ConfigError::HomeBaseCount(count))?;
    if a.code == b.code {
        return Err(ConfigError::DuplicateHomeBase(a.code));
    }
    Ok(HomeBases::new(a, b))
}

/// Accepts a single ASCII character, or `\t` / `tab` for tabs.
pub fn parse_delimiter(s: &str) -> Result<u8, ConfigError> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(ConfigError::Delimiter(s.to_owned())),
    }
}
