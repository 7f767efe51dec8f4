//! Validates booked flights against aircraft range and seat capacity, and
//! costs them into a per-flight profit report.

pub mod catalog;
pub mod config;
pub mod loader;
pub mod model;
pub mod planner;
pub mod profit;
pub mod report;
pub mod validation;

pub use catalog::{Aeroplanes, Airports, Catalog, LookupError};
pub use config::{ExportPolicy, PlanningConfig};
pub use planner::{PlanError, Planner, RunSummary};
pub use profit::{ProfitBreakdown, ProfitCalculator};
pub use validation::{BatchValidation, ValidationError, Validator};
