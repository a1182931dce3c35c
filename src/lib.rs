//! Solar economics core: half-hourly dispatch simulation, tariff
//! evaluation, and 20-year financial modelling for PV + battery systems.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod finance;
pub mod io;
pub mod oracle;
pub mod providers;
pub mod runner;
pub mod series;
pub mod system;
pub mod tariff;

pub use error::CoreError;
pub use finance::FinancialReport;
pub use runner::{RunOptions, run};
pub use series::{DemandSeries, GenerationSeries};
pub use system::SystemConfig;
pub use tariff::TariffDefinition;
