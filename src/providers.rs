//! Collaborator interfaces the core consumes.
//!
//! The core does not specify where demand series, tariffs, or system
//! parameters originate; hosts wire these traits to files, databases, or
//! catalogs. The only contract is the preconditions on the returned
//! values, which the core re-validates at `run` time.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::series::DemandSeries;
use crate::system::SystemConfig;
use crate::tariff::{RateComponent, RateUnit, TariffDefinition, TariffStructure};

/// Source of a project's demand year.
pub trait DemandProvider {
    fn load_demand(&self, project_id: &str) -> Result<DemandSeries, CoreError>;
}

/// Source of tariff definitions.
pub trait TariffProvider {
    fn load_tariff(&self, tariff_id: &str) -> Result<TariffDefinition, CoreError>;
}

/// Source of the proposed system and its capital cost.
pub trait SystemProvider {
    fn load_system(&self, project_id: &str) -> Result<(SystemConfig, Decimal), CoreError>;
}

/// Builds a custom flat-rate tariff from a rate in R/kWh.
///
/// Stored as a single all/all energy component in c/kWh, so the rate is
/// multiplied by 100 here.
pub fn custom_flat_rate(rate_r_per_kwh: Decimal) -> TariffDefinition {
    TariffDefinition::new(
        "custom_flat_rate",
        vec![RateComponent::ancillary_energy(
            "energy",
            RateUnit::CentPerKwh,
            rate_r_per_kwh * Decimal::from(100),
        )],
    )
    .with_structure(TariffStructure::FlatRate)
}
