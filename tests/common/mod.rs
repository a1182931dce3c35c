//! Shared test fixtures for integration tests.

use rust_decimal::Decimal;
use solar_econ::oracle::ProfileOracle;
use solar_econ::oracle::profile::UNIFORM_MIDDAY;
use solar_econ::providers::custom_flat_rate;
use solar_econ::series::{DemandSeries, INTERVALS_PER_YEAR, year_timestamps};
use solar_econ::tariff::{RateComponent, TariffDefinition};

/// Full 2025 year of constant demand.
pub fn constant_demand_year(kw: f64) -> DemandSeries {
    DemandSeries::new(year_timestamps(2025), vec![kw; INTERVALS_PER_YEAR])
        .expect("year grid is valid")
}

/// Flat 2.50 R/kWh energy plus a 9.44 R/POD/day service charge.
pub fn flat_tariff() -> TariffDefinition {
    let mut tariff = custom_flat_rate(Decimal::new(250, 2));
    tariff
        .components
        .push(RateComponent::fixed_daily("service_charge", Decimal::new(944, 2)));
    tariff
}

/// Deterministic oracle producing 1 kW/kWp during [10:00, 15:00).
pub fn midday_oracle() -> ProfileOracle {
    ProfileOracle::new(UNIFORM_MIDDAY)
}
