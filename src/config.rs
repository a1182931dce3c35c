//! TOML-based scenario configuration for the demo binary.
//!
//! All fields have defaults matching the baseline scenario: a 2 kW flat
//! commercial load in Johannesburg on a 250 c/kWh flat tariff, evaluated
//! against a 5 kWp grid-tied system.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CoreError;
use crate::finance::ProjectionParams;
use crate::oracle::Site;
use crate::providers::custom_flat_rate;
use crate::series::{DemandSeries, year_timestamps};
use crate::system::{SystemConfig, Topology};
use crate::tariff::{RateComponent, TariffDefinition};

/// Top-level scenario configuration parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub site: SiteConfig,
    pub demand: DemandConfig,
    pub system: SystemSection,
    pub tariff: TariffConfig,
    pub finance: FinanceConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            demand: DemandConfig::default(),
            system: SystemSection::default(),
            tariff: TariffConfig::default(),
            finance: FinanceConfig::default(),
        }
    }
}

/// Site location and time zone.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub utc_offset_hours: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude_deg: -26.2,
            longitude_deg: 28.0,
            utc_offset_hours: 2.0,
        }
    }
}

/// Synthetic demand shape: a flat base with a daytime uplift.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Calendar year the evaluation grid starts in.
    pub year: i32,
    /// Around-the-clock base demand (kW).
    pub base_kw: f64,
    /// Extra demand during working hours [07:00, 18:00) (kW).
    pub daytime_extra_kw: f64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            base_kw: 2.0,
            daytime_extra_kw: 0.0,
        }
    }
}

/// Proposed system parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemSection {
    pub panel_kw: f64,
    pub inverter_kva: f64,
    pub battery_kwh: f64,
    pub topology: Topology,
    pub allow_export: bool,
    pub tilt_deg: Option<f64>,
    pub azimuth_deg: Option<f64>,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            panel_kw: 5.0,
            inverter_kva: 5.0,
            battery_kwh: 0.0,
            topology: Topology::GridTied,
            allow_export: false,
            tilt_deg: None,
            azimuth_deg: None,
        }
    }
}

/// Flat tariff parameters for the demo scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    pub flat_rate_r_per_kwh: f64,
    pub fixed_r_per_day: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            flat_rate_r_per_kwh: 2.50,
            fixed_r_per_day: 9.44,
        }
    }
}

/// Capital cost and projection overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinanceConfig {
    pub capital_cost: f64,
    pub escalation: f64,
    pub degradation: f64,
    pub horizon_years: u32,
    pub maintenance_frac: f64,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            capital_cost: 90_000.0,
            escalation: 0.12,
            degradation: 0.005,
            horizon_years: 20,
            maintenance_frac: 0.01,
        }
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

impl ScenarioConfig {
    /// The built-in baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Loads and parses a scenario from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("failed to read scenario `{}`: {err}", path.display()))?;
        toml::from_str(&raw)
            .map_err(|err| format!("invalid scenario `{}`: {err}", path.display()))
    }

    pub fn build_site(&self) -> Site {
        Site::new(
            self.site.latitude_deg,
            self.site.longitude_deg,
            self.site.utc_offset_hours,
        )
    }

    /// Synthesizes the demand year from the configured shape.
    pub fn build_demand(&self) -> Result<DemandSeries, CoreError> {
        use chrono::Timelike;

        let stamps = year_timestamps(self.demand.year);
        let values = stamps
            .iter()
            .map(|ts| {
                if (7..18).contains(&ts.hour()) {
                    self.demand.base_kw + self.demand.daytime_extra_kw
                } else {
                    self.demand.base_kw
                }
            })
            .collect();
        DemandSeries::new(stamps, values)
    }

    pub fn build_system(&self) -> SystemConfig {
        let s = &self.system;
        let mut system = SystemConfig::grid_tied(s.panel_kw, s.inverter_kva);
        system.battery_kwh = s.battery_kwh;
        system.topology = s.topology;
        system.allow_export = s.allow_export;
        system.tilt_deg = s.tilt_deg;
        system.azimuth_deg = s.azimuth_deg;
        system
    }

    pub fn build_tariff(&self) -> TariffDefinition {
        let mut tariff = custom_flat_rate(to_decimal(self.tariff.flat_rate_r_per_kwh));
        if self.tariff.fixed_r_per_day > 0.0 {
            tariff.components.push(RateComponent::fixed_daily(
                "service_charge",
                to_decimal(self.tariff.fixed_r_per_day),
            ));
        }
        tariff
    }

    pub fn capital_cost(&self) -> Decimal {
        to_decimal(self.finance.capital_cost)
    }

    pub fn projection(&self) -> ProjectionParams {
        ProjectionParams {
            escalation: to_decimal(self.finance.escalation),
            degradation: to_decimal(self.finance.degradation),
            horizon_years: self.finance.horizon_years,
            maintenance_frac: to_decimal(self.finance.maintenance_frac),
        }
    }
}
