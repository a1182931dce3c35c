//! Tariff data model: named tariffs as ordered collections of rate
//! components, plus the engine that evaluates them per timestamp.
//!
//! A published utility tariff is a list of line items. Each line item
//! carries a charge category (energy / fixed / demand), the season and
//! time-of-use block it applies to, a unit, and a rate value. Duplicates
//! within the same slot are additive, matching how utilities publish
//! ancillary riders as separate lines.

pub mod calendar;
pub mod engine;

pub use calendar::{DayType, Season, TouBlock, resolve_slot};
pub use engine::TariffEngine;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a rate component charges for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeCategory {
    /// Charged per kWh consumed.
    Energy,
    /// Charged per point of delivery per day, independent of consumption.
    Fixed,
    /// Charged per kVA of the monthly maximum reading.
    Demand,
}

/// Unit the rate value is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateUnit {
    /// Cents per kilowatt-hour; divided by 100 at normalization.
    #[serde(rename = "c/kWh")]
    CentPerKwh,
    /// Rand per kilowatt-hour.
    #[serde(rename = "R/kWh")]
    RandPerKwh,
    /// Rand per point of delivery per day.
    #[serde(rename = "R/POD/day")]
    RandPerPodPerDay,
    /// Rand per kVA per month, levied on the monthly maximum reading.
    #[serde(rename = "R/kVA/month")]
    RandPerKvaPerMonth,
}

/// Overall shape of the tariff, as published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffStructure {
    FlatRate,
    Tiered,
    TimeOfUse,
}

/// One published line item of a tariff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateComponent {
    pub name: String,
    pub category: ChargeCategory,
    pub season: Season,
    pub time_of_use: TouBlock,
    pub unit: RateUnit,
    /// Rate value in the declared unit.
    pub rate: Decimal,
    /// First-block boundary for tiered residential tariffs. Carried in the
    /// data model; the per-interval engine applies the block-1 rate.
    pub block_threshold_kwh: Option<Decimal>,
}

impl RateComponent {
    /// An energy component applying in every season and block (an
    /// ancillary rider).
    pub fn ancillary_energy(name: &str, unit: RateUnit, rate: Decimal) -> Self {
        Self {
            name: name.to_owned(),
            category: ChargeCategory::Energy,
            season: Season::All,
            time_of_use: TouBlock::All,
            unit,
            rate,
            block_threshold_kwh: None,
        }
    }

    /// An energy component scoped to one (season, block) slot.
    pub fn energy_slot(
        name: &str,
        season: Season,
        time_of_use: TouBlock,
        unit: RateUnit,
        rate: Decimal,
    ) -> Self {
        Self {
            name: name.to_owned(),
            category: ChargeCategory::Energy,
            season,
            time_of_use,
            unit,
            rate,
            block_threshold_kwh: None,
        }
    }

    /// A daily fixed charge per point of delivery.
    pub fn fixed_daily(name: &str, rate: Decimal) -> Self {
        Self {
            name: name.to_owned(),
            category: ChargeCategory::Fixed,
            season: Season::All,
            time_of_use: TouBlock::All,
            unit: RateUnit::RandPerPodPerDay,
            rate,
            block_threshold_kwh: None,
        }
    }

    /// A monthly demand charge per kVA.
    pub fn demand_monthly(name: &str, season: Season, time_of_use: TouBlock, rate: Decimal) -> Self {
        Self {
            name: name.to_owned(),
            category: ChargeCategory::Demand,
            season,
            time_of_use,
            unit: RateUnit::RandPerKvaPerMonth,
            rate,
            block_threshold_kwh: None,
        }
    }
}

/// A named tariff: an ordered collection of rate components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffDefinition {
    pub name: String,
    pub structure: Option<TariffStructure>,
    pub components: Vec<RateComponent>,
}

impl TariffDefinition {
    pub fn new(name: &str, components: Vec<RateComponent>) -> Self {
        Self {
            name: name.to_owned(),
            structure: None,
            components,
        }
    }

    pub fn with_structure(mut self, structure: TariffStructure) -> Self {
        self.structure = Some(structure);
        self
    }
}
