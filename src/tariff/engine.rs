//! Tariff engine: build-once rate tables and pure per-timestamp lookups.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::calendar::{Season, TouBlock, resolve_slot};
use super::{ChargeCategory, RateComponent, RateUnit, TariffDefinition};
use crate::error::CoreError;

type RateKey = (ChargeCategory, Season, TouBlock);

/// Evaluates a [`TariffDefinition`] per timestamp.
///
/// All unit conversions and component summation happen once in [`new`];
/// queries are pure table lookups and safe to share across concurrent
/// runs. Components landing on the same (category, season, block) cell are
/// summed, treating duplicates as additive line items.
///
/// [`new`]: TariffEngine::new
#[derive(Debug, Clone)]
pub struct TariffEngine {
    tables: HashMap<RateKey, Decimal>,
}

impl TariffEngine {
    /// Normalizes the component list into rate tables.
    ///
    /// Conversions: `c/kWh` becomes R/kWh by dividing by 100. Rejected as
    /// malformed: negative rates, a unit that does not fit the component's
    /// category, and fixed components scoped to a season or block.
    pub fn new(tariff: &TariffDefinition) -> Result<Self, CoreError> {
        let mut tables: HashMap<RateKey, Decimal> = HashMap::new();
        for component in &tariff.components {
            let rate = normalize(component)?;
            let key = (component.category, component.season, component.time_of_use);
            *tables.entry(key).or_insert(Decimal::ZERO) += rate;
        }
        Ok(Self { tables })
    }

    fn cell(&self, key: RateKey) -> Decimal {
        self.tables.get(&key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total energy rate in R/kWh applicable at `ts`: the slot-specific
    /// component plus the ancillary (all/all) component.
    pub fn energy_rate_r_per_kwh(&self, ts: NaiveDateTime) -> Decimal {
        let (season, block) = resolve_slot(ts);
        self.cell((ChargeCategory::Energy, season, block))
            + self.cell((ChargeCategory::Energy, Season::All, TouBlock::All))
    }

    /// Total demand rate in R/kVA/month applicable at `ts`. Zero means no
    /// demand charge applies at this instant.
    pub fn demand_rate_r_per_kva_per_month(&self, ts: NaiveDateTime) -> Decimal {
        let (season, block) = resolve_slot(ts);
        self.cell((ChargeCategory::Demand, season, block))
            + self.cell((ChargeCategory::Demand, Season::All, TouBlock::All))
    }

    /// Daily fixed rate in R/POD/day.
    pub fn fixed_rate_r_per_day(&self) -> Decimal {
        self.cell((ChargeCategory::Fixed, Season::All, TouBlock::All))
    }

    /// Whether any energy component carries a strictly positive rate.
    /// Used for the misconfigured-tariff warning.
    pub fn has_any_energy_rate(&self) -> bool {
        self.tables
            .iter()
            .any(|(&(category, _, _), &rate)| {
                category == ChargeCategory::Energy && rate > Decimal::ZERO
            })
    }
}

/// Converts a component's rate to the engine's internal unit, validating
/// the unit against the category.
fn normalize(component: &RateComponent) -> Result<Decimal, CoreError> {
    let malformed = |reason: &str| CoreError::InvalidTariff {
        component: component.name.clone(),
        reason: reason.to_owned(),
    };

    if component.rate < Decimal::ZERO {
        return Err(malformed("negative rate"));
    }

    match component.category {
        ChargeCategory::Energy => match component.unit {
            RateUnit::CentPerKwh => Ok(component.rate / Decimal::from(100)),
            RateUnit::RandPerKwh => Ok(component.rate),
            RateUnit::RandPerPodPerDay | RateUnit::RandPerKvaPerMonth => {
                Err(malformed("energy component must be in c/kWh or R/kWh"))
            }
        },
        ChargeCategory::Fixed => {
            if component.season != Season::All || component.time_of_use != TouBlock::All {
                return Err(malformed("fixed component must apply in all seasons and blocks"));
            }
            match component.unit {
                RateUnit::RandPerPodPerDay => Ok(component.rate),
                _ => Err(malformed("fixed component must be in R/POD/day")),
            }
        }
        ChargeCategory::Demand => match component.unit {
            RateUnit::RandPerKvaPerMonth => Ok(component.rate),
            _ => Err(malformed("demand component must be in R/kVA/month")),
        },
    }
}
