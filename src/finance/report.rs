//! Financial report: the core's stable output contract.
//!
//! All monetary arithmetic upstream is decimal; rounding to currency
//! precision (two fractional digits) happens here, at emission. Fields
//! whose computation hits a division-by-zero candidate carry sentinels:
//! `"N/A"` for unavailable money/ratio figures, `"-"` for battery cycles
//! on systems without a dispatched battery.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::Warning;

/// Energy / fixed / demand split of one monthly bill.
#[derive(Debug, Clone, Serialize)]
pub struct BillBreakdown {
    pub energy: Decimal,
    pub fixed: Decimal,
    pub demand: Decimal,
}

impl BillBreakdown {
    pub fn total(&self) -> Decimal {
        self.energy + self.fixed + self.demand
    }

    pub fn rounded(&self) -> Self {
        Self {
            energy: self.energy.round_dp(2),
            fixed: self.fixed.round_dp(2),
            demand: self.demand.round_dp(2),
        }
    }
}

/// Old-versus-new comparison for one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyComparison {
    pub month: u32,
    pub old_cost: Decimal,
    pub new_cost: Decimal,
    pub old_bill_breakdown: BillBreakdown,
    pub new_bill_breakdown: BillBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearlySaving {
    pub year: u32,
    pub savings: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashflowPoint {
    pub year: u32,
    pub cashflow: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCost {
    pub month: u32,
    pub cost: Decimal,
}

/// Worst and best post-PV monthly bills.
#[derive(Debug, Clone, Serialize)]
pub struct BillFluctuation {
    pub worst: MonthCost,
    pub best: MonthCost,
}

/// One charting sample: the energy rate applicable at a timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TariffSamplePoint {
    pub timestamp: NaiveDateTime,
    pub rate: Decimal,
}

// UFCS: `Decimal` has an inherent `serialize` returning its raw bytes,
// which would shadow the trait method here.
fn serialize_or_na<S: Serializer>(v: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(d) => serde::Serialize::serialize(d, s),
        None => s.serialize_str("N/A"),
    }
}

fn serialize_or_dash<S: Serializer>(v: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(d) => serde::Serialize::serialize(d, s),
        None => s.serialize_str("-"),
    }
}

/// The core's output: utility-bill comparison, 20-year return model, and
/// technical key indicators for one candidate system.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialReport {
    pub annual_savings: Decimal,
    pub original_annual_cost: Decimal,
    pub new_annual_cost: Decimal,
    /// Payback period in years; `"N/A"` when savings never repay capital.
    #[serde(serialize_with = "serialize_or_na")]
    pub payback_period: Option<Decimal>,
    /// Horizon return on investment, percent.
    #[serde(serialize_with = "serialize_or_na")]
    pub roi: Option<Decimal>,
    /// First-year specific yield, kWh per installed kWp.
    #[serde(serialize_with = "serialize_or_na")]
    pub yield_year1: Option<Decimal>,
    /// Levelized cost of energy over the horizon, R/kWh.
    #[serde(serialize_with = "serialize_or_na")]
    pub lcoe: Option<Decimal>,
    pub yearly_savings: Vec<YearlySaving>,
    /// Horizon + 1 points; year 0 is the capital outlay.
    pub lifetime_cashflow: Vec<CashflowPoint>,
    pub cost_comparison: Vec<MonthlyComparison>,
    pub bill_fluctuation: BillFluctuation,
    /// First-week per-interval energy rates for charting.
    pub tariff_sample: Vec<TariffSamplePoint>,

    // Technical indicators, year 0.
    pub total_demand_kwh: Decimal,
    pub total_generation_kwh: Decimal,
    pub potential_generation_kwh: Decimal,
    pub total_import_kwh: Decimal,
    pub daytime_consumption_perc: Decimal,
    #[serde(serialize_with = "serialize_or_na")]
    pub self_consumption_rate: Option<Decimal>,
    #[serde(serialize_with = "serialize_or_na")]
    pub grid_independence_rate: Option<Decimal>,
    #[serde(serialize_with = "serialize_or_na")]
    pub throttling_loss_percent: Option<Decimal>,
    /// Specific yield including clipping losses, kWh/kWp/day.
    #[serde(serialize_with = "serialize_or_na")]
    pub yield_incl_losses: Option<Decimal>,
    /// Specific yield before clipping, kWh/kWp/day.
    #[serde(serialize_with = "serialize_or_na")]
    pub yield_excl_losses: Option<Decimal>,
    /// Approximate annual battery cycles; `"-"` without a dispatched
    /// battery.
    #[serde(serialize_with = "serialize_or_dash")]
    pub battery_cycles: Option<Decimal>,

    pub warnings: Vec<Warning>,
}

impl std::fmt::Display for FinancialReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt(v: &Option<Decimal>, sentinel: &str) -> String {
            v.map_or_else(|| sentinel.to_owned(), |d| d.to_string())
        }

        writeln!(f, "--- Financial Report ---")?;
        writeln!(f, "Original annual cost:  R {}", self.original_annual_cost)?;
        writeln!(f, "New annual cost:       R {}", self.new_annual_cost)?;
        writeln!(f, "Annual savings:        R {}", self.annual_savings)?;
        writeln!(f, "Payback period:        {} years", opt(&self.payback_period, "N/A"))?;
        writeln!(f, "ROI:                   {} %", opt(&self.roi, "N/A"))?;
        writeln!(f, "LCOE:                  {} R/kWh", opt(&self.lcoe, "N/A"))?;
        writeln!(f, "Demand:                {} kWh", self.total_demand_kwh)?;
        writeln!(f, "Generation:            {} kWh", self.total_generation_kwh)?;
        writeln!(f, "Grid import:           {} kWh", self.total_import_kwh)?;
        writeln!(f, "Throttling loss:       {} %", opt(&self.throttling_loss_percent, "N/A"))?;
        writeln!(f, "Battery cycles:        {}", opt(&self.battery_cycles, "-"))?;
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}
