//! Technical key indicators for year 0, computed in a single pass over
//! the dispatch trace.
//!
//! These are physical quantities (kWh, percentages), so they stay in
//! binary floating point; conversion to decimals happens at report
//! emission.

use chrono::Timelike;

use crate::dispatch::DispatchTrace;
use crate::series::{DemandSeries, GenerationSeries, INTERVAL_HOURS};
use crate::system::SystemConfig;

/// Daytime window for the consumption-share indicator: [07:00, 18:00).
const DAYTIME_START_HOUR: u32 = 7;
const DAYTIME_END_HOUR: u32 = 18;

#[derive(Debug, Clone)]
pub struct TechnicalIndicators {
    pub total_demand_kwh: f64,
    /// Post-clip generation.
    pub total_generation_kwh: f64,
    /// Pre-clip generation.
    pub potential_generation_kwh: f64,
    pub total_import_kwh: f64,
    /// Share of demand consumed during daytime hours, percent.
    pub daytime_consumption_perc: f64,
    /// On-site-consumed PV over potential PV; `None` without generation.
    /// Consumed PV is the part serving demand directly plus the energy
    /// absorbed by the battery; surplus suppressed by the export policy
    /// counts as curtailment, not consumption.
    pub self_consumption_rate: Option<f64>,
    /// On-site-consumed PV over total demand; `None` without demand.
    pub grid_independence_rate: Option<f64>,
    /// Clipping loss as a share of potential generation, percent.
    pub throttling_loss_percent: Option<f64>,
    /// Specific yield after clipping, kWh/kWp/day.
    pub yield_incl_losses: Option<f64>,
    /// Specific yield before clipping, kWh/kWp/day.
    pub yield_excl_losses: Option<f64>,
    /// First-year specific yield after clipping, kWh/kWp.
    pub yield_year1: Option<f64>,
    /// Approximate annual battery cycles: discharged energy over usable
    /// capacity. `None` unless the topology dispatches a battery.
    pub battery_cycles: Option<f64>,
}

/// Computes all indicators from the aligned inputs.
pub fn compute(
    demand: &DemandSeries,
    generation: &GenerationSeries,
    trace: &DispatchTrace,
    system: &SystemConfig,
) -> TechnicalIndicators {
    let n = trace.len();
    let mut demand_kwh = 0.0;
    let mut daytime_kwh = 0.0;
    let mut potential_kwh = 0.0;
    let mut clipped_kwh = 0.0;
    let mut import_kwh = 0.0;
    let mut direct_kwh = 0.0;
    let mut charged_kwh = 0.0;
    let mut discharged_kwh = 0.0;
    let mut previous_soc = 0.0_f64;

    for i in 0..n {
        let ts = trace.timestamps[i];
        let demand_kw = demand.values_kw()[i];
        let demand_step = demand_kw * INTERVAL_HOURS;
        demand_kwh += demand_step;
        if (DAYTIME_START_HOUR..DAYTIME_END_HOUR).contains(&ts.hour()) {
            daytime_kwh += demand_step;
        }

        potential_kwh += generation.values_kw()[i] * INTERVAL_HOURS;
        clipped_kwh += trace.clipped_generation_kw[i] * INTERVAL_HOURS;
        import_kwh += trace.import_kw[i] * INTERVAL_HOURS;
        direct_kwh += trace.clipped_generation_kw[i].min(demand_kw) * INTERVAL_HOURS;

        let soc = trace.battery_soc_percent[i];
        if soc > previous_soc {
            charged_kwh += (soc - previous_soc) / 100.0 * system.battery_kwh;
        } else {
            discharged_kwh += (previous_soc - soc) / 100.0 * system.battery_kwh;
        }
        previous_soc = soc;
    }

    let days = n as f64 * INTERVAL_HOURS / 24.0;
    // PV serving demand directly plus PV banked in the battery; surplus
    // curtailed by the export policy is excluded.
    let on_site_kwh = direct_kwh + charged_kwh;

    let ratio = |num: f64, den: f64| if den > 0.0 { Some(num / den) } else { None };

    TechnicalIndicators {
        total_demand_kwh: demand_kwh,
        total_generation_kwh: clipped_kwh,
        potential_generation_kwh: potential_kwh,
        total_import_kwh: import_kwh,
        daytime_consumption_perc: if demand_kwh > 0.0 {
            daytime_kwh / demand_kwh * 100.0
        } else {
            0.0
        },
        self_consumption_rate: ratio(on_site_kwh, potential_kwh),
        grid_independence_rate: ratio(on_site_kwh, demand_kwh),
        throttling_loss_percent: ratio(potential_kwh - clipped_kwh, potential_kwh)
            .map(|r| r * 100.0),
        yield_incl_losses: ratio(clipped_kwh, system.panel_kw * days),
        yield_excl_losses: ratio(potential_kwh, system.panel_kw * days),
        yield_year1: ratio(clipped_kwh, system.panel_kw),
        battery_cycles: if system.battery_active() {
            Some(discharged_kwh / system.battery_kwh)
        } else {
            None
        },
    }
}
