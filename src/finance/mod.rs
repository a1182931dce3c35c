//! Financial aggregation: monthly bills, lifetime projection, and key
//! indicators, assembled into the [`FinancialReport`].

pub mod bills;
pub mod indicators;
pub mod projection;
pub mod report;

pub use projection::ProjectionParams;
pub use report::FinancialReport;

use rust_decimal::Decimal;
use tracing::warn;

use crate::dispatch::DispatchTrace;
use crate::error::{CoreError, Warning};
use crate::series::{DemandSeries, GenerationSeries};
use crate::system::SystemConfig;
use crate::tariff::TariffEngine;

use report::{BillFluctuation, MonthCost, TariffSamplePoint};

/// Number of per-interval rate samples exported for charting.
const TARIFF_SAMPLE_LEN: usize = 366;

/// Single crossing point from physics floats to money. Series values are
/// validated finite and non-negative at construction.
pub(crate) fn dec(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

/// Aggregates a dispatch trace into the full financial report.
///
/// `capital_cost` is required; a negative value is rejected, and a zero
/// value degrades payback/ROI to their `"N/A"` sentinels rather than
/// failing the report.
pub fn aggregate(
    demand: &DemandSeries,
    generation: &GenerationSeries,
    trace: &DispatchTrace,
    engine: &TariffEngine,
    system: &SystemConfig,
    capital_cost: Decimal,
    params: &ProjectionParams,
) -> Result<FinancialReport, CoreError> {
    if trace.is_empty() {
        return Err(CoreError::EmptyTrace);
    }
    if capital_cost < Decimal::ZERO {
        return Err(CoreError::InvalidCapitalCost(format!(
            "capital cost must be >= 0, got {capital_cost}"
        )));
    }

    let mut warnings = Vec::new();
    if !engine.has_any_energy_rate() {
        warn!("tariff has no applicable energy rates; bills will be fixed/demand only");
        warnings.push(Warning::ZeroEnergyRates);
    }
    if generation.values_kw().iter().all(|&kw| kw == 0.0) {
        warn!("generation is zero for every interval");
        warnings.push(Warning::ZeroGeneration);
    }

    // Monthly totals are rounded to currency precision first and the
    // annual figures summed from the rounded values, so the emitted
    // monthly bills always add up to the emitted annual costs exactly.
    let comparison: Vec<report::MonthlyComparison> = bills::assemble_monthly(demand, trace, engine)
        .into_iter()
        .map(|m| report::MonthlyComparison {
            month: m.month,
            old_cost: m.old_cost.round_dp(2),
            new_cost: m.new_cost.round_dp(2),
            old_bill_breakdown: m.old_bill_breakdown.rounded(),
            new_bill_breakdown: m.new_bill_breakdown.rounded(),
        })
        .collect();
    let original_annual_cost: Decimal = comparison.iter().map(|m| m.old_cost).sum();
    let new_annual_cost: Decimal = comparison.iter().map(|m| m.new_cost).sum();
    let annual_savings = original_annual_cost - new_annual_cost;

    let ind = indicators::compute(demand, generation, trace, system);
    let projection = projection::project(
        annual_savings,
        capital_cost,
        dec(ind.total_generation_kwh),
        params,
    );

    // Payback is only meaningful when there are savings to repay with.
    let payback_period = if annual_savings > Decimal::ZERO {
        projection.payback_years
    } else {
        None
    };

    let fluctuation = bill_fluctuation(&comparison);
    let tariff_sample = trace
        .timestamps
        .iter()
        .take(TARIFF_SAMPLE_LEN)
        .map(|&ts| TariffSamplePoint {
            timestamp: ts,
            rate: engine.energy_rate_r_per_kwh(ts),
        })
        .collect();

    let dec2 = |v: f64| dec(v).round_dp(2);
    let opt2 = |v: Option<f64>| v.map(dec2);

    Ok(FinancialReport {
        annual_savings,
        original_annual_cost,
        new_annual_cost,
        payback_period: payback_period.map(|p| p.round_dp(2)),
        roi: projection.roi_percent.map(|r| r.round_dp(2)),
        yield_year1: opt2(ind.yield_year1),
        lcoe: projection.lcoe_r_per_kwh.map(|l| l.round_dp(4)),
        yearly_savings: projection
            .yearly_savings
            .into_iter()
            .map(|mut y| {
                y.savings = y.savings.round_dp(2);
                y
            })
            .collect(),
        lifetime_cashflow: projection
            .lifetime_cashflow
            .into_iter()
            .map(|mut p| {
                p.cashflow = p.cashflow.round_dp(2);
                p
            })
            .collect(),
        cost_comparison: comparison,
        bill_fluctuation: fluctuation,
        tariff_sample,
        total_demand_kwh: dec2(ind.total_demand_kwh),
        total_generation_kwh: dec2(ind.total_generation_kwh),
        potential_generation_kwh: dec2(ind.potential_generation_kwh),
        total_import_kwh: dec2(ind.total_import_kwh),
        daytime_consumption_perc: dec2(ind.daytime_consumption_perc),
        self_consumption_rate: opt2(ind.self_consumption_rate),
        grid_independence_rate: opt2(ind.grid_independence_rate),
        throttling_loss_percent: opt2(ind.throttling_loss_percent),
        yield_incl_losses: opt2(ind.yield_incl_losses),
        yield_excl_losses: opt2(ind.yield_excl_losses),
        battery_cycles: opt2(ind.battery_cycles),
        warnings,
    })
}

/// Worst and best post-PV months by total bill.
fn bill_fluctuation(comparison: &[report::MonthlyComparison]) -> BillFluctuation {
    let mut worst = MonthCost {
        month: 0,
        cost: Decimal::MIN,
    };
    let mut best = MonthCost {
        month: 0,
        cost: Decimal::MAX,
    };
    for m in comparison {
        if m.new_cost > worst.cost {
            worst = MonthCost {
                month: m.month,
                cost: m.new_cost.round_dp(2),
            };
        }
        if m.new_cost < best.cost {
            best = MonthCost {
                month: m.month,
                cost: m.new_cost.round_dp(2),
            };
        }
    }
    BillFluctuation { worst, best }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec as d;

    use super::*;
    use crate::dispatch::simulate;
    use crate::series::year_timestamps;
    use crate::tariff::{RateComponent, RateUnit, TariffDefinition};

    fn flat_engine() -> TariffEngine {
        let tariff = TariffDefinition::new(
            "flat",
            vec![
                RateComponent::ancillary_energy("energy", RateUnit::CentPerKwh, d!(250)),
                RateComponent::fixed_daily("service", d!(9.44)),
            ],
        );
        TariffEngine::new(&tariff).unwrap()
    }

    fn constant_year(demand_kw: f64) -> (DemandSeries, GenerationSeries) {
        let stamps = year_timestamps(2025);
        let demand = DemandSeries::new(stamps, vec![demand_kw; 17_520]).unwrap();
        let generation = GenerationSeries::for_demand(&demand, vec![0.0; 17_520]).unwrap();
        (demand, generation)
    }

    #[test]
    fn baseline_without_pv_has_zero_savings_and_no_payback() {
        let (demand, generation) = constant_year(2.0);
        let system = SystemConfig::grid_tied(0.0, 0.0);
        let trace = simulate(&demand, &generation, &system).unwrap();
        let report = aggregate(
            &demand,
            &generation,
            &trace,
            &flat_engine(),
            &system,
            d!(50000),
            &ProjectionParams::default(),
        )
        .unwrap();

        assert_eq!(report.annual_savings, Decimal::ZERO);
        assert_eq!(report.payback_period, None);
        assert_eq!(report.original_annual_cost, d!(47245.60));
        assert_eq!(report.new_annual_cost, d!(47245.60));
        assert_eq!(report.total_import_kwh, d!(17520.00));
        assert!(report.warnings.contains(&Warning::ZeroGeneration));
    }

    #[test]
    fn negative_capital_is_rejected() {
        let (demand, generation) = constant_year(1.0);
        let system = SystemConfig::grid_tied(0.0, 0.0);
        let trace = simulate(&demand, &generation, &system).unwrap();
        assert!(matches!(
            aggregate(
                &demand,
                &generation,
                &trace,
                &flat_engine(),
                &system,
                d!(-1),
                &ProjectionParams::default(),
            ),
            Err(CoreError::InvalidCapitalCost(_))
        ));
    }

    #[test]
    fn zero_rate_tariff_warns_but_reports() {
        let tariff = TariffDefinition::new(
            "fixed_only",
            vec![RateComponent::fixed_daily("service", d!(9.44))],
        );
        let engine = TariffEngine::new(&tariff).unwrap();
        let (demand, generation) = constant_year(1.0);
        let system = SystemConfig::grid_tied(0.0, 0.0);
        let trace = simulate(&demand, &generation, &system).unwrap();
        let report = aggregate(
            &demand,
            &generation,
            &trace,
            &engine,
            &system,
            d!(1000),
            &ProjectionParams::default(),
        )
        .unwrap();
        assert!(report.warnings.contains(&Warning::ZeroEnergyRates));
        assert_eq!(report.original_annual_cost, d!(9.44) * Decimal::from(365));
    }

    #[test]
    fn monthly_bills_sum_to_annual_costs() {
        // 33.33 c/kWh produces monthly totals with sub-cent tails, so the
        // identity only holds if the annual figure is summed from the
        // rounded monthly bills.
        let tariff = TariffDefinition::new(
            "odd_rate",
            vec![
                RateComponent::ancillary_energy("energy", RateUnit::CentPerKwh, d!(33.33)),
                RateComponent::fixed_daily("service", d!(9.44)),
            ],
        );
        let engine = TariffEngine::new(&tariff).unwrap();
        let (demand, generation) = constant_year(3.0);
        let system = SystemConfig::grid_tied(0.0, 0.0);
        let trace = simulate(&demand, &generation, &system).unwrap();
        let report = aggregate(
            &demand,
            &generation,
            &trace,
            &engine,
            &system,
            d!(1000),
            &ProjectionParams::default(),
        )
        .unwrap();
        let old_sum: Decimal = report.cost_comparison.iter().map(|m| m.old_cost).sum();
        let new_sum: Decimal = report.cost_comparison.iter().map(|m| m.new_cost).sum();
        assert_eq!(old_sum, report.original_annual_cost);
        assert_eq!(new_sum, report.new_annual_cost);
        assert_eq!(
            report.annual_savings,
            report.original_annual_cost - report.new_annual_cost
        );
    }

    #[test]
    fn tariff_sample_covers_the_first_week() {
        let (demand, generation) = constant_year(1.0);
        let system = SystemConfig::grid_tied(0.0, 0.0);
        let trace = simulate(&demand, &generation, &system).unwrap();
        let report = aggregate(
            &demand,
            &generation,
            &trace,
            &flat_engine(),
            &system,
            d!(1000),
            &ProjectionParams::default(),
        )
        .unwrap();
        assert_eq!(report.tariff_sample.len(), 366);
        assert_eq!(report.tariff_sample[0].rate, d!(2.50));
    }
}
