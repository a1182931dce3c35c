//! End-to-end orchestration: one call evaluates one project with one
//! tariff over one year.
//!
//! The run is purely sequential and allocates only the per-interval
//! arrays. Nothing is retained between runs, so independent calls (an
//! optimizer sweeping candidate systems, say) can execute in parallel at
//! the task level.

use rust_decimal::Decimal;
use tracing::debug;

use crate::dispatch::simulate;
use crate::error::CoreError;
use crate::finance::{self, FinancialReport, ProjectionParams};
use crate::oracle::{GenerationOracle, Site};
use crate::series::{DemandSeries, GenerationSeries, INTERVALS_PER_YEAR};
use crate::system::SystemConfig;
use crate::tariff::{TariffDefinition, TariffEngine};

/// Everything `run` needs besides the project inputs themselves.
pub struct RunOptions<'a> {
    pub oracle: &'a dyn GenerationOracle,
    pub site: Site,
    pub projection: ProjectionParams,
}

/// Runs the full pipeline: generation, dispatch, tariff evaluation, and
/// financial aggregation. No side effects; inputs are never mutated.
pub fn run(
    demand: &DemandSeries,
    system: &SystemConfig,
    tariff: &TariffDefinition,
    capital_cost: Decimal,
    options: &RunOptions<'_>,
) -> Result<FinancialReport, CoreError> {
    system.validate()?;
    if demand.len() != INTERVALS_PER_YEAR {
        return Err(CoreError::IncompleteYear {
            expected: INTERVALS_PER_YEAR,
            actual: demand.len(),
        });
    }

    let engine = TariffEngine::new(tariff)?;

    let generation_values =
        options
            .oracle
            .generate(&options.site, system.panel_kw, demand.timestamps())?;
    let generation = GenerationSeries::for_demand(demand, generation_values)?;
    debug!(panel_kw = system.panel_kw, "generation series produced");

    let trace = simulate(demand, &generation, system)?;
    debug!(intervals = trace.len(), "dispatch simulated");

    finance::aggregate(
        demand,
        &generation,
        &trace,
        &engine,
        system,
        capital_cost,
        &options.projection,
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::oracle::ProfileOracle;
    use crate::oracle::profile::UNIFORM_MIDDAY;
    use crate::providers::custom_flat_rate;
    use crate::series::year_timestamps;

    fn options(oracle: &ProfileOracle) -> RunOptions<'_> {
        RunOptions {
            oracle,
            site: Site::new(-26.2, 28.0, 2.0),
            projection: ProjectionParams::default(),
        }
    }

    #[test]
    fn short_year_is_rejected() {
        let stamps = year_timestamps(2025)[..48].to_vec();
        let demand = DemandSeries::new(stamps, vec![1.0; 48]).unwrap();
        let oracle = ProfileOracle::new(UNIFORM_MIDDAY);
        let err = run(
            &demand,
            &SystemConfig::grid_tied(5.0, 5.0),
            &custom_flat_rate(dec!(2.50)),
            dec!(1000),
            &options(&oracle),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::IncompleteYear { actual: 48, .. }));
    }

    #[test]
    fn full_year_run_produces_a_report() {
        let demand =
            DemandSeries::new(year_timestamps(2025), vec![2.0; INTERVALS_PER_YEAR]).unwrap();
        let oracle = ProfileOracle::new(UNIFORM_MIDDAY);
        let report = run(
            &demand,
            &SystemConfig::grid_tied(5.0, 5.0),
            &custom_flat_rate(dec!(2.50)),
            dec!(80000),
            &options(&oracle),
        )
        .unwrap();
        assert!(report.annual_savings > Decimal::ZERO);
        assert_eq!(report.cost_comparison.len(), 12);
        assert_eq!(report.lifetime_cashflow.len(), 21);
    }
}
