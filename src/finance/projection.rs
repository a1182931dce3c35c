//! Lifetime projection: savings escalation, PV degradation, payback,
//! return on investment, and levelized cost of energy.

use rust_decimal::{Decimal, dec};

use super::report::{CashflowPoint, YearlySaving};

/// Escalation / degradation parameters for the lifetime projection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionParams {
    /// Year-over-year utility price growth applied to savings.
    pub escalation: Decimal,
    /// Year-over-year loss of PV output capability.
    pub degradation: Decimal,
    pub horizon_years: u32,
    /// Annual maintenance as a fraction of capital cost (feeds LCOE).
    pub maintenance_frac: Decimal,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            escalation: dec!(0.12),
            degradation: dec!(0.005),
            horizon_years: 20,
            maintenance_frac: dec!(0.01),
        }
    }
}

/// Projection outputs, still at full decimal precision.
#[derive(Debug, Clone)]
pub struct Projection {
    pub yearly_savings: Vec<YearlySaving>,
    /// `horizon + 1` points; year 0 is the capital outlay.
    pub lifetime_cashflow: Vec<CashflowPoint>,
    pub payback_years: Option<Decimal>,
    pub roi_percent: Option<Decimal>,
    pub lcoe_r_per_kwh: Option<Decimal>,
}

/// Projects first-year savings over the horizon.
///
/// Savings in operational year `y` (0-based) are
/// `annual_savings * (1 + escalation)^y * (1 - degradation)^y`, computed
/// by running multiplication to stay in decimal throughout. Payback is
/// found by linear interpolation on the cumulative cashflow curve; `None`
/// when the curve never reaches zero or capital is zero.
pub fn project(
    annual_savings: Decimal,
    capital_cost: Decimal,
    annual_generation_kwh: Decimal,
    params: &ProjectionParams,
) -> Projection {
    let horizon = params.horizon_years;
    let growth = (Decimal::ONE + params.escalation) * (Decimal::ONE - params.degradation);
    let retention = Decimal::ONE - params.degradation;

    let mut yearly_savings = Vec::with_capacity(horizon as usize);
    let mut lifetime_cashflow = Vec::with_capacity(horizon as usize + 1);
    lifetime_cashflow.push(CashflowPoint {
        year: 0,
        cashflow: -capital_cost,
    });

    let mut factor = Decimal::ONE;
    let mut generation_factor = Decimal::ONE;
    let mut cumulative = -capital_cost;
    let mut total_savings = Decimal::ZERO;
    let mut lifetime_generation = Decimal::ZERO;
    for y in 0..horizon {
        let savings = annual_savings * factor;
        cumulative += savings;
        total_savings += savings;
        lifetime_generation += annual_generation_kwh * generation_factor;
        yearly_savings.push(YearlySaving { year: y + 1, savings });
        lifetime_cashflow.push(CashflowPoint {
            year: y + 1,
            cashflow: cumulative,
        });
        factor *= growth;
        generation_factor *= retention;
    }

    let payback_years = if capital_cost > Decimal::ZERO {
        payback_from_cashflow(&lifetime_cashflow)
    } else {
        None
    };

    let roi_percent = if capital_cost > Decimal::ZERO {
        Some((total_savings - capital_cost) / capital_cost * dec!(100))
    } else {
        None
    };

    let lcoe_r_per_kwh = if lifetime_generation > Decimal::ZERO {
        let lifetime_cost =
            capital_cost + capital_cost * params.maintenance_frac * Decimal::from(horizon);
        Some(lifetime_cost / lifetime_generation)
    } else {
        None
    };

    Projection {
        yearly_savings,
        lifetime_cashflow,
        payback_years,
        roi_percent,
        lcoe_r_per_kwh,
    }
}

/// First zero crossing of the cumulative curve, interpolated between the
/// bracketing years.
fn payback_from_cashflow(cashflow: &[CashflowPoint]) -> Option<Decimal> {
    for pair in cashflow.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        if after.cashflow >= Decimal::ZERO {
            let step = after.cashflow - before.cashflow;
            if step <= Decimal::ZERO {
                return Some(Decimal::from(after.year));
            }
            let fraction = -before.cashflow / step;
            return Some(Decimal::from(before.year) + fraction);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_projection_paybacks_linearly() {
        let params = ProjectionParams {
            escalation: Decimal::ZERO,
            degradation: Decimal::ZERO,
            horizon_years: 20,
            maintenance_frac: Decimal::ZERO,
        };
        let projection = project(dec!(1000), dec!(2500), dec!(9000), &params);
        // 2500 of capital at 1000/year pays back in exactly 2.5 years.
        assert_eq!(projection.payback_years, Some(dec!(2.5)));
        // 20 years * 1000 - 2500, over 2500, in percent.
        assert_eq!(projection.roi_percent, Some(dec!(700)));
        assert_eq!(projection.yearly_savings.len(), 20);
        assert_eq!(projection.lifetime_cashflow.len(), 21);
        assert_eq!(projection.lifetime_cashflow[0].cashflow, dec!(-2500));
        // No degradation: LCOE is capital over 20 years of generation.
        assert_eq!(
            projection.lcoe_r_per_kwh,
            Some(dec!(2500) / (dec!(9000) * dec!(20)))
        );
    }

    #[test]
    fn escalation_and_degradation_compound() {
        let params = ProjectionParams::default();
        let projection = project(dec!(1000), dec!(10000), dec!(9000), &params);
        let growth = (Decimal::ONE + params.escalation) * (Decimal::ONE - params.degradation);
        assert_eq!(projection.yearly_savings[0].savings, dec!(1000));
        assert_eq!(projection.yearly_savings[1].savings, dec!(1000) * growth);
        assert_eq!(
            projection.yearly_savings[2].savings,
            dec!(1000) * growth * growth
        );
    }

    #[test]
    fn zero_savings_never_pays_back() {
        let projection = project(Decimal::ZERO, dec!(5000), dec!(9000), &ProjectionParams::default());
        assert_eq!(projection.payback_years, None);
        // ROI is still defined: everything is lost.
        assert_eq!(projection.roi_percent, Some(dec!(-100)));
    }

    #[test]
    fn zero_capital_yields_sentinels() {
        let projection = project(dec!(1000), Decimal::ZERO, dec!(9000), &ProjectionParams::default());
        assert_eq!(projection.payback_years, None);
        assert_eq!(projection.roi_percent, None);
    }

    #[test]
    fn zero_generation_has_no_lcoe() {
        let projection = project(dec!(1000), dec!(5000), Decimal::ZERO, &ProjectionParams::default());
        assert_eq!(projection.lcoe_r_per_kwh, None);
    }

    #[test]
    fn cashflow_stays_nonnegative_after_payback() {
        let projection = project(dec!(800), dec!(6000), dec!(9000), &ProjectionParams::default());
        let crossing = projection
            .lifetime_cashflow
            .iter()
            .position(|p| p.cashflow >= Decimal::ZERO)
            .expect("positive savings must eventually pay back");
        for point in &projection.lifetime_cashflow[crossing..] {
            assert!(point.cashflow >= Decimal::ZERO);
        }
    }
}
