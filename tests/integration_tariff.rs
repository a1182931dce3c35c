//! Tariff resolution end to end: calendar slots, component summation, and
//! seasonal bill differences through the full pipeline.

mod common;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::dec;
use solar_econ::finance::ProjectionParams;
use solar_econ::oracle::Site;
use solar_econ::runner::{RunOptions, run};
use solar_econ::system::SystemConfig;
use solar_econ::tariff::{
    RateComponent, RateUnit, Season, TariffDefinition, TariffEngine, TouBlock, resolve_slot,
};

use common::{constant_demand_year, midday_oracle};

fn at(mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

/// Megaflex-style time-of-use tariff with ancillary riders.
fn tou_tariff() -> TariffDefinition {
    TariffDefinition::new(
        "tou",
        vec![
            RateComponent::energy_slot(
                "high_peak",
                Season::High,
                TouBlock::Peak,
                RateUnit::CentPerKwh,
                dec!(689.90),
            ),
            RateComponent::energy_slot(
                "high_standard",
                Season::High,
                TouBlock::Standard,
                RateUnit::CentPerKwh,
                dec!(209.80),
            ),
            RateComponent::energy_slot(
                "high_offpeak",
                Season::High,
                TouBlock::OffPeak,
                RateUnit::CentPerKwh,
                dec!(113.80),
            ),
            RateComponent::energy_slot(
                "low_peak",
                Season::Low,
                TouBlock::Peak,
                RateUnit::CentPerKwh,
                dec!(225.00),
            ),
            RateComponent::energy_slot(
                "low_standard",
                Season::Low,
                TouBlock::Standard,
                RateUnit::CentPerKwh,
                dec!(154.90),
            ),
            RateComponent::energy_slot(
                "low_offpeak",
                Season::Low,
                TouBlock::OffPeak,
                RateUnit::CentPerKwh,
                dec!(98.50),
            ),
            RateComponent::ancillary_energy("ancillary", RateUnit::CentPerKwh, dec!(0.90)),
            RateComponent::ancillary_energy("network_demand", RateUnit::CentPerKwh, dec!(108.30)),
            RateComponent::fixed_daily("service_charge", dec!(9.44)),
        ],
    )
}

#[test]
fn winter_weekday_morning_is_high_peak() {
    // Monday 2025-07-07 07:30.
    assert_eq!(resolve_slot(at(7, 7, 7, 30)), (Season::High, TouBlock::Peak));
    let engine = TariffEngine::new(&tou_tariff()).unwrap();
    assert_eq!(engine.energy_rate_r_per_kwh(at(7, 7, 7, 30)), dec!(7.9910));
}

#[test]
fn winter_weekend_mornings_are_standard() {
    // Saturday 2025-07-05 08:00 and Sunday 2025-07-06 17:30.
    assert_eq!(
        resolve_slot(at(7, 5, 8, 0)),
        (Season::High, TouBlock::Standard)
    );
    assert_eq!(
        resolve_slot(at(7, 6, 17, 30)),
        (Season::High, TouBlock::Standard)
    );
    let engine = TariffEngine::new(&tou_tariff()).unwrap();
    let expected = dec!(2.0980) + dec!(0.0090) + dec!(1.0830);
    assert_eq!(engine.energy_rate_r_per_kwh(at(7, 5, 8, 0)), expected);
    assert_eq!(engine.energy_rate_r_per_kwh(at(7, 6, 17, 30)), expected);
}

#[test]
fn summer_sunday_night_is_low_offpeak() {
    // Sunday 2025-04-06 21:30.
    assert_eq!(
        resolve_slot(at(4, 6, 21, 30)),
        (Season::Low, TouBlock::OffPeak)
    );
    let engine = TariffEngine::new(&tou_tariff()).unwrap();
    assert_eq!(
        engine.energy_rate_r_per_kwh(at(4, 6, 21, 30)),
        dec!(0.9850) + dec!(0.0090) + dec!(1.0830)
    );
}

#[test]
fn high_season_months_bill_more_than_low_season() {
    let demand = constant_demand_year(2.0);
    let oracle = midday_oracle();
    let system = SystemConfig::grid_tied(0.0, 0.0);
    let report = run(
        &demand,
        &system,
        &tou_tariff(),
        dec!(1000),
        &RunOptions {
            oracle: &oracle,
            site: Site::new(-26.2, 28.0, 2.0),
            projection: ProjectionParams::default(),
        },
    )
    .unwrap();

    let cost = |month: u32| {
        report
            .cost_comparison
            .iter()
            .find(|m| m.month == month)
            .map(|m| m.old_cost)
            .unwrap()
    };
    // July (high season, 31 days) must out-bill May (low season, 31 days).
    assert!(cost(7) > cost(5));
    // April and September share day counts and season; same demand, same
    // bill.
    assert_eq!(cost(4), cost(9));
}
