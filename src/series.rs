//! Half-hourly demand and generation series on a fixed civil-time grid.
//!
//! Both series types validate their shape once at construction and are
//! immutable afterwards. A full evaluation year is 17,520 intervals at
//! exact 30-minute spacing; the constructors here enforce the grid itself
//! (alignment, spacing, monotonicity, non-negative finite values) while
//! the full-year length is checked by [`crate::runner::run`], so component
//! tests can drive short aligned windows.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::error::CoreError;

/// Duration of one interval in hours.
pub const INTERVAL_HOURS: f64 = 0.5;

/// Number of half-hour intervals in a (non-leap) evaluation year.
pub const INTERVALS_PER_YEAR: usize = 17_520;

/// Checks that timestamps sit on :00/:30 boundaries and advance in exact
/// 30-minute steps.
fn validate_grid(timestamps: &[NaiveDateTime]) -> Result<(), CoreError> {
    if timestamps.is_empty() {
        return Err(CoreError::UnalignedTimestamps("empty series".into()));
    }
    let step = TimeDelta::minutes(30);
    for (i, ts) in timestamps.iter().enumerate() {
        if ts.second() != 0 || ts.nanosecond() != 0 || (ts.minute() != 0 && ts.minute() != 30) {
            return Err(CoreError::UnalignedTimestamps(format!(
                "timestamp {ts} at index {i} is not on a 30-minute boundary"
            )));
        }
        if i > 0 && *ts - timestamps[i - 1] != step {
            return Err(CoreError::UnalignedTimestamps(format!(
                "gap between {} and {ts} at index {i}",
                timestamps[i - 1]
            )));
        }
    }
    Ok(())
}

fn validate_values(values: &[f64]) -> Result<(), CoreError> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidSeriesValue { index, value });
        }
    }
    Ok(())
}

/// A building's half-hourly electricity demand in kW.
#[derive(Debug, Clone)]
pub struct DemandSeries {
    timestamps: Vec<NaiveDateTime>,
    values_kw: Vec<f64>,
}

impl DemandSeries {
    /// Builds a demand series, validating the half-hour grid and that all
    /// values are finite and non-negative.
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        values_kw: Vec<f64>,
    ) -> Result<Self, CoreError> {
        if timestamps.len() != values_kw.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "{} timestamps but {} demand values",
                timestamps.len(),
                values_kw.len()
            )));
        }
        validate_grid(&timestamps)?;
        validate_values(&values_kw)?;
        Ok(Self {
            timestamps,
            values_kw,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values_kw(&self) -> &[f64] {
        &self.values_kw
    }
}

/// Pre-clip AC generation in kW, aligned 1:1 with a demand series.
#[derive(Debug, Clone)]
pub struct GenerationSeries {
    timestamps: Vec<NaiveDateTime>,
    values_kw: Vec<f64>,
}

impl GenerationSeries {
    /// Builds a generation series on its own validated grid.
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        values_kw: Vec<f64>,
    ) -> Result<Self, CoreError> {
        if timestamps.len() != values_kw.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "{} timestamps but {} generation values",
                timestamps.len(),
                values_kw.len()
            )));
        }
        validate_grid(&timestamps)?;
        validate_values(&values_kw)?;
        Ok(Self {
            timestamps,
            values_kw,
        })
    }

    /// Builds a generation series aligned with an existing demand series.
    pub fn for_demand(demand: &DemandSeries, values_kw: Vec<f64>) -> Result<Self, CoreError> {
        Self::new(demand.timestamps().to_vec(), values_kw)
    }

    /// Checks 1:1 alignment with a demand series (same length, same
    /// timestamps).
    pub fn check_aligned(&self, demand: &DemandSeries) -> Result<(), CoreError> {
        if self.timestamps.len() != demand.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "generation has {} intervals, demand has {}",
                self.timestamps.len(),
                demand.len()
            )));
        }
        if self.timestamps != demand.timestamps() {
            return Err(CoreError::ShapeMismatch(
                "generation timestamps differ from demand timestamps".into(),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values_kw(&self) -> &[f64] {
        &self.values_kw
    }
}

/// Returns 17,520 contiguous half-hour timestamps starting at midnight on
/// 1 January of the given year. In a leap year the grid ends a day early;
/// the evaluation year is always 365 days.
pub fn year_timestamps(year: i32) -> Vec<NaiveDateTime> {
    use chrono::NaiveDate;

    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap_or_default()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    let step = TimeDelta::minutes(30);
    (0..INTERVALS_PER_YEAR as i64)
        .map(|i| start + step * i as i32)
        .collect()
}

/// Number of days in the given month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn accepts_aligned_series() {
        let stamps = vec![ts(0, 0), ts(0, 30), ts(1, 0)];
        let series = DemandSeries::new(stamps, vec![1.0, 2.0, 0.0]).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn rejects_off_grid_minute() {
        let stamps = vec![ts(0, 0), ts(0, 15)];
        let err = DemandSeries::new(stamps, vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, CoreError::UnalignedTimestamps(_)));
    }

    #[test]
    fn rejects_gap() {
        let stamps = vec![ts(0, 0), ts(1, 0)];
        let err = DemandSeries::new(stamps, vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, CoreError::UnalignedTimestamps(_)));
    }

    #[test]
    fn rejects_negative_demand() {
        let stamps = vec![ts(0, 0), ts(0, 30)];
        let err = DemandSeries::new(stamps, vec![1.0, -0.5]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSeriesValue { index: 1, .. }));
    }

    #[test]
    fn generation_alignment_check() {
        let demand = DemandSeries::new(vec![ts(0, 0), ts(0, 30)], vec![1.0, 1.0]).unwrap();
        let generation = GenerationSeries::for_demand(&demand, vec![0.0, 2.0]).unwrap();
        assert!(generation.check_aligned(&demand).is_ok());

        let other = DemandSeries::new(vec![ts(1, 0), ts(1, 30)], vec![1.0, 1.0]).unwrap();
        assert!(generation.check_aligned(&other).is_err());
    }

    #[test]
    fn year_grid_has_17520_intervals() {
        let stamps = year_timestamps(2025);
        assert_eq!(stamps.len(), INTERVALS_PER_YEAR);
        // Leap year grids are the same length.
        assert_eq!(year_timestamps(2024).len(), INTERVALS_PER_YEAR);
    }

    #[test]
    fn year_grid_is_valid_demand_grid() {
        // 2025 has no leap day, so the grid is contiguous and passes
        // construction end to end.
        let stamps = year_timestamps(2025);
        let values = vec![0.0; stamps.len()];
        assert!(DemandSeries::new(stamps, values).is_ok());
    }
}
