//! Named-profile generation oracle.
//!
//! A registry maps profile names to prerecorded unit-capacity (1 kW)
//! generation shapes covering a full year; generation is the shape scaled
//! by installed capacity. Profiles make runs deterministic without an
//! ephemeris, which is also how the test suite drives the simulator.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike};

use super::{GenerationOracle, Site, check_half_hour_alignment};
use crate::error::CoreError;
use crate::series::INTERVALS_PER_YEAR;

/// Built-in profile: 1 kW per kWp during [10:00, 15:00), zero elsewhere.
pub const UNIFORM_MIDDAY: &str = "uniform_midday";

/// Generation oracle backed by a registry of named year shapes.
#[derive(Debug, Clone)]
pub struct ProfileOracle {
    profile: String,
    shapes: HashMap<String, Vec<f64>>,
}

impl ProfileOracle {
    /// Selects a profile by name. The built-in registry carries
    /// [`UNIFORM_MIDDAY`]; more shapes can be added with [`register`].
    ///
    /// [`register`]: ProfileOracle::register
    pub fn new(profile: &str) -> Self {
        let mut shapes = HashMap::new();
        shapes.insert(UNIFORM_MIDDAY.to_owned(), uniform_midday_shape());
        Self {
            profile: profile.to_owned(),
            shapes,
        }
    }

    /// Registers a unit-capacity year shape (17,520 samples) under a name.
    pub fn register(&mut self, name: &str, shape: Vec<f64>) -> Result<(), CoreError> {
        if shape.len() != INTERVALS_PER_YEAR {
            return Err(CoreError::ShapeMismatch(format!(
                "profile `{name}` has {} samples, expected {INTERVALS_PER_YEAR}",
                shape.len()
            )));
        }
        self.shapes.insert(name.to_owned(), shape);
        Ok(())
    }
}

impl GenerationOracle for ProfileOracle {
    fn generate(
        &self,
        _site: &Site,
        capacity_kw: f64,
        timestamps: &[NaiveDateTime],
    ) -> Result<Vec<f64>, CoreError> {
        check_half_hour_alignment(timestamps)?;
        let shape = self
            .shapes
            .get(&self.profile)
            .ok_or_else(|| CoreError::UnknownProfile(self.profile.clone()))?;

        Ok(timestamps
            .iter()
            .map(|&ts| capacity_kw * shape[shape_index(ts)])
            .collect())
    }
}

/// Index of a timestamp into a year shape: day-of-year (clamped to 365)
/// times 48 half-hours plus the half-hour of day.
fn shape_index(ts: NaiveDateTime) -> usize {
    let day = (ts.ordinal0() as usize).min(364);
    let slot = (ts.hour() * 2 + ts.minute() / 30) as usize;
    day * 48 + slot
}

fn uniform_midday_shape() -> Vec<f64> {
    let mut shape = vec![0.0; INTERVALS_PER_YEAR];
    for day in 0..365 {
        for slot in 20..30 {
            // 10:00 through 14:30 inclusive
            shape[day * 48 + slot] = 1.0;
        }
    }
    shape
}
