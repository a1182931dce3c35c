//! Generation oracle: the abstract provider of pre-clip AC generation.
//!
//! The PV production model is a strict interface. The core never depends
//! on a particular ephemeris implementation; tests drive the simulator
//! through the deterministic named-profile oracle.

pub mod clearsky;
pub mod profile;

pub use clearsky::ClearSkyOracle;
pub use profile::ProfileOracle;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Supported latitude band for the clear-sky model (degrees).
pub const MAX_LATITUDE_DEG: f64 = 66.0;

/// Geographic site of the installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Fixed civil-time offset from UTC in hours (the demand series'
    /// time zone).
    pub utc_offset_hours: f64,
}

impl Site {
    pub fn new(latitude_deg: f64, longitude_deg: f64, utc_offset_hours: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            utc_offset_hours,
        }
    }
}

/// Fixed-array orientation. Defaults pick an equator-facing array tilted
/// at the site latitude.
#[derive(Debug, Clone, Copy)]
pub struct ArrayOrientation {
    /// Tilt from horizontal, degrees.
    pub tilt_deg: f64,
    /// Azimuth, degrees clockwise from north.
    pub azimuth_deg: f64,
}

impl ArrayOrientation {
    /// Equator-facing array tilted at latitude, capped at 60°.
    pub fn default_for(site: &Site) -> Self {
        Self {
            tilt_deg: site.latitude_deg.abs().min(60.0),
            azimuth_deg: if site.latitude_deg >= 0.0 { 180.0 } else { 0.0 },
        }
    }
}

/// Provider of half-hourly pre-clip AC generation in kW.
///
/// Implementations return one value per input timestamp, scaled so that
/// `capacity_kw` of nameplate maps to 1 kW of peak DC output per kW under
/// standard test conditions.
pub trait GenerationOracle {
    fn generate(
        &self,
        site: &Site,
        capacity_kw: f64,
        timestamps: &[NaiveDateTime],
    ) -> Result<Vec<f64>, CoreError>;
}

/// Rejects timestamps off the :00/:30 boundary. Oracles refuse to produce
/// a partial series, so this runs before any computation.
pub(crate) fn check_half_hour_alignment(timestamps: &[NaiveDateTime]) -> Result<(), CoreError> {
    for (i, ts) in timestamps.iter().enumerate() {
        if ts.second() != 0 || (ts.minute() != 0 && ts.minute() != 30) {
            return Err(CoreError::UnalignedTimestamps(format!(
                "timestamp {ts} at index {i} is not on a 30-minute boundary"
            )));
        }
    }
    Ok(())
}
