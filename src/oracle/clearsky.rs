//! Clear-sky physical generation model.
//!
//! Pipeline, per timestamp:
//!   1. solar geometry — Spencer declination, equation of time, hour
//!      angle, elevation, azimuth
//!   2. extraterrestrial irradiance with eccentricity correction
//!   3. simplified Bird & Hulstrom clear-sky DNI/DHI/GHI
//!   4. fixed-tilt transposition (isotropic sky, 0.20 ground albedo)
//!   5. SAPM cell temperature, open-rack glass/glass parameters
//!   6. DC power with a linear −0.4 %/°C temperature coefficient
//!
//! Angle-of-incidence, spectral, soiling, and wiring losses are all
//! disabled; derating is the consumer's responsibility.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDateTime, Timelike};

use super::{ArrayOrientation, GenerationOracle, MAX_LATITUDE_DEG, Site, check_half_hour_alignment};
use crate::error::CoreError;

/// Solar constant, W/m².
const SOLAR_CONSTANT: f64 = 1361.0;
const DEG: f64 = PI / 180.0;

/// SAPM open-rack glass/glass module parameters.
const SAPM_A: f64 = -3.47;
const SAPM_B: f64 = -0.0594;
const SAPM_DELTA_T: f64 = 3.0;
/// Assumed steady wind speed, m/s.
const WIND_M_S: f64 = 1.0;

/// DC power temperature coefficient, per °C.
const TEMP_COEFF_PER_C: f64 = -0.004;

/// Clear-sky oracle over a fixed single array.
#[derive(Debug, Clone, Default)]
pub struct ClearSkyOracle {
    /// Array orientation; defaults to equator-facing at latitude tilt.
    pub orientation: Option<ArrayOrientation>,
}

impl ClearSkyOracle {
    pub fn new() -> Self {
        Self { orientation: None }
    }

    pub fn with_orientation(orientation: ArrayOrientation) -> Self {
        Self {
            orientation: Some(orientation),
        }
    }
}

impl GenerationOracle for ClearSkyOracle {
    fn generate(
        &self,
        site: &Site,
        capacity_kw: f64,
        timestamps: &[NaiveDateTime],
    ) -> Result<Vec<f64>, CoreError> {
        if site.latitude_deg.abs() > MAX_LATITUDE_DEG {
            return Err(CoreError::UnsupportedLatitude(
                site.latitude_deg,
                MAX_LATITUDE_DEG,
            ));
        }
        check_half_hour_alignment(timestamps)?;

        let orientation = self
            .orientation
            .unwrap_or_else(|| ArrayOrientation::default_for(site));

        Ok(timestamps
            .iter()
            .map(|&ts| capacity_kw * unit_power_kw(site, &orientation, ts))
            .collect())
    }
}

/// AC kilowatts per installed kWp at one instant.
fn unit_power_kw(site: &Site, orientation: &ArrayOrientation, ts: NaiveDateTime) -> f64 {
    let doy = f64::from(ts.ordinal());
    let local_hour =
        f64::from(ts.hour()) + f64::from(ts.minute()) / 60.0 + f64::from(ts.second()) / 3600.0;
    let ut_hour = (local_hour - site.utc_offset_hours).rem_euclid(24.0);

    // Solar geometry (Spencer 1971).
    let b = 2.0 * PI * (doy - 1.0) / 365.0;
    let decl = 0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
        + 0.000907 * (2.0 * b).sin()
        - 0.002697 * (3.0 * b).cos()
        + 0.00148 * (3.0 * b).sin();
    let eot_min = 229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.04089 * (2.0 * b).sin());

    // Local solar time from longitude and equation of time.
    let solar_time_h = (ut_hour + site.longitude_deg / 15.0 + eot_min / 60.0).rem_euclid(24.0);
    let omega = (15.0 * (solar_time_h - 12.0)) * DEG;

    let lat = site.latitude_deg * DEG;
    let sin_elev = lat.sin() * decl.sin() + lat.cos() * decl.cos() * omega.cos();
    let elev = sin_elev.asin();
    let elev_deg = elev / DEG;
    if elev_deg <= 0.1 {
        return 0.0;
    }

    // Solar azimuth, degrees clockwise from north.
    let cos_az = if elev.cos().abs() > 1e-9 {
        ((decl.sin() - sin_elev * lat.sin()) / (elev.cos() * lat.cos())).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let az_abs_deg = cos_az.acos() / DEG;
    let sun_azimuth_deg = if omega > 0.0 { 360.0 - az_abs_deg } else { az_abs_deg };

    // Extraterrestrial irradiance with eccentricity correction.
    let e0 = SOLAR_CONSTANT
        * (1.00011 + 0.034221 * b.cos() + 0.00128 * b.sin() + 0.000719 * (2.0 * b).cos()
            + 0.000077 * (2.0 * b).sin());

    // Clear-sky transmittances (simplified Bird & Hulstrom). Air mass per
    // Kasten & Young (1989).
    let air_mass =
        (1.0 / (sin_elev + 0.50572 * (elev_deg + 6.07995_f64).powf(-1.6364))).max(1.0);
    let t_rayleigh =
        (-0.0903 * air_mass.powf(0.84) * (1.0 + air_mass - air_mass.powf(1.01))).exp();
    let t_ozone = 1.0 - 0.0013 * air_mass;
    // Linke turbidity 3.0, typical continental.
    let t_aerosol = (-0.09 * 3.0_f64.powf(0.978) * air_mass.powf(0.9455)).exp();
    let t_water = 1.0 - 0.0075 * air_mass.powf(0.65);
    let total_t = t_rayleigh * t_ozone * t_aerosol * t_water;

    let dni = 0.9762 * e0 * total_t;
    let dhi = (0.79 * e0 * sin_elev * (1.0 - total_t) * (0.5 * (1.0 - t_rayleigh) + 0.1))
        / (1.0 - air_mass + air_mass.powf(1.02));
    let ghi = (dni * sin_elev + dhi).max(0.0);

    // Transposition onto the tilted plane.
    let tilt = orientation.tilt_deg * DEG;
    let az_diff = (sun_azimuth_deg - orientation.azimuth_deg) * DEG;
    let cos_incidence = (elev.sin() * tilt.cos() + elev.cos() * tilt.sin() * az_diff.cos()).max(0.0);

    let beam_poa = dni * cos_incidence;
    let diffuse_poa = dhi.max(0.0) * (1.0 + tilt.cos()) / 2.0;
    let reflected_poa = ghi * 0.20 * (1.0 - tilt.cos()) / 2.0;
    let poa = (beam_poa + diffuse_poa + reflected_poa).max(0.0);

    // SAPM cell temperature over a seasonal/diurnal ambient model.
    let ambient_c = ambient_temperature_c(site.latitude_deg, doy, solar_time_h);
    let cell_c = poa * (SAPM_A + SAPM_B * WIND_M_S).exp() + ambient_c + poa / 1000.0 * SAPM_DELTA_T;

    // 1 kWp delivers 1 kW DC at 1000 W/m² and 25 °C cell temperature.
    let temp_factor = 1.0 + TEMP_COEFF_PER_C * (cell_c - 25.0);
    (poa / 1000.0 * temp_factor).max(0.0)
}

/// Coarse climatological ambient temperature: latitude base, seasonal
/// swing, diurnal cycle peaking mid-afternoon.
fn ambient_temperature_c(latitude_deg: f64, doy: f64, solar_time_h: f64) -> f64 {
    let base = 27.0 - 0.25 * latitude_deg.abs();
    // Seasonal phase flips across the equator; peak near day 200 in the
    // northern hemisphere, day 20 in the southern.
    let seasonal_peak_doy = if latitude_deg >= 0.0 { 200.0 } else { 20.0 };
    let seasonal =
        8.0 * (2.0 * PI * (doy - seasonal_peak_doy) / 365.0).cos() * (latitude_deg.abs() / 45.0);
    let diurnal = 5.0 * (2.0 * PI * (solar_time_h - 15.0) / 24.0).cos();
    base + seasonal + diurnal
}
