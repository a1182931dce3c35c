//! Proposed PV + battery system description.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Grid connection topology of the proposed system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// No battery dispatch; shortfall is always imported.
    GridTied,
    /// Battery present; charges from surplus, discharges to demand.
    Hybrid,
    /// No import, no export. Import in the trace is an infeasibility
    /// signal for the caller.
    OffGrid,
}

/// Placeholder symmetric round-trip efficiency factor. Deliberately coarse;
/// tunable per system via [`SystemConfig::round_trip_efficiency`].
pub const DEFAULT_ROUND_TRIP_EFFICIENCY: f64 = 0.5;

/// Capacity declarations and topology for one candidate system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Installed DC capacity (kWp).
    pub panel_kw: f64,
    /// Inverter AC throughput cap (kVA).
    pub inverter_kva: f64,
    /// Usable battery capacity (kWh); 0 if none.
    pub battery_kwh: f64,
    pub topology: Topology,
    /// Whether surplus may be exported to the grid.
    pub allow_export: bool,
    /// Array tilt from horizontal (degrees).
    pub tilt_deg: Option<f64>,
    /// Array azimuth (degrees from north, clockwise).
    pub azimuth_deg: Option<f64>,
    /// Symmetric battery round-trip efficiency factor applied to charge
    /// and discharge alike.
    #[serde(default = "default_round_trip")]
    pub round_trip_efficiency: f64,
}

fn default_round_trip() -> f64 {
    DEFAULT_ROUND_TRIP_EFFICIENCY
}

impl SystemConfig {
    /// A grid-tied system with no battery and no export.
    pub fn grid_tied(panel_kw: f64, inverter_kva: f64) -> Self {
        Self {
            panel_kw,
            inverter_kva,
            battery_kwh: 0.0,
            topology: Topology::GridTied,
            allow_export: false,
            tilt_deg: None,
            azimuth_deg: None,
            round_trip_efficiency: DEFAULT_ROUND_TRIP_EFFICIENCY,
        }
    }

    /// Rejects negative capacities or an out-of-range efficiency factor.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.panel_kw < 0.0 || !self.panel_kw.is_finite() {
            return Err(CoreError::InvalidSystem(format!(
                "panel_kw must be >= 0, got {}",
                self.panel_kw
            )));
        }
        if self.inverter_kva < 0.0 || !self.inverter_kva.is_finite() {
            return Err(CoreError::InvalidSystem(format!(
                "inverter_kva must be >= 0, got {}",
                self.inverter_kva
            )));
        }
        if self.battery_kwh < 0.0 || !self.battery_kwh.is_finite() {
            return Err(CoreError::InvalidSystem(format!(
                "battery_kwh must be >= 0, got {}",
                self.battery_kwh
            )));
        }
        if !(0.0..=1.0).contains(&self.round_trip_efficiency) {
            return Err(CoreError::InvalidSystem(format!(
                "round_trip_efficiency must be in [0, 1], got {}",
                self.round_trip_efficiency
            )));
        }
        Ok(())
    }

    /// Whether the battery takes part in dispatch for this topology.
    pub fn battery_active(&self) -> bool {
        self.battery_kwh > 0.0 && matches!(self.topology, Topology::Hybrid | Topology::OffGrid)
    }
}
