//! Dispatch trace: the simulator's aligned output sequences.

use chrono::NaiveDateTime;

/// Five aligned sequences describing the simulated year, one entry per
/// half-hour interval. Produced once by the simulator and read-only from
/// then on.
#[derive(Debug, Clone)]
pub struct DispatchTrace {
    pub timestamps: Vec<NaiveDateTime>,
    /// Generation after inverter clipping (kW).
    pub clipped_generation_kw: Vec<f64>,
    /// Battery state of charge after the interval (0–100 %).
    pub battery_soc_percent: Vec<f64>,
    /// Grid import (kW, >= 0).
    pub import_kw: Vec<f64>,
    /// Grid export (kW, >= 0).
    pub export_kw: Vec<f64>,
}

impl DispatchTrace {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
