//! Per-interval dispatch state machine.
//!
//! The only cross-interval state is the battery energy in watt-hours.
//! Each interval is otherwise independent and deterministic: clip
//! generation to the inverter, net it against demand, walk the battery,
//! and split the remainder into grid import and export by topology.
//!
//! An off-grid system that would need import to serve demand is not an
//! error here; the gap shows up as demand the trace cannot account for,
//! and callers sweeping candidate systems use it as a rejection signal.

use crate::error::CoreError;
use crate::series::{DemandSeries, GenerationSeries, INTERVAL_HOURS};
use crate::system::{SystemConfig, Topology};

use super::trace::DispatchTrace;

/// Snapshot of one simulated interval, handed to the observer hook.
#[derive(Debug, Clone, Copy)]
pub struct IntervalState {
    pub clipped_generation_kw: f64,
    /// Net AC balance after clipping: generation minus demand (kW).
    pub net_kw: f64,
    pub battery_energy_wh: f64,
    pub battery_soc_percent: f64,
    pub import_kw: f64,
    pub export_kw: f64,
}

/// Simulates energy flows for an aligned demand/generation pair.
pub fn simulate(
    demand: &DemandSeries,
    generation: &GenerationSeries,
    system: &SystemConfig,
) -> Result<DispatchTrace, CoreError> {
    simulate_observed(demand, generation, system, |_, _| {})
}

/// Like [`simulate`], but invokes `observer` with each interval's state as
/// it is produced. The simulator itself retains nothing between runs.
pub fn simulate_observed(
    demand: &DemandSeries,
    generation: &GenerationSeries,
    system: &SystemConfig,
    mut observer: impl FnMut(usize, &IntervalState),
) -> Result<DispatchTrace, CoreError> {
    system.validate()?;
    generation.check_aligned(demand)?;

    let n = demand.len();
    let mut trace = DispatchTrace {
        timestamps: demand.timestamps().to_vec(),
        clipped_generation_kw: Vec::with_capacity(n),
        battery_soc_percent: Vec::with_capacity(n),
        import_kw: Vec::with_capacity(n),
        export_kw: Vec::with_capacity(n),
    };

    let battery_capacity_wh = system.battery_kwh * 1000.0;
    let battery_active = system.battery_active();
    let eta = system.round_trip_efficiency;
    let mut battery_energy_wh = 0.0_f64;

    for (i, (&demand_kw, &gen_raw_kw)) in demand
        .values_kw()
        .iter()
        .zip(generation.values_kw())
        .enumerate()
    {
        let clipped_kw = gen_raw_kw.min(system.inverter_kva);
        let net_kw = clipped_kw - demand_kw;

        if battery_active {
            // Symmetric efficiency factor applied to charge and discharge
            // alike inside the clamp.
            battery_energy_wh = (battery_energy_wh + net_kw * 1000.0 * INTERVAL_HOURS * eta)
                .clamp(0.0, battery_capacity_wh);
        }
        let soc_percent = if battery_capacity_wh > 0.0 {
            battery_energy_wh / battery_capacity_wh * 100.0
        } else {
            0.0
        };

        let import_kw = match system.topology {
            Topology::OffGrid => 0.0,
            Topology::GridTied | Topology::Hybrid => (-net_kw).max(0.0),
        };
        let export_kw = match system.topology {
            Topology::OffGrid => 0.0,
            Topology::GridTied | Topology::Hybrid => {
                if system.allow_export {
                    net_kw.max(0.0)
                } else {
                    0.0
                }
            }
        };

        let state = IntervalState {
            clipped_generation_kw: clipped_kw,
            net_kw,
            battery_energy_wh,
            battery_soc_percent: soc_percent,
            import_kw,
            export_kw,
        };
        observer(i, &state);

        trace.clipped_generation_kw.push(clipped_kw);
        trace.battery_soc_percent.push(soc_percent);
        trace.import_kw.push(import_kw);
        trace.export_kw.push(export_kw);
    }

    Ok(trace)
}
