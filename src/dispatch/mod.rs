//! Dispatch simulation: per-interval energy flows between PV generation,
//! demand, battery storage, and the grid.

pub mod simulator;
pub mod trace;

pub use simulator::{IntervalState, simulate, simulate_observed};
pub use trace::DispatchTrace;
