//! Cardiomyocyte electrophysiology.
//!
//! Cell parameter tables, phase timing and the action potential phase model.

mod action_potential;
mod cell;
mod phase;

pub use action_potential::{
    cycle_length_ms, evaluate, is_stimulus_window, time_in_cycle_ms, ActionPotentialModel,
    ActionPotentialPoint,
};
pub use cell::{CellParameters, CellType};
pub use phase::{Phase, PhaseTiming, PHASE0_END_MS, PHASE1_END_MS};
