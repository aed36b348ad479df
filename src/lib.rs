//! Cardio Sim - cardiac action potential simulation engine
//!
//! This library models the membrane voltage of a paced cardiomyocyte with a
//! piecewise phase model, modulated by Hill-equation channel block from
//! TTX, verapamil and diltiazem, and drives it from a cancellable tick loop
//! into a bounded trace.

// Allow non-snake-case for unit suffixes in field names (mV, uM, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod config;
pub mod electrophysiology;
pub mod error;
pub mod export;
pub mod pharmacology;
pub mod scheduler;
pub mod state;

pub use config::{Parameters, SessionParameters};
pub use electrophysiology::{
    evaluate, ActionPotentialModel, ActionPotentialPoint, CellParameters, CellType, Phase,
    PhaseTiming,
};
pub use error::{Result, SimulationError};
pub use pharmacology::{hill_fraction, ChannelBlock, Drug, DrugDose, DrugModel, DrugState};
pub use scheduler::{RunId, Tick, TickScheduler};
pub use state::{SessionMetrics, SignalAnalysis, SimulationSample, SimulationSession, Trace};
