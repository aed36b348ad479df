//! State management for the cardiac simulation.
//!
//! Contains the simulation session, its bounded voltage trace and the
//! metrics snapshot derived from them.

mod metrics;
mod session;
mod trace;

pub use metrics::{ActiveDrug, SessionMetrics, SignalAnalysis};
pub use session::SimulationSession;
pub use trace::{SimulationSample, Trace};
