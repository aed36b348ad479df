//! Error types for the simulation core.
//!
//! All failures here are local validation errors raised at the input
//! boundary, before anything reaches the phase model.

use thiserror::Error;

/// Domain error for cardiac simulation inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Drug concentration below zero
    #[error("negative concentration for {drug}: {value} μM")]
    NegativeConcentration { drug: &'static str, value: f64 },

    /// Drug concentration is NaN or infinite
    #[error("non-finite concentration for {drug}")]
    NonFiniteConcentration { drug: &'static str },

    /// Stimulation rate must be finite and strictly positive
    #[error("invalid stimulation rate: {0} Hz (must be > 0)")]
    InvalidStimulationRate(f64),

    /// Simulation time must be finite and non-negative
    #[error("invalid simulation time: {0} ms")]
    InvalidTime(f64),

    /// Speed multiplier must be finite and strictly positive
    #[error("invalid simulation speed: {0}x")]
    InvalidSpeed(f64),

    /// Trace capacity or analysis window of zero
    #[error("invalid capacity: {0}")]
    InvalidCapacity(usize),

    /// Cell type name outside the closed table
    #[error("unknown cell type: {0}")]
    UnknownCellType(String),

    /// Drug name outside the closed table
    #[error("unknown drug: {0}")]
    UnknownDrug(String),

    /// Malformed `NAME=CONCENTRATION` drug spec
    #[error("invalid drug spec '{0}' (expected NAME=μM)")]
    InvalidDrugSpec(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
