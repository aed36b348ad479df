//! Action potential phases and their timing.
//!
//! Phase 0 and 1 have fixed durations. The plateau and repolarization
//! windows scale with the cell's APD90 so that phase 4 always starts at
//! APD90: the plateau ends at 2/3 APD90 and repolarization fills the rest.
//! For a ventricular cell (APD90 = 300 ms) this gives the classic
//! 2 / 7 / 200 / 300 ms boundaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::CellParameters;

/// End of the Na+ upstroke (ms into the cycle)
pub const PHASE0_END_MS: f64 = 2.0;

/// End of the transient outward K+ notch (ms into the cycle)
pub const PHASE1_END_MS: f64 = 7.0;

/// Phase 3 time constant as a fraction of the repolarization window
const REPOLARIZATION_TAU_FRACTION: f64 = 0.3;

/// Conventional five-stage decomposition of a cardiac action potential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Rapid depolarization (Na+ influx)
    Phase0,
    /// Initial repolarization (transient K+ efflux)
    Phase1,
    /// Plateau (Ca2+ influx balanced by K+ efflux)
    Phase2,
    /// Repolarization (delayed rectifier K+ efflux)
    Phase3,
    /// Diastolic rest
    Phase4,
}

impl Phase {
    /// Phase at a position within the cycle
    pub fn at(time_in_cycle_ms: f64, timing: &PhaseTiming) -> Self {
        if time_in_cycle_ms <= PHASE0_END_MS {
            Phase::Phase0
        } else if time_in_cycle_ms <= PHASE1_END_MS {
            Phase::Phase1
        } else if time_in_cycle_ms <= timing.plateau_end_ms {
            Phase::Phase2
        } else if time_in_cycle_ms <= timing.repolarization_end_ms {
            Phase::Phase3
        } else {
            Phase::Phase4
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Phase::Phase0 => 0,
            Phase::Phase1 => 1,
            Phase::Phase2 => 2,
            Phase::Phase3 => 3,
            Phase::Phase4 => 4,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::Phase0 => "Depolarization",
            Phase::Phase1 => "Initial repolarization",
            Phase::Phase2 => "Plateau",
            Phase::Phase3 => "Repolarization",
            Phase::Phase4 => "Rest",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {} ({})", self.number(), self.description())
    }
}

/// Phase boundaries for one cell type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    /// End of phase 2 (ms into the cycle)
    pub plateau_end_ms: f64,
    /// End of phase 3, equal to APD90 (ms into the cycle)
    pub repolarization_end_ms: f64,
    /// Exponential time constant of phase 3 (ms)
    pub repolarization_tau_ms: f64,
}

impl PhaseTiming {
    pub fn for_cell(params: &CellParameters) -> Self {
        // Multiply first so 300 ms lands exactly on 200 ms
        let plateau_end_ms = params.apd90_ms * 2.0 / 3.0;
        let repolarization_end_ms = params.apd90_ms;
        Self {
            plateau_end_ms,
            repolarization_end_ms,
            repolarization_tau_ms: REPOLARIZATION_TAU_FRACTION
                * (repolarization_end_ms - plateau_end_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::electrophysiology::CellType;

    #[test]
    fn test_ventricular_timing_matches_classic_boundaries() {
        let timing = PhaseTiming::for_cell(&CellType::Ventricular.parameters());
        assert_eq!(timing.plateau_end_ms, 200.0);
        assert_eq!(timing.repolarization_end_ms, 300.0);
        assert!((timing.repolarization_tau_ms - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_boundaries() {
        let timing = PhaseTiming::for_cell(&CellType::Ventricular.parameters());
        assert_eq!(Phase::at(0.0, &timing), Phase::Phase0);
        assert_eq!(Phase::at(2.0, &timing), Phase::Phase0);
        assert_eq!(Phase::at(2.1, &timing), Phase::Phase1);
        assert_eq!(Phase::at(7.0, &timing), Phase::Phase1);
        assert_eq!(Phase::at(100.0, &timing), Phase::Phase2);
        assert_eq!(Phase::at(200.0, &timing), Phase::Phase2);
        assert_eq!(Phase::at(250.0, &timing), Phase::Phase3);
        assert_eq!(Phase::at(300.0, &timing), Phase::Phase3);
        assert_eq!(Phase::at(300.5, &timing), Phase::Phase4);
    }

    #[test]
    fn test_atrial_repolarizes_at_its_own_apd90() {
        let timing = PhaseTiming::for_cell(&CellType::Atrial.parameters());
        assert_eq!(Phase::at(150.0, &timing), Phase::Phase3);
        assert_eq!(Phase::at(250.0, &timing), Phase::Phase4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::Phase2.to_string(), "Phase 2 (Plateau)");
    }
}
