//! Piecewise analytic cardiac action potential.
//!
//! Membrane voltage within one stimulation cycle (τ = time in cycle, ms):
//!
//! - Phase 0: V = Vr + (Vo - Vr)(1 - exp(-k·τ)), k = 5·Na ms⁻¹
//! - Phase 1: V = Vo·Na - 5·(τ - 2)
//! - Phase 2: V = P + (Vo·Na - P - 25)·exp(-(τ - 7)/100), P = 10·Ca
//! - Phase 3: V = P + (Vr - P)(1 - exp(-(τ - τp)/τ3))
//! - Phase 4: V = Vr
//!
//! where Na and Ca are channel conductance multipliers from drug block and
//! τp, τ3 come from [`PhaseTiming`].
//!
//! This is a phenomenological shape model, not an ionic-current model: it
//! reproduces the qualitative effect of Na+ block on the upstroke and Ca2+
//! block on the plateau.
//!
//! References:
//! - Nerbonne JM, Kass RS. Physiol Rev. 2005;85:1205-1253
//! - Grant AO. Circ Arrhythm Electrophysiol. 2009;2:185-194

use serde::{Deserialize, Serialize};

use super::cell::{CellParameters, CellType};
use super::phase::{Phase, PhaseTiming, PHASE0_END_MS, PHASE1_END_MS};
use crate::error::{Result, SimulationError};
use crate::pharmacology::{ChannelBlock, DrugState};

/// Unblocked phase 0 rate constant (ms⁻¹)
const PHASE0_RATE_PER_MS: f64 = 5.0;

/// Phase 1 repolarization slope (mV/ms)
const PHASE1_SLOPE_MV_PER_MS: f64 = 5.0;

/// Unblocked plateau level (mV)
const PLATEAU_LEVEL_MV: f64 = 10.0;

/// Notch depth below the sodium-scaled overshoot at plateau onset (mV)
const PLATEAU_ONSET_DROP_MV: f64 = 25.0;

/// Plateau decay time constant (ms)
const PLATEAU_TAU_MS: f64 = 100.0;

/// One evaluated point of the action potential
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionPotentialPoint {
    /// Membrane voltage rounded to 0.1 mV
    pub voltage_mV: f64,
    /// Phase at this point in the cycle
    pub phase: Phase,
}

/// Action potential shape for one cell type under a fixed channel block
///
/// Construction validates the drug state; evaluation itself cannot fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionPotentialModel {
    pub params: CellParameters,
    pub timing: PhaseTiming,
    pub block: ChannelBlock,
}

impl ActionPotentialModel {
    /// Model for a cell type with the given drugs applied
    pub fn new(cell_type: CellType, drugs: &DrugState) -> Result<Self> {
        drugs.validate()?;
        Ok(Self::with_block(cell_type.parameters(), drugs.channel_block()))
    }

    /// Model from explicit parameters and block
    pub fn with_block(params: CellParameters, block: ChannelBlock) -> Self {
        Self {
            params,
            timing: PhaseTiming::for_cell(&params),
            block,
        }
    }

    /// Phase 0 rate constant after Na+ block (ms⁻¹)
    pub fn phase0_rate_per_ms(&self) -> f64 {
        PHASE0_RATE_PER_MS * self.block.sodium
    }

    /// Maximum upstroke velocity, dV/dt at τ = 0 (mV/ms)
    pub fn max_upstroke_velocity_mV_per_ms(&self) -> f64 {
        self.params.amplitude_mV() * self.phase0_rate_per_ms()
    }

    /// Voltage the plateau relaxes toward after Ca2+ block (mV)
    pub fn plateau_level_mV(&self) -> f64 {
        PLATEAU_LEVEL_MV * self.block.calcium
    }

    /// Peak reached by the end of phase 0 after Na+ block (mV)
    pub fn scaled_overshoot_mV(&self) -> f64 {
        self.params.overshoot_peak_mV * self.block.sodium
    }

    /// Unrounded voltage at a position within the cycle (mV)
    pub fn voltage_at(&self, time_in_cycle_ms: f64) -> f64 {
        let rest = self.params.resting_potential_mV;
        let plateau = self.plateau_level_mV();
        let tau = time_in_cycle_ms;

        match Phase::at(tau, &self.timing) {
            Phase::Phase0 => {
                let k = self.phase0_rate_per_ms();
                rest + self.params.amplitude_mV() * (1.0 - (-tau * k).exp())
            }
            Phase::Phase1 => {
                self.scaled_overshoot_mV() - PHASE1_SLOPE_MV_PER_MS * (tau - PHASE0_END_MS)
            }
            Phase::Phase2 => {
                let decay = (-(tau - PHASE1_END_MS) / PLATEAU_TAU_MS).exp();
                plateau
                    + (self.scaled_overshoot_mV() - plateau - PLATEAU_ONSET_DROP_MV) * decay
            }
            Phase::Phase3 => {
                let t3 = tau - self.timing.plateau_end_ms;
                let approach = 1.0 - (-t3 / self.timing.repolarization_tau_ms).exp();
                plateau + (rest - plateau) * approach
            }
            Phase::Phase4 => rest,
        }
    }

    /// Rounded voltage and phase at a position within the cycle
    pub fn point_at(&self, time_in_cycle_ms: f64) -> ActionPotentialPoint {
        ActionPotentialPoint {
            voltage_mV: round_to_tenth(self.voltage_at(time_in_cycle_ms)),
            phase: Phase::at(time_in_cycle_ms, &self.timing),
        }
    }
}

/// Evaluate membrane voltage at simulation time `t_ms`
///
/// Rejects negative or non-finite times, non-positive stimulation rates and
/// invalid drug concentrations.
pub fn evaluate(
    t_ms: f64,
    cell_type: CellType,
    stimulation_rate_hz: f64,
    drugs: &DrugState,
) -> Result<ActionPotentialPoint> {
    let tau = time_in_cycle_ms(t_ms, stimulation_rate_hz)?;
    let model = ActionPotentialModel::new(cell_type, drugs)?;
    Ok(model.point_at(tau))
}

/// Cycle length for a stimulation rate (ms)
pub fn cycle_length_ms(stimulation_rate_hz: f64) -> Result<f64> {
    if !stimulation_rate_hz.is_finite() || stimulation_rate_hz <= 0.0 {
        return Err(SimulationError::InvalidStimulationRate(stimulation_rate_hz));
    }
    Ok(1000.0 / stimulation_rate_hz)
}

/// Position of `t_ms` within its stimulation cycle (ms)
pub fn time_in_cycle_ms(t_ms: f64, stimulation_rate_hz: f64) -> Result<f64> {
    if !t_ms.is_finite() || t_ms < 0.0 {
        return Err(SimulationError::InvalidTime(t_ms));
    }
    Ok(t_ms % cycle_length_ms(stimulation_rate_hz)?)
}

/// Whether `t_ms` falls inside the stimulus pulse at the start of a cycle
pub fn is_stimulus_window(t_ms: f64, stimulation_rate_hz: f64, window_ms: f64) -> Result<bool> {
    Ok(time_in_cycle_ms(t_ms, stimulation_rate_hz)? < window_ms)
}

fn round_to_tenth(voltage_mV: f64) -> f64 {
    (voltage_mV * 10.0).round() / 10.0
}
