//! Session metrics for display and export.
//!
//! Aggregates the live readout of a session (current voltage, phase,
//! stimulation) with a short-window signal analysis and the active drug
//! list into one serializable snapshot.

use serde::{Deserialize, Serialize};

use super::trace::SimulationSample;
use crate::electrophysiology::{CellType, Phase};
use crate::pharmacology::{ChannelBlock, Drug};

/// Min/max statistics over the most recent samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalAnalysis {
    /// Number of samples analysed
    pub window: usize,
    /// Minimum voltage (mV)
    pub min_voltage_mV: f64,
    /// Maximum voltage (mV)
    pub max_voltage_mV: f64,
    /// Peak-to-peak amplitude (mV)
    pub amplitude_mV: f64,
    /// Mean voltage (mV)
    pub mean_voltage_mV: f64,
}

impl SignalAnalysis {
    /// Analyse a run of samples; `None` when empty
    pub fn from_samples<'a, I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a SimulationSample>,
    {
        let mut window = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for s in samples {
            window += 1;
            min = min.min(s.voltage_mV);
            max = max.max(s.voltage_mV);
            sum += s.voltage_mV;
        }

        if window == 0 {
            return None;
        }

        Some(Self {
            window,
            min_voltage_mV: min,
            max_voltage_mV: max,
            amplitude_mV: max - min,
            mean_voltage_mV: sum / window as f64,
        })
    }
}

/// An applied drug and its concentration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveDrug {
    pub drug: Drug,
    pub concentration_uM: f64,
}

/// Snapshot of a simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    // === Timing ===
    /// Simulation time (ms)
    pub simulation_time_ms: f64,
    /// Whether the tick loop is running
    pub running: bool,
    /// Samples currently held in the trace
    pub sample_count: usize,

    // === Setup ===
    pub cell_type: CellType,
    /// Pacing rate (Hz)
    pub stimulation_rate_hz: f64,
    /// Simulated ms per tick
    pub speed: f64,

    // === Live readout ===
    /// Latest voltage, or resting potential before the first sample (mV)
    pub voltage_mV: f64,
    /// Whether the latest sample was inside the stimulus pulse
    pub stimulated: bool,
    /// Latest phase, or Phase 4 before the first sample
    pub phase: Phase,
    /// Whether the latest voltage is above threshold
    pub above_threshold: bool,

    // === Pharmacology ===
    pub active_drugs: Vec<ActiveDrug>,
    pub channel_block: ChannelBlock,

    // === Analysis ===
    /// Statistics over the analysis window; `None` with no samples
    pub analysis: Option<SignalAnalysis>,
}

impl SessionMetrics {
    /// Print a formatted summary
    pub fn print_summary(&self) {
        println!("=== Cardiac Action Potential ===");
        println!("Cell type:         {}", self.cell_type);
        println!("Stimulation rate:  {:.2} Hz", self.stimulation_rate_hz);
        println!("Speed:             {:.1}x", self.speed);
        println!("Simulation time:   {:.2} s", self.simulation_time_ms / 1000.0);
        println!("Samples in trace:  {}", self.sample_count);
        println!();
        println!("Membrane potential: {:.1} mV", self.voltage_mV);
        println!("Phase:              {}", self.phase);
        println!(
            "Stimulus:           {}",
            if self.stimulated { "ACTIVE" } else { "inactive" }
        );
        println!();
        println!("Channel block:");
        println!("  Na+ conductance:  {:.3}", self.channel_block.sodium);
        println!("  Ca2+ conductance: {:.3}", self.channel_block.calcium);
        if self.active_drugs.is_empty() {
            println!("  No active drugs");
        } else {
            for d in &self.active_drugs {
                println!("  {}: {} μM", d.drug, d.concentration_uM);
            }
        }
        if let Some(a) = &self.analysis {
            println!();
            println!("Signal analysis (last {} samples):", a.window);
            println!("  Min:        {:.0} mV", a.min_voltage_mV);
            println!("  Max:        {:.0} mV", a.max_voltage_mV);
            println!("  Amplitude:  {:.0} mV", a.amplitude_mV);
        }
    }
}
