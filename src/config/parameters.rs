//! Session parameters with JSON loading.
//!
//! Cell and drug tables are compiled in; only simulation settings are
//! loaded from disk.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::electrophysiology::CellType;
use crate::error::{Result, SimulationError};

/// Default parameter file, relative to the working directory
pub const DEFAULT_SESSION_PATH: &str = "data/parameters/session.json";

/// Top-level parameters container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    /// Simulation session settings
    pub session: SessionParameters,
}

impl Parameters {
    /// Load parameters from JSON files, or use defaults if files don't exist
    pub fn load_or_default() -> Self {
        Self {
            session: SessionParameters::load_or_default(DEFAULT_SESSION_PATH),
        }
    }

    /// Load parameters from specific directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            session: SessionParameters::load_or_default(dir.as_ref().join("session.json")),
        }
    }
}

/// Settings for one simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParameters {
    /// Cell type selected at startup
    pub cell_type: CellType,

    /// Pacing rate (Hz)
    /// Reference: 1 Hz ≈ 60 bpm resting heart rate
    pub stimulation_rate_hz: f64,

    /// Simulated milliseconds advanced per tick
    pub speed: f64,

    /// Number of samples kept for charting
    pub trace_capacity: usize,

    /// Minimum wall-clock time between ticks (ms), ~60 FPS
    pub tick_interval_ms: f64,

    /// Duration of the stimulus pulse at the start of each cycle (ms)
    pub stimulus_window_ms: f64,

    /// Number of most recent samples used for signal analysis
    pub analysis_window: usize,
}

impl Default for SessionParameters {
    fn default() -> Self {
        Self {
            cell_type: CellType::Ventricular,
            stimulation_rate_hz: 1.0,
            speed: 1.0,
            trace_capacity: 1000,
            tick_interval_ms: 16.0,
            stimulus_window_ms: 5.0,
            analysis_window: 100,
        }
    }
}

impl SessionParameters {
    /// Load from JSON file or return defaults
    ///
    /// A file that parses but fails validation is also replaced by defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(params) => match params.validate() {
                    Ok(()) => {
                        log::info!("Loaded session parameters from {:?}", path.as_ref());
                        params
                    }
                    Err(e) => {
                        log::warn!("Invalid session parameters: {}, using defaults", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to parse session parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Session parameters file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Check ranges that the session relies on
    pub fn validate(&self) -> Result<()> {
        if !self.stimulation_rate_hz.is_finite() || self.stimulation_rate_hz <= 0.0 {
            return Err(SimulationError::InvalidStimulationRate(self.stimulation_rate_hz));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SimulationError::InvalidSpeed(self.speed));
        }
        if self.trace_capacity == 0 {
            return Err(SimulationError::InvalidCapacity(self.trace_capacity));
        }
        if self.analysis_window == 0 {
            return Err(SimulationError::InvalidCapacity(self.analysis_window));
        }
        if !self.tick_interval_ms.is_finite() || self.tick_interval_ms < 0.0 {
            return Err(SimulationError::InvalidTime(self.tick_interval_ms));
        }
        if !self.stimulus_window_ms.is_finite() || self.stimulus_window_ms < 0.0 {
            return Err(SimulationError::InvalidTime(self.stimulus_window_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_params() {
        let params = SessionParameters::default();
        assert_eq!(params.cell_type, CellType::Ventricular);
        assert_eq!(params.trace_capacity, 1000);
        assert!((params.tick_interval_ms - 16.0).abs() < 1e-9);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let params = Parameters::default();
        let json = serde_json::to_string_pretty(&params).unwrap();
        let parsed: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.session, params.session);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: SessionParameters =
            serde_json::from_str(r#"{"cell_type":"atrial","stimulation_rate_hz":2.0}"#).unwrap();
        assert_eq!(parsed.cell_type, CellType::Atrial);
        assert_eq!(parsed.stimulation_rate_hz, 2.0);
        assert_eq!(parsed.trace_capacity, 1000);
    }

    #[test]
    fn test_validation_rejects_zero_rate() {
        let params = SessionParameters {
            stimulation_rate_hz: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidStimulationRate(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let params = SessionParameters::load_or_default("does/not/exist.json");
        assert_eq!(params, SessionParameters::default());
    }
}
