//! Cardiomyocyte types and their electrical parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Cardiomyocyte type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Working ventricular myocyte
    #[default]
    Ventricular,
    /// Working atrial myocyte
    Atrial,
}

impl CellType {
    /// Every cell type, in table order
    pub const ALL: [CellType; 2] = [CellType::Ventricular, CellType::Atrial];

    /// Electrical parameters for this cell type
    pub fn parameters(self) -> CellParameters {
        match self {
            // Resting -90 mV, overshoot +35 mV, APD90 ~300 ms
            // Source: Nerbonne & Kass, Physiol Rev 2005
            CellType::Ventricular => CellParameters {
                resting_potential_mV: -90.0,
                threshold_potential_mV: -65.0,
                overshoot_peak_mV: 35.0,
                apd90_ms: 300.0,
            },
            // Less negative rest and a shorter, triangular AP
            // Source: Nerbonne & Kass, Physiol Rev 2005
            CellType::Atrial => CellParameters {
                resting_potential_mV: -80.0,
                threshold_potential_mV: -65.0,
                overshoot_peak_mV: 30.0,
                apd90_ms: 200.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CellType::Ventricular => "ventricular",
            CellType::Atrial => "atrial",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellType {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ventricular" => Ok(CellType::Ventricular),
            "atrial" => Ok(CellType::Atrial),
            _ => Err(SimulationError::UnknownCellType(s.to_string())),
        }
    }
}

/// Membrane potential landmarks of one cell type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellParameters {
    /// Diastolic resting potential (mV)
    pub resting_potential_mV: f64,
    /// Na+ channel activation threshold (mV)
    pub threshold_potential_mV: f64,
    /// Peak of the phase 0 overshoot (mV)
    pub overshoot_peak_mV: f64,
    /// Action potential duration at 90% repolarization (ms)
    pub apd90_ms: f64,
}

impl CellParameters {
    /// Whether the membrane is depolarized past threshold
    pub fn is_above_threshold(&self, voltage_mV: f64) -> bool {
        voltage_mV > self.threshold_potential_mV
    }

    /// Total swing from rest to overshoot (mV)
    pub fn amplitude_mV(&self) -> f64 {
        self.overshoot_peak_mV - self.resting_potential_mV
    }
}
