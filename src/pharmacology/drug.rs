//! Drug table and Hill-equation dose-response.
//!
//! Each drug blocks one channel population. Fractional block follows the
//! Hill equation:
//!
//! f = c^n / (IC50^n + c^n)
//!
//! and the channel conductance is scaled by `1 - max_block * f`.
//!
//! References:
//! - Hill AV. J Physiol. 1910;40:iv-vii (dose-response form)
//! - Narahashi T. Physiol Rev. 1974;54:813-889 (TTX Na+ block)
//! - Fleckenstein A. Annu Rev Pharmacol Toxicol. 1977;17:149-166 (Ca2+ antagonists)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Ion channel population targeted by a drug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelTarget {
    /// Fast Na+ channels (phase 0 upstroke)
    Sodium,
    /// L-type Ca2+ channels (phase 2 plateau)
    Calcium,
}

/// Drugs available in the pharmacology panel
///
/// The table is closed: names outside it are rejected rather than treated
/// as extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drug {
    /// Tetrodotoxin, selective Na+ channel blocker
    #[serde(rename = "TTX")]
    Ttx,
    /// Phenylalkylamine L-type Ca2+ channel blocker
    #[serde(rename = "verapamil")]
    Verapamil,
    /// Benzothiazepine L-type Ca2+ channel blocker
    #[serde(rename = "diltiazem")]
    Diltiazem,
}

impl Drug {
    /// Every drug, in table order
    pub const ALL: [Drug; 3] = [Drug::Ttx, Drug::Verapamil, Drug::Diltiazem];

    /// Position in per-drug arrays
    pub fn index(self) -> usize {
        match self {
            Drug::Ttx => 0,
            Drug::Verapamil => 1,
            Drug::Diltiazem => 2,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Drug::Ttx => "TTX",
            Drug::Verapamil => "verapamil",
            Drug::Diltiazem => "diltiazem",
        }
    }

    /// Channel population this drug blocks
    pub fn target(self) -> ChannelTarget {
        match self {
            Drug::Ttx => ChannelTarget::Sodium,
            Drug::Verapamil | Drug::Diltiazem => ChannelTarget::Calcium,
        }
    }

    /// Dose-response constants for this drug
    pub fn model(self) -> DrugModel {
        match self {
            // Narahashi 1974: nanomolar-range Na+ channel affinity
            Drug::Ttx => DrugModel {
                ic50_uM: 0.01,
                hill_coefficient: 1.0,
                max_block_fraction: 0.95,
            },
            Drug::Verapamil => DrugModel {
                ic50_uM: 0.1,
                hill_coefficient: 1.0,
                max_block_fraction: 0.85,
            },
            Drug::Diltiazem => DrugModel {
                ic50_uM: 0.05,
                hill_coefficient: 1.2,
                max_block_fraction: 0.80,
            },
        }
    }
}

impl fmt::Display for Drug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Drug {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ttx" | "tetrodotoxin" => Ok(Drug::Ttx),
            "verapamil" => Ok(Drug::Verapamil),
            "diltiazem" => Ok(Drug::Diltiazem),
            _ => Err(SimulationError::UnknownDrug(s.to_string())),
        }
    }
}

/// Static dose-response constants for one drug
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrugModel {
    /// Concentration producing half-maximal inhibition (μM)
    pub ic50_uM: f64,
    /// Hill coefficient (cooperativity)
    pub hill_coefficient: f64,
    /// Block fraction at saturating concentration (0-1)
    pub max_block_fraction: f64,
}

impl DrugModel {
    /// Fraction of channels occupied at the given concentration
    pub fn occupancy(&self, concentration_uM: f64) -> f64 {
        hill_fraction(concentration_uM, self.ic50_uM, self.hill_coefficient)
    }

    /// Conductance multiplier at the given concentration
    ///
    /// Lies in `[1 - max_block_fraction, 1]` and is exactly 1 at zero
    /// concentration.
    pub fn block_multiplier(&self, concentration_uM: f64) -> f64 {
        if concentration_uM <= 0.0 {
            return 1.0;
        }
        1.0 - self.max_block_fraction * self.occupancy(concentration_uM)
    }
}

/// Hill equation: c^n / (IC50^n + c^n)
///
/// Returns 0 for non-positive concentrations. Callers validate their input;
/// this never sees negative values from a `DrugState`.
pub fn hill_fraction(concentration_uM: f64, ic50_uM: f64, hill_coefficient: f64) -> f64 {
    if concentration_uM <= 0.0 {
        return 0.0;
    }
    let c_n = concentration_uM.powf(hill_coefficient);
    let ic50_n = ic50_uM.powf(hill_coefficient);
    c_n / (ic50_n + c_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hill_half_block_at_ic50() {
        for drug in Drug::ALL {
            let model = drug.model();
            let f = model.occupancy(model.ic50_uM);
            assert!((f - 0.5).abs() < 1e-12, "{}: fraction at IC50 = {}", drug, f);
        }
    }

    #[test]
    fn test_ttx_multiplier_at_ic50() {
        let m = Drug::Ttx.model().block_multiplier(0.01);
        assert!((m - 0.525).abs() < 1e-12, "got {}", m);
    }

    #[test]
    fn test_zero_concentration_is_identity() {
        for drug in Drug::ALL {
            assert_eq!(drug.model().block_multiplier(0.0), 1.0);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("TTX".parse::<Drug>().unwrap(), Drug::Ttx);
        assert_eq!("Verapamil".parse::<Drug>().unwrap(), Drug::Verapamil);
        assert_eq!(" diltiazem ".parse::<Drug>().unwrap(), Drug::Diltiazem);
        assert!(matches!(
            "lidocaine".parse::<Drug>(),
            Err(SimulationError::UnknownDrug(_))
        ));
    }

    #[test]
    fn test_targets() {
        assert_eq!(Drug::Ttx.target(), ChannelTarget::Sodium);
        assert_eq!(Drug::Verapamil.target(), ChannelTarget::Calcium);
        assert_eq!(Drug::Diltiazem.target(), ChannelTarget::Calcium);
    }
}
