//! Per-session drug doses and the resulting channel block.

use serde::{Deserialize, Serialize};

use super::drug::{ChannelTarget, Drug};
use crate::error::{Result, SimulationError};

/// Dose of a single drug
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrugDose {
    /// Bath concentration (μM), always finite and ≥ 0
    pub concentration_uM: f64,
    /// Whether the drug is applied
    pub active: bool,
}

impl DrugDose {
    /// Concentration that actually reaches the channels
    pub fn effective_concentration_uM(&self) -> f64 {
        if self.active {
            self.concentration_uM
        } else {
            0.0
        }
    }
}

/// Doses for every drug in the table
///
/// Starts with all drugs at 0 μM and inactive. Concentrations are
/// validated on the way in so the Hill equation never sees NaN or
/// negative values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrugState {
    doses: [DrugDose; 3],
}

impl DrugState {
    /// All drugs inactive at zero concentration
    pub fn new() -> Self {
        Self::default()
    }

    /// Current dose of a drug
    pub fn dose(&self, drug: Drug) -> DrugDose {
        self.doses[drug.index()]
    }

    /// Set concentration, keeping the active flag
    pub fn set_concentration(&mut self, drug: Drug, concentration_uM: f64) -> Result<()> {
        validate_concentration(drug, concentration_uM)?;
        self.doses[drug.index()].concentration_uM = concentration_uM;
        Ok(())
    }

    /// Toggle a drug on or off
    pub fn set_active(&mut self, drug: Drug, active: bool) {
        self.doses[drug.index()].active = active;
    }

    /// Set concentration and activate in one step
    pub fn apply(&mut self, drug: Drug, concentration_uM: f64) -> Result<()> {
        self.set_concentration(drug, concentration_uM)?;
        self.set_active(drug, true);
        Ok(())
    }

    /// Builder form of [`DrugState::apply`]
    pub fn with(mut self, drug: Drug, concentration_uM: f64) -> Result<Self> {
        self.apply(drug, concentration_uM)?;
        Ok(self)
    }

    /// Re-check every dose
    ///
    /// Doses deserialized from outside bypass the setters.
    pub fn validate(&self) -> Result<()> {
        for drug in Drug::ALL {
            validate_concentration(drug, self.dose(drug).concentration_uM)?;
        }
        Ok(())
    }

    /// Drugs that are active with a non-zero concentration
    pub fn active_drugs(&self) -> Vec<(Drug, f64)> {
        Drug::ALL
            .iter()
            .filter_map(|&drug| {
                let dose = self.dose(drug);
                (dose.active && dose.concentration_uM > 0.0)
                    .then_some((drug, dose.concentration_uM))
            })
            .collect()
    }

    /// Conductance multiplier contributed by one drug
    pub fn multiplier(&self, drug: Drug) -> f64 {
        drug.model()
            .block_multiplier(self.dose(drug).effective_concentration_uM())
    }

    /// Combined channel block
    pub fn channel_block(&self) -> ChannelBlock {
        ChannelBlock::from_drugs(self)
    }
}

/// Fraction of unblocked conductance per channel population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelBlock {
    /// Na+ conductance multiplier
    pub sodium: f64,
    /// L-type Ca2+ conductance multiplier
    pub calcium: f64,
}

impl Default for ChannelBlock {
    fn default() -> Self {
        Self::NONE
    }
}

impl ChannelBlock {
    /// No block on either channel
    pub const NONE: ChannelBlock = ChannelBlock {
        sodium: 1.0,
        calcium: 1.0,
    };

    /// Combine drug multipliers
    ///
    /// Drugs sharing a target are treated as independent blockers, so their
    /// multipliers compose by product.
    pub fn from_drugs(drugs: &DrugState) -> Self {
        let mut block = Self::NONE;
        for drug in Drug::ALL {
            let m = drugs.multiplier(drug);
            match drug.target() {
                ChannelTarget::Sodium => block.sodium *= m,
                ChannelTarget::Calcium => block.calcium *= m,
            }
        }
        block
    }
}

fn validate_concentration(drug: Drug, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SimulationError::NonFiniteConcentration { drug: drug.name() });
    }
    if value < 0.0 {
        return Err(SimulationError::NegativeConcentration {
            drug: drug.name(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_drug_free() {
        let state = DrugState::new();
        for drug in Drug::ALL {
            assert_eq!(state.dose(drug), DrugDose::default());
        }
        assert_eq!(state.channel_block(), ChannelBlock::NONE);
        assert!(state.active_drugs().is_empty());
    }

    #[test]
    fn test_rejects_invalid_concentration() {
        let mut state = DrugState::new();
        state.set_concentration(Drug::Ttx, 0.05).unwrap();

        assert!(matches!(
            state.set_concentration(Drug::Ttx, -0.1),
            Err(SimulationError::NegativeConcentration { .. })
        ));
        assert!(matches!(
            state.set_concentration(Drug::Ttx, f64::NAN),
            Err(SimulationError::NonFiniteConcentration { .. })
        ));
        assert!(state.set_concentration(Drug::Ttx, f64::INFINITY).is_err());

        // Previous value survives a rejected update
        assert_eq!(state.dose(Drug::Ttx).concentration_uM, 0.05);
    }

    #[test]
    fn test_inactive_drug_has_no_effect() {
        let mut state = DrugState::new();
        state.set_concentration(Drug::Verapamil, 1.0).unwrap();
        assert_eq!(state.multiplier(Drug::Verapamil), 1.0);

        state.set_active(Drug::Verapamil, true);
        assert!(state.multiplier(Drug::Verapamil) < 1.0);
    }

    #[test]
    fn test_calcium_blockers_multiply() {
        let state = DrugState::new()
            .with(Drug::Verapamil, 0.1)
            .unwrap()
            .with(Drug::Diltiazem, 0.05)
            .unwrap();
        let block = state.channel_block();

        let expected = (1.0 - 0.85 * 0.5) * (1.0 - 0.80 * 0.5);
        assert!((block.calcium - expected).abs() < 1e-12);
        assert_eq!(block.sodium, 1.0);
    }

    #[test]
    fn test_validate_catches_deserialized_garbage() {
        let json = r#"{"doses":[{"concentration_uM":-1.0,"active":true},
            {"concentration_uM":0.0,"active":false},
            {"concentration_uM":0.0,"active":false}]}"#;
        let state: DrugState = serde_json::from_str(json).unwrap();
        assert!(state.validate().is_err());
    }
}
