//! Integration tests for drug block
//!
//! Tests validate:
//! - Hill equation half-block at IC50
//! - Block multiplier bounds for every drug
//! - Identity at zero concentration
//! - Independent multiplicative Ca2+ block
//! - Input validation at the drug-state boundary

use cardio_sim::pharmacology::ChannelTarget;
use cardio_sim::{hill_fraction, ChannelBlock, Drug, DrugState, SimulationError};

/// TTX at IC50 with n = 1 gives exactly half block and a 0.525 multiplier
#[test]
fn test_ttx_at_ic50() {
    let model = Drug::Ttx.model();
    assert_eq!(model.ic50_uM, 0.01);
    assert_eq!(model.hill_coefficient, 1.0);

    let fraction = hill_fraction(0.01, model.ic50_uM, model.hill_coefficient);
    assert_eq!(fraction, 0.5);

    let state = DrugState::new().with(Drug::Ttx, 0.01).unwrap();
    let block = state.channel_block();
    assert!(
        (block.sodium - 0.525).abs() < 1e-12,
        "Na+ multiplier should be 1 - 0.95 * 0.5 = 0.525, got {}",
        block.sodium
    );
}

/// Multiplier stays within [1 - max_block, 1] over many decades
#[test]
fn test_multiplier_bounds() {
    for drug in Drug::ALL {
        let model = drug.model();
        let floor = 1.0 - model.max_block_fraction;

        let mut previous = f64::INFINITY;
        for exponent in -6..=6 {
            let c = 10f64.powi(exponent);
            let m = model.block_multiplier(c);
            assert!(m <= 1.0, "{} at {} μM: multiplier {} > 1", drug, c, m);
            assert!(m >= floor - 1e-12, "{} at {} μM: multiplier {} below floor", drug, c, m);
            assert!(m < previous, "{}: multiplier should fall with concentration", drug);
            previous = m;
        }

        assert_eq!(model.block_multiplier(0.0), 1.0);
    }
}

/// No drug means no effect, whatever the stored concentration
#[test]
fn test_no_drug_no_effect() {
    let mut state = DrugState::new();
    assert_eq!(state.channel_block(), ChannelBlock::NONE);

    for drug in Drug::ALL {
        state.set_concentration(drug, 5.0).unwrap();
    }
    assert_eq!(state.channel_block(), ChannelBlock::NONE, "inactive drugs must not block");

    for drug in Drug::ALL {
        state.set_concentration(drug, 0.0).unwrap();
        state.set_active(drug, true);
    }
    assert_eq!(state.channel_block(), ChannelBlock::NONE, "zero concentration must not block");
}

/// Verapamil and diltiazem combine multiplicatively on the Ca2+ channel
#[test]
fn test_calcium_block_is_product() {
    let verapamil = DrugState::new().with(Drug::Verapamil, 0.3).unwrap();
    let diltiazem = DrugState::new().with(Drug::Diltiazem, 0.08).unwrap();
    let both = verapamil.with(Drug::Diltiazem, 0.08).unwrap();

    let expected = verapamil.channel_block().calcium * diltiazem.channel_block().calcium;
    assert!((both.channel_block().calcium - expected).abs() < 1e-15);
    assert_eq!(both.channel_block().sodium, 1.0);
}

/// Every drug maps to the channel it is known to block
#[test]
fn test_drug_targets() {
    assert_eq!(Drug::Ttx.target(), ChannelTarget::Sodium);
    for drug in [Drug::Verapamil, Drug::Diltiazem] {
        assert_eq!(drug.target(), ChannelTarget::Calcium);
    }
}

/// Negative and non-finite concentrations never reach the Hill equation
#[test]
fn test_invalid_concentrations_rejected() {
    let mut state = DrugState::new().with(Drug::Diltiazem, 0.1).unwrap();
    let before = state;

    for bad in [-1e-9, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = state.set_concentration(Drug::Diltiazem, bad).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NegativeConcentration { .. } | SimulationError::NonFiniteConcentration { .. }
        ));
        assert_eq!(state, before, "rejected update must not change state");
    }
}

/// Unknown drug names are rejected, known names parse case-insensitively
#[test]
fn test_drug_names() {
    for drug in Drug::ALL {
        assert_eq!(drug.name().parse::<Drug>().unwrap(), drug);
        assert_eq!(drug.name().to_uppercase().parse::<Drug>().unwrap(), drug);
    }
    assert!(matches!("nifedipine".parse::<Drug>(), Err(SimulationError::UnknownDrug(_))));
}
