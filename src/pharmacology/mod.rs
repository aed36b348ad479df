//! Pharmacology: drug table, doses and channel block.

mod drug;
mod drug_state;

pub use drug::{hill_fraction, ChannelTarget, Drug, DrugModel};
pub use drug_state::{ChannelBlock, DrugDose, DrugState};
