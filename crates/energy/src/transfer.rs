//! Energy transfer between cubes
//!
//! The source always loses exactly the computed transfer amount. The target
//! receives that amount scaled by `efficiency`; the lost fraction is
//! destroyed outright rather than rerouted, a deliberate deviation from
//! strict conservation that models dissipative transfer. Capacity gates how
//! much the target may absorb unless overflow is explicitly allowed.

use serde::{Deserialize, Serialize};

use crate::state::CubeEnergyState;

/// Tuning knobs for one transfer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Fraction of the transferred amount that reaches the target, in [0, 1]
    pub efficiency: f64,
    /// Cap on the transfer as a fraction of the source's available energy
    pub max_transfer_ratio: f64,
    /// Ignore the target's capacity cap entirely
    pub allow_overflow: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            efficiency: 1.0,
            max_transfer_ratio: 1.0,
            allow_overflow: false,
        }
    }
}

/// Outcome of one transfer computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    /// Amount removed from the source
    pub transferred_amount: f64,
    pub source_remaining_energy: f64,
    pub target_new_energy: f64,
    pub source_depleted: bool,
    /// True when the target's capacity cap bound the transfer
    pub target_at_capacity: bool,
}

/// Compute an energy transfer without touching either state
pub fn transfer_energy(
    source: &CubeEnergyState,
    target: &CubeEnergyState,
    requested_amount: f64,
    opts: &TransferOptions,
) -> TransferResult {
    let efficiency = opts.efficiency.clamp(0.0, 1.0);
    let available = source.current_energy;

    let mut amount = requested_amount
        .max(0.0)
        .min(available)
        .min(available * opts.max_transfer_ratio);

    let mut target_at_capacity = false;
    if !opts.allow_overflow && efficiency > 0.0 {
        let headroom = (target.energy_capacity - target.current_energy).max(0.0);
        if amount * efficiency > headroom {
            amount = headroom / efficiency;
            target_at_capacity = true;
        }
    }

    let received = amount * efficiency;
    let source_remaining_energy = available - amount;

    TransferResult {
        transferred_amount: amount,
        source_remaining_energy,
        target_new_energy: target.current_energy + received,
        source_depleted: source_remaining_energy <= 0.0,
        target_at_capacity,
    }
}

/// Apply a computed transfer, returning updated copies of both states
pub fn apply_transfer(
    source: &CubeEnergyState,
    target: &CubeEnergyState,
    result: &TransferResult,
) -> (CubeEnergyState, CubeEnergyState) {
    let mut new_source = source.clone();
    let mut new_target = target.clone();
    new_source.current_energy = result.source_remaining_energy;
    new_target.current_energy = result.target_new_energy;
    (new_source, new_target)
}
