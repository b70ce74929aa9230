//! Cube energy state and Parseval-based energy accounting
//!
//! Energy is derived from spectral amplitudes: each coefficient contributes
//! its squared amplitude, so energy is independent of phase. The engine never
//! mutates caller-owned state; update operations return new values.

use serde::{Deserialize, Serialize};

use fluxcube_spectral::{Channel, ChannelSet, SpectralCoefficient};

/// Simulated physical state of one cube
///
/// `current_energy` should equal [`channel_set_energy`] of `channels` unless
/// the caller has deliberately staled it; [`recompute_energy`] restores the
/// invariant. It is never implicitly clamped to `energy_capacity`; capacity
/// only gates transfer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeEnergyState {
    pub channels: ChannelSet,
    /// Maximum energy the cube can absorb through transfer (≥ 0)
    pub energy_capacity: f64,
    /// Cached total energy (≥ 0)
    pub current_energy: f64,
    /// Exponential amplitude decay rate, 1/time (≥ 0)
    pub coherence_loss: f64,
    /// Fracture threshold; 0 disables fracture
    pub fracture_threshold: f64,
}

/// Energy of one coefficient: amplitude²
pub fn coefficient_energy(c: &SpectralCoefficient) -> f64 {
    c.amplitude * c.amplitude
}

/// Energy of one channel: dc_amplitude² + Σ coefficient energies
pub fn channel_energy(channel: &Channel) -> f64 {
    channel.dc_amplitude * channel.dc_amplitude
        + channel.coefficients.iter().map(coefficient_energy).sum::<f64>()
}

/// Total energy across present channels; absent channels contribute 0
pub fn channel_set_energy(set: &ChannelSet) -> f64 {
    set.present().map(channel_energy).sum()
}

/// Fraction of capacity in use; 0 when capacity is 0
pub fn normalized_energy(state: &CubeEnergyState) -> f64 {
    if state.energy_capacity > 0.0 {
        state.current_energy / state.energy_capacity
    } else {
        0.0
    }
}

/// Capacity left before the cube is full, never negative
pub fn remaining_capacity(state: &CubeEnergyState) -> f64 {
    (state.energy_capacity - state.current_energy).max(0.0)
}

/// Rederive `current_energy` from channel data, discarding any stale cache
pub fn recompute_energy(state: &CubeEnergyState) -> CubeEnergyState {
    let mut updated = state.clone();
    updated.current_energy = channel_set_energy(&state.channels);
    updated
}
