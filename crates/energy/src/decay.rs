//! Coherence decay
//!
//! Amplitudes decay exponentially with elapsed simulated time while phases
//! stay fixed. Because energy is amplitude-squared, total energy decays as
//! `exp(-2λΔt)` when amplitudes decay as `exp(-λΔt)`.

use fluxcube_spectral::{Channel, ChannelSet};

use crate::state::{channel_set_energy, CubeEnergyState};

/// Decay one channel's amplitudes by `exp(-rate · dt)`
pub fn decay_channel(channel: &Channel, rate: f64, dt: f64) -> Channel {
    let factor = (-rate * dt).exp();
    let mut decayed = channel.clone();
    decayed.dc_amplitude *= factor;
    for c in &mut decayed.coefficients {
        c.amplitude *= factor;
    }
    decayed
}

/// Decay every present channel; `rate ≤ 0` or `dt ≤ 0` returns the input unchanged
pub fn apply_coherence_decay(set: &ChannelSet, rate: f64, dt: f64) -> ChannelSet {
    if rate <= 0.0 || dt <= 0.0 {
        return set.clone();
    }
    ChannelSet {
        r: set.r.as_ref().map(|c| decay_channel(c, rate, dt)),
        g: set.g.as_ref().map(|c| decay_channel(c, rate, dt)),
        b: set.b.as_ref().map(|c| decay_channel(c, rate, dt)),
        a: set.a.as_ref().map(|c| decay_channel(c, rate, dt)),
    }
}

/// Advance a cube state by `dt` using its own `coherence_loss` rate
///
/// Returns a new state with decayed channels and `current_energy` recomputed
/// from them, so the energy/channel invariant holds by construction.
pub fn decay_state(state: &CubeEnergyState, dt: f64) -> CubeEnergyState {
    let channels = apply_coherence_decay(&state.channels, state.coherence_loss, dt);
    let current_energy = if state.coherence_loss <= 0.0 || dt <= 0.0 {
        state.current_energy
    } else {
        channel_set_energy(&channels)
    };
    CubeEnergyState {
        channels,
        current_energy,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::channel_energy;
    use fluxcube_spectral::SpectralCoefficient;

    fn channel() -> Channel {
        Channel {
            dc_amplitude: 2.0,
            dc_phase: 0.7,
            coefficients: vec![SpectralCoefficient {
                amplitude: 3.0,
                phase: 1.1,
                freq_x: 1,
                freq_y: 2,
                freq_z: 0,
            }],
        }
    }

    #[test]
    fn test_decay_scales_amplitudes() {
        let decayed = decay_channel(&channel(), 0.1, 1.0);
        let factor = (-0.1f64).exp();
        assert!((decayed.dc_amplitude - 2.0 * factor).abs() < 1e-12);
        assert!((decayed.coefficients[0].amplitude - 3.0 * factor).abs() < 1e-12);
    }

    #[test]
    fn test_decay_leaves_phases_untouched() {
        let decayed = decay_channel(&channel(), 0.5, 2.0);
        assert_eq!(decayed.dc_phase, 0.7);
        assert_eq!(decayed.coefficients[0].phase, 1.1);
        assert_eq!(decayed.coefficients[0].freq_x, 1);
    }

    #[test]
    fn test_zero_rate_or_dt_is_noop() {
        let set = ChannelSet {
            r: Some(channel()),
            ..Default::default()
        };
        assert_eq!(apply_coherence_decay(&set, 0.0, 5.0), set);
        assert_eq!(apply_coherence_decay(&set, 0.3, 0.0), set);
        assert_eq!(apply_coherence_decay(&set, -1.0, -1.0), set);
    }

    #[test]
    fn test_energy_decays_at_twice_the_rate() {
        let ch = channel();
        let before = channel_energy(&ch);
        let decayed = decay_channel(&ch, 0.1, 1.0);
        let after = channel_energy(&decayed);
        let expected = before * (-2.0 * 0.1f64).exp();
        assert!((after - expected).abs() < 1e-9);
    }

    #[test]
    fn test_decay_state_recomputes_energy() {
        let set = ChannelSet {
            g: Some(channel()),
            ..Default::default()
        };
        let state = CubeEnergyState {
            current_energy: channel_set_energy(&set),
            channels: set,
            coherence_loss: 0.2,
            energy_capacity: 100.0,
            fracture_threshold: 0.0,
        };

        let advanced = decay_state(&state, 3.0);
        assert!(
            (advanced.current_energy - channel_set_energy(&advanced.channels)).abs() < 1e-12
        );
        assert!(advanced.current_energy < state.current_energy);
        // input untouched
        assert_eq!(state.coherence_loss, 0.2);
    }

    #[test]
    fn test_decay_state_zero_dt_keeps_energy() {
        let state = CubeEnergyState {
            current_energy: 42.0,
            coherence_loss: 0.5,
            ..Default::default()
        };
        let advanced = decay_state(&state, 0.0);
        assert_eq!(advanced.current_energy, 42.0);
    }
}
