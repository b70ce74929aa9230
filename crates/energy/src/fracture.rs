//! Fracture detection
//!
//! A cube fractures when its energy exceeds the configured threshold. A
//! threshold of zero disables fracture entirely regardless of energy.

use serde::{Deserialize, Serialize};

use crate::state::CubeEnergyState;

/// Warning band used by [`is_near_fracture`] when callers take the default
pub const DEFAULT_WARNING_RATIO: f64 = 0.8;

/// Outcome of a fracture check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractureReport {
    pub fractured: bool,
    /// `current_energy / threshold`; 0 when the threshold is 0
    pub stress_level: f64,
    /// Energy beyond the threshold, never negative
    pub excess_energy: f64,
}

/// Evaluate the fracture state of a cube
pub fn check_fracture(state: &CubeEnergyState) -> FractureReport {
    let threshold = state.fracture_threshold;
    if threshold <= 0.0 {
        return FractureReport {
            fractured: false,
            stress_level: 0.0,
            excess_energy: 0.0,
        };
    }
    FractureReport {
        fractured: state.current_energy > threshold,
        stress_level: state.current_energy / threshold,
        excess_energy: (state.current_energy - threshold).max(0.0),
    }
}

/// Whether the cube sits inside the warning band below its threshold
///
/// Already-fractured cubes are not "near" fracture.
pub fn is_near_fracture(state: &CubeEnergyState, warning_ratio: f64) -> bool {
    let threshold = state.fracture_threshold;
    threshold > 0.0
        && state.current_energy >= warning_ratio * threshold
        && state.current_energy <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(current: f64, threshold: f64) -> CubeEnergyState {
        CubeEnergyState {
            current_energy: current,
            fracture_threshold: threshold,
            energy_capacity: 1000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_fracture_over_threshold() {
        let report = check_fracture(&state(100.0, 50.0));
        assert!(report.fractured);
        assert_eq!(report.stress_level, 2.0);
        assert_eq!(report.excess_energy, 50.0);
    }

    #[test]
    fn test_no_fracture_under_threshold() {
        let report = check_fracture(&state(30.0, 50.0));
        assert!(!report.fractured);
        assert_eq!(report.stress_level, 0.6);
        assert_eq!(report.excess_energy, 0.0);
    }

    #[test]
    fn test_at_threshold_is_not_fractured() {
        let report = check_fracture(&state(50.0, 50.0));
        assert!(!report.fractured);
        assert_eq!(report.stress_level, 1.0);
    }

    #[test]
    fn test_zero_threshold_disables_fracture() {
        let report = check_fracture(&state(1e9, 0.0));
        assert!(!report.fractured);
        assert_eq!(report.stress_level, 0.0);
        assert_eq!(report.excess_energy, 0.0);
    }

    #[test]
    fn test_near_fracture_band() {
        assert!(is_near_fracture(&state(40.0, 50.0), DEFAULT_WARNING_RATIO));
        assert!(is_near_fracture(&state(50.0, 50.0), DEFAULT_WARNING_RATIO));
        assert!(!is_near_fracture(&state(39.9, 50.0), DEFAULT_WARNING_RATIO));
    }

    #[test]
    fn test_fractured_cube_is_not_near() {
        assert!(!is_near_fracture(&state(60.0, 50.0), DEFAULT_WARNING_RATIO));
    }

    #[test]
    fn test_near_fracture_disabled_threshold() {
        assert!(!is_near_fracture(&state(100.0, 0.0), DEFAULT_WARNING_RATIO));
    }
}
