//! Parameter types for lattice noise generation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported cubic lattice sizes
///
/// Noise and spectral operations run over flat `N³` buffers indexed
/// `z*N² + y*N + x`. Only these three sizes are supported; anything else is a
/// caller contract violation surfaced as [`ParamsError::UnsupportedSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatticeSize {
    Size8,
    Size16,
    Size32,
}

impl LatticeSize {
    /// Side length of the lattice
    pub fn dim(self) -> usize {
        match self {
            LatticeSize::Size8 => 8,
            LatticeSize::Size16 => 16,
            LatticeSize::Size32 => 32,
        }
    }

    /// Total cell count (`dim³`)
    pub fn cells(self) -> usize {
        let n = self.dim();
        n * n * n
    }

    /// Construct from a raw side length
    pub fn try_from_dim(dim: usize) -> Result<Self, ParamsError> {
        match dim {
            8 => Ok(LatticeSize::Size8),
            16 => Ok(LatticeSize::Size16),
            32 => Ok(LatticeSize::Size32),
            other => Err(ParamsError::UnsupportedSize(other)),
        }
    }
}

/// Noise algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Lattice-gradient interpolation noise, remapped to [0, 1]
    Gradient,
    /// Distance to the nearest scattered feature point (non-negative)
    CellDistance,
    /// Second-nearest minus nearest distance, thin ridge patterns
    CellDistanceDiff,
}

/// Parameters for one noise computation
///
/// Immutable per call. Identical parameters always produce bit-reproducible
/// output on the same backend; across backends only statistical similarity is
/// guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub kind: NoiseKind,
    pub size: LatticeSize,
    /// Feature wavelength in lattice units; larger values yield smoother output
    pub scale: f64,
    /// Number of octaves summed (≥ 1)
    pub octaves: u32,
    /// Per-octave amplitude falloff in [0, 1]
    pub persistence: f64,
    pub seed: i64,
}

impl NoiseParams {
    /// Validate the parameter contract
    ///
    /// Invalid parameters are caller bugs; they fail fast here rather than
    /// being silently clamped.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ParamsError::InvalidScale(self.scale));
        }
        if self.octaves < 1 {
            return Err(ParamsError::InvalidOctaves(self.octaves));
        }
        if !self.persistence.is_finite() || !(0.0..=1.0).contains(&self.persistence) {
            return Err(ParamsError::InvalidPersistence(self.persistence));
        }
        Ok(())
    }

    /// Fold the 64-bit seed into the 32-bit hash domain used by the kernels
    pub fn seed32(&self) -> u32 {
        let s = self.seed as u64;
        (s ^ (s >> 32)) as u32
    }
}

/// Parameter contract violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("Unsupported lattice size: {0}. Supported sizes: 8, 16, 32")]
    UnsupportedSize(usize),

    #[error("Noise scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("Octave count must be at least 1, got {0}")]
    InvalidOctaves(u32),

    #[error("Persistence must lie in [0, 1], got {0}")]
    InvalidPersistence(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NoiseParams {
        NoiseParams {
            kind: NoiseKind::Gradient,
            size: LatticeSize::Size16,
            scale: 4.0,
            octaves: 3,
            persistence: 0.5,
            seed: 42,
        }
    }

    #[test]
    fn test_lattice_size_dims() {
        assert_eq!(LatticeSize::Size8.dim(), 8);
        assert_eq!(LatticeSize::Size16.cells(), 4096);
        assert_eq!(LatticeSize::Size32.cells(), 32768);
    }

    #[test]
    fn test_try_from_dim() {
        assert_eq!(LatticeSize::try_from_dim(8).unwrap(), LatticeSize::Size8);
        assert!(matches!(
            LatticeSize::try_from_dim(5),
            Err(ParamsError::UnsupportedSize(5))
        ));
    }

    #[test]
    fn test_validate_accepts_good_params() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        let mut p = params();
        p.scale = 0.0;
        assert!(matches!(p.validate(), Err(ParamsError::InvalidScale(_))));
        p.scale = f64::NAN;
        assert!(matches!(p.validate(), Err(ParamsError::InvalidScale(_))));
    }

    #[test]
    fn test_validate_rejects_zero_octaves() {
        let mut p = params();
        p.octaves = 0;
        assert!(matches!(p.validate(), Err(ParamsError::InvalidOctaves(0))));
    }

    #[test]
    fn test_validate_rejects_bad_persistence() {
        let mut p = params();
        p.persistence = 1.5;
        assert!(matches!(
            p.validate(),
            Err(ParamsError::InvalidPersistence(_))
        ));
    }

    #[test]
    fn test_seed32_folds_high_bits() {
        let mut a = params();
        let mut b = params();
        a.seed = 1;
        b.seed = 1 | (1 << 40);
        assert_ne!(a.seed32(), b.seed32());
    }

    #[test]
    fn test_params_serde_roundtrip() {
        let p = params();
        let json = serde_json::to_string(&p).unwrap();
        let back: NoiseParams = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
