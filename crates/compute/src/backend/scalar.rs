//! Sequential reference backend
//!
//! Plain loops over the lattice calling the scalar kernels directly. Always
//! available; the correctness baseline for the other tiers. Pure functions
//! with no shared state, safe to call from any thread.

use fluxcube_noise::{sample, NoiseParams};
use fluxcube_spectral::{Fft3d, SpectralError, Spectrum3d};

/// Fill a flat `N³` lattice with the configured noise
pub fn fill_noise(params: &NoiseParams) -> Vec<f32> {
    let n = params.size.dim() as u32;
    let mut data = Vec::with_capacity(params.size.cells());
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                data.push(sample(params, x, y, z) as f32);
            }
        }
    }
    data
}

/// Forward 3D transform using sequential rustfft plans
pub fn fft_forward(real: &[f32], imag: &[f32], size: usize) -> Result<Spectrum3d, SpectralError> {
    Fft3d::new(size)?.forward(real, imag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxcube_noise::{LatticeSize, NoiseKind};

    #[test]
    fn test_fill_noise_length_and_layout() {
        let params = NoiseParams {
            kind: NoiseKind::Gradient,
            size: LatticeSize::Size8,
            scale: 3.0,
            octaves: 2,
            persistence: 0.5,
            seed: 1,
        };
        let data = fill_noise(&params);
        assert_eq!(data.len(), 512);

        // Spot-check the z*N² + y*N + x layout against the kernel
        let idx = 3 * 64 + 2 * 8 + 5;
        assert_eq!(data[idx], sample(&params, 5, 2, 3) as f32);
    }

    #[test]
    fn test_fill_noise_deterministic() {
        let params = NoiseParams {
            kind: NoiseKind::CellDistance,
            size: LatticeSize::Size8,
            scale: 2.0,
            octaves: 1,
            persistence: 1.0,
            seed: 77,
        };
        assert_eq!(fill_noise(&params), fill_noise(&params));
    }
}
