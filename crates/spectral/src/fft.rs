//! 3D discrete Fourier transform over cubic lattices
//!
//! Row-column decomposition: 1D FFTs along X, then Y, then Z, over a flat
//! buffer indexed `z*N² + y*N + x`. The forward transform is the plain
//! unnormalized sum; the inverse carries the `1/N³` factor. Energy is the
//! Parseval total of the output coefficients.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use thiserror::Error;

/// Spectral operation failures
///
/// These are caller contract violations; capability or hardware concerns
/// never reach this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    #[error("Unsupported FFT size: {0}. Supported sizes: 8, 16, 32")]
    UnsupportedSize(usize),

    #[error("Invalid {part} input length: expected {expected}, got {got}")]
    LengthMismatch {
        part: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Result of one 3D transform
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum3d {
    /// Real parts, `N³` values indexed `z*N² + y*N + x`
    pub real: Vec<f32>,
    /// Imaginary parts, same layout
    pub imag: Vec<f32>,
    /// Parseval total of the output: Σ(re² + im²)
    pub energy: f64,
}

/// Cached forward/inverse plans per supported size
///
/// Plans are created on first use and reused for the transformer's lifetime.
struct PlanCache {
    size_8: Option<(Arc<dyn Fft<f32>>, Arc<dyn Fft<f32>>)>,
    size_16: Option<(Arc<dyn Fft<f32>>, Arc<dyn Fft<f32>>)>,
    size_32: Option<(Arc<dyn Fft<f32>>, Arc<dyn Fft<f32>>)>,
    planner: FftPlanner<f32>,
}

impl PlanCache {
    fn new() -> Self {
        Self {
            size_8: None,
            size_16: None,
            size_32: None,
            planner: FftPlanner::new(),
        }
    }

    fn get(&mut self, size: usize) -> Result<(Arc<dyn Fft<f32>>, Arc<dyn Fft<f32>>), SpectralError> {
        let slot = match size {
            8 => &mut self.size_8,
            16 => &mut self.size_16,
            32 => &mut self.size_32,
            other => return Err(SpectralError::UnsupportedSize(other)),
        };
        if slot.is_none() {
            let fwd = self.planner.plan_fft_forward(size);
            let inv = self.planner.plan_fft_inverse(size);
            *slot = Some((fwd, inv));
        }
        let (fwd, inv) = slot.as_ref().cloned().ok_or(SpectralError::UnsupportedSize(size))?;
        Ok((fwd, inv))
    }
}

/// 3D FFT transformer for one lattice size
pub struct Fft3d {
    size: usize,
    total: usize,
    plans: PlanCache,
}

impl Fft3d {
    /// Create a transformer for lattice side `size` (8, 16, or 32)
    pub fn new(size: usize) -> Result<Self, SpectralError> {
        if size != 8 && size != 16 && size != 32 {
            return Err(SpectralError::UnsupportedSize(size));
        }
        Ok(Self {
            size,
            total: size * size * size,
            plans: PlanCache::new(),
        })
    }

    /// Side length of each dimension
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of lattice cells
    pub fn total_cells(&self) -> usize {
        self.total
    }

    /// Forward 3D transform (space -> frequency), unnormalized
    pub fn forward(&mut self, real: &[f32], imag: &[f32]) -> Result<Spectrum3d, SpectralError> {
        self.validate(real, imag)?;
        let mut buffer = to_complex(real, imag);
        self.fft_3d(&mut buffer, true)?;
        Ok(into_spectrum(buffer))
    }

    /// Inverse 3D transform (frequency -> space), normalized by `1/N³`
    pub fn inverse(&mut self, real: &[f32], imag: &[f32]) -> Result<Spectrum3d, SpectralError> {
        self.validate(real, imag)?;
        let mut buffer = to_complex(real, imag);
        self.fft_3d(&mut buffer, false)?;

        let norm = 1.0 / self.total as f32;
        for c in &mut buffer {
            c.re *= norm;
            c.im *= norm;
        }
        Ok(into_spectrum(buffer))
    }

    fn validate(&self, real: &[f32], imag: &[f32]) -> Result<(), SpectralError> {
        if real.len() != self.total {
            return Err(SpectralError::LengthMismatch {
                part: "real",
                expected: self.total,
                got: real.len(),
            });
        }
        if imag.len() != self.total {
            return Err(SpectralError::LengthMismatch {
                part: "imaginary",
                expected: self.total,
                got: imag.len(),
            });
        }
        Ok(())
    }

    /// Apply the 1D plan along each axis in turn
    fn fft_3d(&mut self, buffer: &mut [Complex<f32>], forward: bool) -> Result<(), SpectralError> {
        let (fwd, inv) = self.plans.get(self.size)?;
        let fft = if forward { fwd } else { inv };
        let n = self.size;

        let mut scratch = vec![Complex::new(0.0f32, 0.0f32); fft.get_inplace_scratch_len()];

        // X-axis: rows are contiguous
        for z in 0..n {
            for y in 0..n {
                let start = z * n * n + y * n;
                fft.process_with_scratch(&mut buffer[start..start + n], &mut scratch);
            }
        }

        // Y-axis: gather columns, transform, scatter back
        let mut line = vec![Complex::new(0.0f32, 0.0f32); n];
        for z in 0..n {
            for x in 0..n {
                for y in 0..n {
                    line[y] = buffer[z * n * n + y * n + x];
                }
                fft.process_with_scratch(&mut line, &mut scratch);
                for y in 0..n {
                    buffer[z * n * n + y * n + x] = line[y];
                }
            }
        }

        // Z-axis
        for y in 0..n {
            for x in 0..n {
                for z in 0..n {
                    line[z] = buffer[z * n * n + y * n + x];
                }
                fft.process_with_scratch(&mut line, &mut scratch);
                for z in 0..n {
                    buffer[z * n * n + y * n + x] = line[z];
                }
            }
        }

        Ok(())
    }
}

/// Parseval energy of raw coefficient arrays: Σ(re² + im²)
pub fn spectrum_energy(real: &[f32], imag: &[f32]) -> Result<f64, SpectralError> {
    if real.len() != imag.len() {
        return Err(SpectralError::LengthMismatch {
            part: "imaginary",
            expected: real.len(),
            got: imag.len(),
        });
    }
    Ok(real
        .iter()
        .zip(imag.iter())
        .map(|(&re, &im)| (re as f64) * (re as f64) + (im as f64) * (im as f64))
        .sum())
}

fn to_complex(real: &[f32], imag: &[f32]) -> Vec<Complex<f32>> {
    real.iter()
        .zip(imag.iter())
        .map(|(&re, &im)| Complex::new(re, im))
        .collect()
}

fn into_spectrum(buffer: Vec<Complex<f32>>) -> Spectrum3d {
    let mut real = Vec::with_capacity(buffer.len());
    let mut imag = Vec::with_capacity(buffer.len());
    let mut energy = 0.0f64;
    for c in &buffer {
        real.push(c.re);
        imag.push(c.im);
        energy += (c.re as f64) * (c.re as f64) + (c.im as f64) * (c.im as f64);
    }
    Spectrum3d { real, imag, energy }
}
