//! Portable data-parallel backend
//!
//! Rayon fills the lattice slab-by-slab and runs the transform's line passes
//! concurrently. Uses the same scalar kernels and rustfft plans as the
//! reference tier, so its noise output is bit-identical to the scalar tier.

use num_complex::Complex;
use rayon::prelude::*;
use rustfft::FftPlanner;

use fluxcube_noise::{sample, NoiseParams};
use fluxcube_spectral::{SpectralError, Spectrum3d};

/// Fill a flat `N³` lattice, one z-slab per task
pub fn fill_noise(params: &NoiseParams) -> Vec<f32> {
    let n = params.size.dim();
    let mut data = vec![0.0f32; params.size.cells()];
    data.par_chunks_mut(n * n).enumerate().for_each(|(z, slab)| {
        for y in 0..n {
            for x in 0..n {
                slab[y * n + x] = sample(params, x as u32, y as u32, z as u32) as f32;
            }
        }
    });
    data
}

/// Forward 3D transform with per-axis line parallelism
pub fn fft_forward(real: &[f32], imag: &[f32], size: usize) -> Result<Spectrum3d, SpectralError> {
    let n = size;
    if n != 8 && n != 16 && n != 32 {
        return Err(SpectralError::UnsupportedSize(n));
    }
    let total = n * n * n;
    if real.len() != total {
        return Err(SpectralError::LengthMismatch {
            part: "real",
            expected: total,
            got: real.len(),
        });
    }
    if imag.len() != total {
        return Err(SpectralError::LengthMismatch {
            part: "imaginary",
            expected: total,
            got: imag.len(),
        });
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let scratch_len = fft.get_inplace_scratch_len();
    let zero = Complex::new(0.0f32, 0.0f32);

    let mut buffer: Vec<Complex<f32>> = real
        .iter()
        .zip(imag.iter())
        .map(|(&re, &im)| Complex::new(re, im))
        .collect();

    // X-axis: rows are contiguous chunks
    buffer
        .par_chunks_mut(n)
        .for_each_init(|| vec![zero; scratch_len], |scratch, row| {
            fft.process_with_scratch(row, scratch);
        });

    // Y-axis: each z-slab is an independent contiguous block
    buffer
        .par_chunks_mut(n * n)
        .for_each_init(|| (vec![zero; scratch_len], vec![zero; n]), |(scratch, line), slab| {
            for x in 0..n {
                for y in 0..n {
                    line[y] = slab[y * n + x];
                }
                fft.process_with_scratch(line, scratch);
                for y in 0..n {
                    slab[y * n + x] = line[y];
                }
            }
        });

    // Z-axis: lines cross slab boundaries, so transpose into contiguous
    // lines, transform, and scatter back.
    let mut lines = vec![zero; total];
    lines.par_chunks_mut(n).enumerate().for_each(|(line_idx, line)| {
        let y = line_idx / n;
        let x = line_idx % n;
        for z in 0..n {
            line[z] = buffer[z * n * n + y * n + x];
        }
    });
    lines
        .par_chunks_mut(n)
        .for_each_init(|| vec![zero; scratch_len], |scratch, line| {
            fft.process_with_scratch(line, scratch);
        });
    buffer.par_chunks_mut(n * n).enumerate().for_each(|(z, slab)| {
        for y in 0..n {
            for x in 0..n {
                slab[y * n + x] = lines[(y * n + x) * n + z];
            }
        }
    });

    let mut out_real = Vec::with_capacity(total);
    let mut out_imag = Vec::with_capacity(total);
    let mut energy = 0.0f64;
    for c in &buffer {
        out_real.push(c.re);
        out_imag.push(c.im);
        energy += (c.re as f64) * (c.re as f64) + (c.im as f64) * (c.im as f64);
    }

    Ok(Spectrum3d {
        real: out_real,
        imag: out_imag,
        energy,
    })
}
