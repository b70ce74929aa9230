//! Gradient noise kernel
//!
//! Classic lattice-gradient interpolation noise with a deterministic,
//! seed-perturbed gradient table. Matches the GPU (WGSL) version for
//! statistical consistency.

/// Gradient vectors for 3D noise
const GRADIENTS: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Hash function for gradient lookup
#[inline]
fn grad_hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let h = x
        .wrapping_add(y.wrapping_mul(57))
        .wrapping_add(z.wrapping_mul(113))
        .wrapping_add(seed as i32);
    let h = (h as u32).wrapping_mul(0x27d4eb2d);
    h ^ (h >> 15)
}

/// Dot product of the hashed corner gradient and the distance vector
#[inline]
fn grad_dot(hash: u32, x: f64, y: f64, z: f64) -> f64 {
    let g = &GRADIENTS[(hash % 12) as usize];
    g[0] * x + g[1] * y + g[2] * z
}

/// Fade function for smooth interpolation: 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Gradient noise 3D
///
/// Returns values in approximately [-1, 1]. Deterministic in `(x, y, z, seed)`.
pub fn gradient_noise(x: f64, y: f64, z: f64, seed: u32) -> f64 {
    // Integer coordinates
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let zi = z.floor() as i32;

    // Fractional coordinates
    let xf = x - xi as f64;
    let yf = y - yi as f64;
    let zf = z - zi as f64;

    // Fade curves for interpolation
    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    // Gradient dot products at the cube corners
    let g000 = grad_dot(grad_hash(xi, yi, zi, seed), xf, yf, zf);
    let g100 = grad_dot(grad_hash(xi + 1, yi, zi, seed), xf - 1.0, yf, zf);
    let g010 = grad_dot(grad_hash(xi, yi + 1, zi, seed), xf, yf - 1.0, zf);
    let g110 = grad_dot(grad_hash(xi + 1, yi + 1, zi, seed), xf - 1.0, yf - 1.0, zf);
    let g001 = grad_dot(grad_hash(xi, yi, zi + 1, seed), xf, yf, zf - 1.0);
    let g101 = grad_dot(grad_hash(xi + 1, yi, zi + 1, seed), xf - 1.0, yf, zf - 1.0);
    let g011 = grad_dot(grad_hash(xi, yi + 1, zi + 1, seed), xf, yf - 1.0, zf - 1.0);
    let g111 = grad_dot(
        grad_hash(xi + 1, yi + 1, zi + 1, seed),
        xf - 1.0,
        yf - 1.0,
        zf - 1.0,
    );

    // Trilinear interpolation
    let x00 = lerp(g000, g100, u);
    let x01 = lerp(g001, g101, u);
    let x10 = lerp(g010, g110, u);
    let x11 = lerp(g011, g111, u);

    let y0 = lerp(x00, x10, v);
    let y1 = lerp(x01, x11, v);

    lerp(y0, y1, w)
}

/// Octave-summed gradient noise, remapped into [0, 1]
///
/// Octave `k` contributes with amplitude `persistence^k` at frequency `2^k`.
/// The per-octave offset keeps higher octaves off the integer lattice so they
/// never degenerate to zero when the base coordinates are integral.
pub fn gradient_fractal(x: f64, y: f64, z: f64, octaves: u32, persistence: f64, seed: u32) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for k in 0..octaves {
        let octave_seed = seed.wrapping_add(k);
        let offset = k as f64 * 0.3719;
        value += amplitude
            * gradient_noise(
                x * frequency + offset,
                y * frequency + offset,
                z * frequency + offset,
                octave_seed,
            );
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 {
        value /= max_value;
    }

    // Map from [-1, 1] to [0, 1]
    (value * 0.5 + 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_noise_range() {
        for seed in [0, 42, 12345] {
            for i in 0..200 {
                let x = (i as f64) * 0.17;
                let y = (i as f64) * 0.07;
                let z = (i as f64) * 0.13;
                let v = gradient_noise(x, y, z, seed);
                assert!(
                    (-1.0..=1.0).contains(&v),
                    "gradient_noise({}, {}, {}, {}) = {} out of range",
                    x,
                    y,
                    z,
                    seed,
                    v
                );
            }
        }
    }

    #[test]
    fn test_gradient_noise_deterministic() {
        let v1 = gradient_noise(1.5, 2.3, 3.7, 42);
        let v2 = gradient_noise(1.5, 2.3, 3.7, 42);
        assert!((v1 - v2).abs() < 1e-12);
    }

    #[test]
    fn test_gradient_noise_seed_divergence() {
        let mut diffs = 0;
        for i in 0..100 {
            let t = (i as f64) * 0.31 + 0.05;
            let a = gradient_noise(t, t * 0.7, t * 1.3, 1);
            let b = gradient_noise(t, t * 0.7, t * 1.3, 2);
            if (a - b).abs() > 0.01 {
                diffs += 1;
            }
        }
        assert!(diffs > 50, "only {diffs}/100 samples diverged across seeds");
    }

    #[test]
    fn test_gradient_fractal_unit_range() {
        for i in 0..200 {
            let t = (i as f64) * 0.11;
            let v = gradient_fractal(t, t * 0.5, t * 0.9, 4, 0.5, 7);
            assert!((0.0..=1.0).contains(&v), "fractal value {} out of [0,1]", v);
        }
    }

    #[test]
    fn test_gradient_fractal_octaves_stay_live_on_integer_lattice() {
        // Integer base coordinates must not collapse higher octaves to zero.
        let mut distinct = std::collections::HashSet::new();
        for x in 0..16 {
            let v = gradient_fractal(x as f64, 3.0, 5.0, 4, 0.5, 9);
            distinct.insert((v * 1e9) as i64);
        }
        assert!(distinct.len() > 8);
    }

    #[test]
    fn test_gradient_noise_continuity() {
        let mut prev = gradient_noise(0.0, 0.0, 0.0, 42);
        for i in 1..200 {
            let t = (i as f64) * 0.01;
            let curr = gradient_noise(t, 0.0, 0.0, 42);
            assert!(
                (curr - prev).abs() < 0.5,
                "noise jump too large at t={}: {} -> {}",
                t,
                prev,
                curr
            );
            prev = curr;
        }
    }
}
