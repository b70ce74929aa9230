//! Cell-distance (Worley) noise kernels
//!
//! Scatters one deterministic, jittered feature point per unit cell and
//! measures Euclidean distance from the sample point to the nearest points in
//! the surrounding 27-cell neighborhood. Distances are reported in cell units:
//! F1 stays below ~1.7, so callers must tolerate values up to ~2.0.

use glam::DVec3;

/// Per-cell feature point hash
///
/// `channel` selects the x/y/z jitter stream for the cell. Pure u32 arithmetic
/// so the WGSL version can mirror it exactly.
#[inline]
fn cell_hash(cx: i32, cy: i32, cz: i32, seed: u32, channel: u32) -> f64 {
    let mut h = (cx as u32)
        .wrapping_mul(0x8da6_b343)
        ^ (cy as u32).wrapping_mul(0xd816_3841)
        ^ (cz as u32).wrapping_mul(0xcb1a_b31f)
        ^ seed.wrapping_mul(0x9e37_79b9)
        ^ channel.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 15;
    (h & 0x00ff_ffff) as f64 / 16_777_216.0
}

/// Jittered feature point of a cell
#[inline]
fn feature_point(cx: i32, cy: i32, cz: i32, seed: u32) -> DVec3 {
    DVec3::new(
        cx as f64 + cell_hash(cx, cy, cz, seed, 0),
        cy as f64 + cell_hash(cx, cy, cz, seed, 1),
        cz as f64 + cell_hash(cx, cy, cz, seed, 2),
    )
}

/// Distances to the nearest (F1) and second-nearest (F2) feature points
pub fn cell_distances(x: f64, y: f64, z: f64, seed: u32) -> (f64, f64) {
    let p = DVec3::new(x, y, z);
    let ix = x.floor() as i32;
    let iy = y.floor() as i32;
    let iz = z.floor() as i32;

    let mut f1 = f64::INFINITY;
    let mut f2 = f64::INFINITY;

    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let feature = feature_point(ix + dx, iy + dy, iz + dz, seed);
                let dist = p.distance(feature);
                if dist < f1 {
                    f2 = f1;
                    f1 = dist;
                } else if dist < f2 {
                    f2 = dist;
                }
            }
        }
    }

    (f1, f2)
}

/// Worley F1: distance to the nearest feature point
pub fn cell_distance(x: f64, y: f64, z: f64, seed: u32) -> f64 {
    cell_distances(x, y, z, seed).0
}

/// Worley F2 - F1: thin ridge-like crack patterns along cell boundaries
pub fn cell_distance_diff(x: f64, y: f64, z: f64, seed: u32) -> f64 {
    let (f1, f2) = cell_distances(x, y, z, seed);
    f2 - f1
}

/// Octave-summed cell noise
///
/// Same octave contract as the gradient kernel: amplitude `persistence^k`,
/// frequency `2^k`, normalized by the accumulated amplitude so the output
/// stays in the nominal single-octave range.
pub fn cell_fractal(
    x: f64,
    y: f64,
    z: f64,
    octaves: u32,
    persistence: f64,
    seed: u32,
    difference: bool,
) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for k in 0..octaves {
        let octave_seed = seed.wrapping_add(k);
        let sample = if difference {
            cell_distance_diff(x * frequency, y * frequency, z * frequency, octave_seed)
        } else {
            cell_distance(x * frequency, y * frequency, z * frequency, octave_seed)
        };
        value += amplitude * sample;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 {
        value / max_value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_distance_non_negative() {
        for i in 0..200 {
            let t = (i as f64) * 0.23;
            let v = cell_distance(t, t * 0.6, t * 1.4, 42);
            assert!(v >= 0.0, "F1 distance {} negative", v);
            assert!(v < 2.0, "F1 distance {} beyond neighborhood bound", v);
        }
    }

    #[test]
    fn test_cell_distance_diff_non_negative() {
        // F2 >= F1 by construction, so the difference is never negative.
        for i in 0..200 {
            let t = (i as f64) * 0.19 + 0.02;
            let v = cell_distance_diff(t, t * 0.8, t * 0.3, 7);
            assert!(v >= 0.0, "F2-F1 {} negative", v);
        }
    }

    #[test]
    fn test_cell_distances_ordered() {
        let (f1, f2) = cell_distances(3.3, 1.7, 8.1, 11);
        assert!(f1 <= f2);
        assert!(f1.is_finite() && f2.is_finite());
    }

    #[test]
    fn test_cell_deterministic() {
        let a = cell_distance(1.2, 3.4, 5.6, 99);
        let b = cell_distance(1.2, 3.4, 5.6, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cell_seed_divergence() {
        let mut diffs = 0;
        for i in 0..100 {
            let t = (i as f64) * 0.37 + 0.11;
            let a = cell_distance(t, t * 1.1, t * 0.4, 1);
            let b = cell_distance(t, t * 1.1, t * 0.4, 2);
            if (a - b).abs() > 0.01 {
                diffs += 1;
            }
        }
        assert!(diffs > 50, "only {diffs}/100 samples diverged across seeds");
    }

    #[test]
    fn test_cell_fractal_bounded() {
        for i in 0..100 {
            let t = (i as f64) * 0.29;
            let v = cell_fractal(t, t * 0.5, t * 0.7, 3, 0.5, 5, false);
            assert!(v >= 0.0 && v < 2.0, "fractal F1 {} out of bounds", v);
        }
    }
}
