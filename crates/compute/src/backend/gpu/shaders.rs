//! WGSL sources for the accelerated tier
//!
//! The noise library mirrors the scalar kernels in `fluxcube-noise` so the
//! GPU tier stays statistically consistent with the CPU tiers. Hashes use the
//! same u32 arithmetic; only the interpolation precision differs (f32 here,
//! f64 on the CPU).

/// Noise lattice fill: one invocation per cell
pub const NOISE_WGSL: &str = r#"
struct Params {
    size: u32,
    kind: u32,
    octaves: u32,
    seed: u32,
    scale: f32,
    persistence: f32,
    _pad0: f32,
    _pad1: f32,
}

@group(0) @binding(0) var<uniform> uniforms: Params;
@group(0) @binding(1) var<storage, read_write> field: array<f32>;

// Hash function for gradient lookup (matches the CPU kernel)
fn grad_hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let h = x + y * 57 + z * 113 + i32(seed);
    let uh = u32(h) * 0x27d4eb2du;
    return uh ^ (uh >> 15u);
}

// Fade function for smooth interpolation: 6t^5 - 15t^4 + 10t^3
fn fade(t: f32) -> f32 {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

fn grad_dir(h: u32) -> vec3<f32> {
    switch (h % 12u) {
        case 0u: { return vec3<f32>(1.0, 1.0, 0.0); }
        case 1u: { return vec3<f32>(-1.0, 1.0, 0.0); }
        case 2u: { return vec3<f32>(1.0, -1.0, 0.0); }
        case 3u: { return vec3<f32>(-1.0, -1.0, 0.0); }
        case 4u: { return vec3<f32>(1.0, 0.0, 1.0); }
        case 5u: { return vec3<f32>(-1.0, 0.0, 1.0); }
        case 6u: { return vec3<f32>(1.0, 0.0, -1.0); }
        case 7u: { return vec3<f32>(-1.0, 0.0, -1.0); }
        case 8u: { return vec3<f32>(0.0, 1.0, 1.0); }
        case 9u: { return vec3<f32>(0.0, -1.0, 1.0); }
        case 10u: { return vec3<f32>(0.0, 1.0, -1.0); }
        default: { return vec3<f32>(0.0, -1.0, -1.0); }
    }
}

// Gradient noise 3D, range approximately [-1, 1]
fn gradient_noise(p: vec3<f32>, seed: u32) -> f32 {
    let xi = i32(floor(p.x));
    let yi = i32(floor(p.y));
    let zi = i32(floor(p.z));

    let xf = p.x - floor(p.x);
    let yf = p.y - floor(p.y);
    let zf = p.z - floor(p.z);

    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    let g000 = dot(grad_dir(grad_hash(xi, yi, zi, seed)), vec3<f32>(xf, yf, zf));
    let g100 = dot(grad_dir(grad_hash(xi + 1, yi, zi, seed)), vec3<f32>(xf - 1.0, yf, zf));
    let g010 = dot(grad_dir(grad_hash(xi, yi + 1, zi, seed)), vec3<f32>(xf, yf - 1.0, zf));
    let g110 = dot(grad_dir(grad_hash(xi + 1, yi + 1, zi, seed)), vec3<f32>(xf - 1.0, yf - 1.0, zf));
    let g001 = dot(grad_dir(grad_hash(xi, yi, zi + 1, seed)), vec3<f32>(xf, yf, zf - 1.0));
    let g101 = dot(grad_dir(grad_hash(xi + 1, yi, zi + 1, seed)), vec3<f32>(xf - 1.0, yf, zf - 1.0));
    let g011 = dot(grad_dir(grad_hash(xi, yi + 1, zi + 1, seed)), vec3<f32>(xf, yf - 1.0, zf - 1.0));
    let g111 = dot(grad_dir(grad_hash(xi + 1, yi + 1, zi + 1, seed)), vec3<f32>(xf - 1.0, yf - 1.0, zf - 1.0));

    let x00 = mix(g000, g100, u);
    let x01 = mix(g001, g101, u);
    let x10 = mix(g010, g110, u);
    let x11 = mix(g011, g111, u);

    let y0 = mix(x00, x10, v);
    let y1 = mix(x01, x11, v);

    return mix(y0, y1, w);
}

// Octave-summed gradient noise remapped into [0, 1]
fn gradient_fractal(p: vec3<f32>, octaves: u32, persistence: f32, seed: u32) -> f32 {
    var value = 0.0;
    var amplitude = 1.0;
    var frequency = 1.0;
    var max_value = 0.0;

    for (var k = 0u; k < octaves; k = k + 1u) {
        let offset = f32(k) * 0.3719;
        value = value + amplitude * gradient_noise(p * frequency + vec3<f32>(offset, offset, offset), seed + k);
        max_value = max_value + amplitude;
        amplitude = amplitude * persistence;
        frequency = frequency * 2.0;
    }

    if (max_value > 0.0) {
        value = value / max_value;
    }
    return clamp(value * 0.5 + 0.5, 0.0, 1.0);
}

// Per-cell feature point hash (matches the CPU kernel)
fn cell_hash(cx: i32, cy: i32, cz: i32, seed: u32, channel: u32) -> f32 {
    var h = (u32(cx) * 0x8da6b343u) ^ (u32(cy) * 0xd8163841u) ^ (u32(cz) * 0xcb1ab31fu)
        ^ (seed * 0x9e3779b9u) ^ (channel * 0x85ebca6bu);
    h = h ^ (h >> 13u);
    h = h * 0x27d4eb2du;
    h = h ^ (h >> 15u);
    return f32(h & 0xffffffu) / 16777216.0;
}

// Distances to the nearest and second-nearest feature points
fn cell_distances(p: vec3<f32>, seed: u32) -> vec2<f32> {
    let ix = i32(floor(p.x));
    let iy = i32(floor(p.y));
    let iz = i32(floor(p.z));

    var f1 = 1e30;
    var f2 = 1e30;

    for (var dx = -1; dx <= 1; dx = dx + 1) {
        for (var dy = -1; dy <= 1; dy = dy + 1) {
            for (var dz = -1; dz <= 1; dz = dz + 1) {
                let cx = ix + dx;
                let cy = iy + dy;
                let cz = iz + dz;
                let feature = vec3<f32>(
                    f32(cx) + cell_hash(cx, cy, cz, seed, 0u),
                    f32(cy) + cell_hash(cx, cy, cz, seed, 1u),
                    f32(cz) + cell_hash(cx, cy, cz, seed, 2u),
                );
                let dist = distance(p, feature);
                if (dist < f1) {
                    f2 = f1;
                    f1 = dist;
                } else if (dist < f2) {
                    f2 = dist;
                }
            }
        }
    }

    return vec2<f32>(f1, f2);
}

// Octave-summed cell noise; difference selects F2 - F1
fn cell_fractal(p: vec3<f32>, octaves: u32, persistence: f32, seed: u32, difference: u32) -> f32 {
    var value = 0.0;
    var amplitude = 1.0;
    var frequency = 1.0;
    var max_value = 0.0;

    for (var k = 0u; k < octaves; k = k + 1u) {
        let d = cell_distances(p * frequency, seed + k);
        var term = d.x;
        if (difference == 1u) {
            term = d.y - d.x;
        }
        value = value + amplitude * term;
        max_value = max_value + amplitude;
        amplitude = amplitude * persistence;
        frequency = frequency * 2.0;
    }

    if (max_value > 0.0) {
        value = value / max_value;
    }
    return value;
}

@compute @workgroup_size(8, 8, 8)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let size = uniforms.size;
    if (gid.x >= size || gid.y >= size || gid.z >= size) {
        return;
    }

    // Half-cell offset, matching the CPU tiers
    let p = (vec3<f32>(gid) + vec3<f32>(0.5, 0.5, 0.5)) / uniforms.scale;

    var value = 0.0;
    if (uniforms.kind == 0u) {
        value = gradient_fractal(p, uniforms.octaves, uniforms.persistence, uniforms.seed);
    } else if (uniforms.kind == 1u) {
        value = cell_fractal(p, uniforms.octaves, uniforms.persistence, uniforms.seed, 0u);
    } else {
        value = cell_fractal(p, uniforms.octaves, uniforms.persistence, uniforms.seed, 1u);
    }

    let idx = gid.z * size * size + gid.y * size + gid.x;
    field[idx] = value;
}
"#;

/// One direct 1D DFT pass along a configurable axis
///
/// Dispatched three times (X, Y, Z) with ping-ponged buffers; each invocation
/// computes one output element by summing its line. Numerically equivalent to
/// the CPU FFT within f32 tolerance.
pub const DFT_WGSL: &str = r#"
struct Params {
    n: u32,
    axis: u32,
    _pad0: u32,
    _pad1: u32,
}

@group(0) @binding(0) var<storage, read> input: array<vec2<f32>>;
@group(0) @binding(1) var<storage, read_write> output: array<vec2<f32>>;
@group(0) @binding(2) var<uniform> params: Params;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
    let n = params.n;
    let total = n * n * n;
    let idx = gid.x;
    if (idx >= total) {
        return;
    }

    let x = idx % n;
    let y = (idx / n) % n;
    let z = idx / (n * n);

    var j = 0u;
    var stride = 0u;
    var base = 0u;
    if (params.axis == 0u) {
        j = x;
        stride = 1u;
        base = z * n * n + y * n;
    } else if (params.axis == 1u) {
        j = y;
        stride = n;
        base = z * n * n + x;
    } else {
        j = z;
        stride = n * n;
        base = y * n + x;
    }

    var acc = vec2<f32>(0.0, 0.0);
    for (var k = 0u; k < n; k = k + 1u) {
        let v = input[base + k * stride];
        // Reduce j*k modulo n before the angle to keep f32 precision
        let angle = -6.283185307179586 * f32((j * k) % n) / f32(n);
        let c = cos(angle);
        let s = sin(angle);
        acc = acc + vec2<f32>(v.x * c - v.y * s, v.x * s + v.y * c);
    }

    output[idx] = acc;
}
"#;
