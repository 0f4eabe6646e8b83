//! Seeded 2D value noise.
//!
//! Lattice corners are hashed with the SplitMix finaliser and blended with a
//! smoothstep curve. Value noise, not gradient noise.

use crate::rng::{mix64, unit_f64};

const LATTICE_X: u64 = 0x9e37_79b9_7f4a_7c15;
const LATTICE_Y: u64 = 0xc2b2_ae3d_27d4_eb4f;

fn lattice(seed: u64, ix: i64, iy: i64) -> f64 {
    let n = seed
        ^ (ix as u64).wrapping_mul(LATTICE_X)
        ^ (iy as u64).wrapping_mul(LATTICE_Y).rotate_left(17);
    unit_f64(mix64(n))
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Value noise in `[0, 1)` at `(x / scale, y / scale)`.
pub fn noise2d(seed: u64, x: f64, y: f64, scale: f64) -> f64 {
    let sx = x / scale;
    let sy = y / scale;
    let gx = sx.floor();
    let gy = sy.floor();
    let ix = gx as i64;
    let iy = gy as i64;

    let ux = smoothstep(sx - gx);
    let uy = smoothstep(sy - gy);

    let v00 = lattice(seed, ix, iy);
    let v10 = lattice(seed, ix + 1, iy);
    let v01 = lattice(seed, ix, iy + 1);
    let v11 = lattice(seed, ix + 1, iy + 1);

    let top = v00 + ux * (v10 - v00);
    let bottom = v01 + ux * (v11 - v01);
    top + uy * (bottom - top)
}

/// Fractal sum of `octaves` layers, normalised by total amplitude.
pub fn octave_noise(seed: u64, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += noise2d(seed, x * frequency, y * frequency, 1.0) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value == 0.0 {
        0.0
    } else {
        total / max_value
    }
}
