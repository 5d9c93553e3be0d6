//! Seeded 2D gradient (Perlin) noise
//!
//! The permutation table is built once per seed and is read-only afterwards,
//! so one `GradientNoise` can be sampled from several threads at once.
//!
//! Native range of [`GradientNoise::sample`] is [0, 1]. The signed form,
//! [`GradientNoise::sample_signed`] (and the `noise::NoiseFn` impl), returns
//! [-1, 1] and is exactly 0 on integer lattice points.

use std::fmt;

use noise::{NoiseFn, Seedable};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TABLE_SIZE: usize = 256;

/// Four diagonals and four axes. With these the signed output stays in [-1, 1].
const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Seeded gradient noise field.
#[derive(Clone)]
pub struct GradientNoise {
    seed: u32,
    /// Shuffled 0..=255, stored twice so lookups at `xi + 1` need no wrap.
    perm: [u8; TABLE_SIZE * 2],
}

impl GradientNoise {
    /// Build the permutation table for `seed` with a seeded Fisher-Yates shuffle.
    pub fn new(seed: u32) -> Self {
        let mut base: Vec<u8> = (0..=255u8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        base.shuffle(&mut rng);

        let mut perm = [0u8; TABLE_SIZE * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i % TABLE_SIZE];
        }

        Self { seed, perm }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Noise value in [0, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        (self.sample_signed(x, y) + 1.0) * 0.5
    }

    /// Noise value in [-1, 1].
    pub fn sample_signed(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();

        // Lattice cell, wrapped into the table
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;

        // Position inside the cell
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let aa = self.hash(xi, yi);
        let ba = self.hash(xi + 1, yi);
        let ab = self.hash(xi, yi + 1);
        let bb = self.hash(xi + 1, yi + 1);

        let bottom = lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf));
        let top = lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0));

        lerp(v, bottom, top).clamp(-1.0, 1.0)
    }

    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }
}

/// Quintic fade curve 6t^5 - 15t^4 + 10t^3.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, dx: f64, dy: f64) -> f64 {
    let (gx, gy) = GRADIENTS[(hash & 7) as usize];
    gx * dx + gy * dy
}

impl fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientNoise").field("seed", &self.seed).finish()
    }
}

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample_signed(point[0], point[1])
    }
}

impl Seedable for GradientNoise {
    fn set_seed(self, seed: u32) -> Self {
        if self.seed == seed {
            return self;
        }
        GradientNoise::new(seed)
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}
