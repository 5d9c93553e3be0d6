//! Best-candidate (blue-noise) point sampling
//!
//! Mitchell's best-candidate algorithm: every round draws a batch of random
//! candidates and keeps the one farthest from everything placed so far.
//! Eight anchors on the rectangle boundary (corners and edge midpoints) take
//! part in the distance test but are never returned, which keeps points off
//! the edges.
//!
//! Cost is O(n * candidates * (n + 8)), quadratic in `n`. Fine for the
//! hundred-or-so points resource placement asks for; large `n` needs a
//! spatial index.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Candidates drawn per round, per unit of rectangle width.
pub const DEFAULT_CANDIDATES_PER_WIDTH: f64 = 10.0;

/// A point in rectangle-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Best-candidate sampler configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestCandidateSampler {
    /// Candidates per round = max(1, floor(width * candidates_per_width))
    pub candidates_per_width: f64,
}

impl Default for BestCandidateSampler {
    fn default() -> Self {
        Self {
            candidates_per_width: DEFAULT_CANDIDATES_PER_WIDTH,
        }
    }
}

impl BestCandidateSampler {
    pub fn new(candidates_per_width: f64) -> Self {
        Self { candidates_per_width }
    }

    /// Candidates drawn each round for a rectangle of `width`.
    pub fn candidate_count(&self, width: f64) -> usize {
        ((width * self.candidates_per_width).floor() as usize).max(1)
    }

    /// Generate `n` well-spread points in `[0, width) x [0, height)`.
    ///
    /// The first point is a single uniform draw; each later point is the
    /// best of [`Self::candidate_count`] uniform candidates.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: f64,
        height: f64,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Point>> {
        if n < 1 {
            return Err(MapError::invalid("point count must be >= 1"));
        }
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(MapError::invalid(format!(
                "rectangle must have positive finite size, got {}x{}",
                width, height
            )));
        }
        if !self.candidates_per_width.is_finite() || self.candidates_per_width <= 0.0 {
            return Err(MapError::invalid(format!(
                "candidates_per_width must be > 0, got {}",
                self.candidates_per_width
            )));
        }

        let anchors = boundary_anchors(width, height);
        let candidates = self.candidate_count(width);

        let mut accepted = Vec::with_capacity(n);
        accepted.push(random_point(width, height, rng));

        while accepted.len() < n {
            let batch = (0..candidates).map(|_| random_point(width, height, rng));
            let (best, _) = best_candidate(batch, accepted.iter().chain(anchors.iter()))
                .ok_or_else(|| MapError::invalid("no candidates drawn"))?;
            accepted.push(best);
        }

        debug!(
            "Best-candidate: {} points in {:.1}x{:.1} ({} candidates/round)",
            n, width, height, candidates
        );
        Ok(accepted)
    }

    /// [`Self::generate`] with a reproducible ChaCha8 stream.
    pub fn generate_seeded(&self, width: f64, height: f64, n: usize, seed: u64) -> Result<Vec<Point>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(width, height, n, &mut rng)
    }

    /// [`Self::generate`] with OS-seeded randomness; not reproducible.
    pub fn generate_random(&self, width: f64, height: f64, n: usize) -> Result<Vec<Point>> {
        self.generate(width, height, n, &mut rand::thread_rng())
    }
}

/// Corners and edge midpoints of the rectangle.
pub fn boundary_anchors(width: f64, height: f64) -> [Point; 8] {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    [
        Point::new(0.0, 0.0),
        Point::new(0.0, half_h),
        Point::new(0.0, height),
        Point::new(half_w, 0.0),
        Point::new(half_w, height),
        Point::new(width, 0.0),
        Point::new(width, half_h),
        Point::new(width, height),
    ]
}

/// Smallest squared distance from `point` to any of `others`.
pub fn nearest_distance_squared<'a>(point: &Point, others: impl IntoIterator<Item = &'a Point>) -> f64 {
    others
        .into_iter()
        .map(|o| point.distance_squared(o))
        .fold(f64::INFINITY, f64::min)
}

/// Pick the candidate whose nearest existing point is farthest away.
///
/// Returns the winner and its nearest squared distance. Ties keep the
/// earliest candidate. `None` only when `candidates` is empty.
pub fn best_candidate<'a, C, E>(candidates: C, existing: E) -> Option<(Point, f64)>
where
    C: IntoIterator<Item = Point>,
    E: IntoIterator<Item = &'a Point> + Clone,
{
    let mut best: Option<(Point, f64)> = None;
    for candidate in candidates {
        let distance = nearest_distance_squared(&candidate, existing.clone());
        match best {
            Some((_, best_distance)) if distance <= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best
}

fn random_point<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Point {
    Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height))
}
