//! Debug script to plot best-candidate points next to plain uniform draws

use std::fs::File;
use std::io::Write;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use terrain_tiles::sampler::{nearest_distance_squared, BestCandidateSampler, Point};
use terrain_tiles::Result;

const PLOT_COLS: usize = 96;
const PLOT_ROWS: usize = 32;

fn main() -> Result<()> {
    terrain_tiles::logging::init();

    let width = 960.0;
    let height = 640.0;
    let count = 120;
    let seed = 12345u64;

    let sampler = BestCandidateSampler::default();
    let spread = sampler.generate_seeded(width, height, count, seed)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let uniform: Vec<Point> = (0..count)
        .map(|_| Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect();

    let mut file = File::create("sampler_debug.txt")?;

    writeln!(file, "=== BEST-CANDIDATE DEBUG ({}x{}) n={} seed={} ===", width, height, count, seed)?;
    writeln!(file, "Candidates per round: {}", sampler.candidate_count(width))?;
    writeln!(file)?;

    for (label, points) in [("BEST-CANDIDATE", &spread), ("UNIFORM", &uniform)] {
        let (min, mean) = spacing_stats(points);
        writeln!(file, "{}: min spacing {:.1}, mean nearest {:.1}", label, min, mean)?;
        for line in plot(points, width, height) {
            writeln!(file, "{}", line)?;
        }
        writeln!(file)?;
    }

    println!("Wrote sampler_debug.txt");
    Ok(())
}

/// Smallest and mean nearest-neighbor distance over the set.
fn spacing_stats(points: &[Point]) -> (f64, f64) {
    let nearest: Vec<f64> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let others = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, o)| o);
            nearest_distance_squared(p, others).sqrt()
        })
        .filter(|d| d.is_finite())
        .collect();

    if nearest.is_empty() {
        return (0.0, 0.0);
    }
    let min = nearest.iter().cloned().fold(f64::INFINITY, f64::min);
    let mean = nearest.iter().sum::<f64>() / nearest.len() as f64;
    (min, mean)
}

fn plot(points: &[Point], width: f64, height: f64) -> Vec<String> {
    let mut grid = vec![vec!['.'; PLOT_COLS]; PLOT_ROWS];
    for p in points {
        let col = ((p.x / width) * PLOT_COLS as f64) as usize;
        let row = ((p.y / height) * PLOT_ROWS as f64) as usize;
        let cell = &mut grid[row.min(PLOT_ROWS - 1)][col.min(PLOT_COLS - 1)];
        *cell = if *cell == '.' { 'o' } else { '8' };
    }
    // Plot with y up
    grid.into_iter().rev().map(|row| row.into_iter().collect()).collect()
}
