/// Inverse-distance-weighted interpolation.
///
/// Every grid node gets the distance-weighted average of all sample
/// probabilities, weight = 1 / distance^power. A node that coincides
/// exactly with a sample takes that sample's value directly (first sample
/// by input order on ties), which also avoids the division by zero.
///
/// Per-node computation is independent, so rows are fanned out across a
/// thread pool; each worker owns a disjoint set of columns and the result
/// is assembled by index. The per-node arithmetic is a fixed-order scan
/// over the samples, so repeated calls with identical inputs produce
/// bit-identical grids regardless of worker count or scheduling.

use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use threadpool::ThreadPool;

use crate::interpolate::{Bounds, Grid};
use crate::model::{ForecastError, ProbabilitySample};

/// Tuning for an IDW run.
#[derive(Debug, Clone)]
pub struct IdwConfig {
    /// Distance exponent. 2 is the standard choice; 1 softens the
    /// influence of distance.
    pub power: f64,
    /// Worker threads for the row fan-out.
    pub workers: usize,
    /// Soft wall-clock budget. When exceeded the call returns
    /// `DeadlineExceeded` instead of a partial grid.
    pub deadline: Option<Duration>,
}

impl Default for IdwConfig {
    fn default() -> Self {
        Self {
            power: 2.0,
            workers: 4,
            deadline: None,
        }
    }
}

/// Interpolates samples onto an `nx × ny` grid over `bounds`.
///
/// Fails fast with `InsufficientSamples` when no samples are supplied (the
/// documented policy — never a silently all-undefined grid) and with
/// `InvalidBounds` for degenerate bounds or a sub-2×2 resolution.
pub fn idw(
    samples: &[ProbabilitySample],
    bounds: Bounds,
    resolution: (usize, usize),
    config: &IdwConfig,
) -> Result<Grid, ForecastError> {
    let (nx, ny) = resolution;
    let mut grid = Grid::undefined(bounds, nx, ny)?;
    if samples.is_empty() {
        return Err(ForecastError::InsufficientSamples);
    }

    let pool = ThreadPool::new(config.workers.max(1));
    let (tx, rx) = mpsc::channel();
    let shared: Arc<Vec<ProbabilitySample>> = Arc::new(samples.to_vec());

    for i in 0..nx {
        let tx = tx.clone();
        let samples = Arc::clone(&shared);
        let power = config.power;
        let x = grid.x_coord(i);
        let ys: Vec<f64> = (0..ny).map(|j| grid.y_coord(j)).collect();

        pool.execute(move || {
            let column: Vec<f64> = ys
                .iter()
                .map(|&y| node_value(x, y, &samples, power))
                .collect();
            // The receiver only disappears on early return; nothing to do
            // then but discard the column.
            let _ = tx.send((i, column));
        });
    }
    drop(tx);

    let deadline = config.deadline.map(|d| Instant::now() + d);
    for _ in 0..nx {
        let (i, column) = match deadline {
            Some(end) => {
                let remaining = end
                    .checked_duration_since(Instant::now())
                    .ok_or(ForecastError::DeadlineExceeded)?;
                rx.recv_timeout(remaining)
                    .map_err(|_| ForecastError::DeadlineExceeded)?
            }
            None => rx
                .recv()
                .expect("interpolation worker dropped without sending its column"),
        };
        for (j, value) in column.into_iter().enumerate() {
            grid.set(i, j, Some(value));
        }
    }

    Ok(grid)
}

/// The IDW estimate at a single point. The exact-match short-circuit
/// returns the first zero-distance sample in input order.
fn node_value(x: f64, y: f64, samples: &[ProbabilitySample], power: f64) -> f64 {
    let mut weight_sum = 0.0;
    let mut weighted = 0.0;

    for sample in samples {
        let dx = sample.x - x;
        let dy = sample.y - y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 {
            return sample.probability;
        }
        let w = 1.0 / dist.powf(power);
        weight_sum += w;
        weighted += w * sample.probability;
    }

    weighted / weight_sum
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, p: f64) -> ProbabilitySample {
        ProbabilitySample { x, y, probability: p }
    }

    const BOUNDS: Bounds = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 10.0,
        max_y: 10.0,
    };

    #[test]
    fn test_midpoint_between_two_samples_averages_them() {
        // Samples at (0,0)=0.2 and (10,0)=0.8; the node at (5,0) is 5 away
        // from each, so both weights are 1/25 and the value is 0.5.
        let samples = vec![sample(0.0, 0.0, 0.2), sample(10.0, 0.0, 0.8)];
        let grid = idw(&samples, BOUNDS, (3, 3), &IdwConfig::default()).unwrap();

        let mid = grid.get(1, 0).unwrap();
        assert!((mid - 0.5).abs() < 1e-12, "expected 0.5, got {}", mid);
    }

    #[test]
    fn test_node_on_sample_returns_sample_exactly_for_any_power() {
        let samples = vec![sample(0.0, 0.0, 0.37), sample(10.0, 10.0, 0.9)];
        for power in [1.0, 2.0, 3.5] {
            let config = IdwConfig {
                power,
                ..IdwConfig::default()
            };
            let grid = idw(&samples, BOUNDS, (3, 3), &config).unwrap();
            assert_eq!(grid.get(0, 0), Some(0.37));
            assert_eq!(grid.get(2, 2), Some(0.9));
        }
    }

    #[test]
    fn test_duplicate_zero_distance_samples_first_wins() {
        let samples = vec![sample(0.0, 0.0, 0.1), sample(0.0, 0.0, 0.99)];
        let grid = idw(&samples, BOUNDS, (2, 2), &IdwConfig::default()).unwrap();
        assert_eq!(grid.get(0, 0), Some(0.1));
    }

    #[test]
    fn test_idempotent_across_runs_and_worker_counts() {
        let samples: Vec<ProbabilitySample> = (0..7)
            .map(|k| sample(k as f64 * 1.3, (k * k % 9) as f64, 0.1 * k as f64))
            .collect();

        let one = IdwConfig {
            workers: 1,
            ..IdwConfig::default()
        };
        let many = IdwConfig {
            workers: 8,
            ..IdwConfig::default()
        };

        let a = idw(&samples, BOUNDS, (21, 17), &one).unwrap();
        let b = idw(&samples, BOUNDS, (21, 17), &many).unwrap();
        let c = idw(&samples, BOUNDS, (21, 17), &many).unwrap();

        assert_eq!(a, b, "grid must not depend on worker count");
        assert_eq!(b, c, "repeated runs must be bit-identical");
    }

    #[test]
    fn test_every_cell_defined() {
        let samples = vec![sample(2.0, 2.0, 0.4)];
        let grid = idw(&samples, BOUNDS, (6, 6), &IdwConfig::default()).unwrap();
        assert_eq!(grid.defined_count(), 36);
    }

    #[test]
    fn test_single_sample_gives_flat_surface() {
        // With one sample every weight cancels: the surface equals the
        // sample's probability everywhere.
        let samples = vec![sample(3.0, 7.0, 0.66)];
        let grid = idw(&samples, BOUNDS, (5, 5), &IdwConfig::default()).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                assert!((grid.get(i, j).unwrap() - 0.66).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_samples_is_a_hard_error() {
        let result = idw(&[], BOUNDS, (4, 4), &IdwConfig::default());
        assert_eq!(result.unwrap_err(), ForecastError::InsufficientSamples);
    }

    #[test]
    fn test_values_are_not_clamped() {
        // Probabilities outside [0,1] pass through the weighted average
        // untouched.
        let samples = vec![sample(0.0, 0.0, -0.5), sample(10.0, 10.0, 1.5)];
        let grid = idw(&samples, BOUNDS, (3, 3), &IdwConfig::default()).unwrap();
        assert_eq!(grid.get(0, 0), Some(-0.5));
        let (lo, hi) = grid.value_range().unwrap();
        assert!(lo < 0.0 && hi > 1.0);
    }

    #[test]
    fn test_generous_deadline_completes() {
        let samples = vec![sample(1.0, 1.0, 0.2), sample(9.0, 9.0, 0.8)];
        let config = IdwConfig {
            deadline: Some(Duration::from_secs(30)),
            ..IdwConfig::default()
        };
        let grid = idw(&samples, BOUNDS, (10, 10), &config).unwrap();
        assert_eq!(grid.defined_count(), 100);
    }

    #[test]
    fn test_expired_deadline_reports_not_completed() {
        // A large enough workload that it cannot finish inside an
        // already-expired budget; no partial grid comes back.
        let samples: Vec<ProbabilitySample> = (0..200)
            .map(|k| sample((k % 11) as f64, (k % 7) as f64, 0.005 * k as f64))
            .collect();
        let config = IdwConfig {
            deadline: Some(Duration::from_secs(0)),
            ..IdwConfig::default()
        };
        let result = idw(&samples, BOUNDS, (256, 256), &config);
        assert_eq!(result.unwrap_err(), ForecastError::DeadlineExceeded);
    }
}
