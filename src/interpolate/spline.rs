/// Smooth-surface interpolation variant.
///
/// Fits a thin-plate spline through the probability samples and evaluates
/// it at every grid node inside the convex hull of the samples. Nodes
/// outside the hull stay undefined — the smooth surface has no support
/// there, and representing that honestly is part of the contract.
///
/// `cubic_spline_padded` additionally seeds the region's four corners and
/// four edge midpoints with the mean sample probability before fitting, so
/// the hull covers the whole rectangle and every cell gets a value. The
/// padding is a stabilization heuristic inherited from the field workflow;
/// it does not produce calibrated probabilities near the borders and the
/// tests treat it accordingly.

use crate::interpolate::{Bounds, Grid};
use crate::model::{ForecastError, ProbabilitySample};

/// Thin-plate spline surface over the sample hull.
///
/// Zero samples fail with `InsufficientSamples` (same policy as `idw`).
/// Fewer than three distinct, non-collinear samples span no area, so every
/// cell comes back undefined.
pub fn cubic_spline(
    samples: &[ProbabilitySample],
    bounds: Bounds,
    resolution: (usize, usize),
) -> Result<Grid, ForecastError> {
    if samples.is_empty() {
        return Err(ForecastError::InsufficientSamples);
    }
    fit_and_evaluate(samples, bounds, resolution)
}

/// The padded variant: samples plus eight synthetic boundary points
/// (corners and edge midpoints) carrying the mean sample probability.
pub fn cubic_spline_padded(
    samples: &[ProbabilitySample],
    bounds: Bounds,
    resolution: (usize, usize),
) -> Result<Grid, ForecastError> {
    if samples.is_empty() {
        return Err(ForecastError::InsufficientSamples);
    }
    bounds.validate()?;

    let mean: f64 =
        samples.iter().map(|s| s.probability).sum::<f64>() / samples.len() as f64;
    let mid_x = (bounds.min_x + bounds.max_x) / 2.0;
    let mid_y = (bounds.min_y + bounds.max_y) / 2.0;

    let border = [
        (bounds.min_x, bounds.min_y),
        (bounds.min_x, bounds.max_y),
        (bounds.max_x, bounds.min_y),
        (bounds.max_x, bounds.max_y),
        (mid_x, bounds.min_y),
        (mid_x, bounds.max_y),
        (bounds.min_x, mid_y),
        (bounds.max_x, mid_y),
    ];

    let mut padded = samples.to_vec();
    padded.extend(border.iter().map(|&(x, y)| ProbabilitySample {
        x,
        y,
        probability: mean,
    }));

    fit_and_evaluate(&padded, bounds, resolution)
}

fn fit_and_evaluate(
    samples: &[ProbabilitySample],
    bounds: Bounds,
    resolution: (usize, usize),
) -> Result<Grid, ForecastError> {
    let (nx, ny) = resolution;
    let mut grid = Grid::undefined(bounds, nx, ny)?;

    // Exact duplicate coordinates would make the system singular; keep the
    // first occurrence, matching the exact-match tie-break in idw.
    let mut distinct: Vec<ProbabilitySample> = Vec::with_capacity(samples.len());
    for s in samples {
        if !distinct.iter().any(|d| d.x == s.x && d.y == s.y) {
            distinct.push(*s);
        }
    }

    let hull = convex_hull(&distinct);
    if hull.len() < 3 {
        // Collinear or near-empty sample set spans no area: nothing inside
        // a hull to evaluate.
        return Ok(grid);
    }

    let Some(spline) = ThinPlateSpline::fit(&distinct) else {
        return Ok(grid);
    };

    let tolerance = hull_tolerance(&hull);
    for i in 0..nx {
        let x = grid.x_coord(i);
        for j in 0..ny {
            let y = grid.y_coord(j);
            if point_in_hull(x, y, &hull, tolerance) {
                grid.set(i, j, Some(spline.evaluate(x, y)));
            }
        }
    }

    Ok(grid)
}

// ---------------------------------------------------------------------------
// Thin-plate spline fit
// ---------------------------------------------------------------------------

struct ThinPlateSpline {
    centers: Vec<(f64, f64)>,
    /// One radial weight per center followed by the affine part
    /// [a0, a1, a2].
    coefficients: Vec<f64>,
}

impl ThinPlateSpline {
    /// Solves the (n + 3) interpolation system. Returns `None` if the
    /// system is numerically singular, which only happens for degenerate
    /// geometry the hull check did not rule out.
    fn fit(samples: &[ProbabilitySample]) -> Option<Self> {
        let n = samples.len();
        let dim = n + 3;

        let mut matrix = vec![vec![0.0; dim]; dim];
        let mut rhs = vec![0.0; dim];

        for (i, si) in samples.iter().enumerate() {
            for (j, sj) in samples.iter().enumerate() {
                let dx = si.x - sj.x;
                let dy = si.y - sj.y;
                matrix[i][j] = kernel(dx * dx + dy * dy);
            }
            matrix[i][n] = 1.0;
            matrix[i][n + 1] = si.x;
            matrix[i][n + 2] = si.y;
            matrix[n][i] = 1.0;
            matrix[n + 1][i] = si.x;
            matrix[n + 2][i] = si.y;
            rhs[i] = si.probability;
        }

        let coefficients = solve(matrix, rhs)?;
        Some(Self {
            centers: samples.iter().map(|s| (s.x, s.y)).collect(),
            coefficients,
        })
    }

    fn evaluate(&self, x: f64, y: f64) -> f64 {
        let n = self.centers.len();
        let mut value = self.coefficients[n]
            + self.coefficients[n + 1] * x
            + self.coefficients[n + 2] * y;
        for (k, &(cx, cy)) in self.centers.iter().enumerate() {
            let dx = x - cx;
            let dy = y - cy;
            value += self.coefficients[k] * kernel(dx * dx + dy * dy);
        }
        value
    }
}

/// Thin-plate radial kernel U(r) = r² ln r, expressed on the squared
/// distance to skip the square root: ½ r² ln r².
fn kernel(r2: f64) -> f64 {
    if r2 == 0.0 { 0.0 } else { 0.5 * r2 * r2.ln() }
}

/// Gaussian elimination with partial pivoting. Returns `None` when a pivot
/// collapses (singular system).
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if matrix[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for col in (row + 1)..n {
            acc -= matrix[row][col] * solution[col];
        }
        solution[row] = acc / matrix[row][row];
    }
    Some(solution)
}

// ---------------------------------------------------------------------------
// Convex hull
// ---------------------------------------------------------------------------

/// Andrew's monotone chain; returns the hull counter-clockwise. Collinear
/// inputs collapse to fewer than three vertices.
fn convex_hull(samples: &[ProbabilitySample]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
    points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    points.dedup();

    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<(f64, f64)> = Vec::new();
    for &p in &points {
        while lower.len() >= 2
            && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(f64, f64)> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2
            && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Tolerance for the inside-hull test, scaled to the hull's extent so grid
/// nodes sitting exactly on a hull edge count as inside despite rounding.
fn hull_tolerance(hull: &[(f64, f64)]) -> f64 {
    let extent = hull
        .iter()
        .map(|&(x, y)| x.abs().max(y.abs()))
        .fold(1.0_f64, f64::max);
    1e-9 * extent * extent
}

fn point_in_hull(x: f64, y: f64, hull: &[(f64, f64)], tolerance: f64) -> bool {
    for k in 0..hull.len() {
        let a = hull[k];
        let b = hull[(k + 1) % hull.len()];
        if cross(a, b, (x, y)) < -tolerance {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
