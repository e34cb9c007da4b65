/// Spatial interpolation: sparse probability samples → dense grid.
///
/// The grid spans the region bounds with `nx × ny` nodes laid out as an
/// inclusive linspace per axis (both endpoints are nodes; 500×500 in the
/// reference configuration). Cells hold `Option<f64>`: `None` marks a cell
/// the chosen strategy could not define (outside the sample hull for the
/// spline), which is expected output, not an error.
///
/// Strategies behind the same Grid-producing contract:
/// - `idw`    — inverse-distance weighting, the primary estimator.
/// - `spline` — smooth-surface variant, undefined outside the sample hull.

pub mod idw;
pub mod spline;

pub use idw::{idw, IdwConfig};
pub use spline::{cubic_spline, cubic_spline_padded};

use crate::model::ForecastError;

// ---------------------------------------------------------------------------
// Region bounds
// ---------------------------------------------------------------------------

/// Rectangular region the probability surface is computed over,
/// [min_x, max_x] × [min_y, max_y].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Rejects non-finite or degenerate bounds. Configuration errors are
    /// fatal, so this runs before any interpolation starts.
    pub fn validate(&self) -> Result<(), ForecastError> {
        let values = [self.min_x, self.min_y, self.max_x, self.max_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidBounds(
                "bounds must be finite".to_string(),
            ));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(ForecastError::InvalidBounds(format!(
                "min must be strictly below max (got x: {}..{}, y: {}..{})",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Dense interpolated probability surface.
///
/// Indexed `(i, j)` with `i` along x and `j` along y, matching the source
/// field convention; storage is a flat vec in i-major order. Values are the
/// raw interpolation results — nothing clamps them back into [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    bounds: Bounds,
    cells: Vec<Option<f64>>,
}

impl Grid {
    /// An all-undefined grid over validated bounds. Each axis needs at
    /// least two nodes for the inclusive linspace to be well defined.
    pub(crate) fn undefined(bounds: Bounds, nx: usize, ny: usize) -> Result<Self, ForecastError> {
        bounds.validate()?;
        if nx < 2 || ny < 2 {
            return Err(ForecastError::InvalidBounds(format!(
                "resolution must be at least 2x2 (got {}x{})",
                nx, ny
            )));
        }
        Ok(Self {
            nx,
            ny,
            bounds,
            cells: vec![None; nx * ny],
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// x coordinate of column `i`: an inclusive linspace over
    /// [min_x, max_x].
    pub fn x_coord(&self, i: usize) -> f64 {
        self.bounds.min_x
            + (self.bounds.max_x - self.bounds.min_x) * i as f64 / (self.nx - 1) as f64
    }

    /// y coordinate of row `j`: an inclusive linspace over [min_y, max_y].
    pub fn y_coord(&self, j: usize) -> f64 {
        self.bounds.min_y
            + (self.bounds.max_y - self.bounds.min_y) * j as f64 / (self.ny - 1) as f64
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells[i * self.ny + j]
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: Option<f64>) {
        self.cells[i * self.ny + j] = value;
    }

    /// Number of cells holding a defined value.
    pub fn defined_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Min and max over defined cells; `None` if every cell is undefined.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for v in self.cells.iter().flatten() {
            range = Some(match range {
                None => (*v, *v),
                Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
            });
        }
        range
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
