use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows and columns of a raster layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub const MAX_CELLS: usize = 4096 * 4096;

    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total cell count, or `None` on overflow.
    pub fn cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Half-open rectangle of cells: rows `row_start..row_end`, cols `col_start..col_end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl CellRect {
    pub const fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..self.row_end).contains(&row) && (self.col_start..self.col_end).contains(&col)
    }

    pub fn fits_within(&self, shape: GridShape) -> bool {
        self.row_start <= self.row_end
            && self.col_start <= self.col_end
            && self.row_end <= shape.rows
            && self.col_end <= shape.cols
    }

    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.row_end - self.row_start) * (self.col_end - self.col_start)
        }
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.row_start, self.row_end, self.col_start, self.col_end
        )
    }
}

/// Row-major 2D field of `f64` values.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    #[cfg(test)]
    pub(crate) fn filled(shape: GridShape, value: f64) -> Self {
        Self::from_fn(shape, |_, _| value)
    }

    /// Build a grid by evaluating `f(row, col)` in row-major order.
    pub fn from_fn(shape: GridShape, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(shape.rows * shape.cols);
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                data.push(f(row, col));
            }
        }
        Self {
            rows: shape.rows,
            cols: shape.cols,
            data,
        }
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "cell out of range");
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "cell out of range");
        self.data[row * self.cols + col] = value;
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// Add `delta` to every cell of `region`. The caller guarantees the region fits.
    pub fn add_to_region(&mut self, region: &CellRect, delta: f64) {
        debug_assert!(region.fits_within(self.shape()));
        for row in region.row_start..region.row_end {
            let start = row * self.cols;
            for v in &mut self.data[start + region.col_start..start + region.col_end] {
                *v += delta;
            }
        }
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    pub fn std_dev(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .data
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }

    /// `(min, max)` over all cells; `(0.0, 0.0)` for an empty grid.
    pub fn min_max(&self) -> (f64, f64) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Mean over the cells inside `region` and the mean over the cells outside it.
    pub fn region_means(&self, region: &CellRect) -> (f64, f64) {
        let (mut inside, mut n_inside) = (0.0, 0usize);
        let (mut outside, mut n_outside) = (0.0, 0usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let v = self.data[row * self.cols + col];
                if region.contains(row, col) {
                    inside += v;
                    n_inside += 1;
                } else {
                    outside += v;
                    n_outside += 1;
                }
            }
        }
        let avg = |sum: f64, n: usize| if n == 0 { 0.0 } else { sum / n as f64 };
        (avg(inside, n_inside), avg(outside, n_outside))
    }
}
