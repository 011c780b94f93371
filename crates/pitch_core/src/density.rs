//! # Density Estimator
//!
//! Gaussian kernel density estimate of a coordinate series over the pitch.
//!
//! ## Algorithm
//! 1. Kernel covariance = sample covariance × (n^(-1/6) × bw_adjust)² (Scott's rule)
//! 2. Degenerate covariance (one point, collinear points) gets
//!    `min_bandwidth_m²` added to its diagonal
//! 3. Points are binned onto the evaluation grid, padded by the kernel
//!    radius (at most one grid width) so off-pitch points still contribute
//!    near the touchlines; points beyond the padding are dropped
//! 4. Each occupied bin spreads `count × kernel` over grid cells within 4σ
//!
//! The grid spans the full bounds; cell `(0, 0)` is the `(x_min, y_min)` corner.

use nalgebra::{Matrix2, Vector2};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

use crate::config::DensityConfig;
use crate::error::RenderError;
use crate::pitch::PitchBounds;
use crate::trajectory::CoordinateSeries;

/// Kernel truncation radius in standard deviations.
pub const KERNEL_RADIUS_SIGMA: f64 = 4.0;

/// Kernel covariance actually used for an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bandwidth {
    pub covariance: Matrix2<f64>,
    /// Scott factor times `bw_adjust`
    pub factor: f64,
    /// Whether the minimum bandwidth had to be applied
    pub regularized: bool,
}

impl Bandwidth {
    pub fn std_x(&self) -> f64 {
        self.covariance[(0, 0)].sqrt()
    }

    pub fn std_y(&self) -> f64 {
        self.covariance[(1, 1)].sqrt()
    }
}

/// Sample covariance of the series (zero matrix for a single point).
fn sample_covariance(series: &CoordinateSeries) -> Matrix2<f64> {
    let n = series.len();
    if n < 2 {
        return Matrix2::zeros();
    }

    let mean = series
        .points()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, (x, y)| acc + Vector2::new(x, y))
        / n as f64;

    let scatter = series.points().fold(Matrix2::zeros(), |acc: Matrix2<f64>, (x, y)| {
        let d = Vector2::new(x, y) - mean;
        acc + d * d.transpose()
    });

    scatter / (n - 1) as f64
}

/// Scott's-rule bandwidth for `n` two-dimensional points.
pub fn select_bandwidth(series: &CoordinateSeries, config: &DensityConfig) -> Bandwidth {
    let n = series.len().max(1) as f64;
    let factor = n.powf(-1.0 / 6.0) * config.bw_adjust;
    let mut covariance = sample_covariance(series) * (factor * factor);

    let min_var = config.min_bandwidth_m * config.min_bandwidth_m;
    let degenerate = !covariance.iter().all(|v| v.is_finite())
        || covariance.determinant() <= min_var * min_var * 1e-6;

    if degenerate {
        if !covariance.iter().all(|v| v.is_finite()) {
            covariance = Matrix2::zeros();
        }
        covariance += Matrix2::identity() * min_var;
    }

    Bandwidth { covariance, factor, regularized: degenerate }
}

#[derive(Debug, Clone, Serialize)]
pub struct DensityGrid {
    bounds: PitchBounds,
    cols: usize,
    rows: usize,
    cell_w: f64,
    cell_h: f64,
    /// Row-major, row 0 at `y_min`
    #[serde(skip)]
    values: Vec<f64>,
    bandwidth: Bandwidth,
    sample_count: usize,
}

impl DensityGrid {
    pub fn bounds(&self) -> &PitchBounds {
        &self.bounds
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn bandwidth(&self) -> &Bandwidth {
        &self.bandwidth
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn cell_area(&self) -> f64 {
        self.cell_w * self.cell_h
    }

    /// Pitch coordinates of the centre of cell `(col, row)`.
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.bounds.x_min + (col as f64 + 0.5) * self.cell_w,
            self.bounds.y_min + (row as f64 + 0.5) * self.cell_h,
        )
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Centre of the densest cell, `None` when no mass reached the grid.
    pub fn peak(&self) -> Option<(f64, f64)> {
        let (idx, max) = self
            .values
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        (max > 0.0).then(|| self.cell_center(idx % self.cols, idx / self.cols))
    }

    /// Riemann sum of the density over the grid (≈1 when all mass is on the pitch).
    pub fn integral(&self) -> f64 {
        self.values.iter().sum::<f64>() * self.cell_area()
    }

    /// Bilinear interpolation between cell centres; zero outside the bounds.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        if !self.bounds.contains(x, y) {
            return 0.0;
        }

        let fx = ((x - self.bounds.x_min) / self.cell_w - 0.5).clamp(0.0, (self.cols - 1) as f64);
        let fy = ((y - self.bounds.y_min) / self.cell_h - 0.5).clamp(0.0, (self.rows - 1) as f64);
        let c0 = fx.floor() as usize;
        let r0 = fy.floor() as usize;
        let c1 = (c0 + 1).min(self.cols - 1);
        let r1 = (r0 + 1).min(self.rows - 1);
        let tx = fx - c0 as f64;
        let ty = fy - r0 as f64;

        let at = |c: usize, r: usize| self.values[r * self.cols + c];
        let bottom = at(c0, r0) * (1.0 - tx) + at(c1, r0) * tx;
        let top = at(c0, r1) * (1.0 - tx) + at(c1, r1) * tx;
        bottom * (1.0 - ty) + top * ty
    }
}

/// Estimate the density surface of `series` over `bounds`.
pub fn estimate_density(
    series: &CoordinateSeries,
    bounds: &PitchBounds,
    config: &DensityConfig,
) -> Result<DensityGrid, RenderError> {
    if series.is_empty() {
        return Err(RenderError::EmptySeries);
    }

    let n = series.len();
    let bandwidth = select_bandwidth(series, config);
    let inverse = bandwidth.covariance.try_inverse().unwrap_or_else(Matrix2::identity);
    let norm = 1.0 / (2.0 * PI * bandwidth.covariance.determinant().sqrt() * n as f64);

    let cols = (bounds.width_m() / config.cell_size_m).ceil().max(1.0) as usize;
    let rows = (bounds.height_m() / config.cell_size_m).ceil().max(1.0) as usize;
    let cell_w = bounds.width_m() / cols as f64;
    let cell_h = bounds.height_m() / rows as f64;

    let raw_kx = (KERNEL_RADIUS_SIGMA * bandwidth.std_x() / cell_w).ceil() as usize;
    let raw_ky = (KERNEL_RADIUS_SIGMA * bandwidth.std_y() / cell_h).ceil() as usize;

    // Padding beyond one grid width and kernel reach beyond pad + grid can
    // never land on the grid
    let pad_x = raw_kx.min(cols);
    let pad_y = raw_ky.min(rows);
    let kx = raw_kx.min(pad_x + cols);
    let ky = raw_ky.min(pad_y + rows);

    // Kernel weights by cell offset, row-major over [-ky, ky] x [-kx, kx]
    let kw = 2 * kx + 1;
    let kh = 2 * ky + 1;
    let mut kernel = vec![0.0f64; kw * kh];
    for dj in 0..kh {
        for di in 0..kw {
            let d = Vector2::new(
                (di as f64 - kx as f64) * cell_w,
                (dj as f64 - ky as f64) * cell_h,
            );
            kernel[dj * kw + di] = norm * (-0.5 * (inverse * d).dot(&d)).exp();
        }
    }

    // Bin onto the padded grid
    let padded_cols = cols + 2 * pad_x;
    let padded_rows = rows + 2 * pad_y;
    let mut counts = vec![0u32; padded_cols * padded_rows];
    let mut dropped = 0usize;
    for (x, y) in series.points() {
        let pi = ((x - bounds.x_min) / cell_w).floor() + pad_x as f64;
        let pj = ((y - bounds.y_min) / cell_h).floor() + pad_y as f64;
        if !(0.0..padded_cols as f64).contains(&pi) || !(0.0..padded_rows as f64).contains(&pj) {
            dropped += 1;
            continue;
        }
        counts[pj as usize * padded_cols + pi as usize] += 1;
    }

    // Spread each occupied bin; grid index = padded index - pad + (offset - k)
    let shift_x = pad_x + kx;
    let shift_y = pad_y + ky;
    let mut values = vec![0.0f64; cols * rows];
    for (bin, &count) in counts.iter().enumerate().filter(|&(_, &c)| c > 0) {
        let bi = bin % padded_cols;
        let bj = bin / padded_cols;
        let weight = count as f64;

        let di_lo = shift_x.saturating_sub(bi);
        let di_hi = (shift_x + cols).saturating_sub(bi).min(kw);
        let dj_lo = shift_y.saturating_sub(bj);
        let dj_hi = (shift_y + rows).saturating_sub(bj).min(kh);

        for dj in dj_lo..dj_hi {
            let row = bj + dj - shift_y;
            for di in di_lo..di_hi {
                let col = bi + di - shift_x;
                values[row * cols + col] += weight * kernel[dj * kw + di];
            }
        }
    }

    debug!(
        samples = n,
        dropped,
        cols,
        rows,
        kernel_cells = kw * kh,
        std_x = bandwidth.std_x(),
        std_y = bandwidth.std_y(),
        regularized = bandwidth.regularized,
        "density estimated"
    );

    Ok(DensityGrid {
        bounds: *bounds,
        cols,
        rows,
        cell_w,
        cell_h,
        values,
        bandwidth,
        sample_count: n,
    })
}
