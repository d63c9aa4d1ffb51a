//! Gaussian kernel density grids.
//!
//! The domain is squared around the data before rasterizing so a viewer can
//! draw the grid without stretching it. Every group grid shares the global
//! domain, which keeps group overlays spatially comparable.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{DENSITY_DIGITS, DOMAIN_PAD_RATIO, KERNEL_CUTOFF};
use crate::error::{MapError, Result, check_len};
use crate::geometry::{BBox, min_max, round_to};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityOptions {
    pub grid_size: usize,
    pub max_sample: usize,
    pub random_seed: u64,
    pub domain_margin: f64,
}

/// Points split into named groups by label index.
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    pub labels: &'a [usize],
    pub names: &'a [String],
}

pub type Grid = Vec<Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityGrid {
    pub grid: Grid,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub padded: bool,
    pub sample_size: usize,
    pub total_point_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_grids: Option<BTreeMap<String, Grid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_total_point_sizes: Option<BTreeMap<String, usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_names: Option<Vec<String>>,
}

/// Square, centered domain around the data.
///
/// The wider axis (x counts `margin` extra when comparing) is padded by
/// `1/50` of its gap on each side; the other axis is then padded evenly to
/// the same span.
pub fn padded_domain(xs: &[f64], ys: &[f64], margin: f64) -> Result<BBox> {
    let (mut x_min, mut x_max) = min_max(xs).ok_or(MapError::EmptyInput)?;
    let (mut y_min, mut y_max) = min_max(ys).ok_or(MapError::EmptyInput)?;

    let x_gap = x_max - x_min + margin;
    let y_gap = y_max - y_min;

    if x_gap <= 0.0 && y_gap <= 0.0 {
        return Ok(BBox::new(x_min - 0.5, y_min - 0.5, x_max + 0.5, y_max + 0.5));
    }

    if x_gap > y_gap {
        x_min -= x_gap * DOMAIN_PAD_RATIO;
        x_max += x_gap * DOMAIN_PAD_RATIO;
        let extra = ((x_max - x_min) - (y_max - y_min)) / 2.0;
        y_min -= extra;
        y_max += extra;
    } else {
        y_min -= y_gap * DOMAIN_PAD_RATIO;
        y_max += y_gap * DOMAIN_PAD_RATIO;
        let extra = ((y_max - y_min) - (x_max - x_min)) / 2.0;
        x_min -= extra;
        x_max += extra;
    }
    Ok(BBox::new(x_min, y_min, x_max, y_max))
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
        .collect()
}

/// Scott's rule for two dimensions: `(n (d + 2) / 4)^(-1 / (d + 4))`.
pub fn bandwidth(n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }
    let d = 2.0;
    Some((n as f64 * (d + 2.0) / 4.0).powf(-1.0 / (d + 4.0)))
}

/// Indices kept for density fitting: all of them, or a seeded uniform
/// sample without replacement when there are more than `max_sample`.
pub fn subsample(n: usize, max_sample: usize, seed: u64) -> Vec<usize> {
    if n <= max_sample {
        return (0..n).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, n, max_sample).into_vec();
    picked.sort_unstable();
    picked
}

/// Indices into `axis` whose values lie within `[lo, hi]`.
fn window(axis: &[f64], lo: f64, hi: f64) -> std::ops::Range<usize> {
    let start = axis.partition_point(|&v| v < lo);
    let end = axis.partition_point(|&v| v <= hi);
    start..end.max(start)
}

/// Average gaussian kernel over the sample, evaluated on the lattice.
/// `grid[row][col]` is the density at `(grid_xs[col], grid_ys[row])`.
fn kde_grid(xs: &[f64], ys: &[f64], grid_xs: &[f64], grid_ys: &[f64]) -> Grid {
    let mut grid = vec![vec![0.0; grid_xs.len()]; grid_ys.len()];
    let Some(h) = bandwidth(xs.len()) else {
        return grid;
    };

    let reach = KERNEL_CUTOFF * h;
    let inv_two_h2 = 1.0 / (2.0 * h * h);
    for (&px, &py) in xs.iter().zip(ys) {
        let cols = window(grid_xs, px - reach, px + reach);
        for row in window(grid_ys, py - reach, py + reach) {
            let dy = grid_ys[row] - py;
            let cells = &mut grid[row];
            for col in cols.clone() {
                let dx = grid_xs[col] - px;
                cells[col] += (-(dx * dx + dy * dy) * inv_two_h2).exp();
            }
        }
    }

    let norm = 1.0 / (xs.len() as f64 * 2.0 * PI * h * h);
    for value in grid.iter_mut().flatten() {
        *value = round_to(*value * norm, DENSITY_DIGITS);
        if *value == 0.0 {
            // Drop the sign of -0.0 left by rounding.
            *value = 0.0;
        }
    }
    grid
}

struct Lattice {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Lattice {
    fn new(domain: BBox, size: usize) -> Self {
        Self {
            xs: linspace(domain.x0, domain.x1, size),
            ys: linspace(domain.y0, domain.y1, size),
        }
    }

    /// Density of the subsampled points. Returns the grid and sample size.
    fn fit(&self, xs: &[f64], ys: &[f64], options: &DensityOptions) -> (Grid, usize) {
        let keep = subsample(xs.len(), options.max_sample, options.random_seed);
        let sx: Vec<f64> = keep.iter().map(|&i| xs[i]).collect();
        let sy: Vec<f64> = keep.iter().map(|&i| ys[i]).collect();
        (kde_grid(&sx, &sy, &self.xs, &self.ys), keep.len())
    }
}

/// Fail fast on mismatched group labels before any grid is computed.
fn check_groups(n: usize, groups: &Groups<'_>) -> Result<()> {
    check_len("labels", n, groups.labels.len())?;
    let unique: BTreeSet<usize> = groups.labels.iter().copied().collect();
    if unique.len() != groups.names.len() {
        return Err(MapError::GroupCountMismatch {
            unique_labels: unique.len(),
            group_names: groups.names.len(),
        });
    }
    Ok(())
}

/// Density grid over the padded domain, plus one grid per group when
/// `groups` is given.
pub fn generate_density_grid(
    xs: &[f64],
    ys: &[f64],
    groups: Option<Groups<'_>>,
    options: &DensityOptions,
) -> Result<DensityGrid> {
    check_len("ys", xs.len(), ys.len())?;
    if let Some(g) = &groups {
        check_groups(xs.len(), g)?;
    }

    let domain = padded_domain(xs, ys, options.domain_margin)?;
    let lattice = Lattice::new(domain, options.grid_size);
    let (grid, sample_size) = lattice.fit(xs, ys, options);
    debug!(
        sample_size,
        total = xs.len(),
        grid_size = options.grid_size,
        "fitted density grid"
    );

    let mut density = DensityGrid {
        grid,
        x_range: [domain.x0, domain.x1],
        y_range: [domain.y0, domain.y1],
        padded: true,
        sample_size,
        total_point_size: xs.len(),
        group_grids: None,
        group_total_point_sizes: None,
        group_names: None,
    };

    if let Some(g) = groups {
        let mut grids = BTreeMap::new();
        let mut totals = BTreeMap::new();
        for (label, name) in g.names.iter().enumerate() {
            let members: Vec<usize> = (0..xs.len()).filter(|&i| g.labels[i] == label).collect();
            if members.is_empty() {
                warn!(group = %name, "group has no points, emitting an empty grid");
            }
            let gx: Vec<f64> = members.iter().map(|&i| xs[i]).collect();
            let gy: Vec<f64> = members.iter().map(|&i| ys[i]).collect();
            let (grid, _) = lattice.fit(&gx, &gy, options);
            grids.insert(name.clone(), grid);
            totals.insert(name.clone(), members.len());
        }
        density.group_grids = Some(grids);
        density.group_total_point_sizes = Some(totals);
        density.group_names = Some(g.names.to_vec());
    }

    Ok(density)
}
