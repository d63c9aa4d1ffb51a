//! Zoom-level selection.
//!
//! A viewer zoomed by `scale` shows the tree extent at
//! `scale * svg_length * tree_to_world` pixels; at depth `l` one tile is that
//! divided by `2^l`. Each scale in the sweep picks the depth whose tile
//! width is nearest the ideal, and the selected range spans all picks.

use std::ops::RangeInclusive;

use crate::constants::{MAX_TOPIC_LEVEL, MIN_TOPIC_LEVEL, ZOOM_STEP};
use crate::geometry::BBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub svg_width: f64,
    pub svg_height: f64,
    pub max_zoom_scale: f64,
    pub ideal_tile_width: f64,
}

/// Inclusive range of tree depths worth materializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: u32,
    pub max: u32,
}

impl LevelRange {
    pub fn levels(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

/// Depth in `[1, 20]` whose tile width at `svg_scaled_length` is closest to
/// `ideal`; the shallowest depth wins a tie.
fn best_level(svg_scaled_length: f64, ideal: f64) -> u32 {
    let mut best = MIN_TOPIC_LEVEL;
    let mut best_diff = f64::INFINITY;
    for level in MIN_TOPIC_LEVEL..=MAX_TOPIC_LEVEL {
        let tile_width = svg_scaled_length / 2f64.powi(level as i32);
        let diff = (tile_width - ideal).abs();
        if diff < best_diff {
            best_diff = diff;
            best = level;
        }
    }
    best
}

/// Number of scales in the sweep `1, 1.5, 2, ..` that stay within `max`.
fn sweep_steps(max: f64) -> u64 {
    if max >= 1.0 {
        ((max - 1.0) / ZOOM_STEP).floor() as u64 + 1
    } else {
        0
    }
}

/// Sweep scales `1, 1.5, 2, ..` up to `max_zoom_scale` and return the
/// min and max of each scale's best depth.
///
/// `world` is the data domain the viewer maps onto the viewport, `extent`
/// the quadtree root box.
pub fn select_topic_levels(viewport: &Viewport, world: BBox, extent: BBox) -> LevelRange {
    let svg_length = viewport.svg_width.max(viewport.svg_height);
    let world_length = world.width().max(world.height());
    let tree_to_world = extent.width() / world_length;

    let mut range = LevelRange {
        min: MAX_TOPIC_LEVEL,
        max: MIN_TOPIC_LEVEL,
    };
    let steps = sweep_steps(viewport.max_zoom_scale);
    for i in 0..steps {
        let scale = 1.0 + i as f64 * ZOOM_STEP;
        let level = best_level(scale * svg_length * tree_to_world, viewport.ideal_tile_width);
        range.min = range.min.min(level);
        range.max = range.max.max(level);
        // Best depth only grows with scale.
        if level == MAX_TOPIC_LEVEL {
            break;
        }
    }

    if steps == 0 {
        // A zoom ceiling below 1 still needs the unzoomed view.
        let level = best_level(svg_length * tree_to_world, viewport.ideal_tile_width);
        range = LevelRange {
            min: level,
            max: level,
        };
    }
    range
}
