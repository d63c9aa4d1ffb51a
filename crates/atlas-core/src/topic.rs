//! Multi-level topic summary: tile labels for every selected tree depth.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collapse::collapse_to_level;
use crate::config::MapConfig;
use crate::constants::{LABEL_SEPARATOR, LABEL_TERMS, TILE_DIGITS, TOPIC_DOMAIN_PAD};
use crate::error::{MapError, Result, check_len};
use crate::geometry::{BBox, min_max, round_to};
use crate::levels::{LevelRange, select_topic_levels};
use crate::quadtree::Quadtree;
use crate::terms::{TermCounts, TileTopic, rank_tile_terms};

/// `[center x, center y, label]` for one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEntry(pub f64, pub f64, pub String);

impl TopicEntry {
    fn from_tile(topic: &TileTopic) -> Self {
        let b = topic.bbox.rounded(TILE_DIGITS);
        let (cx, cy) = b.center();
        Self(
            round_to(cx, TILE_DIGITS),
            round_to(cy, TILE_DIGITS),
            topic.label(LABEL_TERMS, LABEL_SEPARATOR),
        )
    }

    pub fn label(&self) -> &str {
        &self.2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    /// Quadtree root box as `[[x0, y0], [x1, y1]]`.
    pub extent: [[f64; 2]; 2],
    /// Tile entries per level; levels serialize as string keys.
    pub data: BTreeMap<u32, Vec<TopicEntry>>,
    /// Viewer world domain `[xmin, ymin, xmax, ymax]`.
    pub range: [f64; 4],
}

/// Data bounds padded by [`TOPIC_DOMAIN_PAD`] on every side.
pub fn world_domain(xs: &[f64], ys: &[f64]) -> Option<BBox> {
    let (x_min, x_max) = min_max(xs)?;
    let (y_min, y_max) = min_max(ys)?;
    Some(BBox::new(
        x_min - TOPIC_DOMAIN_PAD,
        y_min - TOPIC_DOMAIN_PAD,
        x_max + TOPIC_DOMAIN_PAD,
        y_max + TOPIC_DOMAIN_PAD,
    ))
}

/// Build the tree, choose levels, and label each level's tiles.
pub fn generate_topic_summary<S: AsRef<str>>(
    xs: &[f64],
    ys: &[f64],
    texts: &[S],
    config: &MapConfig,
) -> Result<TopicSummary> {
    check_len("texts", xs.len(), texts.len())?;
    let tree = Quadtree::from_coords(xs, ys, &config.quadtree())?;
    let counts = TermCounts::from_texts(texts);
    let world = world_domain(xs, ys).ok_or(MapError::EmptyInput)?;
    let range = select_topic_levels(&config.viewport(), world, tree.extent());
    info!(
        min_level = range.min,
        max_level = range.max,
        height = tree.height(),
        vocabulary = counts.vocabulary.len(),
        "selected topic levels"
    );

    Ok(TopicSummary {
        extent: tree.extent().corners(),
        data: level_topics(&tree, &counts, range, config.top_k),
        range: [world.x0, world.y0, world.x1, world.y1],
    })
}

/// Every level is collapsed from the full tree independently.
pub fn level_topics(
    tree: &Quadtree,
    counts: &TermCounts,
    range: LevelRange,
    top_k: usize,
) -> BTreeMap<u32, Vec<TopicEntry>> {
    range
        .levels()
        .map(|level| {
            let assignment = collapse_to_level(tree, level);
            let topics = rank_tile_terms(counts, &assignment, top_k);
            debug!(level, tiles = topics.len(), "labeled level");
            (level, topics.iter().map(TopicEntry::from_tile).collect())
        })
        .collect()
}
