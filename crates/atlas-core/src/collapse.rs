//! Per-level tile assignment.
//!
//! Collapsing to a target level turns every subtree rooted at or below that
//! level into one tile. Leaves that stop short of the target level get a
//! synthetic tile: the cell of the implied `2^level` grid that contains
//! their first point. The tree itself is never modified, so one tree serves
//! every level of a build.

use crate::geometry::BBox;
use crate::quadtree::{Quadtree, QuadtreeNode};

#[derive(Debug, Clone)]
pub enum Tile<'a> {
    /// A tree node at or below the target level, covering its whole subtree.
    Real {
        node: &'a QuadtreeNode,
        members: Vec<usize>,
    },
    /// A shallow leaf reported as the fine grid cell its data falls in.
    Synthetic {
        anchor: BBox,
        leaf: &'a QuadtreeNode,
        members: Vec<usize>,
    },
}

impl Tile<'_> {
    pub fn bbox(&self) -> BBox {
        match self {
            Tile::Real { node, .. } => node.bbox,
            Tile::Synthetic { anchor, .. } => *anchor,
        }
    }

    /// Point ids in this tile.
    pub fn members(&self) -> &[usize] {
        match self {
            Tile::Real { members, .. } | Tile::Synthetic { members, .. } => members,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Tile::Synthetic { .. })
    }
}

/// Partition of all points into tiles at one level.
#[derive(Debug, Clone)]
pub struct TileAssignment<'a> {
    pub level: u32,
    pub tiles: Vec<Tile<'a>>,
    /// Tile index for each point id.
    pub point_to_tile: Vec<usize>,
}

impl TileAssignment<'_> {
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn point_count(&self) -> usize {
        self.point_to_tile.len()
    }
}

/// Grid cell of side `extent.width() / 2^level` containing the leaf's first point.
fn synthetic_anchor(extent: BBox, level: u32, leaf: &QuadtreeNode) -> BBox {
    let step = extent.width() / 2f64.powi(level as i32);
    let (x, y) = leaf
        .data
        .first()
        .map(|p| (p.x, p.y))
        .unwrap_or((leaf.bbox.x0, leaf.bbox.y0));
    let xi = ((x - extent.x0) / step).floor();
    let yi = ((y - extent.y0) / step).floor();
    let x0 = extent.x0 + xi * step;
    let y0 = extent.y0 + yi * step;
    BBox::new(x0, y0, x0 + step, y0 + step)
}

/// Assign every point to exactly one tile at `target_level`.
///
/// Tiles are numbered in depth-first, quadrant-order traversal. That order
/// is stable for a given tree but carries no meaning across trees.
pub fn collapse_to_level(tree: &Quadtree, target_level: u32) -> TileAssignment<'_> {
    let extent = tree.extent();
    let mut tiles = Vec::new();
    let mut point_to_tile = vec![usize::MAX; tree.len()];
    let mut stack = vec![tree.root()];

    while let Some(node) = stack.pop() {
        let tile_idx = tiles.len();

        let tile = if node.level >= target_level {
            let mut members = Vec::new();
            node.collect_ids(&mut members);
            Tile::Real { node, members }
        } else if node.is_leaf() {
            Tile::Synthetic {
                anchor: synthetic_anchor(extent, target_level, node),
                leaf: node,
                members: node.data.iter().map(|p| p.id).collect(),
            }
        } else {
            // Reverse push so children pop in quadrant order.
            stack.extend(node.child_nodes().collect::<Vec<_>>().into_iter().rev());
            continue;
        };

        for &id in tile.members() {
            point_to_tile[id] = tile_idx;
        }
        tiles.push(tile);
    }

    TileAssignment {
        level: target_level,
        tiles,
        point_to_tile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadtree::QuadtreeConfig;

    fn scenario_tree() -> Quadtree {
        Quadtree::from_coords(
            &[0.0, 0.1, 10.0, 10.1],
            &[0.0, 0.0, 10.0, 10.0],
            &QuadtreeConfig::default(),
        )
        .unwrap()
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_level_zero_is_single_tile() {
        let tree = scenario_tree();
        let a = collapse_to_level(&tree, 0);
        assert_eq!(a.tile_count(), 1);
        assert_eq!(a.tiles[0].bbox(), tree.extent());
        assert_eq!(sorted(a.tiles[0].members().to_vec()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_level_one_separates_clusters() {
        let tree = scenario_tree();
        let a = collapse_to_level(&tree, 1);
        assert_eq!(a.tile_count(), 2);
        assert_eq!(a.point_to_tile[0], a.point_to_tile[1]);
        assert_eq!(a.point_to_tile[2], a.point_to_tile[3]);
        assert_ne!(a.point_to_tile[0], a.point_to_tile[2]);
        assert!(a.tiles.iter().all(|t| !t.is_synthetic()));
    }

    #[test]
    fn test_deep_level_gives_one_tile_per_leaf() {
        let tree = scenario_tree();
        let a = collapse_to_level(&tree, 12);
        assert_eq!(a.tile_count(), 4);
        assert!(a.tiles.iter().all(Tile::is_synthetic));
        for tile in &a.tiles {
            assert_eq!(tile.members().len(), 1);
            assert_eq!(tile.bbox().width(), 16.0 / 4096.0);
        }
    }

    #[test]
    fn test_synthetic_anchor_contains_leaf_point() {
        let tree = Quadtree::from_coords(&[5.3], &[5.7], &QuadtreeConfig::default()).unwrap();
        for level in 1..6 {
            let a = collapse_to_level(&tree, level);
            assert_eq!(a.tile_count(), 1);
            let b = a.tiles[0].bbox();
            assert!(b.contains(5.3, 5.7), "level {level}: {b:?}");
            assert_eq!(b.width(), 1.0 / 2f64.powi(level as i32));
        }
    }

    #[test]
    fn test_partition_complete_at_every_level() {
        let xs: Vec<f64> = (0..60).map(|i| ((i * 37) % 101) as f64 / 7.0).collect();
        let ys: Vec<f64> = (0..60).map(|i| ((i * 53) % 97) as f64 / 5.0).collect();
        let tree = Quadtree::from_coords(&xs, &ys, &QuadtreeConfig::default()).unwrap();

        for level in 0..=tree.height() + 2 {
            let a = collapse_to_level(&tree, level);
            let mut seen = vec![0usize; xs.len()];
            for (idx, tile) in a.tiles.iter().enumerate() {
                for &id in tile.members() {
                    seen[id] += 1;
                    assert_eq!(a.point_to_tile[id], idx);
                }
            }
            assert!(seen.iter().all(|&c| c == 1), "level {level}");
        }
    }

    #[test]
    fn test_tree_reusable_across_levels() {
        let tree = scenario_tree();
        let first = collapse_to_level(&tree, 3).point_to_tile;
        let _ = collapse_to_level(&tree, 1);
        let again = collapse_to_level(&tree, 3).point_to_tile;
        assert_eq!(first, again);
    }
}
