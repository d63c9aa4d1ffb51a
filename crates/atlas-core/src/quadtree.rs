//! Adaptive point quadtree.
//!
//! The root covers the data with a power-of-two square anchored at the
//! floored minimum corner. Nodes quarter their box and hand their points
//! to the four children until each leaf holds at most `node_capacity`
//! points, all of its points are coincident, or `max_depth` is reached.
//! Boxes are always exact quadrants of the parent, never refitted to data.

use crate::constants::{MAX_DEPTH, NODE_CAPACITY};
use crate::error::{MapError, Result, check_len};
use crate::geometry::{BBox, min_max};

/// A projected point; `id` is its position in the input columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub id: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct QuadtreeConfig {
    pub node_capacity: usize,
    pub max_depth: u32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            node_capacity: NODE_CAPACITY,
            max_depth: MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuadtreeNode {
    pub bbox: BBox,
    pub level: u32,
    /// Child slots in quadrant order; empty quadrants are `None`.
    pub children: [Option<Box<QuadtreeNode>>; 4],
    /// Points held by a leaf. Always empty on internal nodes.
    pub data: Vec<Point>,
}

impl QuadtreeNode {
    fn build(bbox: BBox, level: u32, points: Vec<Point>, config: &QuadtreeConfig) -> Self {
        let splittable = points.len() > config.node_capacity
            && level < config.max_depth
            && !all_coincident(&points);

        if !splittable {
            return Self {
                bbox,
                level,
                children: [None, None, None, None],
                data: points,
            };
        }

        let mut buckets: [Vec<Point>; 4] = Default::default();
        for p in points {
            buckets[bbox.quadrant_of(p.x, p.y)].push(p);
        }

        let mut children: [Option<Box<QuadtreeNode>>; 4] = [None, None, None, None];
        for (i, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                children[i] = Some(Box::new(Self::build(
                    bbox.quadrant(i),
                    level + 1,
                    bucket,
                    config,
                )));
            }
        }

        Self {
            bbox,
            level,
            children,
            data: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Present children in quadrant order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &QuadtreeNode> {
        self.children.iter().flatten().map(|c| c.as_ref())
    }

    /// Ids of every point in this subtree, leaves visited in quadrant order.
    pub fn collect_ids(&self, out: &mut Vec<usize>) {
        if self.is_leaf() {
            out.extend(self.data.iter().map(|p| p.id));
        } else {
            for child in self.child_nodes() {
                child.collect_ids(out);
            }
        }
    }

    /// Deepest leaf level in this subtree.
    pub fn height(&self) -> u32 {
        self.child_nodes()
            .map(QuadtreeNode::height)
            .max()
            .unwrap_or(self.level)
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.child_nodes().map(QuadtreeNode::leaf_count).sum()
        }
    }
}

fn all_coincident(points: &[Point]) -> bool {
    match points.first() {
        Some(first) => points.iter().all(|p| p.x == first.x && p.y == first.y),
        None => true,
    }
}

/// Square covering `[xmin, xmax] x [ymin, ymax]` with half-open upper edges.
fn cover(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> BBox {
    let x0 = xmin.floor();
    let y0 = ymin.floor();
    let mut side = 1.0;
    while xmax >= x0 + side || ymax >= y0 + side {
        side *= 2.0;
    }
    BBox::new(x0, y0, x0 + side, y0 + side)
}

/// Immutable quadtree built once per artifact.
#[derive(Debug, Clone)]
pub struct Quadtree {
    root: QuadtreeNode,
    len: usize,
}

impl Quadtree {
    /// Build from parallel coordinate columns; ids are column positions.
    pub fn from_coords(xs: &[f64], ys: &[f64], config: &QuadtreeConfig) -> Result<Self> {
        check_len("ys", xs.len(), ys.len())?;
        let points: Vec<Point> = xs
            .iter()
            .zip(ys)
            .enumerate()
            .map(|(id, (&x, &y))| Point { x, y, id })
            .collect();
        Self::build(points, config)
    }

    fn build(points: Vec<Point>, config: &QuadtreeConfig) -> Result<Self> {
        if points.is_empty() {
            return Err(MapError::EmptyInput);
        }
        if let Some(bad) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(MapError::NonFiniteCoordinate { index: bad.id });
        }

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let (xmin, xmax) = min_max(&xs).ok_or(MapError::EmptyInput)?;
        let (ymin, ymax) = min_max(&ys).ok_or(MapError::EmptyInput)?;

        let len = points.len();
        let root = QuadtreeNode::build(cover(xmin, ymin, xmax, ymax), 0, points, config);
        Ok(Self { root, len })
    }

    pub fn root(&self) -> &QuadtreeNode {
        &self.root
    }

    /// Root bounding box.
    pub fn extent(&self) -> BBox {
        self.root.bbox
    }

    /// Max depth of any leaf; 0 when the root is a leaf.
    pub fn height(&self) -> u32 {
        self.root.height()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
