//! Multi-resolution map summaries for 2D-projected text points.
//!
//! Builds a kernel density grid over the point cloud and a quadtree of
//! tiles labeled with each tile's most distinctive terms, at every tree
//! depth a zoomable viewer is expected to request.
//!
//! Zero I/O: inputs arrive as columns, outputs are serde types.

pub mod artifact;
pub mod collapse;
pub mod config;
pub mod constants;
pub mod density;
pub mod error;
pub mod geometry;
pub mod levels;
pub mod quadtree;
pub mod records;
pub mod table;
pub mod terms;
pub mod tokenizer;
pub mod topic;

pub use artifact::{GridArtifact, build_grid_artifact};
pub use collapse::{Tile, TileAssignment, collapse_to_level};
pub use config::{ImageConfig, MapConfig};
pub use density::{DensityGrid, DensityOptions, Groups, generate_density_grid};
pub use error::{MapError, Result};
pub use geometry::BBox;
pub use levels::{LevelRange, Viewport, select_topic_levels};
pub use quadtree::{Point, Quadtree, QuadtreeConfig, QuadtreeNode};
pub use records::{PointRecord, build_records};
pub use table::PointTable;
pub use terms::{TermCounts, TermScore, TileTopic, rank_tile_terms, tf_idf};
pub use tokenizer::{Vocabulary, tokenize};
pub use topic::{TopicEntry, TopicSummary, generate_topic_summary, world_domain};
