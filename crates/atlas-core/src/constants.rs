/// Default lattice resolution of the density grid (cells per axis).
pub const GRID_SIZE: usize = 200;

/// Sample ceiling before density fitting switches to a random subsample.
pub const MAX_SAMPLE: usize = 100_000;

/// Seed shared by every subsampling draw in one build.
pub const RANDOM_SEED: u64 = 202_355;

/// Largest zoom factor a viewer is expected to request.
pub const MAX_ZOOM_SCALE: f64 = 1000.0;

/// Ceiling accepted for `maxZoomScale`; bounds the zoom sweep.
pub const MAX_ZOOM_LIMIT: f64 = 1e6;

/// Reference viewport in pixels.
pub const SVG_WIDTH: f64 = 1000.0;
pub const SVG_HEIGHT: f64 = 1000.0;

/// On-screen tile width the level selector aims for, in pixels.
pub const IDEAL_TILE_WIDTH: f64 = 35.0;

/// Ranked terms kept per tile.
pub const TOP_K: usize = 50;

/// Terms joined into a tile label.
pub const LABEL_TERMS: usize = 4;

/// Separator between label terms.
pub const LABEL_SEPARATOR: &str = "-";

/// Score reported for padding slots with no term.
pub const SENTINEL_SCORE: f64 = 0.00001;

pub const DEFAULT_EMBEDDING_NAME: &str = "My Embedding";

/// Extra width added to the x span before the density domain is squared.
pub const DOMAIN_MARGIN: f64 = 30.0;

/// Fraction of the wider span added on each side of the density domain.
pub const DOMAIN_PAD_RATIO: f64 = 1.0 / 50.0;

/// Padding around the data used as the viewer's world domain.
pub const TOPIC_DOMAIN_PAD: f64 = 1000.0;

/// Selectable tree depths for topic levels.
pub const MIN_TOPIC_LEVEL: u32 = 1;
pub const MAX_TOPIC_LEVEL: u32 = 20;

/// Zoom sweep increment.
pub const ZOOM_STEP: f64 = 0.5;

/// Points a node may hold before it splits.
pub const NODE_CAPACITY: usize = 1;

/// Depth past which nodes never split, whatever they hold.
pub const MAX_DEPTH: u32 = 48;

/// Kernel support in bandwidths; the gaussian tail beyond it is dropped.
pub const KERNEL_CUTOFF: f64 = 8.0;

/// Decimal digits kept for density values.
pub const DENSITY_DIGITS: i32 = 4;

/// Decimal digits kept for tile coordinates.
pub const TILE_DIGITS: i32 = 3;

/// Decimal digits kept for term scores.
pub const SCORE_DIGITS: i32 = 4;

/// Avatar substituted when a point has no picture URL.
pub const DEFAULT_AVATAR_URL: &str =
    "https://scholar.google.com/citations/images/avatar_scholar_256.png";
