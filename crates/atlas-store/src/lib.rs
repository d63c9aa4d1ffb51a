//! File persistence for atlas-core: NDJSON point input, TOML config, and
//! the `data.ndjson` / `grid.json` pair a viewer loads.

pub mod config;
pub mod error;
pub mod points;
pub mod output;

pub use config::{load_config, to_toml};
pub use error::{Result, StoreError};
pub use output::{OutputNames, read_records, save_outputs};
pub use points::read_points;
