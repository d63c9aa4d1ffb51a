use std::fmt;

use atlas_core::MapError;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json {
        line: usize,
        source: serde_json::Error,
    },
    Toml(toml::de::Error),
    Map(MapError),
    InvalidData(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Json { line, source } => write!(f, "invalid JSON on line {line}: {source}"),
            StoreError::Toml(e) => write!(f, "invalid config: {e}"),
            StoreError::Map(e) => write!(f, "{e}"),
            StoreError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json { source, .. } => Some(source),
            StoreError::Toml(e) => Some(e),
            StoreError::Map(e) => Some(e),
            StoreError::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(e: toml::de::Error) -> Self {
        StoreError::Toml(e)
    }
}

impl From<MapError> for StoreError {
    fn from(e: MapError) -> Self {
        StoreError::Map(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
