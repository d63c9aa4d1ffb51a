use std::fmt;

#[derive(Debug)]
pub enum MapError {
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    GroupCountMismatch {
        unique_labels: usize,
        group_names: usize,
    },
    EmptyInput,
    NonFiniteCoordinate {
        index: usize,
    },
    InvalidConfig(String),
    Serialization(serde_json::Error),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "number of {what} must match number of points (expected {expected}, got {actual})"
            ),
            MapError::GroupCountMismatch {
                unique_labels,
                group_names,
            } => write!(
                f,
                "number of unique labels must match group names length (labels: {unique_labels}, group names: {group_names})"
            ),
            MapError::EmptyInput => write!(f, "at least one point is required"),
            MapError::NonFiniteCoordinate { index } => {
                write!(f, "point {index} has a non-finite coordinate")
            }
            MapError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            MapError::Serialization(e) => write!(f, "JSON serialization failed: {e}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        MapError::Serialization(e)
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

/// Fail unless a column has one entry per point.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(MapError::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
