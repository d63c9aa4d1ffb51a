use serde_json::Value;

use crate::error::{MapError, Result, check_len};

/// Columnar input for one build: coordinates, text, and whichever optional
/// metadata columns the caller has. Each present column has one entry per
/// point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTable {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub texts: Vec<String>,
    /// Stringified embedding vectors.
    pub embeddings: Option<Vec<String>>,
    pub times: Option<Vec<Value>>,
    pub labels: Option<Vec<Value>>,
    /// Group index per point, used for density overlays.
    pub groups: Option<Vec<usize>>,
    pub citations: Option<Vec<Option<u64>>>,
    /// Avatar URL per point; `None` falls back to the default avatar.
    pub scholar_urls: Option<Vec<Option<String>>>,
    pub summaries: Option<Vec<String>>,
    pub profile_urls: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub affiliations: Option<Vec<String>>,
    pub homepages: Option<Vec<String>>,
}

fn check_column<T>(what: &'static str, n: usize, column: &Option<Vec<T>>) -> Result<()> {
    match column {
        Some(values) => check_len(what, n, values.len()),
        None => Ok(()),
    }
}

impl PointTable {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, texts: Vec<String>) -> Self {
        Self {
            xs,
            ys,
            texts,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Every column must have one entry per point and every coordinate
    /// must be finite.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        if n == 0 {
            return Err(MapError::EmptyInput);
        }
        check_len("ys", n, self.ys.len())?;
        check_len("texts", n, self.texts.len())?;
        check_column("embeddings", n, &self.embeddings)?;
        check_column("times", n, &self.times)?;
        check_column("labels", n, &self.labels)?;
        check_column("groups", n, &self.groups)?;
        check_column("citations", n, &self.citations)?;
        check_column("scholar URLs", n, &self.scholar_urls)?;
        check_column("summaries", n, &self.summaries)?;
        check_column("profile URLs", n, &self.profile_urls)?;
        check_column("keywords", n, &self.keywords)?;
        check_column("affiliations", n, &self.affiliations)?;
        check_column("homepage URLs", n, &self.homepages)?;

        if let Some(index) = self
            .xs
            .iter()
            .zip(&self.ys)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(MapError::NonFiniteCoordinate { index });
        }
        Ok(())
    }
}
