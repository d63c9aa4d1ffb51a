//! NDJSON point input, one object per line.
//!
//! `x`, `y` and `text` are required. An optional column is present in the
//! table when any line carries it; lines without it get a blank value.

use std::io::BufRead;
use std::path::Path;

use atlas_core::PointTable;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use crate::error::{Result, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointLine {
    x: f64,
    y: f64,
    text: String,
    embedding: Option<Value>,
    time: Option<Value>,
    label: Option<Value>,
    group: Option<usize>,
    #[serde(default, deserialize_with = "whole_number")]
    citations: Option<u64>,
    scholar_url: Option<String>,
    summary: Option<String>,
    profile_url: Option<String>,
    keywords: Option<String>,
    affiliation: Option<String>,
    homepage: Option<String>,
}

/// Non-negative integer that may be written as a float, such as `12.0`.
fn whole_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    let Some(n) = Option::<Number>::deserialize(d)? else {
        return Ok(None);
    };
    if let Some(v) = n.as_u64() {
        return Ok(Some(v));
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {n}"
        ))),
    }
}

/// Strings pass through; anything else keeps its JSON text.
fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Column that exists when at least one row has a value.
fn column<T, U>(
    rows: &[PointLine],
    get: impl Fn(&PointLine) -> Option<T>,
    fill: impl Fn(Option<T>) -> U,
) -> Option<Vec<U>> {
    if rows.iter().all(|r| get(r).is_none()) {
        return None;
    }
    Some(rows.iter().map(|r| fill(get(r))).collect())
}

fn blank(s: Option<String>) -> String {
    s.unwrap_or_default()
}

fn blank_value(v: Option<Value>) -> Value {
    v.unwrap_or_else(|| Value::String(String::new()))
}

pub fn parse_points(reader: impl BufRead) -> Result<PointTable> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: PointLine = serde_json::from_str(&line).map_err(|source| StoreError::Json {
            line: idx + 1,
            source,
        })?;
        rows.push(row);
    }

    let groups = column(&rows, |r| r.group, |g| g);
    let groups = match groups {
        Some(values) => {
            if let Some(missing) = values.iter().position(Option::is_none) {
                return Err(StoreError::InvalidData(format!(
                    "point {missing} has no group while others do"
                )));
            }
            Some(values.into_iter().flatten().collect())
        }
        None => None,
    };

    let table = PointTable {
        embeddings: column(
            &rows,
            |r| r.embedding.clone(),
            |v| v.map(stringify).unwrap_or_default(),
        ),
        times: column(&rows, |r| r.time.clone(), blank_value),
        labels: column(&rows, |r| r.label.clone(), blank_value),
        groups,
        citations: column(&rows, |r| r.citations, |c| c),
        scholar_urls: column(&rows, |r| r.scholar_url.clone(), |u| u),
        summaries: column(&rows, |r| r.summary.clone(), blank),
        profile_urls: column(&rows, |r| r.profile_url.clone(), blank),
        keywords: column(&rows, |r| r.keywords.clone(), blank),
        affiliations: column(&rows, |r| r.affiliation.clone(), blank),
        homepages: column(&rows, |r| r.homepage.clone(), blank),
        xs: rows.iter().map(|r| r.x).collect(),
        ys: rows.iter().map(|r| r.y).collect(),
        texts: rows.into_iter().map(|r| r.text).collect(),
    };
    table.validate()?;
    Ok(table)
}

pub fn read_points(path: &Path) -> Result<PointTable> {
    let file = std::fs::File::open(path)?;
    let table = parse_points(std::io::BufReader::new(file))?;
    tracing::info!("read {} points from {}", table.len(), path.display());
    Ok(table)
}
