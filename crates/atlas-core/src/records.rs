//! Flat per-point rows for the viewer's data file.
//!
//! Rows are positional: `x, y, text`, then each supplied optional column in
//! a fixed order. Which columns appear is decided once per table, so every
//! row has the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::constants::DEFAULT_AVATAR_URL;
use crate::error::Result;
use crate::table::PointTable;

/// One point's row, serialized as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointRecord(pub Vec<Value>);

impl PointRecord {
    /// Leading `(x, y)` pair, if the row starts with two numbers.
    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.0.first()?.as_f64()?, self.0.get(1)?.as_f64()?))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn push_str(row: &mut Vec<Value>, column: &Option<Vec<String>>, i: usize) {
    if let Some(values) = column {
        row.push(Value::String(values[i].clone()));
    }
}

/// Build one row per point.
pub fn build_records(table: &PointTable) -> Result<Vec<PointRecord>> {
    table.validate()?;

    (0..table.len())
        .map(|i| -> Result<PointRecord> {
            let mut row = vec![json!(table.xs[i]), json!(table.ys[i]), json!(table.texts[i])];

            match (&table.times, &table.labels) {
                (Some(times), labels) => {
                    row.push(times[i].clone());
                    if let Some(labels) = labels {
                        row.push(labels[i].clone());
                    }
                }
                // Keep the label at index 4 even without times.
                (None, Some(labels)) => {
                    row.push(Value::String(String::new()));
                    row.push(labels[i].clone());
                }
                (None, None) => {}
            }

            if let Some(citations) = &table.citations {
                row.push(citations[i].map_or(Value::Null, Value::from));
            }
            if let Some(urls) = &table.scholar_urls {
                let url = urls[i].as_deref().unwrap_or(DEFAULT_AVATAR_URL);
                row.push(Value::String(serde_json::to_string(&[url])?));
            }
            push_str(&mut row, &table.summaries, i);
            push_str(&mut row, &table.profile_urls, i);
            push_str(&mut row, &table.keywords, i);
            push_str(&mut row, &table.affiliations, i);
            push_str(&mut row, &table.homepages, i);
            push_str(&mut row, &table.embeddings, i);

            Ok(PointRecord(row))
        })
        .collect()
}
