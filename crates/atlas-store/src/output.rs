use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use atlas_core::{GridArtifact, PointRecord};

use crate::error::{Result, StoreError};

/// File names inside the output directory.
#[derive(Debug, Clone)]
pub struct OutputNames {
    pub data: String,
    pub grid: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            data: "data.ndjson".to_string(),
            grid: "grid.json".to_string(),
        }
    }
}

/// Write one JSON array per record and the grid artifact. Returns the
/// paths written, data file first.
pub fn save_outputs(
    dir: &Path,
    records: &[PointRecord],
    artifact: &GridArtifact,
    names: &OutputNames,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;

    let data_path = dir.join(&names.data);
    let mut writer = BufWriter::new(std::fs::File::create(&data_path)?);
    for (i, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut writer, record).map_err(|source| StoreError::Json {
            line: i + 1,
            source,
        })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    let grid_path = dir.join(&names.grid);
    std::fs::write(&grid_path, artifact.to_json()?)?;

    tracing::info!(
        "wrote {} records to {} and grid to {}",
        records.len(),
        data_path.display(),
        grid_path.display()
    );
    Ok((data_path, grid_path))
}

/// Parse a written data file back into rows.
pub fn read_records(path: &Path) -> Result<Vec<PointRecord>> {
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| StoreError::Json {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::{MapConfig, PointTable, build_grid_artifact, build_records};
    use tempfile::TempDir;

    fn table() -> PointTable {
        let mut t = PointTable::new(
            vec![0.25, 0.5, 9.75],
            vec![1.0, -3.5, 8.125],
            vec![
                "sparse matrices".into(),
                "matrix factorization".into(),
                "coral reefs".into(),
            ],
        );
        t.citations = Some(vec![Some(4), None, Some(18)]);
        t
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out");
        let table = table();
        let records = build_records(&table).unwrap();
        let config = MapConfig {
            grid_size: 20,
            max_zoom_scale: 4.0,
            ..MapConfig::default()
        };
        let artifact = build_grid_artifact(&table, None, &config).unwrap();

        let (data, grid) = save_outputs(&out, &records, &artifact, &OutputNames::default()).unwrap();
        assert!(data.ends_with("data.ndjson"));

        let text = std::fs::read_to_string(&data).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l.starts_with('[') && l.ends_with(']')));

        let back = read_records(&data).unwrap();
        assert_eq!(back.len(), 3);
        for (i, row) in back.iter().enumerate() {
            assert_eq!(row.coords(), Some((table.xs[i], table.ys[i])));
            assert_eq!(row.len(), 4);
        }

        let grid_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(grid).unwrap()).unwrap();
        assert_eq!(grid_json["totalPointSize"], 3);
        assert!(grid_json["topic"]["data"].is_object());
    }

    #[test]
    fn test_read_records_reports_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.ndjson");
        std::fs::write(&path, "[1, 2, \"a\"]\nnot json\n").unwrap();
        assert!(matches!(
            read_records(&path),
            Err(StoreError::Json { line: 2, .. })
        ));
    }
}
