//! CLI command integration tests. Each test writes into its own temp dir.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const POINTS: &str = concat!(
    r#"{"x": 0.0, "y": 0.0, "text": "ai ml", "group": 0}"#,
    "\n",
    r#"{"x": 0.1, "y": 0.0, "text": "ai systems", "group": 0}"#,
    "\n",
    r#"{"x": 10.0, "y": 10.0, "text": "biology genomics", "group": 1}"#,
    "\n",
    r#"{"x": 10.1, "y": 10.0, "text": "biology cells", "group": 1}"#,
    "\n",
);

fn atlas_cmd() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("atlas").unwrap()
}

fn write_points(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("points.ndjson");
    std::fs::write(&path, POINTS).unwrap();
    path
}

#[test]
fn build_writes_outputs() {
    let dir = TempDir::new().unwrap();
    let input = write_points(&dir);
    let out = dir.path().join("out");

    atlas_cmd()
        .args(["build", "--grid-size", "30", "--max-zoom-scale", "10"])
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("points:  4"))
        .stdout(predicate::str::contains("levels:  1"))
        .stdout(predicate::str::contains("tiles:   2"));

    let data = std::fs::read_to_string(out.join("data.ndjson")).unwrap();
    assert_eq!(data.lines().count(), 4);

    let grid: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("grid.json")).unwrap()).unwrap();
    assert_eq!(grid["grid"].as_array().unwrap().len(), 30);
    assert_eq!(grid["embeddingName"], "My Embedding");
}

#[test]
fn build_rejects_huge_zoom_scale() {
    let dir = TempDir::new().unwrap();
    let input = write_points(&dir);

    atlas_cmd()
        .args(["build", "--max-zoom-scale", "1e17"])
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxZoomScale"));
}

#[test]
fn build_with_groups() {
    let dir = TempDir::new().unwrap();
    let input = write_points(&dir);
    let out = dir.path().join("out");

    atlas_cmd()
        .args(["build", "--grid-size", "20", "--group-names", "ml,bio"])
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    let grid: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("grid.json")).unwrap()).unwrap();
    assert_eq!(grid["groupNames"], serde_json::json!(["ml", "bio"]));
    assert_eq!(grid["groupTotalPointSizes"]["bio"], 2);
}

#[test]
fn build_rejects_group_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let input = write_points(&dir);

    atlas_cmd()
        .args(["build", "--group-names", "a,b,c"])
        .arg("--input")
        .arg(&input)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unique labels"));
}

#[test]
fn levels_prints_range() {
    let dir = TempDir::new().unwrap();
    let input = write_points(&dir);
    let config = dir.path().join("atlas.toml");
    std::fs::write(&config, "maxZoomScale = 10.0\n").unwrap();

    atlas_cmd()
        .arg("--config")
        .arg(&config)
        .args(["levels", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("minLevel: 1"))
        .stdout(predicate::str::contains("maxLevel: 1"))
        .stdout(predicate::str::contains("height:   8"));
}

#[test]
fn config_prints_defaults() {
    atlas_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("gridSize = 200"))
        .stdout(predicate::str::contains("embeddingName = \"My Embedding\""));
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    atlas_cmd()
        .args(["levels", "--input"])
        .arg(dir.path().join("missing.ndjson"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
