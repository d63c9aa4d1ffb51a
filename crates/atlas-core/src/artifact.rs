//! The grid artifact a map viewer loads: density grids, topic tiles, and
//! display hints in one JSON object.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ImageConfig, MapConfig};
use crate::density::{DensityGrid, Groups, generate_density_grid};
use crate::error::{MapError, Result};
use crate::table::PointTable;
use crate::topic::{TopicSummary, generate_topic_summary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridArtifact {
    #[serde(flatten)]
    pub density: DensityGrid,
    pub topic: TopicSummary,
    pub embedding_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageConfig>,
}

impl GridArtifact {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn tile_count(&self) -> usize {
        self.topic.data.values().map(Vec::len).sum()
    }
}

/// Build the artifact for `table`. `group_names` enables per-group grids
/// and requires the table's `groups` column.
pub fn build_grid_artifact(
    table: &PointTable,
    group_names: Option<&[String]>,
    config: &MapConfig,
) -> Result<GridArtifact> {
    config.validate()?;
    table.validate()?;

    let groups = match (group_names, table.groups.as_deref()) {
        (Some(names), Some(labels)) => Some(Groups { labels, names }),
        (Some(_), None) => {
            return Err(MapError::InvalidConfig(
                "group names given but points carry no group labels".into(),
            ));
        }
        (None, _) => None,
    };

    info!(points = table.len(), "generating contours");
    let density = generate_density_grid(&table.xs, &table.ys, groups, &config.density())?;

    info!("generating multi-level topic summaries");
    let topic = generate_topic_summary(&table.xs, &table.ys, &table.texts, config)?;

    Ok(GridArtifact {
        density,
        topic,
        embedding_name: config.embedding_name.clone(),
        opacity: config.opacity,
        image: config.image.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PointTable {
        PointTable::new(
            vec![0.0, 0.1, 10.0, 10.1],
            vec![0.0, 0.0, 10.0, 10.0],
            ["ai ml", "ai systems", "biology genomics", "biology cells"]
                .map(String::from)
                .to_vec(),
        )
    }

    fn config() -> MapConfig {
        MapConfig {
            grid_size: 40,
            max_zoom_scale: 10.0,
            ..MapConfig::default()
        }
    }

    #[test]
    fn test_artifact_json_shape() {
        let mut config = config();
        config.opacity = Some(0.6);
        config.image = Some(ImageConfig {
            image_group: "avatar".into(),
            image_url_prefix: None,
        });
        let artifact = build_grid_artifact(&table(), None, &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();

        assert_eq!(json["grid"].as_array().unwrap().len(), 40);
        assert_eq!(json["padded"], true);
        assert_eq!(json["sampleSize"], 4);
        assert_eq!(json["totalPointSize"], 4);
        assert_eq!(json["embeddingName"], "My Embedding");
        assert_eq!(json["opacity"], 0.6);
        assert_eq!(json["image"]["imageGroup"], "avatar");
        assert!(json.get("groupGrids").is_none());
        assert_eq!(json["topic"]["extent"][1][0], 16.0);
        assert_eq!(json["topic"]["data"]["1"].as_array().unwrap().len(), 2);
        assert_eq!(artifact.tile_count(), 2);
    }

    #[test]
    fn test_artifact_round_trips() {
        let artifact = build_grid_artifact(&table(), None, &config()).unwrap();
        let back: GridArtifact = serde_json::from_str(&artifact.to_json().unwrap()).unwrap();
        assert_eq!(back.topic.data, artifact.topic.data);
        assert_eq!(back.topic.extent, artifact.topic.extent);
        assert_eq!(back.density.sample_size, artifact.density.sample_size);
        assert_eq!(back.density.grid.len(), artifact.density.grid.len());
        assert_eq!(back.embedding_name, artifact.embedding_name);
    }

    #[test]
    fn test_group_names_without_groups() {
        let names = vec!["a".to_string()];
        let err = build_grid_artifact(&table(), Some(&names), &config()).unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig(_)));
    }

    #[test]
    fn test_groups_fail_before_work() {
        let mut t = table();
        t.groups = Some(vec![0, 0, 1, 2]);
        let names = vec!["a".to_string(), "b".to_string()];
        let err = build_grid_artifact(&t, Some(&names), &config()).unwrap_err();
        assert!(matches!(err, MapError::GroupCountMismatch { .. }));
    }

    #[test]
    fn test_labels_always_have_four_slots() {
        let narrow = MapConfig {
            top_k: 2,
            ..config()
        };
        assert!(matches!(
            build_grid_artifact(&table(), None, &narrow),
            Err(MapError::InvalidConfig(_))
        ));

        let config = MapConfig {
            top_k: 4,
            ..config()
        };
        let artifact = build_grid_artifact(&table(), None, &config).unwrap();
        for entry in artifact.topic.data.values().flatten() {
            assert_eq!(entry.label().split('-').count(), 4, "{}", entry.label());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MapConfig {
            grid_size: 0,
            ..config()
        };
        assert!(matches!(
            build_grid_artifact(&table(), None, &config),
            Err(MapError::InvalidConfig(_))
        ));
    }
}
