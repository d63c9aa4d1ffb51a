use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EMBEDDING_NAME, DOMAIN_MARGIN, GRID_SIZE, IDEAL_TILE_WIDTH, LABEL_TERMS, MAX_DEPTH,
    MAX_SAMPLE, MAX_ZOOM_LIMIT, MAX_ZOOM_SCALE, NODE_CAPACITY, RANDOM_SEED, SVG_HEIGHT, SVG_WIDTH,
    TOP_K,
};
use crate::density::DensityOptions;
use crate::error::{MapError, Result};
use crate::levels::Viewport;
use crate::quadtree::QuadtreeConfig;

/// Viewer hint for drawing point images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub image_group: String,
    #[serde(default, rename = "imageURLPrefix", skip_serializing_if = "Option::is_none")]
    pub image_url_prefix: Option<String>,
}

/// Every knob of an artifact build. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub grid_size: usize,
    pub max_sample: usize,
    pub random_seed: u64,
    pub max_zoom_scale: f64,
    pub svg_width: f64,
    pub svg_height: f64,
    pub ideal_tile_width: f64,
    pub embedding_name: String,
    pub top_k: usize,
    pub domain_margin: f64,
    pub node_capacity: usize,
    pub max_depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageConfig>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            max_sample: MAX_SAMPLE,
            random_seed: RANDOM_SEED,
            max_zoom_scale: MAX_ZOOM_SCALE,
            svg_width: SVG_WIDTH,
            svg_height: SVG_HEIGHT,
            ideal_tile_width: IDEAL_TILE_WIDTH,
            embedding_name: DEFAULT_EMBEDDING_NAME.to_string(),
            top_k: TOP_K,
            domain_margin: DOMAIN_MARGIN,
            node_capacity: NODE_CAPACITY,
            max_depth: MAX_DEPTH,
            opacity: None,
            image: None,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(MapError::InvalidConfig(format!(
                "gridSize must be at least 2, got {}",
                self.grid_size
            )));
        }
        if self.max_sample == 0 {
            return Err(MapError::InvalidConfig("maxSample must be positive".into()));
        }
        if self.top_k < LABEL_TERMS {
            return Err(MapError::InvalidConfig(format!(
                "topK must be at least {LABEL_TERMS}, got {}",
                self.top_k
            )));
        }
        if self.node_capacity == 0 {
            return Err(MapError::InvalidConfig("nodeCapacity must be positive".into()));
        }
        positive("maxZoomScale", self.max_zoom_scale)?;
        if self.max_zoom_scale > MAX_ZOOM_LIMIT {
            return Err(MapError::InvalidConfig(format!(
                "maxZoomScale must be at most {MAX_ZOOM_LIMIT}, got {}",
                self.max_zoom_scale
            )));
        }
        positive("svgWidth", self.svg_width)?;
        positive("svgHeight", self.svg_height)?;
        positive("idealTileWidth", self.ideal_tile_width)?;
        if !self.domain_margin.is_finite() || self.domain_margin < 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "domainMargin must be non-negative, got {}",
                self.domain_margin
            )));
        }
        if let Some(opacity) = self.opacity
            && !(0.0..=1.0).contains(&opacity)
        {
            return Err(MapError::InvalidConfig(format!(
                "opacity must be within [0, 1], got {opacity}"
            )));
        }
        Ok(())
    }

    pub fn quadtree(&self) -> QuadtreeConfig {
        QuadtreeConfig {
            node_capacity: self.node_capacity,
            max_depth: self.max_depth,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            svg_width: self.svg_width,
            svg_height: self.svg_height,
            max_zoom_scale: self.max_zoom_scale,
            ideal_tile_width: self.ideal_tile_width,
        }
    }

    pub fn density(&self) -> DensityOptions {
        DensityOptions {
            grid_size: self.grid_size,
            max_sample: self.max_sample,
            random_seed: self.random_seed,
            domain_margin: self.domain_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = MapConfig::default();
        assert_eq!(c.grid_size, 200);
        assert_eq!(c.max_sample, 100_000);
        assert_eq!(c.random_seed, 202_355);
        assert_eq!(c.max_zoom_scale, 1000.0);
        assert_eq!(c.ideal_tile_width, 35.0);
        assert_eq!(c.embedding_name, "My Embedding");
        assert_eq!(c.top_k, 50);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c: MapConfig =
            serde_json::from_str(r#"{"gridSize": 50, "image": {"imageGroup": "avatar"}}"#)
                .unwrap();
        assert_eq!(c.grid_size, 50);
        assert_eq!(c.top_k, 50);
        assert_eq!(c.image.unwrap().image_group, "avatar");
    }

    #[test]
    fn test_image_prefix_key() {
        let image = ImageConfig {
            image_group: "faces".into(),
            image_url_prefix: Some("https://img/".into()),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["imageURLPrefix"], "https://img/");
        assert_eq!(json["imageGroup"], "faces");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            MapConfig {
                grid_size: 1,
                ..MapConfig::default()
            },
            MapConfig {
                top_k: 0,
                ..MapConfig::default()
            },
            MapConfig {
                top_k: 3,
                ..MapConfig::default()
            },
            MapConfig {
                max_zoom_scale: 1e17,
                ..MapConfig::default()
            },
            MapConfig {
                node_capacity: 0,
                ..MapConfig::default()
            },
            MapConfig {
                max_zoom_scale: 0.0,
                ..MapConfig::default()
            },
            MapConfig {
                svg_width: -5.0,
                ..MapConfig::default()
            },
            MapConfig {
                ideal_tile_width: f64::NAN,
                ..MapConfig::default()
            },
            MapConfig {
                opacity: Some(1.5),
                ..MapConfig::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(MapError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_label_width_top_k_accepted() {
        let c = MapConfig {
            top_k: LABEL_TERMS,
            max_zoom_scale: MAX_ZOOM_LIMIT,
            ..MapConfig::default()
        };
        assert!(c.validate().is_ok());
    }
}
