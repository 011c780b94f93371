//! # Heatmap Configuration
//!
//! Data location, match list and rendering knobs in one serde struct.
//!
//! ## Usage
//! ```rust
//! use pitch_core::config::HeatmapConfig;
//!
//! let config = HeatmapConfig::default();
//! let preview = HeatmapConfig::preview();
//! assert!(preview.render.width < config.render.width);
//! ```
//!
//! Files ending in `.yaml`/`.yml` are read as YAML, everything else as JSON.
//! Omitted fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::DEFAULT_MATCH_IDS;
use crate::error::LoadError;

/// Kernel density estimation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Evaluation grid cell size (meters)
    pub cell_size_m: f64,
    /// Multiplier on the Scott's-rule bandwidth
    pub bw_adjust: f64,
    /// Floor on the kernel standard deviation for degenerate samples (meters)
    pub min_bandwidth_m: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self { cell_size_m: 0.5, bw_adjust: 1.0, min_bandwidth_m: 1.0 }
    }
}

/// Output image and overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Overlay opacity in [0, 1]
    pub alpha: f32,
    /// Number of filled contour bands
    pub levels: u32,
    /// Fraction of the peak density below which nothing is drawn
    pub threshold: f64,
    pub density: DensityConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            alpha: 0.5,
            levels: 10,
            threshold: 0.05,
            density: DensityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Directory holding one sub-directory per match id
    pub data_root: PathBuf,
    pub match_ids: Vec<String>,
    /// Background pitch image; a pitch is drawn when unset
    pub pitch_image: Option<PathBuf>,
    pub render: RenderConfig,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data/matches"),
            match_ids: DEFAULT_MATCH_IDS.iter().map(|id| id.to_string()).collect(),
            pitch_image: None,
            render: RenderConfig::default(),
        }
    }
}

impl HeatmapConfig {
    /// Small images and a coarse grid, for quick looks.
    pub fn preview() -> Self {
        let mut cfg = Self::default();
        cfg.render.width = 420;
        cfg.render.height = 272;
        cfg.render.density.cell_size_m = 1.0;
        cfg
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let config_error = |message: String| LoadError::Config { path: path.to_path_buf(), message };

        let text = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: Self = if is_yaml {
            serde_yaml::from_str(&text).map_err(|e| config_error(e.to_string()))?
        } else {
            serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?
        };

        config.validate().map_err(config_error)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(format!("image size must be positive, got {}x{}", render.width, render.height));
        }
        if !(0.0..=1.0).contains(&render.alpha) {
            return Err(format!("alpha must be within [0, 1], got {}", render.alpha));
        }
        if render.levels == 0 {
            return Err("levels must be at least 1".to_string());
        }
        if !(0.0..1.0).contains(&render.threshold) {
            return Err(format!("threshold must be within [0, 1), got {}", render.threshold));
        }
        let density = &render.density;
        if density.cell_size_m <= 0.0 || density.bw_adjust <= 0.0 || density.min_bandwidth_m <= 0.0 {
            return Err("density parameters must be positive".to_string());
        }
        Ok(())
    }
}
