//! Heatmap Builder Library
//!
//! Config resolution and artifact output for the `heatmap_builder` CLI.
//! Rendering itself lives in `pitch_core`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use pitch_core::{HeatmapConfig, Period, PlayerHeatmaps, RenderOutcome};

/// Overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub data_root: Option<PathBuf>,
    pub match_ids: Option<Vec<String>>,
    pub pitch_image: Option<PathBuf>,
}

/// Defaults, then the config file, then command-line overrides.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<HeatmapConfig> {
    let mut config = match &overrides.config_file {
        Some(path) => HeatmapConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => HeatmapConfig::default(),
    };

    if let Some(root) = &overrides.data_root {
        config.data_root = root.clone();
    }
    if let Some(ids) = &overrides.match_ids {
        config.match_ids = ids.clone();
    }
    if let Some(pitch) = &overrides.pitch_image {
        config.pitch_image = Some(pitch.clone());
    }

    Ok(config)
}

/// `<match>_<player>_period_<n>`
pub fn artifact_stem(match_id: &str, trackable_object: &str, period: Period) -> String {
    format!("{}_{}_period_{}", match_id, trackable_object, period.number())
}

/// What a render run wrote (or skipped).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    pub images: Vec<PathBuf>,
    pub metadata: Vec<PathBuf>,
    /// Periods with no tracking data
    pub no_data: Vec<u8>,
}

/// Write one PNG (plus optional JSON sidecar) per rendered period.
pub fn write_heatmaps(
    out_dir: &Path,
    match_id: &str,
    heatmaps: &PlayerHeatmaps,
    with_metadata: bool,
) -> Result<RenderReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut report = RenderReport::default();
    for outcome in &heatmaps.outcomes {
        let artifact = match outcome {
            RenderOutcome::Rendered(artifact) => artifact,
            RenderOutcome::NoData { period } => {
                report.no_data.push(period.number());
                continue;
            }
        };

        let stem = artifact_stem(match_id, &artifact.trackable_object, artifact.period);
        let png = out_dir.join(format!("{stem}.png"));
        artifact
            .save_png(&png)
            .with_context(|| format!("Failed to write heatmap: {}", png.display()))?;
        info!(path = %png.display(), samples = artifact.sample_count(), "heatmap written");
        report.images.push(png);

        if with_metadata {
            let meta = out_dir.join(format!("{stem}.json"));
            artifact
                .save_metadata(&meta)
                .with_context(|| format!("Failed to write metadata: {}", meta.display()))?;
            report.metadata.push(meta);
        }
    }

    Ok(report)
}
