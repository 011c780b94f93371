use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading backing data (match files, pitch image, config).
///
/// Every variant tied to a match carries the match id and the offending path.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("match {match_id}: file not found: {}", .path.display())]
    FileNotFound { match_id: String, path: PathBuf },

    #[error("match {match_id}: failed to read {}: {source}", .path.display())]
    Io {
        match_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("match {match_id}: malformed {}: {source}", .path.display())]
    Malformed {
        match_id: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown match id: {0}")]
    UnknownMatch(String),

    #[error("failed to load pitch image {}: {source}", .path.display())]
    PitchImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl LoadError {
    /// Match id this failure belongs to, if any.
    pub fn match_id(&self) -> Option<&str> {
        match self {
            LoadError::FileNotFound { match_id, .. }
            | LoadError::Io { match_id, .. }
            | LoadError::Malformed { match_id, .. } => Some(match_id),
            LoadError::UnknownMatch(id) => Some(id),
            LoadError::PitchImage { .. } | LoadError::Config { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("density estimate requires at least one point")]
    EmptySeries,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Annotation font error: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
