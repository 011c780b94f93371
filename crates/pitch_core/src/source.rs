//! Backing store for per-match files.
//!
//! Layout: `<root>/<match_id>/match_data.json` and
//! `<root>/<match_id>/structured_data.json`. Files are read whole, then
//! parsed; a missing or malformed file becomes a [`LoadError`] naming the
//! match and path.

use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::LoadError;
use crate::models::{MatchData, PossessionEvent};

pub const MATCH_DATA_FILE: &str = "match_data.json";
pub const STRUCTURED_DATA_FILE: &str = "structured_data.json";

/// Source of the two per-match records.
pub trait MatchSource {
    fn match_data(&self, match_id: &str) -> Result<MatchData, LoadError>;
    fn structured_data(&self, match_id: &str) -> Result<Vec<PossessionEvent>, LoadError>;
}

/// Directory-backed [`MatchSource`].
#[derive(Debug, Clone)]
pub struct FsMatchSource {
    root: PathBuf,
}

impl FsMatchSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn match_dir(&self, match_id: &str) -> PathBuf {
        self.root.join(match_id)
    }

    fn load_json<T: DeserializeOwned>(&self, match_id: &str, file: &str) -> Result<T, LoadError> {
        let path = self.match_dir(match_id).join(file);
        debug!(match_id, path = %path.display(), "reading match file");

        let text = fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound {
                match_id: match_id.to_string(),
                path: path.clone(),
            },
            _ => LoadError::Io { match_id: match_id.to_string(), path: path.clone(), source },
        })?;

        serde_json::from_str(&text).map_err(|source| LoadError::Malformed {
            match_id: match_id.to_string(),
            path,
            source,
        })
    }
}

impl MatchSource for FsMatchSource {
    fn match_data(&self, match_id: &str) -> Result<MatchData, LoadError> {
        self.load_json(match_id, MATCH_DATA_FILE)
    }

    fn structured_data(&self, match_id: &str) -> Result<Vec<PossessionEvent>, LoadError> {
        self.load_json(match_id, STRUCTURED_DATA_FILE)
    }
}
