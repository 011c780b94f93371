//! # Match Catalog
//!
//! Load-once summaries (teams, score) for a fixed, ordered list of matches.
//! Built explicitly and passed around; it never changes after `load`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LoadError;
use crate::models::MatchData;
use crate::source::MatchSource;

/// Matches shipped with the sample dataset.
pub const DEFAULT_MATCH_IDS: [&str; 9] =
    ["2068", "2269", "2417", "2440", "2841", "3442", "3518", "3749", "4039"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
}

impl MatchSummary {
    pub fn from_match_data(match_id: &str, data: &MatchData) -> Self {
        Self {
            match_id: match_id.to_string(),
            home_team: data.home_team.name.clone(),
            away_team: data.away_team.name.clone(),
            home_score: data.home_team_score,
            away_score: data.away_team_score,
        }
    }

    /// Selection label: `"Home vs Away"`.
    pub fn display_name(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// `"Home 2 - 1 Away"`
    pub fn scoreline(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.home_team, self.home_score, self.away_score, self.away_team
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchCatalog {
    summaries: IndexMap<String, MatchSummary>,
}

impl MatchCatalog {
    /// Load one summary per id, in order. Any missing or malformed record
    /// aborts the whole load.
    pub fn load<S, I, T>(source: &S, match_ids: I) -> Result<Self, LoadError>
    where
        S: MatchSource + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut summaries = IndexMap::new();
        for id in match_ids {
            let id = id.as_ref();
            let data = source.match_data(id)?;
            summaries.insert(id.to_string(), MatchSummary::from_match_data(id, &data));
        }

        info!(matches = summaries.len(), "match catalog loaded");
        Ok(Self { summaries })
    }

    /// Ordered `(id, "Home vs Away")` pairs.
    pub fn list_matches(&self) -> Vec<(String, String)> {
        self.summaries
            .iter()
            .map(|(id, summary)| (id.clone(), summary.display_name()))
            .collect()
    }

    pub fn summary(&self, match_id: &str) -> Result<&MatchSummary, LoadError> {
        self.summaries
            .get(match_id)
            .ok_or_else(|| LoadError::UnknownMatch(match_id.to_string()))
    }

    /// First id whose display name equals `display` (what a dropdown hands back).
    pub fn find_by_display_name(&self, display: &str) -> Option<&str> {
        self.summaries
            .iter()
            .find(|(_, summary)| summary.display_name() == display)
            .map(|(id, _)| id.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.summaries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
