//! # Roster Resolver
//!
//! Maps tracking ids to display identities ("First Last (Team INT)").
//!
//! ## Algorithm
//! 1. Compare each player's raw `team_id` against the home and away team ids
//! 2. Matching side's short code becomes the team label
//! 3. No match: the raw id is kept as the label and an anomaly is recorded
//! 4. Labels are keyed by tracking id; a repeated id overwrites the earlier
//!    label but keeps its original position in the ordering

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::models::{MatchData, RosterPlayer};

/// Resolved team membership of a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "side", content = "label", rename_all = "snake_case")]
pub enum TeamLabel {
    Home(String),
    Away(String),
    /// Raw team id that matched neither side, kept verbatim
    Unresolved(String),
}

impl TeamLabel {
    pub fn as_str(&self) -> &str {
        match self {
            TeamLabel::Home(s) | TeamLabel::Away(s) | TeamLabel::Unresolved(s) => s,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, TeamLabel::Unresolved(_))
    }
}

impl fmt::Display for TeamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub trackable_object: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub team_label: TeamLabel,
}

impl RosterEntry {
    /// `"First Last (Team <label>)"`
    pub fn display_label(&self) -> String {
        format!("{} {} (Team {})", self.first_name, self.last_name, self.team_label)
    }
}

/// A roster team id that resolved to neither home nor away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityMismatch {
    pub trackable_object: Option<String>,
    pub raw_team_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    /// Position of the winning entry per tracking id
    index: IndexMap<String, usize>,
    labels: IndexMap<String, String>,
    anomalies: Vec<IdentityMismatch>,
}

impl Roster {
    /// Every roster row in source order, including rows without a tracking id.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Entry that owns the label for `trackable_object`.
    pub fn entry(&self, trackable_object: &str) -> Option<&RosterEntry> {
        self.index.get(trackable_object).map(|&i| &self.entries[i])
    }

    pub fn label(&self, trackable_object: &str) -> Option<&str> {
        self.labels.get(trackable_object).map(String::as_str)
    }

    /// Ordered tracking id → display label.
    pub fn labels(&self) -> &IndexMap<String, String> {
        &self.labels
    }

    pub fn anomalies(&self) -> &[IdentityMismatch] {
        &self.anomalies
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn resolve_team(player: &RosterPlayer, data: &MatchData) -> TeamLabel {
    if player.team_id == data.home_team.id {
        TeamLabel::Home(data.home_team.short_name.clone())
    } else if player.team_id == data.away_team.id {
        TeamLabel::Away(data.away_team.short_name.clone())
    } else {
        TeamLabel::Unresolved(player.team_id.clone())
    }
}

/// Resolve a match roster into display labels.
pub fn resolve_roster(data: &MatchData) -> Roster {
    let mut roster = Roster::default();

    for player in &data.players {
        let team_label = resolve_team(player, data);

        if !team_label.is_resolved() {
            warn!(
                trackable_object = ?player.trackable_object,
                raw_team_id = %player.team_id,
                home_team_id = %data.home_team.id,
                away_team_id = %data.away_team.id,
                "roster team id matches neither side; keeping raw id as label"
            );
            roster.anomalies.push(IdentityMismatch {
                trackable_object: player.trackable_object.clone(),
                raw_team_id: player.team_id.clone(),
            });
        }

        let entry = RosterEntry {
            trackable_object: player.trackable_object.clone(),
            first_name: player.first_name.clone(),
            last_name: player.last_name.clone(),
            team_label,
        };
        let position = roster.entries.len();

        match &entry.trackable_object {
            Some(id) => {
                roster.labels.insert(id.clone(), entry.display_label());
                roster.index.insert(id.clone(), position);
            }
            None => {
                debug!(
                    player = %player.full_name(),
                    "roster entry has no trackable object; not selectable"
                );
            }
        }

        roster.entries.push(entry);
    }

    roster
}
