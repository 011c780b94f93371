//! `match_data.json`: teams, final score and the roster.

use serde::{Deserialize, Serialize};

use super::ids::{deserialize_id, deserialize_opt_id};

/// One side of the fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    /// Short code shown in player labels (e.g. "INT")
    pub short_name: String,
}

/// A roster row as the provider ships it; team membership is a raw team id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    /// Tracking id; absent for players that never appear in the feed
    #[serde(
        default,
        rename = "trackable_object",
        alias = "trackable_object_id",
        deserialize_with = "deserialize_opt_id"
    )]
    pub trackable_object: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub team_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl RosterPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchData {
    pub home_team: TeamInfo,
    pub away_team: TeamInfo,
    pub home_team_score: i32,
    pub away_team_score: i32,
    #[serde(default)]
    pub players: Vec<RosterPlayer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_provider_shape() {
        let value = json!({
            "home_team": {"id": 145, "name": "Inter", "short_name": "INT", "acronym": "INT"},
            "away_team": {"id": 139, "name": "Juventus", "short_name": "JUV"},
            "home_team_score": 2,
            "away_team_score": 1,
            "players": [
                {"trackable_object": 7, "team_id": 145, "first_name": "A", "last_name": "B", "number": 10},
                {"trackable_object": null, "team_id": 139, "first_name": "C", "last_name": "D"}
            ]
        });
        let data: MatchData = serde_json::from_value(value).unwrap();
        assert_eq!(data.home_team.id, "145");
        assert_eq!(data.players[0].trackable_object.as_deref(), Some("7"));
        assert_eq!(data.players[0].team_id, "145");
        assert_eq!(data.players[1].trackable_object, None);
        assert_eq!(data.players[0].full_name(), "A B");
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let value = json!({
            "home_team": {"id": 145, "name": "Inter", "short_name": "INT"},
            "away_team": {"id": 139, "name": "Juventus", "short_name": "JUV"},
            "home_team_score": 2
        });
        let err = serde_json::from_value::<MatchData>(value).unwrap_err();
        assert!(err.to_string().contains("away_team_score"));
    }

    #[test]
    fn test_id_alias_accepted() {
        let value = json!({"trackable_object_id": "7", "team_id": "145", "first_name": "A", "last_name": "B"});
        let player: RosterPlayer = serde_json::from_value(value).unwrap();
        assert_eq!(player.trackable_object.as_deref(), Some("7"));
    }
}
