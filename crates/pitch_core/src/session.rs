//! # Heatmap Session
//!
//! The selection surface a front end drives:
//!
//! 1. `list_matches` - catalog entries as `(id, "Home vs Away")`
//! 2. `select_match` - summary, resolved roster and tracking feed
//! 3. `list_players` - `(trackable_object, label)` in roster order
//! 4. `select_player` - the player's per-period trace
//! 5. `render` - one heatmap per period, or a no-data signal
//!
//! Each selection runs to completion synchronously. Only the catalog is
//! kept between selections; everything else is rebuilt per call.

use tracing::info;

use crate::catalog::{MatchCatalog, MatchSummary};
use crate::config::HeatmapConfig;
use crate::error::{LoadError, RenderError, Result};
use crate::models::PossessionEvent;
use crate::render::{Background, RenderOutcome, Renderer};
use crate::roster::{resolve_roster, Roster, RosterEntry};
use crate::source::{FsMatchSource, MatchSource};
use crate::trajectory::{extract_trace, Period, PlayerTrace};

/// Everything loaded for one selected match.
#[derive(Debug, Clone)]
pub struct SelectedMatch {
    pub match_id: String,
    pub summary: MatchSummary,
    pub roster: Roster,
    pub feed: Vec<PossessionEvent>,
}

impl SelectedMatch {
    pub fn entries(&self) -> &[RosterEntry] {
        self.roster.entries()
    }

    /// Roster label, or the bare id for objects missing from the roster.
    pub fn label_for(&self, trackable_object: &str) -> String {
        self.roster
            .label(trackable_object)
            .map(str::to_string)
            .unwrap_or_else(|| trackable_object.to_string())
    }
}

/// Both periods rendered for one player.
#[derive(Debug, Clone)]
pub struct PlayerHeatmaps {
    pub label: String,
    pub trace: PlayerTrace,
    /// One outcome per period, period 1 first
    pub outcomes: Vec<RenderOutcome>,
}

#[derive(Debug)]
pub struct HeatmapSession<S> {
    source: S,
    catalog: MatchCatalog,
    renderer: Renderer,
}

impl HeatmapSession<FsMatchSource> {
    /// Directory-backed session built from config.
    pub fn from_config(config: &HeatmapConfig) -> std::result::Result<Self, LoadError> {
        let render = config.render.clone();
        let renderer = match &config.pitch_image {
            Some(path) => {
                let background = Background::load(path, render.width, render.height)?;
                Renderer::new(render, background)
            }
            None => Renderer::with_procedural_pitch(render),
        };

        Self::open(FsMatchSource::new(&config.data_root), &config.match_ids, renderer)
    }
}

impl<S: MatchSource> HeatmapSession<S> {
    /// Load the catalog for `match_ids` up front.
    pub fn open<I, T>(source: S, match_ids: I, renderer: Renderer) -> std::result::Result<Self, LoadError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let catalog = MatchCatalog::load(&source, match_ids)?;
        Ok(Self { source, catalog, renderer })
    }

    pub fn catalog(&self) -> &MatchCatalog {
        &self.catalog
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn list_matches(&self) -> Vec<(String, String)> {
        self.catalog.list_matches()
    }

    pub fn select_match(&self, match_id: &str) -> std::result::Result<SelectedMatch, LoadError> {
        let summary = self.catalog.summary(match_id)?.clone();
        let data = self.source.match_data(match_id)?;
        let roster = resolve_roster(&data);
        let feed = self.source.structured_data(match_id)?;

        info!(
            match_id,
            fixture = %summary.display_name(),
            players = roster.len(),
            identity_mismatches = roster.anomalies().len(),
            events = feed.len(),
            "match selected"
        );

        Ok(SelectedMatch { match_id: match_id.to_string(), summary, roster, feed })
    }

    pub fn list_players(&self, selected: &SelectedMatch) -> Vec<(String, String)> {
        selected
            .roster
            .labels()
            .iter()
            .map(|(id, label)| (id.clone(), label.clone()))
            .collect()
    }

    /// An id with no samples yields an empty trace rather than an error.
    pub fn select_player(&self, selected: &SelectedMatch, trackable_object: &str) -> PlayerTrace {
        extract_trace(&selected.feed, trackable_object)
    }

    pub fn render(
        &self,
        trace: &PlayerTrace,
        period: Period,
        label: &str,
    ) -> std::result::Result<RenderOutcome, RenderError> {
        self.renderer.render(trace, period, label)
    }

    /// Select a player and render both periods.
    pub fn render_player(&self, selected: &SelectedMatch, trackable_object: &str) -> Result<PlayerHeatmaps> {
        let label = selected.label_for(trackable_object);
        let trace = self.select_player(selected, trackable_object);

        let outcomes = Period::ALL
            .into_iter()
            .map(|period| self.render(&trace, period, &label))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(PlayerHeatmaps { label, trace, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeatmapError;
    use crate::source::testing::*;
    use crate::source::STRUCTURED_DATA_FILE;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn match_with_players() -> Value {
        let mut data = match_json(("145", "Inter", "INT"), ("139", "Juventus", "JUV"), (1, 1));
        data["players"] = json!([
            {"trackable_object": 7, "team_id": 145, "first_name": "A", "last_name": "B"},
            {"trackable_object": 9, "team_id": 139, "first_name": "C", "last_name": "D"},
            {"trackable_object": 11, "team_id": 1, "first_name": "E", "last_name": "F"}
        ]);
        data
    }

    fn feed() -> Value {
        json!([
            {"period": 1, "data": [
                {"trackable_object": 7, "x": 10.0, "y": 5.0},
                {"trackable_object": 9, "x": -20.0, "y": 0.0},
                {"trackable_object": null, "x": 0.0, "y": 0.0},
                {"trackable_object": 55, "x": 1.0, "y": null}
            ]},
            {"period": 2, "data": [{"trackable_object": 7, "x": -10.0, "y": -5.0}]},
            {"period": null, "data": [{"trackable_object": 7, "x": 50.0, "y": 30.0}]}
        ])
    }

    fn session(dir: &TempDir) -> HeatmapSession<FsMatchSource> {
        let mut config = HeatmapConfig::preview();
        config.data_root = dir.path().to_path_buf();
        config.match_ids = vec!["2068".to_string()];
        HeatmapSession::from_config(&config).unwrap()
    }

    #[test]
    fn test_full_selection_flow() {
        let dir = TempDir::new().unwrap();
        write_match(dir.path(), "2068", &match_with_players(), Some(&feed()));
        let session = session(&dir);

        assert_eq!(session.list_matches(), vec![("2068".to_string(), "Inter vs Juventus".to_string())]);

        let selected = session.select_match("2068").unwrap();
        assert_eq!(selected.summary.scoreline(), "Inter 1 - 1 Juventus");
        assert_eq!(
            session.list_players(&selected),
            vec![
                ("7".to_string(), "A B (Team INT)".to_string()),
                ("9".to_string(), "C D (Team JUV)".to_string()),
                ("11".to_string(), "E F (Team 1)".to_string()),
            ]
        );

        let trace = session.select_player(&selected, "7");
        assert_eq!(trace.period_1.x(), &[10.0]);
        assert_eq!(trace.period_2.y(), &[-5.0]);

        let heatmaps = session.render_player(&selected, "7").unwrap();
        assert_eq!(heatmaps.outcomes.len(), 2);
        assert_eq!(
            heatmaps.outcomes[1].artifact().unwrap().title,
            "Heatmap for A B (Team INT) - Period 2"
        );
    }

    #[test]
    fn test_player_without_second_half_data() {
        let dir = TempDir::new().unwrap();
        write_match(dir.path(), "2068", &match_with_players(), Some(&feed()));
        let session = session(&dir);
        let selected = session.select_match("2068").unwrap();

        let heatmaps = session.render_player(&selected, "9").unwrap();
        assert!(heatmaps.outcomes[0].artifact().is_some());
        assert!(matches!(heatmaps.outcomes[1], RenderOutcome::NoData { period: Period::Second }));
    }

    #[test]
    fn test_empty_feed_reports_no_data_for_every_player() {
        let dir = TempDir::new().unwrap();
        write_match(dir.path(), "2068", &match_with_players(), Some(&json!([])));
        let session = session(&dir);
        let selected = session.select_match("2068").unwrap();

        for (id, _) in session.list_players(&selected) {
            let heatmaps = session.render_player(&selected, &id).unwrap();
            assert!(heatmaps.trace.is_empty());
            assert!(heatmaps.outcomes.iter().all(RenderOutcome::is_no_data));
        }
    }

    #[test]
    fn test_unknown_player_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        write_match(dir.path(), "2068", &match_with_players(), Some(&feed()));
        let session = session(&dir);
        let selected = session.select_match("2068").unwrap();

        let heatmaps = session.render_player(&selected, "404").unwrap();
        assert_eq!(heatmaps.label, "404");
        assert!(heatmaps.trace.is_empty());
    }

    #[test]
    fn test_missing_feed_aborts_selection_with_path() {
        let dir = TempDir::new().unwrap();
        write_match(dir.path(), "2068", &match_with_players(), None);
        let session = session(&dir);

        match session.select_match("2068") {
            Err(LoadError::FileNotFound { match_id, path }) => {
                assert_eq!(match_id, "2068");
                assert!(path.ends_with(STRUCTURED_DATA_FILE));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_match() {
        let dir = TempDir::new().unwrap();
        write_match(dir.path(), "2068", &match_with_players(), Some(&feed()));
        let session = session(&dir);

        let err: HeatmapError = session.select_match("9999").unwrap_err().into();
        assert!(matches!(err, HeatmapError::Load(LoadError::UnknownMatch(_))));
    }
}
