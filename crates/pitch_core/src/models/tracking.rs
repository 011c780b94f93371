//! `structured_data.json`: the chronological possession-event feed.

use serde::{Deserialize, Serialize};

use super::ids::deserialize_opt_id;

/// One tracked entity's position within a possession event.
///
/// Ball and referee records usually carry no `trackable_object`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSample {
    #[serde(
        default,
        rename = "trackable_object",
        alias = "trackable_object_id",
        deserialize_with = "deserialize_opt_id"
    )]
    pub trackable_object: Option<String>,
    /// Pitch meters, origin at the centre spot; `null` on some feed records
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl TrackingSample {
    #[inline]
    pub fn is_object(&self, id: &str) -> bool {
        self.trackable_object.as_deref() == Some(id)
    }

    /// `(x, y)` when both coordinates are present.
    #[inline]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }
}

/// A snapshot of all tracked entities, tagged with the match period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionEvent {
    /// Raw period; anything other than 1 or 2 (including null) is ignored downstream
    #[serde(default)]
    pub period: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub data: Vec<TrackingSample>,
}
