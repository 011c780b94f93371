//! # Models
//!
//! Typed records for the two per-match backing files.
//!
//! - `match_data` - teams, score and roster (`match_data.json`)
//! - `tracking` - possession events and tracking samples (`structured_data.json`)
//!
//! Required fields are enforced by serde at load time, so a record that
//! deserializes is safe to use without further key checks.

mod ids;
pub mod match_data;
pub mod tracking;

pub use match_data::{MatchData, RosterPlayer, TeamInfo};
pub use tracking::{PossessionEvent, TrackingSample};
