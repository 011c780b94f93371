//! # pitch_core - Player Heatmaps from Football Tracking Data
//!
//! Turns one match's tracking feed into per-player, per-period density
//! heatmaps drawn over a pitch.
//!
//! ## Pipeline
//! - `catalog` - load-once match summaries for selection
//! - `roster` - tracking id → "First Last (Team XYZ)"
//! - `trajectory` - one player's (x, y) samples, split by period
//! - `density` - Gaussian KDE over the pitch bounds
//! - `render` - overlay composited on a stretched pitch image
//!
//! `session::HeatmapSession` strings these together behind the selection
//! calls a front end needs.

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Rendered artifacts are large by nature
#![allow(clippy::large_enum_variant)]

pub mod catalog;
pub mod config;
pub mod density;
pub mod error;
pub mod models;
pub mod pitch;
pub mod render;
pub mod roster;
pub mod session;
pub mod source;
pub mod trajectory;

pub use catalog::{MatchCatalog, MatchSummary, DEFAULT_MATCH_IDS};
pub use config::{DensityConfig, HeatmapConfig, RenderConfig};
pub use density::{estimate_density, Bandwidth, DensityGrid};
pub use error::{HeatmapError, LoadError, RenderError, Result};
pub use pitch::{PitchBounds, PitchThird};
pub use render::{
    no_data_message, ArtifactMetadata, Background, HeatmapArtifact, RenderOutcome, Renderer,
};
pub use roster::{resolve_roster, IdentityMismatch, Roster, RosterEntry, TeamLabel};
pub use session::{HeatmapSession, PlayerHeatmaps, SelectedMatch};
pub use source::{FsMatchSource, MatchSource};
pub use trajectory::{extract_trace, CoordinateSeries, Period, PlayerTrace};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
