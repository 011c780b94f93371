//! # Trajectory Extractor
//!
//! Pulls one tracked object's positions out of the possession-event feed,
//! split by match period.
//!
//! ## Algorithm
//! 1. Scan events in feed order
//! 2. Skip events whose period is not 1 or 2
//! 3. Keep every sample whose `trackable_object` equals the target
//!
//! No deduplication, reordering or outlier filtering: the output is a pure
//! filter of the feed, so feed order is preserved within each period.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::PossessionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    First,
    Second,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::First, Period::Second];

    /// `Some` only for raw periods 1 and 2.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Period::First),
            2 => Some(Period::Second),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Period::First => 1,
            Period::Second => 2,
        }
    }

    /// `"Period 1"`
    pub fn label(self) -> String {
        format!("Period {}", self.number())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period {}", self.number())
    }
}

/// Parallel x/y sequences in pitch meters. Lengths always match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl CoordinateSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self { x, y }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// A player's positions for one match, per period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrace {
    pub trackable_object: String,
    pub period_1: CoordinateSeries,
    pub period_2: CoordinateSeries,
}

impl PlayerTrace {
    pub fn new(trackable_object: impl Into<String>) -> Self {
        Self { trackable_object: trackable_object.into(), ..Self::default() }
    }

    pub fn period(&self, period: Period) -> &CoordinateSeries {
        match period {
            Period::First => &self.period_1,
            Period::Second => &self.period_2,
        }
    }

    fn period_mut(&mut self, period: Period) -> &mut CoordinateSeries {
        match period {
            Period::First => &mut self.period_1,
            Period::Second => &mut self.period_2,
        }
    }

    /// Periods that have no samples ("no data" for rendering).
    pub fn empty_periods(&self) -> Vec<Period> {
        Period::ALL.into_iter().filter(|&p| self.period(p).is_empty()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.period_1.is_empty() && self.period_2.is_empty()
    }
}

/// Build the per-period trace of `trackable_object` from the feed.
pub fn extract_trace(feed: &[PossessionEvent], trackable_object: &str) -> PlayerTrace {
    let mut trace = PlayerTrace::new(trackable_object);
    let mut skipped_events = 0usize;
    let mut missing_coordinates = 0usize;

    for event in feed {
        let Some(period) = event.period.and_then(Period::from_raw) else {
            skipped_events += 1;
            continue;
        };

        let series = trace.period_mut(period);
        for sample in event.data.iter().filter(|s| s.is_object(trackable_object)) {
            match sample.position() {
                Some((x, y)) => series.push(x, y),
                None => missing_coordinates += 1,
            }
        }
    }

    debug!(
        trackable_object,
        events = feed.len(),
        skipped_events,
        missing_coordinates,
        period_1 = trace.period_1.len(),
        period_2 = trace.period_2.len(),
        "trace extracted"
    );

    trace
}
