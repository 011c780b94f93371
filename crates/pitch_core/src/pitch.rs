//! Pitch geometry and the coordinate ↔ pixel contract.
//!
//! ## Coordinate Systems
//!
//! **Pitch meters** (tracking feed, density grid):
//! - X: -52.5 = left goal line, +52.5 = right goal line (LENGTH direction, 105m)
//! - Y: -34 = bottom touchline, +34 = top touchline (WIDTH direction, 68m)
//! - Origin at the centre spot
//!
//! **Pixels** (rendered image):
//! - Column 0 = x_min, column `width` = x_max
//! - Row 0 = y_max (top of the image), row `height` = y_min
//!
//! The mapping is linear on both axes. Any background image is stretched
//! to the full bounds, so a hot spot lands on the same pitch zone no
//! matter the source image size.

use serde::{Deserialize, Serialize};

/// Standard pitch dimensions in meters.
pub mod field {
    /// Field length in meters
    pub const LENGTH_M: f64 = 105.0;
    /// Field width in meters
    pub const WIDTH_M: f64 = 68.0;
    pub const HALF_LENGTH_M: f64 = LENGTH_M * 0.5;
    pub const HALF_WIDTH_M: f64 = WIDTH_M * 0.5;
    /// Center circle radius (meters)
    pub const CENTER_CIRCLE_RADIUS_M: f64 = 9.15;
    /// Penalty area depth from goal line
    pub const PENALTY_AREA_LENGTH_M: f64 = 16.5;
    pub const PENALTY_AREA_WIDTH_M: f64 = 40.32;
    pub const GOAL_AREA_LENGTH_M: f64 = 5.5;
    pub const GOAL_AREA_WIDTH_M: f64 = 18.32;
    /// Penalty spot distance from goal line (meters)
    pub const PENALTY_SPOT_M: f64 = 11.0;
}

/// Axis-aligned pitch domain in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PitchBounds {
    /// Centre-origin 105m x 68m pitch.
    pub const STANDARD: PitchBounds = PitchBounds {
        x_min: -field::HALF_LENGTH_M,
        x_max: field::HALF_LENGTH_M,
        y_min: -field::HALF_WIDTH_M,
        y_max: field::HALF_WIDTH_M,
    };

    pub fn width_m(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height_m(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Map pitch meters to continuous pixel coordinates `(column, row)`.
    pub fn to_pixel(&self, x: f64, y: f64, width_px: u32, height_px: u32) -> (f64, f64) {
        let col = (x - self.x_min) / self.width_m() * width_px as f64;
        let row = (self.y_max - y) / self.height_m() * height_px as f64;
        (col, row)
    }

    /// Inverse of [`to_pixel`](Self::to_pixel).
    pub fn from_pixel(&self, col: f64, row: f64, width_px: u32, height_px: u32) -> (f64, f64) {
        let x = self.x_min + col / width_px as f64 * self.width_m();
        let y = self.y_max - row / height_px as f64 * self.height_m();
        (x, y)
    }

    /// Pitch coordinates of the centre of pixel `(col, row)`.
    pub fn pixel_center(&self, col: u32, row: u32, width_px: u32, height_px: u32) -> (f64, f64) {
        self.from_pixel(col as f64 + 0.5, row as f64 + 0.5, width_px, height_px)
    }

    /// Which third of the pitch (along x) a point falls in.
    pub fn third(&self, x: f64) -> PitchThird {
        let third = self.width_m() / 3.0;
        if x < self.x_min + third {
            PitchThird::Defensive
        } else if x < self.x_min + 2.0 * third {
            PitchThird::Middle
        } else {
            PitchThird::Attacking
        }
    }
}

impl Default for PitchBounds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Thirds along the x axis, left goal line first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchThird {
    Defensive,
    Middle,
    Attacking,
}

/// Whether `(x, y)` lies on a painted line of a standard pitch centred on
/// `bounds`, with `half_width_m` as the line half-thickness.
pub fn is_on_marking(bounds: &PitchBounds, x: f64, y: f64, half_width_m: f64) -> bool {
    let cx = (bounds.x_min + bounds.x_max) * 0.5;
    let cy = (bounds.y_min + bounds.y_max) * 0.5;
    let near = |a: f64, b: f64| (a - b).abs() <= half_width_m;
    let within = |v: f64, lo: f64, hi: f64| v >= lo - half_width_m && v <= hi + half_width_m;

    // Touchlines and goal lines
    if within(y, bounds.y_min, bounds.y_max) && (near(x, bounds.x_min) || near(x, bounds.x_max)) {
        return true;
    }
    if within(x, bounds.x_min, bounds.x_max) && (near(y, bounds.y_min) || near(y, bounds.y_max)) {
        return true;
    }

    // Halfway line
    if within(y, bounds.y_min, bounds.y_max) && near(x, cx) {
        return true;
    }

    let dist_centre = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
    if near(dist_centre, field::CENTER_CIRCLE_RADIUS_M) || dist_centre <= half_width_m * 2.0 {
        return true;
    }

    for (goal_x, inward) in [(bounds.x_min, 1.0), (bounds.x_max, -1.0)] {
        for (depth, width) in [
            (field::PENALTY_AREA_LENGTH_M, field::PENALTY_AREA_WIDTH_M),
            (field::GOAL_AREA_LENGTH_M, field::GOAL_AREA_WIDTH_M),
        ] {
            let front = goal_x + inward * depth;
            let (lo_x, hi_x) = if inward > 0.0 { (goal_x, front) } else { (front, goal_x) };
            let half = width * 0.5;
            if near(x, front) && within(y, cy - half, cy + half) {
                return true;
            }
            if within(x, lo_x, hi_x) && (near(y, cy - half) || near(y, cy + half)) {
                return true;
            }
        }

        let spot_x = goal_x + inward * field::PENALTY_SPOT_M;
        if ((x - spot_x).powi(2) + (y - cy).powi(2)).sqrt() <= half_width_m * 2.0 {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 1200;
    const H: u32 = 800;

    #[test]
    fn test_corners_map_to_image_corners() {
        let b = PitchBounds::STANDARD;
        assert_eq!(b.to_pixel(-52.5, 34.0, W, H), (0.0, 0.0));
        assert_eq!(b.to_pixel(52.5, -34.0, W, H), (W as f64, H as f64));
        assert_eq!(b.to_pixel(0.0, 0.0, W, H), (W as f64 / 2.0, H as f64 / 2.0));
    }

    #[test]
    fn test_positive_y_is_up() {
        let b = PitchBounds::STANDARD;
        let (_, row_top) = b.to_pixel(0.0, 30.0, W, H);
        let (_, row_bottom) = b.to_pixel(0.0, -30.0, W, H);
        assert!(row_top < row_bottom);
    }

    #[test]
    fn test_thirds() {
        let b = PitchBounds::STANDARD;
        assert_eq!(b.third(-40.0), PitchThird::Defensive);
        assert_eq!(b.third(0.0), PitchThird::Middle);
        assert_eq!(b.third(40.0), PitchThird::Attacking);
    }

    #[test]
    fn test_markings() {
        let b = PitchBounds::STANDARD;
        assert!(is_on_marking(&b, 0.0, 10.0, 0.15)); // halfway line
        assert!(is_on_marking(&b, 9.15, 0.0, 0.15)); // centre circle
        assert!(is_on_marking(&b, -52.5 + 16.5, 0.0, 0.15)); // penalty area front
        assert!(is_on_marking(&b, 52.5 - 11.0, 0.0, 0.15)); // penalty spot
        assert!(!is_on_marking(&b, 25.0, 15.0, 0.15));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: pixel mapping round-trips
            #[test]
            fn prop_pixel_round_trip(
                x in -52.5f64..52.5f64,
                y in -34.0f64..34.0f64
            ) {
                let b = PitchBounds::STANDARD;
                let (col, row) = b.to_pixel(x, y, W, H);
                let (bx, by) = b.from_pixel(col, row, W, H);
                prop_assert!((bx - x).abs() < 1e-9);
                prop_assert!((by - y).abs() < 1e-9);
            }

            /// Property: points inside the bounds land inside the image
            #[test]
            fn prop_inside_maps_inside(
                x in -52.5f64..52.5f64,
                y in -34.0f64..34.0f64
            ) {
                let (col, row) = PitchBounds::STANDARD.to_pixel(x, y, W, H);
                prop_assert!((0.0..=W as f64).contains(&col));
                prop_assert!((0.0..=H as f64).contains(&row));
            }
        }
    }
}
