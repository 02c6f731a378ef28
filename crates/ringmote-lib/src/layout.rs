//! Ring geometry — maps logical LED indices to physical ring positions.
//!
//! Index 0 sits at the top of the ring and indices proceed clockwise;
//! this matches the physical wiring order of the LED ring, so the angle
//! offset and winding direction must not change.

use serde::{Deserialize, Serialize};

/// A 2D position on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Compute positions for `count` items evenly spaced on a circle.
///
/// Item `i` is placed at angle `2π·i/count − π/2` (top-anchored,
/// clockwise) at distance `radius` from `(center_x, center_y)`.
/// `count = 0` yields an empty vector.
pub fn ring_positions(count: usize, radius: f64, center_x: f64, center_y: f64) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle =
                2.0 * std::f64::consts::PI * (i as f64) / (count as f64) - std::f64::consts::FRAC_PI_2;
            Point {
                x: center_x + radius * angle.cos(),
                y: center_y + radius * angle.sin(),
            }
        })
        .collect()
}
