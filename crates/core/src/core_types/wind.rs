//! Wind observations derived from forecast vector components.

use crate::core_types::units::{Knots, Radians};
use crate::core_types::vec2::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compass names for the eight principal wind directions, clockwise from
/// north. Indexed by `round(direction / 45°) mod 8`.
const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// A wind observation at one place and time.
///
/// `direction` is the compass bearing the wind blows **from**, normalized
/// to `[0, 2π)`. The from-convention is what makes a small angular
/// separation between heading and wind direction mean "sailing upwind";
/// both the polar model and the upwind statistics rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    speed: Knots,
    direction: Radians,
}

impl Wind {
    /// Create a wind from speed and the compass direction it blows from.
    #[must_use]
    pub fn new(speed: Knots, from_direction: Radians) -> Self {
        Wind {
            speed,
            direction: from_direction.normalized(),
        }
    }

    /// Create a wind from eastward (`u`) and northward (`v`) components in
    /// knots, the pair forecast grids carry.
    ///
    /// A calm (`u = v = 0`) maps to zero speed from due north.
    #[must_use]
    pub fn from_components(u: f64, v: f64) -> Self {
        let speed = Knots::new(u.hypot(v));
        // atan2(u, v) is the direction the air moves toward; the reciprocal
        // is where it comes from.
        let direction = Radians::new(f64::atan2(-u, -v)).normalized();
        Wind { speed, direction }
    }

    /// Wind speed in knots.
    #[must_use]
    pub fn speed(&self) -> Knots {
        self.speed
    }

    /// Compass bearing the wind blows from, in `[0, 2π)`.
    #[must_use]
    pub fn direction(&self) -> Radians {
        self.direction
    }

    /// The `(u, v)` component vector (eastward, northward) in knots.
    #[must_use]
    pub fn components(&self) -> Vec2 {
        let speed = *self.speed;
        let dir = *self.direction;
        Vec2::new(-speed * dir.sin(), -speed * dir.cos())
    }

    /// Eight-point compass name for the direction the wind blows from.
    #[must_use]
    pub fn compass_point(&self) -> &'static str {
        let sector = (self.direction.to_degrees() / 45.0).round() as usize % 8;
        COMPASS_POINTS[sector]
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.compass_point(), self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn westerly_blows_from_270() {
        // Pure eastward flow: u > 0, v = 0.
        let wind = Wind::from_components(10.0, 0.0);
        assert_relative_eq!(*wind.speed(), 10.0);
        assert_relative_eq!(wind.direction().to_degrees(), 270.0);
        assert_eq!(wind.compass_point(), "W");
    }

    #[test]
    fn northerly_blows_from_0() {
        // Southward flow comes from the north.
        let wind = Wind::from_components(0.0, -7.0);
        assert_relative_eq!(wind.direction().to_degrees(), 0.0);
        assert_eq!(wind.compass_point(), "N");
    }

    #[test]
    fn components_round_trip() {
        let wind = Wind::from_components(4.0, -3.0);
        let uv = wind.components();
        assert_relative_eq!(uv.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(uv.y, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn calm_is_zero_speed() {
        let calm = Wind::from_components(0.0, 0.0);
        assert_eq!(calm.speed(), Knots::new(0.0));
    }
}
