//! Geographic positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position on the earth in degrees.
///
/// Positive latitude is north, positive longitude is east. Values are
/// expected to lie in the valid ranges (`[-90, 90]` and `(-180, 180]`);
/// enforcement is left to callers, matching how forecast grids hand out
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lon: f64,
}

impl LatLon {
    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        LatLon { lat, lon }
    }

    /// Coordinate-wise linear interpolation from `self` (t = 0) to
    /// `other` (t = 1).
    ///
    /// Interpolates raw coordinates, not great-circle arcs; the route
    /// optimizer uses this to seed candidate deviation waypoints inside a
    /// bounding rectangle, where coordinate-space interpolation is the
    /// intended behavior.
    #[must_use]
    pub fn lerp(self, other: LatLon, t: f64) -> LatLon {
        LatLon {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }

    /// Whether two positions coincide to within `tolerance_deg` on both
    /// axes. Used to reject degenerate routes before simulating.
    #[must_use]
    pub fn coincident(self, other: LatLon, tolerance_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance_deg
            && (self.lon - other.lon).abs() <= tolerance_deg
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat < 0.0 { 'S' } else { 'N' };
        let ew = if self.lon < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.2}\u{b0}{} {:.2}\u{b0}{}",
            self.lat.abs(),
            ns,
            self.lon.abs(),
            ew
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = LatLon::new(36.0, -122.0);
        let b = LatLon::new(20.0, -155.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_relative_eq!(mid.lat, 28.0);
        assert_relative_eq!(mid.lon, -138.5);
    }

    #[test]
    fn coincidence_tolerance() {
        let a = LatLon::new(10.0, 10.0);
        assert!(a.coincident(LatLon::new(10.0005, 9.9995), 1e-3));
        assert!(!a.coincident(LatLon::new(10.1, 10.0), 1e-3));
    }

    #[test]
    fn display_uses_hemisphere_letters() {
        let fix = LatLon::new(-19.79, -154.76);
        assert_eq!(format!("{fix}"), "19.79\u{b0}S 154.76\u{b0}W");
    }
}
