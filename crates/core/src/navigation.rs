//! Rhumbline navigation oracle
//!
//! The simulator never does geometry itself; it asks a [`Navigator`] for
//! bearings, distances, and displaced positions. [`RhumblineNavigator`]
//! is the stock implementation: constant-bearing (loxodrome) navigation on
//! a spherical earth via the Mercator meridional stretch.
//!
//! # Formulas
//! ```text
//! ψ(φ)   = ln(tan(π/4 + φ/2))                  meridional parts
//! θ      = atan2(Δλ, Δψ)                       rhumb bearing
//! d      = sqrt(Δφ² + q²·Δλ²) · R              rhumb distance
//! q      = Δφ/Δψ   (or cos φ on E-W courses)
//! ```
//! with `R` chosen so one minute of latitude is one nautical mile.
//!
//! # References
//! - Bowditch, N. "The American Practical Navigator", ch. 12 (sailings).
//! - Williams, E. "Aviation Formulary", rhumbline navigation section.

use crate::core_types::geo::LatLon;
use crate::core_types::units::{NauticalMiles, Radians};
use std::f64::consts::{FRAC_PI_4, PI};

/// Nautical miles per radian of arc on the sphere (10800/π), the radius
/// that makes one minute of latitude exactly one nautical mile.
const NM_PER_RADIAN: f64 = 10800.0 / PI;

/// Threshold below which a course is treated as east-west for the
/// meridional-stretch division.
const MERIDIONAL_EPS: f64 = 1e-12;

/// Geometry oracle consumed by the simulator and optimizer.
///
/// Implementations must be pure: same inputs, same outputs, no state.
pub trait Navigator: Send + Sync {
    /// Initial (and, for a rhumbline, constant) bearing from `a` to `b`,
    /// normalized to `[0, 2π)`.
    fn bearing(&self, a: LatLon, b: LatLon) -> Radians;

    /// Distance from `a` to `b` along the navigator's path.
    fn distance(&self, a: LatLon, b: LatLon) -> NauticalMiles;

    /// The point `distance` along the path leaving `origin` on `bearing`.
    fn displace(&self, origin: LatLon, bearing: Radians, distance: NauticalMiles) -> LatLon;
}

/// Constant-bearing navigation on a spherical Mercator projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhumblineNavigator;

/// Meridional parts: the Mercator-stretched latitude.
fn meridional(lat_rad: f64) -> f64 {
    (FRAC_PI_4 + lat_rad / 2.0).tan().ln()
}

/// Wrap an angle to `[-π, π)`.
fn wrap_pi(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Wrap a longitude to `[-180, 180)` degrees.
fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl Navigator for RhumblineNavigator {
    fn bearing(&self, a: LatLon, b: LatLon) -> Radians {
        let dpsi = meridional(b.lat.to_radians()) - meridional(a.lat.to_radians());
        let dlon = wrap_pi((b.lon - a.lon).to_radians());
        Radians::new(dlon.atan2(dpsi)).normalized()
    }

    fn distance(&self, a: LatLon, b: LatLon) -> NauticalMiles {
        let phi1 = a.lat.to_radians();
        let phi2 = b.lat.to_radians();
        let dphi = phi2 - phi1;
        let dpsi = meridional(phi2) - meridional(phi1);
        let dlon = wrap_pi((b.lon - a.lon).to_radians());

        // The stretch factor degenerates to cos φ on east-west courses.
        let q = if dpsi.abs() > MERIDIONAL_EPS {
            dphi / dpsi
        } else {
            phi1.cos()
        };

        let arc = dphi.hypot(q * dlon);
        NauticalMiles::new(arc * NM_PER_RADIAN)
    }

    fn displace(&self, origin: LatLon, bearing: Radians, distance: NauticalMiles) -> LatLon {
        let delta = *distance / NM_PER_RADIAN;
        let theta = *bearing;
        let phi1 = origin.lat.to_radians();

        let dphi = delta * theta.cos();
        let phi2 = phi1 + dphi;
        let dpsi = meridional(phi2) - meridional(phi1);
        let q = if dpsi.abs() > MERIDIONAL_EPS {
            dphi / dpsi
        } else {
            phi1.cos()
        };

        let dlon = if q.abs() > MERIDIONAL_EPS {
            delta * theta.sin() / q
        } else {
            0.0
        };

        LatLon::new(
            phi2.to_degrees(),
            wrap_lon(origin.lon + dlon.to_degrees()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NAV: RhumblineNavigator = RhumblineNavigator;

    #[test]
    fn one_degree_of_latitude_is_sixty_miles() {
        let a = LatLon::new(10.0, -30.0);
        let b = LatLon::new(11.0, -30.0);
        assert_relative_eq!(*NAV.distance(a, b), 60.0, epsilon = 1e-9);
        assert_relative_eq!(NAV.bearing(a, b).to_degrees(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn equatorial_easting_is_sixty_miles_per_degree() {
        let a = LatLon::new(0.0, 0.0);
        let b = LatLon::new(0.0, 10.0);
        assert_relative_eq!(*NAV.distance(a, b), 600.0, epsilon = 1e-6);
        assert_relative_eq!(NAV.bearing(a, b).to_degrees(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn reciprocal_bearing_is_half_a_turn_away() {
        let a = LatLon::new(36.63, -121.90);
        let b = LatLon::new(19.79, -154.76);
        let out = NAV.bearing(a, b);
        let back = NAV.bearing(b, a);
        let separation = Radians::between(out, back);
        assert_relative_eq!(separation.to_degrees(), 180.0, epsilon = 1e-9);
        // Distance is symmetric along the same loxodrome.
        assert_relative_eq!(*NAV.distance(a, b), *NAV.distance(b, a), epsilon = 1e-9);
    }

    #[test]
    fn displacement_is_consistent_with_bearing_and_distance() {
        let origin = LatLon::new(36.63, -121.90);
        let bearing = Radians::from_degrees(235.0);
        let run = NauticalMiles::new(500.0);

        let fix = NAV.displace(origin, bearing, run);
        assert_relative_eq!(*NAV.distance(origin, fix), 500.0, epsilon = 1e-6);
        assert_relative_eq!(
            NAV.bearing(origin, fix).to_degrees(),
            235.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn displacement_crossing_the_antimeridian_wraps() {
        let origin = LatLon::new(0.0, 179.5);
        let fix = NAV.displace(origin, Radians::from_degrees(90.0), NauticalMiles::new(60.0));
        assert!(fix.lon < -179.0, "longitude did not wrap: {}", fix.lon);
        assert_relative_eq!(fix.lat, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_distance_is_a_fixed_point() {
        let origin = LatLon::new(-42.0, 147.0);
        let fix = NAV.displace(origin, Radians::from_degrees(123.0), NauticalMiles::new(0.0));
        assert_relative_eq!(fix.lat, origin.lat);
        assert_relative_eq!(fix.lon, origin.lon);
    }
}
