//! Semantic unit types for type-safe nautical quantity handling
//!
//! This module provides newtype wrappers for the physical quantities the
//! simulation works in, to prevent accidental mixing of incompatible units
//! (e.g., knots with nautical miles, or a bearing with an hour count).
//!
//! # Design Philosophy
//! - All quantities use f64: geodetic math loses precision fast in f32
//! - Implements common traits (Add, Sub, Mul, Display, etc.) where the
//!   operation is physically meaningful (`Knots * Hours = NauticalMiles`)
//! - Total ordering via Ord trait (NaN handled via `total_cmp`)
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use windward_core::core_types::units::{Hours, Knots, NauticalMiles};
//!
//! let speed = Knots::new(6.0);
//! let run = speed * Hours::new(6.0);
//! assert_eq!(run, NauticalMiles::new(36.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, Mul, Sub};

/// Speed in knots (nautical miles per hour).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Knots(f64);

impl Knots {
    /// Create a new speed. Asserts the value is non-negative.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Knots::new: speed cannot be negative");
        Knots(value)
    }
}

impl Eq for Knots {}

impl PartialOrd for Knots {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Knots {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Knots {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Mul<Hours> for Knots {
    type Output = NauticalMiles;
    fn mul(self, rhs: Hours) -> NauticalMiles {
        NauticalMiles::new(self.0 * rhs.0)
    }
}

impl fmt::Display for Knots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} kn", self.0)
    }
}

/// Distance in nautical miles (1 NM = 1 minute of latitude).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NauticalMiles(f64);

impl NauticalMiles {
    /// Create a new distance. Asserts the value is non-negative.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0,
            "NauticalMiles::new: distance cannot be negative"
        );
        NauticalMiles(value)
    }
}

impl Eq for NauticalMiles {}

impl PartialOrd for NauticalMiles {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NauticalMiles {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for NauticalMiles {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Add for NauticalMiles {
    type Output = NauticalMiles;
    fn add(self, rhs: Self) -> Self {
        NauticalMiles(self.0 + rhs.0)
    }
}

impl AddAssign for NauticalMiles {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Div<Knots> for NauticalMiles {
    type Output = Hours;
    fn div(self, rhs: Knots) -> Hours {
        Hours::new(self.0 / rhs.0)
    }
}

impl fmt::Display for NauticalMiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} NM", self.0)
    }
}

/// Elapsed time in fractional hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hours(f64);

impl Hours {
    /// Create a new duration in hours.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Hours(value)
    }

    /// Convert a chrono duration to fractional hours.
    ///
    /// Millisecond resolution, which is far below the minute-scale
    /// timesteps forecast grids carry.
    #[must_use]
    pub fn from_duration(duration: chrono::Duration) -> Self {
        Hours(duration.num_milliseconds() as f64 / 3_600_000.0)
    }
}

impl Eq for Hours {}

impl PartialOrd for Hours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hours {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Hours {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Add for Hours {
    type Output = Hours;
    fn add(self, rhs: Self) -> Self {
        Hours(self.0 + rhs.0)
    }
}

impl Sub for Hours {
    type Output = Hours;
    fn sub(self, rhs: Self) -> Self {
        Hours(self.0 - rhs.0)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} h", self.0)
    }
}

/// Angle in radians.
///
/// Used for both compass bearings (clockwise from true north) and relative
/// angles. Bearings are kept normalized to `[0, 2π)`; relative angles are
/// produced folded into `[0, π]` by [`Radians::between`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

impl Radians {
    /// Create a new angle in radians.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Radians(value)
    }

    /// Create an angle from degrees.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        Radians(degrees.to_radians())
    }

    /// The angle in degrees.
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// The same direction normalized into `[0, 2π)`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Radians(self.0.rem_euclid(TAU))
    }

    /// Absolute angular separation between two directions, folded into
    /// `[0, π]` so that it never distinguishes port from starboard.
    #[must_use]
    pub fn between(a: Radians, b: Radians) -> Radians {
        let mut diff = (a.0 - b.0).abs().rem_euclid(TAU);
        if diff > PI {
            diff = TAU - diff;
        }
        Radians(diff)
    }
}

impl Deref for Radians {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}\u{b0}", self.0.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn speed_times_duration_is_distance() {
        let run = Knots::new(5.5) * Hours::new(2.0);
        assert_eq!(run, NauticalMiles::new(11.0));
    }

    #[test]
    fn distance_over_speed_is_duration() {
        let eta = NauticalMiles::new(60.0) / Knots::new(6.0);
        assert_relative_eq!(*eta, 10.0);
    }

    #[test]
    fn hours_from_duration_has_subhour_resolution() {
        let dt = Hours::from_duration(chrono::Duration::minutes(90));
        assert_relative_eq!(*dt, 1.5);
    }

    #[test]
    fn angular_separation_folds_past_half_turn() {
        let north = Radians::new(0.0);
        let south_west = Radians::from_degrees(225.0);
        assert_relative_eq!(Radians::between(north, south_west).to_degrees(), 135.0);
        // Symmetric in its arguments
        assert_relative_eq!(Radians::between(south_west, north).to_degrees(), 135.0);
    }

    #[test]
    fn normalization_wraps_negative_bearings() {
        let west = Radians::from_degrees(-90.0).normalized();
        assert_relative_eq!(west.to_degrees(), 270.0);
    }

    #[test]
    fn knots_total_order_handles_max() {
        let floor = Knots::new(1.0);
        assert_eq!(Knots::new(0.3).max(floor), floor);
        assert_eq!(Knots::new(4.0).max(floor), Knots::new(4.0));
    }
}
