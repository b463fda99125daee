//! Core types and utilities

pub mod course;
pub mod geo;
pub mod units;
pub mod vec2;
pub mod wind;

pub use course::Course;
pub use geo::LatLon;
pub use units::{Hours, Knots, NauticalMiles, Radians};
pub use vec2::Vec2;
pub use wind::Wind;
