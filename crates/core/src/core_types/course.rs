//! The steering decision taken for one simulation step.

use crate::core_types::geo::LatLon;
use crate::core_types::units::{Knots, Radians};
use serde::{Deserialize, Serialize};

/// One step's intended travel.
///
/// `bearing` is the direction actually steered toward the active waypoint.
/// `heading` carries the same value in this design; it stays a separate
/// field so a leeway/current correction can split the two without touching
/// every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Position reached at the end of the step.
    pub location: LatLon,
    /// Speed made good through the step.
    pub speed: Knots,
    /// Rhumbline bearing steered toward the active waypoint.
    pub bearing: Radians,
    /// Direction the bow points. Equal to `bearing` until leeway modeling
    /// lands.
    pub heading: Radians,
}

impl Course {
    /// Create a course record for a step.
    #[must_use]
    pub fn new(location: LatLon, speed: Knots, bearing: Radians, heading: Radians) -> Self {
        Course {
            location,
            speed,
            bearing,
            heading,
        }
    }
}
