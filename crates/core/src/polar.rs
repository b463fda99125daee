//! Simplified polar performance model
//!
//! Maps a wind observation and an intended bearing to the speed the boat
//! can actually make good. The model is a four-regime simplification of a
//! polar diagram:
//!
//! - a **pointing cone** close to the wind where speed degrades linearly,
//! - a **ramp-up** region between the minimum usable and the rated wind,
//! - a **plateau** at hull speed between rated and maximum safe wind,
//! - a **cutoff** to zero below minimum usable and above maximum safe wind
//!   (the latter doubles as the route optimizer's safety criterion).

use crate::core_types::units::{Knots, Radians};
use crate::core_types::wind::Wind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A threshold ordering in [`PolarConfig`] does not describe a sailable
/// boat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid polar configuration: {0}")]
pub struct PolarConfigError(&'static str);

/// Immutable performance envelope of one vessel.
///
/// # Speed model
/// ```text
/// off_wind = fold(|wind.direction - bearing|)   into [0, π]
/// f(off_wind) = 1                               if off_wind > pointing_limit
///             = 0.5 + 0.5·off_wind/limit        otherwise
///
/// speed = f · max_speed · sqrt((W - W_min)/(W_rated - W_min))   W_min < W ≤ W_rated
///       = f · max_speed                                          W_rated < W ≤ W_max
///       = 0                                                      otherwise
/// ```
///
/// The square-root ramp is continuous at `W_rated` and monotonically
/// non-decreasing below it; the hard zero above `W_max` encodes "do not
/// sail" rather than a physical speed.
///
/// # Example
/// ```
/// use windward_core::core_types::{Knots, Radians, Wind};
/// use windward_core::polar::PolarConfig;
///
/// let polar = PolarConfig::default();
/// // 20 kn on the beam: plateau region, no pointing penalty.
/// let wind = Wind::new(Knots::new(20.0), Radians::from_degrees(0.0));
/// let speed = polar.speed(&wind, Radians::from_degrees(90.0));
/// assert_eq!(speed, polar.max_speed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarConfig {
    /// Half-angle of the no-go cone around the wind direction.
    pub pointing_limit: Radians,
    /// Hull speed, reached at the rated wind outside the pointing cone.
    pub max_speed: Knots,
    /// Minimum wind that moves the boat at all.
    pub min_wind: Knots,
    /// Wind speed at which the full polar speed is reached.
    pub rated_wind: Knots,
    /// Maximum safe wind; above this the model reports zero ("do not
    /// sail") and the optimizer treats the conditions as unsafe.
    pub max_wind: Knots,
}

impl Default for PolarConfig {
    /// A conservative 30-foot cruiser: 6 kn hull speed, 20° pointing
    /// cone, working range 3–35 kn of wind with full speed from 15 kn.
    fn default() -> Self {
        PolarConfig {
            pointing_limit: Radians::from_degrees(20.0),
            max_speed: Knots::new(6.0),
            min_wind: Knots::new(3.0),
            rated_wind: Knots::new(15.0),
            max_wind: Knots::new(35.0),
        }
    }
}

impl PolarConfig {
    /// Create a validated configuration.
    ///
    /// Rejects threshold orderings that would make the model degenerate:
    /// the wind range must satisfy `min_wind < rated_wind ≤ max_wind`, and
    /// both the pointing cone and the hull speed must be positive.
    pub fn new(
        pointing_limit: Radians,
        max_speed: Knots,
        min_wind: Knots,
        rated_wind: Knots,
        max_wind: Knots,
    ) -> Result<Self, PolarConfigError> {
        if *pointing_limit <= 0.0 {
            return Err(PolarConfigError("pointing limit must be positive"));
        }
        if *max_speed <= 0.0 {
            return Err(PolarConfigError("hull speed must be positive"));
        }
        if min_wind >= rated_wind {
            return Err(PolarConfigError("rated wind must exceed minimum wind"));
        }
        if rated_wind > max_wind {
            return Err(PolarConfigError("maximum wind must be at least rated wind"));
        }
        Ok(PolarConfig {
            pointing_limit,
            max_speed,
            min_wind,
            rated_wind,
            max_wind,
        })
    }

    /// Fraction of hull speed available at a given angle off the wind.
    ///
    /// Outside the pointing cone the full polar speed is available; inside
    /// it the fraction degrades linearly down to one half when pinching
    /// straight into the wind.
    fn directional_fraction(&self, off_wind: Radians) -> f64 {
        if *off_wind > *self.pointing_limit {
            1.0
        } else {
            0.5 + 0.5 * *off_wind / *self.pointing_limit
        }
    }

    /// Achievable boat speed for a wind observation and intended bearing.
    ///
    /// Pure and total: every input maps to a speed, with zero standing in
    /// for both "becalmed" and "do not sail".
    #[must_use]
    pub fn speed(&self, wind: &Wind, bearing: Radians) -> Knots {
        let off_wind = Radians::between(wind.direction(), bearing);
        let fraction = self.directional_fraction(off_wind);

        let w = *wind.speed();
        let speed = if w > *self.min_wind && w <= *self.rated_wind {
            let ramp = ((w - *self.min_wind) / (*self.rated_wind - *self.min_wind)).sqrt();
            fraction * *self.max_speed * ramp
        } else if w > *self.rated_wind && w <= *self.max_wind {
            fraction * *self.max_speed
        } else {
            0.0
        };
        Knots::new(speed)
    }
}
