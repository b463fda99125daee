//! Passage simulation state machine
//!
//! Advances a vessel along an ordered waypoint list through a forecast
//! field, one forecast interval at a time. Each step samples the wind at
//! the current position, asks the polar model for an achievable speed,
//! and either covers a full interval's distance or prorates the interval
//! when the active waypoint falls inside it.
//!
//! The walk ends in one of exactly two ways: the waypoint queue empties
//! (complete), or the forecast time axis runs out first (data-exhausted,
//! a flagged partial result rather than an error). Running out of data is
//! an ordinary outcome for long passages against short forecast runs, so
//! it is surfaced as a [`PassageOutcome`] variant the caller can inspect,
//! never as control flow.

use crate::core_types::course::Course;
use crate::core_types::geo::LatLon;
use crate::core_types::units::{Hours, Knots, NauticalMiles, Radians};
use crate::core_types::wind::Wind;
use crate::navigation::Navigator;
use crate::polar::PolarConfig;
use crate::weather::{AuxField, WeatherFieldSet};
use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Minimum speed made good, regardless of what the polar reports.
///
/// Keeps the walk strictly progressing: a becalmed boat still drifts,
/// motors, or works its way forward, and the simulation must never stall
/// on a zero-speed fixed point.
pub const STEERAGE_WAY: Knots = Knots::new(1.0);

/// Inputs that cannot describe a passage at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassageError {
    /// Fewer than two waypoints: there is no start/destination pair.
    #[error("a route needs at least two waypoints (start and destination)")]
    DegenerateRoute,
}

/// The record of one simulation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// The steering decision taken, with the position reached.
    pub course: Course,
    /// Simulation clock *after* the step.
    pub time: DateTime<Utc>,
    /// Wind sampled at the step's start position and forecast time.
    pub wind: Wind,
    /// Distance actually covered this step.
    pub distance: NauticalMiles,
    /// Angle between heading and the direction the wind blows from,
    /// folded into `[0, π]`.
    pub rel_wind: Radians,
    /// Auxiliary scalars sampled alongside the wind.
    pub aux: FxHashMap<AuxField, f64>,
}

impl Leg {
    /// Whether this step was sailed upwind (within 45° of the wind).
    #[must_use]
    pub fn is_upwind(&self) -> bool {
        *self.rel_wind < std::f64::consts::FRAC_PI_4
    }
}

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassageOutcome {
    /// Every waypoint was reached.
    Complete,
    /// The forecast time axis ran out before the final waypoint; the leg
    /// sequence is a usable prefix of the passage.
    DataExhausted,
}

/// The immutable result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    legs: Vec<Leg>,
    outcome: PassageOutcome,
}

impl Passage {
    /// The ordered leg sequence, one per internal timestep.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// How the run ended.
    #[must_use]
    pub fn outcome(&self) -> PassageOutcome {
        self.outcome
    }

    /// Whether every waypoint was reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == PassageOutcome::Complete
    }

    /// Consume the passage, keeping only the legs.
    #[must_use]
    pub fn into_legs(self) -> Vec<Leg> {
        self.legs
    }
}

/// Simulate a passage along `waypoints` through one forecast realization.
///
/// The clock starts at the first forecast timestamp at-or-after
/// `start_time`; a `start_time` before the forecast run simply starts at
/// the run's first timestamp. The walk needs two axis points to take a
/// single step, so a start seated on (or past) the final timestamp yields
/// an immediately data-exhausted passage with no legs.
///
/// State per step: current position, the simulation clock, the forecast
/// grid interval the clock sits in, and the remaining waypoint queue.
/// Within a forecast interval the boat holds one bearing and one speed;
/// arrival inside an interval advances the clock by the prorated fraction
/// only, so the next step reuses the remainder of the same interval.
pub fn simulate(
    waypoints: &[LatLon],
    start_time: DateTime<Utc>,
    member: &WeatherFieldSet,
    polar: &PolarConfig,
    nav: &dyn Navigator,
) -> Result<Passage, PassageError> {
    if waypoints.len() < 2 {
        return Err(PassageError::DegenerateRoute);
    }

    let axis = member.timestamps();
    let start_idx = axis.partition_point(|t| *t < start_time);
    let mut legs = Vec::new();

    if start_idx + 1 >= axis.len() {
        warn!(
            start = %start_time,
            "forecast axis has no interval at-or-after the start time"
        );
        return Ok(Passage {
            legs,
            outcome: PassageOutcome::DataExhausted,
        });
    }

    let mut here = waypoints[0];
    let mut grid_idx = start_idx;
    let mut cursor = axis[grid_idx];
    let mut next_sample = axis[grid_idx + 1];

    for &target in &waypoints[1..] {
        loop {
            // Wind at the step's start position, valid for the grid
            // interval the clock sits in.
            let sample = member.sample(axis[grid_idx], here);
            let wind = sample.wind();

            let bearing = nav.bearing(here, target);
            let speed = polar.speed(&wind, bearing).max(STEERAGE_WAY);
            let heading = bearing;
            let rel_wind = Radians::between(heading, wind.direction());

            let interval = next_sample - cursor;
            let mut run = speed * Hours::from_duration(interval);
            let remaining = nav.distance(here, target);

            let arrived = run >= remaining;
            if arrived {
                // The waypoint falls inside this interval: advance the
                // clock by the fraction of the interval actually needed.
                let fraction = if *run > 0.0 { *remaining / *run } else { 0.0 };
                let needed_ms = (interval.num_milliseconds() as f64 * fraction) as i64;
                cursor += Duration::milliseconds(needed_ms);
                run = remaining;
                here = target;
            } else {
                here = nav.displace(here, bearing, run);
                cursor = next_sample;
                grid_idx += 1;
            }

            debug!(
                wind = %wind,
                speed = %speed,
                run = %run,
                at = %here,
                clock = %cursor,
                "leg"
            );
            legs.push(Leg {
                course: Course::new(here, speed, bearing, heading),
                time: cursor,
                wind,
                distance: run,
                rel_wind,
                aux: sample.aux,
            });

            if arrived {
                break;
            }
            let Some(&upcoming) = axis.get(grid_idx + 1) else {
                warn!(
                    legs = legs.len(),
                    short_of_waypoint = %nav.distance(here, target),
                    "forecast data exhausted before reaching destination"
                );
                return Ok(Passage {
                    legs,
                    outcome: PassageOutcome::DataExhausted,
                });
            };
            next_sample = upcoming;
        }
    }

    Ok(Passage {
        legs,
        outcome: PassageOutcome::Complete,
    })
}
