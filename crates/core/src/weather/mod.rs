//! Weather field sets consumed by the simulator
//!
//! A [`WeatherFieldSet`] is one forecast realization ("ensemble member"):
//! a finite, strictly increasing time axis plus a field that can be
//! sampled for wind and auxiliary scalars at any (time, position) pair.
//! The simulator only ever reads; fields are in-memory lookups with no
//! I/O behind them.
//!
//! Auxiliary scalars ride along with the wind on every sample. They are
//! keyed by the closed [`AuxField`] enum rather than free-form strings:
//! unknown names are rejected here at the accessor boundary instead of
//! flowing through the simulation as an open attribute bag.

pub mod synthetic;

use crate::core_types::geo::LatLon;
use crate::core_types::wind::Wind;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation failures at the weather accessor boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The time axis carries no timestamps at all.
    #[error("weather field set has an empty time axis")]
    EmptyTimeAxis,
    /// The time axis is not strictly increasing.
    #[error("weather time axis must be strictly increasing")]
    UnsortedTimeAxis,
    /// An auxiliary field name does not match the known schema.
    #[error("unknown auxiliary weather field '{0}'")]
    UnknownAuxField(String),
}

/// The closed schema of auxiliary per-sample scalars a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuxField {
    /// Combined sea/swell wave height, meters.
    WaveHeight,
    /// Swell component height, meters.
    SwellHeight,
    /// Gust speed, knots.
    WindGust,
    /// Surface pressure, hectopascals.
    Pressure,
    /// Surface current speed, knots.
    CurrentSpeed,
}

impl AuxField {
    /// Every known auxiliary field.
    pub const ALL: [AuxField; 5] = [
        AuxField::WaveHeight,
        AuxField::SwellHeight,
        AuxField::WindGust,
        AuxField::Pressure,
        AuxField::CurrentSpeed,
    ];

    /// The wire/grid name of this field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AuxField::WaveHeight => "wave_height",
            AuxField::SwellHeight => "swell_height",
            AuxField::WindGust => "wind_gust",
            AuxField::Pressure => "pressure",
            AuxField::CurrentSpeed => "current_speed",
        }
    }

    /// Resolve a grid field name against the known schema.
    pub fn parse(name: &str) -> Result<Self, WeatherError> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| WeatherError::UnknownAuxField(name.to_string()))
    }
}

impl fmt::Display for AuxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One point sample of a weather field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Eastward wind component, knots.
    pub u: f64,
    /// Northward wind component, knots.
    pub v: f64,
    /// Auxiliary scalars carried alongside the wind.
    pub aux: FxHashMap<AuxField, f64>,
}

impl WeatherSample {
    /// The wind observation this sample describes.
    #[must_use]
    pub fn wind(&self) -> Wind {
        Wind::from_components(self.u, self.v)
    }
}

/// A queryable forecast field: wind plus auxiliary scalars at any
/// (time, position) pair.
///
/// Implementations must be cheap, pure lookups; the optimizer samples
/// them from rayon workers concurrently.
pub trait WeatherField: Send + Sync {
    /// Sample the field. `time` is one of the owning set's axis points
    /// during simulation, but implementations should interpolate or clamp
    /// rather than panic on other values.
    fn sample(&self, time: DateTime<Utc>, location: LatLon) -> WeatherSample;
}

/// One ensemble member: a validated time axis and its field.
pub struct WeatherFieldSet {
    axis: Vec<DateTime<Utc>>,
    field: Box<dyn WeatherField>,
}

impl fmt::Debug for WeatherFieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherFieldSet")
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

impl WeatherFieldSet {
    /// Wrap a field with its forecast time axis.
    ///
    /// The axis must be non-empty and strictly increasing (sorted,
    /// duplicate-free); anything else is a boundary validation error, not
    /// a condition the simulator ever sees.
    pub fn new(
        axis: Vec<DateTime<Utc>>,
        field: Box<dyn WeatherField>,
    ) -> Result<Self, WeatherError> {
        if axis.is_empty() {
            return Err(WeatherError::EmptyTimeAxis);
        }
        if axis.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(WeatherError::UnsortedTimeAxis);
        }
        Ok(WeatherFieldSet { axis, field })
    }

    /// The sorted, unique forecast timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.axis
    }

    /// Sample the member's field.
    #[must_use]
    pub fn sample(&self, time: DateTime<Utc>, location: LatLon) -> WeatherSample {
        self.field.sample(time, location)
    }
}

/// Whether every member of an ensemble shares one time axis.
///
/// Ensemble-wide statistics align legs by timestamp, so the optimizer and
/// summarizer require this up front instead of discovering it row by row.
#[must_use]
pub fn axes_aligned(members: &[WeatherFieldSet]) -> bool {
    members
        .windows(2)
        .all(|pair| pair[0].timestamps() == pair[1].timestamps())
}

/// Spatially and temporally uniform wind, no auxiliary fields.
///
/// The degenerate field every scenario test starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantWindField {
    u: f64,
    v: f64,
}

impl ConstantWindField {
    /// Uniform wind from eastward/northward components in knots.
    #[must_use]
    pub const fn new(u: f64, v: f64) -> Self {
        ConstantWindField { u, v }
    }
}

impl WeatherField for ConstantWindField {
    fn sample(&self, _time: DateTime<Utc>, _location: LatLon) -> WeatherSample {
        WeatherSample {
            u: self.u,
            v: self.v,
            aux: FxHashMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn axis_must_be_non_empty() {
        let err = WeatherFieldSet::new(vec![], Box::new(ConstantWindField::new(5.0, 0.0)));
        assert_eq!(err.err(), Some(WeatherError::EmptyTimeAxis));
    }

    #[test]
    fn axis_must_be_strictly_increasing() {
        for axis in [vec![t(6), t(0)], vec![t(0), t(0)]] {
            let err = WeatherFieldSet::new(axis, Box::new(ConstantWindField::new(5.0, 0.0)));
            assert_eq!(err.err(), Some(WeatherError::UnsortedTimeAxis));
        }
    }

    #[test]
    fn aux_schema_round_trips_and_rejects_unknowns() {
        for field in AuxField::ALL {
            assert_eq!(AuxField::parse(field.name()), Ok(field));
        }
        assert_eq!(
            AuxField::parse("cloud_cover"),
            Err(WeatherError::UnknownAuxField("cloud_cover".to_string()))
        );
    }

    #[test]
    fn constant_field_is_uniform() {
        let set = WeatherFieldSet::new(
            vec![t(0), t(6)],
            Box::new(ConstantWindField::new(0.0, -12.0)),
        )
        .unwrap();
        let here = set.sample(t(0), LatLon::new(0.0, 0.0));
        let there = set.sample(t(6), LatLon::new(-40.0, 170.0));
        assert_eq!(here, there);
        // Southward flow comes from the north.
        assert_eq!(here.wind().compass_point(), "N");
    }

    #[test]
    fn alignment_check_spots_differing_axes() {
        let a = WeatherFieldSet::new(vec![t(0), t(6)], Box::new(ConstantWindField::new(5.0, 0.0)))
            .unwrap();
        let b = WeatherFieldSet::new(vec![t(0), t(6)], Box::new(ConstantWindField::new(7.0, 0.0)))
            .unwrap();
        let c = WeatherFieldSet::new(vec![t(0), t(12)], Box::new(ConstantWindField::new(7.0, 0.0)))
            .unwrap();
        assert!(axes_aligned(&[a, b]));

        let a = WeatherFieldSet::new(vec![t(0), t(6)], Box::new(ConstantWindField::new(5.0, 0.0)))
            .unwrap();
        assert!(!axes_aligned(&[a, c]));
    }
}
