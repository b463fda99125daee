//! Seeded synthetic forecast generation
//!
//! Produces smoothly varying, deterministic wind fields for demos and
//! property tests. Each ensemble member draws its own harmonic parameters
//! from a seeded RNG, so members disagree the way real forecast
//! realizations do while the whole ensemble stays reproducible from one
//! seed.
//!
//! The spatial structure is a pair of large-scale harmonics (a zonal wave
//! in longitude, a meridional wave in latitude) drifting slowly in time.
//! That is nothing like a numerical weather model and is not meant to be;
//! it is enough structure for an optimizer to find a preferred side of a
//! rectangle.

use crate::core_types::geo::LatLon;
use crate::core_types::units::Hours;
use crate::core_types::vec2::Vec2;
use crate::weather::{AuxField, WeatherError, WeatherField, WeatherFieldSet, WeatherSample};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::f64::consts::{PI, TAU};

/// Per-member seed spacing (odd 64-bit golden-ratio constant).
const MEMBER_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Build a regular time axis of `count` points spaced `step` apart.
#[must_use]
pub fn regular_axis(start: DateTime<Utc>, step: Hours, count: usize) -> Vec<DateTime<Utc>> {
    let step_ms = (*step * 3_600_000.0) as i64;
    (0..count)
        .map(|i| start + Duration::milliseconds(step_ms * i as i64))
        .collect()
}

/// One deterministic synthetic wind realization.
#[derive(Debug, Clone)]
pub struct SyntheticWindField {
    epoch: DateTime<Utc>,
    base: Vec2,
    amplitude: f64,
    zonal_scale_deg: f64,
    meridional_scale_deg: f64,
    phase: f64,
    drift_per_hour: f64,
}

impl SyntheticWindField {
    /// Draw a realization's parameters from a seed.
    ///
    /// `base` is the prevailing wind vector in knots; `variability`
    /// scales how far members wander from it (in knots, roughly the
    /// harmonic amplitude).
    #[must_use]
    pub fn from_seed(seed: u64, epoch: DateTime<Utc>, base: Vec2, variability: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        SyntheticWindField {
            epoch,
            base,
            amplitude: variability * rng.random_range(0.6..1.4),
            zonal_scale_deg: rng.random_range(18.0..42.0),
            meridional_scale_deg: rng.random_range(12.0..30.0),
            phase: rng.random_range(0.0..TAU),
            drift_per_hour: rng.random_range(0.005..0.02),
        }
    }

    fn hours_since_epoch(&self, time: DateTime<Utc>) -> f64 {
        (time - self.epoch).num_milliseconds() as f64 / 3_600_000.0
    }
}

impl WeatherField for SyntheticWindField {
    fn sample(&self, time: DateTime<Utc>, location: LatLon) -> WeatherSample {
        let tau = self.hours_since_epoch(time);
        let drift = self.drift_per_hour * tau;

        let zonal = (location.lon / self.zonal_scale_deg).mul_add(TAU, self.phase + drift);
        let meridional = (location.lat / self.meridional_scale_deg).mul_add(TAU, self.phase - drift);

        let u = self.amplitude.mul_add(
            zonal.sin() * (location.lat.to_radians()).cos(),
            self.base.x,
        );
        let v = self.amplitude.mul_add(0.6 * meridional.cos(), self.base.y);

        let speed = u.hypot(v);
        let mut aux = FxHashMap::default();
        // Fully developed sea approximation, meters from knots.
        aux.insert(AuxField::WaveHeight, 0.025 * speed.powf(1.5));
        aux.insert(AuxField::WindGust, speed * 1.25);
        // Slow synoptic pressure wave riding the same drift.
        aux.insert(
            AuxField::Pressure,
            6.0f64.mul_add((zonal + PI / 3.0).cos(), 1013.0),
        );

        WeatherSample { u, v, aux }
    }
}

/// Build a reproducible synthetic ensemble sharing one time axis.
///
/// Member `k` is seeded from `seed` plus `k` strides, so any member can
/// be regenerated independently. The shared axis keeps the ensemble
/// aligned for ensemble-wide statistics by construction.
pub fn synthetic_ensemble(
    seed: u64,
    members: usize,
    base: Vec2,
    variability: f64,
    axis: &[DateTime<Utc>],
) -> Result<Vec<WeatherFieldSet>, WeatherError> {
    let epoch = *axis.first().ok_or(WeatherError::EmptyTimeAxis)?;
    (0..members)
        .map(|member| {
            let member_seed = seed.wrapping_add(MEMBER_SEED_STRIDE.wrapping_mul(member as u64));
            let field = SyntheticWindField::from_seed(member_seed, epoch, base, variability);
            WeatherFieldSet::new(axis.to_vec(), Box::new(field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::axes_aligned;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn regular_axis_spacing() {
        let axis = regular_axis(epoch(), Hours::new(6.0), 4);
        assert_eq!(axis.len(), 4);
        assert_eq!(axis[3] - axis[0], Duration::hours(18));
    }

    #[test]
    fn same_seed_same_field() {
        let base = Vec2::new(12.0, 0.0);
        let a = SyntheticWindField::from_seed(42, epoch(), base, 5.0);
        let b = SyntheticWindField::from_seed(42, epoch(), base, 5.0);
        let here = LatLon::new(30.0, -140.0);
        let when = epoch() + Duration::hours(18);
        let sa = a.sample(when, here);
        let sb = b.sample(when, here);
        assert_relative_eq!(sa.u, sb.u);
        assert_relative_eq!(sa.v, sb.v);
    }

    #[test]
    fn members_disagree_but_share_the_axis() {
        let axis = regular_axis(epoch(), Hours::new(6.0), 8);
        let ensemble =
            synthetic_ensemble(7, 4, Vec2::new(10.0, -2.0), 4.0, &axis).unwrap();
        assert_eq!(ensemble.len(), 4);
        assert!(axes_aligned(&ensemble));

        let here = LatLon::new(25.0, -150.0);
        let first = ensemble[0].sample(axis[2], here);
        let second = ensemble[1].sample(axis[2], here);
        assert!(
            (first.u - second.u).abs() > 1e-9 || (first.v - second.v).abs() > 1e-9,
            "distinct members should produce distinct winds"
        );
    }

    #[test]
    fn samples_carry_the_aux_schema() {
        let field = SyntheticWindField::from_seed(1, epoch(), Vec2::new(15.0, 5.0), 3.0);
        let sample = field.sample(epoch(), LatLon::new(0.0, 0.0));
        assert!(sample.aux.contains_key(&AuxField::WaveHeight));
        assert!(sample.aux.contains_key(&AuxField::WindGust));
        assert!(sample.aux[&AuxField::WaveHeight] >= 0.0);
    }

    #[test]
    fn empty_axis_is_rejected() {
        let err = synthetic_ensemble(1, 2, Vec2::new(10.0, 0.0), 2.0, &[]);
        assert_eq!(err.err(), Some(WeatherError::EmptyTimeAxis));
    }
}
