//! Route optimization search
//!
//! Derivative-free search for a single deviation waypoint between two
//! fixed endpoints. Candidates are seeded along the diagonal of the
//! rectangle spanned by the endpoints' coordinates, each candidate is
//! simulated across every ensemble member, unsafe candidates (any member
//! seeing wind past the polar's do-not-sail limit) are discarded, and the
//! survivor with the lowest relative cost wins.
//!
//! The cost ("idealness", lower is better) is normalized against the
//! candidate population itself rather than any absolute scale:
//!
//! ```text
//! idealness = (time − avg_time)/avg_time + (avg_distance/distance − 1) + upwind_fraction
//! ```
//!
//! where `time`, `distance`, `upwind_fraction` are the candidate's means
//! across its own ensemble runs and the averages run over all scored
//! candidates, safe or not. A route is only ever compared to the routes
//! it competed against.

use crate::core_types::geo::LatLon;
use crate::core_types::units::Knots;
use crate::navigation::Navigator;
use crate::passage::simulate;
use crate::polar::PolarConfig;
use crate::summary::{summarize, PassageSummary};
use crate::weather::{axes_aligned, WeatherFieldSet};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Coordinate tolerance under which two endpoints count as the same
/// place.
const COINCIDENT_TOL_DEG: f64 = 1e-9;

/// Route search failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Inputs that cannot describe a search at all.
    #[error("degenerate route input: {0}")]
    DegenerateInput(&'static str),
    /// Ensemble members carry differing time axes.
    #[error("ensemble members do not share a time axis")]
    MisalignedEnsemble,
    /// Every candidate saw unsafe wind in at least one member. The
    /// search never falls back to an unsafe route.
    #[error("no candidate deviation is safe across the ensemble")]
    NoFeasibleRoute,
}

/// Candidate deviation waypoints between `start` and `end`.
///
/// The corners of the search rectangle are `(start.lat, end.lon)` and
/// `(end.lat, start.lon)`; candidates interpolate the diagonal between
/// them at `t = k/resolution` for `k` in `[0, resolution)`.
#[must_use]
pub fn deviation_candidates(start: LatLon, end: LatLon, resolution: u32) -> Vec<LatLon> {
    let c1 = LatLon::new(start.lat, end.lon);
    let c2 = LatLon::new(end.lat, start.lon);
    (0..resolution)
        .map(|k| c2.lerp(c1, f64::from(k) / f64::from(resolution)))
        .collect()
}

/// Per-candidate ensemble means, precomputed for cost ranking.
struct CandidateScore {
    waypoint: LatLon,
    mean_hours: f64,
    mean_distance: f64,
    mean_upwind: f64,
    max_wind: Knots,
}

impl CandidateScore {
    fn from_summaries(waypoint: LatLon, summaries: &[PassageSummary]) -> Option<Self> {
        let n = summaries.len() as f64;
        let mean_hours = summaries.iter().map(|s| *s.hours).sum::<f64>() / n;
        let mean_distance = summaries.iter().map(|s| *s.distance).sum::<f64>() / n;
        let mean_upwind = summaries.iter().map(PassageSummary::upwind_fraction).sum::<f64>() / n;
        let max_wind = summaries
            .iter()
            .map(PassageSummary::max_wind)
            .fold(Knots::new(0.0), Knots::max);

        // A zero net displacement cannot be ranked by relative distance.
        if mean_distance <= f64::EPSILON {
            return None;
        }
        Some(CandidateScore {
            waypoint,
            mean_hours,
            mean_distance,
            mean_upwind,
            max_wind,
        })
    }
}

/// Search for the safest/fastest single-deviation route.
///
/// Simulates `[start, candidate, end]` for every candidate against every
/// ensemble member. Candidate scoring fans out over the rayon pool; the
/// reduction is deterministic because results are collected in candidate
/// generation order and ties break toward the earliest candidate.
///
/// Candidates whose simulation produces no legs in some member are
/// unscorable: excluded from the cost normalization and from the safe
/// set. Data-exhausted partial passages are scored as-is; a forecast that
/// ends mid-ocean still says plenty about the route's early days.
pub fn find_optimal_route(
    start: LatLon,
    end: LatLon,
    start_time: DateTime<Utc>,
    ensemble: &[WeatherFieldSet],
    resolution: u32,
    polar: &PolarConfig,
    nav: &dyn Navigator,
) -> Result<LatLon, RouteError> {
    if resolution == 0 {
        return Err(RouteError::DegenerateInput("resolution must be positive"));
    }
    if ensemble.is_empty() {
        return Err(RouteError::DegenerateInput(
            "ensemble must have at least one member",
        ));
    }
    if start.coincident(end, COINCIDENT_TOL_DEG) {
        return Err(RouteError::DegenerateInput(
            "start and end must be distinct",
        ));
    }
    if !axes_aligned(ensemble) {
        return Err(RouteError::MisalignedEnsemble);
    }

    let candidates = deviation_candidates(start, end, resolution);
    let scored: Vec<Option<CandidateScore>> = candidates
        .par_iter()
        .map(|&waypoint| score_candidate(start, waypoint, end, start_time, ensemble, polar, nav))
        .collect();

    let scorable: Vec<&CandidateScore> = scored.iter().flatten().collect();
    if scorable.len() < scored.len() {
        debug!(
            dropped = scored.len() - scorable.len(),
            "candidates unscorable (no legs in some ensemble member)"
        );
    }

    // Population averages over every scored candidate, safe or not; the
    // cost is relative to the field the candidate competed in.
    let n = scorable.len() as f64;
    let avg_hours = scorable.iter().map(|c| c.mean_hours).sum::<f64>() / n;
    let avg_distance = scorable.iter().map(|c| c.mean_distance).sum::<f64>() / n;

    let mut best: Option<(f64, &CandidateScore)> = None;
    for &candidate in &scorable {
        if candidate.max_wind > polar.max_wind {
            continue;
        }
        let idealness = (candidate.mean_hours - avg_hours) / avg_hours
            + (avg_distance / candidate.mean_distance - 1.0)
            + candidate.mean_upwind;
        debug!(
            waypoint = %candidate.waypoint,
            idealness,
            "safe candidate"
        );
        // Strict comparison keeps the earliest candidate on ties.
        if best.is_none_or(|(lowest, _)| idealness < lowest) {
            best = Some((idealness, candidate));
        }
    }

    let Some((idealness, winner)) = best else {
        return Err(RouteError::NoFeasibleRoute);
    };
    info!(
        waypoint = %winner.waypoint,
        idealness,
        candidates = resolution,
        members = ensemble.len(),
        "selected deviation waypoint"
    );
    Ok(winner.waypoint)
}

fn score_candidate(
    start: LatLon,
    waypoint: LatLon,
    end: LatLon,
    start_time: DateTime<Utc>,
    ensemble: &[WeatherFieldSet],
    polar: &PolarConfig,
    nav: &dyn Navigator,
) -> Option<CandidateScore> {
    let route = [start, waypoint, end];
    let mut summaries = Vec::with_capacity(ensemble.len());
    for member in ensemble {
        // The route always has three waypoints, so simulate cannot reject
        // it; an empty run (start seated past the axis) is unscorable.
        let passage = simulate(&route, start_time, member, polar, nav).ok()?;
        match summarize(passage.legs(), nav) {
            Ok(summary) => summaries.push(summary),
            Err(_) => {
                debug!(waypoint = %waypoint, "candidate produced an empty run");
                return None;
            }
        }
    }
    CandidateScore::from_summaries(waypoint, &summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Hours;
    use crate::navigation::RhumblineNavigator;
    use crate::weather::synthetic::regular_axis;
    use crate::weather::{ConstantWindField, WeatherField, WeatherSample};
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use rustc_hash::FxHashMap;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn constant_member(u: f64, v: f64, steps: usize) -> WeatherFieldSet {
        WeatherFieldSet::new(
            regular_axis(t0(), Hours::new(6.0), steps),
            Box::new(ConstantWindField::new(u, v)),
        )
        .unwrap()
    }

    #[test]
    fn candidates_span_the_corner_diagonal() {
        let start = LatLon::new(2.0, 0.0);
        let end = LatLon::new(-2.0, 8.0);
        let candidates = deviation_candidates(start, end, 4);
        assert_eq!(candidates.len(), 4);
        // k = 0 sits on the (end.lat, start.lon) corner.
        assert_relative_eq!(candidates[0].lat, -2.0);
        assert_relative_eq!(candidates[0].lon, 0.0);
        assert_relative_eq!(candidates[3].lat, 1.0);
        assert_relative_eq!(candidates[3].lon, 6.0);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let polar = PolarConfig::default();
        let nav = RhumblineNavigator;
        let start = LatLon::new(0.0, 0.0);
        let end = LatLon::new(0.0, 10.0);
        let ensemble = vec![constant_member(0.0, -15.0, 8)];

        assert!(matches!(
            find_optimal_route(start, end, t0(), &ensemble, 0, &polar, &nav),
            Err(RouteError::DegenerateInput(_))
        ));
        assert!(matches!(
            find_optimal_route(start, end, t0(), &[], 10, &polar, &nav),
            Err(RouteError::DegenerateInput(_))
        ));
        assert!(matches!(
            find_optimal_route(start, start, t0(), &ensemble, 10, &polar, &nav),
            Err(RouteError::DegenerateInput(_))
        ));
    }

    #[test]
    fn misaligned_ensembles_are_rejected() {
        let polar = PolarConfig::default();
        let ensemble = vec![
            constant_member(0.0, -15.0, 8),
            constant_member(0.0, -15.0, 9),
        ];
        let result = find_optimal_route(
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 10.0),
            t0(),
            &ensemble,
            10,
            &polar,
            &RhumblineNavigator,
        );
        assert_eq!(result.err(), Some(RouteError::MisalignedEnsemble));
    }

    #[test]
    fn storm_everywhere_has_no_feasible_route() {
        let polar = PolarConfig::default();
        // 40 kn everywhere: past the 35 kn do-not-sail limit in every
        // member, so every candidate is unsafe.
        let ensemble = vec![constant_member(0.0, -40.0, 12)];
        let result = find_optimal_route(
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 10.0),
            t0(),
            &ensemble,
            8,
            &polar,
            &RhumblineNavigator,
        );
        assert_eq!(result.err(), Some(RouteError::NoFeasibleRoute));
    }

    /// Strong fair wind north of a latitude band, weak headwind south of
    /// it.
    struct LatBandField;

    impl WeatherField for LatBandField {
        fn sample(&self, _time: DateTime<Utc>, location: LatLon) -> WeatherSample {
            let (u, v) = if location.lat >= 0.5 {
                // 20 kn northerly: beam reach for an eastbound boat.
                (0.0, -20.0)
            } else {
                // 10 kn easterly: dead upwind and under-powered.
                (-10.0, 0.0)
            };
            WeatherSample {
                u,
                v,
                aux: FxHashMap::default(),
            }
        }
    }

    #[test]
    fn search_prefers_the_fair_wind_side() {
        let polar = PolarConfig::default();
        let ensemble = vec![WeatherFieldSet::new(
            regular_axis(t0(), Hours::new(6.0), 40),
            Box::new(LatBandField),
        )
        .unwrap()];

        let start = LatLon::new(2.0, 0.0);
        let end = LatLon::new(-2.0, 8.0);
        let best = find_optimal_route(
            start,
            end,
            t0(),
            &ensemble,
            4,
            &polar,
            &RhumblineNavigator,
        )
        .unwrap();

        // Candidates sit at latitudes -2, -1, 0, 1; only the northern one
        // keeps the route in the fair-wind band.
        assert_relative_eq!(best.lat, 1.0);
        assert_relative_eq!(best.lon, 6.0);
    }
}
