//! Passage statistics
//!
//! Reduces a leg sequence to scalar statistics, and a collection of
//! ensemble runs to per-timestamp spread statistics. The single-passage
//! summary is what the route optimizer scores candidates on; the ensemble
//! table is the report a human reads before deciding whether to trust a
//! route.

use crate::core_types::geo::LatLon;
use crate::core_types::units::{Hours, Knots, NauticalMiles};
use crate::navigation::Navigator;
use crate::passage::Leg;
use crate::weather::AuxField;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Summarization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// No legs to reduce.
    #[error("cannot summarize an empty leg sequence")]
    EmptyPassage,
    /// Ensemble passages were not simulated on one shared time axis.
    #[error("ensemble passages do not share a time axis")]
    MisalignedEnsemble,
}

/// Spread of one scalar over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl FieldStats {
    /// Reduce an iterator of values; `None` when it is empty.
    fn over<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let mut stats = FieldStats {
            min: first,
            mean: first,
            max: first,
        };
        let mut count = 1.0;
        let mut sum = first;
        for value in iter {
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
            sum += value;
            count += 1.0;
        }
        stats.mean = sum / count;
        Some(stats)
    }
}

/// Scalar statistics of one simulated passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageSummary {
    /// Elapsed time between the first and last leg.
    pub hours: Hours,
    /// Net displacement: rhumbline distance between the last and first
    /// course positions, not the sum of step distances. Measures progress
    /// made good rather than water covered.
    pub distance: NauticalMiles,
    /// Wind speed extremes and mean over the legs, knots.
    pub wind_speed: FieldStats,
    /// Step distance extremes and mean over the legs, nautical miles.
    pub step_distance: FieldStats,
    /// Per-leg upwind indicator (relative wind within 45°). Kept as the
    /// raw list; callers reduce it however they need.
    pub upwind: Vec<bool>,
}

impl PassageSummary {
    /// Fraction of legs sailed upwind.
    #[must_use]
    pub fn upwind_fraction(&self) -> f64 {
        if self.upwind.is_empty() {
            return 0.0;
        }
        let count = self.upwind.iter().filter(|&&up| up).count();
        count as f64 / self.upwind.len() as f64
    }

    /// Strongest wind seen on the passage.
    #[must_use]
    pub fn max_wind(&self) -> Knots {
        Knots::new(self.wind_speed.max)
    }
}

/// Reduce one passage's legs to scalar statistics.
pub fn summarize(legs: &[Leg], nav: &dyn Navigator) -> Result<PassageSummary, SummaryError> {
    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        return Err(SummaryError::EmptyPassage);
    };

    let wind_speed = FieldStats::over(legs.iter().map(|leg| *leg.wind.speed()))
        .ok_or(SummaryError::EmptyPassage)?;
    let step_distance = FieldStats::over(legs.iter().map(|leg| *leg.distance))
        .ok_or(SummaryError::EmptyPassage)?;

    Ok(PassageSummary {
        hours: Hours::from_duration(last.time - first.time),
        distance: nav.distance(last.course.location, first.course.location),
        wind_speed,
        step_distance,
        upwind: legs.iter().map(Leg::is_upwind).collect(),
    })
}

/// One timestamp's spread across an aligned ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleRow {
    /// The shared leg timestamp.
    pub time: DateTime<Utc>,
    /// Lead member's position at this timestamp.
    pub location: LatLon,
    /// Wind speed spread across members, knots.
    pub wind_speed: FieldStats,
    /// Step distance spread across members, nautical miles.
    pub step_distance: FieldStats,
    /// Spread of every auxiliary field carried by all members.
    pub aux: FxHashMap<AuxField, FieldStats>,
}

/// Align ensemble leg sequences by timestamp and reduce each row across
/// members.
///
/// Every sequence must come from a simulation against the same time
/// axis: equal leg counts with pairwise-equal timestamps. Misalignment
/// is a caller error (`MisalignedEnsemble`), not something to paper over
/// by dropping rows; callers that want a report over a shorter horizon
/// pass equal-length leg prefixes. Auxiliary fields are reduced when
/// present in every member at that row; a field missing from any member
/// is skipped.
pub fn summarize_ensemble(members: &[&[Leg]]) -> Result<Vec<EnsembleRow>, SummaryError> {
    let lead = *members.first().ok_or(SummaryError::EmptyPassage)?;
    if lead.is_empty() {
        return Err(SummaryError::EmptyPassage);
    }
    for &other in &members[1..] {
        if other.len() != lead.len() {
            return Err(SummaryError::MisalignedEnsemble);
        }
        let aligned = lead.iter().zip(other).all(|(a, b)| a.time == b.time);
        if !aligned {
            return Err(SummaryError::MisalignedEnsemble);
        }
    }

    let mut rows = Vec::with_capacity(lead.len());
    for (row, lead_leg) in lead.iter().enumerate() {
        let wind_speed = FieldStats::over(members.iter().map(|m| *m[row].wind.speed()))
            .ok_or(SummaryError::EmptyPassage)?;
        let step_distance = FieldStats::over(members.iter().map(|m| *m[row].distance))
            .ok_or(SummaryError::EmptyPassage)?;

        let mut aux = FxHashMap::default();
        for &field in lead_leg.aux.keys() {
            let values: Option<Vec<f64>> = members
                .iter()
                .map(|m| m[row].aux.get(&field).copied())
                .collect();
            if let Some(stats) = values.and_then(FieldStats::over) {
                aux.insert(field, stats);
            }
        }

        rows.push(EnsembleRow {
            time: lead_leg.time,
            location: lead_leg.course.location,
            wind_speed,
            step_distance,
            aux,
        });
    }
    Ok(rows)
}
