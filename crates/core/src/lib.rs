//! Windward Passage Planning Core Library
//!
//! Plans ocean sailing passages by simulating how a sailboat traverses a
//! route under time-varying wind forecasts, and by searching for a
//! better-than-direct route.
//!
//! ## What lives here
//!
//! - A simplified polar performance model mapping wind and bearing to
//!   achievable boat speed
//! - A passage simulator that walks a waypoint list across a forecast
//!   time axis, prorating arrivals and flagging forecast exhaustion
//! - Summaries of single passages and aligned forecast ensembles
//! - A route optimizer that scores a family of single-deviation routes
//!   across an ensemble and rejects unsafe candidates
//!
//! Forecast acquisition, plotting, and report formatting are deliberately
//! elsewhere: this crate consumes in-memory weather fields through the
//! [`weather::WeatherField`] boundary and geometry through the
//! [`navigation::Navigator`] oracle, and exposes plain data back.

// Core types and utilities
pub mod core_types;

// Geometry oracle (rhumbline sailings)
pub mod navigation;

// Vessel performance model
pub mod polar;

// Passage simulation state machine
pub mod passage;

// Route optimization search
pub mod router;

// Passage and ensemble statistics
pub mod summary;

// Weather field boundary and synthetic forecasts
pub mod weather;

// Re-export core types
pub use core_types::{Course, Hours, Knots, LatLon, NauticalMiles, Radians, Vec2, Wind};

// Re-export the main operations and their records
pub use navigation::{Navigator, RhumblineNavigator};
pub use passage::{simulate, Leg, Passage, PassageError, PassageOutcome, STEERAGE_WAY};
pub use polar::{PolarConfig, PolarConfigError};
pub use router::{deviation_candidates, find_optimal_route, RouteError};
pub use summary::{summarize, summarize_ensemble, EnsembleRow, FieldStats, PassageSummary, SummaryError};
pub use weather::{AuxField, ConstantWindField, WeatherError, WeatherField, WeatherFieldSet, WeatherSample};
