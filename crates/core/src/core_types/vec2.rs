//! Vector type alias for wind and current components.

use nalgebra::Vector2;

/// 2D vector type for wind and surface-current components.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`. By convention `x`
/// is the eastward (u) component and `y` the northward (v) component, both
/// in knots.
pub type Vec2 = Vector2<f64>;
