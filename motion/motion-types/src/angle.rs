//! Angle wrapping for circular joints and headings.

use std::f64::consts::{PI, TAU};

/// Sampling range of a circular joint: one full turn centered on zero.
pub const CIRCULAR_LIMITS: (f64, f64) = (-PI, PI);

/// Wraps an angle into the half-open interval `(-π, π]`.
///
/// # Example
///
/// ```
/// use motion_types::wrap_angle;
/// use std::f64::consts::PI;
///
/// assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
/// assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
/// assert!((wrap_angle(0.5) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = PI - (PI - theta).rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU
    if wrapped <= -PI { PI } else { wrapped }
}

/// Shortest signed rotation taking `from` to `to`, in `(-π, π]`.
///
/// # Example
///
/// ```
/// use motion_types::circular_difference;
/// use std::f64::consts::TAU;
///
/// // 6.0 rad is only 0.283 rad short of a full turn
/// let d = circular_difference(6.0, 0.0);
/// assert!((d - (6.0 - TAU)).abs() < 1e-12);
/// ```
#[must_use]
pub fn circular_difference(to: f64, from: f64) -> f64 {
    wrap_angle(to - from)
}

/// Returns `angle` shifted by whole turns to lie closest to `reference`.
///
/// Used to unwrap a sequence of circular joint values so that consecutive
/// entries never jump by more than half a turn.
#[must_use]
pub fn unwrap_toward(reference: f64, angle: f64) -> f64 {
    reference + circular_difference(angle, reference)
}
