//! Power-balance speed model.
//!
//! The power needed to hold a speed `V` (km/h) on a grade `p` (percent) is
//!
//! ```text
//! P(V) = ((f + p) * W * V) / 36 + (250 / 11664) * Cx * V^3
//! ```
//!
//! with rolling friction coefficient `f`, total weight `W` (kg) and drag
//! coefficient `Cx`. The first term is rolling resistance plus gravity, the
//! second is aerodynamic drag. For `W > 0` and `Cx > 0` the demand eventually
//! grows without bound, so a finite speed always balances a finite power.

/// Default resolution of the speed search, in km/h.
pub const DEFAULT_SPEED_STEP: f64 = 0.5;

const DRAG_FACTOR: f64 = 250.0 / 11664.0;

/// Power in watts needed to hold `speed` km/h on a `slope` percent grade.
#[inline]
pub fn required_power(
    friction: f64,
    slope: f64,
    weight: f64,
    drag_coefficient: f64,
    speed: f64,
) -> f64 {
    ((friction + slope) * weight * speed) / 36.0 + DRAG_FACTOR * drag_coefficient * speed.powi(3)
}

/// Find the slowest speed, in multiples of `step` km/h, at which the required
/// power reaches `target_power`.
///
/// Candidates `0, step, 2*step, ...` are tried in order, never beyond
/// `max_speed`. If none reaches the target (steep descents, hostile parameters)
/// the search gives up and returns `max_speed`. A non-positive or non-finite
/// `step` or `max_speed` returns `max(max_speed, 0)` without searching.
///
/// # Example
/// ```
/// use ride_profile::{solve_speed, DEFAULT_SPEED_STEP};
///
/// // 150 W on the flat, 80 kg, road bike drag
/// let speed = solve_speed(150.0, 0.005, 0.0, 80.0, 0.3, 60.0, DEFAULT_SPEED_STEP);
/// assert_eq!(speed, 29.0);
/// ```
pub fn solve_speed(
    target_power: f64,
    friction: f64,
    slope: f64,
    weight: f64,
    drag_coefficient: f64,
    max_speed: f64,
    step: f64,
) -> f64 {
    if !(step > 0.0 && step.is_finite() && max_speed > 0.0 && max_speed.is_finite()) {
        return max_speed.max(0.0);
    }

    let max_steps = (max_speed / step).floor() as u64;
    for k in 0..=max_steps {
        let speed = k as f64 * step;
        if required_power(friction, slope, weight, drag_coefficient, speed) >= target_power {
            return speed;
        }
    }

    max_speed
}
