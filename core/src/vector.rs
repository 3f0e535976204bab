//! Small vector helpers layered on top of [`glam::Vec2`].

use glam::Vec2;

/// Distance below which a remaining offset counts as "arrived".
///
/// Enemies travel at least a few pixels per frame at any playable speed, so
/// the threshold sits far below a single frame's movement.
pub const ARRIVAL_EPSILON: f32 = 1.0e-4;

/// Reports whether `candidate` is strictly shorter than `other`.
#[must_use]
pub fn is_shorter(candidate: Vec2, other: Vec2) -> bool {
    candidate.length_squared() < other.length_squared()
}

/// Moves `position` by `step` without passing `target`.
///
/// When the step is at least as long as the remaining distance the result is
/// exactly `target`, so repeated calls land on the waypoint without rounding
/// drift.
#[must_use]
pub fn advance_toward(position: Vec2, target: Vec2, step: Vec2) -> Vec2 {
    if is_shorter(step, target - position) {
        position + step
    } else {
        target
    }
}

/// Reports whether the vector is approximately zero.
#[must_use]
pub fn approx_zero(value: Vec2) -> bool {
    value.length() < ARRIVAL_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_steps_are_applied_unchanged() {
        let next = advance_toward(Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(next, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn long_steps_land_exactly_on_target() {
        let target = Vec2::new(0.3, 0.7);
        let next = advance_toward(Vec2::new(0.1, 0.2), target, Vec2::new(5.0, 5.0));
        assert_eq!(next, target);
    }

    #[test]
    fn equal_length_steps_land_on_target() {
        let target = Vec2::new(100.0, 0.0);
        let next = advance_toward(Vec2::new(90.0, 0.0), target, Vec2::new(10.0, 0.0));
        assert_eq!(next, target);
    }

    #[test]
    fn comparison_uses_magnitude_only() {
        assert!(is_shorter(Vec2::new(3.0, 0.0), Vec2::new(0.0, -10.0)));
        assert!(!is_shorter(Vec2::new(0.0, -10.0), Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn approx_zero_uses_small_tolerance() {
        assert!(approx_zero(Vec2::ZERO));
        assert!(approx_zero(Vec2::new(5.0e-5, -5.0e-5)));
        assert!(!approx_zero(Vec2::new(0.01, 0.0)));
    }
}
