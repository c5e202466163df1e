//! Squash and stretch curves
//!
//! In flight the ball stretches with speed; on impact it squashes with the
//! impact force and the playback time scales with how hard it hit.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Stretch factor for a ball moving at `speed`
///
/// 1.0 at rest, `max_squash` at `max_speed`. Linear and unclamped, so faster
/// balls stretch past `max_squash`.
pub fn squash_by_speed(speed: f32, tuning: &Tuning) -> f32 {
    1.0 + tuning.stretch_slope() * speed.abs()
}

/// Deepest squash reached on an impact of `impact_force`
///
/// 1.0 for a zero-force touch, `min_squash` at `max_speed`.
pub fn squash_target(impact_force: f32, tuning: &Tuning) -> f32 {
    1.0 - tuning.impact_slope() * impact_force
}

/// Squash playback length (ms) for an impact of `impact_force`
pub fn squash_duration(impact_force: f32, tuning: &Tuning) -> f32 {
    tuning.max_squash_duration_ms * (impact_force / tuning.max_speed)
}

/// Timed deformation for the renderer to play at the floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquashAnimation {
    /// Vertical offset the ball is pinned at during playback
    pub position: f32,
    /// Scale keyframes: pre-impact, squashed, pre-impact
    pub keyframes: [f32; 3],
    /// Playback length (ms)
    pub duration_ms: f32,
}

impl SquashAnimation {
    /// Build the playback for a ball resting at `position` with scale `squash`
    pub fn new(position: f32, squash: f32, impact_force: f32, tuning: &Tuning) -> Self {
        Self {
            position,
            keyframes: [squash, squash_target(impact_force, tuning), squash],
            duration_ms: squash_duration(impact_force, tuning),
        }
    }

    /// The deepest point of the squash
    pub fn squash_to(&self) -> f32 {
        self.keyframes[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_squash_by_speed_bounds() {
        let tuning = Tuning::default();
        assert_eq!(squash_by_speed(0.0, &tuning), 1.0);
        assert!((squash_by_speed(tuning.max_speed, &tuning) - tuning.max_squash).abs() < EPS);
        // Direction does not matter
        assert_eq!(squash_by_speed(-0.9, &tuning), squash_by_speed(0.9, &tuning));
        // Unclamped above max speed
        assert!(squash_by_speed(3.0, &tuning) > tuning.max_squash);
    }

    #[test]
    fn test_squash_target_bounds() {
        let tuning = Tuning::default();
        assert_eq!(squash_target(0.0, &tuning), 1.0);
        assert!((squash_target(tuning.max_speed, &tuning) - tuning.min_squash).abs() < EPS);
    }

    #[test]
    fn test_duration_scales_with_force() {
        let tuning = Tuning::default();
        assert!((squash_duration(1.5, &tuning) - 150.0).abs() < EPS);
        assert!((squash_duration(0.75, &tuning) - 75.0).abs() < EPS);
        assert_eq!(squash_duration(0.0, &tuning), 0.0);
    }

    #[test]
    fn test_animation_keyframes() {
        let tuning = Tuning::default();
        let anim = SquashAnimation::new(500.0, 1.8, 1.5, &tuning);
        assert_eq!(anim.position, 500.0);
        assert_eq!(anim.keyframes[0], 1.8);
        assert_eq!(anim.keyframes[2], 1.8);
        assert!((anim.squash_to() - 0.5).abs() < EPS);
        assert!((anim.duration_ms - 150.0).abs() < EPS);
    }
}
