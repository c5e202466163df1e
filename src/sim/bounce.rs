//! Bounce resolution after a squash finishes playing

use super::state::{BallPhase, Frame, SimState};
use super::tick::stop;
use crate::tuning::Tuning;

/// How an impact episode ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BounceOutcome {
    /// Ball leaves the floor upward at `speed` (magnitude); resume ticking
    Rebound { speed: f32 },
    /// Ball is too slow to bounce and stays pinned to the floor
    Rest(Frame),
}

/// Resolve the impact once its squash playback has finished
///
/// The ball keeps `rebound_retention` of its impact speed. If what is left is
/// not above `min_speed` the ball comes to rest unsquashed on the floor.
pub fn finish_impact(state: &mut SimState, tuning: &Tuning) -> BounceOutcome {
    state.running = false;
    let next_speed = state.impact_force.take().unwrap_or(0.0) * tuning.rebound_retention;

    if next_speed > tuning.min_speed {
        state.speed = -next_speed;
        state.phase = BallPhase::Airborne;
        log::debug!("Rebound at {:.3}", next_speed);
        return BounceOutcome::Rebound { speed: next_speed };
    }

    stop(state);
    state.phase = BallPhase::Resting;
    state.squash = 1.0;
    if let Some(floor) = state.active_floor() {
        state.position = floor;
    }
    log::debug!("Ball at rest at {:.1}px", state.position);
    BounceOutcome::Rest(state.frame())
}
