//! Variable timestep simulation tick
//!
//! Integrates the ball under gravity once per rendered frame. Elapsed time
//! comes from frame timestamps, so motion stays correct at any frame rate.

use super::squash::{SquashAnimation, squash_by_speed};
use super::state::{BallPhase, Frame, SimState};
use crate::tuning::Tuning;

/// What a single tick produced
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Still in flight; render this frame and tick again
    Moving(Frame),
    /// Hit the floor; play this squash, the loop is paused until it finishes
    Impact(SquashAnimation),
    /// Fell past the viewport with no floor; ball reset to the top and stopped
    OutOfBounds,
}

/// Advance the ball by `elapsed_ms`
pub fn tick(state: &mut SimState, elapsed_ms: f32, viewport_height: f32, tuning: &Tuning) -> TickOutcome {
    state.speed += tuning.gravity * elapsed_ms;
    state.position += state.speed * elapsed_ms;

    // No floor caught the ball
    if state.speed > tuning.out_of_bounds_speed
        && state.position > viewport_height + tuning.out_of_bounds_margin
    {
        log::debug!("Ball fell out of view at {:.1}px, resetting", state.position);
        state.position = 0.0;
        stop(state);
        state.phase = BallPhase::Resting;
        return TickOutcome::OutOfBounds;
    }

    // Only collide on the way down
    if state.speed > 0.0 && check_collision(state) {
        let impact_force = state.impact_force.unwrap_or(state.speed);
        state.phase = BallPhase::Impacting;
        log::debug!(
            "Impact at {:.1}px with force {:.3}",
            state.position,
            impact_force
        );
        return TickOutcome::Impact(SquashAnimation::new(
            state.position,
            state.squash,
            impact_force,
            tuning,
        ));
    }

    state.impact_force = None;
    state.squash = squash_by_speed(state.speed, tuning);
    TickOutcome::Moving(state.frame())
}

/// Check the ball against the active floor
///
/// On contact the ball is pinned to the floor and the impact force is
/// captured, but only the first time in a contact episode. Without an active
/// floor there is never a collision.
pub fn check_collision(state: &mut SimState) -> bool {
    let Some(floor) = state.active_floor() else {
        return false;
    };
    if state.position < floor {
        return false;
    }

    state.position = floor;
    if state.impact_force.is_none() {
        state.impact_force = Some(state.speed);
    }
    true
}

/// Start the tick loop without touching the speed
///
/// Returns true when a new loop was started and the caller should request a
/// frame. A loop that is already running (or paused in a squash) is left alone.
pub fn resume(state: &mut SimState, now: f64) -> bool {
    if state.running {
        return false;
    }
    state.running = true;
    state.phase = BallPhase::Airborne;
    state.frame_origin = now;
    true
}

/// Set the ball moving at `initial_speed` (negative = upward)
///
/// Same return value as [`resume`].
pub fn launch(state: &mut SimState, initial_speed: f32, now: f64) -> bool {
    state.speed = initial_speed;
    if state.running {
        return false;
    }
    state.impact_force = None;
    resume(state, now)
}

/// Halt the loop and kill all motion
pub fn stop(state: &mut SimState) {
    state.running = false;
    state.impact_force = None;
    state.speed = 0.0;
}
