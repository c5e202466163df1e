//! Ball simulation state
//!
//! One owned record holds everything the engine and the bounce state machine
//! touch. Nothing else mutates it.

use serde::{Deserialize, Serialize};

use crate::consts::INITIAL_POSITION;

/// Where the ball is in its bounce cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallPhase {
    /// Moving under gravity, tick loop active (or about to be)
    #[default]
    Airborne,
    /// Touching the floor, squash playback in progress, loop paused
    Impacting,
    /// Stopped; waits for the next launch
    Resting,
}

/// What the renderer needs for one frame of the ball sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Vertical offset (px)
    pub position: f32,
    /// Vertical scale
    pub squash: f32,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Vertical speed (px/ms, negative = upward)
    pub speed: f32,
    /// Vertical offset (px, grows downward)
    pub position: f32,
    /// Speed at first floor contact of the current episode
    pub impact_force: Option<f32>,
    /// Current vertical scale of the sprite
    pub squash: f32,
    /// Floor position per tracked input, in input order
    pub floors: Vec<f32>,
    /// Input whose floor is the collision boundary
    pub focused: Option<usize>,
    /// Cumulative spin of the inner ball (degrees)
    pub rotation: f32,
    /// Tick loop scheduled, or paused in a squash
    pub running: bool,
    /// Bounce cycle phase
    pub phase: BallPhase,
    /// Timestamp the next elapsed time is measured from (ms)
    pub frame_origin: f64,
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SimState {
    /// Create a state at rest at the initial position with the given floors
    pub fn new(floors: Vec<f32>) -> Self {
        Self::at(INITIAL_POSITION, floors)
    }

    /// Create a state with the ball at a given position
    pub fn at(position: f32, floors: Vec<f32>) -> Self {
        Self {
            speed: 0.0,
            position,
            impact_force: None,
            squash: 1.0,
            floors,
            focused: None,
            rotation: 0.0,
            running: false,
            phase: BallPhase::Airborne,
            frame_origin: 0.0,
        }
    }

    /// Floor of the focused input, if any input is focused and tracked
    pub fn active_floor(&self) -> Option<f32> {
        self.focused.and_then(|i| self.floors.get(i).copied())
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> Frame {
        Frame {
            position: self.position,
            squash: self.squash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SimState::new(vec![100.0, 200.0]);
        assert_eq!(state.position, 72.0);
        assert_eq!(state.squash, 1.0);
        assert_eq!(state.phase, BallPhase::Airborne);
        assert!(!state.running);
        assert!(state.impact_force.is_none());
    }

    #[test]
    fn test_active_floor() {
        let mut state = SimState::new(vec![100.0, 200.0]);
        assert_eq!(state.active_floor(), None);

        state.focused = Some(1);
        assert_eq!(state.active_floor(), Some(200.0));

        // Untracked input behaves like no focus
        state.focused = Some(5);
        assert_eq!(state.active_floor(), None);
    }
}
