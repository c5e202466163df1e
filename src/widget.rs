//! Ball widget: page events in, render effects out
//!
//! The host forwards focus/blur, animation-frame and animation-finished
//! callbacks as [`Event`]s and applies the returned [`Effect`]s. Delayed
//! work comes back as [`ScheduledEvent`]s instead of timers, so every
//! transition can be driven without a browser.

use serde::{Deserialize, Serialize};

use crate::sim::{
    BallPhase, BounceOutcome, Frame, SimState, SquashAnimation, TickOutcome, finish_impact,
    launch, resume, tick,
};
use crate::tuning::Tuning;

/// Boot swing keyframes: (rotation in degrees, opacity)
pub const KICK_KEYFRAMES: [(f32, f32); 3] = [(0.0, 0.3), (-30.0, 1.0), (-30.0, 0.0)];

/// Something that happened on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Input `index` gained focus
    Focus(usize),
    /// The focused input lost focus
    Blur,
    /// Deferred half of a focus: the boot reaches the ball
    Kick,
    /// Deferred half of a blur: let the ball fall
    Resume,
    /// Animation frame fired
    Frame { viewport_height: f32 },
    /// Squash playback finished
    ImpactPlaybackDone,
}

/// Event the host must deliver after `delay_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub delay_ms: f32,
    pub event: Event,
}

/// Boot swing shown when the ball gets kicked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickAnimation {
    /// Vertical offset of the boot (where the ball is)
    pub top: f32,
    pub duration_ms: f32,
}

/// Instruction for the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Place the ball sprite
    Render(Frame),
    /// Spin the inner ball to this angle (degrees)
    Rotate(f32),
    /// Play the boot swing
    Kick(KickAnimation),
    /// Play a squash, then send `ImpactPlaybackDone`
    Squash(SquashAnimation),
    /// Deliver an event later
    Schedule(ScheduledEvent),
    /// Send a `Frame` on the next animation frame
    RequestFrame,
}

/// The kickable ball
#[derive(Debug, Clone)]
pub struct BallWidget {
    state: SimState,
    tuning: Tuning,
    /// Speed to launch with when the pending kick lands
    armed_kick: Option<f32>,
}

impl BallWidget {
    /// Create a widget resting at the configured initial position
    pub fn new(floors: Vec<f32>, tuning: Tuning) -> Self {
        let state = SimState::at(tuning.initial_position, floors);
        Self::with_state(state, tuning)
    }

    /// Create a widget around an existing state
    pub fn with_state(state: SimState, tuning: Tuning) -> Self {
        Self {
            state,
            tuning,
            armed_kick: None,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Handle one event at time `now` (ms)
    pub fn handle(&mut self, event: Event, now: f64) -> Vec<Effect> {
        match event {
            Event::Focus(index) => self.on_focus(index),
            Event::Blur => self.on_blur(),
            Event::Kick => self.on_kick(now),
            Event::Resume => self.start_loop(now),
            Event::Frame { viewport_height } => self.on_frame(now, viewport_height),
            Event::ImpactPlaybackDone => self.on_impact_done(now),
        }
    }

    fn on_focus(&mut self, index: usize) -> Vec<Effect> {
        self.state.focused = Some(index);
        let mut effects = Vec::with_capacity(2);

        // Screen y grows downward: a ball past the floor is below the input
        let below_floor = self
            .state
            .floors
            .get(index)
            .is_some_and(|&floor| self.state.position > floor);
        if below_floor {
            log::debug!("Kicking ball up to input {}", index);
            self.armed_kick = Some(-self.tuning.kick_speed);
            effects.push(Effect::Kick(KickAnimation {
                top: self.state.position,
                duration_ms: self.tuning.kick_animation_ms,
            }));
        }

        effects.push(Effect::Schedule(ScheduledEvent {
            delay_ms: self.tuning.kick_delay_ms,
            event: Event::Kick,
        }));
        effects
    }

    fn on_blur(&mut self) -> Vec<Effect> {
        self.state.focused = None;
        vec![Effect::Schedule(ScheduledEvent {
            delay_ms: self.tuning.blur_delay_ms,
            event: Event::Resume,
        })]
    }

    fn on_kick(&mut self, now: f64) -> Vec<Effect> {
        self.state.rotation -= self.tuning.rotation_step;
        let mut effects = vec![Effect::Rotate(self.state.rotation)];

        let started = match self.armed_kick.take() {
            Some(speed) => launch(&mut self.state, speed, now),
            None => resume(&mut self.state, now),
        };
        if started {
            effects.push(Effect::RequestFrame);
        }
        effects
    }

    fn start_loop(&mut self, now: f64) -> Vec<Effect> {
        if resume(&mut self.state, now) {
            vec![Effect::RequestFrame]
        } else {
            Vec::new()
        }
    }

    fn on_frame(&mut self, now: f64, viewport_height: f32) -> Vec<Effect> {
        // Stale frame: loop stopped, or paused in a squash
        if !self.state.running || self.state.phase != BallPhase::Airborne {
            return Vec::new();
        }

        let elapsed = (now - self.state.frame_origin) as f32;
        match tick(&mut self.state, elapsed, viewport_height, &self.tuning) {
            TickOutcome::Moving(frame) => {
                self.state.frame_origin = now;
                vec![Effect::Render(frame), Effect::RequestFrame]
            }
            TickOutcome::Impact(squash) => vec![Effect::Squash(squash)],
            TickOutcome::OutOfBounds => Vec::new(),
        }
    }

    fn on_impact_done(&mut self, now: f64) -> Vec<Effect> {
        if self.state.phase != BallPhase::Impacting {
            log::debug!("Ignoring squash completion outside an impact");
            return Vec::new();
        }

        match finish_impact(&mut self.state, &self.tuning) {
            BounceOutcome::Rebound { .. } => self.start_loop(now),
            BounceOutcome::Rest(frame) => vec![Effect::Render(frame)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f32 = 800.0;

    fn widget(position: f32, floors: Vec<f32>) -> BallWidget {
        BallWidget::with_state(SimState::at(position, floors), Tuning::default())
    }

    #[test]
    fn test_focus_below_floor_kicks() {
        let mut w = widget(500.0, vec![100.0, 500.0]);

        let effects = w.handle(Event::Focus(0), 0.0);
        assert_eq!(
            effects,
            vec![
                Effect::Kick(KickAnimation {
                    top: 500.0,
                    duration_ms: 600.0
                }),
                Effect::Schedule(ScheduledEvent {
                    delay_ms: 150.0,
                    event: Event::Kick
                }),
            ]
        );
        assert_eq!(w.state().focused, Some(0));
        // Nothing moves until the boot lands
        assert_eq!(w.state().speed, 0.0);
        assert!(!w.state().running);

        let effects = w.handle(Event::Kick, 150.0);
        assert_eq!(effects, vec![Effect::Rotate(-250.0), Effect::RequestFrame]);
        assert_eq!(w.state().speed, -2.2);
        assert!(w.state().running);
        assert_eq!(w.state().frame_origin, 150.0);
    }

    #[test]
    fn test_focus_above_floor_just_falls() {
        let mut w = widget(72.0, vec![500.0]);

        let effects = w.handle(Event::Focus(0), 0.0);
        assert_eq!(
            effects,
            vec![Effect::Schedule(ScheduledEvent {
                delay_ms: 150.0,
                event: Event::Kick
            })]
        );

        let effects = w.handle(Event::Kick, 150.0);
        assert_eq!(effects, vec![Effect::Rotate(-250.0), Effect::RequestFrame]);
        assert_eq!(w.state().speed, 0.0);
    }

    #[test]
    fn test_rotation_decreases_each_kick() {
        let mut w = widget(72.0, vec![500.0, 600.0]);
        w.handle(Event::Focus(0), 0.0);
        w.handle(Event::Kick, 150.0);
        w.handle(Event::Focus(1), 200.0);
        let effects = w.handle(Event::Kick, 350.0);
        assert_eq!(effects, vec![Effect::Rotate(-500.0)]);
    }

    #[test]
    fn test_blur_clears_floor_then_resumes() {
        let mut w = widget(500.0, vec![500.0]);
        w.handle(Event::Focus(0), 0.0);

        let effects = w.handle(Event::Blur, 10.0);
        assert_eq!(w.state().focused, None);
        assert_eq!(
            effects,
            vec![Effect::Schedule(ScheduledEvent {
                delay_ms: 200.0,
                event: Event::Resume
            })]
        );

        assert_eq!(w.handle(Event::Resume, 210.0), vec![Effect::RequestFrame]);
        // Second resume does not start a second loop
        assert!(w.handle(Event::Resume, 220.0).is_empty());
    }

    #[test]
    fn test_frame_renders_and_requests_next() {
        let mut w = widget(72.0, vec![500.0]);
        w.handle(Event::Focus(0), 0.0);
        w.handle(Event::Kick, 100.0);

        let effects = w.handle(Event::Frame { viewport_height: VIEWPORT }, 116.0);
        assert_eq!(effects.len(), 2);
        let Effect::Render(frame) = effects[0] else {
            panic!("expected a render first");
        };
        assert!(frame.position > 72.0);
        assert_eq!(effects[1], Effect::RequestFrame);
        assert_eq!(w.state().frame_origin, 116.0);
    }

    #[test]
    fn test_stale_frames_ignored() {
        let mut w = widget(72.0, vec![500.0]);
        assert!(w.handle(Event::Frame { viewport_height: VIEWPORT }, 16.0).is_empty());
        assert_eq!(w.state().position, 72.0);
    }

    #[test]
    fn test_impact_pauses_loop() {
        let mut state = SimState::at(499.0, vec![500.0]);
        state.focused = Some(0);
        state.speed = 1.0;
        let mut w = BallWidget::with_state(state, Tuning::default());
        w.handle(Event::Resume, 0.0);

        let effects = w.handle(Event::Frame { viewport_height: VIEWPORT }, 16.0);
        assert!(matches!(effects.as_slice(), [Effect::Squash(_)]));
        assert_eq!(w.state().phase, BallPhase::Impacting);

        // Frames during the squash are ignored
        assert!(w.handle(Event::Frame { viewport_height: VIEWPORT }, 32.0).is_empty());
        assert_eq!(w.state().position, 500.0);

        // Rebound restarts the loop with a fresh origin
        let effects = w.handle(Event::ImpactPlaybackDone, 200.0);
        assert_eq!(effects, vec![Effect::RequestFrame]);
        assert!(w.state().speed < 0.0);
        assert_eq!(w.state().frame_origin, 200.0);
    }

    #[test]
    fn test_soft_impact_rests_on_floor() {
        let mut state = SimState::at(500.0, vec![500.0]);
        state.focused = Some(0);
        state.running = true;
        state.phase = BallPhase::Impacting;
        state.impact_force = Some(0.1);
        let mut w = BallWidget::with_state(state, Tuning::default());

        let effects = w.handle(Event::ImpactPlaybackDone, 0.0);
        assert_eq!(
            effects,
            vec![Effect::Render(Frame {
                position: 500.0,
                squash: 1.0
            })]
        );
        assert_eq!(w.state().phase, BallPhase::Resting);
        assert!(w.handle(Event::ImpactPlaybackDone, 10.0).is_empty());
    }

    #[test]
    fn test_kick_during_squash_does_not_double_loop() {
        let mut state = SimState::at(500.0, vec![100.0, 500.0]);
        state.focused = Some(1);
        state.running = true;
        state.phase = BallPhase::Impacting;
        state.impact_force = Some(1.0);
        let mut w = BallWidget::with_state(state, Tuning::default());

        w.handle(Event::Focus(0), 0.0);
        let effects = w.handle(Event::Kick, 150.0);
        assert_eq!(effects, vec![Effect::Rotate(-250.0)]);
        assert_eq!(w.state().impact_force, Some(1.0));
    }
}
