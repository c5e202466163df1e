//! Virtual-time host for the ball widget
//!
//! Plays the role of the browser: delivers scheduled events when their delay
//! expires, fires animation frames at a fixed refresh interval and reports
//! squash playback as finished after its duration. Used by the native demo and
//! by tests, so whole bounce sequences run without waiting on a real clock.

use crate::widget::{BallWidget, Effect, Event};

/// 60 Hz display refresh
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: f64,
    seq: u64,
    event: Event,
}

/// Event queue driving a [`BallWidget`] in virtual time
#[derive(Debug, Clone)]
pub struct Timeline {
    widget: BallWidget,
    now: f64,
    frame_interval: f64,
    viewport_height: f32,
    pending: Vec<Pending>,
    next_seq: u64,
    frame_requested: bool,
    /// Every effect applied so far, with the time it was produced
    log: Vec<(f64, Effect)>,
}

impl Timeline {
    pub fn new(widget: BallWidget, viewport_height: f32) -> Self {
        Self {
            widget,
            now: 0.0,
            frame_interval: DEFAULT_FRAME_INTERVAL_MS,
            viewport_height,
            pending: Vec::new(),
            next_seq: 0,
            frame_requested: false,
            log: Vec::new(),
        }
    }

    /// Use a different display refresh interval (ms)
    pub fn with_frame_interval(mut self, interval_ms: f64) -> Self {
        self.frame_interval = interval_ms;
        self
    }

    pub fn widget(&self) -> &BallWidget {
        &self.widget
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn effects(&self) -> &[(f64, Effect)] {
        &self.log
    }

    /// Nothing left to deliver
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deliver an event right now
    pub fn dispatch(&mut self, event: Event) {
        let effects = self.widget.handle(event, self.now);
        self.apply(effects);
    }

    /// Deliver everything due up to `time`, then move the clock there
    pub fn advance_to(&mut self, time: f64) {
        while let Some(next) = self.pop_due(time) {
            self.now = next.due;
            if matches!(next.event, Event::Frame { .. }) {
                self.frame_requested = false;
            }
            let effects = self.widget.handle(next.event, self.now);
            self.apply(effects);
        }
        self.now = self.now.max(time);
    }

    /// Advance the clock by `ms`
    pub fn advance_by(&mut self, ms: f64) {
        self.advance_to(self.now + ms);
    }

    /// Run until no work is pending or `limit_ms` of virtual time passes
    ///
    /// Returns true if the timeline went idle.
    pub fn run_until_idle(&mut self, limit_ms: f64) -> bool {
        let deadline = self.now + limit_ms;
        while let Some(due) = self.next_due() {
            if due > deadline {
                self.now = deadline;
                return false;
            }
            self.advance_to(due);
        }
        true
    }

    fn next_due(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|p| p.due)
            .min_by(|a, b| a.total_cmp(b))
    }

    fn pop_due(&mut self, time: f64) -> Option<Pending> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= time)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(index))
    }

    fn schedule(&mut self, delay_ms: f64, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay_ms.max(0.0),
            seq,
            event,
        });
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule(scheduled) => {
                    self.schedule(scheduled.delay_ms as f64, scheduled.event);
                }
                Effect::RequestFrame => {
                    // One frame callback in flight at a time, like rAF
                    if !self.frame_requested {
                        self.frame_requested = true;
                        self.schedule(
                            self.frame_interval,
                            Event::Frame {
                                viewport_height: self.viewport_height,
                            },
                        );
                    }
                }
                Effect::Squash(squash) => {
                    self.schedule(squash.duration_ms as f64, Event::ImpactPlaybackDone);
                }
                Effect::Render(_) | Effect::Rotate(_) | Effect::Kick(_) => {}
            }
            self.log.push((self.now, effect));
        }
    }
}
