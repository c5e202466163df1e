//! Kickball - a ball that gets kicked between focused form inputs
//!
//! Core modules:
//! - `sim`: Ball physics (gravity, floor collision, squash and bounce)
//! - `widget`: Focus/blur/frame events in, render effects out
//! - `timeline`: Virtual-time replay of widget effects
//! - `layout`: Initial sprite and floor geometry
//! - `tuning`: Data-driven physics constants

pub mod layout;
pub mod sim;
pub mod timeline;
pub mod tuning;
pub mod widget;

pub use layout::{InputRect, Layout};
pub use timeline::Timeline;
pub use tuning::Tuning;
pub use widget::{BallWidget, Effect, Event};

/// Default physics and presentation constants
///
/// The physics values are tuned by eye, not derived from real units.
/// Time is in milliseconds, distances in CSS pixels.
pub mod consts {
    /// Downward acceleration (px/ms²)
    pub const GRAVITY: f32 = 9.8 * 0.0005;

    /// Smallest squash scale the ball reaches on impact
    pub const MIN_SQUASH: f32 = 0.5;
    /// Stretch scale reached at MAX_SPEED
    pub const MAX_SQUASH: f32 = 2.0;
    /// Squash playback length for an impact at MAX_SPEED (ms)
    pub const MAX_SQUASH_DURATION: f32 = 150.0;

    /// Below this rebound speed the ball stops (friction)
    pub const MIN_SPEED: f32 = 0.1;
    /// Reference speed for squash scaling (air friction)
    pub const MAX_SPEED: f32 = 1.5;
    /// Fraction of impact speed kept on each bounce
    pub const REBOUND_RETENTION: f32 = 0.6;

    /// Upward speed given by a kick
    pub const KICK_SPEED: f32 = 2.2;
    /// Delay between focus and the kick reaching the ball (ms)
    pub const KICK_DELAY_MS: f32 = 150.0;
    /// Delay between blur and the ball falling away (ms)
    pub const BLUR_DELAY_MS: f32 = 200.0;
    /// Boot swing animation length (ms)
    pub const KICK_ANIMATION_MS: f32 = 600.0;
    /// Spin added to the ball per kick (degrees, applied negatively)
    pub const ROTATION_STEP: f32 = 250.0;

    /// Falling faster than this below the viewport resets the ball
    pub const OUT_OF_BOUNDS_SPEED: f32 = 2.0;
    /// Distance below the viewport bottom before the reset fires
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 100.0;

    /// Floor sits this far above each input's bottom edge
    pub const FLOOR_OFFSET: f32 = 24.0;
    /// Ball sprite sits this far left of the inputs
    pub const BALL_OFFSET_X: f32 = 28.0;
    /// Boot sprite sits this far left of the inputs
    pub const BOOT_OFFSET_X: f32 = 48.0;
    /// Ball's vertical offset on page load
    pub const INITIAL_POSITION: f32 = 72.0;
}
