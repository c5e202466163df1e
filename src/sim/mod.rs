//! Ball simulation module
//!
//! All physics lives here. This module is pure:
//! - Time only arrives as elapsed milliseconds
//! - State is one owned `SimState`
//! - No DOM or platform dependencies

pub mod bounce;
pub mod squash;
pub mod state;
pub mod tick;

pub use bounce::{BounceOutcome, finish_impact};
pub use squash::{SquashAnimation, squash_by_speed, squash_duration, squash_target};
pub use state::{BallPhase, Frame, SimState};
pub use tick::{TickOutcome, check_collision, launch, resume, stop, tick};
