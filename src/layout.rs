//! Initial page geometry
//!
//! Measured once at startup from the inputs' bounding rects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Bounding rect of one tracked input (page pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRect {
    pub x: f32,
    pub bottom: f32,
}

/// Where the sprites and floors sit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Ball sprite origin; y is the initial vertical offset
    pub ball_anchor: Vec2,
    /// Boot sprite origin; y follows the ball when kicking
    pub boot_anchor: Vec2,
    /// Floor per input, in input order
    pub floors: Vec<f32>,
}

impl Layout {
    /// Compute the layout from the inputs, in page order
    ///
    /// Sprites line up against the first input. With no inputs the sprites
    /// sit at the left edge and there are no floors.
    pub fn from_inputs(inputs: &[InputRect], tuning: &Tuning) -> Self {
        let left = inputs.first().map_or(0.0, |rect| rect.x);
        Self {
            ball_anchor: Vec2::new(left - tuning.ball_offset_x, tuning.initial_position),
            boot_anchor: Vec2::new(left - tuning.boot_offset_x, tuning.initial_position),
            floors: inputs
                .iter()
                .map(|rect| rect.bottom - tuning.floor_offset)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_inputs() {
        let inputs = [
            InputRect { x: 120.0, bottom: 180.0 },
            InputRect { x: 120.0, bottom: 260.0 },
            InputRect { x: 140.0, bottom: 340.0 },
        ];
        let layout = Layout::from_inputs(&inputs, &Tuning::default());

        assert_eq!(layout.floors, vec![156.0, 236.0, 316.0]);
        assert_eq!(layout.ball_anchor, Vec2::new(92.0, 72.0));
        assert_eq!(layout.boot_anchor, Vec2::new(72.0, 72.0));
    }

    #[test]
    fn test_layout_without_inputs() {
        let layout = Layout::from_inputs(&[], &Tuning::default());
        assert!(layout.floors.is_empty());
        assert_eq!(layout.ball_anchor.x, -28.0);
    }
}
