//! Physics tuning
//!
//! Overrides are read from LocalStorage so the feel of the bounce can be
//! adjusted without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// All tunable constants, in milliseconds and CSS pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Motion ===
    pub gravity: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub rebound_retention: f32,

    // === Squash ===
    pub min_squash: f32,
    pub max_squash: f32,
    pub max_squash_duration_ms: f32,

    // === Kick ===
    pub kick_speed: f32,
    pub kick_delay_ms: f32,
    pub blur_delay_ms: f32,
    pub kick_animation_ms: f32,
    pub rotation_step: f32,

    // === Out of bounds ===
    pub out_of_bounds_speed: f32,
    pub out_of_bounds_margin: f32,

    // === Layout ===
    pub floor_offset: f32,
    pub ball_offset_x: f32,
    pub boot_offset_x: f32,
    pub initial_position: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            rebound_retention: REBOUND_RETENTION,

            min_squash: MIN_SQUASH,
            max_squash: MAX_SQUASH,
            max_squash_duration_ms: MAX_SQUASH_DURATION,

            kick_speed: KICK_SPEED,
            kick_delay_ms: KICK_DELAY_MS,
            blur_delay_ms: BLUR_DELAY_MS,
            kick_animation_ms: KICK_ANIMATION_MS,
            rotation_step: ROTATION_STEP,

            out_of_bounds_speed: OUT_OF_BOUNDS_SPEED,
            out_of_bounds_margin: OUT_OF_BOUNDS_MARGIN,

            floor_offset: FLOOR_OFFSET,
            ball_offset_x: BALL_OFFSET_X,
            boot_offset_x: BOOT_OFFSET_X,
            initial_position: INITIAL_POSITION,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "kickball_tuning";

    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring malformed tuning: {}", e);
                Self::default()
            }
        }
    }

    /// Slope of the stretch curve (scale per unit of speed)
    pub fn stretch_slope(&self) -> f32 {
        (self.max_squash - 1.0) / self.max_speed
    }

    /// Slope of the impact squash curve (scale lost per unit of impact force)
    pub fn impact_slope(&self) -> f32 {
        (1.0 - self.min_squash) / self.max_speed
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded tuning from LocalStorage");
                return Self::from_json_or_default(&json);
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity, GRAVITY);
        assert_eq!(tuning.kick_speed, 2.2);
        assert_eq!(tuning.rebound_retention, 0.6);
        assert_eq!(tuning.max_squash_duration_ms, 150.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.01, "kick_speed": 3.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.01);
        assert_eq!(tuning.kick_speed, 3.0);
        assert_eq!(tuning.min_speed, MIN_SPEED);
        assert_eq!(tuning.floor_offset, FLOOR_OFFSET);
    }

    #[test]
    fn test_malformed_falls_back() {
        assert!(Tuning::from_json("{ gravity: ").is_err());
        assert_eq!(Tuning::from_json_or_default("not json"), Tuning::default());
    }

    #[test]
    fn test_slopes() {
        let tuning = Tuning::default();
        assert!((tuning.stretch_slope() - 1.0 / 1.5).abs() < 1e-6);
        assert!((tuning.impact_slope() - 0.5 / 1.5).abs() < 1e-6);
    }
}
