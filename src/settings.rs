//! Runtime settings
//!
//! Loaded from a JSON file by the host. Missing fields fall back to
//! defaults, so an empty object is a valid settings file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, MAX_FRAME_DT};
use crate::error::SettingsError;

/// Session and driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; rounds are seeded from the clock when unset
    pub seed: Option<u64>,
    /// Upper bound on a single frame delta (seconds)
    pub max_frame_dt: f32,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Headless driver ===
    /// Frame delta used by the autopilot binary
    pub frame_dt: f32,
    /// Stop the autopilot after this much round time
    pub max_round_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_frame_dt: MAX_FRAME_DT,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            frame_dt: 1.0 / 60.0,
            max_round_seconds: 600.0,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Frame delta bound actually applied; never above the default cap
    pub fn effective_max_frame_dt(&self) -> f32 {
        self.max_frame_dt.min(MAX_FRAME_DT)
    }

    /// Replace nonsensical values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            self.max_frame_dt = defaults.max_frame_dt;
        }
        if !(self.frame_dt.is_finite() && self.frame_dt > 0.0) {
            self.frame_dt = defaults.frame_dt;
        }
        if !(self.arena_width.is_finite() && self.arena_width > 0.0) {
            self.arena_width = defaults.arena_width;
        }
        if !(self.arena_height.is_finite() && self.arena_height > 0.0) {
            self.arena_height = defaults.arena_height;
        }
        if !self.max_round_seconds.is_finite() || self.max_round_seconds < 0.0 {
            self.max_round_seconds = defaults.max_round_seconds;
        }
        self
    }
}
