//! Game settings
//!
//! Loaded from a JSON file; anything missing falls back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How the player steers the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Drag toward a point (desktop/simulator)
    Touch,
    /// Tilt the device
    #[default]
    Accelerometer,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Touch => "Touch",
            InputMode::Accelerometer => "Accelerometer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "touch" | "drag" => Some(InputMode::Touch),
            "accelerometer" | "tilt" => Some(InputMode::Accelerometer),
            _ => None,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `level<N>.txt` files
    pub levels_dir: PathBuf,
    pub input_mode: InputMode,
    /// First level to load (1-based)
    pub start_level: u32,
    /// Ticks the headless driver runs before exiting
    pub demo_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            input_mode: InputMode::Accelerometer,
            start_level: 1,
            demo_ticks: 120,
        }
    }
}

impl Settings {
    /// Environment variable naming a settings file
    pub const ENV_VAR: &'static str = "TILT_MAZE_SETTINGS";

    /// Strict parse
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.start_level = settings.start_level.max(1);
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "input_mode": "touch" }"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Touch);
        assert_eq!(settings.levels_dir, PathBuf::from("levels"));
        assert_eq!(settings.start_level, 1);
    }

    #[test]
    fn test_start_level_clamped() {
        let settings = Settings::from_json(r#"{ "start_level": 0 }"#).unwrap();
        assert_eq!(settings.start_level, 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json(r#"{ "input_mode": "joystick" }"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            demo_ticks: 10,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/nonexistent/tilt-maze.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_input_mode_names() {
        assert_eq!(InputMode::from_str("TILT"), Some(InputMode::Accelerometer));
        assert_eq!(InputMode::from_str("drag"), Some(InputMode::Touch));
        assert_eq!(InputMode::from_str("mouse"), None);
        assert_eq!(InputMode::Touch.as_str(), "Touch");
    }
}
