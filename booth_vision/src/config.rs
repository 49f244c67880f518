use crate::error::BoothError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable behaviour of a booth session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    /// Resolution the capture source is asked for; landmarks are measured in it.
    pub capture_width: u32,
    pub capture_height: u32,
    /// Size of the snapshot and of every grid cell.
    pub cell_width: u32,
    pub cell_height: u32,
    /// Edge length of a pixelation tile.
    pub block_size: u32,
    pub thresholds: Thresholds,
    /// Redraw cadence in frames per second.
    pub refresh_hz: u32,
    pub background_gray: u8,
    pub guide_gray: u8,
    /// Fill for cells whose content is not available yet.
    pub placeholder_gray: u8,
    /// Draw the scaled landmark bounding box over the face cell.
    pub show_face_box: bool,
}

/// Initial values of the four threshold controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Shared by the value and luminance thresholds.
    pub shared: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            red: 128,
            green: 128,
            blue: 128,
            shared: 128,
        }
    }
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            capture_width: 320,
            capture_height: 240,
            cell_width: 160,
            cell_height: 120,
            block_size: 5,
            thresholds: Thresholds::default(),
            refresh_hz: 60,
            background_gray: 30,
            guide_gray: 80,
            placeholder_gray: 20,
            show_face_box: false,
        }
    }
}

impl BoothConfig {
    /// Reads a JSON config, falling back to defaults when no path is given.
    /// Missing fields take their default values.
    pub fn load(path: Option<&Path>) -> Result<Self, BoothError> {
        let Some(path) = path else {
            tracing::debug!("no configuration file given, using defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str::<BoothConfig>(&content)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), BoothError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn capture_size(&self) -> (u32, u32) {
        (self.capture_width, self.capture_height)
    }

    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: BoothConfig =
            serde_json::from_str(r#"{"block_size": 8, "thresholds": {"red": 10}}"#).expect("json");
        assert_eq!(config.block_size, 8);
        assert_eq!(config.thresholds.red, 10);
        assert_eq!(config.thresholds.green, 128);
        assert_eq!(config.cell_size(), (160, 120));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(BoothConfig::load(None).expect("defaults"), BoothConfig::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = std::env::temp_dir().join("booth_vision_config_round_trip.json");
        let config = BoothConfig {
            show_face_box: true,
            refresh_hz: 30,
            ..BoothConfig::default()
        };
        config.save(&path).expect("save");
        assert_eq!(BoothConfig::load(Some(&path)).expect("load"), config);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let path = std::env::temp_dir().join("booth_vision_config_malformed.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(BoothConfig::load(Some(&path)), Err(BoothError::Config(_))));
        let _ = std::fs::remove_file(path);
    }
}
