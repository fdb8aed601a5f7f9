//! Game settings and preferences
//!
//! Read from `neon_runner.json` in the working directory. Anything missing
//! falls back to the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Background stars for this preset
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 80,
            QualityPreset::High => 150,
        }
    }

    /// Whether to render the starfield
    pub fn starfield_enabled(&self) -> bool {
        self.star_count() > 0
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Leaderboard ===
    /// Score ingestion endpoint
    pub leaderboard_endpoint: String,
    /// Page listing the top scores
    pub leaderboard_page: String,

    // === Audio ===
    pub music_path: PathBuf,
    pub death_cue_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            leaderboard_endpoint: "http://127.0.0.1:5000/api/add_score".to_string(),
            leaderboard_page: "http://127.0.0.1:5000".to_string(),

            music_path: PathBuf::from("music loop.wav"),
            death_cue_path: PathBuf::from("dead.wav"),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "neon_runner.json";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a file
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is absent or bad
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"quality": "High"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.leaderboard_page, Settings::default().leaderboard_page);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{quality").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Path::new("no/such/neon_runner.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_read() {
        let path = std::env::temp_dir().join(format!("neon_runner_{}.json", std::process::id()));
        let settings = Settings::from_preset(QualityPreset::Low);
        settings.save(&path).unwrap();
        let loaded = Settings::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
        assert!(!loaded.quality.starfield_enabled());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
