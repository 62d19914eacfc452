//! Grid configuration persistence
//!
//! Stores user preferences in `~/.config/notegrid/config.yaml`. Every field
//! has a default, so a partial file only overrides what it names.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::quantize::{Quantizer, DEFAULT_TIMEBASE};

/// Grid configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Selected theme id (e.g., "dark", "light")
    pub theme: String,
    /// Ticks per quarter note
    pub timebase: u32,
    /// Quantize grid as a note denominator (16 = sixteenth notes)
    pub quantize_denominator: u32,
    pub quantize_enabled: bool,
    /// Window for two presses to count as a double press
    pub double_click_ms: u64,
    /// Initial horizontal zoom
    pub pixels_per_tick: f64,
    /// Height of one key row in the piano roll
    pub key_height: f64,
    pub number_of_keys: u32,
    /// Items this far outside the viewport are still drawn
    pub render_margin_px: f64,
    /// Follow the playback cursor while playing
    pub auto_scroll: bool,
    pub tempo_bpm: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            timebase: DEFAULT_TIMEBASE,
            quantize_denominator: 16,
            quantize_enabled: true,
            double_click_ms: 300,
            pixels_per_tick: 0.1,
            key_height: 12.0,
            number_of_keys: 128,
            render_margin_px: 64.0,
            auto_scroll: true,
            tempo_bpm: 120.0,
        }
    }
}

impl GridConfig {
    /// Config from the user config file, or defaults
    pub fn load() -> Self {
        match crate::config_paths::config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config directory, using default config");
                Self::default()
            }
        }
    }

    /// Config from `path`; any problem falls back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "config loaded");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("read failed: {}", e))?;
        serde_yaml::from_str(&content).map_err(|e| format!("parse failed: {}", e))
    }

    /// Write to the user config file
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "no config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {}", dir.display(), e))?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| format!("failed to encode config: {}", e))?;
        fs::write(path, yaml).map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new(self.timebase, self.quantize_denominator).with_enabled(self.quantize_enabled)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}
