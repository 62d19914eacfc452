//! Command-line argument parsing for the demo host
//!
//! Flags override the persisted [`GridConfig`] for one session.

use clap::{Parser, ValueEnum};

use crate::config::GridConfig;
use crate::gesture::MouseMode;

/// Interactive piano-roll grid
#[derive(Parser, Debug)]
#[command(name = "notegrid", version, about = "Interactive piano-roll grid")]
pub struct CliArgs {
    /// Theme id (builtin "dark" or "light", or a file in the themes dir)
    #[arg(long)]
    pub theme: Option<String>,

    /// Initial tool
    #[arg(long, value_enum, default_value_t = ModeArg::Pencil)]
    pub mode: ModeArg,

    /// Horizontal zoom in pixels per tick
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 640)]
    pub height: u32,

    /// Seed the store with a short demo phrase
    #[arg(long)]
    pub demo_notes: bool,

    /// Quantize grid denominator (16 = sixteenth notes)
    #[arg(long, value_name = "N")]
    pub quantize: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Pencil,
    Selection,
}

impl From<ModeArg> for MouseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pencil => MouseMode::Pencil,
            ModeArg::Selection => MouseMode::Selection,
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub config: GridConfig,
    pub mode: MouseMode,
    pub window_size: (u32, u32),
    pub demo_notes: bool,
}

impl CliArgs {
    /// Apply the flags on top of `base`
    pub fn into_config(self, base: GridConfig) -> Result<StartupConfig, String> {
        let mut config = base;
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(zoom) = self.zoom {
            if !(zoom.is_finite() && zoom > 0.0) {
                return Err(format!("--zoom must be a positive number, got {}", zoom));
            }
            config.pixels_per_tick = zoom;
        }
        if let Some(denominator) = self.quantize {
            if denominator == 0 {
                return Err("--quantize must be at least 1".to_string());
            }
            config.quantize_denominator = denominator;
        }
        if self.width == 0 || self.height == 0 {
            return Err("window size must be non-zero".to_string());
        }

        Ok(StartupConfig {
            config,
            mode: self.mode.into(),
            window_size: (self.width, self.height),
            demo_notes: self.demo_notes,
        })
    }
}
