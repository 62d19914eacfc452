//! Grid palettes
//!
//! A theme id resolves to `~/.config/notegrid/themes/{id}.yaml` when that
//! file exists, otherwise to one of the YAML files embedded below.

use std::path::Path;

use serde::Deserialize;

pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");

pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "dark", "light")
    pub id: &'static str,
    pub yaml: &'static str,
}

pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "dark",
        yaml: DARK_YAML,
    },
    BuiltinTheme {
        id: "light",
        yaml: LIGHT_YAML,
    },
];

pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// User theme if present, else builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!(path = %user_path.display(), "loading user theme");
            return from_file(&user_path);
        }
    }

    tracing::info!(id, "loading builtin theme");
    Theme::from_builtin(id)
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pixel value in the frame buffer's ARGB layout
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| {
            s.get(i..i + 2)
                .ok_or_else(|| format!("Invalid color format: {}", s))
                .and_then(|hex| u8::from_str_radix(hex, 16).map_err(|e| e.to_string()))
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Theme file as written
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    pub grid: GridThemeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridThemeData {
    pub background: String,
    pub black_key_row: String,
    pub row_line: String,
    pub beat_line: String,
    pub measure_line: String,
    pub note: String,
    pub note_border: String,
    pub selected_note: String,
    pub selection_fill: String,
    pub selection_border: String,
    pub cursor: String,
}

/// Resolved grid colors
#[derive(Debug, Clone, PartialEq)]
pub struct GridTheme {
    pub background: Color,
    pub black_key_row: Color,
    pub row_line: Color,
    pub beat_line: Color,
    pub measure_line: Color,
    pub note: Color,
    pub note_border: Color,
    pub selected_note: Color,
    pub selection_fill: Color,
    pub selection_border: Color,
    pub cursor: Color,
}

/// Complete theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub grid: GridTheme,
}

impl Theme {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse theme: {}", e))?;
        Self::from_data(data)
    }

    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let builtin = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown builtin theme: {}", id))?;
        Self::from_yaml(builtin.yaml)
    }

    fn from_data(data: ThemeData) -> Result<Self, String> {
        let g = &data.grid;
        Ok(Self {
            name: data.name,
            grid: GridTheme {
                background: Color::from_hex(&g.background)?,
                black_key_row: Color::from_hex(&g.black_key_row)?,
                row_line: Color::from_hex(&g.row_line)?,
                beat_line: Color::from_hex(&g.beat_line)?,
                measure_line: Color::from_hex(&g.measure_line)?,
                note: Color::from_hex(&g.note)?,
                note_border: Color::from_hex(&g.note_border)?,
                selected_note: Color::from_hex(&g.selected_note)?,
                selection_fill: Color::from_hex(&g.selection_fill)?,
                selection_border: Color::from_hex(&g.selection_border)?,
                cursor: Color::from_hex(&g.cursor)?,
            },
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Fallback".to_string(),
            grid: GridTheme {
                background: Color::rgb(0x1E, 0x1F, 0x22),
                black_key_row: Color::rgb(0x18, 0x19, 0x1B),
                row_line: Color::rgb(0x2B, 0x2D, 0x30),
                beat_line: Color::rgb(0x2F, 0x31, 0x36),
                measure_line: Color::rgb(0x4A, 0x4D, 0x55),
                note: Color::rgb(0x5A, 0x8D, 0xEE),
                note_border: Color::rgb(0x2C, 0x4F, 0x94),
                selected_note: Color::rgb(0xF0, 0xA0, 0x3C),
                selection_fill: Color::rgba(0x5A, 0x8D, 0xEE, 0x33),
                selection_border: Color::rgb(0x8A, 0xB4, 0xFF),
                cursor: Color::rgb(0xE5, 0x48, 0x4D),
            },
        }
    }
}
