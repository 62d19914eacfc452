//! Controller lane modes and their value ranges

use serde::{Deserialize, Serialize};

/// Which event type a controller lane edits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    #[default]
    Velocity,
    PitchBend,
    /// MIDI continuous controller number (0-127)
    Controller(u8),
}

impl ControlMode {
    /// Largest value the lane can hold
    pub fn max_value(&self) -> f64 {
        match self {
            ControlMode::Velocity => 127.0,
            ControlMode::PitchBend => 16383.0,
            ControlMode::Controller(_) => 127.0,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ControlMode::Velocity => "Velocity".to_string(),
            ControlMode::PitchBend => "Pitch Bend".to_string(),
            ControlMode::Controller(n) => format!("CC{}", n),
        }
    }

    /// Velocity, pitch bend, then every controller number
    pub fn all() -> Vec<ControlMode> {
        let mut modes = vec![ControlMode::Velocity, ControlMode::PitchBend];
        modes.extend((0..=127).map(ControlMode::Controller));
        modes
    }
}
