//! What `update` asks the host to do afterwards
//!
//! A [`Cmd`] carries redraw requests as [`Damage`] and surfaces errors and
//! context-menu requests the grid cannot act on itself.

use crate::error::GridError;
use crate::input::PointerEvent;

// ============================================================================
// Damage Tracking (layer-level redraw)
// ============================================================================

/// Render layers in z order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Key/track rows, offset by vertical scroll only
    Grid = 0,
    /// Measure and beat lines, offset by horizontal scroll only
    Beats = 1,
    /// Notes, control points, blocks
    Content = 2,
    Selection = 3,
    /// Playback position, offset by horizontal scroll only
    Cursor = 4,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Grid,
        Layer::Beats,
        Layer::Content,
        Layer::Selection,
        Layer::Cursor,
    ];

    #[inline]
    pub fn z(self) -> u8 {
        self as u8
    }
}

/// Represents which layers need redrawing
///
/// When in doubt, use `Damage::Full` for correctness.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Damage {
    #[default]
    None,
    Full,
    /// Redraw specific layers only
    Layers(Vec<Layer>),
}

impl Damage {
    /// Create damage for specific layers
    pub fn layers(layers: &[Layer]) -> Self {
        if layers.is_empty() {
            Damage::None
        } else {
            let mut v = layers.to_vec();
            v.sort();
            v.dedup();
            Damage::Layers(v)
        }
    }

    pub fn layer(layer: Layer) -> Self {
        Damage::Layers(vec![layer])
    }

    /// Merge another damage into this one
    pub fn merge(&mut self, other: Damage) {
        match (&mut *self, other) {
            (Damage::None, other) => *self = other,
            (_, Damage::None) => {}
            (Damage::Full, _) => {}
            (this, Damage::Full) => *this = Damage::Full,
            (Damage::Layers(layers), Damage::Layers(other_layers)) => {
                for layer in other_layers {
                    if !layers.contains(&layer) {
                        layers.push(layer);
                    }
                }
                layers.sort();
                if layers.len() == Layer::ALL.len() {
                    *self = Damage::Full;
                }
            }
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Damage::Full)
    }

    /// Check if there is anything to repaint
    #[inline]
    pub fn is_some(&self) -> bool {
        match self {
            Damage::None => false,
            Damage::Full => true,
            Damage::Layers(layers) => !layers.is_empty(),
        }
    }

    /// Check if this damage includes `layer` (or is full)
    pub fn contains(&self, layer: Layer) -> bool {
        match self {
            Damage::None => false,
            Damage::Full => true,
            Damage::Layers(layers) => layers.contains(&layer),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Side effects returned by `update` for the host to perform
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    #[default]
    None,
    /// Request a full redraw
    Redraw,
    /// Request redraw of specific layers only
    RedrawLayers(Vec<Layer>),
    /// Show the host's context menu for a right press in selection mode
    OpenContextMenu(PointerEvent),
    /// An edit or view change failed; the visual state was kept
    ReportError(GridError),
    /// Batch multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, collapsing trivial cases
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !matches!(c, Cmd::None)).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn redraw_layers(layers: &[Layer]) -> Self {
        Cmd::RedrawLayers(layers.to_vec())
    }

    pub fn error(err: impl Into<GridError>) -> Self {
        Cmd::ReportError(err.into())
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        self.damage().is_some()
    }

    /// Get the damage for this command
    pub fn damage(&self) -> Damage {
        match self {
            Cmd::None => Damage::None,
            Cmd::Redraw => Damage::Full,
            Cmd::RedrawLayers(layers) => Damage::layers(layers),
            // Neither changes what is on the grid
            Cmd::OpenContextMenu(_) => Damage::None,
            Cmd::ReportError(_) => Damage::None,
            Cmd::Batch(cmds) => {
                let mut damage = Damage::None;
                for cmd in cmds {
                    damage.merge(cmd.damage());
                    if damage.is_full() {
                        break;
                    }
                }
                damage
            }
        }
    }

    /// Errors carried by this command, depth first
    pub fn errors(&self) -> Vec<&GridError> {
        match self {
            Cmd::ReportError(err) => vec![err],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.errors()).collect(),
            _ => Vec::new(),
        }
    }

    /// Context menu requests carried by this command
    pub fn context_menus(&self) -> Vec<&PointerEvent> {
        match self {
            Cmd::OpenContextMenu(event) => vec![event],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.context_menus()).collect(),
            _ => Vec::new(),
        }
    }
}
