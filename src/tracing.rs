//! Logging setup and update diagnostics
//!
//! The console follows `RUST_LOG` (default `warn`), e.g.
//! `RUST_LOG=selection=debug,message=debug` or
//! `RUST_LOG=notegrid::gesture=trace` for per-move gesture events.
//! A daily-rotated file under `~/.config/notegrid/logs/` always records
//! debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::gesture::{GestureKind, MouseMode};
use crate::model::ViewState;
use crate::selection::Selection;

/// Install the global subscriber; later calls are no-ops
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("notegrid: file logging disabled: {}", e);
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of view state for diffing across one update
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub mode: MouseMode,
    pub selection: Option<Selection>,
    pub selected: usize,
    pub scroll: (f64, f64),
    pub auto_scroll: bool,
    pub gesture: Option<GestureKind>,
}

impl SelectionSnapshot {
    pub fn capture(view: &ViewState, gesture: Option<GestureKind>) -> Self {
        Self {
            mode: view.mode,
            selection: view.selection.selection().map(Selection::normalized),
            selected: view.selected_items.len(),
            scroll: (view.scroll_left(), view.scroll_top()),
            auto_scroll: view.auto_scroll,
            gesture,
        }
    }

    /// Human-readable list of what changed, if anything
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.mode != other.mode {
            changes.push(format!("mode: {} → {}", self.mode.label(), other.mode.label()));
        }
        if self.gesture != other.gesture {
            changes.push(format!("gesture: {:?} → {:?}", self.gesture, other.gesture));
        }
        match (&self.selection, &other.selection) {
            (None, None) => {}
            (Some(_), None) => changes.push("selection cleared".to_string()),
            (before, Some(after)) if before.as_ref() != Some(after) => {
                let (from, to) = after.tick_range();
                changes.push(format!("selection: ticks {}..{}", from, to));
            }
            _ => {}
        }
        if self.selected != other.selected {
            changes.push(format!("selected items: {} → {}", self.selected, other.selected));
        }
        if self.scroll != other.scroll {
            changes.push(format!(
                "scroll: ({},{}) → ({},{})",
                self.scroll.0, self.scroll.1, other.scroll.0, other.scroll.1
            ));
        }
        if self.auto_scroll != other.auto_scroll {
            changes.push(format!("auto-scroll: {}", other.auto_scroll));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
