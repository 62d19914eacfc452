//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod pointer;
mod transport;
mod view;

use crate::commands::{Cmd, Layer};
use crate::messages::{ContentMsg, GestureMsg, Msg};
use crate::model::GridModel;
use crate::store::ContentStore;
use crate::transport::Transport;

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use pointer::update_pointer;
pub use transport::update_transport;
pub use view::update_view;

/// External collaborators passed into each update
pub struct Env<'a> {
    pub store: &'a mut dyn ContentStore,
    pub transport: &'a mut dyn Transport,
}

impl<'a> Env<'a> {
    pub fn new(store: &'a mut dyn ContentStore, transport: &'a mut dyn Transport) -> Self {
        Self { store, transport }
    }
}

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut GridModel, env: &mut Env<'_>, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, env, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, env, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut GridModel, env: &mut Env<'_>, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Pointer(m) => update_pointer(model, env, m),
        Msg::View(m) => update_view(model, m),
        Msg::Transport(m) => update_transport(model, m),
        Msg::Content(ContentMsg::Changed) => {
            let store = &*env.store;
            let track = model.view.track;
            // drop selected ids the store no longer knows about
            if !model.view.selected_items.is_empty() {
                if let Some(sel) = model.view.selection.selection().map(|s| s.normalized()) {
                    let (start, end) = sel.tick_range();
                    let live: Vec<_> = store
                        .query_items_in_window(track, crate::store::TickRange::new(start, end))
                        .into_iter()
                        .map(|item| item.id)
                        .collect();
                    model.view.selected_items.retain(|id| live.contains(id));
                }
            }
            Some(Cmd::redraw_layers(&[Layer::Content]))
        }
        Msg::Gesture(GestureMsg::Cancel) => {
            model.gestures.cancel()?;
            Some(Cmd::redraw_layers(&[Layer::Selection, Layer::Content]))
        }
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after view state and logs diffs for debugging.
/// Pointer moves without an active drag are too noisy to log.
#[cfg(debug_assertions)]
fn update_traced(model: &mut GridModel, env: &mut Env<'_>, msg: Msg) -> Option<Cmd> {
    use crate::messages::PointerMsg;

    let is_noisy = matches!(&msg, Msg::Pointer(PointerMsg::Move(_))) && !model.gestures.is_active();

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = SelectionSnapshot::capture(&model.view, model.gestures.active_kind());

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, env, msg);

    let after = SelectionSnapshot::capture(&model.view, model.gestures.active_kind());
    if let Some(diff) = before.diff(&after) {
        debug!(target: "selection", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::PointerMsg;

    match msg {
        Msg::Pointer(PointerMsg::Down(e)) => format!("Pointer::Down({:?})", e.button),
        Msg::Pointer(PointerMsg::Move(e)) => format!("Pointer::Move({:?})", e.button),
        Msg::Pointer(PointerMsg::Up(e)) => format!("Pointer::Up({:?})", e.button),
        Msg::Pointer(PointerMsg::ContextMenu(_)) => "Pointer::ContextMenu".to_string(),
        Msg::View(m) => format!("View::{:?}", m),
        Msg::Transport(m) => format!("Transport::{:?}", m),
        Msg::Content(m) => format!("Content::{:?}", m),
        Msg::Gesture(m) => format!("Gesture::{:?}", m),
    }
}
