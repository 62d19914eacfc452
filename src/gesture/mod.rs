//! Pointer gestures: mode-scoped state machines over one drag at a time
//!
//! A press picks a handler from `(button, mode)`:
//!
//! | button    | mode      | gesture                                   |
//! |-----------|-----------|-------------------------------------------|
//! | primary   | selection | move selection (inside) / resize (outside) |
//! | primary   | pencil    | double-press delete, or draw note          |
//! | auxiliary | any       | pan                                        |
//! | secondary | selection | context menu, no drag                      |
//! | secondary | pencil    | erase under the pointer                    |
//!
//! Handlers read the view through a [`GestureContext`] built fresh for each
//! event, so they always see the state as of that event.

pub mod click;
pub mod drag;
mod pan;
mod pencil;
mod selection;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::commands::{Cmd, Layer};
use crate::geometry::{LogicalPoint, PixelPoint};
use crate::input::{PointerButton, PointerEvent};
use crate::model::ViewState;
use crate::quantize::Quantizer;
use crate::selection::Selection;
use crate::store::{ContentItem, ContentStore, ItemId, StoreError, TickRange};
use crate::transform::CONTROL_POINT_SIZE;
use crate::transport::Transport;

use self::click::DoubleClickDetector;
use self::drag::DragObserver;

/// Active tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseMode {
    #[default]
    Pencil,
    Selection,
}

impl MouseMode {
    pub fn label(&self) -> &'static str {
        match self {
            MouseMode::Pencil => "pencil",
            MouseMode::Selection => "selection",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GestureKind {
    ResizeSelection,
    MoveSelection,
    Pan,
    DrawNote,
    EraseNote,
}

/// Per-kind state of the active drag
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    ResizeSelection {
        anchor: LogicalPoint,
        /// Press position in content pixels
        start: PixelPoint,
    },
    MoveSelection {
        /// Selection at the press; every move recomputes from here
        origin: Selection,
        items: Vec<ItemId>,
        start: PixelPoint,
        /// Total delta already sent to the store
        applied: LogicalPoint,
    },
    Pan {
        start_scroll: PixelPoint,
    },
    DrawNote {
        item: ItemId,
        /// The press created the item
        created: bool,
        /// Item position at the press
        origin: LogicalPoint,
        /// Pointer position at the press, unquantized
        start: LogicalPoint,
        applied: LogicalPoint,
    },
    EraseNote {
        erased: HashSet<ItemId>,
    },
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Gesture::ResizeSelection { .. } => GestureKind::ResizeSelection,
            Gesture::MoveSelection { .. } => GestureKind::MoveSelection,
            Gesture::Pan { .. } => GestureKind::Pan,
            Gesture::DrawNote { .. } => GestureKind::DrawNote,
            Gesture::EraseNote { .. } => GestureKind::EraseNote,
        }
    }
}

/// Everything a handler may touch while handling one event
pub struct GestureContext<'a> {
    pub view: &'a mut ViewState,
    pub store: &'a mut dyn ContentStore,
    pub transport: &'a mut dyn Transport,
    pub quantizer: Quantizer,
}

impl<'a> GestureContext<'a> {
    pub fn new(
        view: &'a mut ViewState,
        store: &'a mut dyn ContentStore,
        transport: &'a mut dyn Transport,
    ) -> Self {
        let quantizer = view.quantizer;
        Self {
            view,
            store,
            transport,
            quantizer,
        }
    }

    fn content_point(&self, event: &PointerEvent) -> PixelPoint {
        self.view.content_point(event.local)
    }

    /// Logical cell under a content pixel, clamped to the representable range
    fn logical(&self, content: PixelPoint) -> LogicalPoint {
        let transform = self.view.transform();
        let point = transform.unproject(content);
        LogicalPoint::new(point.tick.max(0.0), transform.clamp_value(point.value))
    }

    /// Topmost item whose bounds contain the content pixel
    fn item_at(&self, content: PixelPoint) -> Option<ContentItem> {
        let transform = self.view.transform();
        let range = TickRange::new(
            transform.exact_tick(content.x - CONTROL_POINT_SIZE),
            transform.exact_tick(content.x + CONTROL_POINT_SIZE),
        );
        self.store
            .query_items_in_window(self.view.track, range)
            .into_iter()
            .rev()
            .find(|item| transform.item_rect(item).contains_point(content))
    }

    /// Delete an item and drop it from the completed selection
    fn delete(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.store.delete_item(self.view.track, id)?;
        self.view.selected_items.retain(|selected| *selected != id);
        Ok(())
    }
}

/// Result of a press
pub(crate) struct Pressed {
    gesture: Option<Gesture>,
    cmd: Option<Cmd>,
}

impl Pressed {
    fn drag(gesture: Gesture, cmd: Option<Cmd>) -> Self {
        Self {
            gesture: Some(gesture),
            cmd,
        }
    }

    fn consumed(cmd: Option<Cmd>) -> Self {
        Self { gesture: None, cmd }
    }
}

/// Report a rejected edit; the gesture keeps its visual state
pub(crate) fn store_failed(op: &'static str, err: StoreError) -> Cmd {
    tracing::warn!(op, error = %err, "content store rejected edit");
    Cmd::error(err)
}

pub(crate) fn redraw(layers: &[Layer]) -> Option<Cmd> {
    Some(Cmd::redraw_layers(layers))
}

/// Routes pointer events to the active gesture
#[derive(Debug)]
pub struct GestureEngine {
    drag: DragObserver<Gesture>,
    double_click: DoubleClickDetector,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(click::DEFAULT_DOUBLE_CLICK)
    }
}

impl GestureEngine {
    pub fn new(double_click_window: Duration) -> Self {
        Self {
            drag: DragObserver::new(),
            double_click: DoubleClickDetector::new(double_click_window),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.drag.is_active()
    }

    pub fn active_kind(&self) -> Option<GestureKind> {
        self.drag.state().map(Gesture::kind)
    }

    pub fn active(&self) -> Option<&Gesture> {
        self.drag.state()
    }

    pub fn pointer_down(&mut self, ctx: &mut GestureContext<'_>, event: PointerEvent) -> Option<Cmd> {
        let pressed = match (event.button, ctx.view.mode) {
            (PointerButton::Auxiliary, _) => pan::press(ctx),
            (PointerButton::Primary, MouseMode::Selection) => selection::press(ctx, &event),
            (PointerButton::Primary, MouseMode::Pencil) => {
                pencil::press(ctx, &mut self.double_click, &event)
            }
            (PointerButton::Secondary, MouseMode::Selection) => {
                tracing::debug!("context menu requested");
                Pressed::consumed(Some(Cmd::OpenContextMenu(event)))
            }
            (PointerButton::Secondary, MouseMode::Pencil) => pencil::erase_press(ctx, &event),
        };

        if let Some(gesture) = pressed.gesture {
            tracing::debug!(kind = ?gesture.kind(), button = ?event.button, "gesture begin");
            if let Some(abandoned) = self.drag.begin(event, gesture) {
                tracing::debug!(kind = ?abandoned.kind(), "abandoned gesture replaced");
            }
        }
        pressed.cmd
    }

    pub fn pointer_move(&mut self, ctx: &mut GestureContext<'_>, event: PointerEvent) -> Option<Cmd> {
        let mv = self.drag.on_move(event)?;
        tracing::trace!(
            dx = mv.client_delta.x,
            dy = mv.client_delta.y,
            kind = ?mv.state.kind(),
            "gesture move"
        );
        let delta = mv.client_delta;
        match mv.state {
            Gesture::ResizeSelection { anchor, start } => {
                selection::resize(ctx, *anchor, *start + delta)
            }
            Gesture::MoveSelection {
                origin,
                items,
                start,
                applied,
            } => selection::translate(ctx, origin, items, *start, *start + delta, applied),
            Gesture::Pan { start_scroll } => pan::drag(ctx, *start_scroll, delta),
            Gesture::DrawNote {
                item,
                origin,
                start,
                applied,
                ..
            } => pencil::draw(ctx, *item, *origin, *start, &event, applied),
            Gesture::EraseNote { erased } => pencil::erase(ctx, erased, &event),
        }
    }

    pub fn pointer_up(&mut self, ctx: &mut GestureContext<'_>, event: PointerEvent) -> Option<Cmd> {
        let released_here = self
            .drag
            .active()
            .map(|drag| drag.start.button == event.button && drag.last.client != event.client)
            .unwrap_or(false);
        let moved = if released_here {
            self.pointer_move(ctx, event)
        } else {
            None
        };

        let end = self.drag.on_up(event)?;
        tracing::debug!(kind = ?end.state.kind(), "gesture end");
        let finished = match end.state {
            Gesture::ResizeSelection { .. } => selection::finish_resize(ctx),
            Gesture::MoveSelection { .. } => selection::finish_move(ctx),
            Gesture::Pan { .. } | Gesture::EraseNote { .. } => None,
            Gesture::DrawNote { item, created, .. } => {
                tracing::debug!(?item, created, "draw finished");
                None
            }
        };

        let cmds: Vec<Cmd> = moved.into_iter().chain(finished).collect();
        match Cmd::batch(cmds) {
            Cmd::None => None,
            cmd => Some(cmd),
        }
    }

    /// Drop the active drag without running its terminal action
    pub fn cancel(&mut self) -> Option<GestureKind> {
        let kind = self.drag.cancel().map(|g| g.kind());
        if let Some(kind) = kind {
            tracing::debug!(?kind, "gesture cancelled");
        }
        kind
    }
}
