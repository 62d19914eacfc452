//! Pencil tool: draw, drag, double-press delete and erase

use std::collections::HashSet;

use crate::commands::{Cmd, Layer};
use crate::geometry::LogicalPoint;
use crate::input::PointerEvent;
use crate::store::ItemId;

use super::click::DoubleClickDetector;
use super::{redraw, store_failed, Gesture, GestureContext, Pressed};

/// Primary press: drag the item under the pointer, or create one
pub(super) fn press(
    ctx: &mut GestureContext<'_>,
    double_click: &mut DoubleClickDetector,
    event: &PointerEvent,
) -> Pressed {
    let content = ctx.content_point(event);
    let start = ctx.logical(content);

    if let Some(item) = ctx.item_at(content) {
        if double_click.press(item.id, event.time) {
            tracing::debug!(id = ?item.id, "double press deletes item");
            return match ctx.delete(item.id) {
                Ok(()) => Pressed::consumed(redraw(&[Layer::Content])),
                Err(err) => Pressed::consumed(Some(store_failed("delete", err))),
            };
        }
        return Pressed::drag(
            Gesture::DrawNote {
                item: item.id,
                created: false,
                origin: LogicalPoint::new(item.tick, item.value),
                start,
                applied: LogicalPoint::ZERO,
            },
            None,
        );
    }

    double_click.reset();
    let at = LogicalPoint::new(ctx.quantizer.round(start.tick).max(0.0), start.value);
    match ctx.store.create_item(ctx.view.track, at) {
        Ok(id) => {
            tracing::debug!(?id, tick = at.tick, value = at.value, "item created");
            Pressed::drag(
                Gesture::DrawNote {
                    item: id,
                    created: true,
                    origin: at,
                    start,
                    applied: LogicalPoint::ZERO,
                },
                redraw(&[Layer::Content]),
            )
        }
        Err(err) => Pressed::consumed(Some(store_failed("create", err))),
    }
}

/// Move the dragged item to follow the pointer on the quantize grid
///
/// Only the difference between the wanted total offset and what the store
/// has already applied is sent, so repeated moves never drift.
pub(super) fn draw(
    ctx: &mut GestureContext<'_>,
    item: ItemId,
    origin: LogicalPoint,
    start: LogicalPoint,
    event: &PointerEvent,
    applied: &mut LogicalPoint,
) -> Option<Cmd> {
    let current = ctx.logical(ctx.content_point(event));
    let tick = (origin.tick + ctx.quantizer.round(current.tick - start.tick)).max(0.0);
    let value = ctx
        .view
        .transform()
        .clamp_value(origin.value + (current.value - start.value));
    let total = LogicalPoint::new(tick, value) - origin;

    let step = total - *applied;
    if step == LogicalPoint::ZERO {
        return None;
    }
    match ctx.store.move_item(ctx.view.track, item, step) {
        Ok(()) => {
            *applied = total;
            redraw(&[Layer::Content])
        }
        Err(err) => Some(store_failed("move", err)),
    }
}

/// Secondary press: erase the item under the pointer and keep erasing
pub(super) fn erase_press(ctx: &mut GestureContext<'_>, event: &PointerEvent) -> Pressed {
    let mut erased = HashSet::new();
    let cmd = erase(ctx, &mut erased, event);
    Pressed::drag(Gesture::EraseNote { erased }, cmd)
}

pub(super) fn erase(
    ctx: &mut GestureContext<'_>,
    erased: &mut HashSet<ItemId>,
    event: &PointerEvent,
) -> Option<Cmd> {
    let item = ctx.item_at(ctx.content_point(event))?;
    if !erased.insert(item.id) {
        return None;
    }
    match ctx.delete(item.id) {
        Ok(()) => {
            tracing::debug!(id = ?item.id, "item erased");
            redraw(&[Layer::Content])
        }
        Err(err) => Some(store_failed("erase", err)),
    }
}
