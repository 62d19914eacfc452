//! Selection tool: rubber-band resize and move

use crate::commands::{Cmd, Layer};
use crate::geometry::{LogicalPoint, PixelPoint};
use crate::input::PointerEvent;
use crate::selection::Selection;
use crate::store::{ItemId, TickRange, TrackId};
use crate::transform::ValueAxis;

use super::{redraw, store_failed, Gesture, GestureContext, Pressed};

pub(super) fn press(ctx: &mut GestureContext<'_>, event: &PointerEvent) -> Pressed {
    let content = ctx.content_point(event);

    let inside = ctx
        .view
        .selection_rect()
        .map(|rect| rect.contains_point(content))
        .unwrap_or(false);
    if let (true, Some(origin)) = (inside, ctx.view.selection.selection().copied()) {
        return Pressed::drag(
            Gesture::MoveSelection {
                origin,
                items: ctx.view.selected_items.clone(),
                start: content,
                applied: LogicalPoint::ZERO,
            },
            None,
        );
    }

    ctx.view.clear_selection();
    let mut layers = vec![Layer::Selection, Layer::Content];
    if !ctx.transport.is_playing() {
        let tick = ctx
            .quantizer
            .round(ctx.view.transform().tick(content.x))
            .max(0.0);
        ctx.transport.seek(tick);
        ctx.view.cursor_tick = ctx.transport.position();
        layers.push(Layer::Cursor);
    }

    let anchor = ctx.logical(content);
    let on_tracks = matches!(ctx.view.transform().axis(), ValueAxis::Tracks { .. });
    if on_tracks {
        ctx.view.selected_track = Some(TrackId(anchor.value.floor() as usize));
        tracing::debug!(track = anchor.value, "track selected");
    }
    ctx.view.selection.start_selection(anchor);
    Pressed::drag(
        Gesture::ResizeSelection {
            anchor,
            start: content,
        },
        redraw(&layers),
    )
}

/// Rebuild the selection from the anchor and the current point
pub(super) fn resize(ctx: &mut GestureContext<'_>, anchor: LogicalPoint, current: PixelPoint) -> Option<Cmd> {
    let current = ctx.logical(current);
    let selection = ctx.view.selection.resize_selection(anchor, current);
    tracing::trace!(?selection, "selection resized");
    redraw(&[Layer::Selection])
}

/// Move the selection and its items by the quantized pointer offset
pub(super) fn translate(
    ctx: &mut GestureContext<'_>,
    origin: &Selection,
    items: &[ItemId],
    start: PixelPoint,
    current: PixelPoint,
    applied: &mut LogicalPoint,
) -> Option<Cmd> {
    let transform = *ctx.view.transform();
    let raw_tick = transform.exact_tick(current.x - start.x);
    let raw_value = transform.value_delta(current.y - start.y);

    let (from_tick, _) = origin.tick_range();
    let tick = ctx.quantizer.round(raw_tick).max(-from_tick);
    let value = match origin.value_range() {
        Some((low, high)) => {
            let ceiling = transform.clamp_value(f64::MAX) - high;
            raw_value.clamp(-low, ceiling.max(-low))
        }
        None => 0.0,
    };
    let total = LogicalPoint::new(tick, value);

    ctx.view.selection.move_selection_from(origin, total);

    let step = total - *applied;
    if step == LogicalPoint::ZERO {
        return redraw(&[Layer::Selection]);
    }

    let mut cmds = vec![Cmd::redraw_layers(&[Layer::Selection, Layer::Content])];
    for id in items {
        if let Err(err) = ctx.store.move_item(ctx.view.track, *id, step) {
            cmds.push(store_failed("move", err));
        }
    }
    *applied = total;
    Some(Cmd::batch(cmds))
}

/// Commit the resized selection and collect the items inside it
///
/// A selection with no duration (a plain click) is dropped.
pub(super) fn finish_resize(ctx: &mut GestureContext<'_>) -> Option<Cmd> {
    let selection = ctx.view.selection.end_selection()?;
    if selection.is_empty() {
        ctx.view.clear_selection();
        return redraw(&[Layer::Selection]);
    }

    let (start, end) = selection.tick_range();
    ctx.view.selected_items = ctx
        .store
        .query_items_in_window(ctx.view.track, TickRange::new(start, end))
        .into_iter()
        .filter(|item| selection.contains_item(item))
        .map(|item| item.id)
        .collect();
    tracing::debug!(count = ctx.view.selected_items.len(), "selection committed");
    redraw(&[Layer::Selection, Layer::Content])
}

pub(super) fn finish_move(ctx: &mut GestureContext<'_>) -> Option<Cmd> {
    ctx.view.selection.end_selection()?;
    redraw(&[Layer::Selection])
}
