//! Middle-button panning

use crate::commands::Cmd;
use crate::geometry::PixelPoint;

use super::{Gesture, GestureContext, Pressed};

pub(super) fn press(ctx: &mut GestureContext<'_>) -> Pressed {
    Pressed::drag(
        Gesture::Pan {
            start_scroll: ctx.view.scroll(),
        },
        None,
    )
}

/// Scroll against the raw client delta; panning stops cursor following
pub(super) fn drag(ctx: &mut GestureContext<'_>, start_scroll: PixelPoint, delta: PixelPoint) -> Option<Cmd> {
    let before = ctx.view.scroll();
    ctx.view.scroll_manually(
        (start_scroll.x - delta.x).max(0.0),
        (start_scroll.y - delta.y).max(0.0),
    );
    if ctx.view.scroll() == before {
        return None;
    }
    Some(Cmd::Redraw)
}
