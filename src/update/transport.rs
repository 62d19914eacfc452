//! Transport notification handlers

use crate::commands::{Cmd, Layer};
use crate::messages::TransportMsg;
use crate::model::GridModel;

pub fn update_transport(model: &mut GridModel, msg: TransportMsg) -> Option<Cmd> {
    let view = &mut model.view;
    match msg {
        TransportMsg::PositionChanged(tick) => {
            if view.cursor_tick == tick {
                return None;
            }
            view.cursor_tick = tick;
            if view.follow_cursor() {
                tracing::trace!(tick, "view paged to follow cursor");
                return Some(Cmd::Redraw);
            }
            Some(Cmd::redraw_layers(&[Layer::Cursor]))
        }
        TransportMsg::PlayStateChanged(playing) => {
            view.is_playing = playing;
            if playing && view.follow_cursor() {
                return Some(Cmd::Redraw);
            }
            None
        }
    }
}
