//! View configuration and scroll handlers

use crate::beats::Measure;
use crate::commands::{Cmd, Layer};
use crate::messages::ViewMsg;
use crate::model::GridModel;

pub fn update_view(model: &mut GridModel, msg: ViewMsg) -> Option<Cmd> {
    let view = &mut model.view;
    match msg {
        ViewMsg::SetMouseMode(mode) => {
            let cancelled = model.gestures.cancel();
            if !view.set_mode(mode) {
                return cancelled.map(|_| Cmd::redraw_layers(&[Layer::Selection, Layer::Content]));
            }
            tracing::debug!(mode = mode.label(), "mouse mode switched");
            Some(Cmd::redraw_layers(&[Layer::Selection, Layer::Content]))
        }

        ViewMsg::ScrollTo { left, top } => {
            view.scroll_manually(left, top);
            Some(Cmd::Redraw)
        }

        ViewMsg::ScrollBy { dx, dy } => {
            let (left, top) = (view.scroll_left() + dx, view.scroll_top() + dy);
            view.scroll_manually(left, top);
            Some(Cmd::Redraw)
        }

        ViewMsg::Resize { width, height } => match view.resize(width, height) {
            Ok(()) => Some(Cmd::Redraw),
            Err(err) => {
                tracing::warn!(%err, "resize rejected");
                Some(Cmd::error(err))
            }
        },

        ViewMsg::SetZoom(pixels_per_tick) => match view.set_zoom(pixels_per_tick) {
            Ok(()) => Some(Cmd::Redraw),
            Err(err) => {
                tracing::warn!(%err, "zoom rejected");
                Some(Cmd::error(err))
            }
        },

        ViewMsg::ZoomAt { factor, anchor_x } => {
            let next = view.transform().pixels_per_tick() * factor;
            match view.set_zoom_at(next, anchor_x) {
                Ok(()) => Some(Cmd::Redraw),
                Err(err) => {
                    tracing::warn!(%err, "zoom rejected");
                    Some(Cmd::error(err))
                }
            }
        }

        ViewMsg::SetQuantizeDenominator(denominator) => {
            view.quantizer = view.quantizer.with_denominator(denominator);
            model.config.quantize_denominator = view.quantizer.denominator();
            None
        }

        ViewMsg::SetQuantizeEnabled(enabled) => {
            view.quantizer = view.quantizer.with_enabled(enabled);
            model.config.quantize_enabled = enabled;
            None
        }

        ViewMsg::SetAutoScroll(enabled) => {
            view.auto_scroll = enabled;
            if view.follow_cursor() {
                return Some(Cmd::Redraw);
            }
            None
        }

        ViewMsg::ResetSelection => {
            view.clear_selection();
            Some(Cmd::redraw_layers(&[Layer::Selection, Layer::Content]))
        }

        ViewMsg::SetTrack(track) => {
            model.gestures.cancel();
            view.clear_selection();
            view.track = track;
            Some(Cmd::redraw_layers(&[Layer::Content, Layer::Selection]))
        }

        ViewMsg::SetMeasures(measures) => {
            let mut measures: Vec<Measure> = measures
                .iter()
                .filter(|m| m.start_tick.is_finite())
                .map(Measure::normalized)
                .collect();
            measures.sort_by(|a, b| a.start_tick.total_cmp(&b.start_tick));
            view.measures = measures;
            Some(Cmd::redraw_layers(&[Layer::Beats]))
        }
    }
}
