//! Coordinate transform tests - projections, inverses, zoom and scroll

mod common;

use common::{test_config, test_model};
use notegrid::commands::Cmd;
use notegrid::geometry::{LogicalPoint, PixelPoint};
use notegrid::messages::{Msg, ViewMsg};
use notegrid::model::{Size, ViewState};
use notegrid::store::MemoryStore;
use notegrid::transform::{ControlMode, CoordTransform, TransformError};
use notegrid::transport::ClockTransport;
use notegrid::update::{update, Env};

fn send(model: &mut notegrid::GridModel, msg: Msg) -> Option<Cmd> {
    let mut store = MemoryStore::default();
    let mut transport = ClockTransport::default();
    let mut env = Env::new(&mut store, &mut transport);
    update(model, &mut env, msg)
}

#[test]
fn test_control_lane_projection() {
    let t = CoordTransform::control(1.0, 127.0, 256.0, 2.0).unwrap();
    let p = t.to_position(LogicalPoint::new(100.0, 64.0));
    let expected_y = ((1.0 - 64.0 / 127.0) * 252.0 + 2.0_f64).round();
    assert_eq!(p, PixelPoint::new(100.0, expected_y));
}

#[test]
fn test_keys_round_trip_on_whole_cells() {
    for pixels_per_tick in [1.0, 2.0, 4.0] {
        let t = CoordTransform::keys(pixels_per_tick, 10.0, 128).unwrap();
        for tick in [0.0, 1.0, 479.0, 1920.0] {
            for key in [0.0, 21.0, 60.0, 127.0] {
                let point = LogicalPoint::new(tick, key);
                assert_eq!(t.from_position(t.to_position(point)), point);
            }
        }
    }
}

#[test]
fn test_any_pixel_in_a_row_resolves_to_that_row() {
    let t = CoordTransform::keys(1.0, 10.0, 128).unwrap();
    let top = t.y(60.0);
    for dy in [0.0, 0.5, 5.0, 9.99] {
        assert_eq!(t.value(top + dy), 60.0, "dy = {}", dy);
    }
}

#[test]
fn test_tracks_rows() {
    let t = CoordTransform::tracks(0.5, 40.0, 8).unwrap();
    assert_eq!(t.y(3.0), 120.0);
    assert_eq!(t.value(159.0), 3.0);
    assert_eq!(t.content_height(), 320.0);
    assert_eq!(t.clamp_value(12.0), 7.0);
}

#[test]
fn test_control_lane_rebuilds_on_resize() {
    let config = test_config();
    let mut view =
        ViewState::control_lane(&config, ControlMode::Velocity, Size::new(400.0, 100.0)).unwrap();
    let before = view.transform().y(0.0);
    view.resize(400.0, 200.0).unwrap();
    assert!(view.transform().y(0.0) > before);
    assert!(view.selection.is_time_only());
}

#[test]
fn test_invalid_resize_keeps_previous_viewport() {
    let mut model = test_model();
    let cmd = send(&mut model, Msg::View(ViewMsg::Resize { width: f64::NAN, height: 10.0 })).unwrap();
    assert_eq!(cmd.errors().len(), 1);
    assert_eq!(model.view.viewport(), Size::new(800.0, 600.0));
}

#[test]
fn test_zoom_keeps_anchor_tick_in_place() {
    let mut model = test_model();
    model.view.set_scroll(1000.0, 0.0);
    let anchor_x = 200.0;
    let tick_before = model.view.transform().exact_tick(model.view.scroll_left() + anchor_x);

    send(&mut model, Msg::View(ViewMsg::ZoomAt { factor: 2.0, anchor_x }));

    assert_eq!(model.view.transform().pixels_per_tick(), 2.0);
    let tick_after = model.view.transform().exact_tick(model.view.scroll_left() + anchor_x);
    assert!((tick_after - tick_before).abs() < 1e-9);
}

#[test]
fn test_rejected_zoom_leaves_transform() {
    let mut model = test_model();
    let before = *model.view.transform();
    let cmd = send(&mut model, Msg::View(ViewMsg::SetZoom(0.0))).unwrap();
    assert!(matches!(
        cmd,
        Cmd::ReportError(notegrid::GridError::Transform(TransformError::InvalidPixelsPerTick(_)))
    ));
    assert_eq!(*model.view.transform(), before);
}

#[test]
fn test_scroll_clamps_to_content() {
    let mut model = test_model();
    send(&mut model, Msg::View(ViewMsg::ScrollTo { left: -50.0, top: 1e9 }));
    assert_eq!(model.view.scroll_left(), 0.0);
    // 128 rows of 10 px in a 600 px viewport
    assert_eq!(model.view.scroll_top(), 680.0);
    assert!(!model.view.auto_scroll);
}

#[test]
fn test_visible_ticks_include_margin() {
    let mut model = test_model();
    model.view.set_scroll(1000.0, 0.0);
    let range = model.view.visible_ticks(64.0);
    assert_eq!(range.start, 936.0);
    assert_eq!(range.end, 1864.0);
}
