//! Rendering tests - frame derivation, layer painting, scheduling

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{row_y, test_config, test_model_with, RecordingStore, TRACK};
use notegrid::beats::Measure;
use notegrid::commands::{Damage, Layer};
use notegrid::config::GridConfig;
use notegrid::gesture::MouseMode;
use notegrid::input::{PointerButton, PointerEvent};
use notegrid::messages::{Msg, PointerMsg, TransportMsg, ViewMsg};
use notegrid::model::{GridModel, Size};
use notegrid::store::ContentStore;
use notegrid::theme::Theme;
use notegrid::transport::ClockTransport;
use notegrid::update::Env;
use notegrid::view::{Frame, FrameInput, LayeredRenderer, RenderScheduler};
use notegrid::GridStore;

const WIDTH: usize = 200;
const HEIGHT: usize = 120;

/// 0.1 px per tick: beats every 48 px, items 48 px per quarter note
fn small_model() -> GridModel {
    let config = GridConfig {
        pixels_per_tick: 0.1,
        ..test_config()
    };
    let mut model = GridModel::new(config, Size::new(WIDTH as f64, HEIGHT as f64)).unwrap();
    model.view.auto_scroll = false;
    model
}

fn paint(model: &GridModel, store: &dyn ContentStore) -> (Vec<u32>, notegrid::view::PaintStats) {
    let theme = Theme::default();
    let renderer = LayeredRenderer::new(theme.grid);
    let input = FrameInput::derive(&model.view, store, 64.0);
    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    let stats = {
        let mut frame = Frame::new(&mut buffer, WIDTH, HEIGHT);
        renderer.paint(&mut frame, &input)
    };
    (buffer, stats)
}

fn pixel(buffer: &[u32], x: usize, y: usize) -> u32 {
    buffer[y * WIDTH + x]
}

#[test]
fn test_paints_layers_bottom_to_top() {
    let model = small_model();
    let store = RecordingStore::new();
    let (_, stats) = paint(&model, &store);
    let expected: Vec<u8> = Layer::ALL.iter().map(|l| l.z()).collect();
    assert_eq!(stats.layers, expected);
}

#[test]
fn test_item_drawn_at_projected_position() {
    let model = small_model();
    let mut store = RecordingStore::new();
    // x = 10..58, key 120 row at y = 70..80
    store.insert(100.0, 480.0, 120.0);
    let (buffer, stats) = paint(&model, &store);

    let theme = Theme::default().grid;
    assert_eq!(stats.items, 1);
    assert_eq!(pixel(&buffer, 30, 75), theme.note.to_argb_u32());
    assert_eq!(pixel(&buffer, 10, 75), theme.note_border.to_argb_u32());
    assert_eq!(pixel(&buffer, 150, 5), theme.background.to_argb_u32());
    // key 126 is F#
    assert_eq!(pixel(&buffer, 150, 15), theme.black_key_row.to_argb_u32());
}

#[test]
fn test_items_outside_margin_are_culled() {
    let model = small_model();
    let mut store = RecordingStore::new();
    store.insert(100.0, 480.0, 120.0);
    // Starts 100 px past the right edge, beyond the 64 px margin
    store.insert(3000.0, 480.0, 120.0);
    // Starts 40 px past the right edge, inside the margin
    store.insert(2400.0, 480.0, 120.0);

    let input = FrameInput::derive(&model.view, &store, 64.0);
    assert_eq!(input.items.len(), 2);
    assert!(input.items.iter().all(|item| item.tick < 3000.0));
}

#[test]
fn test_selected_items_use_selected_color() {
    let mut model = small_model();
    let mut store = RecordingStore::new();
    let id = store.insert(100.0, 480.0, 120.0);
    model.view.selected_items = vec![id];

    let (buffer, stats) = paint(&model, &store);
    assert_eq!(stats.selected_items, 1);
    assert_eq!(pixel(&buffer, 30, 75), Theme::default().grid.selected_note.to_argb_u32());
}

#[test]
fn test_layers_follow_their_scroll_axes() {
    let mut model = small_model();
    let mut store = RecordingStore::new();
    store.insert(1000.0, 480.0, 120.0);
    model.view.cursor_tick = 1000.0;
    // 100 px right, 20 px down
    model.view.set_scroll(100.0, 20.0);

    let input = FrameInput::derive(&model.view, &store, 0.0);
    let (buffer, stats) = paint(&model, &store);
    let theme = Theme::default().grid;

    assert!(stats.cursor);
    // Cursor at content x 100 lands on viewport x 0, full height
    assert_eq!(pixel(&buffer, 0, 5), theme.cursor.to_argb_u32());
    assert_eq!(pixel(&buffer, 0, 115), theme.cursor.to_argb_u32());
    // Item at content (100, 70) lands on viewport (0, 50); interior at (20, 55)
    assert_eq!(pixel(&buffer, 20, 55), theme.note.to_argb_u32());
    // Beats: content x 144 and 192 are visible at 44 and 92
    let xs: Vec<f64> = input.beats.iter().map(|b| b.x - input.scroll.x).collect();
    assert!(xs.iter().any(|x| (x - 44.0).abs() < 1e-6));
    assert!(xs.iter().any(|x| (x - 92.0).abs() < 1e-6));
}

#[test]
fn test_selection_rect_is_drawn() {
    let mut model = test_model_with(test_config(), MouseMode::Selection);
    model.view.resize(WIDTH as f64, HEIGHT as f64).unwrap();
    let mut store = RecordingStore::new();
    let mut transport = ClockTransport::default();
    let t = std::time::Instant::now();
    {
        let mut env = Env::new(&mut store, &mut transport);
        let down = PointerEvent::at(PointerButton::Primary, 20.0, row_y(125.0), t);
        notegrid::update::update(&mut model, &mut env, Msg::Pointer(PointerMsg::Down(down)));
        let mv = down.moved_by(100.0, 30.0, t);
        notegrid::update::update(&mut model, &mut env, Msg::Pointer(PointerMsg::Move(mv)));
    }

    let (buffer, stats) = paint(&model, &store);
    assert!(stats.selection);
    let border = Theme::default().grid.selection_border.to_argb_u32();
    assert_eq!(pixel(&buffer, 20, 40), border);
}

#[test]
fn test_degenerate_measures_still_paint_beats() {
    let mut grid = store_with_model();
    let mut content = RecordingStore::new();
    let mut transport = ClockTransport::default();
    let measures = vec![
        Measure {
            start_tick: 0.0,
            measure: 0,
            numerator: 0,
            denominator: 4,
        },
        Measure {
            start_tick: f64::NAN,
            measure: 1,
            numerator: 3,
            denominator: 0,
        },
    ];

    let mut env = Env::new(&mut content, &mut transport);
    let cmd = grid.dispatch(&mut env, Msg::View(ViewMsg::SetMeasures(measures)));
    assert!(cmd.unwrap().damage().contains(Layer::Beats));
    assert_eq!(grid.state().view.measures, vec![Measure::new(0.0, 0, 1, 4)]);

    let (_, stats) = paint(grid.state(), &content);
    // one beat per 48 px across 200 px
    assert_eq!(stats.beats, 5);
}

// ========================================================================
// Scheduling
// ========================================================================

fn store_with_model() -> GridStore {
    GridStore::new(small_model())
}

#[test]
fn test_subscribers_run_after_commit() {
    let mut grid = store_with_model();
    let mut content = RecordingStore::new();
    let mut transport = ClockTransport::default();

    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let id = grid.subscribe(move |damage| {
        assert!(damage.contains(Layer::Cursor));
        seen.set(seen.get() + 1);
    });

    let mut env = Env::new(&mut content, &mut transport);
    grid.dispatch(&mut env, Msg::Transport(TransportMsg::PositionChanged(240.0)));
    assert_eq!(calls.get(), 1);
    assert_eq!(grid.state().view.cursor_tick, 240.0);

    // Same position again changes nothing and notifies nobody
    grid.dispatch(&mut env, Msg::Transport(TransportMsg::PositionChanged(240.0)));
    assert_eq!(calls.get(), 1);

    assert!(grid.unsubscribe(id));
    grid.dispatch(&mut env, Msg::Transport(TransportMsg::PositionChanged(480.0)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_pointer_moves_without_drag_do_not_schedule_paint() {
    let mut grid = store_with_model();
    let mut scheduler = RenderScheduler::new();
    scheduler.mount(&mut grid);
    let mut content = RecordingStore::new();
    let mut transport = ClockTransport::default();
    assert!(scheduler.next_frame(&grid.state().view, content.revision()).is_some());

    let t = std::time::Instant::now();
    let mut env = Env::new(&mut content, &mut transport);
    for x in 0..10 {
        let event = PointerEvent::at(PointerButton::Primary, x as f64, 50.0, t);
        grid.dispatch(&mut env, Msg::Pointer(PointerMsg::Move(event)));
    }
    assert!(!scheduler.needs_paint());
}

#[test]
fn test_many_dispatches_paint_once() {
    let mut grid = store_with_model();
    let mut scheduler = RenderScheduler::new();
    scheduler.mount(&mut grid);
    let mut content = RecordingStore::new();
    let mut transport = ClockTransport::default();
    scheduler.next_frame(&grid.state().view, 0);

    {
        let mut env = Env::new(&mut content, &mut transport);
        for i in 1..=20 {
            grid.dispatch(
                &mut env,
                Msg::Transport(TransportMsg::PositionChanged(i as f64 * 10.0)),
            );
        }
    }
    assert!(scheduler.needs_paint());
    let frame = scheduler.next_frame(&grid.state().view, content.revision()).unwrap();
    assert_eq!(frame.damage, Damage::layer(Layer::Cursor));
    assert_eq!(frame.key.cursor_tick, 200.0);
    assert!(scheduler.next_frame(&grid.state().view, content.revision()).is_none());
    assert_eq!(scheduler.frame_count(), 2);
}

#[test]
fn test_content_revision_changes_frame_key() {
    let mut grid = store_with_model();
    let mut scheduler = RenderScheduler::new();
    scheduler.mount(&mut grid);
    let mut content = RecordingStore::new();
    scheduler.next_frame(&grid.state().view, content.revision());

    content.insert(0.0, 120.0, 60.0);
    grid.invalidate(Damage::layer(Layer::Content));
    assert!(scheduler
        .next_frame(&grid.state().view, content.revision())
        .is_some());
    assert_eq!(content.inner.len(TRACK), 1);
}
