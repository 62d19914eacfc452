//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use notegrid::commands::Cmd;
use notegrid::config::GridConfig;
use notegrid::geometry::LogicalPoint;
use notegrid::gesture::MouseMode;
use notegrid::input::{PointerButton, PointerEvent};
use notegrid::messages::{Msg, PointerMsg};
use notegrid::model::{GridModel, Size};
use notegrid::store::{ContentItem, ContentStore, ItemId, MemoryStore, StoreError, TickRange, TrackId};
use notegrid::transport::ClockTransport;
use notegrid::update::{update, Env};

pub const TRACK: TrackId = TrackId(0);

/// Height of one key row in test models
pub const KEY_HEIGHT: f64 = 10.0;

/// Config with round numbers: 1 px per tick, 10 px rows, 120-tick grid
pub fn test_config() -> GridConfig {
    GridConfig {
        pixels_per_tick: 1.0,
        key_height: KEY_HEIGHT,
        number_of_keys: 128,
        ..GridConfig::default()
    }
}

pub fn test_model() -> GridModel {
    test_model_with(test_config(), MouseMode::Pencil)
}

pub fn test_model_with(config: GridConfig, mode: MouseMode) -> GridModel {
    let mut model = GridModel::new(config, Size::new(800.0, 600.0)).unwrap();
    model.view.mode = mode;
    model
}

/// Viewport y at the middle of `key`'s row, with no vertical scroll
pub fn row_y(key: f64) -> f64 {
    (127.0 - key) * KEY_HEIGHT + KEY_HEIGHT / 2.0
}

/// [`MemoryStore`] that counts the edit intents it receives
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub creates: usize,
    pub deletes: usize,
    pub moves: Vec<(ItemId, LogicalPoint)>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(1, 120.0),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, tick: f64, duration: f64, value: f64) -> ItemId {
        self.inner.insert(TRACK, tick, duration, value).unwrap()
    }

    pub fn item(&self, id: ItemId) -> Option<ContentItem> {
        self.inner.get(TRACK, id).copied()
    }
}

impl ContentStore for RecordingStore {
    fn query_items_in_window(&self, track: TrackId, range: TickRange) -> Vec<ContentItem> {
        self.inner.query_items_in_window(track, range)
    }

    fn create_item(&mut self, track: TrackId, at: LogicalPoint) -> Result<ItemId, StoreError> {
        self.creates += 1;
        self.inner.create_item(track, at)
    }

    fn delete_item(&mut self, track: TrackId, id: ItemId) -> Result<(), StoreError> {
        self.deletes += 1;
        self.inner.delete_item(track, id)
    }

    fn move_item(&mut self, track: TrackId, id: ItemId, delta: LogicalPoint) -> Result<(), StoreError> {
        self.moves.push((id, delta));
        self.inner.move_item(track, id, delta)
    }

    fn revision(&self) -> u64 {
        self.inner.revision()
    }
}

/// A model with its collaborators and a controllable clock
pub struct Harness {
    pub model: GridModel,
    pub store: RecordingStore,
    pub transport: ClockTransport,
    t0: Instant,
    elapsed: Duration,
}

impl Harness {
    pub fn new(model: GridModel) -> Self {
        let t0 = Instant::now();
        Self {
            model,
            store: RecordingStore::new(),
            transport: ClockTransport::new(120.0, 480, t0),
            t0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn pencil() -> Self {
        Self::new(test_model())
    }

    pub fn selection() -> Self {
        Self::new(test_model_with(test_config(), MouseMode::Selection))
    }

    pub fn now(&self) -> Instant {
        self.t0 + self.elapsed
    }

    pub fn advance(&mut self, ms: u64) {
        self.elapsed += Duration::from_millis(ms);
    }

    pub fn send(&mut self, msg: Msg) -> Option<Cmd> {
        let mut env = Env::new(&mut self.store, &mut self.transport);
        update(&mut self.model, &mut env, msg)
    }

    fn event(&self, button: PointerButton, x: f64, y: f64) -> PointerEvent {
        PointerEvent::at(button, x, y, self.now())
    }

    pub fn press(&mut self, button: PointerButton, x: f64, y: f64) -> Option<Cmd> {
        let event = self.event(button, x, y);
        self.send(Msg::Pointer(PointerMsg::Down(event)))
    }

    pub fn move_to(&mut self, button: PointerButton, x: f64, y: f64) -> Option<Cmd> {
        let event = self.event(button, x, y);
        self.send(Msg::Pointer(PointerMsg::Move(event)))
    }

    pub fn release(&mut self, button: PointerButton, x: f64, y: f64) -> Option<Cmd> {
        let event = self.event(button, x, y);
        self.send(Msg::Pointer(PointerMsg::Up(event)))
    }

    /// Press, move once, release at the same point
    pub fn drag(&mut self, button: PointerButton, from: (f64, f64), to: (f64, f64)) -> Option<Cmd> {
        self.press(button, from.0, from.1);
        self.move_to(button, to.0, to.1);
        self.release(button, to.0, to.1)
    }
}
