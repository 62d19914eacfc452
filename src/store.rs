//! Content store seam
//!
//! The grid never owns musical content. It reads items for the visible
//! window and sends edit intents through [`ContentStore`]. [`MemoryStore`]
//! is the in-memory implementation used by the demo host and the tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::LogicalPoint;

/// Stable identifier of a content item within its track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Track index in the song
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub usize);

/// A positioned event: a note, a controller point or an arrangement block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    pub tick: f64,
    /// Length in ticks; zero for point events
    pub duration: f64,
    /// Pitch, controller value or row, depending on the view
    pub value: f64,
}

impl ContentItem {
    pub fn note(id: ItemId, tick: f64, duration: f64, value: f64) -> Self {
        Self {
            id,
            tick,
            duration,
            value,
        }
    }

    pub fn point(id: ItemId, tick: f64, value: f64) -> Self {
        Self::note(id, tick, 0.0, value)
    }

    #[inline]
    pub fn end_tick(&self) -> f64 {
        self.tick + self.duration
    }

    /// Whether any part of the item lies in `range`; point events count when
    /// their tick does
    pub fn overlaps(&self, range: TickRange) -> bool {
        if self.duration <= 0.0 {
            return range.contains(self.tick);
        }
        self.tick < range.end && self.end_tick() > range.start
    }
}

/// Half-open tick interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickRange {
    pub start: f64,
    pub end: f64,
}

impl TickRange {
    pub fn new(start: f64, end: f64) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    #[inline]
    pub fn contains(&self, tick: f64) -> bool {
        tick >= self.start && tick < self.end
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("track {0:?} does not exist")]
    UnknownTrack(TrackId),
    #[error("item {id:?} not found on track {track:?}")]
    UnknownItem { track: TrackId, id: ItemId },
    #[error("invalid position tick={tick} value={value}")]
    InvalidPosition { tick: f64, value: f64 },
    #[error("store rejected the edit: {0}")]
    Rejected(String),
}

/// Narrow interface to the song's content
///
/// Calls are never retried by the grid. A failed mutation is reported to
/// the host and the in-progress gesture keeps its visual state.
pub trait ContentStore {
    /// Items on `track` overlapping `range`, in tick order
    fn query_items_in_window(&self, track: TrackId, range: TickRange) -> Vec<ContentItem>;

    /// Create an item at `at` and return its id
    fn create_item(&mut self, track: TrackId, at: LogicalPoint) -> Result<ItemId, StoreError>;

    fn delete_item(&mut self, track: TrackId, id: ItemId) -> Result<(), StoreError>;

    /// Shift an item by `delta` ticks and values
    fn move_item(&mut self, track: TrackId, id: ItemId, delta: LogicalPoint) -> Result<(), StoreError>;

    /// Monotonic counter bumped by every successful mutation
    fn revision(&self) -> u64;
}

/// Which operation a [`MemoryStore`] should refuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Create,
    Delete,
    Move,
}

#[derive(Debug, Clone, Default)]
struct Track {
    items: BTreeMap<ItemId, ContentItem>,
}

/// In-memory [`ContentStore`] with optional failure injection
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tracks: Vec<Track>,
    next_id: u64,
    revision: u64,
    /// Duration of newly created items
    default_duration: f64,
    fail_on: Vec<FailOn>,
}

impl MemoryStore {
    pub fn new(track_count: usize, default_duration: f64) -> Self {
        Self {
            tracks: vec![Track::default(); track_count.max(1)],
            next_id: 1,
            revision: 0,
            default_duration,
            fail_on: Vec::new(),
        }
    }

    /// Refuse every subsequent `op`
    pub fn fail_on(&mut self, op: FailOn) {
        if !self.fail_on.contains(&op) {
            self.fail_on.push(op);
        }
    }

    pub fn clear_failures(&mut self) {
        self.fail_on.clear();
    }

    /// Insert a fully specified item, bypassing failure injection
    pub fn insert(&mut self, track: TrackId, tick: f64, duration: f64, value: f64) -> Result<ItemId, StoreError> {
        let id = ItemId(self.next_id);
        let item = ContentItem::note(id, tick, duration, value);
        self.track_mut(track)?.items.insert(id, item);
        self.next_id += 1;
        self.revision += 1;
        Ok(id)
    }

    pub fn get(&self, track: TrackId, id: ItemId) -> Option<&ContentItem> {
        self.tracks.get(track.0)?.items.get(&id)
    }

    pub fn items(&self, track: TrackId) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = self
            .tracks
            .get(track.0)
            .map(|t| t.items.values().copied().collect())
            .unwrap_or_default();
        sort_by_tick(&mut items);
        items
    }

    pub fn len(&self, track: TrackId) -> usize {
        self.tracks.get(track.0).map_or(0, |t| t.items.len())
    }

    pub fn is_empty(&self, track: TrackId) -> bool {
        self.len(track) == 0
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn track_mut(&mut self, track: TrackId) -> Result<&mut Track, StoreError> {
        self.tracks
            .get_mut(track.0)
            .ok_or(StoreError::UnknownTrack(track))
    }

    fn check(&self, op: FailOn) -> Result<(), StoreError> {
        if self.fail_on.contains(&op) {
            return Err(StoreError::Rejected(format!("{:?} disabled", op)));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(1, 480.0)
    }
}

fn sort_by_tick(items: &mut [ContentItem]) {
    items.sort_by(|a, b| a.tick.total_cmp(&b.tick).then(a.id.cmp(&b.id)));
}

impl ContentStore for MemoryStore {
    fn query_items_in_window(&self, track: TrackId, range: TickRange) -> Vec<ContentItem> {
        let Some(t) = self.tracks.get(track.0) else {
            return Vec::new();
        };
        let mut items: Vec<ContentItem> = t
            .items
            .values()
            .filter(|item| item.overlaps(range))
            .copied()
            .collect();
        sort_by_tick(&mut items);
        items
    }

    fn create_item(&mut self, track: TrackId, at: LogicalPoint) -> Result<ItemId, StoreError> {
        self.check(FailOn::Create)?;
        if !at.is_finite() || at.tick < 0.0 {
            return Err(StoreError::InvalidPosition {
                tick: at.tick,
                value: at.value,
            });
        }
        let duration = self.default_duration;
        self.insert(track, at.tick, duration, at.value)
    }

    fn delete_item(&mut self, track: TrackId, id: ItemId) -> Result<(), StoreError> {
        self.check(FailOn::Delete)?;
        self.track_mut(track)?
            .items
            .remove(&id)
            .ok_or(StoreError::UnknownItem { track, id })?;
        self.revision += 1;
        Ok(())
    }

    fn move_item(&mut self, track: TrackId, id: ItemId, delta: LogicalPoint) -> Result<(), StoreError> {
        self.check(FailOn::Move)?;
        if !delta.is_finite() {
            return Err(StoreError::InvalidPosition {
                tick: delta.tick,
                value: delta.value,
            });
        }
        let item = self
            .track_mut(track)?
            .items
            .get_mut(&id)
            .ok_or(StoreError::UnknownItem { track, id })?;
        item.tick = (item.tick + delta.tick).max(0.0);
        item.value += delta.value;
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
