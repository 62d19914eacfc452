//! Frame coalescing
//!
//! The scheduler subscribes to a [`GridStore`] and accumulates damage until
//! the host asks for the next frame. A frame is only produced when the
//! state it would be derived from differs from the last painted one, so any
//! burst of dispatches between two vsyncs costs at most one paint.

use std::cell::RefCell;
use std::rc::Rc;

use crate::beats::Measure;
use crate::commands::Damage;
use crate::geometry::PixelPoint;
use crate::gesture::MouseMode;
use crate::model::observer::SubscriptionId;
use crate::model::store::GridStore;
use crate::model::{Size, ViewState};
use crate::selection::Selection;
use crate::store::{ItemId, TrackId};
use crate::transform::CoordTransform;

/// Inputs that change what a paint produces
#[derive(Debug, Clone, PartialEq)]
pub struct FrameKey {
    pub revision: u64,
    pub transform: CoordTransform,
    pub viewport: Size,
    pub scroll: PixelPoint,
    pub selection: Option<Selection>,
    pub selected: Vec<ItemId>,
    pub cursor_tick: f64,
    pub mode: MouseMode,
    pub track: TrackId,
    pub measures: Vec<Measure>,
}

impl FrameKey {
    pub fn derive(view: &ViewState, revision: u64) -> Self {
        Self {
            revision,
            transform: *view.transform(),
            viewport: view.viewport(),
            scroll: view.scroll(),
            selection: view.selection.selection().copied(),
            selected: view.selected_items.clone(),
            cursor_tick: view.cursor_tick,
            mode: view.mode,
            track: view.track,
            measures: view.measures.clone(),
        }
    }
}

/// A frame the host should paint now
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFrame {
    pub damage: Damage,
    pub key: FrameKey,
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Rc<RefCell<Damage>>,
    subscription: Option<SubscriptionId>,
    last_key: Option<FrameKey>,
    frames: u64,
    skipped: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting damage from `store`
    pub fn mount(&mut self, store: &mut GridStore) {
        if self.subscription.is_some() {
            return;
        }
        let pending = Rc::clone(&self.pending);
        let id = store.subscribe(move |damage| pending.borrow_mut().merge(damage.clone()));
        self.subscription = Some(id);
        // First frame after mounting always paints
        self.pending.borrow_mut().merge(Damage::Full);
        tracing::debug!("render scheduler mounted");
    }

    /// Stop collecting damage and drop anything pending
    pub fn unmount(&mut self, store: &mut GridStore) {
        if let Some(id) = self.subscription.take() {
            store.unsubscribe(id);
            tracing::debug!("render scheduler unmounted");
        }
        *self.pending.borrow_mut() = Damage::None;
        self.last_key = None;
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether a frame should be requested from the windowing system
    pub fn needs_paint(&self) -> bool {
        self.is_mounted() && self.pending.borrow().is_some()
    }

    /// Force the next frame to paint, e.g. after the window was exposed
    pub fn invalidate(&mut self) {
        self.last_key = None;
        self.pending.borrow_mut().merge(Damage::Full);
    }

    /// Take the accumulated damage if it changes the picture
    ///
    /// Returns `None` when nothing is pending or when the derived key equals
    /// the last painted one. Pending damage is consumed either way.
    pub fn next_frame(&mut self, view: &ViewState, revision: u64) -> Option<PendingFrame> {
        if !self.is_mounted() {
            return None;
        }
        let damage = std::mem::take(&mut *self.pending.borrow_mut());
        if !damage.is_some() {
            return None;
        }

        let key = FrameKey::derive(view, revision);
        if self.last_key.as_ref() == Some(&key) {
            self.skipped += 1;
            tracing::trace!(skipped = self.skipped, "frame unchanged, skipping paint");
            return None;
        }

        self.last_key = Some(key.clone());
        self.frames += 1;
        Some(PendingFrame { damage, key })
    }

    /// Frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped
    }
}
