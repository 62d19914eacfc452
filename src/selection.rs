//! Rectangular selection in logical space
//!
//! The stored corners keep the order they were dragged in. Readers go
//! through [`Selection::tick_range`], [`Selection::value_range`] or
//! [`Selection::normalized`], so a selection dragged up-left renders and
//! hit-tests exactly like one dragged down-right.

use serde::Serialize;

use crate::geometry::{LogicalPoint, PixelPoint, Rect};
use crate::store::ContentItem;

/// Selection corners in (tick, value) space
///
/// Controller lanes select on time only and leave both value bounds `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub from_tick: f64,
    pub to_tick: f64,
    pub from_value: Option<f64>,
    pub to_value: Option<f64>,
}

impl Selection {
    /// Selection spanning two logical points, stored in the given order
    pub fn new(a: LogicalPoint, b: LogicalPoint) -> Self {
        Self {
            from_tick: a.tick,
            to_tick: b.tick,
            from_value: Some(a.value),
            to_value: Some(b.value),
        }
    }

    /// Time-only selection
    pub fn ticks(from_tick: f64, to_tick: f64) -> Self {
        Self {
            from_tick,
            to_tick,
            from_value: None,
            to_value: None,
        }
    }

    /// Zero-size selection at a point
    pub fn at(point: LogicalPoint) -> Self {
        Self::new(point, point)
    }

    pub fn has_values(&self) -> bool {
        self.from_value.is_some() && self.to_value.is_some()
    }

    /// `(start, end)` with `start <= end`
    pub fn tick_range(&self) -> (f64, f64) {
        if self.from_tick <= self.to_tick {
            (self.from_tick, self.to_tick)
        } else {
            (self.to_tick, self.from_tick)
        }
    }

    /// `(low, high)` with `low <= high`, or `None` for a time-only selection
    pub fn value_range(&self) -> Option<(f64, f64)> {
        match (self.from_value, self.to_value) {
            (Some(a), Some(b)) => Some(if a <= b { (a, b) } else { (b, a) }),
            _ => None,
        }
    }

    /// Same area with `from <= to` on both axes
    pub fn normalized(&self) -> Self {
        let (from_tick, to_tick) = self.tick_range();
        let (from_value, to_value) = match self.value_range() {
            Some((low, high)) => (Some(low), Some(high)),
            None => (None, None),
        };
        Self {
            from_tick,
            to_tick,
            from_value,
            to_value,
        }
    }

    /// Move both corners by `delta`; a time-only selection ignores the value
    pub fn translated(&self, delta: LogicalPoint) -> Self {
        Self {
            from_tick: self.from_tick + delta.tick,
            to_tick: self.to_tick + delta.tick,
            from_value: self.from_value.map(|v| v + delta.value),
            to_value: self.to_value.map(|v| v + delta.value),
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        let (start, end) = self.tick_range();
        end - start
    }

    pub fn is_empty(&self) -> bool {
        self.duration() == 0.0
    }

    /// Whether an item's start lies in the selection
    ///
    /// Time is half-open (`start <= tick < end`). Value bounds are inclusive
    /// because they name whole rows.
    pub fn contains_item(&self, item: &ContentItem) -> bool {
        let (start, end) = self.tick_range();
        if !(item.tick >= start && item.tick < end) {
            return false;
        }
        match self.value_range() {
            Some((low, high)) => item.value >= low && item.value <= high,
            None => true,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.from_tick.is_finite()
            && self.to_tick.is_finite()
            && self.from_value.map_or(true, f64::is_finite)
            && self.to_value.map_or(true, f64::is_finite)
    }
}

/// Owns the current selection and the transitions that replace it
///
/// Every transition is a total function of the previous selection and its
/// input. Resizing always rebuilds the rectangle from the anchor and the
/// current point, so an interrupted drag still leaves a valid selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionModel {
    current: Option<Selection>,
    /// Selections carry value bounds (piano roll, arrangement) or not
    time_only: bool,
}

impl SelectionModel {
    /// Model for views that select rows as well as time
    pub fn new() -> Self {
        Self::default()
    }

    /// Model for controller lanes, which select on time only
    pub fn time_only() -> Self {
        Self {
            current: None,
            time_only: true,
        }
    }

    #[inline]
    pub fn selection(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    #[inline]
    pub fn is_time_only(&self) -> bool {
        self.time_only
    }

    pub fn set(&mut self, selection: Option<Selection>) {
        self.current = selection;
    }

    fn span(&self, anchor: LogicalPoint, current: LogicalPoint) -> Selection {
        if self.time_only {
            Selection::ticks(anchor.tick, current.tick)
        } else {
            Selection::new(anchor, current)
        }
    }

    /// Replace the selection with a zero-size one anchored at `point`
    pub fn start_selection(&mut self, point: LogicalPoint) -> &Selection {
        let selection = self.span(point, point);
        self.current.insert(selection)
    }

    /// Replace the selection with the rectangle spanning both points
    pub fn resize_selection(&mut self, anchor: LogicalPoint, current: LogicalPoint) -> &Selection {
        let selection = self.span(anchor, current);
        self.current.insert(selection)
    }

    /// Translate the whole selection; no-op when nothing is selected
    pub fn move_selection(&mut self, delta: LogicalPoint) -> Option<&Selection> {
        let moved = self.current.as_ref()?.translated(delta);
        Some(self.current.insert(moved))
    }

    /// Replace the selection with `origin` moved by `delta`
    pub fn move_selection_from(&mut self, origin: &Selection, delta: LogicalPoint) -> &Selection {
        self.current.insert(origin.translated(delta))
    }

    /// Half-open pixel containment: the left/top edges count as inside
    pub fn contains_point(rect: &Rect, point: PixelPoint) -> bool {
        rect.contains_point(point)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Normalize the stored selection and return it
    pub fn end_selection(&mut self) -> Option<Selection> {
        let normalized = self.current.as_ref()?.normalized();
        self.current = Some(normalized);
        Some(normalized)
    }
}
