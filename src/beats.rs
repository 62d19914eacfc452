//! Measure and beat marks for the visible window
//!
//! Beat marks are regenerated from the current zoom every frame instead of
//! being cached, so a zoom change can never leave stale x positions behind.

use serde::{Deserialize, Serialize};

/// A time-signature segment starting at `start_tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub start_tick: f64,
    /// Index of the first measure in this segment
    pub measure: u32,
    pub numerator: u32,
    pub denominator: u32,
}

impl Measure {
    pub fn new(start_tick: f64, measure: u32, numerator: u32, denominator: u32) -> Self {
        Self {
            start_tick,
            measure,
            numerator: numerator.max(1),
            denominator: denominator.max(1),
        }
    }

    /// 4/4 from the start of the song
    pub fn common_time() -> Self {
        Self::new(0.0, 0, 4, 4)
    }

    /// Copy with a zero numerator or denominator raised to one
    pub fn normalized(&self) -> Self {
        Self::new(self.start_tick, self.measure, self.numerator, self.denominator)
    }

    pub fn ticks_per_beat(&self, timebase: u32) -> f64 {
        (timebase as f64 * 4.0) / self.denominator.max(1) as f64
    }

    pub fn ticks_per_measure(&self, timebase: u32) -> f64 {
        self.ticks_per_beat(timebase) * self.numerator.max(1) as f64
    }
}

/// One beat line inside the visible window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeatMark {
    pub measure: u32,
    /// Beat index within the measure, 0 is the downbeat
    pub beat: u32,
    pub tick: f64,
    /// Content-space x position at the zoom the mark was generated for
    pub x: f64,
}

impl BeatMark {
    #[inline]
    pub fn is_measure_start(&self) -> bool {
        self.beat == 0
    }
}

/// Generate beat marks between `start_tick` and `start_tick + width` pixels
///
/// `measures` must be sorted by `start_tick`; an empty slice means 4/4.
pub fn beats_in_range(
    measures: &[Measure],
    pixels_per_tick: f64,
    timebase: u32,
    start_tick: f64,
    width: f64,
) -> Vec<BeatMark> {
    if !(pixels_per_tick > 0.0) || !(width > 0.0) {
        return Vec::new();
    }

    let default_measures = [Measure::common_time()];
    let measures = if measures.is_empty() {
        &default_measures[..]
    } else {
        measures
    };

    let end_tick = start_tick + width / pixels_per_tick;
    let mut beats = Vec::new();

    for (i, segment) in measures.iter().enumerate() {
        let segment_end = measures
            .get(i + 1)
            .map(|next| next.start_tick)
            .unwrap_or(f64::INFINITY);

        let low = segment.start_tick.max(start_tick);
        let high = segment_end.min(end_tick);
        if low > high {
            continue;
        }

        let ticks_per_beat = segment.ticks_per_beat(timebase);
        if !(ticks_per_beat > 0.0) || !segment.start_tick.is_finite() {
            continue;
        }
        let first = ((low - segment.start_tick) / ticks_per_beat).ceil().max(0.0) as u64;

        let mut index = first;
        loop {
            let tick = segment.start_tick + index as f64 * ticks_per_beat;
            if tick > high || tick >= segment_end {
                break;
            }
            let numerator = segment.numerator.max(1) as u64;
            beats.push(BeatMark {
                measure: segment.measure + (index / numerator) as u32,
                beat: (index % numerator) as u32,
                tick,
                x: tick * pixels_per_tick,
            });
            index += 1;
        }
    }

    beats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_time_first_measure() {
        // one quarter = 480 ticks = 48px at 0.1 px/tick; 200px shows ~4.2 beats
        let beats = beats_in_range(&[], 0.1, 480, 0.0, 200.0);
        let ticks: Vec<f64> = beats.iter().map(|b| b.tick).collect();
        assert_eq!(ticks, vec![0.0, 480.0, 960.0, 1440.0, 1920.0]);
        assert!(beats[0].is_measure_start());
        assert_eq!(beats[4].measure, 1);
        assert_eq!(beats[4].beat, 0);
        assert_eq!(beats[1].x, 48.0);
    }

    #[test]
    fn test_window_starts_mid_measure() {
        let beats = beats_in_range(&[], 1.0, 480, 500.0, 1000.0);
        assert_eq!(beats.first().map(|b| b.tick), Some(960.0));
        assert_eq!(beats.last().map(|b| b.tick), Some(1440.0));
    }

    #[test]
    fn test_time_signature_change() {
        let measures = [Measure::new(0.0, 0, 4, 4), Measure::new(1920.0, 1, 3, 8)];
        let beats = beats_in_range(&measures, 1.0, 480, 1500.0, 1000.0);
        let marks: Vec<(u32, u32, f64)> = beats.iter().map(|b| (b.measure, b.beat, b.tick)).collect();
        assert_eq!(
            marks,
            vec![
                (1, 0, 1920.0),
                (1, 1, 2160.0),
                (1, 2, 2400.0),
            ]
        );
    }

    #[test]
    fn test_zoom_changes_positions() {
        let near = beats_in_range(&[], 0.1, 480, 0.0, 100.0);
        let far = beats_in_range(&[], 0.2, 480, 0.0, 100.0);
        assert_eq!(near[1].x, 48.0);
        assert_eq!(far[1].x, 96.0);
        assert!(near.len() > far.len());
    }

    #[test]
    fn test_zero_numerator_counts_single_beat_measures() {
        let measures = [Measure {
            start_tick: 0.0,
            measure: 0,
            numerator: 0,
            denominator: 4,
        }];
        let beats = beats_in_range(&measures, 0.1, 480, 0.0, 800.0);
        assert!(!beats.is_empty());
        assert!(beats.iter().all(|b| b.is_measure_start()));
        assert_eq!(beats[2].measure, 2);
    }

    #[test]
    fn test_degenerate_segments_are_skipped() {
        let zero_denominator = Measure {
            start_tick: 0.0,
            measure: 0,
            numerator: 4,
            denominator: 0,
        };
        // treated as a whole-note beat, not an infinite one
        let beats = beats_in_range(&[zero_denominator], 0.1, 480, 0.0, 800.0);
        assert_eq!(beats.get(1).map(|b| b.tick), Some(1920.0));

        assert!(beats_in_range(&[Measure::common_time()], 0.1, 0, 0.0, 800.0).is_empty());
        let nan_start = Measure::new(f64::NAN, 0, 4, 4);
        assert!(beats_in_range(&[nan_start], 0.1, 480, 0.0, 800.0).is_empty());
    }

    #[test]
    fn test_normalized_raises_zero_fields() {
        let raw = Measure {
            start_tick: 960.0,
            measure: 2,
            numerator: 0,
            denominator: 0,
        };
        assert_eq!(raw.normalized(), Measure::new(960.0, 2, 1, 1));
    }

    #[test]
    fn test_empty_window() {
        assert!(beats_in_range(&[], 0.1, 480, 0.0, 0.0).is_empty());
    }
}
