//! Playback transport seam

use std::time::{Duration, Instant};

use crate::quantize::DEFAULT_TIMEBASE;

/// Playback position owner
///
/// The grid only reads the position and play state, and seeks when the
/// user clicks empty space in selection mode while stopped.
pub trait Transport {
    /// Current position in ticks
    fn position(&self) -> f64;

    fn is_playing(&self) -> bool;

    fn seek(&mut self, tick: f64);
}

/// Transport driven by wall-clock time, tempo and timebase
///
/// Time is passed in explicitly so tests control it.
#[derive(Debug, Clone)]
pub struct ClockTransport {
    tempo_bpm: f64,
    timebase: u32,
    /// Position at the last seek or play/stop
    base_tick: f64,
    started_at: Option<Instant>,
    now: Instant,
}

impl ClockTransport {
    pub fn new(tempo_bpm: f64, timebase: u32, now: Instant) -> Self {
        Self {
            tempo_bpm: if tempo_bpm > 0.0 { tempo_bpm } else { 120.0 },
            timebase: timebase.max(1),
            base_tick: 0.0,
            started_at: None,
            now,
        }
    }

    pub fn ticks_per_second(&self) -> f64 {
        self.tempo_bpm / 60.0 * self.timebase as f64
    }

    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm
    }

    /// Advance the clock; returns the new position
    pub fn tick_clock(&mut self, now: Instant) -> f64 {
        self.now = now;
        self.position()
    }

    pub fn play(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.now = now;
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self, now: Instant) {
        self.now = now;
        self.base_tick = self.position();
        self.started_at = None;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_playing() {
            self.stop(now);
        } else {
            self.play(now);
        }
    }

    fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self.now.saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }
}

impl Default for ClockTransport {
    fn default() -> Self {
        Self::new(120.0, DEFAULT_TIMEBASE, Instant::now())
    }
}

impl Transport for ClockTransport {
    fn position(&self) -> f64 {
        self.base_tick + self.elapsed().as_secs_f64() * self.ticks_per_second()
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn seek(&mut self, tick: f64) {
        self.base_tick = tick.max(0.0);
        if self.started_at.is_some() {
            self.started_at = Some(self.now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advances_while_playing() {
        let t0 = Instant::now();
        let mut transport = ClockTransport::new(120.0, 480, t0);
        assert_eq!(transport.position(), 0.0);

        transport.play(t0);
        // 120 bpm = 2 beats per second = 960 ticks
        let pos = transport.tick_clock(t0 + Duration::from_secs(1));
        assert!((pos - 960.0).abs() < 1e-6);
    }

    #[test]
    fn test_stop_freezes_position() {
        let t0 = Instant::now();
        let mut transport = ClockTransport::new(120.0, 480, t0);
        transport.play(t0);
        transport.stop(t0 + Duration::from_millis(500));
        let frozen = transport.position();
        transport.tick_clock(t0 + Duration::from_secs(5));
        assert_eq!(transport.position(), frozen);
        assert!(!transport.is_playing());
    }

    #[test]
    fn test_seek_while_playing_restarts_from_target() {
        let t0 = Instant::now();
        let mut transport = ClockTransport::new(60.0, 480, t0);
        transport.play(t0);
        transport.tick_clock(t0 + Duration::from_secs(2));
        transport.seek(100.0);
        assert!((transport.position() - 100.0).abs() < 1e-6);
        transport.tick_clock(t0 + Duration::from_secs(3));
        assert!((transport.position() - 580.0).abs() < 1e-6);
    }

    #[test]
    fn test_seek_clamps_negative() {
        let mut transport = ClockTransport::default();
        transport.seek(-50.0);
        assert_eq!(transport.position(), 0.0);
    }
}
