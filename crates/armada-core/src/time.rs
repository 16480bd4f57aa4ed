//! Time Management
//!
//! Frame timing for the simulation loop:
//! - Delta time measurement from host timestamps with spiral-of-death clamping
//! - Rolling frame statistics
//! - Simulation-time cooldowns
//!
//! Nothing in here reads a wall clock. The host passes timestamps in, which
//! keeps the loop testable and independent of any particular timing source.

use serde::Serialize;

/// Fixed simulation step (60 Hz)
pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

/// Largest delta a single tick may observe
pub const MAX_DELTA_TIME: f64 = 0.25;

/// Delta time wrapper for type safety
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DeltaTime(pub f64);

impl DeltaTime {
    /// Create a new delta time from seconds
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Create a new delta time from milliseconds
    pub fn from_millis(millis: f64) -> Self {
        Self(millis / 1000.0)
    }

    /// Get the delta time in seconds
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Get the delta time in milliseconds
    pub fn as_millis(&self) -> f64 {
        self.0 * 1000.0
    }

    /// Get the delta time as f32, the precision entity state is kept in
    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32
    }

    /// Clamp to `max`, never negative
    pub fn clamped(self, max: f64) -> Self {
        Self(self.0.clamp(0.0, max))
    }
}

impl Default for DeltaTime {
    fn default() -> Self {
        Self(FIXED_TIMESTEP)
    }
}

/// Compute a clamped delta from two millisecond timestamps
pub fn calculate_delta_time(current_ms: f64, previous_ms: f64, max_delta: f64) -> f64 {
    ((current_ms - previous_ms) / 1000.0).clamp(0.0, max_delta)
}

/// Turns host timestamps into per-tick deltas.
///
/// The first tick after a reset has no baseline and reports `fallback`
/// (the fixed step) instead of a delta measured from an arbitrary origin.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_timestamp_ms: Option<f64>,
    max_delta: f64,
    fallback: f64,
}

impl FrameClock {
    /// Create a clock that clamps deltas to `max_delta`
    pub fn new(max_delta: f64, fallback: f64) -> Self {
        Self {
            last_timestamp_ms: None,
            max_delta,
            fallback,
        }
    }

    /// Record a timestamp and return the delta since the previous one
    pub fn advance(&mut self, now_ms: f64) -> DeltaTime {
        let dt = match self.last_timestamp_ms {
            Some(previous) => calculate_delta_time(now_ms, previous, self.max_delta),
            None => self.fallback,
        };
        self.last_timestamp_ms = Some(now_ms);
        DeltaTime(dt)
    }

    /// Forget the baseline; the next tick reports the fallback delta
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }

    /// Timestamp of the last tick, if any
    pub fn last_timestamp_ms(&self) -> Option<f64> {
        self.last_timestamp_ms
    }

    /// The clamp applied to every delta
    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_DELTA_TIME, FIXED_TIMESTEP)
    }
}

/// Rolling frame-time statistics.
///
/// `fps` is recomputed once per window from the frames observed in that
/// window; min/max/average cover everything since the last reset.
#[derive(Debug, Clone, Serialize)]
pub struct FrameStats {
    frame_count: u64,
    total_time: f64,
    min_frame_time: f64,
    max_frame_time: f64,
    current_fps: f64,
    window: f64,
    window_elapsed: f64,
    window_frames: u32,
}

impl FrameStats {
    /// Create statistics that refresh fps every `window` seconds
    pub fn new(window: f64) -> Self {
        Self {
            frame_count: 0,
            total_time: 0.0,
            min_frame_time: f64::INFINITY,
            max_frame_time: 0.0,
            current_fps: 0.0,
            window: window.max(f64::EPSILON),
            window_elapsed: 0.0,
            window_frames: 0,
        }
    }

    /// Record one frame
    pub fn record(&mut self, delta_time: f64) {
        self.frame_count += 1;
        self.total_time += delta_time;
        self.min_frame_time = self.min_frame_time.min(delta_time);
        self.max_frame_time = self.max_frame_time.max(delta_time);

        self.window_elapsed += delta_time;
        self.window_frames += 1;
        if self.window_elapsed >= self.window {
            self.current_fps = self.window_frames as f64 / self.window_elapsed;
            self.window_elapsed = 0.0;
            self.window_frames = 0;
        }
    }

    /// Clear all statistics
    pub fn reset(&mut self) {
        *self = Self::new(self.window);
    }

    /// Frames recorded since the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulated time covered by recorded frames
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Shortest frame seen, or 0 before the first frame
    pub fn min_frame_time(&self) -> f64 {
        if self.frame_count == 0 { 0.0 } else { self.min_frame_time }
    }

    /// Longest frame seen
    pub fn max_frame_time(&self) -> f64 {
        self.max_frame_time
    }

    /// Mean frame time
    pub fn average_frame_time(&self) -> f64 {
        if self.frame_count > 0 {
            self.total_time / self.frame_count as f64
        } else {
            0.0
        }
    }

    /// Frames per second as of the last completed window
    pub fn fps(&self) -> f64 {
        self.current_fps
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// One-shot cooldown driven by simulation time
#[derive(Debug, Clone, PartialEq)]
pub struct Cooldown {
    duration: f64,
    remaining: f64,
}

impl Cooldown {
    /// Create a cooldown that starts ready
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    /// Advance the cooldown
    pub fn tick(&mut self, dt: f64) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Check if the cooldown has elapsed
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Start the cooldown over
    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    /// Fire if ready, restarting the cooldown; returns whether it fired
    pub fn try_trigger(&mut self) -> bool {
        if self.is_ready() {
            self.start();
            true
        } else {
            false
        }
    }

    /// Seconds left until ready
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Progress towards ready, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Change the duration; an in-flight cooldown keeps its remaining time
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        self.remaining = self.remaining.min(duration);
    }

    /// Configured duration
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_time() {
        let dt = DeltaTime::from_secs(0.016);
        assert!((dt.as_secs() - 0.016).abs() < 0.0001);
        assert!((dt.as_millis() - 16.0).abs() < 0.1);
        assert_eq!(DeltaTime::from_millis(500.0).clamped(0.25).as_secs(), 0.25);
    }

    #[test]
    fn test_calculate_delta_time_clamps_stall() {
        // A five second stall must not leak into the simulation
        let dt = calculate_delta_time(6000.0, 1000.0, MAX_DELTA_TIME);
        assert!(dt <= 0.25);
        assert_eq!(dt, 0.25);

        let dt = calculate_delta_time(1016.0, 1000.0, MAX_DELTA_TIME);
        assert!((dt - 0.016).abs() < 1e-9);
    }

    #[test]
    fn test_frame_clock_first_tick_uses_fallback() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(12345.0).as_secs(), FIXED_TIMESTEP);
        assert!((clock.advance(12361.0).as_secs() - 0.016).abs() < 1e-9);

        clock.reset();
        assert_eq!(clock.last_timestamp_ms(), None);
        assert_eq!(clock.advance(99999.0).as_secs(), FIXED_TIMESTEP);
    }

    #[test]
    fn test_frame_stats_window() {
        let frame = 1.0 / 32.0;
        let mut stats = FrameStats::new(1.0);
        for _ in 0..16 {
            stats.record(frame);
        }
        // Window not complete yet
        assert_eq!(stats.fps(), 0.0);
        for _ in 0..16 {
            stats.record(frame);
        }
        assert!((stats.fps() - 32.0).abs() < 1e-9);
        assert_eq!(stats.frame_count(), 32);
        assert!((stats.average_frame_time() - frame).abs() < 1e-12);

        stats.record(0.1);
        assert_eq!(stats.max_frame_time(), 0.1);
        assert_eq!(stats.min_frame_time(), frame);

        stats.reset();
        assert_eq!(stats.frame_count(), 0);
        assert_eq!(stats.min_frame_time(), 0.0);
    }

    #[test]
    fn test_cooldown() {
        let mut cooldown = Cooldown::new(0.15);
        assert!(cooldown.try_trigger());
        assert!(!cooldown.try_trigger());

        cooldown.tick(0.1);
        assert!(!cooldown.is_ready());
        assert!((cooldown.progress() - 0.1 / 0.15).abs() < 1e-9);

        cooldown.tick(0.06);
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.remaining(), 0.0);
    }
}
