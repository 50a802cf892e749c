//! Timeline — the playback time controller.
//!
//! Owns the `PlaybackClock` and is the only thing that mutates it. Time only
//! moves when the host calls `tick` with a wall-clock instant, which keeps the
//! timeline deterministic under test: pass fabricated instants and the clock
//! advances by exactly their difference.

pub mod scrub;

use std::time::Instant;

use tracing::debug;

/// Mutable playback state.
///
/// At rest `0 <= current_time <= duration`. While looping, `current_time`
/// wraps back to `loop_start` once it reaches `loop_end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
    pub loop_start: f64,
    pub loop_end: f64,
    pub loop_enabled: bool,
}

impl PlaybackClock {
    /// Fresh clock for a scene: time 0, paused, full-duration loop range (disabled).
    pub fn new(duration: f64) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        PlaybackClock {
            current_time: 0.0,
            duration,
            is_playing: false,
            loop_start: 0.0,
            loop_end: duration,
            loop_enabled: false,
        }
    }

    /// Fraction of the scene already played, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// What a single `tick` did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused; nothing changed.
    Idle,
    Advanced,
    /// Hit `loop_end` and jumped back to `loop_start`.
    Wrapped,
    /// Hit the end of the scene and paused.
    Ended,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    clock: PlaybackClock,
    last_frame: Option<Instant>,
}

impl Timeline {
    pub fn new(duration: f64) -> Self {
        Timeline {
            clock: PlaybackClock::new(duration),
            last_frame: None,
        }
    }

    /// Reset for a newly loaded scene.
    pub fn load(&mut self, duration: f64) {
        *self = Timeline::new(duration);
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time
    }

    pub fn duration(&self) -> f64 {
        self.clock.duration
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing
    }

    /// Start playing. `now` becomes the basis for the next tick's delta.
    pub fn play(&mut self, now: Instant) {
        self.clock.is_playing = true;
        self.last_frame = Some(now);
    }

    pub fn pause(&mut self) {
        self.clock.is_playing = false;
    }

    pub fn toggle_play(&mut self, now: Instant) {
        if self.clock.is_playing {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Jump to `time`, clamped to `[0, duration]`. Valid while playing or
    /// paused. NaN is ignored. Returns the resulting time.
    pub fn seek(&mut self, time: f64) -> f64 {
        if time.is_nan() {
            return self.clock.current_time;
        }
        self.clock.current_time = time.clamp(0.0, self.clock.duration);
        self.clock.current_time
    }

    /// Seek `seconds` back from the current time.
    pub fn rewind(&mut self, seconds: f64) -> f64 {
        self.seek(self.clock.current_time - seconds)
    }

    /// Advance by the wall time elapsed since the previous tick (or `play`).
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.clock.is_playing {
            return TickOutcome::Idle;
        }
        let elapsed = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last_frame = Some(now);

        let clock = &mut self.clock;
        clock.current_time += elapsed;

        if clock.loop_enabled && clock.current_time >= clock.loop_end {
            clock.current_time = clock.loop_start.clamp(0.0, clock.duration);
            return TickOutcome::Wrapped;
        }
        if clock.current_time >= clock.duration {
            clock.current_time = clock.duration;
            clock.is_playing = false;
            debug!(duration = clock.duration, "playback reached end of scene");
            return TickOutcome::Ended;
        }
        TickOutcome::Advanced
    }

    /// Enable looping over `[start, end)`. Ranges that are not finite or not
    /// increasing are rejected and the previous loop settings stay in place.
    pub fn set_loop(&mut self, start: f64, end: f64) -> bool {
        if !(start.is_finite() && end.is_finite() && start < end) {
            debug!(start, end, "rejected loop range");
            return false;
        }
        self.clock.loop_start = start;
        self.clock.loop_end = end;
        self.clock.loop_enabled = true;
        true
    }

    /// Disable looping. Bounds are kept but have no effect.
    pub fn clear_loop(&mut self) {
        self.clock.loop_enabled = false;
    }
}
