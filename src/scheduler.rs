//! Frame scheduling.
//!
//! The host loop owns the wall clock and calls [`FrameScheduler::run_frame`]
//! once per rendered frame. Each call ticks the timeline, resolves the scene
//! at the new time and pushes the result into a [`RenderSink`], all
//! synchronously. Nothing here knows about terminals, so the whole pipeline
//! can be driven headless with fabricated instants.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::AppContext;
use crate::timeline::TickOutcome;
use crate::types::{ActorFrame, ResolvedFrame, SubtitleFrame};

/// Consumer of resolved frames.
pub trait RenderSink {
    /// Apply one actor's state. Returns `false` when the sink has no render
    /// target for that actor; the actor is skipped and the rest still apply.
    fn apply_actor(&mut self, frame: &ActorFrame) -> bool;

    fn apply_subtitle(&mut self, frame: &SubtitleFrame);
}

/// Result of one scheduled frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub outcome: TickOutcome,
    /// `None` when no scene is loaded.
    pub frame: Option<ResolvedFrame>,
    /// Actors the sink had no target for.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    frames: u64,
}

impl FrameScheduler {
    /// Scheduler targeting `frame_rate` frames per second (minimum 1).
    pub fn new(frame_rate: u32) -> Self {
        FrameScheduler {
            interval: Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// How long the host may wait for input before the next frame is due.
    pub fn time_until_next(&self, frame_started: Instant, now: Instant) -> Duration {
        (frame_started + self.interval).saturating_duration_since(now)
    }

    /// Tick, resolve and present one frame.
    pub fn run_frame<S: RenderSink>(
        &mut self,
        ctx: &mut AppContext,
        now: Instant,
        sink: &mut S,
    ) -> FrameReport {
        self.frames += 1;
        let outcome = ctx.timeline.tick(now);
        let frame = ctx.resolve();
        let skipped = frame.as_ref().map_or(0, |f| present(f, sink));
        FrameReport {
            outcome,
            frame,
            skipped,
        }
    }
}

/// Push a resolved frame into `sink`. Returns how many actors were skipped.
pub fn present<S: RenderSink>(frame: &ResolvedFrame, sink: &mut S) -> usize {
    let mut skipped = 0;
    for actor in &frame.actors {
        if !sink.apply_actor(actor) {
            debug!(actor = %actor.actor_id, "no render target for actor");
            skipped += 1;
        }
    }
    for subtitle in &frame.subtitles {
        sink.apply_subtitle(subtitle);
    }
    skipped
}
