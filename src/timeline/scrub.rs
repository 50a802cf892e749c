//! Scrubber drag handling.
//!
//! Dragging the scrubber pauses playback for the length of the drag and
//! restores the previous play state on release.

use std::time::Instant;

use super::Timeline;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scrubber {
    /// `Some(was_playing)` while a drag is in progress.
    drag: Option<bool>,
}

impl Scrubber {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag. A second `begin` without `end` keeps the original state.
    pub fn begin(&mut self, timeline: &mut Timeline) {
        if self.drag.is_none() {
            self.drag = Some(timeline.is_playing());
        }
        timeline.pause();
    }

    /// Seek to the dragged position. Returns the clamped time.
    pub fn drag(&mut self, timeline: &mut Timeline, time: f64) -> f64 {
        timeline.seek(time)
    }

    /// Release the drag, resuming playback if it was playing at `begin`.
    pub fn end(&mut self, timeline: &mut Timeline, now: Instant) {
        if let Some(true) = self.drag.take() {
            timeline.play(now);
        }
    }
}
