//! Subtitle synchronization against playback time.

use crate::types::{Subtitle, SubtitleFrame};

/// How long the last subtitle stays active, in seconds.
pub const LAST_SUBTITLE_HOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleSync {
    pub highlight_enabled: bool,
}

impl Default for SubtitleSync {
    fn default() -> Self {
        SubtitleSync {
            highlight_enabled: true,
        }
    }
}

impl SubtitleSync {
    pub fn new(highlight_enabled: bool) -> Self {
        SubtitleSync { highlight_enabled }
    }

    pub fn toggle_highlight(&mut self) {
        self.highlight_enabled = !self.highlight_enabled;
    }

    /// Index of the subtitle active at `time`, or `None` when highlighting is off.
    pub fn active_index(&self, subtitles: &[Subtitle], time: f64) -> Option<usize> {
        if !self.highlight_enabled {
            return None;
        }
        active_index(subtitles, time)
    }

    pub fn frames(&self, subtitles: &[Subtitle], time: f64) -> Vec<SubtitleFrame> {
        let active = self.active_index(subtitles, time);
        subtitles
            .iter()
            .enumerate()
            .map(|(index, sub)| SubtitleFrame {
                index,
                text: sub.text.clone(),
                is_active: active == Some(index),
            })
            .collect()
    }
}

/// A subtitle covers `[t, next.t)`, or `[t, t + LAST_SUBTITLE_HOLD)` when last.
/// The first matching line wins, so at most one is ever active.
pub fn active_index(subtitles: &[Subtitle], time: f64) -> Option<usize> {
    subtitles.iter().enumerate().position(|(i, sub)| {
        let end = subtitles
            .get(i + 1)
            .map_or(sub.t + LAST_SUBTITLE_HOLD, |next| next.t);
        time >= sub.t && time < end
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(t: f64, text: &str) -> Subtitle {
        Subtitle {
            t,
            text: text.into(),
            tokens: None,
        }
    }

    #[test]
    fn boundary_hands_over_to_next_line() {
        let subs = vec![sub(0.0, "你好"), sub(5.0, "再见")];
        assert_eq!(active_index(&subs, 4.9), Some(0));
        assert_eq!(active_index(&subs, 5.0), Some(1));
    }

    #[test]
    fn last_line_holds_for_three_seconds() {
        let subs = vec![sub(0.0, "a"), sub(5.0, "b")];
        assert_eq!(active_index(&subs, 7.99), Some(1));
        assert_eq!(active_index(&subs, 8.0), None);
    }

    #[test]
    fn nothing_active_before_first_line() {
        let subs = vec![sub(1.0, "a")];
        assert_eq!(active_index(&subs, 0.5), None);
        assert_eq!(active_index(&[], 0.5), None);
    }

    #[test]
    fn disabled_highlight_marks_nothing() {
        let subs = vec![sub(0.0, "a"), sub(5.0, "b")];
        let sync = SubtitleSync::new(false);
        assert_eq!(sync.active_index(&subs, 1.0), None);
        assert!(sync.frames(&subs, 1.0).iter().all(|f| !f.is_active));
    }

    #[test]
    fn frames_flag_exactly_one_line() {
        let subs = vec![sub(0.0, "a"), sub(2.0, "b"), sub(4.0, "c")];
        let frames = SubtitleSync::default().frames(&subs, 2.5);
        let active: Vec<_> = frames.iter().filter(|f| f.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "b");
    }

    #[test]
    fn toggle_flips_highlight() {
        let mut sync = SubtitleSync::default();
        sync.toggle_highlight();
        assert!(!sync.highlight_enabled);
        sync.toggle_highlight();
        assert!(sync.highlight_enabled);
    }
}
