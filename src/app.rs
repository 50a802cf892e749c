//! Application context.
//!
//! Everything one running player owns: the scene library, the active scene,
//! its timeline and the phrase workspace. Nothing here is global, so tests can
//! run any number of independent contexts side by side.

use std::time::Instant;

use tracing::{debug, info};

use crate::engine::Engine;
use crate::engine::subtitles::SubtitleSync;
use crate::library::SceneLibrary;
use crate::timeline::Timeline;
use crate::timeline::scrub::Scrubber;
use crate::types::{ResolvedFrame, Scene};
use crate::workspace::Workspace;

#[derive(Debug, Clone)]
pub struct AppContext {
    library: SceneLibrary,
    active: Option<usize>,
    pub timeline: Timeline,
    pub scrubber: Scrubber,
    pub subtitles: SubtitleSync,
    pub workspace: Workspace,
}

impl AppContext {
    /// Create a context with no scene loaded.
    pub fn new(library: SceneLibrary) -> Self {
        AppContext {
            library,
            active: None,
            timeline: Timeline::new(0.0),
            scrubber: Scrubber::default(),
            subtitles: SubtitleSync::default(),
            workspace: Workspace::new(),
        }
    }

    pub fn library(&self) -> &SceneLibrary {
        &self.library
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.active.and_then(|i| self.library.scenes().get(i))
    }

    /// Switch to scene `id`, resetting the timeline and workspace.
    /// Unknown ids are ignored and leave the current scene untouched.
    pub fn load_scene(&mut self, id: &str) -> bool {
        let Some(index) = self.library.position(id) else {
            debug!(id, "ignoring unknown scene id");
            return false;
        };
        self.load_index(index);
        true
    }

    pub fn load_first(&mut self) -> bool {
        if self.library.is_empty() {
            return false;
        }
        self.load_index(0);
        true
    }

    /// Cycle forward through the library, wrapping at the end.
    pub fn next_scene(&mut self) -> bool {
        self.step_scene(1)
    }

    pub fn prev_scene(&mut self) -> bool {
        self.step_scene(-1)
    }

    fn step_scene(&mut self, step: isize) -> bool {
        let len = self.library.len() as isize;
        if len == 0 {
            return false;
        }
        let index = match self.active {
            Some(i) => (i as isize + step).rem_euclid(len) as usize,
            None if step > 0 => 0,
            None => (len - 1) as usize,
        };
        self.load_index(index);
        true
    }

    fn load_index(&mut self, index: usize) {
        let scene = &self.library.scenes()[index];
        info!(id = %scene.id, title = %scene.title, duration = scene.duration, "loading scene");
        self.timeline.load(scene.duration);
        self.scrubber = Scrubber::default();
        self.workspace.clear();
        self.active = Some(index);
    }

    /// Resolve the active scene at the timeline's current time.
    pub fn resolve(&self) -> Option<ResolvedFrame> {
        self.resolve_at(self.timeline.current_time())
    }

    pub fn resolve_at(&self, time: f64) -> Option<ResolvedFrame> {
        self.scene()
            .map(|scene| Engine::resolve_frame(scene, time, &self.subtitles))
    }

    /// Seek and resolve immediately, without waiting for the next tick.
    pub fn seek(&mut self, time: f64) -> Option<ResolvedFrame> {
        self.timeline.seek(time);
        self.resolve()
    }

    pub fn rewind(&mut self, seconds: f64) -> Option<ResolvedFrame> {
        self.timeline.rewind(seconds);
        self.resolve()
    }

    pub fn toggle_play(&mut self, now: Instant) {
        if self.scene().is_some() {
            self.timeline.toggle_play(now);
        }
    }

    pub fn begin_scrub(&mut self) {
        self.scrubber.begin(&mut self.timeline);
    }

    pub fn scrub_to(&mut self, time: f64) -> Option<ResolvedFrame> {
        self.scrubber.drag(&mut self.timeline, time);
        self.resolve()
    }

    pub fn end_scrub(&mut self, now: Instant) {
        self.scrubber.end(&mut self.timeline, now);
    }

    /// Rip the subtitle currently active into the workspace.
    /// Returns the number of tokens added.
    pub fn rip_active_subtitle(&mut self) -> usize {
        let Some(scene) = self.active.and_then(|i| self.library.scenes().get(i)) else {
            return 0;
        };
        let time = self.timeline.current_time();
        match crate::engine::subtitles::active_index(&scene.subtitles, time) {
            Some(i) => self.workspace.rip(&scene.subtitles[i]),
            None => 0,
        }
    }
}
