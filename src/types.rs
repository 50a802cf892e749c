//! Shared boundary types for the scene player.
//!
//! This module defines the two key data contracts:
//! - Scene feed → Engine (file): `Scene` with its actors, animations and subtitles
//! - Engine → Render sink (in-memory): `ResolvedFrame` containing per-actor state

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scene feed boundary (deserialized from the scene file)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    /// Total length in seconds.
    pub duration: f64,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub animations: Vec<AnimationEvent>,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

impl Scene {
    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }
}

/// A visual entity. `x`/`y` are percentage-space base coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub x: f64,
    pub y: f64,
}

impl Actor {
    /// First letter of the name, used as the on-stage avatar.
    pub fn avatar(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Move,
    Jump,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationEvent {
    pub actor_id: String,
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// Start time in seconds.
    pub time: f64,
    /// Missing durations deserialize as 0, i.e. an instant transition.
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_x: Option<f64>,
}

impl AnimationEvent {
    pub fn end(&self) -> f64 {
        self.time + self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Start time in seconds.
    pub t: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
}

/// A vocabulary token inside a subtitle line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub hanzi: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub meaning: String,
}

// ---------------------------------------------------------------------------
// Engine → Render sink boundary (in-memory, serialized only by `inspect`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorState {
    pub x: f64,
    pub y: f64,
    pub jump_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorFrame {
    pub actor_id: String,
    #[serde(flatten)]
    pub state: ActorState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleFrame {
    pub index: usize,
    pub text: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFrame {
    pub time: f64,
    pub actors: Vec<ActorFrame>,
    pub subtitles: Vec<SubtitleFrame>,
}

impl ResolvedFrame {
    pub fn active_subtitle(&self) -> Option<&SubtitleFrame> {
        self.subtitles.iter().find(|s| s.is_active)
    }
}
