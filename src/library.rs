//! Scene library — the static scene feed.
//!
//! The feed is a JSON array of scene records, loaded once at startup and
//! never mutated afterwards.

use std::path::Path;

use tracing::info;

use crate::error::SceneError;
use crate::types::Scene;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLibrary {
    scenes: Vec<Scene>,
}

impl SceneLibrary {
    /// Build a library, rejecting duplicate ids and unusable durations.
    pub fn new(scenes: Vec<Scene>) -> Result<Self, SceneError> {
        for (i, scene) in scenes.iter().enumerate() {
            if !(scene.duration.is_finite() && scene.duration >= 0.0) {
                return Err(SceneError::InvalidDuration {
                    id: scene.id.clone(),
                    duration: scene.duration,
                });
            }
            if scenes[..i].iter().any(|s| s.id == scene.id) {
                return Err(SceneError::DuplicateId(scene.id.clone()));
            }
        }
        Ok(SceneLibrary { scenes })
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scenes: Vec<Scene> = serde_json::from_str(json)?;
        Self::new(scenes)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenes: Vec<Scene> =
            serde_json::from_str(&json).map_err(|source| SceneError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let library = Self::new(scenes)?;
        info!(path = %path.display(), scenes = library.len(), "loaded scene library");
        Ok(library)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SCENES: &str = r#"[
        {"id": "a", "title": "First", "duration": 10},
        {"id": "b", "title": "Second", "duration": 4.5,
         "actors": [{"id": "x", "name": "Xiao", "color": "red", "x": 5, "y": 50}],
         "animations": [{"actorId": "x", "type": "move", "time": 0, "duration": 2, "toX": 40}],
         "subtitles": [{"t": 0, "text": "好", "tokens": [{"hanzi": "好", "pinyin": "hǎo", "meaning": "good"}]}]}
    ]"#;

    #[test]
    fn parses_scene_feed_shape() {
        let lib = SceneLibrary::from_json(TWO_SCENES).unwrap();
        assert_eq!(lib.len(), 2);
        assert!(lib.get("a").unwrap().actors.is_empty());

        let b = lib.get("b").unwrap();
        assert_eq!(b.animations[0].to_x, Some(40.0));
        assert_eq!(b.animations[0].actor_id, "x");
        let tokens = b.subtitles[0].tokens.as_ref().unwrap();
        assert_eq!(tokens[0].pinyin, "hǎo");
    }

    #[test]
    fn missing_duration_on_event_defaults_to_zero() {
        let json = r#"[{"id": "a", "title": "A", "duration": 3,
            "animations": [{"actorId": "x", "type": "jump", "time": 1}]}]"#;
        let lib = SceneLibrary::from_json(json).unwrap();
        assert_eq!(lib.get("a").unwrap().animations[0].duration, 0.0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"[{"id": "a", "title": "A", "duration": 1},
                       {"id": "a", "title": "B", "duration": 2}]"#;
        let err = SceneLibrary::from_json(json).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn rejects_negative_duration() {
        let json = r#"[{"id": "a", "title": "A", "duration": -1}]"#;
        assert!(matches!(
            SceneLibrary::from_json(json),
            Err(SceneError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn unknown_animation_type_is_a_parse_error() {
        let json = r#"[{"id": "a", "title": "A", "duration": 1,
            "animations": [{"actorId": "x", "type": "spin", "time": 0}]}]"#;
        assert!(matches!(SceneLibrary::from_json(json), Err(SceneError::Json(_))));
    }

    #[test]
    fn lookup_helpers() {
        let lib = SceneLibrary::from_json(TWO_SCENES).unwrap();
        assert_eq!(lib.position("b"), Some(1));
        assert_eq!(lib.scenes()[0].id, "a");
        assert!(lib.get("zzz").is_none());
        assert!(SceneLibrary::default().is_empty());
    }
}
