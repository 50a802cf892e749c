//! Engine — the scene state resolver.
//!
//! Turns a `Scene` and an absolute time into a `ResolvedFrame`: the rendered
//! state of every actor plus the subtitle highlight.
//!
//! The engine is a pure function of its inputs. It never deals with clocks,
//! terminals or input; seeking backwards is just resolving an earlier time.

pub mod animation;
pub mod subtitles;

use crate::types::{ActorFrame, ActorState, AnimationEvent, ResolvedFrame, Scene};
use subtitles::SubtitleSync;

/// Resolve an entity against a scene's animation list at a given time.
pub trait Resolve {
    type Output;

    fn resolve(&self, animations: &[AnimationEvent], time: f64) -> Self::Output;
}

pub struct Engine;

impl Engine {
    /// Resolve one actor by id. Returns `None` if the scene has no such actor.
    pub fn resolve(scene: &Scene, actor_id: &str, time: f64) -> Option<ActorState> {
        scene
            .actor(actor_id)
            .map(|actor| actor.resolve(&scene.animations, time))
    }

    /// Resolve every actor and subtitle of `scene` at `time`.
    pub fn resolve_frame(scene: &Scene, time: f64, sync: &SubtitleSync) -> ResolvedFrame {
        let actors = scene
            .actors
            .iter()
            .map(|actor| ActorFrame {
                actor_id: actor.id.clone(),
                state: actor.resolve(&scene.animations, time),
            })
            .collect();

        ResolvedFrame {
            time,
            actors,
            subtitles: sync.frames(&scene.subtitles, time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Actor, AnimationKind, Subtitle};

    fn scene() -> Scene {
        Scene {
            id: "cafe".into(),
            title: "At the café".into(),
            duration: 12.0,
            actors: vec![
                Actor {
                    id: "li".into(),
                    name: "Li".into(),
                    color: "red".into(),
                    x: 10.0,
                    y: 60.0,
                },
                Actor {
                    id: "wang".into(),
                    name: "Wang".into(),
                    color: "blue".into(),
                    x: 80.0,
                    y: 60.0,
                },
            ],
            animations: vec![AnimationEvent {
                actor_id: "li".into(),
                kind: AnimationKind::Move,
                time: 0.0,
                duration: 4.0,
                to_x: Some(50.0),
            }],
            subtitles: vec![Subtitle {
                t: 1.0,
                text: "你好".into(),
                tokens: None,
            }],
        }
    }

    #[test]
    fn resolve_by_id() {
        let s = scene();
        assert_eq!(Engine::resolve(&s, "li", 2.0).map(|a| a.x), Some(30.0));
        assert_eq!(Engine::resolve(&s, "wang", 2.0).map(|a| a.x), Some(80.0));
        assert_eq!(Engine::resolve(&s, "nobody", 2.0), None);
    }

    #[test]
    fn frame_covers_all_actors_and_subtitles() {
        let s = scene();
        let frame = Engine::resolve_frame(&s, 2.0, &SubtitleSync::default());
        assert_eq!(frame.time, 2.0);
        assert_eq!(frame.actors.len(), 2);
        assert_eq!(frame.actors[0].actor_id, "li");
        assert_eq!(frame.active_subtitle().map(|f| f.index), Some(0));
    }
}
