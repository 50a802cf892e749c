//! Actor state resolution.
//!
//! Maps an actor and an absolute timeline position to its rendered state by
//! scanning that actor's animation events in start-time order.

use crate::types::{Actor, ActorState, AnimationEvent, AnimationKind};

use super::Resolve;

/// Peak height of a jump, in render units.
pub const JUMP_HEIGHT: f64 = 50.0;

/// Normalized progress of `event` at `time`, clamped to `[0, 1]`.
///
/// Zero, negative or non-finite durations are instant transitions and
/// always report full progress.
pub fn progress(event: &AnimationEvent, time: f64) -> f64 {
    if !(event.duration.is_finite() && event.duration > 0.0) {
        return 1.0;
    }
    ((time - event.time) / event.duration).clamp(0.0, 1.0)
}

/// Parabolic jump arc: zero at both ends, `JUMP_HEIGHT` at `progress == 0.5`.
pub fn jump_arc(progress: f64) -> f64 {
    JUMP_HEIGHT * (4.0 * progress * (1.0 - progress))
}

/// Resolve `actor` at `time` against the scene's full animation list.
///
/// Moves are not chained: every move interpolates from the actor's base `x`
/// to its own `to_x`, and the last started move in time order wins. A move
/// without `to_x` holds the actor at its base position.
pub fn resolve_actor(actor: &Actor, animations: &[AnimationEvent], time: f64) -> ActorState {
    let mut state = ActorState {
        x: actor.x,
        y: actor.y,
        jump_offset: 0.0,
    };

    let mut events: Vec<&AnimationEvent> = animations
        .iter()
        .filter(|a| a.actor_id == actor.id && a.time.is_finite())
        .collect();
    // `sort_by` is stable, so events sharing a start time keep input order.
    events.sort_by(|a, b| a.time.total_cmp(&b.time));

    for event in events {
        if time < event.time {
            continue;
        }
        let p = progress(event, time);
        match event.kind {
            AnimationKind::Move => {
                let to_x = event.to_x.unwrap_or(actor.x);
                state.x = actor.x + (to_x - actor.x) * p;
            }
            AnimationKind::Jump => {
                if time < event.end() {
                    state.jump_offset = jump_arc(p);
                }
            }
        }
    }

    state
}

impl Resolve for Actor {
    type Output = ActorState;

    fn resolve(&self, animations: &[AnimationEvent], time: f64) -> ActorState {
        resolve_actor(self, animations, time)
    }
}
