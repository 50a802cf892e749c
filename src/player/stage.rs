//! Stage — maps resolved actor state onto terminal cells.
//!
//! Actor coordinates are percentages of the stage; the jump offset lifts the
//! avatar by one row per `JUMP_UNITS_PER_ROW` units.

use std::collections::HashMap;

use crossterm::style::Color;

use crate::scheduler::RenderSink;
use crate::types::{ActorFrame, ActorState, Scene, SubtitleFrame};

const JUMP_UNITS_PER_ROW: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
struct Sprite {
    avatar: char,
    name: String,
    color: Color,
}

/// One actor placed on the stage grid for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub col: u16,
    pub row: u16,
    pub avatar: char,
    pub label: String,
    pub color: Color,
}

#[derive(Debug, Default)]
pub struct Stage {
    width: u16,
    height: u16,
    sprites: HashMap<String, Sprite>,
    placed: Vec<Placed>,
    subtitles: Vec<SubtitleFrame>,
}

impl Stage {
    pub fn new(width: u16, height: u16) -> Self {
        Stage {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Rebuild render targets for a newly loaded scene.
    pub fn load(&mut self, scene: Option<&Scene>) {
        self.sprites.clear();
        self.clear_frame();
        let Some(scene) = scene else { return };
        for actor in &scene.actors {
            self.sprites.insert(
                actor.id.clone(),
                Sprite {
                    avatar: actor.avatar(),
                    name: actor.name.clone(),
                    color: parse_color(&actor.color),
                },
            );
        }
    }

    pub fn clear_frame(&mut self) {
        self.placed.clear();
        self.subtitles.clear();
    }

    pub fn placed(&self) -> &[Placed] {
        &self.placed
    }

    pub fn subtitles(&self) -> &[SubtitleFrame] {
        &self.subtitles
    }

    /// Grid cell for an actor state, clamped to the stage.
    pub fn cell_for(&self, state: &ActorState) -> (u16, u16) {
        let max_col = self.width.saturating_sub(1) as f64;
        let max_row = self.height.saturating_sub(1) as f64;
        let col = (state.x / 100.0 * max_col).round().clamp(0.0, max_col);
        let lift = (state.jump_offset / JUMP_UNITS_PER_ROW).round();
        let row = (state.y / 100.0 * max_row - lift).round().clamp(0.0, max_row);
        (col as u16, row as u16)
    }
}

impl RenderSink for Stage {
    fn apply_actor(&mut self, frame: &ActorFrame) -> bool {
        let Some(sprite) = self.sprites.get(&frame.actor_id) else {
            return false;
        };
        let (col, row) = self.cell_for(&frame.state);
        self.placed.push(Placed {
            col,
            row,
            avatar: sprite.avatar,
            label: sprite.name.clone(),
            color: sprite.color,
        });
        true
    }

    fn apply_subtitle(&mut self, frame: &SubtitleFrame) {
        self.subtitles.push(frame.clone());
    }
}

/// Parse a scene color: `#rrggbb`, `#rgb`, or a basic color name.
/// Anything else renders white.
pub fn parse_color(s: &str) -> Color {
    if let Some(hex) = s.strip_prefix('#') {
        let parsed = match hex.len() {
            6 => u32::from_str_radix(hex, 16)
                .ok()
                .map(|v| ((v >> 16) as u8, (v >> 8) as u8, v as u8)),
            3 => u16::from_str_radix(hex, 16).ok().map(|v| {
                let expand = |n: u16| (n as u8 & 0xf) * 0x11;
                (expand(v >> 8), expand(v >> 4), expand(v))
            }),
            _ => None,
        };
        return parsed.map_or(Color::White, |(r, g, b)| Color::Rgb { r, g, b });
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Grey,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Actor;

    fn scene() -> Scene {
        Scene {
            id: "s".into(),
            title: "S".into(),
            duration: 5.0,
            actors: vec![Actor {
                id: "li".into(),
                name: "Li".into(),
                color: "#ff8000".into(),
                x: 0.0,
                y: 0.0,
            }],
            animations: Vec::new(),
            subtitles: Vec::new(),
        }
    }

    fn frame(id: &str, x: f64, y: f64, jump_offset: f64) -> ActorFrame {
        ActorFrame {
            actor_id: id.into(),
            state: ActorState { x, y, jump_offset },
        }
    }

    #[test]
    fn percent_space_maps_to_grid_corners() {
        let stage = Stage::new(101, 11);
        let at = |x, y| stage.cell_for(&ActorState { x, y, jump_offset: 0.0 });
        assert_eq!(at(0.0, 0.0), (0, 0));
        assert_eq!(at(100.0, 100.0), (100, 10));
        assert_eq!(at(50.0, 50.0), (50, 5));
        assert_eq!(at(150.0, -20.0), (100, 0));
    }

    #[test]
    fn jump_lifts_avatar() {
        let stage = Stage::new(101, 21);
        let (_, grounded) = stage.cell_for(&ActorState { x: 0.0, y: 100.0, jump_offset: 0.0 });
        let (_, peak) = stage.cell_for(&ActorState { x: 0.0, y: 100.0, jump_offset: 50.0 });
        assert_eq!(grounded - peak, 5);
    }

    #[test]
    fn missing_target_is_skipped() {
        let mut stage = Stage::new(80, 20);
        stage.load(Some(&scene()));
        assert!(stage.apply_actor(&frame("li", 50.0, 50.0, 0.0)));
        assert!(!stage.apply_actor(&frame("ghost", 50.0, 50.0, 0.0)));
        assert_eq!(stage.placed().len(), 1);
        assert_eq!(stage.placed()[0].avatar, 'L');
        assert_eq!(stage.placed()[0].color, Color::Rgb { r: 255, g: 128, b: 0 });
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#fff"), Color::Rgb { r: 255, g: 255, b: 255 });
        assert_eq!(parse_color("#123"), Color::Rgb { r: 0x11, g: 0x22, b: 0x33 });
        assert_eq!(parse_color("Blue"), Color::Blue);
        assert_eq!(parse_color("#zzzzzz"), Color::White);
        assert_eq!(parse_color(""), Color::White);
    }
}
