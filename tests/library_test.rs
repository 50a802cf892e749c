//! Tests for loading the scene feed from disk.

use std::fs;

use scene_player::app::AppContext;
use scene_player::error::SceneError;
use scene_player::library::SceneLibrary;
use tempfile::TempDir;

const FEED: &str = r##"[
  {
    "id": "market",
    "title": "At the market",
    "duration": 20,
    "actors": [
      {"id": "seller", "name": "Seller", "color": "#e67e22", "x": 70, "y": 60},
      {"id": "buyer", "name": "Buyer", "color": "#3498db", "x": 10, "y": 60}
    ],
    "animations": [
      {"actorId": "buyer", "type": "move", "time": 1, "duration": 4, "toX": 50},
      {"actorId": "seller", "type": "jump", "time": 6, "duration": 1}
    ],
    "subtitles": [
      {"t": 1, "text": "你好！", "tokens": [{"hanzi": "你好", "pinyin": "nǐ hǎo", "meaning": "hello"}]},
      {"t": 6, "text": "多少钱？"}
    ]
  },
  {"id": "empty", "title": "Empty stage", "duration": 5}
]"##;

fn write_feed(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenes.json");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn load_reads_every_scene() {
    let (_dir, path) = write_feed(FEED);
    let library = SceneLibrary::load(&path).unwrap();

    assert_eq!(library.len(), 2);
    let market = library.get("market").unwrap();
    assert_eq!(market.actors.len(), 2);
    assert_eq!(market.animations.len(), 2);
    assert!(market.subtitles[1].tokens.is_none());
}

#[test]
fn missing_file_is_read_error_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");
    let err = SceneLibrary::load(&path).unwrap_err();

    assert!(matches!(err, SceneError::Read { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn malformed_file_is_parse_error_with_path() {
    let (_dir, path) = write_feed("[{\"id\": \"x\"");
    let err = SceneLibrary::load(&path).unwrap_err();

    assert!(matches!(err, SceneError::Parse { .. }));
    assert!(err.to_string().contains("scenes.json"));
}

#[test]
fn failed_feed_leaves_player_without_scene() {
    let (_dir, path) = write_feed("not json");
    let library = SceneLibrary::load(&path).unwrap_or_default();
    let mut ctx = AppContext::new(library);

    assert!(!ctx.load_first());
    assert!(ctx.scene().is_none());
    assert!(ctx.seek(3.0).is_none());
}

#[test]
fn scene_switch_replaces_state_wholesale() {
    let (_dir, path) = write_feed(FEED);
    let mut ctx = AppContext::new(SceneLibrary::load(&path).unwrap());

    ctx.load_scene("market");
    ctx.seek(7.0);
    assert_eq!(ctx.rip_active_subtitle(), 4);

    assert!(ctx.load_scene("empty"));
    assert_eq!(ctx.timeline.current_time(), 0.0);
    assert_eq!(ctx.timeline.duration(), 5.0);
    assert!(ctx.workspace.is_empty());
    assert!(ctx.resolve().unwrap().actors.is_empty());
}
