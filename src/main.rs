use std::fs::File;
use std::sync::Mutex;
use std::{io, process};

use anyhow::{Context, Result, bail};
use tracing::{Level, error};

use scene_player::{
    app::AppContext, config::PlayerConfig, format::format_time, library::SceneLibrary,
    player::Player,
};

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "scene-player play <scenes.json> [scene-id]";
const LIST_USAGE: &str = "scene-player list <scenes.json>";
const INSPECT_USAGE: &str = "scene-player inspect <scenes.json> <scene-id> <time>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(&path, args.next().as_deref())
        }
        Some("list") => {
            let path = args.next().context(LIST_USAGE)?;
            list(&path)
        }
        Some("inspect") => {
            let path = args.next().context(INSPECT_USAGE)?;
            let id = args.next().context(INSPECT_USAGE)?;
            let time = args.next().context(INSPECT_USAGE)?;
            let time: f64 = time
                .parse()
                .with_context(|| format!("Invalid time '{time}'"))?;
            inspect(&path, &id, time)
        }
        _ => bail!(
            "Scene Player — timed scenes with synced subtitles\n\nUsage:\n  {PLAY_USAGE}\n  {LIST_USAGE}\n  {INSPECT_USAGE}"
        ),
    }
}

/// Logs go to the file in `SCENE_PLAYER_LOG` when set (the player owns the
/// terminal), otherwise warnings and errors go to stderr.
fn init_logging() {
    let builder = tracing_subscriber::fmt().with_target(false);
    let file = std::env::var_os("SCENE_PLAYER_LOG").map(File::create);
    match file {
        Some(Ok(file)) => builder
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Some(Err(e)) => {
            builder
                .with_max_level(Level::WARN)
                .with_writer(io::stderr)
                .init();
            tracing::warn!("cannot open SCENE_PLAYER_LOG ({e}), logging to stderr");
        }
        None => builder
            .with_max_level(Level::WARN)
            .with_writer(io::stderr)
            .init(),
    }
}

fn play(path: &str, scene_id: Option<&str>) -> Result<()> {
    let config = PlayerConfig::load();
    // A broken feed is not fatal: the player starts with nothing loaded.
    let library = SceneLibrary::load(path).unwrap_or_else(|e| {
        error!("{e}");
        SceneLibrary::default()
    });

    let mut ctx = AppContext::new(library);
    let loaded = match scene_id {
        Some(id) => ctx.load_scene(id) || ctx.load_first(),
        None => ctx.load_first(),
    };
    if !loaded {
        tracing::warn!(path, "no scene loaded");
    }

    let mut player = Player::new(ctx, config);
    player.play()
}

fn list(path: &str) -> Result<()> {
    let library = SceneLibrary::load(path)?;
    for scene in library.scenes() {
        println!(
            "{:<16} {:>5}  {}",
            scene.id,
            format_time(scene.duration),
            scene.title
        );
    }
    Ok(())
}

fn inspect(path: &str, id: &str, time: f64) -> Result<()> {
    let library = SceneLibrary::load(path)?;
    let mut ctx = AppContext::new(library);
    if !ctx.load_scene(id) {
        bail!("No scene with id '{id}' in {path}");
    }
    let frame = ctx.seek(time).context("No scene loaded")?;
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}
