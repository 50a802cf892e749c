//! Terminal output for the player.
//!
//! Layout, top to bottom: menu bar, stage, subtitle panel, phrase workspace,
//! tooltip, progress bar, status bar.

use std::io;

use anyhow::Result;
use crossterm::{cursor, queue, style, terminal};

use crate::app::AppContext;
use crate::format::format_time;
use crate::timeline::PlaybackClock;
use crate::types::SubtitleFrame;

use super::stage::Stage;

const SUBTITLE_ROWS: u16 = 5;
/// Columns taken by the progress bar's surrounding chrome (margin + time readout).
const BAR_CHROME: u16 = 14;
const BAR_START: u16 = 1;

pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub term_width: u16,
    pub stage_y: u16,
    pub stage_height: u16,
    pub subtitles_y: u16,
    pub workspace_y: u16,
    pub tooltip_y: u16,
    pub progress_y: u16,
    pub status_y: u16,
}

impl Layout {
    pub fn compute(term_width: u16, term_height: u16) -> Self {
        let status_y = term_height.saturating_sub(1);
        let progress_y = status_y.saturating_sub(1);
        let tooltip_y = progress_y.saturating_sub(1);
        let workspace_y = tooltip_y.saturating_sub(1);
        let subtitles_y = workspace_y.saturating_sub(SUBTITLE_ROWS + 1);
        // Row 0 is the menu bar; one separator row sits above the subtitles.
        let stage_height = subtitles_y.saturating_sub(2);
        Layout {
            term_width,
            stage_y: 1,
            stage_height,
            subtitles_y,
            workspace_y,
            tooltip_y,
            progress_y,
            status_y,
        }
    }

    pub fn bar_width(&self) -> u16 {
        self.term_width.saturating_sub(BAR_CHROME)
    }

    /// Scene time under a progress-bar column, or `None` off the bar.
    pub fn time_at_column(&self, column: u16, duration: f64) -> Option<f64> {
        let width = self.bar_width();
        if width == 0 || column < BAR_START || column >= BAR_START + width {
            return None;
        }
        let ratio = (column - BAR_START) as f64 / width as f64;
        Some((ratio * duration).clamp(0.0, duration))
    }

    fn column_at_time(&self, time: f64, duration: f64) -> u16 {
        if duration <= 0.0 {
            return BAR_START;
        }
        self.column_at_fraction(time / duration)
    }

    fn column_at_fraction(&self, fraction: f64) -> u16 {
        let width = self.bar_width();
        if width == 0 {
            return BAR_START;
        }
        let ratio = fraction.clamp(0.0, 1.0);
        BAR_START + ((ratio * width as f64) as u16).min(width - 1)
    }
}

/// Print a menu item string, bolding the key inside `[...]` and dimming the rest.
fn print_menu_item(stdout: &mut io::Stdout, item: &str) -> Result<()> {
    let (key, label) = match (item.find('['), item.rfind(']')) {
        (Some(open), Some(close)) if open < close => (&item[open..=close], &item[close + 1..]),
        _ => ("", item),
    };
    queue!(
        stdout,
        style::SetAttribute(style::Attribute::Bold),
        style::Print(key),
        style::SetAttribute(style::Attribute::Reset),
        style::SetAttribute(style::Attribute::Dim),
        style::Print(label),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

pub fn render_menubar(stdout: &mut io::Stdout) -> Result<()> {
    let items: &[&str] = &[
        "[Space] play",
        "[r] rewind",
        "[←→] seek",
        "[n/p] scene",
        "[[/]] loop",
        "[c] unloop",
        "[h] highlight",
        "[x] rip",
        "[Tab/m] tokens",
        "[w] clear",
        "[q] quit",
    ];
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            queue!(stdout, style::Print("  "))?;
        }
        print_menu_item(stdout, item)?;
    }
    Ok(())
}

pub fn render_stage(stdout: &mut io::Stdout, layout: &Layout, stage: &Stage) -> Result<()> {
    for row in 0..layout.stage_height {
        queue!(
            stdout,
            cursor::MoveTo(0, layout.stage_y + row),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
    }
    // Labels first so overlapping avatars stay visible.
    for actor in stage.placed() {
        let label_row = actor.row + 1;
        if label_row < layout.stage_height {
            let col = actor.col.saturating_sub(actor.label.chars().count() as u16 / 2);
            queue!(
                stdout,
                cursor::MoveTo(col, layout.stage_y + label_row),
                style::SetAttribute(style::Attribute::Dim),
                style::Print(&actor.label),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
    }
    for actor in stage.placed() {
        let cs = style::ContentStyle {
            background_color: Some(actor.color),
            foreground_color: Some(style::Color::Black),
            ..Default::default()
        };
        queue!(
            stdout,
            cursor::MoveTo(actor.col, layout.stage_y + actor.row),
            style::PrintStyledContent(style::StyledContent::new(cs, actor.avatar)),
        )?;
    }
    queue!(
        stdout,
        cursor::MoveTo(0, layout.subtitles_y.saturating_sub(1)),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::SetAttribute(style::Attribute::Dim),
        style::Print("─".repeat(layout.term_width as usize)),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

/// Window of subtitle lines to show, centred on the active one.
pub fn subtitle_window(subtitles: &[SubtitleFrame], rows: usize) -> &[SubtitleFrame] {
    if subtitles.len() <= rows {
        return subtitles;
    }
    let active = subtitles.iter().position(|s| s.is_active).unwrap_or(0);
    let start = active
        .saturating_sub(rows / 2)
        .min(subtitles.len() - rows);
    &subtitles[start..start + rows]
}

pub fn render_subtitles(stdout: &mut io::Stdout, layout: &Layout, stage: &Stage) -> Result<()> {
    let lines = subtitle_window(stage.subtitles(), SUBTITLE_ROWS as usize);
    for row in 0..SUBTITLE_ROWS {
        queue!(
            stdout,
            cursor::MoveTo(0, layout.subtitles_y + row),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
        let Some(line) = lines.get(row as usize) else { continue };
        let mut cs = style::ContentStyle::default();
        if line.is_active {
            cs.attributes.set(style::Attribute::Reverse);
            cs.attributes.set(style::Attribute::Bold);
        } else {
            cs.attributes.set(style::Attribute::Dim);
        }
        queue!(
            stdout,
            style::Print(" "),
            style::PrintStyledContent(style::StyledContent::new(cs, format!(" {} ", line.text))),
        )?;
    }
    Ok(())
}

pub fn render_workspace(
    stdout: &mut io::Stdout,
    layout: &Layout,
    ctx: &AppContext,
    selected: Option<usize>,
) -> Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, layout.workspace_y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" Phrase: "),
    )?;
    let tokens = ctx.workspace.tokens();
    if tokens.is_empty() {
        queue!(
            stdout,
            style::SetAttribute(style::Attribute::Dim),
            style::Print("rip a subtitle to build a phrase"),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    for (i, token) in tokens.iter().enumerate() {
        let mut cs = style::ContentStyle::default();
        if selected == Some(i) {
            cs.attributes.set(style::Attribute::Reverse);
        }
        queue!(
            stdout,
            style::PrintStyledContent(style::StyledContent::new(cs, &token.token.hanzi)),
            style::Print(" "),
        )?;
    }

    queue!(
        stdout,
        cursor::MoveTo(0, layout.tooltip_y),
        terminal::Clear(terminal::ClearType::CurrentLine),
    )?;
    let tooltip = selected
        .and_then(|i| tokens.get(i))
        .and_then(|t| ctx.workspace.tooltip(&t.id));
    if let Some(tip) = tooltip {
        queue!(
            stdout,
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!("   {}  {}", tip.pinyin, tip.meaning)),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}

pub fn render_progress(
    stdout: &mut io::Stdout,
    layout: &Layout,
    clock: &PlaybackClock,
) -> Result<()> {
    let width = layout.bar_width() as usize;
    let filled = layout.column_at_fraction(clock.fraction()) - BAR_START;
    let mut bar: Vec<char> = (0..width)
        .map(|i| if i < filled as usize { '━' } else { '─' })
        .collect();
    if clock.loop_enabled && width > 0 {
        let start = (layout.column_at_time(clock.loop_start, clock.duration) - BAR_START) as usize;
        let end = (layout.column_at_time(clock.loop_end, clock.duration) - BAR_START) as usize;
        bar[start.min(width - 1)] = '[';
        bar[end.min(width - 1)] = ']';
    }
    if width > 0 {
        bar[(filled as usize).min(width - 1)] = '●';
    }
    let bar: String = bar.into_iter().collect();

    queue!(
        stdout,
        cursor::MoveTo(0, layout.progress_y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        cursor::MoveTo(BAR_START, layout.progress_y),
        style::Print(bar),
        style::Print(format!(
            " {}/{}",
            format_time(clock.current_time),
            format_time(clock.duration)
        )),
    )?;
    Ok(())
}

pub fn render_status(
    stdout: &mut io::Stdout,
    layout: &Layout,
    ctx: &AppContext,
    message: Option<&str>,
) -> Result<()> {
    let clock = ctx.timeline.clock();
    let scene = ctx
        .scene()
        .map_or_else(|| "no scene loaded".to_string(), |s| s.title.clone());
    let state = if clock.is_playing { "PLAYING" } else { "PAUSED" };
    let looping = if clock.loop_enabled {
        format!(" | loop {}-{}", format_time(clock.loop_start), format_time(clock.loop_end))
    } else {
        String::new()
    };
    let highlight = if ctx.subtitles.highlight_enabled { "" } else { " | highlight off" };
    let status = format!(
        " {state} | {scene}{looping}{highlight} {}",
        message.unwrap_or("")
    );

    let mut cs = style::ContentStyle::default();
    cs.attributes.set(style::Attribute::Dim);
    queue!(
        stdout,
        cursor::MoveTo(0, layout.status_y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::PrintStyledContent(style::StyledContent::new(cs, status)),
    )?;
    Ok(())
}
