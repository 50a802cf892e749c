//! Player — the interactive terminal front-end.
//!
//! Owns an `AppContext` and drives it from a frame loop: every frame the
//! scheduler ticks the timeline and resolves the scene into the `Stage`, then
//! the stage is drawn. Input is polled between frames.

mod render;
pub mod stage;

use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Result, bail};
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, terminal};
use tracing::{debug, info};

use crate::app::AppContext;
use crate::config::{PlayerConfig, matches_binding};
use crate::format::format_time;
use crate::scheduler::{FrameScheduler, present};
use crate::timeline::TickOutcome;
use crate::types::ResolvedFrame;

use render::Layout;
use stage::Stage;

enum Flow {
    Continue,
    /// Time or scene changed; show it without waiting for the next tick.
    Redraw(Option<ResolvedFrame>),
    Quit,
}

pub struct Player {
    ctx: AppContext,
    config: PlayerConfig,
    scheduler: FrameScheduler,
    stage: Stage,
    layout: Layout,
    loop_mark: Option<f64>,
    selected_token: Option<usize>,
    message: Option<String>,
}

impl Player {
    pub fn new(mut ctx: AppContext, config: PlayerConfig) -> Self {
        ctx.subtitles.highlight_enabled = config.highlight_subtitles;
        let layout = Layout::compute(80, 24);
        let mut stage = Stage::new(layout.term_width, layout.stage_height);
        stage.load(ctx.scene());
        Player {
            scheduler: FrameScheduler::new(config.frame_rate),
            ctx,
            config,
            stage,
            layout,
            loop_mark: None,
            selected_token: None,
            message: None,
        }
    }

    /// Play in the terminal.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < render::MIN_WIDTH || term_h < render::MIN_HEIGHT {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                render::MIN_WIDTH,
                render::MIN_HEIGHT,
                term_w,
                term_h,
            );
        }
        self.resize(term_w, term_h);

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        info!(frames = self.scheduler.frames(), "player exited");
        result
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        render::render_menubar(stdout)?;

        loop {
            let frame_started = Instant::now();
            self.stage.clear_frame();
            let report = self
                .scheduler
                .run_frame(&mut self.ctx, frame_started, &mut self.stage);
            if report.outcome == TickOutcome::Ended {
                self.message = Some("end of scene".into());
            }
            self.draw(stdout)?;

            let wait = self.scheduler.time_until_next(frame_started, Instant::now());
            if !event::poll(wait)? {
                continue;
            }
            match self.handle_event(event::read()?) {
                Flow::Continue => {}
                Flow::Redraw(frame) => {
                    self.stage.clear_frame();
                    if let Some(frame) = frame {
                        present(&frame, &mut self.stage);
                    }
                    self.draw(stdout)?;
                }
                Flow::Quit => break,
            }
        }

        Ok(())
    }

    fn draw(&self, stdout: &mut io::Stdout) -> Result<()> {
        render::render_stage(stdout, &self.layout, &self.stage)?;
        render::render_subtitles(stdout, &self.layout, &self.stage)?;
        render::render_workspace(stdout, &self.layout, &self.ctx, self.selected_token)?;
        render::render_progress(stdout, &self.layout, self.ctx.timeline.clock())?;
        render::render_status(stdout, &self.layout, &self.ctx, self.message.as_deref())?;
        stdout.flush()?;
        Ok(())
    }

    fn resize(&mut self, term_w: u16, term_h: u16) {
        self.layout = Layout::compute(term_w, term_h);
        self.stage.resize(term_w, self.layout.stage_height);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => {
                self.resize(w, h);
                let mut stdout = io::stdout();
                let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
                let _ = render::render_menubar(&mut stdout);
                Flow::Redraw(self.ctx.resolve())
            }
            _ => Flow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let bindings = &self.config.key_bindings;
        let now = Instant::now();

        if matches_binding(&bindings.quit, &key) {
            return Flow::Quit;
        }
        if matches_binding(&bindings.play_pause, &key) {
            self.ctx.toggle_play(now);
            self.message = None;
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.rewind, &key) {
            return Flow::Redraw(self.ctx.rewind(self.config.rewind_seconds));
        }
        if matches_binding(&bindings.seek_back, &key) {
            let target = self.ctx.timeline.current_time() - self.config.seek_step;
            return Flow::Redraw(self.ctx.seek(target));
        }
        if matches_binding(&bindings.seek_forward, &key) {
            let target = self.ctx.timeline.current_time() + self.config.seek_step;
            return Flow::Redraw(self.ctx.seek(target));
        }
        if matches_binding(&bindings.next_scene, &key) {
            self.ctx.next_scene();
            return self.scene_changed();
        }
        if matches_binding(&bindings.prev_scene, &key) {
            self.ctx.prev_scene();
            return self.scene_changed();
        }
        if matches_binding(&bindings.loop_start, &key) {
            let at = self.ctx.timeline.current_time();
            self.loop_mark = Some(at);
            self.message = Some(format!("loop from {}", format_time(at)));
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.loop_end, &key) {
            let start = self
                .loop_mark
                .unwrap_or(self.ctx.timeline.clock().loop_start);
            let end = self.ctx.timeline.current_time();
            self.message = Some(if self.ctx.timeline.set_loop(start, end) {
                format!("looping {}-{}", format_time(start), format_time(end))
            } else {
                "loop end must come after loop start".to_string()
            });
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.clear_loop, &key) {
            self.ctx.timeline.clear_loop();
            self.loop_mark = None;
            self.message = Some("loop cleared".into());
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.toggle_highlight, &key) {
            self.ctx.subtitles.toggle_highlight();
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.rip_subtitle, &key) {
            let added = self.ctx.rip_active_subtitle();
            debug!(added, "ripped subtitle into workspace");
            self.message = Some(if added > 0 {
                format!("ripped {added} tokens")
            } else {
                "no active subtitle".to_string()
            });
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.clear_workspace, &key) {
            self.ctx.workspace.clear();
            self.selected_token = None;
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.select_token, &key) {
            let len = self.ctx.workspace.tokens().len();
            self.selected_token = match self.selected_token {
                _ if len == 0 => None,
                Some(i) => Some((i + 1) % len),
                None => Some(0),
            };
            return Flow::Redraw(self.ctx.resolve());
        }
        if matches_binding(&bindings.move_token, &key) {
            let id = self
                .selected_token
                .and_then(|i| self.ctx.workspace.tokens().get(i))
                .map(|t| t.id.clone());
            if let Some(id) = id {
                self.ctx.workspace.move_to_end(&id);
                self.selected_token = Some(self.ctx.workspace.tokens().len() - 1);
            }
            return Flow::Redraw(self.ctx.resolve());
        }

        Flow::Continue
    }

    fn scene_changed(&mut self) -> Flow {
        self.stage.load(self.ctx.scene());
        self.loop_mark = None;
        self.selected_token = None;
        self.message = None;
        Flow::Redraw(self.ctx.resolve())
    }

    /// Press on the progress bar starts a scrub, drag seeks, release resumes.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> Flow {
        let duration = self.ctx.timeline.duration();
        let on_bar = mouse.row == self.layout.progress_y;
        let time = self.layout.time_at_column(mouse.column, duration);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if on_bar => match time {
                Some(t) => {
                    self.ctx.begin_scrub();
                    Flow::Redraw(self.ctx.scrub_to(t))
                }
                None => Flow::Continue,
            },
            MouseEventKind::Drag(MouseButton::Left) if self.ctx.scrubber.is_dragging() => {
                // Dragging off either end pins to that end.
                let t = time.unwrap_or(if mouse.column == 0 { 0.0 } else { duration });
                Flow::Redraw(self.ctx.scrub_to(t))
            }
            MouseEventKind::Up(MouseButton::Left) if self.ctx.scrubber.is_dragging() => {
                self.ctx.end_scrub(Instant::now());
                Flow::Redraw(self.ctx.resolve())
            }
            _ => Flow::Continue,
        }
    }
}
