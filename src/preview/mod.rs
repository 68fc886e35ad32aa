//! `folio preview`: the home page in the terminal.
//!
//! The preview is a second host for the section tracker. A [`ScrollSurface`]
//! stands in for the browser viewport, computing intersections from row
//! geometry, and the tracker drains its reports once per frame.
//!
//! ```text
//! compose() ──► layout() ──► ScrollSurface ──observe──► SectionTracker
//!                                 ▲                           │
//!                 keys ───────────┘ scroll / jump        active, revealed
//!                                                             ▼
//!                                                          draw()
//! ```
//!
//! [`ScrollSurface`]: crate::tracker::ScrollSurface

mod app;
mod document;
mod draw;

use crate::{
    config::SiteConfig,
    data::Portfolio,
    log,
    theme::{Appearance, FileThemeStore, MemoryThemeStore, ThemePreference, ThemeState, ThemeStore},
};
use anyhow::Result;
use app::{App, Control};
use chrono::Datelike;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

/// Frame interval while a smooth scroll is running.
const FRAME: Duration = Duration::from_millis(16);
/// Poll interval when idle.
const IDLE: Duration = Duration::from_millis(250);

/// Run the preview until the user quits.
///
/// `theme` overrides the stored preference for this session only.
pub fn run_preview(config: &SiteConfig, theme: Option<ThemePreference>) -> Result<()> {
    let portfolio = Portfolio::from_path(&config.build.content)?;
    let system = Appearance::detect();

    match theme {
        Some(preference) => {
            let state = ThemeState::load(MemoryThemeStore::default(), preference)?;
            run(config, &portfolio, state, system)
        }
        None => {
            let store = FileThemeStore::in_root(config.get_root());
            let state = ThemeState::load(store, config.theme.default)?;
            run(config, &portfolio, state, system)
        }
    }
}

fn run<S: ThemeStore>(
    config: &SiteConfig,
    portfolio: &Portfolio,
    theme: ThemeState<S>,
    system: Appearance,
) -> Result<()> {
    let year = chrono::Local::now().year();
    let (width, height) = terminal_size();
    let compose = |width: usize| document::compose(portfolio, config, year, draw::content_width(width));

    let mut app = App::new(
        compose(width),
        config.base.title.clone(),
        height.saturating_sub(draw::NAV_ROWS),
        theme,
        system,
    );

    let result = {
        let mut terminal = TerminalGuard::enter()?;
        event_loop(&mut app, &mut terminal.out, width, compose)
    };
    app.teardown();

    let preference = app.theme.preference();
    if preference != config.theme.default {
        log!("preview"; "theme: {}", preference);
    }
    result
}

fn event_loop<S: ThemeStore>(
    app: &mut App<S>,
    out: &mut impl Write,
    mut width: usize,
    compose: impl Fn(usize) -> document::Document,
) -> Result<()> {
    let mut dirty = true;
    loop {
        dirty |= app.frame();
        if dirty {
            draw::draw(out, app, width)?;
            dirty = false;
        }

        let timeout = if app.surface.is_animating() { FRAME } else { IDLE };
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if app.handle_key(key)? == Control::Quit {
                    return Ok(());
                }
                dirty = true;
            }
            Event::Resize(columns, rows) => {
                width = usize::from(columns);
                let viewport = usize::from(rows).saturating_sub(draw::NAV_ROWS);
                app.relayout(compose(width), viewport);
                dirty = true;
            }
            _ => {}
        }
    }
}

fn terminal_size() -> (usize, usize) {
    terminal::size().map_or((80, 24), |(w, h)| (usize::from(w), usize::from(h)))
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            terminal::disable_raw_mode().ok();
            return Err(e);
        }
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        execute!(self.out, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
