//! Preview state: layout, scrolling, tracker, menu and theme.
//!
//! Everything here is terminal-free so it can be driven from tests; the
//! event loop feeds it keys and frames, the drawer reads it.

use super::document::{Document, Line};
use crate::{
    nav::{self, MobileMenu, NAVIGATION, NavigationEntry},
    theme::{Appearance, ThemeState, ThemeStore},
    tracker::{Bounds, ScrollSurface, SectionId, SectionTracker},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One document row.
#[derive(Debug, Clone)]
pub struct Row {
    /// Index into the document's sections; `None` for the footer.
    pub section: Option<usize>,
    /// `None` for padding.
    pub line: Option<Line>,
}

/// Rows of the whole document with section geometry.
#[derive(Debug, Clone)]
pub struct Layout {
    pub rows: Vec<Row>,
    pub bounds: Vec<(SectionId, Bounds)>,
}

/// Stack sections vertically, each at least `viewport_height` rows tall.
pub fn layout(document: &Document, viewport_height: usize) -> Layout {
    let mut rows = Vec::new();
    let mut bounds = Vec::with_capacity(document.sections.len());

    for (index, block) in document.sections.iter().enumerate() {
        let top = rows.len();
        // breathing room above every heading
        rows.push(Row {
            section: Some(index),
            line: None,
        });
        rows.extend(block.lines.iter().map(|line| Row {
            section: Some(index),
            line: Some(line.clone()),
        }));
        while rows.len() - top < viewport_height {
            rows.push(Row {
                section: Some(index),
                line: None,
            });
        }
        bounds.push((block.id.clone(), Bounds::new(to_i64(top), to_i64(rows.len() - top))));
    }

    rows.extend(document.footer.iter().map(|line| Row {
        section: None,
        line: Some(line.clone()),
    }));
    Layout { rows, bounds }
}

#[allow(clippy::cast_possible_wrap)]
const fn to_i64(n: usize) -> i64 {
    n as i64
}

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App<S: ThemeStore> {
    pub document: Document,
    pub layout: Layout,
    pub surface: ScrollSurface,
    pub tracker: SectionTracker,
    pub menu: MobileMenu,
    pub theme: ThemeState<S>,
    pub system: Appearance,
    pub title: String,
}

impl<S: ThemeStore> App<S> {
    /// Lay out `document`, attach every composed section and mount the tracker.
    pub fn new(
        document: Document,
        title: String,
        viewport_height: usize,
        theme: ThemeState<S>,
        system: Appearance,
    ) -> Self {
        let layout = layout(&document, viewport_height);
        let mut surface = ScrollSurface::new(to_i64(viewport_height));
        place(&mut surface, &layout);

        let mut tracker = SectionTracker::new(nav::sections());
        for block in &document.sections {
            tracker.attach(block.id.as_str());
        }
        tracker.mount(&mut surface);

        Self {
            document,
            layout,
            surface,
            tracker,
            menu: MobileMenu::default(),
            theme,
            system,
            title,
        }
    }

    pub fn viewport_height(&self) -> usize {
        usize::try_from(self.surface.viewport().height).unwrap_or(0)
    }

    pub fn scroll_y(&self) -> usize {
        usize::try_from(self.surface.viewport().scroll_y).unwrap_or(0)
    }

    pub fn appearance(&self) -> Appearance {
        self.theme.effective(self.system)
    }

    /// Replace the document after a terminal resize, keeping the scroll position.
    pub fn relayout(&mut self, document: Document, viewport_height: usize) {
        self.layout = layout(&document, viewport_height);
        self.document = document;
        place(&mut self.surface, &self.layout);
        self.surface.resize(to_i64(viewport_height));
    }

    /// Advance animations and apply visibility reports. Returns true if
    /// anything on screen may have changed.
    pub fn frame(&mut self) -> bool {
        let animating = self.surface.tick();
        self.tracker.pump() > 0 || animating
    }

    /// The row at screen line `y`, or `None` past the end of the document.
    ///
    /// Rows of sections that have not been revealed yet come back without a line.
    pub fn visible_row(&self, y: usize) -> Option<Row> {
        let row = self.layout.rows.get(self.scroll_y() + y)?;
        let hidden = row
            .section
            .and_then(|i| self.document.sections.get(i))
            .is_some_and(|block| !self.tracker.is_revealed(block.id.as_str()));

        Some(if hidden {
            Row {
                section: row.section,
                line: None,
            }
        } else {
            row.clone()
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Control> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Control::Quit);
        }
        if self.menu.is_open() {
            self.handle_menu_key(key.code);
            return Ok(Control::Continue);
        }

        let page = to_i64(self.viewport_height().saturating_sub(1).max(1));
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Control::Quit),
            KeyCode::Char('j') | KeyCode::Down => self.surface.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.surface.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.surface.scroll_by(page),
            KeyCode::PageUp => self.surface.scroll_by(-page),
            KeyCode::Home | KeyCode::Char('g') => self.surface.scroll_to(0),
            KeyCode::End | KeyCode::Char('G') => self.surface.scroll_to(self.surface.max_scroll()),
            KeyCode::Char('m') => self.menu.toggle(&self.tracker),
            KeyCode::Char('t') => {
                self.theme.toggle(self.system)?;
            }
            KeyCode::Char(c) => {
                if let Some(entry) = NavigationEntry::for_digit(c) {
                    self.go(entry);
                }
            }
            _ => {}
        }
        Ok(Control::Continue)
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('j') | KeyCode::Down => self.menu.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.menu.move_cursor(-1),
            KeyCode::Enter => {
                if let Some(entry) = self.menu.select() {
                    self.go(entry);
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(entry) = NavigationEntry::for_digit(c) {
                    self.menu.close();
                    self.go(entry);
                }
            }
            KeyCode::Esc | KeyCode::Char('m' | 'q') => self.menu.close(),
            _ => {}
        }
    }

    /// Nav click: scroll only. The tracker follows on the next report.
    fn go(&mut self, entry: &NavigationEntry) {
        nav::jump_to(&mut self.surface, entry.target);
    }

    /// Stop observing; later reports are ignored.
    pub fn teardown(&mut self) {
        self.tracker.teardown();
    }

    /// Entries with their highlight, for the nav bar, dots and menu.
    pub fn nav_entries(&self) -> impl Iterator<Item = (&'static NavigationEntry, bool)> + '_ {
        NAVIGATION
            .iter()
            .map(|entry| (entry, self.tracker.is_active(entry.target)))
    }
}

fn place(surface: &mut ScrollSurface, layout: &Layout) {
    for (id, bounds) in &layout.bounds {
        surface.place(id.clone(), *bounds);
    }
    surface.set_content_height(to_i64(layout.rows.len()));
}
