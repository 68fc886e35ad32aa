//! Paint an [`App`] with crossterm.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Alex Rivera   Home Experience Projects … │  nav bar (current entry reversed)
//! │                                        ○ │
//! │  Work Experience                       ● │  side dots
//! │  …                                     ○ │
//! └──────────────────────────────────────────┘
//! ```

use super::{
    app::App,
    document::Tone,
};
use crate::{
    nav::NAVIGATION,
    theme::{Appearance, ThemeStore},
};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Below this width the nav bar collapses into the menu button.
pub const COMPACT_WIDTH: usize = 72;

/// Columns reserved on the right for the side dots.
pub const DOTS_GUTTER: usize = 3;

/// Left margin of the content column.
const MARGIN: usize = 2;

/// Rows above the scrolled content.
pub const NAV_ROWS: usize = 1;

struct Palette {
    background: Color,
    text: Color,
    muted: Color,
    accent: Color,
}

const fn palette(appearance: Appearance) -> Palette {
    match appearance {
        Appearance::Dark => Palette {
            background: Color::Black,
            text: Color::White,
            muted: Color::DarkGrey,
            accent: Color::Green,
        },
        Appearance::Light => Palette {
            background: Color::White,
            text: Color::Black,
            muted: Color::Grey,
            accent: Color::DarkGreen,
        },
    }
}

/// Width available to document text in a terminal `width` columns wide.
pub const fn content_width(width: usize) -> usize {
    width.saturating_sub(MARGIN + DOTS_GUTTER)
}

pub fn draw<S: ThemeStore>(out: &mut impl Write, app: &App<S>, width: usize) -> io::Result<()> {
    let colors = palette(app.appearance());
    queue!(
        out,
        SetBackgroundColor(colors.background),
        Clear(ClearType::All)
    )?;

    nav_bar(out, app, width, &colors)?;
    content(out, app, width, &colors)?;
    dots(out, app, width, &colors)?;
    if app.menu.is_open() {
        menu(out, app, width, &colors)?;
    }

    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()
}

fn nav_bar<S: ThemeStore>(out: &mut impl Write, app: &App<S>, width: usize, colors: &Palette) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, 0),
        SetForegroundColor(colors.text),
        SetAttribute(Attribute::Bold),
        Print(clip(&format!(" {}", app.title), width)),
        SetAttribute(Attribute::NormalIntensity)
    )?;

    if width < COMPACT_WIDTH {
        let button = "[m] Menu ";
        queue!(
            out,
            MoveTo(column(width.saturating_sub(button.len())), 0),
            SetForegroundColor(colors.muted),
            Print(button)
        )?;
        return Ok(());
    }

    let labels: usize = NAVIGATION.iter().map(|e| e.label.len() + 2).sum();
    queue!(out, MoveTo(column(width.saturating_sub(labels + 1)), 0))?;
    for (entry, current) in app.nav_entries() {
        if current {
            queue!(
                out,
                SetForegroundColor(colors.accent),
                SetAttribute(Attribute::Reverse),
                Print(format!(" {} ", entry.label)),
                SetAttribute(Attribute::NoReverse)
            )?;
        } else {
            queue!(out, SetForegroundColor(colors.muted), Print(format!(" {} ", entry.label)))?;
        }
    }
    Ok(())
}

fn content<S: ThemeStore>(out: &mut impl Write, app: &App<S>, width: usize, colors: &Palette) -> io::Result<()> {
    let text_width = content_width(width);
    for y in 0..app.viewport_height() {
        let Some(line) = app.visible_row(y).and_then(|row| row.line) else {
            continue;
        };
        let (color, attribute) = match line.tone {
            Tone::Heading | Tone::Title => (colors.text, Attribute::Bold),
            Tone::Body => (colors.text, Attribute::NormalIntensity),
            Tone::Muted => (colors.muted, Attribute::NormalIntensity),
            Tone::Label => (colors.muted, Attribute::Italic),
            Tone::Accent => (colors.accent, Attribute::NormalIntensity),
        };
        queue!(
            out,
            MoveTo(column(MARGIN), row(NAV_ROWS + y)),
            SetForegroundColor(color),
            SetAttribute(attribute),
            Print(clip(&line.text, text_width)),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(colors.background)
        )?;
    }
    Ok(())
}

fn dots<S: ThemeStore>(out: &mut impl Write, app: &App<S>, width: usize, colors: &Palette) -> io::Result<()> {
    let top = NAV_ROWS + app.viewport_height().saturating_sub(NAVIGATION.len() * 2) / 2;
    let x = column(width.saturating_sub(2));
    for (i, (_, current)) in app.nav_entries().enumerate() {
        let (dot, color) = if current {
            ("●", colors.accent)
        } else {
            ("○", colors.muted)
        };
        queue!(
            out,
            MoveTo(x, row(top + i * 2)),
            SetForegroundColor(color),
            Print(dot)
        )?;
    }
    Ok(())
}

fn menu<S: ThemeStore>(out: &mut impl Write, app: &App<S>, width: usize, colors: &Palette) -> io::Result<()> {
    let inner = NAVIGATION.iter().map(|e| e.label.len()).max().unwrap_or(0) + 4;
    let x = column(width.saturating_sub(inner + DOTS_GUTTER + 2));
    let border = "─".repeat(inner);

    queue!(
        out,
        SetForegroundColor(colors.muted),
        MoveTo(x, row(NAV_ROWS)),
        Print(format!("┌{border}┐"))
    )?;
    for (i, (entry, current)) in app.nav_entries().enumerate() {
        let marker = if current { "●" } else { " " };
        let label = format!(" {marker} {:<width$}", entry.label, width = inner - 3);
        queue!(out, MoveTo(x, row(NAV_ROWS + 1 + i)), SetForegroundColor(colors.muted), Print("│"))?;
        if i == app.menu.cursor() {
            queue!(
                out,
                SetForegroundColor(colors.accent),
                SetAttribute(Attribute::Reverse),
                Print(&label),
                SetAttribute(Attribute::NoReverse)
            )?;
        } else {
            queue!(out, SetForegroundColor(colors.text), Print(&label))?;
        }
        queue!(out, SetForegroundColor(colors.muted), Print("│"))?;
    }
    queue!(
        out,
        MoveTo(x, row(NAV_ROWS + 1 + NAVIGATION.len())),
        Print(format!("└{border}┘"))
    )
}

/// First `width` characters of `text`.
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn column(x: usize) -> u16 {
    u16::try_from(x).unwrap_or(u16::MAX)
}

fn row(y: usize) -> u16 {
    u16::try_from(y).unwrap_or(u16::MAX)
}
