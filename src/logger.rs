//! Terminal output: prefixed log lines, progress bars, watch status.
//!
//! ```ignore
//! log!("build"; "{} pages", count);
//!
//! let progress = ProgressBars::new(&[("pages", 4), ("assets", 12)]);
//! progress.inc(1);
//! ```
//!
//! Log lines written while progress bars are on screen are inserted above
//! the bars, which are then redrawn below them.

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Rows currently occupied by progress bars.
static BAR_ROWS: AtomicUsize = AtomicUsize::new(0);

// "[module] [████░░░░] 42/100"
const BRACKETS: usize = 2;
const GAP: usize = 1;
const BAR_FRAME: usize = 3;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

/// `[module] ` width.
#[inline]
const fn prefix_width(module_len: usize) -> usize {
    module_len + BRACKETS + GAP
}

fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120)) as usize
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print `[module] message`, cut to the terminal width unless multi-line.
#[allow(clippy::cast_possible_truncation)]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stdout().lock();

    let bars = BAR_ROWS.load(Ordering::SeqCst);
    if bars > 0 {
        execute!(out, cursor::MoveUp(bars as u16), Clear(ClearType::FromCursorDown)).ok();
    } else {
        execute!(out, Clear(ClearType::UntilNewLine)).ok();
    }

    let message = if message.contains('\n') {
        message
    } else {
        truncate_str(message, terminal_width().saturating_sub(prefix_width(module.len())))
    };
    writeln!(out, "{prefix} {message}").ok();

    for _ in 0..bars {
        writeln!(out).ok();
    }
    out.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold(),
        "watch" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        "preview" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Longest prefix of `s` within `max_len` bytes ending on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Progress Bars
// ============================================================================

/// One bar per line, updated in place from any thread.
pub struct ProgressBars {
    bars: Vec<Bar>,
    lock: Mutex<()>,
}

struct Bar {
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    done: AtomicUsize,
}

impl ProgressBars {
    pub fn new(modules: &[(&'static str, usize)]) -> Self {
        let mut out = stdout().lock();
        for _ in modules {
            writeln!(out).ok();
        }
        out.flush().ok();
        BAR_ROWS.store(modules.len(), Ordering::SeqCst);

        let bars = modules
            .iter()
            .map(|(module, total)| Bar {
                prefix: colorize_prefix(module),
                prefix_len: prefix_width(module.len()),
                total: *total,
                done: AtomicUsize::new(0),
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Bars only for non-empty modules; `None` when there's at most one item overall.
    pub fn new_filtered(modules: &[(&'static str, usize)]) -> Option<Self> {
        let kept: Vec<_> = modules.iter().filter(|(_, n)| *n > 0).copied().collect();
        let total: usize = kept.iter().map(|(_, n)| n).sum();
        (total > 1).then(|| Self::new(&kept))
    }

    /// Advance the bar at `index` by one.
    pub fn inc(&self, index: usize) {
        if let Some(bar) = self.bars.get(index) {
            let done = bar.done.fetch_add(1, Ordering::Relaxed) + 1;
            self.draw(index, bar, done);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw(&self, row: usize, bar: &Bar, done: usize) {
        let _guard = self.lock.lock().ok();

        let count = format!("{done}/{}", bar.total);
        let overhead = bar.prefix_len + BAR_FRAME + GAP + count.len();
        let width = terminal_width()
            .saturating_sub(overhead)
            .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
        let filled = (done * width).checked_div(bar.total).unwrap_or(0).min(width);
        let line = "█".repeat(filled) + &"░".repeat(width - filled);

        let up = (self.bars.len() - row) as u16;
        let mut out = stdout().lock();
        execute!(out, cursor::MoveUp(up), Clear(ClearType::CurrentLine)).ok();
        write!(out, "{} [{line}] {count}", bar.prefix).ok();
        execute!(out, cursor::MoveDown(up)).ok();
        write!(out, "\r").ok();
        out.flush().ok();
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn finish(&self) {
        if BAR_ROWS.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();
        let rows = self.bars.len() as u16;
        let mut out = stdout().lock();
        execute!(out, cursor::MoveUp(rows), Clear(ClearType::FromCursorDown)).ok();
        out.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

// ============================================================================
// Watch Status
// ============================================================================

/// Rebuild status block that replaces its previous output.
pub struct WatchStatus {
    last_lines: usize,
}

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        self.display(&"✓".green().to_string(), message);
    }

    pub fn unchanged(&mut self, message: &str) {
        self.display("", &message.dimmed().to_string());
    }

    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_owned()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(&"✗".red().to_string(), &message);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn display(&mut self, symbol: &str, message: &str) {
        let mut out = stdout().lock();
        if self.last_lines > 0 {
            execute!(
                out,
                cursor::MoveUp(self.last_lines as u16),
                Clear(ClearType::FromCursorDown)
            )
            .ok();
        }

        let stamp = format!("[{}]", chrono::Local::now().format("%H:%M:%S")).dimmed();
        if symbol.is_empty() {
            writeln!(out, "{stamp} {message}").ok();
        } else {
            writeln!(out, "{stamp} {symbol} {message}").ok();
        }
        out.flush().ok();

        self.last_lines = line_count(message);
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}
