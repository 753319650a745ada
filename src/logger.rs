//! Terminal output: prefixed log lines and a read counter.
//!
//! ```ignore
//! log!("build"; "loading {} documents", count);
//!
//! let progress = ReadProgress::start(paths.len());
//! progress.as_ref().map(ReadProgress::tick);
//! ```

use colored::{Color, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Set while a [`ReadProgress`] line sits at the bottom of the terminal.
static PROGRESS_SHOWN: AtomicBool = AtomicBool::new(false);

/// Serializes every terminal write.
static TERMINAL: Mutex<()> = Mutex::new(());

const FALLBACK_WIDTH: usize = 100;
const BAR_SLOTS: usize = 24;

fn terminal_width() -> usize {
    static WIDTH: OnceLock<usize> = OnceLock::new();
    *WIDTH.get_or_init(|| size().map_or(FALLBACK_WIDTH, |(w, _)| usize::from(w)))
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("error"; "{} failed", path.display());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print `[module] message` on its own line.
///
/// An active read counter is wiped first and redrawn on its next tick.
/// Single-line messages are cut to the terminal width.
pub fn log(module: &str, message: &str) {
    let _guard = TERMINAL.lock().ok();
    let mut out = stdout().lock();
    if PROGRESS_SHOWN.load(Ordering::Acquire) {
        write!(out, "\r").ok();
        execute!(out, Clear(ClearType::CurrentLine)).ok();
    }

    let prefix = format!("[{module}]").color(prefix_color(module)).bold();
    let message = if message.contains('\n') {
        message
    } else {
        fit(message, terminal_width().saturating_sub(module.len() + 3))
    };
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

fn prefix_color(module: &str) -> Color {
    match module.to_ascii_lowercase().as_str() {
        "error" => Color::BrightRed,
        "valid" | "check" | "done" => Color::BrightGreen,
        "layout" => Color::BrightBlue,
        _ => Color::BrightYellow,
    }
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn fit(s: &str, max: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// `[#######.........] 7/16` for `done` of `total` files.
fn render_bar(done: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        done.min(total) * BAR_SLOTS / total
    };
    format!(
        "[{}{}] {done}/{total}",
        "#".repeat(filled),
        ".".repeat(BAR_SLOTS - filled)
    )
}

/// One-line counter of documents read, redrawn in place.
///
/// Ticks may come from any rayon worker.
pub struct ReadProgress {
    total: usize,
    done: AtomicUsize,
}

impl ReadProgress {
    /// Counter for `total` files, or `None` when there is nothing worth showing.
    pub fn start(total: usize) -> Option<Self> {
        (total > 1).then(|| {
            PROGRESS_SHOWN.store(true, Ordering::Release);
            Self {
                total,
                done: AtomicUsize::new(0),
            }
        })
    }

    pub fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let line = format!("{} {}", "[read]".bright_yellow().bold(), render_bar(done, self.total));

        let _guard = TERMINAL.lock().ok();
        let mut out = stdout().lock();
        write!(out, "\r").ok();
        execute!(out, Clear(ClearType::CurrentLine)).ok();
        write!(out, "{line}").ok();
        out.flush().ok();
    }
}

impl Drop for ReadProgress {
    fn drop(&mut self) {
        if PROGRESS_SHOWN.swap(false, Ordering::AcqRel) {
            let _guard = TERMINAL.lock().ok();
            let mut out = stdout().lock();
            write!(out, "\r").ok();
            execute!(out, Clear(ClearType::CurrentLine)).ok();
            out.flush().ok();
        }
    }
}
