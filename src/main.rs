// SPDX-License-Identifier: MIT
//
// zex — a small modal terminal text editor.
//
// This is the binary that wires the two crates together:
//
//   zex-term   → raw mode, key decoding, resize watching, event loop
//   zex-editor → rows, motions, modes, the editor session
//
// The Editor struct implements zex-term's App trait. Each keypress flows
// through:
//
//   stdin → parser → on_key → EditorSession::handle_key → transition → apply
//   paint → Screen::scroll → Screen::paint → one write to stdout
//
// Diagnostics go to a log file through tracing, never to the terminal.

mod screen;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use zex_editor::config::DEFAULT_QUIT_TIMES;
use zex_editor::{EditorConfig, EditorSession, Flow};
use zex_term::ansi::CursorShape;
use zex_term::event_loop::{Action, App, EventLoop};
use zex_term::input::KeyEvent;
use zex_term::terminal::Size;

use screen::Screen;

/// Environment variable holding the log filter, e.g. `ZEX_LOG=debug`.
const LOG_ENV: &str = "ZEX_LOG";

// ─── Arguments ───────────────────────────────────────────────────────────────

/// A small modal terminal text editor
#[derive(Parser, Debug)]
#[command(name = "zex")]
#[command(version)]
struct Args {
    /// File to open. It is created on the first save if it does not exist.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to the log file (default: zex.log in the system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Extra Ctrl-Q presses needed to quit with unsaved changes
    #[arg(long, value_name = "N", default_value_t = DEFAULT_QUIT_TIMES)]
    quit_times: u32,
}

// ─── Editor ──────────────────────────────────────────────────────────────────

/// The session plus what it takes to show it.
struct Editor {
    session: EditorSession,
    screen: Screen,
    /// Whether the last frame showed a status message.
    status_shown: bool,
}

impl Editor {
    fn new(session: EditorSession, size: Size) -> Self {
        let mut editor = Self {
            session,
            screen: Screen::new(size),
            status_shown: false,
        };
        editor.on_resize(size);
        editor
    }
}

impl App for Editor {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        match self.session.handle_key(key) {
            Flow::Continue => Action::Continue,
            Flow::Quit => Action::Quit,
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.screen.resize(size);
        self.session.set_page_rows(self.screen.text_rows());
    }

    /// Repaint once when a status message expires.
    fn on_tick(&mut self) -> bool {
        self.session.status_message().is_some() != self.status_shown
    }

    fn paint(&mut self, out: &mut Vec<u8>, size: Size) {
        self.screen.resize(size);
        self.screen.scroll(self.session.cursor().cy, self.session.rx());
        self.status_shown = self.session.status_message().is_some();
        if let Err(e) = self.screen.paint(&self.session, out) {
            warn!(%e, "paint failed");
        }
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let (x, y) = self.screen.cursor(&self.session);
        Some((x, y, self.session.mode().cursor_shape()))
    }
}

// ─── Startup ─────────────────────────────────────────────────────────────────

/// Send tracing output to `path`, filtered by `ZEX_LOG` (default `info`).
fn init_tracing(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("zex.log"));
    if let Err(e) = init_tracing(&log_path) {
        eprintln!("zex: logging disabled: {e:#}");
    }

    let config = EditorConfig::default().with_quit_times(args.quit_times);
    let session = match &args.file {
        Some(path) => EditorSession::open(path, config)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => EditorSession::new(config),
    };
    info!(file = ?args.file, "starting");

    let mut event_loop = EventLoop::new().context("Failed to initialize terminal")?;
    let mut editor = Editor::new(session, event_loop.size());
    event_loop
        .run(&mut editor)
        .context("Editor loop returned an error")?;

    info!("exiting");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use zex_term::event_loop::compose_frame;
    use zex_term::input::KeyCode;

    fn editor() -> Editor {
        Editor::new(EditorSession::new(EditorConfig::default()), Size { cols: 40, rows: 10 })
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["zex", "notes.txt", "--quit-times", "0"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.quit_times, 0);
        assert_eq!(args.log_file, None);

        let args = Args::try_parse_from(["zex"]).unwrap();
        assert_eq!(args.file, None);
        assert_eq!(args.quit_times, DEFAULT_QUIT_TIMES);
    }

    #[test]
    fn resize_sets_page_rows() {
        let mut ed = editor();
        assert_eq!(ed.session.config().page_rows, 8);
        ed.on_resize(Size { cols: 40, rows: 30 });
        assert_eq!(ed.session.config().page_rows, 28);
    }

    #[test]
    fn keys_map_to_loop_actions() {
        let mut ed = editor();
        assert_eq!(ed.on_key(KeyEvent::char(b'i')), Action::Continue);
        assert_eq!(ed.on_key(KeyEvent::plain(KeyCode::Escape)), Action::Continue);
        assert_eq!(ed.on_key(KeyEvent::ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn tick_requests_repaint_when_status_changes() {
        let mut ed = editor();
        assert!(!ed.on_tick());
        ed.session.set_status_message("saved");
        assert!(ed.on_tick());
        let _ = compose_frame(&mut ed, Size { cols: 40, rows: 10 }).unwrap();
        assert!(!ed.on_tick());
    }

    #[test]
    fn frame_places_cursor_with_mode_shape() {
        let mut ed = editor();
        ed.on_key(KeyEvent::char(b'i'));
        ed.on_key(KeyEvent::char(b'a'));
        let frame = compose_frame(&mut ed, Size { cols: 40, rows: 10 }).unwrap();
        let text = String::from_utf8(frame).unwrap();
        assert!(text.ends_with("\x1b[1;2H\x1b[6 q\x1b[?25h"));
    }
}
