// SPDX-License-Identifier: MIT
//
// Event loop — wires the terminal, the helper threads and the application.
//
// Two producer threads feed one channel:
//
//   stdin reader   ── TermEvent::Input(bytes) ──┐
//                                               ├──▶ loop ──▶ App
//   resize watcher ── TermEvent::Resize(size) ──┘
//
// The loop owns the terminal and the key parser and is the only thread that
// calls into the application. Each iteration blocks on the channel with a
// short timeout. The timeout doubles as the escape-sequence timeout: when it
// fires with a lone ESC pending, the parser flushes it as an Escape key.
//
// Painting is whole-frame. The application appends the escape sequences for
// its frame to a byte buffer, the loop wraps that with cursor hide/show and
// positioning, and the result goes to stdout in a single write.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi::{self, CursorShape};
use crate::input::{KeyEvent, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};
use crate::watcher::{self, SizeWatcher};

// ─── Messages ────────────────────────────────────────────────────────────────

/// A message from one of the producer threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    /// Raw bytes read from stdin.
    Input(Vec<u8>),
    /// The terminal changed size.
    Resize(Size),
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Per iteration the loop calls [`on_key`](App::on_key) for each decoded
/// key, [`on_resize`](App::on_resize) for each size change,
/// [`on_tick`](App::on_tick) once, then [`paint`](App::paint) and
/// [`cursor`](App::cursor) if anything changed.
pub trait App {
    /// Handle one decoded key. Return [`Action::Quit`] to exit.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// Handle a terminal resize.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every iteration, even when nothing arrived. Return `true` if
    /// time-based state changed and a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Append the escape sequences for a full frame to `out`.
    ///
    /// The cursor is hidden and at home when this is called.
    fn paint(&mut self, out: &mut Vec<u8>, size: Size);

    /// Screen position and shape of the cursor after painting, or `None`
    /// to keep it hidden.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Channel receive timeout. Also the escape-sequence timeout.
    pub tick: Duration,
    /// How often the resize watcher polls the terminal size.
    pub resize_poll: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(25),
            resize_poll: watcher::DEFAULT_INTERVAL,
        }
    }
}

// ─── Frame ───────────────────────────────────────────────────────────────────

/// Build the bytes for one frame: hide cursor, home, app paint, cursor.
///
/// # Errors
///
/// Only fails if writing to the in-memory buffer fails, which it does not.
pub fn compose_frame(app: &mut impl App, size: Size) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(usize::from(size.cols) * usize::from(size.rows) + 64);
    ansi::cursor_hide(&mut out)?;
    ansi::cursor_home(&mut out)?;
    app.paint(&mut out, size);
    if let Some((x, y, shape)) = app.cursor() {
        ansi::cursor_to(&mut out, x, y)?;
        ansi::set_cursor_shape(&mut out, shape)?;
        ansi::cursor_show(&mut out)?;
    }
    Ok(out)
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Outcome of feeding one message to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Nothing visible changed.
    Idle,
    /// Repaint needed.
    Dirty,
    /// The application asked to quit.
    Quit,
}

/// The terminal event loop.
///
/// Owns the terminal and the key parser. [`run`](Self::run) returns when
/// the application answers [`Action::Quit`] or stdin closes.
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    config: LoopConfig,
}

impl EventLoop {
    /// Create an event loop with default timing.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal handle cannot be created.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop with custom timing.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal handle cannot be created.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            config,
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, start the helper threads, and run until quit.
    ///
    /// The terminal is restored and both threads are joined on every exit
    /// path, including errors.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, thread spawning or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;

        let (tx, rx) = mpsc::channel();
        let mut reader = StdinReader::spawn(tx.clone())?;
        let mut watcher = SizeWatcher::spawn(tx, self.config.resize_poll, self.terminal.size())?;

        app.on_resize(self.terminal.size());
        let result = self.run_inner(app, &rx);

        reader.stop();
        watcher.stop();
        self.terminal.leave()?;

        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<TermEvent>) -> io::Result<()> {
        let mut dirty = true;

        loop {
            let step = match rx.recv_timeout(self.config.tick) {
                Ok(event) => self.dispatch(app, event),
                Err(RecvTimeoutError::Timeout) => self.flush_pending(app),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input channel closed");
                    return Ok(());
                }
            };

            match step {
                Step::Quit => return Ok(()),
                Step::Dirty => dirty = true,
                Step::Idle => {}
            }

            if app.on_tick() {
                dirty = true;
            }

            if dirty {
                let frame = compose_frame(app, self.terminal.size())?;
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(&frame)?;
                lock.flush()?;
                dirty = false;
            }
        }
    }

    /// Apply one message to the application.
    fn dispatch(&mut self, app: &mut impl App, event: TermEvent) -> Step {
        match event {
            TermEvent::Input(bytes) => {
                let keys = self.parser.advance(&bytes);
                deliver(app, keys)
            }
            TermEvent::Resize(size) => {
                self.terminal.set_size(size);
                app.on_resize(size);
                Step::Dirty
            }
        }
    }

    /// Resolve a pending lone ESC after a quiet tick.
    fn flush_pending(&mut self, app: &mut impl App) -> Step {
        if self.parser.has_pending() {
            let keys = self.parser.flush();
            deliver(app, keys)
        } else {
            Step::Idle
        }
    }
}

fn deliver(app: &mut impl App, keys: Vec<KeyEvent>) -> Step {
    if keys.is_empty() {
        return Step::Idle;
    }
    for key in keys {
        if app.on_key(key) == Action::Quit {
            return Step::Quit;
        }
    }
    Step::Dirty
}

// ─── Tests ───────────────────────────────────────────────────────────────────
