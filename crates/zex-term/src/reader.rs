// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// A dedicated thread reads stdin and forwards byte chunks to the event loop
// as `TermEvent::Input`. The resize watcher sends into the same channel, so
// the loop has a single place to block on.
//
// Shutdown: the thread `poll()`s stdin with a short timeout and checks an
// `AtomicBool` stop flag between polls, so it is never stuck inside a
// blocking `read()` when the editor exits.

#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::event_loop::TermEvent;

/// Bytes per `read()`. A keypress is 1-4 bytes; a paste can be much more.
const READ_BUF_SIZE: usize = 4096;

/// How often the reader thread checks the stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// Background stdin reader thread.
///
/// Runs until [`stop`](Self::stop) is called, the handle is dropped, stdin
/// hits EOF, or the receiving side of the channel goes away.
pub struct StdinReader {
    /// `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader, sending every non-empty chunk through `tx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(tx: Sender<TermEvent>) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("zex-stdin".into())
            .spawn(move || Self::reader_loop(&tx, &stop_flag))?;

        Ok(Self {
            handle: Some(handle),
            stop,
        })
    }

    /// Signal the thread to stop and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(unix)]
    fn reader_loop(tx: &Sender<TermEvent>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
            };

            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };
            if n <= 0 {
                tracing::debug!("stdin closed");
                break;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
            let chunk = buf[..n as usize].to_vec();

            if tx.send(TermEvent::Input(chunk)).is_err() {
                break;
            }
        }
    }

    /// Blocking fallback. Shutdown waits for the next keypress.
    #[cfg(not(unix))]
    fn reader_loop(tx: &Sender<TermEvent>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(TermEvent::Input(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn spawn_and_stop() {
        let (tx, _rx) = mpsc::channel();
        let mut reader = StdinReader::spawn(tx).unwrap();
        reader.stop();
    }

    #[test]
    fn stop_is_idempotent() {
        let (tx, _rx) = mpsc::channel();
        let mut reader = StdinReader::spawn(tx).unwrap();
        reader.stop();
        reader.stop();
    }

    #[test]
    fn drop_stops_reader() {
        let (tx, _rx) = mpsc::channel();
        let reader = StdinReader::spawn(tx).unwrap();
        drop(reader);
    }

    #[test]
    fn channel_closes_on_stop() {
        let (tx, rx) = mpsc::channel();
        let mut reader = StdinReader::spawn(tx).unwrap();
        reader.stop();

        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
