// SPDX-License-Identifier: MIT
//
// Resize watcher — polls terminal geometry and reports changes.
//
// A small thread asks the terminal for its size at a fixed interval and
// sends `TermEvent::Resize` on the event loop's channel whenever the answer
// differs from the last one it saw. It never touches editor state; the loop
// is the only consumer.
//
// Polling keeps signal handlers out of the picture entirely. At 10ms the
// cost is one ioctl per tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::event_loop::TermEvent;
use crate::terminal::{self, Size};

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

/// Background resize-polling thread.
pub struct SizeWatcher {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl SizeWatcher {
    /// Spawn a watcher that queries the real terminal.
    ///
    /// `initial` is the size the loop already knows about; only changes
    /// from it are reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(
        tx: Sender<TermEvent>,
        interval: Duration,
        initial: Size,
    ) -> std::io::Result<Self> {
        Self::spawn_with(tx, interval, initial, terminal::get_size)
    }

    /// Spawn a watcher with a custom size probe.
    ///
    /// A probe returning `None` means "unknown right now" and is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn_with<F>(
        tx: Sender<TermEvent>,
        interval: Duration,
        initial: Size,
        mut probe: F,
    ) -> std::io::Result<Self>
    where
        F: FnMut() -> Option<Size> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("zex-resize".into())
            .spawn(move || {
                let mut last = initial;
                while !stop_flag.load(Ordering::Relaxed) {
                    if let Some(size) = probe() {
                        if size != last {
                            tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
                            last = size;
                            if tx.send(TermEvent::Resize(size)).is_err() {
                                break;
                            }
                        }
                    }
                    thread::sleep(interval);
                }
            })?;

        Ok(Self {
            handle: Some(handle),
            stop,
        })
    }

    /// Signal the thread to stop and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("resize watcher panicked");
            }
        }
    }
}

impl Drop for SizeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;
    use std::sync::Mutex;

    const SMALL: Size = Size { cols: 80, rows: 24 };
    const LARGE: Size = Size { cols: 120, rows: 40 };

    fn recv_resize(rx: &mpsc::Receiver<TermEvent>) -> Size {
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            TermEvent::Resize(size) => size,
            other => panic!("expected resize, got {other:?}"),
        }
    }

    #[test]
    fn reports_change_once() {
        let (tx, rx) = mpsc::channel();
        let mut watcher =
            SizeWatcher::spawn_with(tx, Duration::from_millis(1), SMALL, || Some(LARGE)).unwrap();

        assert_eq!(recv_resize(&rx), LARGE);
        // Same answer again is not a change.
        assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());
        watcher.stop();
    }

    #[test]
    fn unchanged_size_is_silent() {
        let (tx, rx) = mpsc::channel();
        let mut watcher =
            SizeWatcher::spawn_with(tx, Duration::from_millis(1), SMALL, || Some(SMALL)).unwrap();

        assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());
        watcher.stop();
    }

    #[test]
    fn unknown_size_is_ignored() {
        let (tx, rx) = mpsc::channel();
        let mut watcher =
            SizeWatcher::spawn_with(tx, Duration::from_millis(1), SMALL, || None).unwrap();

        assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());
        watcher.stop();
    }

    #[test]
    fn reports_each_distinct_size_in_order() {
        let sizes = Arc::new(Mutex::new(vec![LARGE, LARGE, SMALL]));
        let feed = Arc::clone(&sizes);
        let (tx, rx) = mpsc::channel();
        let mut watcher = SizeWatcher::spawn_with(tx, Duration::from_millis(1), SMALL, move || {
            let mut queue = feed.lock().unwrap();
            if queue.is_empty() { None } else { Some(queue.remove(0)) }
        })
        .unwrap();

        assert_eq!(recv_resize(&rx), LARGE);
        assert_eq!(recv_resize(&rx), SMALL);
        watcher.stop();
    }

    #[test]
    fn stop_closes_channel() {
        let (tx, rx) = mpsc::channel();
        let mut watcher =
            SizeWatcher::spawn_with(tx, Duration::from_millis(1), SMALL, || Some(SMALL)).unwrap();
        watcher.stop();
        watcher.stop();
        assert!(matches!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }
}
