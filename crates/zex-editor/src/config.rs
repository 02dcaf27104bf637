//! Editor configuration.
//!
//! A handful of knobs, filled from command-line flags by the binary. The tab
//! stop is not here: it is the fixed [`TAB_STOP`](crate::line::TAB_STOP).
//!
//! | Field            | Default | Meaning                                       |
//! |------------------|---------|-----------------------------------------------|
//! | `quit_times`     | 2       | Extra Ctrl-Q presses needed to drop changes   |
//! | `status_timeout` | 5 s     | How long a status message stays on screen     |
//! | `page_rows`      | 22      | PageUp/PageDown step until the screen reports |

use std::time::Duration;

/// Extra Ctrl-Q presses required when the document is modified.
pub const DEFAULT_QUIT_TIMES: u32 = 2;

/// Lifetime of a status message.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Text rows on an 80×24 terminal once the status bar and message line are
/// taken out.
pub const DEFAULT_PAGE_ROWS: usize = 22;

/// Runtime settings for an [`EditorSession`](crate::session::EditorSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    pub quit_times: u32,
    pub status_timeout: Duration,
    pub page_rows: usize,
}

impl EditorConfig {
    /// Override the quit confirmation count.
    #[must_use]
    pub const fn with_quit_times(mut self, quit_times: u32) -> Self {
        self.quit_times = quit_times;
        self
    }

    /// Override the status message lifetime.
    #[must_use]
    pub const fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quit_times: DEFAULT_QUIT_TIMES,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            page_rows: DEFAULT_PAGE_ROWS,
        }
    }
}
