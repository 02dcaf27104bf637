// SPDX-License-Identifier: MIT
//
// zex-term — terminal boundary for the zex editor.
//
// Raw mode and the alternate screen, byte-to-key decoding, a background
// stdin reader, a resize watcher, and the event loop that ties them to an
// application. Direct termios and ANSI escape sequences; no TUI framework.
//
// Everything here is mechanical. Editing semantics live in `zex-editor`.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
pub mod watcher;
