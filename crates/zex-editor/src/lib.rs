//! # zex-editor — Editor core for zex
//!
//! Everything that decides what a key does to the text, with no terminal
//! code in sight:
//!
//! - **[`gap_buffer`]** — `GapBuffer`, the per-row byte store
//! - **[`line`]** — `Line`, a gap buffer plus its tab-expanded render form
//! - **[`document`]** — `Document`, the ordered rows and the dirty counter
//! - **[`cursor`]** / **[`motion`]** — cursor limits and the motion engine
//! - **[`edit`]** — insert, split, join and replace at the cursor
//! - **[`mode`]** / **[`machine`]** — modal states and the key transition table
//! - **[`command`]** — the `:` command line
//! - **[`register`]** — the unnamed yank register
//! - **[`file`]** — load and save
//! - **[`session`]** — `EditorSession`, which ties it all together
//!
//! Text is bytes. There is no Unicode awareness: a byte is a column, and
//! only tabs render wider than one cell.

pub mod command;
pub mod config;
pub mod cursor;
pub mod document;
pub mod edit;
pub mod error;
pub mod file;
pub mod gap_buffer;
pub mod line;
pub mod machine;
pub mod mode;
pub mod motion;
pub mod register;
pub mod session;

pub use config::EditorConfig;
pub use error::FileError;
pub use session::{EditorSession, Flow};
