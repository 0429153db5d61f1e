//! emax - Emacs-style command mediation for multi-cursor editors
//!
//! This crate sits between a host editor and its command stream: prefix
//! arguments, the mark and mark ring, the kill ring with multi-cursor
//! kill transactions, and incremental search, all mediated through an
//! interception pipeline the host forwards its commands and view events
//! through.

pub mod buffer;
pub mod command;
pub mod commands;
pub mod config;
pub mod editor;
pub mod facade;
pub mod kill;
pub mod kill_ring;
pub mod pipeline;
pub mod region;
pub mod search;
pub mod state;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use buffer::{RopeBuffer, TextView};
pub use command::{Command, CommandKind};
pub use config::EmaxConfig;
pub use editor::Editor;
pub use kill_ring::KillRing;
pub use pipeline::{ContextKey, Dispatch, Effect, Pipeline};
pub use region::Region;
