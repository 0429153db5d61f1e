//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging for debugging command dispatch, kill
//! transactions, and mark/cursor state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=emax::pipeline=trace` - module-level filtering
//!
//! Logs are also written to `~/.config/emax/logs/emax.log` with daily
//! rotation; the file layer stays at debug level regardless of RUST_LOG.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::buffer::TextView;
use crate::region::Region;

/// Initialize the tracing subscriber with console and file logging.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "emax.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the cursor set for before/after diffing.
#[derive(Debug, Clone)]
pub struct CursorSnapshot {
    pub cursors: Vec<Region>,
}

impl CursorSnapshot {
    pub fn capture<B: TextView + ?Sized>(view: &B) -> Self {
        Self {
            cursors: view.cursors().to_vec(),
        }
    }

    /// Generate a diff description between two snapshots.
    pub fn diff(&self, other: &CursorSnapshot) -> Option<String> {
        if self.cursors.len() != other.cursors.len() {
            return Some(format!(
                "cursor count: {} -> {}",
                self.cursors.len(),
                other.cursors.len()
            ));
        }

        let mut changes = Vec::new();
        for (i, (before, after)) in self.cursors.iter().zip(&other.cursors).enumerate() {
            if before != after {
                changes.push(format!(
                    "#{}: [{},{}] -> [{},{}]",
                    i, before.a, before.b, after.a, after.b
                ));
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    #[test]
    fn test_snapshot_diff_reports_moves() {
        let mut view = RopeBuffer::from_text("hello");
        let before = CursorSnapshot::capture(&view);
        view.set_cursors(vec![Region::point(3)]);
        let after = CursorSnapshot::capture(&view);
        let diff = before.diff(&after);
        assert_eq!(diff.as_deref(), Some("#0: [0,0] -> [3,3]"));
        assert!(after.diff(&after).is_none());
    }

    #[test]
    fn test_snapshot_diff_reports_count_change() {
        let mut view = RopeBuffer::from_text("hello");
        let before = CursorSnapshot::capture(&view);
        view.set_cursors(vec![Region::point(1), Region::point(3)]);
        let diff = before.diff(&CursorSnapshot::capture(&view));
        assert_eq!(diff.as_deref(), Some("cursor count: 1 -> 2"));
    }
}
