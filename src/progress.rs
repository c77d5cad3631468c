// src/progress.rs
use std::io::Write;

use crate::store::SnapshotKey;

/// Lightweight progress reporting used by long-running operations (collect runs).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of snapshots planned.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One snapshot written.
    fn item_done(&mut self, _key: &SnapshotKey) {}

    /// One snapshot given up on (after retries).
    fn item_failed(&mut self, _key: &SnapshotKey, _error: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Prints one line per event to stderr.
#[derive(Default)]
pub struct CliProgress {
    done: usize,
    failed: usize,
    total: usize,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&self, msg: std::fmt::Arguments<'_>) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "[{}/{}] {}", self.done + self.failed, self.total, msg);
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Collecting {total} snapshot(s)…");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, key: &SnapshotKey) {
        self.done += 1;
        self.line(format_args!("saved {key}"));
    }
    fn item_failed(&mut self, key: &SnapshotKey, error: &str) {
        self.failed += 1;
        self.line(format_args!("FAILED {key}: {error}"));
    }
    fn finish(&mut self) {
        eprintln!("Done: {} saved, {} failed.", self.done, self.failed);
    }
}
