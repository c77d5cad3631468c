// src/log.rs
//! File log under `.store/debug.log`, via `tracing`.
//!
//! `init()` is called once by each binary. Before (or without) it, the
//! `logf!`/`logd!`/`logw!`/`loge!` macros are no-ops, so library code and
//! tests can log freely.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::consts::{LOG_FILE, STORE_DIR};

static INIT: OnceLock<PathBuf> = OnceLock::new();

/// Install the subscriber. Returns the log path. Idempotent once it succeeded.
/// Filter comes from `RUST_LOG`, default `info`.
pub fn init() -> std::io::Result<PathBuf> {
    if let Some(p) = INIT.get() {
        return Ok(p.clone());
    }
    init_at(&Path::new(STORE_DIR).join(LOG_FILE))
}

pub fn init_at(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .try_init();

    if let Err(e) = installed {
        let msg = match INIT.get() {
            Some(current) => format!("already logging to {}", current.display()),
            None => format!("another tracing subscriber is installed: {e}"),
        };
        return Err(std::io::Error::other(msg));
    }
    Ok(INIT.get_or_init(|| path.to_path_buf()).clone())
}

/// Where the log is going, once `init`/`init_at` succeeded.
pub fn installed() -> Option<&'static Path> {
    INIT.get().map(PathBuf::as_path)
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!("{}", format_args!($($arg)*))
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!("{}", format_args!($($arg)*))
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!("{}", format_args!($($arg)*))
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!("{}", format_args!($($arg)*))
    };
}
