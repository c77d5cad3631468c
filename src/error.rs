// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::portal::{Category, VehicleGroup};

/// Why one (category, group, year) collection failed.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A control or menu item never showed up. Fatal until the form contract is updated.
    #[error("portal layout changed: {what} not found ({xpath})")]
    PortalLayout { what: String, xpath: String },

    /// Results table never rendered. Retryable.
    #[error("no data or slow response: {0}")]
    Timeout(String),

    /// Driver/session/HTTP failure. Retryable.
    #[error("connectivity: {0}")]
    Connectivity(String),

    #[error("year {year} is not offered by the portal ({first}..={last})")]
    UnsupportedYear { year: i32, first: i32, last: i32 },

    #[error("vehicle group '{group}' does not apply to '{category}'")]
    UnsupportedGroup { category: Category, group: VehicleGroup },

    #[error("snapshot store: {0}")]
    Store(#[from] StoreError),
}

impl CollectError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollectError::Timeout(_) | CollectError::Connectivity(_))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a snapshot file name: {0}")]
    BadKey(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
