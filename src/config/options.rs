// src/config/options.rs
//! Runtime options, optionally read from `vahan.toml`.
//!
//! ```toml
//! snapshot_dir = "snapshots"
//!
//! [collect]
//! years = [2023, 2024, 2025]
//! categories = ["manufacturer", "vehicle_category_month_wise"]
//! groups = ["all", "two_wheeler"]
//! driver_url = "http://localhost:9515"
//! headless = true
//! workers = 2
//!
//! [export]
//! out_dir = "out"
//! format = "tsv"
//! ```
//! Every key is optional; CLI flags override what the file says.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::error::ConfigError;
use crate::portal::{Category, VehicleGroup};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppOptions {
    pub snapshot_dir: PathBuf,
    pub collect: CollectOptions,
    pub dashboard: DashboardOptions,
    pub export: ExportOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from(SNAPSHOT_DIR),
            collect: CollectOptions::default(),
            dashboard: DashboardOptions::default(),
            export: ExportOptions::default(),
        }
    }
}

impl AppOptions {
    /// `Some(path)` must exist. `None` reads `vahan.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let opts = Self::from_toml(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        opts.validate()?;
        logd!("Config: loaded {}", path.display());
        Ok(opts)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collect.validate()?;
        self.dashboard.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectOptions {
    pub categories: Vec<Category>,
    /// Only applied to categories that take a group.
    pub groups: Vec<VehicleGroup>,
    pub years: Vec<i32>,

    pub portal_url: String,
    pub driver_url: String,
    pub headless: bool,

    pub workers: usize,
    pub retries: u32,
    pub backoff_ms: u64,

    pub control_wait_ms: u64,
    pub results_wait_ms: u64,
    pub settle_ms: u64,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
            groups: vec![VehicleGroup::All],
            years: DEFAULT_YEARS.to_vec(),
            portal_url: PORTAL_URL.to_string(),
            driver_url: DEFAULT_DRIVER_URL.to_string(),
            headless: true,
            workers: WORKERS,
            retries: RETRIES,
            backoff_ms: BACKOFF_MS,
            control_wait_ms: CONTROL_WAIT_MS,
            results_wait_ms: RESULTS_WAIT_MS,
            settle_ms: SETTLE_MS,
        }
    }
}

impl CollectOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.years.is_empty() {
            return Err(ConfigError::Invalid("no years to collect".into()));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("no categories to collect".into()));
        }
        if self.groups.is_empty() {
            return Err(ConfigError::Invalid("no vehicle groups (use \"all\")".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardOptions {
    /// Category selected at startup.
    pub category: Category,
    pub group: VehicleGroup,
    /// Bars shown before the chart folds the rest into "Others".
    pub chart_top_n: usize,
    /// Initial window size, logical points.
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            category: Category::VehicleCategory,
            group: VehicleGroup::All,
            chart_top_n: 15,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
        }
    }
}

impl DashboardOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.group.applies_to(self.category) {
            return Err(ConfigError::Invalid(format!(
                "dashboard: vehicle group {} does not apply to {}",
                self.group, self.category
            )));
        }
        if !(self.window_width >= 400.0 && self.window_height >= 300.0) {
            return Err(ConfigError::Invalid("dashboard: window must be at least 400x300".into()));
        }
        Ok(())
    }

    pub fn window_size(&self) -> [f32; 2] {
        [self.window_width, self.window_height]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { out_dir: PathBuf::from(DEFAULT_OUT_DIR), format: ExportFormat::Csv, include_headers: true }
    }
}

impl ExportOptions {
    /// `<out_dir>/<stem>.<ext>`; `stem` should already be file-name safe.
    pub fn out_path(&self, stem: &str) -> PathBuf {
        self.out_dir.join(format!("{stem}.{}", self.format.ext()))
    }
}
