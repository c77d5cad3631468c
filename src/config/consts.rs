// src/config/consts.rs

// Portal
pub const PORTAL_URL: &str =
    "https://vahan.parivahan.gov.in/vahan4dashboard/vahan/view/reportview.xhtml";
pub const PORTAL_FIRST_YEAR: i32 = 2003;

// WebDriver (chromedriver default port)
pub const DEFAULT_DRIVER_URL: &str = "http://localhost:9515";
pub const CONTROL_WAIT_MS: u64 = 20_000;
pub const RESULTS_WAIT_MS: u64 = 30_000;
pub const POLL_INTERVAL_MS: u64 = 250;
pub const SETTLE_MS: u64 = 5_000;
pub const HTTP_TIMEOUT_SECS: u64 = 60;

// Collect
pub const DEFAULT_YEARS: [i32; 3] = [2023, 2024, 2025];
pub const WORKERS: usize = 1;
pub const RETRIES: u32 = 1;
pub const BACKOFF_MS: u64 = 1_500;

// Snapshot store
pub const SNAPSHOT_DIR: &str = "snapshots";
pub const SNAPSHOT_EXT: &str = "html";

// Local app data (log file)
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "vahan.toml";

// Dashboard window
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 800.0;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
