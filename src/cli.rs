// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};

use crate::collect::{self, RetryPolicy};
use crate::config::options::AppOptions;
use crate::portal::{Category, VehicleGroup};
use crate::progress::CliProgress;
use crate::store::SnapshotStore;
use crate::webdriver::{DriverConfig, WebDriverFetcher};

/// Save Vahan report pages as HTML snapshots.
///
/// Needs a running chromedriver (default http://localhost:9515).
#[derive(Parser, Debug)]
#[command(name = "collect", version, about)]
pub struct Args {
    /// Years: "2024", "2023-2025" or "2019,2021-2023"
    #[arg(long, value_parser = parse_years)]
    pub years: Option<YearList>,

    /// Category to collect (repeatable). Default: all four
    #[arg(long = "category", value_parser = parse_category)]
    pub categories: Vec<Category>,

    /// Vehicle group (repeatable): all, 2w, 3w, 4w. Default: all
    #[arg(long = "group", value_parser = parse_group)]
    pub groups: Vec<VehicleGroup>,

    /// Snapshot directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// WebDriver URL
    #[arg(long)]
    pub driver: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Parallel browser sessions
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Retries per snapshot on timeout/connectivity errors
    #[arg(long)]
    pub retries: Option<u32>,

    /// Config file (default: ./vahan.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the plan and exit
    #[arg(long)]
    pub dry_run: bool,

    /// List snapshots already on disk and exit
    #[arg(long)]
    pub list: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearList(pub Vec<i32>);

pub fn parse_years(s: &str) -> Result<YearList, String> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() { continue; }
        if let Some((a, b)) = part.split_once('-') {
            let a: i32 = a.trim().parse().map_err(|_| format!("bad year: {a}"))?;
            let b: i32 = b.trim().parse().map_err(|_| format!("bad year: {b}"))?;
            if a > b { return Err(format!("invalid range: {part}")); }
            out.extend(a..=b);
        } else {
            out.push(part.parse().map_err(|_| format!("bad year: {part}"))?);
        }
    }
    if out.is_empty() {
        return Err("no years given".into());
    }
    out.sort_unstable();
    out.dedup();
    Ok(YearList(out))
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
        format!("unknown category '{s}' (one of: {})", known.join(", "))
    })
}

fn parse_group(s: &str) -> Result<VehicleGroup, String> {
    VehicleGroup::parse(s).ok_or_else(|| format!("unknown vehicle group '{s}' (all, 2w, 3w, 4w)"))
}

/// File options, then flags on top.
pub fn resolve_options(args: &Args) -> color_eyre::Result<AppOptions> {
    let mut opts = AppOptions::load(args.config.as_deref()).wrap_err("loading configuration")?;
    let c = &mut opts.collect;

    if let Some(YearList(years)) = &args.years { c.years = years.clone(); }
    if !args.categories.is_empty() { c.categories = args.categories.clone(); }
    if !args.groups.is_empty() { c.groups = args.groups.clone(); }
    if let Some(d) = &args.driver { c.driver_url = d.clone(); }
    if args.headed { c.headless = false; }
    if let Some(w) = args.workers { c.workers = w; }
    if let Some(r) = args.retries { c.retries = r; }
    if let Some(o) = &args.out { opts.snapshot_dir = o.clone(); }

    opts.validate()?;
    Ok(opts)
}

/// `Ok(true)` when every planned snapshot was written.
pub fn run(args: Args) -> color_eyre::Result<bool> {
    let opts = resolve_options(&args)?;
    let store = SnapshotStore::new(&opts.snapshot_dir);

    if args.list {
        for key in store.keys()? {
            println!("{}\t{}", key.file_name(), key);
        }
        return Ok(true);
    }

    let keys = collect::plan(&opts.collect);
    if args.dry_run {
        for key in &keys {
            let note = match collect::validate_key(key) {
                Err(e) => format!("  (will fail: {e})"),
                Ok(()) if store.contains(key) => "  (replaces existing)".to_string(),
                Ok(()) => String::new(),
            };
            println!("{} → {}{}", key, store.path_for(key).display(), note);
        }
        return Ok(true);
    }

    let cfg = DriverConfig::from(&opts.collect);
    let policy = RetryPolicy::from_options(&opts.collect);
    let mut progress = CliProgress::new();

    let summary = collect::run(
        &keys,
        &store,
        opts.collect.workers,
        policy,
        || WebDriverFetcher::new(cfg.clone()),
        Some(&mut progress),
    );

    if summary.written.is_empty() && !summary.failed.is_empty() {
        let (key, first) = &summary.failed[0];
        return Err(eyre!("nothing collected; first failure: {key}: {first}"));
    }
    Ok(summary.is_success())
}
