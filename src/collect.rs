// src/collect.rs
//! The collect run: plan (category, group, year) jobs, fetch each page,
//! write each snapshot.
//!
//! Workers each own a `PageFetcher` (one browser session each) and pull job
//! indices from a shared counter. Results go back over a channel; this thread
//! is the only one writing to the store. A failed job is logged and counted;
//! the run carries on with the next one.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Duration,
};

use chrono::{Datelike, Local};

use crate::{
    config::{consts::PORTAL_FIRST_YEAR, options::CollectOptions},
    error::CollectError,
    portal::VehicleGroup,
    progress::Progress,
    store::{SnapshotKey, SnapshotStore},
};

/// Gets the rendered report page for one key.
/// Implementations never touch the store.
pub trait PageFetcher {
    fn fetch(&mut self, key: &SnapshotKey) -> Result<String, CollectError>;
}

/// Years the portal offers: first year through the current one.
pub fn supported_years() -> std::ops::RangeInclusive<i32> {
    PORTAL_FIRST_YEAR..=Local::now().year()
}

pub fn validate_key(key: &SnapshotKey) -> Result<(), CollectError> {
    let years = supported_years();
    if !years.contains(&key.year) {
        return Err(CollectError::UnsupportedYear { year: key.year, first: *years.start(), last: *years.end() });
    }
    if !key.group.applies_to(key.category) {
        return Err(CollectError::UnsupportedGroup { category: key.category, group: key.group });
    }
    Ok(())
}

/// Categories × years, plus groups for the categories that take one.
/// Order: category, then group, then year.
pub fn plan(opts: &CollectOptions) -> Vec<SnapshotKey> {
    let mut out = Vec::new();
    for &category in &opts.categories {
        for &group in &opts.groups {
            if group != VehicleGroup::All && !group.applies_to(category) {
                continue;
            }
            for &year in &opts.years {
                let key = SnapshotKey::with_group(category, group, year);
                if !out.contains(&key) {
                    out.push(key);
                }
            }
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct CollectSummary {
    pub written: Vec<SnapshotKey>,
    pub failed: Vec<(SnapshotKey, CollectError)>,
}

impl CollectSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Retry knobs; `Timeout` and `Connectivity` only.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_options(opts: &CollectOptions) -> Self {
        Self { retries: opts.retries, backoff: Duration::from_millis(opts.backoff_ms) }
    }

    /// Delay before attempt `n` (1-based retry count): backoff, 2×, 4×, ...
    pub fn delay(&self, n: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << n.saturating_sub(1).min(16))
    }
}

/// One job, with retries.
pub fn fetch_with_retry<F: PageFetcher + ?Sized>(
    fetcher: &mut F,
    key: &SnapshotKey,
    policy: RetryPolicy,
) -> Result<String, CollectError> {
    validate_key(key)?;
    let mut attempt = 0u32;
    loop {
        match fetcher.fetch(key) {
            Ok(markup) => return Ok(markup),
            Err(e) if e.is_retryable() && attempt < policy.retries => {
                attempt += 1;
                let wait = policy.delay(attempt);
                logw!("Collect {}: {} (retry {}/{} in {:?})", key, e, attempt, policy.retries, wait);
                thread::sleep(wait);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run every planned job. `make_fetcher` is called once per worker, on that
/// worker's thread.
pub fn run<F, M>(
    keys: &[SnapshotKey],
    store: &SnapshotStore,
    workers: usize,
    policy: RetryPolicy,
    make_fetcher: M,
    mut progress: Option<&mut dyn Progress>,
) -> CollectSummary
where
    F: PageFetcher,
    M: Fn() -> F + Sync,
{
    let mut summary = CollectSummary::default();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(keys.len());
    }
    if keys.is_empty() {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Nothing to collect.");
            p.finish();
        }
        return summary;
    }

    logf!("Collect: begin {} job(s), {} worker(s), into {}", keys.len(), workers, store.dir().display());

    let counter = Arc::new(AtomicUsize::new(0));
    let (res_tx, res_rx) = mpsc::channel::<(SnapshotKey, Result<String, CollectError>)>();
    let workers = workers.min(keys.len()).max(1);

    thread::scope(|s| {
        for _ in 0..workers {
            let idx = Arc::clone(&counter);
            let tx = res_tx.clone();
            let make = &make_fetcher;

            s.spawn(move || {
                let mut fetcher = make();
                loop {
                    let i = idx.fetch_add(1, Ordering::Relaxed);
                    let Some(key) = keys.get(i) else { break };
                    let result = fetch_with_retry(&mut fetcher, key, policy);
                    if tx.send((*key, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(res_tx); // this thread is the sole receiver now

        for (key, result) in res_rx.iter() {
            let outcome = result.and_then(|markup| store.put(&key, &markup).map_err(CollectError::from));
            match outcome {
                Ok(path) => {
                    logf!("Collect {}: saved {}", key, path.display());
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(&key);
                    }
                    summary.written.push(key);
                }
                Err(e) => {
                    loge!("Collect {}: {}", key, e);
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(&key, &e.to_string());
                    }
                    summary.failed.push((key, e));
                }
            }
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    logf!("Collect: end, {} saved, {} failed", summary.written.len(), summary.failed.len());
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::Category;

    #[test]
    fn plan_skips_groups_for_month_wise() {
        let opts = CollectOptions {
            categories: vec![Category::Manufacturer, Category::ManufacturerMonthWise],
            groups: vec![VehicleGroup::All, VehicleGroup::TwoWheeler],
            years: vec![2024],
            ..Default::default()
        };
        let keys = plan(&opts);
        assert_eq!(keys, vec![
            SnapshotKey::new(Category::Manufacturer, 2024),
            SnapshotKey::with_group(Category::Manufacturer, VehicleGroup::TwoWheeler, 2024),
            SnapshotKey::new(Category::ManufacturerMonthWise, 2024),
        ]);
    }

    #[test]
    fn backoff_doubles() {
        let p = RetryPolicy { retries: 3, backoff: Duration::from_millis(100) };
        assert_eq!(p.delay(1), Duration::from_millis(100));
        assert_eq!(p.delay(3), Duration::from_millis(400));
    }

    #[test]
    fn out_of_range_years_rejected() {
        let k = SnapshotKey::new(Category::Manufacturer, 1999);
        assert!(matches!(validate_key(&k), Err(CollectError::UnsupportedYear { .. })));
        let k = SnapshotKey::new(Category::Manufacturer, Local::now().year() + 1);
        assert!(matches!(validate_key(&k), Err(CollectError::UnsupportedYear { .. })));
    }
}
