// src/store.rs
//! Snapshot store: one HTML file per (category, group, year) in a directory.
//!
//! File names are the only index:
//! - `<category>_<year>.html` for group `All`
//! - `<group>_<category>_<year>.html` otherwise
//!
//! Single writer (a collect run), single reader (the dashboard). Reading a file
//! while a collect run replaces it is not supported; `put` renames a finished
//! temp file into place, so a reader sees either the old or the new snapshot.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Local};

use crate::config::consts::SNAPSHOT_EXT;
use crate::error::StoreError;
use crate::portal::{Category, VehicleGroup};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey {
    pub category: Category,
    pub group: VehicleGroup,
    pub year: i32,
}

impl SnapshotKey {
    /// Key for the whole report (no vehicle group filter).
    pub fn new(category: Category, year: i32) -> Self {
        Self { category, group: VehicleGroup::All, year }
    }

    pub fn with_group(category: Category, group: VehicleGroup, year: i32) -> Self {
        Self { category, group, year }
    }

    pub fn file_name(&self) -> String {
        match self.group.slug() {
            None => format!("{}_{}.{}", self.category.slug(), self.year, SNAPSHOT_EXT),
            Some(g) => format!("{}_{}_{}.{}", g, self.category.slug(), self.year, SNAPSHOT_EXT),
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(SNAPSHOT_EXT)?.strip_suffix('.')?;
        let (rest, year) = stem.rsplit_once('_')?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = year.parse().ok()?;

        for group in VehicleGroup::ALL {
            let cat_part = match group.slug() {
                None => Some(rest),
                Some(g) => rest.strip_prefix(g).and_then(|r| r.strip_prefix('_')),
            };
            if let Some(category) = cat_part.and_then(Category::from_slug) {
                return Some(Self { category, group, year });
            }
        }
        None
    }

    /// Same report, other year.
    pub fn at_year(&self, year: i32) -> Self {
        Self { year, ..*self }
    }
}

impl std::str::FromStr for SnapshotKey {
    type Err = StoreError;

    /// From a snapshot file name (`manufacturer_2024.html`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_file_name(s).ok_or_else(|| StoreError::BadKey(s.to_string()))
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.group {
            VehicleGroup::All => write!(f, "{} {}", self.category, self.year),
            g => write!(f, "{} ({}) {}", self.category, g, self.year),
        }
    }
}

/// One saved page.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub key: SnapshotKey,
    pub markup: String,
    pub retrieved_at: Option<SystemTime>,
}

impl Snapshot {
    pub fn retrieved_local(&self) -> Option<DateTime<Local>> {
        self.retrieved_at.map(DateTime::<Local>::from)
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Overwrite-or-create. Writes `<name>.tmp` first, then renames it in.
    pub fn put(&self, key: &SnapshotKey, markup: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.tmp", key.file_name()));

        if let Err(e) = fs::write(&tmp, markup) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&path, e));
        }
        logd!("Store: wrote {} ({} bytes)", path.display(), markup.len());
        Ok(path)
    }

    /// Markup, or `None` when the key was never collected.
    pub fn get(&self, key: &SnapshotKey) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Markup plus retrieval time (file mtime).
    pub fn load(&self, key: &SnapshotKey) -> Result<Option<Snapshot>, StoreError> {
        let Some(markup) = self.get(key)? else { return Ok(None) };
        let retrieved_at = fs::metadata(self.path_for(key)).ok().and_then(|m| m.modified().ok());
        Ok(Some(Snapshot { key: *key, markup, retrieved_at }))
    }

    pub fn contains(&self, key: &SnapshotKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Every parseable snapshot key in the directory, sorted.
    /// A missing directory is an empty store.
    pub fn keys(&self) -> Result<Vec<SnapshotKey>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            if !entry.path().is_file() { continue; }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            match SnapshotKey::from_file_name(name) {
                Some(k) => keys.push(k),
                None => logd!("Store: ignoring {}", name),
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Years present for a category (whole-report snapshots), ascending.
    pub fn list(&self, category: Category) -> Result<Vec<i32>, StoreError> {
        self.list_group(category, VehicleGroup::All)
    }

    pub fn list_group(&self, category: Category, group: VehicleGroup) -> Result<Vec<i32>, StoreError> {
        let mut years: Vec<i32> = self
            .keys()?
            .into_iter()
            .filter(|k| k.category == category && k.group == group)
            .map(|k| k.year)
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }
}
