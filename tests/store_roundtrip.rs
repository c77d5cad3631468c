// tests/store_roundtrip.rs
use std::fs;

use tempfile::TempDir;
use vahan_dash::portal::{Category, VehicleGroup};
use vahan_dash::store::{SnapshotKey, SnapshotStore};

fn store() -> (TempDir, SnapshotStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("snapshots"));
    (dir, store)
}

#[test]
fn get_returns_what_put_stored() {
    let (_tmp, store) = store();
    for category in Category::ALL {
        for group in VehicleGroup::ALL {
            for year in [2003, 2024] {
                let key = SnapshotKey::with_group(category, group, year);
                let markup = format!("<html><body>{key} ✓ &nbsp;</body></html>");
                store.put(&key, &markup).unwrap();
                assert_eq!(store.get(&key).unwrap().as_deref(), Some(markup.as_str()));
            }
        }
    }
}

#[test]
fn put_overwrites_and_leaves_no_temp_files() {
    let (_tmp, store) = store();
    let key = SnapshotKey::new(Category::Manufacturer, 2024);
    store.put(&key, "old").unwrap();
    let path = store.put(&key, "new").unwrap();

    assert_eq!(path.file_name().unwrap(), "manufacturer_2024.html");
    assert_eq!(store.get(&key).unwrap().as_deref(), Some("new"));

    let names: Vec<String> = fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["manufacturer_2024.html".to_string()]);
}

#[test]
fn missing_key_is_not_found_not_an_error() {
    let (_tmp, store) = store();
    let key = SnapshotKey::new(Category::VehicleCategory, 2024);
    assert_eq!(store.get(&key).unwrap(), None);
    assert!(store.load(&key).unwrap().is_none());
    assert!(store.list(Category::VehicleCategory).unwrap().is_empty());
}

#[test]
fn list_only_reports_collected_years() {
    let (_tmp, store) = store();
    for y in [2025, 2023, 2024] {
        store.put(&SnapshotKey::new(Category::Manufacturer, y), "x").unwrap();
    }
    store
        .put(&SnapshotKey::with_group(Category::Manufacturer, VehicleGroup::TwoWheeler, 2022), "x")
        .unwrap();
    store.put(&SnapshotKey::new(Category::VehicleCategory, 2021), "x").unwrap();
    fs::write(store.dir().join("notes.txt"), "ignore me").unwrap();
    fs::write(store.dir().join("manufacturer_2020.html.tmp"), "half").unwrap();

    let years = store.list(Category::Manufacturer).unwrap();
    assert_eq!(years, vec![2023, 2024, 2025]);
    assert!(!years.contains(&2026));

    assert_eq!(store.list_group(Category::Manufacturer, VehicleGroup::TwoWheeler).unwrap(), vec![2022]);
    assert_eq!(store.keys().unwrap().len(), 5);
}

#[test]
fn load_carries_retrieval_time() {
    let (_tmp, store) = store();
    let key = SnapshotKey::new(Category::ManufacturerMonthWise, 2025);
    store.put(&key, "<html/>").unwrap();
    let snap = store.load(&key).unwrap().unwrap();
    assert_eq!(snap.key, key);
    assert!(snap.retrieved_local().is_some());
}
