// tests/export_table.rs
use std::fs;

use vahan_dash::config::options::{ExportFormat, ExportOptions};
use vahan_dash::data::{RegistrationRecord, RegistrationTable, TableRow};
use vahan_dash::error::ExportError;
use vahan_dash::file::{export_records, export_table, table_to_string, write_records};

fn table() -> RegistrationTable {
    RegistrationTable {
        entity_header: "Manufacturer".into(),
        columns: vec!["2WN".into(), "TOTAL".into()],
        rows: vec![
            TableRow { entity: "HERO, LTD".into(), counts: vec![10, 10] },
            TableRow { entity: "TVS".into(), counts: vec![5, 5] },
        ],
    }
}

#[test]
fn csv_export_quotes_and_creates_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = ExportOptions { out_dir: tmp.path().join("a/b"), ..Default::default() };

    let path = export_table(&opts, "manufacturer_2024", &table()).unwrap();
    assert_eq!(path, tmp.path().join("a/b/manufacturer_2024.csv"));
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text, "Manufacturer,2WN,TOTAL\n\"HERO, LTD\",10,10\nTVS,5,5\n");
}

#[test]
fn tsv_without_headers() {
    let txt = table_to_string(&table(), false, ExportFormat::Tsv.delim()).unwrap();
    // comma is not special with a tab delimiter
    assert_eq!(txt, "HERO, LTD\t10\t10\nTVS\t5\t5\n");
}

#[test]
fn empty_table_and_file_in_the_way() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = ExportOptions { out_dir: tmp.path().to_path_buf(), ..Default::default() };
    assert!(matches!(export_table(&opts, "x", &RegistrationTable::default()), Err(ExportError::Empty)));

    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let opts = ExportOptions { out_dir: blocker, ..Default::default() };
    assert!(matches!(export_table(&opts, "x", &table()), Err(ExportError::NotADirectory(_))));
}

#[test]
fn long_form_records() {
    let mut buf = Vec::new();
    write_records(&mut buf, &[RegistrationRecord::new("Maruti", "2024", 1200)], true, b',').unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "entity,period,count\nMaruti,2024,1200\n");
}

#[test]
fn records_export_sits_next_to_the_table() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = ExportOptions { out_dir: tmp.path().to_path_buf(), format: ExportFormat::Tsv, ..Default::default() };
    let records = [RegistrationRecord::new("HERO", "Jan", 10), RegistrationRecord::new("HERO", "Feb", 20)];

    let path = export_records(&opts, "manufacturer_month_wise_2025", &records).unwrap();
    assert_eq!(path, tmp.path().join("manufacturer_month_wise_2025_records.tsv"));
    assert_eq!(fs::read_to_string(path).unwrap(), "entity\tperiod\tcount\nHERO\tJan\t10\nHERO\tFeb\t20\n");

    assert!(matches!(export_records(&opts, "x", &[]), Err(ExportError::Empty)));
}
