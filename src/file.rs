// src/file.rs
//! CSV/TSV export of what the dashboard shows.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::config::options::ExportOptions;
use crate::data::{RegistrationRecord, RegistrationTable};
use crate::error::ExportError;

/// Write the wide table to `<out_dir>/<stem>.<ext>`. Returns the path written.
pub fn export_table(
    export: &ExportOptions,
    stem: &str,
    table: &RegistrationTable,
) -> Result<PathBuf, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }
    ensure_directory(&export.out_dir)?;

    let path = export.out_path(stem);
    let file = File::create(&path)?; // truncate/overwrite
    write_table(file, table, export.include_headers, export.format.delim())?;
    logf!("Export: {} rows → {}", table.rows.len(), path.display());
    Ok(path)
}

/// Long form (`entity,period,count`) to `<out_dir>/<stem>_records.<ext>`.
pub fn export_records(
    export: &ExportOptions,
    stem: &str,
    records: &[RegistrationRecord],
) -> Result<PathBuf, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    ensure_directory(&export.out_dir)?;

    let path = export.out_path(&format!("{stem}_records"));
    let file = File::create(&path)?;
    write_records(file, records, export.include_headers, export.format.delim())?;
    logf!("Export: {} records → {}", records.len(), path.display());
    Ok(path)
}

pub fn write_table<W: Write>(
    out: W,
    table: &RegistrationTable,
    include_headers: bool,
    delim: u8,
) -> Result<(), ExportError> {
    let mut w = csv::WriterBuilder::new().delimiter(delim).from_writer(out);
    if include_headers {
        w.write_record(table.headers())?;
    }
    for row in table.string_rows() {
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Long form: `entity,period,count`.
pub fn write_records<W: Write>(
    out: W,
    records: &[RegistrationRecord],
    include_headers: bool,
    delim: u8,
) -> Result<(), ExportError> {
    let mut w = csv::WriterBuilder::new().delimiter(delim).from_writer(out);
    if include_headers {
        w.write_record(["entity", "period", "count"])?;
    }
    for r in records {
        let count = r.count.to_string();
        w.write_record([r.entity.as_str(), r.period.as_str(), count.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Table as text, for the clipboard.
pub fn table_to_string(table: &RegistrationTable, include_headers: bool, delim: u8) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_table(&mut buf, table, include_headers, delim)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
