// src/data.rs
//
// Parsed snapshot data.
//
// - RegistrationTable: the wide table as the portal shows it (entity + count
//                      columns). Used for the on-screen table and CSV export.
// - RegistrationRecord: the long form {entity, period, count}. Charts and
//                       analyses only ever see these, whatever the category.
//
// Nothing here is persisted; a view rebuilds both from the snapshot file.

use std::fmt;

use crate::core::sanitize::is_total_label;
use crate::portal::Month;
use crate::specs;
use crate::store::SnapshotKey;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub entity: String,
    pub period: String,
    pub count: u64,
}

impl RegistrationRecord {
    pub fn new(entity: impl Into<String>, period: impl Into<String>, count: u64) -> Self {
        Self { entity: entity.into(), period: period.into(), count }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub entity: String,
    pub counts: Vec<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationTable {
    /// Label of column 0 ("Manufacturer", "Vehicle Class", ...).
    pub entity_header: String,
    /// Labels of the count columns, in source order.
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl RegistrationTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| is_total_label(c))
    }

    /// (month, column index) for every column labelled with a month, in month order.
    pub fn month_columns(&self) -> Vec<(Month, usize)> {
        let mut out: Vec<(Month, usize)> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| Month::from_header(c).map(|m| (m, i)))
            .collect();
        out.sort_by_key(|(m, _)| *m);
        out.dedup_by_key(|(m, _)| *m);
        out
    }

    /// Row total: the TOTAL column if present, else the last count column.
    pub fn row_total(&self, row: &TableRow) -> u64 {
        match self.total_column() {
            Some(i) => row.counts.get(i).copied().unwrap_or(0),
            None => row.counts.last().copied().unwrap_or(0),
        }
    }

    pub fn entities(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.entity.clone()).collect()
    }

    /// Keep rows whose entity is in `selected`; empty selection keeps all.
    pub fn filtered(&self, selected: &[String]) -> RegistrationTable {
        if selected.is_empty() {
            return self.clone();
        }
        RegistrationTable {
            entity_header: self.entity_header.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| selected.iter().any(|s| s == &r.entity))
                .cloned()
                .collect(),
        }
    }

    /// Keep the entity column, `keep` columns (by index) and TOTAL.
    pub fn project(&self, keep: &[usize]) -> RegistrationTable {
        let total = self.total_column();
        let mut cols: Vec<usize> = keep.to_vec();
        if let Some(t) = total {
            if !cols.contains(&t) { cols.push(t); }
        }
        RegistrationTable {
            entity_header: self.entity_header.clone(),
            columns: cols.iter().filter_map(|&i| self.columns.get(i).cloned()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| TableRow {
                    entity: r.entity.clone(),
                    counts: cols.iter().map(|&i| r.counts.get(i).copied().unwrap_or(0)).collect(),
                })
                .collect(),
        }
    }

    pub fn headers(&self) -> Vec<String> {
        let mut h = Vec::with_capacity(self.columns.len() + 1);
        h.push(self.entity_header.clone());
        h.extend(self.columns.iter().cloned());
        h
    }

    /// Stringly rows for the table widget / export.
    pub fn string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                let mut v = Vec::with_capacity(r.counts.len() + 1);
                v.push(r.entity.clone());
                v.extend(r.counts.iter().map(|c| c.to_string()));
                v
            })
            .collect()
    }
}

/// Something odd in a snapshot that didn't stop the parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning(pub String);

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParseWarning {
    fn from(s: String) -> Self { ParseWarning(s) }
}

impl From<&str> for ParseWarning {
    fn from(s: &str) -> Self { ParseWarning(s.to_string()) }
}

/// A parsed snapshot.
#[derive(Clone, Debug, Default)]
pub struct Parsed {
    pub table: RegistrationTable,
    pub records: Vec<RegistrationRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Extract the results table for `key.category` and reshape it.
pub fn parse_snapshot(markup: &str, key: &SnapshotKey) -> Parsed {
    let extracted = specs::extractor_for(key.category).extract(markup);
    let records = reshape(&extracted.table, key);
    Parsed { table: extracted.table, records, warnings: extracted.warnings }
}

/// Wide → long.
/// - Month-wise: one record per (entity, month column), period = "Jan".."Dec".
/// - Otherwise: one record per entity, period = year, count = row total.
pub fn reshape(table: &RegistrationTable, key: &SnapshotKey) -> Vec<RegistrationRecord> {
    if key.category.is_month_wise() {
        let months = table.month_columns();
        let mut out = Vec::with_capacity(table.rows.len() * months.len());
        for row in &table.rows {
            for (m, ci) in &months {
                let count = row.counts.get(*ci).copied().unwrap_or(0);
                out.push(RegistrationRecord::new(row.entity.clone(), m.label(), count));
            }
        }
        out
    } else {
        let period = key.year.to_string();
        table
            .rows
            .iter()
            .map(|row| RegistrationRecord::new(row.entity.clone(), period.clone(), table.row_total(row)))
            .collect()
    }
}
