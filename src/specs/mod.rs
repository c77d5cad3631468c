// src/specs/mod.rs
//! # Table extractors
//!
//! `specs` knows how to read the saved report pages. One extractor per
//! category, each answering: which table is the report, which column is the
//! entity, and what the count columns mean.
//!
//! ## What lives here
//! - **Pure HTML parsing** of snapshot markup (`grid` turns tables into text grids).
//! - **Table choice**: the grid with a `TOTAL` header and the most rows; the
//!   positional rule (sixth table, else last) only as a fallback.
//! - **Light shaping** into a `RegistrationTable`: serial column dropped,
//!   thousands separators stripped, total rows dropped, odd cells coerced to 0.
//!
//! ## What does **not** live here
//! - Reading files (`store`), reshaping to records (`data::reshape`), charts or
//!   comparisons (`analysis`, `gui`).
//!
//! ## Conventions
//! - Never fail: anything unexpected becomes a `ParseWarning` and the rows that
//!   did parse are kept.
//! - Portal layout drift should only ever need a change in this module.

use crate::core::sanitize::{is_serial_header, is_total_label, parse_count};
use crate::data::{ParseWarning, RegistrationTable, TableRow};
use crate::portal::Category;

pub mod grid;
pub mod month_wise;
pub mod yearly;

/// Output of one extractor run.
#[derive(Clone, Debug, Default)]
pub struct Extracted {
    pub table: RegistrationTable,
    pub warnings: Vec<ParseWarning>,
}

pub trait TableExtractor: Send + Sync {
    /// Pull the report table out of a whole page.
    fn extract(&self, markup: &str) -> Extracted;
}

pub fn extractor_for(category: Category) -> &'static dyn TableExtractor {
    match category {
        Category::Manufacturer => &yearly::MANUFACTURER,
        Category::VehicleCategory => &yearly::VEHICLE_CATEGORY,
        Category::ManufacturerMonthWise => &month_wise::MANUFACTURER,
        Category::VehicleCategoryMonthWise => &month_wise::VEHICLE_CATEGORY,
    }
}

/// Locate + shape; shared by all extractors.
pub(crate) fn locate_and_shape(markup: &str, category: Category) -> Extracted {
    let mut warnings = Vec::new();
    let tables = grid::read_tables(markup);

    let Some((idx, warn)) = grid::pick_results(&tables) else {
        warnings.push(ParseWarning::from("no tables found in snapshot"));
        return Extracted {
            table: RegistrationTable { entity_header: category.entity_label().into(), ..Default::default() },
            warnings,
        };
    };
    if let Some(w) = warn {
        logw!("Parse: {:?}: {}", category, w);
        warnings.push(w);
    }

    let table = shape(&tables[idx], category.entity_label(), &mut warnings);
    Extracted { table, warnings }
}

/// True when most non-empty cells of column 0 are integers.
fn looks_serial(body: &[Vec<String>]) -> bool {
    let firsts: Vec<&str> = body
        .iter()
        .filter_map(|r| r.first().map(|s| s.as_str()))
        .filter(|s| !s.is_empty())
        .collect();
    if firsts.is_empty() {
        return false;
    }
    let ints = firsts.iter().filter(|s| s.trim_end_matches('.').parse::<u64>().is_ok()).count();
    ints * 2 >= firsts.len()
}

pub(crate) fn shape(raw: &grid::RawTable, entity_header: &str, warnings: &mut Vec<ParseWarning>) -> RegistrationTable {
    let width = if raw.header.is_empty() {
        raw.body.iter().map(|r| r.len()).max().unwrap_or(0)
    } else {
        raw.header.len()
    };

    let header_says_serial = raw.header.first().map(|h| is_serial_header(h)).unwrap_or(true);
    let off = usize::from(header_says_serial && looks_serial(&raw.body));

    let mut table = RegistrationTable {
        entity_header: entity_header.to_string(),
        ..Default::default()
    };

    if width < off + 2 {
        warnings.push(ParseWarning::from("results table has no count columns"));
        return table;
    }

    let ncols = width - off - 1;
    table.columns = (off + 1..width)
        .map(|i| match raw.header.get(i) {
            Some(h) if !h.is_empty() => h.clone(),
            _ => format!("Col {}", i + 1),
        })
        .collect();

    let mut coerced = 0usize;
    let mut too_long = 0usize;

    for (ri, row) in raw.body.iter().enumerate() {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        // "Total" may sit in the serial cell when it spans both columns
        if row.iter().take(off + 1).any(|c| is_total_label(c)) {
            continue;
        }
        let cells = row.get(off..).unwrap_or(&[]);
        let entity = cells.first().cloned().unwrap_or_default();

        if entity.is_empty() {
            warnings.push(ParseWarning(format!("row {}: empty {} cell; skipped", ri + 1, entity_header)));
            continue;
        }
        if cells.len() < ncols + 1 {
            warnings.push(ParseWarning(format!(
                "row {} ({}): expected {} cells, found {}; skipped",
                ri + 1, entity, ncols + 1, cells.len()
            )));
            continue;
        }
        if cells.len() > ncols + 1 {
            too_long += 1;
        }

        let counts = cells[1..=ncols]
            .iter()
            .map(|c| match parse_count(c) {
                Some(v) => v,
                None => {
                    if !c.is_empty() { coerced += 1; }
                    0
                }
            })
            .collect();
        table.rows.push(TableRow { entity, counts });
    }

    if coerced > 0 {
        warnings.push(ParseWarning(format!("{coerced} non-numeric cell(s) counted as 0")));
    }
    if too_long > 0 {
        warnings.push(ParseWarning(format!("{too_long} row(s) had more cells than headers; extra cells ignored")));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid::RawTable;

    fn raw(header: &[&str], body: &[&[&str]]) -> RawTable {
        RawTable {
            header: header.iter().map(|s| s.to_string()).collect(),
            body: body.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
        }
    }

    #[test]
    fn serial_column_dropped_only_when_numbered() {
        let mut w = Vec::new();
        let t = shape(&raw(&["S No", "Maker", "TOTAL"], &[&["1", "A", "5"], &["2", "B", "6"]]), "Manufacturer", &mut w);
        assert_eq!(t.columns, vec!["TOTAL"]);
        assert_eq!(t.rows[1], TableRow { entity: "B".into(), counts: vec![6] });

        // Empty first header but names in column 0: keep it as the entity.
        let t = shape(&raw(&["", "TOTAL"], &[&["A", "5"]]), "Manufacturer", &mut w);
        assert_eq!(t.rows[0].entity, "A");
        assert!(w.is_empty());
    }

    #[test]
    fn short_rows_skipped_with_warning() {
        let mut w = Vec::new();
        let t = shape(&raw(&["Maker", "2WN", "TOTAL"], &[&["A", "1", "1"], &["B", "2"]]), "Manufacturer", &mut w);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(w.len(), 1);
        assert!(w[0].0.contains("row 2"));
    }

    #[test]
    fn junk_counts_become_zero() {
        let mut w = Vec::new();
        let t = shape(&raw(&["Maker", "TOTAL"], &[&["A", "n/a"], &["B", ""]]), "Manufacturer", &mut w);
        assert_eq!(t.rows.iter().map(|r| r.counts[0]).collect::<Vec<_>>(), vec![0, 0]);
        assert_eq!(w, vec![ParseWarning::from("1 non-numeric cell(s) counted as 0")]);
    }

    #[test]
    fn total_rows_dropped() {
        let mut w = Vec::new();
        let t = shape(&raw(&["Maker", "TOTAL"], &[&["A", "1"], &["Grand Total", "1"]]), "Manufacturer", &mut w);
        assert_eq!(t.entities(), vec!["A".to_string()]);

        let t = shape(
            &raw(&["S No", "Maker", "TOTAL"], &[&["1", "A", "1"], &["Total", "", "1"]]),
            "Manufacturer",
            &mut w,
        );
        assert_eq!(t.entities(), vec!["A".to_string()]);
        assert!(w.is_empty(), "{w:?}");
    }
}
