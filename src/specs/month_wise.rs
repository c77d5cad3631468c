// src/specs/month_wise.rs
//! Month-wise reports: one row per entity, a column per month plus `TOTAL`.
//!
//! Month headers are normalised to "Jan".."Dec". When the portal ships no
//! recognisable month headers, the first twelve non-total columns are taken
//! as January onward.

use super::{locate_and_shape, Extracted, TableExtractor};
use crate::core::sanitize::is_total_label;
use crate::data::{ParseWarning, RegistrationTable};
use crate::portal::{Category, Month};

pub struct MonthWiseSpec {
    category: Category,
}

pub static MANUFACTURER: MonthWiseSpec = MonthWiseSpec { category: Category::ManufacturerMonthWise };
pub static VEHICLE_CATEGORY: MonthWiseSpec = MonthWiseSpec { category: Category::VehicleCategoryMonthWise };

impl TableExtractor for MonthWiseSpec {
    fn extract(&self, markup: &str) -> Extracted {
        let mut out = locate_and_shape(markup, self.category);
        relabel_months(&mut out.table, &mut out.warnings);
        out
    }
}

pub(crate) fn relabel_months(table: &mut RegistrationTable, warnings: &mut Vec<ParseWarning>) {
    if table.columns.is_empty() {
        return;
    }

    let recognised = table.columns.iter().filter(|c| Month::from_header(c).is_some()).count();

    if recognised == 0 {
        let mut next = 0usize;
        for col in table.columns.iter_mut() {
            if is_total_label(col) {
                continue;
            }
            if let Some(m) = Month::from_index(next) {
                *col = m.label().to_string();
                next += 1;
            }
        }
        if next > 0 {
            warnings.push(ParseWarning(format!(
                "no month headers found; assumed {} column(s) start at Jan",
                next
            )));
        }
        return;
    }

    let mut odd = Vec::new();
    for col in table.columns.iter_mut() {
        match Month::from_header(col) {
            Some(m) => *col = m.label().to_string(),
            None if is_total_label(col) => {}
            None => odd.push(col.clone()),
        }
    }
    if !odd.is_empty() {
        warnings.push(ParseWarning(format!("unexpected column(s) kept: {}", odd.join(", "))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(t: &RegistrationTable) -> Vec<&str> {
        t.columns.iter().map(String::as_str).collect()
    }

    #[test]
    fn upper_case_headers_normalised() {
        let page = r#"<table>
            <thead><tr><th>S No</th><th>Maker</th><th>JAN</th><th>FEB</th><th>TOTAL</th></tr></thead>
            <tbody><tr><td>1</td><td>HERO</td><td>10</td><td>20</td><td>30</td></tr></tbody>
        </table>"#;
        let out = MANUFACTURER.extract(page);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(cols(&out.table), vec!["Jan", "Feb", "TOTAL"]);
        assert_eq!(out.table.rows[0].counts, vec![10, 20, 30]);
    }

    #[test]
    fn positional_months_when_headers_are_missing() {
        let mut t = RegistrationTable {
            columns: vec!["Col 3".into(), "Col 4".into(), "TOTAL".into()],
            ..Default::default()
        };
        let mut w = Vec::new();
        relabel_months(&mut t, &mut w);
        assert_eq!(cols(&t), vec!["Jan", "Feb", "TOTAL"]);
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn unexpected_columns_are_kept_and_reported() {
        let mut t = RegistrationTable {
            columns: vec!["JAN".into(), "Unknown".into(), "TOTAL".into()],
            ..Default::default()
        };
        let mut w = Vec::new();
        relabel_months(&mut t, &mut w);
        assert_eq!(cols(&t), vec!["Jan", "Unknown", "TOTAL"]);
        assert!(w[0].0.contains("Unknown"));
    }
}
