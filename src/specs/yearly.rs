// src/specs/yearly.rs
//! Whole-year reports: one row per entity, count columns per vehicle
//! category plus `TOTAL`.

use super::{locate_and_shape, Extracted, TableExtractor};
use crate::data::ParseWarning;
use crate::portal::Category;

pub struct YearlySpec {
    category: Category,
}

pub static MANUFACTURER: YearlySpec = YearlySpec { category: Category::Manufacturer };
pub static VEHICLE_CATEGORY: YearlySpec = YearlySpec { category: Category::VehicleCategory };

impl TableExtractor for YearlySpec {
    fn extract(&self, markup: &str) -> Extracted {
        let mut out = locate_and_shape(markup, self.category);
        let t = &out.table;
        if !t.rows.is_empty() && t.total_column().is_none() && t.columns.len() > 1 {
            out.warnings.push(ParseWarning(format!(
                "no TOTAL column; using '{}' as the yearly count",
                t.columns.last().map(String::as_str).unwrap_or_default()
            )));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <table><tr><td>layout</td></tr></table>
        <table>
          <thead>
            <tr><th rowspan="2">S No</th><th rowspan="2">Maker</th><th colspan="2">Vehicle Category</th><th rowspan="2">TOTAL</th></tr>
            <tr><th>2WN</th><th>LMV</th></tr>
          </thead>
          <tbody>
            <tr><td>1</td><td>MARUTI SUZUKI INDIA LTD</td><td>0</td><td>1,200</td><td>1,200</td></tr>
            <tr><td>2</td><td>HYUNDAI MOTOR INDIA LTD</td><td>0</td><td>800</td><td>800</td></tr>
          </tbody>
        </table>
    </body></html>"#;

    #[test]
    fn manufacturer_table() {
        let out = MANUFACTURER.extract(PAGE);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.table.entity_header, "Manufacturer");
        assert_eq!(out.table.columns, vec!["2WN", "LMV", "TOTAL"]);
        assert_eq!(out.table.rows.len(), 2);
        assert_eq!(out.table.rows[0].entity, "MARUTI SUZUKI INDIA LTD");
        assert_eq!(out.table.rows[0].counts, vec![0, 1200, 1200]);
    }

    #[test]
    fn missing_total_falls_back_to_last_column() {
        let page = "<table><tr><th>Vehicle Class</th><th>2WN</th><th>LMV</th></tr>\
                    <tr><td>M-CYCLE</td><td>5</td><td>0</td></tr></table>";
        let out = VEHICLE_CATEGORY.extract(page);
        assert_eq!(out.table.rows.len(), 1);
        assert!(out.warnings.iter().any(|w| w.0.contains("no TOTAL column")));
    }

    #[test]
    fn page_without_tables() {
        let out = MANUFACTURER.extract("<html><body><p>Session expired</p></body></html>");
        assert!(out.table.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }
}
