// src/portal/mod.rs
//! What the Vahan report page offers, and how its form is driven.
//!
//! - `Category`: the four report shapes we collect.
//! - `VehicleGroup`: the optional "Vehicle Category Group" filter.
//! - `Month`: month columns of the month-wise reports.
//! - `form`: XPath contract with the portal's PrimeFaces controls.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod form;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Manufacturer,
    ManufacturerMonthWise,
    VehicleCategory,
    VehicleCategoryMonthWise,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::VehicleCategory,
        Category::Manufacturer,
        Category::VehicleCategoryMonthWise,
        Category::ManufacturerMonthWise,
    ];

    /// File-name segment.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Manufacturer => "manufacturer",
            Category::ManufacturerMonthWise => "manufacturer_month_wise",
            Category::VehicleCategory => "vehicle_category",
            Category::VehicleCategoryMonthWise => "vehicle_category_month_wise",
        }
    }

    pub fn from_slug(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.slug() == s)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Manufacturer => "Manufacturer",
            Category::ManufacturerMonthWise => "Manufacturer Month Wise",
            Category::VehicleCategory => "Vehicle Category",
            Category::VehicleCategoryMonthWise => "Vehicle Category Month Wise",
        }
    }

    pub fn is_month_wise(&self) -> bool {
        matches!(self, Category::ManufacturerMonthWise | Category::VehicleCategoryMonthWise)
    }

    /// Label of the entity column once the table is reshaped.
    pub fn entity_label(&self) -> &'static str {
        match self {
            Category::Manufacturer | Category::ManufacturerMonthWise => "Manufacturer",
            Category::VehicleCategory => "Vehicle Class",
            Category::VehicleCategoryMonthWise => "Vehicle Category",
        }
    }

    /// Accepts slugs plus a few hyphenated spellings (CLI input).
    pub fn parse(s: &str) -> Option<Category> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "maker" => Some(Category::Manufacturer),
            "maker_month_wise" | "manufacturer_monthwise" => Some(Category::ManufacturerMonthWise),
            "vehicle_class" => Some(Category::VehicleCategory),
            "vehicle_category_monthwise" => Some(Category::VehicleCategoryMonthWise),
            other => Category::from_slug(other),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleGroup {
    #[default]
    All,
    TwoWheeler,
    ThreeWheeler,
    FourWheeler,
}

impl VehicleGroup {
    pub const ALL: [VehicleGroup; 4] = [
        VehicleGroup::All,
        VehicleGroup::TwoWheeler,
        VehicleGroup::ThreeWheeler,
        VehicleGroup::FourWheeler,
    ];

    /// File-name prefix; `All` has none.
    pub fn slug(&self) -> Option<&'static str> {
        match self {
            VehicleGroup::All => None,
            VehicleGroup::TwoWheeler => Some("two_wheeler"),
            VehicleGroup::ThreeWheeler => Some("three_wheeler"),
            VehicleGroup::FourWheeler => Some("four_wheeler"),
        }
    }

    /// `data-label` of the portal's list item.
    pub fn portal_label(&self) -> Option<&'static str> {
        match self {
            VehicleGroup::All => None,
            VehicleGroup::TwoWheeler => Some("TWO WHEELER"),
            VehicleGroup::ThreeWheeler => Some("THREE WHEELER"),
            VehicleGroup::FourWheeler => Some("FOUR WHEELER"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            VehicleGroup::All => "All",
            VehicleGroup::TwoWheeler => "Two Wheeler",
            VehicleGroup::ThreeWheeler => "Three Wheeler",
            VehicleGroup::FourWheeler => "Four Wheeler",
        }
    }

    pub fn parse(s: &str) -> Option<VehicleGroup> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "all" => Some(VehicleGroup::All),
            "2w" | "two_wheeler" => Some(VehicleGroup::TwoWheeler),
            "3w" | "three_wheeler" => Some(VehicleGroup::ThreeWheeler),
            "4w" | "four_wheeler" => Some(VehicleGroup::FourWheeler),
            _ => None,
        }
    }

    /// Month-wise reports ignore the group filter on the portal.
    pub fn applies_to(&self, category: Category) -> bool {
        *self == VehicleGroup::All || !category.is_month_wise()
    }
}

impl fmt::Display for VehicleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan, Month::Feb, Month::Mar, Month::Apr, Month::May, Month::Jun,
        Month::Jul, Month::Aug, Month::Sep, Month::Oct, Month::Nov, Month::Dec,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Month::Jan => "Jan", Month::Feb => "Feb", Month::Mar => "Mar",
            Month::Apr => "Apr", Month::May => "May", Month::Jun => "Jun",
            Month::Jul => "Jul", Month::Aug => "Aug", Month::Sep => "Sep",
            Month::Oct => "Oct", Month::Nov => "Nov", Month::Dec => "Dec",
        }
    }

    /// 0-based.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(i: usize) -> Option<Month> {
        Month::ALL.get(i).copied()
    }

    pub fn prev(&self) -> Option<Month> {
        self.index().checked_sub(1).and_then(Month::from_index)
    }

    /// Matches "JAN", "Jan", "january", "Jan-2024" style headers.
    pub fn from_header(s: &str) -> Option<Month> {
        let lc = s.trim().to_ascii_lowercase();
        let head: String = lc.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        if head.len() < 3 {
            return None;
        }
        Month::ALL.into_iter().find(|m| {
            let full = FULL_NAMES[m.index()];
            head == m.label().to_ascii_lowercase() || head == full || (head.len() >= 4 && full.starts_with(&head))
        })
    }

    /// Quarter 0..=3.
    pub fn quarter(&self) -> usize {
        self.index() / 3
    }
}

const FULL_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

pub const QUARTER_LABELS: [&str; 4] = ["Q1 (Jan-Mar)", "Q2 (Apr-Jun)", "Q3 (Jul-Sep)", "Q4 (Oct-Dec)"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_headers() {
        assert_eq!(Month::from_header("JAN"), Some(Month::Jan));
        assert_eq!(Month::from_header(" September "), Some(Month::Sep));
        assert_eq!(Month::from_header("Sept"), Some(Month::Sep));
        assert_eq!(Month::from_header("MAY-2024"), Some(Month::May));
        assert_eq!(Month::from_header("TOTAL"), None);
        assert_eq!(Month::from_header("Ma"), None);
    }

    #[test]
    fn category_parse_accepts_cli_spellings() {
        assert_eq!(Category::parse("manufacturer-month-wise"), Some(Category::ManufacturerMonthWise));
        assert_eq!(Category::parse("Vehicle Class"), Some(Category::VehicleCategory));
        assert_eq!(Category::parse("bogus"), None);
    }

    #[test]
    fn groups_only_for_yearly_reports() {
        assert!(VehicleGroup::TwoWheeler.applies_to(Category::Manufacturer));
        assert!(!VehicleGroup::TwoWheeler.applies_to(Category::ManufacturerMonthWise));
        assert!(VehicleGroup::All.applies_to(Category::VehicleCategoryMonthWise));
    }
}
