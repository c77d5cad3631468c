// src/portal/form.rs
//! The report page's form, as a list of click steps.
//!
//! Each PrimeFaces select-one menu is a `<label id="..._label">` that opens an
//! overlay of `<li data-label="...">` items. Selecting a value is two clicks.
//! These ids and labels are the wire contract with the portal; if the portal
//! changes them, collection fails with a layout error naming the step.

use super::{Category, VehicleGroup};

/// One click on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// Human name used in errors/logs ("year menu", "year 2024", ...).
    pub what: String,
    pub xpath: String,
}

impl Step {
    fn new(what: impl Into<String>, xpath: impl Into<String>) -> Self {
        Self { what: what.into(), xpath: xpath.into() }
    }
}

pub const YEAR_MENU: &str = "//label[@id='selectedYear_label']";
pub const Y_AXIS_MENU: &str = "//label[@id='yaxisVar_label']";
pub const X_AXIS_MENU: &str = "//label[@id='xaxisVar_label']";
pub const GROUP_MENU: &str = "//label[@id='vchgroupTable:selectCatgGrp_label']";
pub const REFRESH_BUTTON: &str = "//span[text()='Refresh']";

/// Body rows of a rendered PrimeFaces data table.
pub const RESULTS_TABLE: &str =
    "//div[contains(@class,'ui-datatable')]//table[@role='grid']//tbody/tr[td]";

fn menu_item(label: &str) -> String {
    format!("//li[@data-label='{label}']")
}

/// Y-axis choice per category.
pub fn y_axis_label(category: Category) -> &'static str {
    match category {
        Category::Manufacturer | Category::ManufacturerMonthWise => "Maker",
        Category::VehicleCategory => "Vehicle Class",
        Category::VehicleCategoryMonthWise => "Vehicle Category",
    }
}

/// X-axis choice per category.
pub fn x_axis_label(category: Category) -> &'static str {
    if category.is_month_wise() { "Month Wise" } else { "Vehicle Category" }
}

/// Clicks that select (category, group, year), ending with Refresh.
pub fn steps_for(category: Category, group: VehicleGroup, year: i32) -> Vec<Step> {
    let mut steps = vec![
        Step::new("year menu", YEAR_MENU),
        Step::new(format!("year {year}"), menu_item(&year.to_string())),
        Step::new("y-axis menu", Y_AXIS_MENU),
        Step::new(format!("y-axis '{}'", y_axis_label(category)), menu_item(y_axis_label(category))),
        Step::new("x-axis menu", X_AXIS_MENU),
        Step::new(format!("x-axis '{}'", x_axis_label(category)), menu_item(x_axis_label(category))),
    ];

    if let Some(label) = group.portal_label() {
        steps.push(Step::new("vehicle group menu", GROUP_MENU));
        steps.push(Step::new(format!("vehicle group '{label}'"), menu_item(label)));
    }

    steps.push(Step::new("refresh button", REFRESH_BUTTON));
    steps
}
