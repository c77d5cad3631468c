// src/config/state.rs
use super::options::AppOptions;
use crate::portal::{Category, Month, VehicleGroup};
use crate::store::SnapshotKey;

/// What the dashboard user has picked. Lives for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: Category,
    pub group: VehicleGroup,
    pub year: i32,
    /// `None` = all months.
    pub month: Option<Month>,
    /// Empty = all entities.
    pub entities: Vec<String>,
}

impl FilterSelection {
    pub fn new(category: Category, year: i32) -> Self {
        Self { category, group: VehicleGroup::All, year, month: None, entities: Vec::new() }
    }

    pub fn key(&self) -> SnapshotKey {
        SnapshotKey::with_group(self.category, self.group, self.year)
    }

    /// Month only means something for month-wise reports.
    pub fn effective_month(&self) -> Option<Month> {
        if self.category.is_month_wise() { self.month } else { None }
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::new(Category::VehicleCategory, 0)
    }
}

#[derive(Clone, Debug)]
pub struct GuiState {
    pub selection: FilterSelection,

    /// Anchor for shift-click range selection in the entity list
    pub last_clicked_entity: Option<usize>,

    /// Show the comparison sections under the chart
    pub show_comparisons: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            selection: FilterSelection::default(),
            last_clicked_entity: None,
            show_comparisons: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}

impl Default for AppState {
    fn default() -> Self {
        Self { options: AppOptions::default(), gui: GuiState::default() }
    }
}

impl AppState {
    pub fn new(options: AppOptions) -> Self {
        let mut gui = GuiState::default();
        let dash = &options.dashboard;
        gui.selection.category = dash.category;
        gui.selection.group = if dash.group.applies_to(dash.category) {
            dash.group
        } else {
            logw!("Config: vehicle group {} does not apply to {}; using All", dash.group, dash.category);
            VehicleGroup::All
        };
        Self { options, gui }
    }
}
