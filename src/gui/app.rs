// src/gui/app.rs
use std::error::Error;

use chrono::{Datelike, Local};
use eframe::egui;

use crate::{
    config::{options::AppOptions, state::AppState},
    portal::Month,
    presenter::{self, PresenterView},
    store::SnapshotStore,
};

/// `vahan.toml` if present and valid, else defaults (logged).
pub fn load_options() -> AppOptions {
    match AppOptions::load(None) {
        Ok(o) => o,
        Err(e) => {
            loge!("Config: {}; using defaults", e);
            AppOptions::default()
        }
    }
}

pub fn run(options: eframe::NativeOptions, opts: AppOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Vahan registrations",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::new(opts))))),
    )?;
    Ok(())
}

/// Column sort for the data table. Column 0 is the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub col: usize,
    pub descending: bool,
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,
    pub store: SnapshotStore,

    // selector contents, rebuilt on reload / category change
    pub years: Vec<i32>,
    pub months: Vec<Month>,

    // what is on screen
    pub view: PresenterView,
    pub sort: Option<SortKey>,
    /// Row order of `view.table.rows` after sorting.
    pub row_ix: Vec<usize>,

    pub out_stem_text: String,
    pub status: String,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let store = SnapshotStore::new(&state.options.snapshot_dir);
        logf!("Init: snapshot dir {}", store.dir().display());

        let mut app = Self {
            state,
            store,
            years: Vec::new(),
            months: Vec::new(),
            view: PresenterView::default(),
            sort: None,
            row_ix: Vec::new(),
            out_stem_text: String::new(),
            status: "Idle".into(),
        };
        app.reload();
        app
    }

    #[inline]
    pub fn status<T: Into<String>>(&mut self, msg: T) {
        self.status = msg.into();
    }

    /// Re-list years from disk, keep the selected year if it still exists,
    /// then rebuild.
    pub fn reload(&mut self) {
        self.years = presenter::year_choices(&self.store, &self.state.gui.selection);
        let sel = &mut self.state.gui.selection;
        if !self.years.contains(&sel.year) {
            sel.year = self.years.first().copied().unwrap_or_else(|| Local::now().year());
        }
        self.rebuild_view();

        let n = self.years.len();
        self.status(if n == 0 {
            format!("No snapshots in {}", self.store.dir().display())
        } else {
            format!("{} year(s) available", n)
        });
    }

    /// Selection changed: re-read the snapshot and re-render everything.
    pub fn rebuild_view(&mut self) {
        let sel = &mut self.state.gui.selection;
        self.months = presenter::month_choices(sel.year, Local::now().date_naive());
        if let Some(m) = sel.month {
            if !self.months.contains(&m) {
                sel.month = None;
            }
        }

        self.view = presenter::present(&self.store, &self.state.gui.selection);

        // drop entity picks the new snapshot doesn't have
        let all = &self.view.all_entities;
        let sel = &mut self.state.gui.selection;
        let before = sel.entities.len();
        sel.entities.retain(|e| all.contains(e));
        if sel.entities.len() != before {
            self.view = presenter::present(&self.store, &self.state.gui.selection);
        }

        if self.sort.is_some_and(|s| s.col > self.view.table.columns.len()) {
            self.sort = None;
        }
        self.resort();
        self.out_stem_text = crate::core::sanitize::file_stem(&self.state.gui.selection.key().to_string());

        logd!(
            "View: {} rows={} records={} warnings={}",
            self.state.gui.selection.key(),
            self.view.table.rows.len(),
            self.view.records.len(),
            self.view.warnings.len()
        );
    }

    pub fn resort(&mut self) {
        let rows = &self.view.table.rows;
        let mut ix: Vec<usize> = (0..rows.len()).collect();
        if let Some(SortKey { col, descending }) = self.sort {
            ix.sort_by(|&a, &b| {
                let ord = if col == 0 {
                    rows[a].entity.cmp(&rows[b].entity)
                } else {
                    let ca = rows[a].counts.get(col - 1).copied().unwrap_or(0);
                    let cb = rows[b].counts.get(col - 1).copied().unwrap_or(0);
                    ca.cmp(&cb)
                };
                if descending { ord.reverse() } else { ord }
            });
        }
        self.row_ix = ix;
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_str());
                if let Some(t) = self.view.retrieved_at {
                    ui.separator();
                    ui.label(format!("Snapshot taken {}", t.format("%Y-%m-%d %H:%M")));
                }
            });
        });

        egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                super::components::filter_panel::draw(ui, self);
                ui.separator();
                super::components::entity_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_salt("main_scroll").show(ui, |ui| {
                super::components::summary::draw_notices(ui, self);
                if self.view.is_empty() {
                    return;
                }
                super::components::summary::draw_cards(ui, self);
                ui.separator();
                super::components::charts::draw(ui, self);
                ui.separator();
                super::components::export_bar::draw(ui, self);
                super::components::data_table::draw(ui, self);
                if self.state.gui.show_comparisons {
                    ui.separator();
                    super::components::summary::draw_comparisons(ui, self);
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RegistrationTable, TableRow};

    fn app_with_rows() -> App {
        let mut app = App {
            state: AppState::default(),
            store: SnapshotStore::new("does-not-exist"),
            years: Vec::new(),
            months: Vec::new(),
            view: PresenterView::default(),
            sort: None,
            row_ix: Vec::new(),
            out_stem_text: String::new(),
            status: String::new(),
        };
        app.view.table = RegistrationTable {
            entity_header: "Manufacturer".into(),
            columns: vec!["TOTAL".into()],
            rows: vec![
                TableRow { entity: "B".into(), counts: vec![5] },
                TableRow { entity: "A".into(), counts: vec![9] },
                TableRow { entity: "C".into(), counts: vec![1] },
            ],
        };
        app
    }

    #[test]
    fn sorts_by_count_and_name() {
        let mut app = app_with_rows();
        app.sort = Some(SortKey { col: 1, descending: true });
        app.resort();
        assert_eq!(app.row_ix, vec![1, 0, 2]);

        app.sort = Some(SortKey { col: 0, descending: false });
        app.resort();
        assert_eq!(app.row_ix, vec![1, 0, 2]);

        app.sort = None;
        app.resort();
        assert_eq!(app.row_ix, vec![0, 1, 2]);
    }
}
