// src/gui/components/filter_panel.rs
//
// Category / vehicle group / year / month pickers and the Reload button.
// Every change re-runs the presenter; there is no caching between frames.

use eframe::egui;

use crate::gui::app::App;
use crate::portal::{Category, VehicleGroup};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Filters");

    let mut relist = false;
    let mut rebuild = false;

    let sel = &mut app.state.gui.selection;

    egui::ComboBox::from_label("Category")
        .selected_text(sel.category.title())
        .show_ui(ui, |ui| {
            for c in Category::ALL {
                if ui.selectable_value(&mut sel.category, c, c.title()).changed() {
                    relist = true;
                }
            }
        });

    // Month-wise reports have no group filter.
    if !sel.group.applies_to(sel.category) {
        sel.group = VehicleGroup::All;
    }
    ui.add_enabled_ui(!sel.category.is_month_wise(), |ui| {
        egui::ComboBox::from_label("Vehicle group")
            .selected_text(sel.group.title())
            .show_ui(ui, |ui| {
                for g in VehicleGroup::ALL {
                    if ui.selectable_value(&mut sel.group, g, g.title()).changed() {
                        relist = true;
                    }
                }
            });
    });

    ui.add_enabled_ui(!app.years.is_empty(), |ui| {
        egui::ComboBox::from_label("Year")
            .selected_text(if app.years.is_empty() { "—".to_string() } else { sel.year.to_string() })
            .show_ui(ui, |ui| {
                for &y in &app.years {
                    if ui.selectable_value(&mut sel.year, y, y.to_string()).changed() {
                        rebuild = true;
                    }
                }
            });
    });

    if sel.category.is_month_wise() {
        let label = sel.month.map(|m| m.label()).unwrap_or("All");
        egui::ComboBox::from_label("Month")
            .selected_text(label)
            .show_ui(ui, |ui| {
                if ui.selectable_value(&mut sel.month, None, "All").changed() {
                    rebuild = true;
                }
                for &m in &app.months {
                    if ui.selectable_value(&mut sel.month, Some(m), m.label()).changed() {
                        rebuild = true;
                    }
                }
            });
    }

    ui.checkbox(&mut app.state.gui.show_comparisons, "Show comparisons");

    ui.horizontal(|ui| {
        if ui.button("Reload").on_hover_text("Re-read the snapshot directory").clicked() {
            logf!("UI: Reload");
            relist = true;
        }
        ui.label(egui::RichText::new(app.store.dir().display().to_string()).monospace().weak());
    });

    if relist {
        logf!("UI: Filters → {}", app.state.gui.selection.key());
        app.reload();
    } else if rebuild {
        logf!("UI: Filters → {} month={:?}", app.state.gui.selection.key(), app.state.gui.selection.month);
        app.rebuild_view();
        app.status("Ready");
    }
}
