// src/gui/components/summary.rs
//
// Notices (missing snapshot, parse warnings), totals cards, and the
// period comparison tables.

use eframe::egui::{self, Color32, RichText};
use egui_extras::{Column, TableBuilder};

use crate::analysis::{format_pct, Comparison};
use crate::gui::app::App;
use super::data_table::group_thousands;

const WARN: Color32 = Color32::from_rgb(240, 200, 60);
const UP: Color32 = Color32::from_rgb(90, 200, 120);
const DOWN: Color32 = Color32::from_rgb(220, 97, 73);

pub fn draw_notices(ui: &mut egui::Ui, app: &App) {
    if let Some(n) = &app.view.notice {
        ui.add_space(8.0);
        ui.label(RichText::new(n).heading());
    }
    let w = &app.view.warnings;
    if !w.is_empty() {
        egui::CollapsingHeader::new(RichText::new(format!("⚠ {} parse warning(s)", w.len())).color(WARN))
            .id_salt("parse_warnings")
            .show(ui, |ui| {
                for msg in w {
                    ui.label(msg.to_string());
                }
            });
    }
}

fn card(ui: &mut egui::Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(150.0);
        ui.vertical(|ui| {
            ui.label(RichText::new(title).weak());
            ui.label(RichText::new(value).size(20.0).strong());
        });
    });
}

pub fn draw_cards(ui: &mut egui::Ui, app: &App) {
    let t = &app.view.totals;
    let sel = &app.state.gui.selection;
    let period = match sel.effective_month() {
        Some(m) => format!("{} {}", m.label(), sel.year),
        None => sel.year.to_string(),
    };

    ui.horizontal_wrapped(|ui| {
        card(ui, &format!("Total registrations ({period})"), group_thousands(t.grand));
        card(ui, &format!("{}s", sel.category.entity_label()), t.entity_count().to_string());
        if let Some((name, c)) = t.top() {
            card(ui, "Top", format!("{name} ({})", group_thousands(*c)));
        }
        if let Some(yoy) = &app.view.comparisons.year_over_year {
            card(ui, "vs previous year", format_pct(yoy.overall.pct()));
        }
    });
}

fn delta_text(d: i64) -> RichText {
    let s = if d >= 0 { format!("+{}", group_thousands(d as u64)) } else { format!("-{}", group_thousands(d.unsigned_abs())) };
    RichText::new(s).color(if d > 0 { UP } else if d < 0 { DOWN } else { Color32::GRAY })
}

fn comparison_table(ui: &mut egui::Ui, c: &Comparison, salt: &str) {
    ui.label(RichText::new(format!("{}: {} vs {}", c.title, c.current_label, c.previous_label)).strong());
    ui.horizontal(|ui| {
        ui.label(format!(
            "Overall {} → {}",
            group_thousands(c.overall.previous),
            group_thousands(c.overall.current)
        ));
        ui.label(delta_text(c.overall.delta()));
        ui.label(format_pct(c.overall.pct()));
    });

    ui.push_id(salt, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(220.0)
            .column(Column::initial(240.0).clip(true).resizable(true))
            .columns(Column::initial(90.0), 4)
            .header(20.0, |mut h| {
                for t in ["", c.previous_label.as_str(), c.current_label.as_str(), "Change", "%"] {
                    h.col(|ui| { ui.strong(t); });
                }
            })
            .body(|body| {
                body.rows(18.0, c.rows.len(), |mut row| {
                    let r = &c.rows[row.index()];
                    row.col(|ui| { ui.label(r.entity.as_str()); });
                    row.col(|ui| { ui.label(group_thousands(r.previous)); });
                    row.col(|ui| { ui.label(group_thousands(r.current)); });
                    row.col(|ui| { ui.label(delta_text(r.delta())); });
                    row.col(|ui| { ui.label(format_pct(r.pct())); });
                });
            });
    });
    ui.add_space(8.0);
}

pub fn draw_comparisons(ui: &mut egui::Ui, app: &App) {
    let c = &app.view.comparisons;
    ui.heading("Comparisons");

    if let Some(m) = &c.month_over_month {
        comparison_table(ui, m, "mom");
    }
    if let Some(m) = &c.year_over_month {
        comparison_table(ui, m, "yom");
    }
    if !c.quarters.is_empty() {
        ui.label(RichText::new("Quarter-over-Quarter").strong());
        egui::Grid::new("qoq").striped(true).show(ui, |ui| {
            for q in &c.quarters {
                ui.label(q.label);
                ui.label(group_thousands(q.total));
                ui.label(format_pct(q.qoq));
                ui.end_row();
            }
        });
        ui.add_space(8.0);
    }
    if let Some(y) = &c.year_over_year {
        comparison_table(ui, y, "yoy");
    }
    for note in &c.notes {
        ui.label(RichText::new(note).weak());
    }
}
