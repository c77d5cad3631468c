// src/gui/components/data_table.rs
//
// The wide table of the current view. Click a header to sort by it,
// click again to flip the direction. Pure view over `app.view.table`.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::{App, SortKey};

fn arrow(sort: Option<SortKey>, col: usize) -> &'static str {
    match sort {
        Some(SortKey { col: c, descending: true }) if c == col => " ▼",
        Some(SortKey { col: c, descending: false }) if c == col => " ▲",
        _ => "",
    }
}

/// Next sort state after a header click. Counts start descending.
pub fn next_sort(sort: Option<SortKey>, col: usize) -> Option<SortKey> {
    match sort {
        Some(s) if s.col == col => Some(SortKey { col, descending: !s.descending }),
        _ => Some(SortKey { col, descending: col != 0 }),
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let headers = app.view.table.headers();
    let cols = headers.len();
    if cols == 0 {
        return;
    }

    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.bar_inner_margin = 7.0;
        s.handle_min_length = 48.0;
    }

    let mut clicked: Option<usize> = None;
    let sort = app.sort;

    egui::ScrollArea::horizontal()
        .id_salt("data_table_hscroll")
        .show(ui, |ui| {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(420.0)
                .id_salt(("data_table", app.state.gui.selection.key().to_string()));

            table = table.column(Column::initial(260.0).resizable(true).clip(true).at_least(80.0));
            for _ in 1..cols {
                table = table.column(Column::initial(72.0).resizable(true).clip(true).at_least(40.0));
            }

            table
                .header(24.0, |mut header| {
                    for (ci, h) in headers.iter().enumerate() {
                        header.col(|ui| {
                            ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                            let text = RichText::new(format!("{h}{}", arrow(sort, ci))).strong();
                            let layout = if ci == 0 {
                                Layout::left_to_right(Align::Center)
                            } else {
                                Layout::right_to_left(Align::Center)
                            };
                            ui.with_layout(layout, |ui| {
                                if ui.add(egui::Button::new(text).frame(false)).clicked() {
                                    clicked = Some(ci);
                                }
                            });
                        });
                    }
                })
                .body(|body| {
                    let rows = &app.view.table.rows;
                    body.rows(20.0, app.row_ix.len(), |mut row| {
                        let Some(r) = app.row_ix.get(row.index()).and_then(|&i| rows.get(i)) else { return };
                        row.col(|ui| {
                            ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                            ui.label(r.entity.as_str());
                        });
                        for ci in 0..cols - 1 {
                            let v = r.counts.get(ci).copied().unwrap_or(0);
                            row.col(|ui| {
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    ui.label(group_thousands(v));
                                });
                            });
                        }
                    });
                });
        });

    if let Some(ci) = clicked {
        app.sort = next_sort(app.sort, ci);
        logd!("UI: Sort → {:?}", app.sort);
        app.resort();
    }
}

/// 1234567 → "1,234,567"
pub fn group_thousands(v: u64) -> String {
    let s = v.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1200), "1,200");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn header_clicks_cycle() {
        let s = next_sort(None, 2);
        assert_eq!(s, Some(SortKey { col: 2, descending: true }));
        assert_eq!(next_sort(s, 2), Some(SortKey { col: 2, descending: false }));
        assert_eq!(next_sort(s, 0), Some(SortKey { col: 0, descending: false }));
    }
}
