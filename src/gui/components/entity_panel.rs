// src/gui/components/entity_panel.rs
//
// Entity multi-select (manufacturers or vehicle classes of the current snapshot).
// Click = only this, ctrl = toggle, shift = range from last click,
// ctrl+shift = add range. Empty selection means "all".

use eframe::egui;
use crate::gui::app::App;

/// Apply one click to `sel`. `entities` is the list as displayed.
pub fn apply_click(
    sel: &mut Vec<String>,
    anchor: &mut Option<usize>,
    entities: &[String],
    idx: usize,
    ctrl: bool,
    shift: bool,
) {
    let Some(name) = entities.get(idx) else { return };
    let is_selected = sel.contains(name);
    let range = |last: usize| if last <= idx { last..=idx } else { idx..=last };

    match (*anchor, ctrl, shift) {
        (Some(last), true, true) => {
            for e in &entities[range(last)] {
                if !sel.contains(e) { sel.push(e.clone()); }
            }
        }
        (Some(last), false, true) => {
            sel.clear();
            sel.extend(entities[range(last)].iter().cloned());
        }
        (_, true, _) => {
            // no anchor with shift falls back to a toggle
            if is_selected { sel.retain(|x| x != name); } else { sel.push(name.clone()); }
        }
        _ => {
            sel.clear();
            sel.push(name.clone());
        }
    }
    *anchor = Some(idx);
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let label = app.state.gui.selection.category.entity_label();
    ui.heading(format!("{label}s"));

    let mut changed = false;

    ui.horizontal(|ui| {
        if ui.button("All").clicked() {
            app.state.gui.selection.entities.clear();
            app.state.gui.last_clicked_entity = None;
            changed = true;
        }
        let n = app.state.gui.selection.entities.len();
        ui.label(if n == 0 { "showing all".to_string() } else { format!("{n} selected") });
    });

    ui.separator();

    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
    }

    egui::ScrollArea::vertical()
        .id_salt("entity_panel_scroll")
        .show(ui, |ui| {
            let w = ui.available_width();
            ui.set_min_width(w);

            let entities = &app.view.all_entities;
            let gui = &mut app.state.gui;

            for (idx, name) in entities.iter().enumerate() {
                let is_selected = gui.selection.entities.contains(name);
                let resp = ui.selectable_label(is_selected, name);
                if resp.clicked() {
                    let m = ui.input(|i| i.modifiers);
                    apply_click(
                        &mut gui.selection.entities,
                        &mut gui.last_clicked_entity,
                        entities,
                        idx,
                        m.command || m.ctrl,
                        m.shift,
                    );
                    changed = true;
                }
            }
        });

    if changed {
        logf!(
            "UI: Selection changed ({} {}): {:?}",
            app.state.gui.selection.entities.len(),
            label,
            &app.state.gui.selection.entities
        );
        app.rebuild_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn click_ctrl_shift() {
        let e = names();
        let mut sel = Vec::new();
        let mut anchor = None;

        apply_click(&mut sel, &mut anchor, &e, 1, false, false);
        assert_eq!(sel, vec!["B"]);

        apply_click(&mut sel, &mut anchor, &e, 3, false, true);
        assert_eq!(sel, vec!["B", "C", "D"]);

        apply_click(&mut sel, &mut anchor, &e, 2, true, false);
        assert_eq!(sel, vec!["B", "D"]);

        apply_click(&mut sel, &mut anchor, &e, 0, true, true);
        assert_eq!(sel, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn shift_without_anchor_selects_one() {
        let e = names();
        let mut sel = vec!["A".to_string()];
        let mut anchor = None;
        apply_click(&mut sel, &mut anchor, &e, 2, false, true);
        assert_eq!(sel, vec!["C"]);
        assert_eq!(anchor, Some(2));
    }
}
