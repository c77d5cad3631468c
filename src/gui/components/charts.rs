// src/gui/components/charts.rs
//
// Bar and line charts on egui_plot.
// - month-wise, all months: count by month (selected entities summed)
// - otherwise: count by entity, top N, the rest folded into "Others"
// - month-wise: quarterly trend line underneath
//
// Categories sit at x = 0, 1, 2, ...; the axis formatter maps them back to names.

use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, Points};

use crate::gui::app::App;
use super::data_table::group_thousands;

const BAR: Color32 = Color32::from_rgb(72, 176, 255);
const LINE: Color32 = Color32::from_rgb(240, 160, 60);
const LABEL_CHARS: usize = 12;

/// Largest `n` as-is, the rest summed into "Others".
pub fn top_n(sorted_desc: &[(String, u64)], n: usize) -> Vec<(String, u64)> {
    if sorted_desc.len() <= n {
        return sorted_desc.to_vec();
    }
    let mut out: Vec<(String, u64)> = sorted_desc[..n].to_vec();
    let rest = sorted_desc[n..].iter().fold(0u64, |acc, (_, c)| acc.saturating_add(*c));
    out.push(("Others".to_string(), rest));
    out
}

pub fn draw(ui: &mut egui::Ui, app: &App) {
    let sel = &app.state.gui.selection;
    let totals = &app.view.totals;

    if sel.category.is_month_wise() && sel.month.is_none() {
        bar_chart(ui, "Registrations by month", &totals.by_period);
    } else {
        let top = app.state.options.dashboard.chart_top_n.max(1);
        let title = format!("Registrations by {}", sel.category.entity_label().to_lowercase());
        bar_chart(ui, &title, &top_n(&totals.by_entity, top));
    }

    let q = &app.view.comparisons.quarters;
    if sel.category.is_month_wise() && q.len() > 1 {
        let points: Vec<(String, u64)> = q.iter().map(|r| (r.label.to_string(), r.total)).collect();
        line_chart(ui, "Quarterly trend", &points);
    }
}

/// X tick text: the (shortened) name at whole positions, blank in between.
pub fn axis_label(labels: &[String], x: f64) -> String {
    if x < 0.0 || x.fract() != 0.0 {
        return String::new();
    }
    labels.get(x as usize).map(|l| short(l, LABEL_CHARS)).unwrap_or_default()
}

/// Y tick text: grouped thousands, blank for fractional ticks.
fn count_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value < 0.0 || mark.value.fract() != 0.0 {
        return String::new();
    }
    group_thousands(mark.value as u64)
}

fn short(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let cut: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

pub fn bar_chart(ui: &mut egui::Ui, title: &str, bars: &[(String, u64)]) {
    if bars.is_empty() {
        return;
    }
    ui.label(RichText::new(title).strong());

    let labels: Vec<String> = bars.iter().map(|(n, _)| n.clone()).collect();
    let chart = BarChart::new(
        title,
        bars.iter()
            .enumerate()
            .map(|(i, (name, count))| Bar::new(i as f64, *count as f64).name(name).width(0.7))
            .collect(),
    )
    .color(BAR)
    .element_formatter(Box::new(|bar: &Bar, _: &BarChart| {
        format!("{}: {}", bar.name, group_thousands(bar.value as u64))
    }));

    Plot::new(("bar_chart", title))
        .height(260.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _: &RangeInclusive<f64>| axis_label(&labels, mark.value))
        .y_axis_formatter(count_label)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

pub fn line_chart(ui: &mut egui::Ui, title: &str, points: &[(String, u64)]) {
    if points.is_empty() {
        return;
    }
    ui.label(RichText::new(title).strong());

    let labels: Vec<String> = points.iter().map(|(n, _)| n.clone()).collect();
    let xy: Vec<[f64; 2]> = points
        .iter()
        .enumerate()
        .map(|(i, (_, c))| [i as f64, *c as f64])
        .collect();

    Plot::new(("line_chart", title))
        .height(200.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _: &RangeInclusive<f64>| axis_label(&labels, mark.value))
        .y_axis_formatter(count_label)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(title, xy.clone()).color(LINE).width(2.0));
            plot_ui.points(Points::new(title, xy).color(LINE).radius(4.0));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn others_bucket() {
        let v: Vec<(String, u64)> = [("A", 5), ("B", 3), ("C", 2), ("D", 1)]
            .iter()
            .map(|(n, c)| (n.to_string(), *c))
            .collect();
        let t = top_n(&v, 2);
        assert_eq!(t.len(), 3);
        assert_eq!(t[2], ("Others".to_string(), 3));
        assert_eq!(top_n(&v, 10).len(), 4);
    }

    #[test]
    fn others_bucket_saturates() {
        let v = vec![("A".to_string(), 1), ("B".to_string(), u64::MAX), ("C".to_string(), 7)];
        assert_eq!(top_n(&v, 1)[1].1, u64::MAX);
    }

    #[test]
    fn ticks_map_to_names() {
        let labels = vec!["Jan".to_string(), "MARUTI SUZUKI INDIA LTD".to_string()];
        assert_eq!(axis_label(&labels, 0.0), "Jan");
        assert_eq!(axis_label(&labels, 1.0), "MARUTI SUZU…");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, 2.0), "");
        assert_eq!(axis_label(&labels, -1.0), "");
    }

    #[test]
    fn labels_are_shortened() {
        assert_eq!(short("MARUTI SUZUKI", 6), "MARUT…");
        assert_eq!(short("TVS", 6), "TVS");
    }
}
