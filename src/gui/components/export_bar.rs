// src/gui/components/export_bar.rs
//
// Format + headers toggle, output name, Copy and Export of the displayed table,
// and Export records for the long form behind the charts.

use eframe::egui;

use crate::{config::options::ExportFormat, file, gui::app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut do_copy = false;
    let mut do_export = false;
    let mut do_records = false;

    ui.horizontal(|ui| {
        let export = &mut app.state.options.export;

        ui.label("Format:");
        let before = export.format;
        ui.selectable_value(&mut export.format, ExportFormat::Csv, "CSV");
        ui.selectable_value(&mut export.format, ExportFormat::Tsv, "TSV");
        if export.format != before {
            logf!("UI: Export format → {:?}", export.format);
        }

        ui.checkbox(&mut export.include_headers, "Include headers");

        ui.separator();
        ui.label("Output:");
        ui.label(egui::RichText::new(format!("{}/", export.out_dir.display())).monospace().weak());
        ui.add(egui::TextEdit::singleline(&mut app.out_stem_text).desired_width(220.0).font(egui::TextStyle::Monospace));
        ui.label(format!(".{}", export.format.ext()));

        do_copy = ui.button("Copy").clicked();
        do_export = ui.button("Export").clicked();
        do_records = ui
            .button("Export records")
            .on_hover_text("entity, period, count: one row per record")
            .clicked();
    });

    let table = app.view.table.clone();

    if do_copy {
        let export = app.state.options.export.clone();
        match file::table_to_string(&table, export.include_headers, export.format.delim()) {
            Ok(txt) if !table.is_empty() => {
                ui.ctx().copy_text(txt);
                logf!("Copy: {} rows", table.rows.len());
                app.status("Copied to clipboard");
            }
            Ok(_) => app.status("Nothing to copy"),
            Err(e) => {
                loge!("Copy: {}", e);
                app.status(format!("Copy failed: {e}"));
            }
        }
    }

    let stem = crate::core::sanitize::file_stem(&app.out_stem_text);

    if do_records {
        match file::export_records(&app.state.options.export, &stem, &app.view.records) {
            Ok(path) => app.status(format!("Exported {}", path.display())),
            Err(e) => {
                loge!("Export records: {}", e);
                app.status(format!("Export failed: {e}"));
            }
        }
    }

    if do_export {
        match file::export_table(&app.state.options.export, &stem, &table) {
            Ok(path) => app.status(format!("Exported {}", path.display())),
            Err(e) => {
                loge!("Export: {}", e);
                app.status(format!("Export failed: {e}"));
            }
        }
    }
}
