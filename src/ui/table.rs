use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::ListingDataset;

/// How many rows the preview shows.
const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Data preview table
// ---------------------------------------------------------------------------

/// Render the first rows of the dataset, columns in source order.
pub fn preview_table(ui: &mut Ui, dataset: &ListingDataset) {
    if dataset.column_names.is_empty() {
        ui.label("Dataset has no columns.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), dataset.column_names.len())
        .header(20.0, |mut header| {
            for col in &dataset.column_names {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|mut body| {
            for rec in dataset.records.iter().take(PREVIEW_ROWS) {
                body.row(18.0, |mut row| {
                    for col in &dataset.column_names {
                        let text = rec
                            .get(col)
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        row.col(|ui| {
                            ui.label(text);
                        });
                    }
                });
            }
        });
}
