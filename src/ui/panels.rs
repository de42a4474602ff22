use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Notice, NoticeLevel};

// ---------------------------------------------------------------------------
// Left side panel – chart controls
// ---------------------------------------------------------------------------

/// Render the left control panel: grouping notice plus the three chart
/// triggers.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Charts");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    if let Some(notice) = state.grouping_notice.clone() {
        notice_label(ui, &notice);
        ui.separator();
    }

    if ui.button("Build histogram").clicked() {
        state.build_histogram();
    }
    if ui.button("Build scatter plot").clicked() {
        state.build_scatter();
    }

    ui.add_space(4.0);

    let mut bar_enabled = state.bar_count_enabled;
    if ui
        .checkbox(&mut bar_enabled, "Vehicle count by type")
        .changed()
    {
        state.set_bar_count_enabled(bar_enabled);
    }
}

fn notice_label(ui: &mut Ui, notice: &Notice) {
    let (color, prefix) = match notice.level {
        NoticeLevel::Info => (Color32::LIGHT_BLUE, "ℹ"),
        NoticeLevel::Warning => (Color32::YELLOW, "⚠"),
    };
    ui.label(RichText::new(format!("{prefix} {}", notice.text)).color(color));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings, {} columns",
                ds.len(),
                ds.column_names.len()
            ));
        }

        if state.loading {
            ui.separator();
            ui.label("Loading…");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listing data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
