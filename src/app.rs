use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CarscopeApp {
    pub state: AppState,
}

impl eframe::App for CarscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: chart controls ----
        egui::SidePanel::left("controls_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview table + chart sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(dataset) = &self.state.dataset else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a dataset to explore listings  (File → Open…)");
                });
                return;
            };

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    egui::CollapsingHeader::new("Data preview")
                        .default_open(true)
                        .show(ui, |ui: &mut Ui| {
                            table::preview_table(ui, dataset);
                        });
                    ui.separator();

                    plot::chart_sections(ui, &self.state);
                });
        });
    }
}
