use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct UfoLensApp {
    pub state: AppState,
}

impl UfoLensApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for UfoLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + year slider ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: per-state bars and per-year area ----
        egui::TopBottomPanel::bottom("timeline")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| {
                if let Some(session) = &self.state.session {
                    let half = ui.available_height() / 2.0;
                    ui.allocate_ui(egui::vec2(ui.available_width(), half), |ui| {
                        session.views.bar.borrow().show(ui);
                    });
                    session.views.area.borrow().show(ui);
                }
            });

        // ---- Left side panel: shapes + reports ----
        egui::SidePanel::left("detail_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: map and scatter ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.state.session else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a sightings file to begin  (File → Open sightings…)");
                });
                return;
            };

            let mut brush = None;
            ui.columns(2, |cols| {
                session.views.map.borrow().show(&mut cols[0]);
                // The borrow ends here, before any broadcast reaches the view.
                brush = session.views.scatter.borrow_mut().show(&mut cols[1]);
            });

            if let Some(event) = brush {
                self.state.apply_brush(event);
            }
        });
    }
}
