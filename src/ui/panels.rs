use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::ThresholdScale;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – file menu, year slider, headers
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open sightings…").clicked() {
                open_sightings_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open state boundaries…").clicked() {
                open_geometry_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        // Slider changes are applied after the closure releases the session.
        let mut requested_year = None;
        let mut clear = false;
        if let Some(session) = &state.session {
            let (first, last) = session.year_range;
            let mut year = session.slider_year;
            let slider = egui::Slider::new(&mut year, first.value()..=last.value()).text("year");
            if ui.add(slider).changed() {
                requested_year = Some(year);
            }

            ui.separator();
            match session.core.current_year() {
                Some(year) => ui.strong(format!("Year: {year}")),
                None => ui.strong("Year: –"),
            };
            ui.label(format!("Sightings: {}", session.year_total));
            let snapshot = session.core.snapshot();
            let selected = snapshot.iter().filter(|f| !f.filtered).count();
            ui.label(format!("States: {selected}/{}", snapshot.len()))
                .on_hover_text(session.source.as_str());

            ui.separator();
            if !session.core.predicate().is_cleared() && ui.small_button("Clear brush").clicked() {
                clear = true;
            }
        } else {
            ui.label("Open a sightings CSV to begin (File → Open sightings…)");
        }

        if let Some(year) = requested_year {
            state.set_year(year);
        }
        if clear {
            state.clear_brush();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – shape breakdown and report list
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.heading("Shapes");
    ui.separator();
    let pie = session.views.pie.borrow();
    pie.show(ui);
    pie.legend(ui);

    ui.add_space(8.0);
    ui.heading("Sightings per state");
    let scale = ThresholdScale::new(state.config.count_thresholds);
    for (label, color) in scale.legend_entries() {
        ui.colored_label(color, label);
    }

    ui.add_space(8.0);
    let table = session.views.table.borrow();
    ui.heading(format!("Reports ({})", table.len()));
    ui.separator();
    table.show(ui);
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_sightings_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sightings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_dataset(&path);
    }
}

pub fn open_geometry_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open state boundaries")
        .add_filter("GeoJSON", &["json", "geojson"])
        .pick_file();

    if let Some(path) = file {
        state.open_geometry(&path);
    }
}
