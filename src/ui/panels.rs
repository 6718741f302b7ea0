use accident_dashboard::view::{ChartId, DashboardView};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::plot;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar with the Time_of_Day dropdown.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dashboard.is_some(), egui::Button::new("Export JSON…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.dashboard.is_some() {
            ui.label(format!("{} accidents loaded", state.total_rows()));
            ui.separator();
            time_of_day_dropdown(ui, state);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn time_of_day_dropdown(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Filter by Time of Day");
    let current = state
        .selected
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    let mut picked = None;
    egui::ComboBox::from_id_salt("time_of_day")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.options {
                if ui
                    .selectable_label(option.as_str() == current, option.as_str())
                    .clicked()
                {
                    picked = Some(option.clone());
                }
            }
        });

    if let Some(value) = picked {
        log::debug!("time of day changed to {value}");
        state.select(value);
    }
}

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Rows of the dashboard, two charts side by side where paired.
const LAYOUT: [&[ChartId]; 5] = [
    &[ChartId::Correlation, ChartId::WeatherShare],
    &[ChartId::StateMap],
    &[ChartId::TopCities, ChartId::ElapsedTrend],
    &[ChartId::SeverityWeather, ChartId::SeverityElapsed],
    &[ChartId::SeverityDensity],
];

/// Render the eight chart slots of the current view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an accident dataset to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading("US Accidents Dashboard (2016-2025)");
            });
            ui.add_space(8.0);

            for row in LAYOUT {
                ui.columns(row.len(), |cols| {
                    for (ui, &id) in cols.iter_mut().zip(row.iter()) {
                        chart_card(ui, view, id);
                    }
                });
                ui.add_space(12.0);
            }
        });
}

fn chart_card(ui: &mut Ui, view: &DashboardView, id: ChartId) {
    let Some(spec) = view.chart(id) else {
        return;
    };
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .show(ui, |ui: &mut Ui| {
            plot::chart(ui, spec, &format!("{id:?}"));
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open accident data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match accident_dashboard::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} accidents from {} ({} columns)",
                    table.len(),
                    path.display(),
                    table.column_names().count()
                );
                state.set_dataset(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(dashboard) = &state.dashboard else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart specs")
        .add_filter("JSON", &["json"])
        .set_file_name("dashboard.json")
        .save_file();

    if let Some(path) = file {
        let export = accident_dashboard::export::export_views(dashboard);
        if let Err(e) = accident_dashboard::export::write_json(&export, &path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
