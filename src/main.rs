mod app;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use accident_dashboard::config::Args;
use accident_dashboard::data::loader::load_file;
use accident_dashboard::data::model::AccidentTable;
use accident_dashboard::export::{export_views, write_json};
use accident_dashboard::view::Dashboard;
use anyhow::{Context, Result};
use app::AccidentDashboardApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

fn load(path: &Path) -> Result<AccidentTable> {
    let table = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} accidents with columns {:?}",
        table.len(),
        table.column_names().collect::<Vec<_>>()
    );
    Ok(table)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.dashboard_config()?;

    // ---- Headless: dump every view and exit ----
    if let Some(out) = &args.export {
        let table = load(args.required_data()?)?;
        let dashboard = Dashboard::new(Arc::new(table), config);
        return write_json(&export_views(&dashboard), out);
    }

    // A dataset given up front must load; the window never opens degraded.
    let mut state = AppState::new(config);
    match &args.data {
        Some(path) => state.set_dataset(load(path)?),
        None => ui::panels::open_file_dialog(&mut state),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "US Accidents Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(AccidentDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
