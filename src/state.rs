use std::sync::Arc;

use accident_dashboard::config::DashboardConfig;
use accident_dashboard::data::filter::FilterValue;
use accident_dashboard::data::model::AccidentTable;
use accident_dashboard::view::{Dashboard, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// View controller over the loaded table (None until a file is loaded).
    pub dashboard: Option<Dashboard>,

    /// Dropdown options, first encountered first.
    pub options: Vec<FilterValue>,

    /// Current Time_of_Day selection.
    pub selected: Option<FilterValue>,

    /// Charts for `selected`, rebuilt on every selection change.
    pub view: Option<DashboardView>,

    /// Settings applied to every dashboard built from a loaded file.
    pub config: DashboardConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dashboard: None,
            options: Vec::new(),
            selected: None,
            view: None,
            config,
            status_message: None,
        }
    }

    /// Ingest a newly loaded table and show the first time of day.
    pub fn set_dataset(&mut self, table: AccidentTable) {
        let dashboard = Dashboard::new(Arc::new(table), self.config.clone());
        self.options = dashboard.options();
        self.selected = dashboard.default_filter();
        self.dashboard = Some(dashboard);
        self.status_message = None;
        self.refresh();
    }

    /// Switch the Time_of_Day filter; recomputes all charts.
    pub fn select(&mut self, value: FilterValue) {
        if self.selected.as_ref() == Some(&value) {
            return;
        }
        self.selected = Some(value);
        self.refresh();
    }

    /// Number of loaded accidents.
    pub fn total_rows(&self) -> usize {
        self.dashboard.as_ref().map_or(0, |d| d.table().len())
    }

    fn refresh(&mut self) {
        self.view = match (&self.dashboard, &self.selected) {
            (Some(d), Some(value)) => Some(d.on_filter_change(value)),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_dashboard::data::model::{CellValue, Column};

    fn tiny_table() -> AccidentTable {
        let text = |vals: &[&str]| -> Vec<CellValue> {
            vals.iter().map(|v| CellValue::Text(v.to_string())).collect()
        };
        let num = |vals: &[f64]| -> Vec<CellValue> {
            vals.iter().map(|v| CellValue::Float(*v)).collect()
        };
        AccidentTable::from_columns(vec![
            Column::new("Time_of_Day", text(&["Evening", "Morning"])),
            Column::new("State", text(&["TX", "CA"])),
            Column::new("City", text(&["Austin", "Fresno"])),
            Column::new("Weather_Condition", text(&["Clear", "Rain"])),
            Column::new("Severity", num(&[2.0, 3.0])),
            Column::new("Wind_Speed(mph)", num(&[3.0, 9.0])),
            Column::new("Pressure(in)", num(&[29.8, 30.1])),
            Column::new("Temperature(F)", num(&[71.0, 55.0])),
            Column::new("Humidity(%)", num(&[40.0, 80.0])),
            Column::new("Time_Elapsed", num(&[1.0, 2.0])),
        ])
        .unwrap()
    }

    #[test]
    fn loading_selects_first_option() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(tiny_table());
        assert_eq!(state.selected, Some(FilterValue::new("Evening")));
        assert_eq!(state.view.as_ref().unwrap().charts.len(), 8);
        assert_eq!(state.total_rows(), 2);
    }

    #[test]
    fn selecting_rebuilds_the_view() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(tiny_table());
        state.select(FilterValue::new("Morning"));
        assert_eq!(state.view.as_ref().unwrap().filter, FilterValue::new("Morning"));
    }
}
