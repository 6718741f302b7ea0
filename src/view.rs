use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::{
    correlation_matrix, elapsed_trend, severity_by_elapsed, severity_by_top_weather,
    severity_density, state_severity_counts, top_cities, weather_share,
};
use crate::chart::{build, ChartKind, ChartSpec};
use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, FilterValue};
use crate::data::model::AccidentTable;

// ---------------------------------------------------------------------------
// Chart slots
// ---------------------------------------------------------------------------

/// The eight chart slots, in the order `on_filter_change` returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    Correlation,
    StateMap,
    ElapsedTrend,
    TopCities,
    WeatherShare,
    SeverityWeather,
    SeverityElapsed,
    SeverityDensity,
}

impl ChartId {
    pub const ALL: [ChartId; 8] = [
        ChartId::Correlation,
        ChartId::StateMap,
        ChartId::ElapsedTrend,
        ChartId::TopCities,
        ChartId::WeatherShare,
        ChartId::SeverityWeather,
        ChartId::SeverityElapsed,
        ChartId::SeverityDensity,
    ];

    pub fn kind(self) -> ChartKind {
        match self {
            ChartId::Correlation => ChartKind::Heatmap,
            ChartId::StateMap => ChartKind::Choropleth,
            ChartId::ElapsedTrend | ChartId::SeverityElapsed => ChartKind::Line,
            ChartId::TopCities => ChartKind::Bar,
            ChartId::WeatherShare => ChartKind::Pie,
            ChartId::SeverityWeather => ChartKind::StackedBar,
            ChartId::SeverityDensity => ChartKind::DensityHeatmap,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The complete output of one filter change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filter: FilterValue,
    /// Exactly one spec per [`ChartId`], in [`ChartId::ALL`] order.
    pub charts: Vec<ChartSpec>,
}

impl DashboardView {
    pub fn chart(&self, id: ChartId) -> Option<&ChartSpec> {
        self.charts.get(id.index())
    }
}

// ---------------------------------------------------------------------------
// View controller
// ---------------------------------------------------------------------------

/// Turns a Time_of_Day selection into the eight chart specs.
///
/// Holds the table read-only; every call recomputes all per-filter views
/// from scratch. Only the correlation chart, which ignores the filter, is
/// built once up front.
pub struct Dashboard {
    table: Arc<AccidentTable>,
    config: DashboardConfig,
    correlation: ChartSpec,
}

impl Dashboard {
    pub fn new(table: Arc<AccidentTable>, config: DashboardConfig) -> Self {
        let correlation = build(
            &correlation_matrix(&table),
            ChartId::Correlation.kind(),
            &config.style.correlation,
        );
        Self {
            table,
            config,
            correlation,
        }
    }

    pub fn table(&self) -> &AccidentTable {
        &self.table
    }

    /// Dropdown options, first encountered first.
    pub fn options(&self) -> Vec<FilterValue> {
        self.table
            .time_of_day_options()
            .into_iter()
            .map(FilterValue::new)
            .collect()
    }

    /// The selection shown before the user picks anything.
    pub fn default_filter(&self) -> Option<FilterValue> {
        self.options().into_iter().next()
    }

    /// Recompute every view for `value`. An unknown value yields empty
    /// charts, never an error.
    pub fn on_filter_change(&self, value: &FilterValue) -> DashboardView {
        let table = self.table.as_ref();
        let cfg = &self.config;
        let style = &cfg.style;
        let suffix = value.as_str();

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "recomputing views for {value:?} ({} of {} rows)",
                filtered_indices(table, value).len(),
                table.len()
            );
        }

        let charts = vec![
            self.correlation.clone(),
            build(
                state_severity_counts(table, value).as_slice(),
                ChartId::StateMap.kind(),
                &style.state_map.for_filter(suffix),
            ),
            build(
                elapsed_trend(table, value).as_slice(),
                ChartId::ElapsedTrend.kind(),
                &style.elapsed_trend.for_filter(suffix),
            ),
            build(
                top_cities(table, value, cfg.top_cities).as_slice(),
                ChartId::TopCities.kind(),
                &style.top_cities.for_filter(suffix),
            ),
            build(
                weather_share(table, value, cfg.top_weather_share).as_slice(),
                ChartId::WeatherShare.kind(),
                &style.weather_share.for_filter(suffix),
            ),
            build(
                severity_by_top_weather(table, value, cfg.top_weather_severity).as_slice(),
                ChartId::SeverityWeather.kind(),
                &style.severity_weather.for_filter(suffix),
            ),
            build(
                severity_by_elapsed(table, value).as_slice(),
                ChartId::SeverityElapsed.kind(),
                &style.severity_elapsed.for_filter(suffix),
            ),
            build(
                &severity_density(table, value, cfg.density_bins),
                ChartId::SeverityDensity.kind(),
                &style.severity_density.for_filter(suffix),
            ),
        ];

        DashboardView {
            filter: value.clone(),
            charts,
        }
    }
}
