use std::path::PathBuf;

use clap::Parser;

use crate::aggregate::{
    DEFAULT_DENSITY_BINS, MAX_DENSITY_BINS, TOP_CITIES, TOP_WEATHER_SEVERITY, TOP_WEATHER_SHARE,
};
use crate::chart::DashboardStyle;
use crate::error::ConfigError;

/// Command line of the dashboard binary.
#[derive(Parser, Debug)]
#[command(
    name = "accident-dashboard",
    version,
    about = "Interactive US traffic accident dashboard, filtered by time of day"
)]
pub struct Args {
    #[arg(
        value_name = "DATA_FILE",
        env = "ACCIDENTS_DATA",
        help = "Accident dataset (.csv, .parquet or .json); a file dialog opens when omitted"
    )]
    pub data: Option<PathBuf>,

    #[arg(
        long = "export",
        value_name = "OUT_JSON",
        help = "Write the chart specs of every time of day to this JSON file and exit"
    )]
    pub export: Option<PathBuf>,

    #[arg(
        long = "bins",
        default_value_t = DEFAULT_DENSITY_BINS,
        help = "Bins per axis of the density heatmaps"
    )]
    pub bins: usize,
}

impl Args {
    pub fn dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        if !(1..=MAX_DENSITY_BINS).contains(&self.bins) {
            return Err(ConfigError::InvalidBins(self.bins));
        }
        Ok(DashboardConfig {
            density_bins: self.bins,
            ..Default::default()
        })
    }

    /// The data file export mode reads; there is no dialog to fall back on.
    pub fn required_data(&self) -> Result<&PathBuf, ConfigError> {
        self.data.as_ref().ok_or(ConfigError::NoDataFile)
    }
}

/// Knobs of the view controller.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub top_cities: usize,
    pub top_weather_share: usize,
    pub top_weather_severity: usize,
    pub density_bins: usize,
    pub style: DashboardStyle,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_cities: TOP_CITIES,
            top_weather_share: TOP_WEATHER_SHARE,
            top_weather_severity: TOP_WEATHER_SEVERITY,
            density_bins: DEFAULT_DENSITY_BINS,
            style: DashboardStyle::default(),
        }
    }
}
