use serde::Serialize;

use super::color::{ColorScale, Rgb};

/// Presentation options handed to a chart builder alongside its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Fill / stroke colour of single-series charts.
    pub color: Option<Rgb>,
    /// Continuous scales; panel group `i` uses `color_scales[i]`.
    pub color_scales: Vec<ColorScale>,
    /// Fixed colour range, otherwise derived from the data.
    pub z_range: Option<[f64; 2]>,
    pub height: f32,
    /// Print values on bars and heatmap cells.
    pub show_values: bool,
    /// Draw point markers on lines.
    pub markers: bool,
    /// Inner radius of a donut chart as a fraction of the outer one.
    pub hole: Option<f32>,
    /// Rotation of x tick labels, degrees.
    pub tick_angle: Option<f32>,
    pub legend_title: Option<String>,
    /// Facets per row.
    pub facet_wrap: Option<usize>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: None,
            y_label: None,
            color: None,
            color_scales: Vec::new(),
            z_range: None,
            height: 400.0,
            show_values: false,
            markers: false,
            hole: None,
            tick_angle: None,
            legend_title: None,
            facet_wrap: None,
        }
    }
}

impl ChartStyle {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Copy with ` — {suffix}` appended to the title.
    pub fn for_filter(&self, suffix: &str) -> Self {
        Self {
            title: format!("{} — {suffix}", self.title),
            ..self.clone()
        }
    }

    pub fn scale(&self, group: usize) -> Option<ColorScale> {
        self.color_scales
            .get(group)
            .or_else(|| self.color_scales.last())
            .copied()
    }
}

/// Styling for all eight dashboard charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStyle {
    pub correlation: ChartStyle,
    pub state_map: ChartStyle,
    pub elapsed_trend: ChartStyle,
    pub top_cities: ChartStyle,
    pub weather_share: ChartStyle,
    pub severity_weather: ChartStyle,
    pub severity_elapsed: ChartStyle,
    pub severity_density: ChartStyle,
}

impl Default for DashboardStyle {
    fn default() -> Self {
        let rgb = |hex: &str| Rgb::from_hex(hex);
        Self {
            correlation: ChartStyle {
                color_scales: vec![ColorScale::RdBu],
                z_range: Some([-1.0, 1.0]),
                height: 600.0,
                show_values: true,
                ..ChartStyle::titled("Correlation Matrix of Numerical Features")
            },
            state_map: ChartStyle {
                color_scales: vec![ColorScale::Reds],
                legend_title: Some("Accident_Count".into()),
                facet_wrap: Some(2),
                ..ChartStyle::titled("Accident Distribution by State")
            },
            elapsed_trend: ChartStyle {
                x_label: Some("Time_Elapsed".into()),
                y_label: Some("Accident_Count".into()),
                color: rgb("#007BFF"),
                markers: true,
                ..ChartStyle::titled("Accident Count by Time Elapsed")
            },
            top_cities: ChartStyle {
                x_label: Some("City".into()),
                y_label: Some("Number of Accidents".into()),
                color: rgb("#28A745"),
                show_values: true,
                ..ChartStyle::titled("Top 20 Cities with Most Accidents")
            },
            weather_share: ChartStyle {
                hole: Some(0.3),
                legend_title: Some("Weather Condition".into()),
                ..ChartStyle::titled("Top Weather Conditions During Accidents")
            },
            severity_weather: ChartStyle {
                x_label: Some("Weather_Condition".into()),
                y_label: Some("Count".into()),
                tick_angle: Some(45.0),
                legend_title: Some("Severity".into()),
                ..ChartStyle::titled("Severity vs Top 15 Weather Conditions")
            },
            severity_elapsed: ChartStyle {
                x_label: Some("Time Elapsed".into()),
                y_label: Some("Number of Accidents".into()),
                markers: true,
                legend_title: Some("Severity".into()),
                ..ChartStyle::titled("Accident Count by Severity Over Time Elapsed")
            },
            severity_density: ChartStyle {
                color_scales: vec![ColorScale::Blues, ColorScale::Reds],
                facet_wrap: Some(4),
                ..ChartStyle::titled("Weather Density by Severity")
            },
        }
    }
}

/// Axis label for a raw column name, e.g. `Wind_Speed(mph)` → `Wind Speed (mph)`.
pub fn axis_label(column: &str) -> String {
    let spaced = column.replace('_', " ");
    match spaced.find('(') {
        Some(i) if i > 0 && !spaced[..i].ends_with(' ') => {
            format!("{} {}", &spaced[..i], &spaced[i..])
        }
        _ => spaced,
    }
}
