use std::collections::BTreeSet;

use super::color::ColorMap;
use super::spec::{ChartKind, ChartSpec, GridAxis, Panel, Series};
use super::style::{axis_label, ChartStyle};
use crate::aggregate::{
    CategoryCount, CorrelationMatrix, CrossCount, DensityGrid, SeverityDensity, TrendPoint,
};
use crate::data::model::CellValue;

/// A derived summary that can be laid out as chart panels.
///
/// Implementations only map structure: no counting or filtering happens
/// here.
pub trait Summary {
    fn panels(&self, kind: ChartKind, style: &ChartStyle) -> Vec<Panel>;
}

/// Wrap a summary into a chart specification.
pub fn build<S: Summary + ?Sized>(summary: &S, kind: ChartKind, style: &ChartStyle) -> ChartSpec {
    ChartSpec {
        kind,
        title: style.title.clone(),
        style: style.clone(),
        panels: summary.panels(kind, style),
    }
}

fn labelled(mut panel: Panel, style: &ChartStyle) -> Panel {
    panel.x_label = style.x_label.clone();
    panel.y_label = style.y_label.clone();
    panel
}

fn series_name(style: &ChartStyle, fallback: &str) -> String {
    style
        .legend_title
        .clone()
        .unwrap_or_else(|| fallback.to_string())
}

// ---------------------------------------------------------------------------
// Correlation matrix → annotated heatmap
// ---------------------------------------------------------------------------

impl Summary for CorrelationMatrix {
    fn panels(&self, _kind: ChartKind, style: &ChartStyle) -> Vec<Panel> {
        let z: Vec<Vec<Option<f64>>> = self
            .values
            .iter()
            .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
            .collect();
        let mut panel = labelled(
            Panel::new(vec![Series::Grid {
                name: "correlation".into(),
                x: GridAxis::Labels(self.columns.clone()),
                y: GridAxis::Labels(self.columns.clone()),
                z,
            }]),
            style,
        );
        panel.color_scale = style.scale(0);
        panel.z_range = style.z_range.or(Some([-1.0, 1.0]));
        vec![panel]
    }
}

// ---------------------------------------------------------------------------
// Category counts → bars or pie
// ---------------------------------------------------------------------------

impl Summary for [CategoryCount] {
    fn panels(&self, kind: ChartKind, style: &ChartStyle) -> Vec<Panel> {
        let fallback = if kind == ChartKind::Pie { "share" } else { "count" };
        let series = Series::Categories {
            name: series_name(style, fallback),
            labels: self.iter().map(|c| c.label.clone()).collect(),
            values: self.iter().map(|c| c.count as f64).collect(),
            color: style.color,
        };
        vec![labelled(Panel::new(vec![series]), style)]
    }
}

// ---------------------------------------------------------------------------
// Trend → single line
// ---------------------------------------------------------------------------

impl Summary for [TrendPoint] {
    fn panels(&self, _kind: ChartKind, style: &ChartStyle) -> Vec<Panel> {
        let series = Series::Points {
            name: series_name(style, "count"),
            x: self.iter().map(|p| p.elapsed).collect(),
            y: self.iter().map(|p| p.count as f64).collect(),
            color: style.color,
        };
        vec![labelled(Panel::new(vec![series]), style)]
    }
}

// ---------------------------------------------------------------------------
// (key, severity) counts → map facets, stacked bars or lines
// ---------------------------------------------------------------------------

fn severities(counts: &[CrossCount]) -> Vec<&CellValue> {
    counts
        .iter()
        .map(|c| &c.severity)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct keys in the order they first appear.
fn keys(counts: &[CrossCount]) -> Vec<&CellValue> {
    let mut seen = BTreeSet::new();
    counts
        .iter()
        .map(|c| &c.key)
        .filter(|k| seen.insert(*k))
        .collect()
}

fn severity_title(severity: &CellValue) -> String {
    format!("Severity={severity}")
}

impl Summary for [CrossCount] {
    fn panels(&self, kind: ChartKind, style: &ChartStyle) -> Vec<Panel> {
        let levels = severities(self);
        match kind {
            ChartKind::Choropleth => {
                let max = self.iter().map(|c| c.count).max().unwrap_or(0) as f64;
                levels
                    .into_iter()
                    .map(|level| {
                        let rows: Vec<&CrossCount> =
                            self.iter().filter(|c| &c.severity == level).collect();
                        let mut panel = labelled(
                            Panel::new(vec![Series::Categories {
                                name: series_name(style, "count"),
                                labels: rows.iter().map(|c| c.key.to_string()).collect(),
                                values: rows.iter().map(|c| c.count as f64).collect(),
                                color: None,
                            }]),
                            style,
                        );
                        panel.title = Some(severity_title(level));
                        panel.color_scale = style.scale(0);
                        panel.z_range = style.z_range.or(Some([0.0, max]));
                        panel
                    })
                    .collect()
            }
            ChartKind::Bar | ChartKind::StackedBar => {
                let colors = ColorMap::new(levels.iter().copied());
                let order = keys(self);
                let labels: Vec<String> = order.iter().map(|k| k.to_string()).collect();
                let series = levels
                    .iter()
                    .map(|&level| {
                        let values = order
                            .iter()
                            .map(|&k| {
                                self.iter()
                                    .find(|c| &c.key == k && &c.severity == level)
                                    .map_or(0.0, |c| c.count as f64)
                            })
                            .collect();
                        Series::Categories {
                            name: level.to_string(),
                            labels: labels.clone(),
                            values,
                            color: Some(colors.color_for(level)),
                        }
                    })
                    .collect();
                vec![labelled(Panel::new(series), style)]
            }
            ChartKind::Line => {
                let colors = ColorMap::new(levels.iter().copied());
                let series = levels
                    .iter()
                    .map(|&level| {
                        let (x, y): (Vec<f64>, Vec<f64>) = self
                            .iter()
                            .filter(|c| &c.severity == level)
                            .filter_map(|c| Some((c.key.as_f64()?, c.count as f64)))
                            .unzip();
                        Series::Points {
                            name: level.to_string(),
                            x,
                            y,
                            color: Some(colors.color_for(level)),
                        }
                    })
                    .collect();
                vec![labelled(Panel::new(series), style)]
            }
            ChartKind::Heatmap | ChartKind::Pie | ChartKind::DensityHeatmap => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Density → faceted heatmaps
// ---------------------------------------------------------------------------

fn density_panels(grid: &DensityGrid, group: usize, style: &ChartStyle) -> Vec<Panel> {
    let max = grid.facets.iter().map(|f| f.max()).max().unwrap_or(0) as f64;
    let x_label = axis_label(&grid.x_column);
    let y_label = axis_label(&grid.y_column);

    grid.facets
        .iter()
        .map(|facet| {
            let z = facet
                .counts
                .iter()
                .map(|row| row.iter().map(|&c| Some(c as f64)).collect())
                .collect();
            Panel {
                title: Some(format!(
                    "{y_label} vs. {x_label} · {}",
                    severity_title(&facet.severity)
                )),
                x_label: Some(x_label.clone()),
                y_label: Some(y_label.clone()),
                color_scale: style.scale(group),
                z_range: Some([0.0, max]),
                series: vec![Series::Grid {
                    name: "count".into(),
                    x: GridAxis::Edges(grid.x_edges.clone()),
                    y: GridAxis::Edges(grid.y_edges.clone()),
                    z,
                }],
            }
        })
        .collect()
}

impl Summary for SeverityDensity {
    fn panels(&self, _kind: ChartKind, style: &ChartStyle) -> Vec<Panel> {
        let mut panels = density_panels(&self.wind_pressure, 0, style);
        panels.extend(density_panels(&self.temperature_humidity, 1, style));
        panels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::color::ColorScale;
    use crate::chart::style::DashboardStyle;

    fn cross(key: CellValue, severity: i64, count: usize) -> CrossCount {
        CrossCount {
            key,
            severity: CellValue::Integer(severity),
            count,
        }
    }

    #[test]
    fn city_bars_keep_order_and_style() {
        let cities = vec![
            CategoryCount { label: "Austin".into(), count: 120 },
            CategoryCount { label: "Dallas".into(), count: 80 },
        ];
        let style = DashboardStyle::default().top_cities;
        let spec = build(cities.as_slice(), ChartKind::Bar, &style);

        assert_eq!(spec.kind, ChartKind::Bar);
        let Series::Categories { labels, values, color, .. } = &spec.panels[0].series[0] else {
            panic!("expected category series");
        };
        assert_eq!(labels[0], "Austin");
        assert_eq!(values[0], 120.0);
        assert_eq!(*color, style.color);
    }

    #[test]
    fn choropleth_facets_per_severity_with_shared_range() {
        let counts = vec![
            cross(CellValue::Text("CA".into()), 2, 4),
            cross(CellValue::Text("TX".into()), 2, 9),
            cross(CellValue::Text("TX".into()), 3, 1),
        ];
        let style = DashboardStyle::default().state_map;
        let spec = build(counts.as_slice(), ChartKind::Choropleth, &style);

        assert_eq!(spec.panels.len(), 2);
        assert_eq!(spec.panels[0].title.as_deref(), Some("Severity=2"));
        assert!(spec.panels.iter().all(|p| p.z_range == Some([0.0, 9.0])));
        assert_eq!(spec.panels[1].color_scale, Some(ColorScale::Reds));
    }

    #[test]
    fn stacked_bars_zero_fill_missing_pairs() {
        let counts = vec![
            cross(CellValue::Text("Clear".into()), 2, 5),
            cross(CellValue::Text("Rain".into()), 3, 2),
        ];
        let spec = build(counts.as_slice(), ChartKind::StackedBar, &ChartStyle::default());
        let series = &spec.panels[0].series;
        assert_eq!(series.len(), 2);
        let Series::Categories { labels, values, .. } = &series[0] else {
            panic!("expected category series");
        };
        assert_eq!(labels, &vec!["Clear".to_string(), "Rain".to_string()]);
        assert_eq!(values, &vec![5.0, 0.0]);
    }

    #[test]
    fn severity_lines_use_numeric_keys() {
        let counts = vec![
            cross(CellValue::Float(1.0), 2, 3),
            cross(CellValue::Float(2.0), 2, 4),
            cross(CellValue::Float(2.0), 4, 1),
        ];
        let spec = build(counts.as_slice(), ChartKind::Line, &ChartStyle::default());
        let series = &spec.panels[0].series;
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name(), "2");
        let Series::Points { x, y, .. } = &series[0] else {
            panic!("expected point series");
        };
        assert_eq!(x, &vec![1.0, 2.0]);
        assert_eq!(y, &vec![3.0, 4.0]);
    }

    #[test]
    fn cross_counts_have_no_pie_or_heatmap_form() {
        let counts = vec![cross(CellValue::Float(1.0), 2, 3)];
        for kind in [ChartKind::Pie, ChartKind::Heatmap, ChartKind::DensityHeatmap] {
            let spec = build(counts.as_slice(), kind, &ChartStyle::default());
            assert!(spec.panels.is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn correlation_nan_becomes_undefined_cell() {
        let m = CorrelationMatrix {
            columns: vec!["a".into(), "b".into()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
        };
        let spec = build(&m, ChartKind::Heatmap, &DashboardStyle::default().correlation);
        let Series::Grid { z, .. } = &spec.panels[0].series[0] else {
            panic!("expected grid series");
        };
        assert_eq!(z[0], vec![Some(1.0), None]);
        assert_eq!(spec.panels[0].z_range, Some([-1.0, 1.0]));
    }

    #[test]
    fn empty_summary_builds_empty_chart() {
        let none: Vec<CategoryCount> = Vec::new();
        let spec = build(none.as_slice(), ChartKind::Pie, &ChartStyle::default());
        assert!(spec.is_empty());
    }
}
