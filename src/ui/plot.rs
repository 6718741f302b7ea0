use std::collections::HashMap;
use std::f64::consts::TAU;

use accident_dashboard::chart::color::generate_palette;
use accident_dashboard::chart::{ChartKind, ChartSpec, ChartStyle, GridAxis, Panel, Rgb, Series};
use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use super::tiles::STATE_TILES;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

/// Readable text colour on top of `fill`.
fn label_color(fill: Rgb) -> Color32 {
    if fill.luminance() > 0.55 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Render one chart spec: title, then its panels.
pub fn chart(ui: &mut Ui, spec: &ChartSpec, id: &str) {
    ui.label(RichText::new(&spec.title).strong().size(15.0));

    if spec.is_empty() {
        ui.add_space(8.0);
        ui.weak("No accidents for this selection.");
        ui.add_space(8.0);
        return;
    }

    let style = &spec.style;
    match spec.kind {
        ChartKind::Heatmap => {
            for (i, panel) in spec.panels.iter().enumerate() {
                grid_plot(ui, panel, style, style.height, &format!("{id}_{i}"));
            }
        }
        ChartKind::DensityHeatmap => facets(ui, &spec.panels, style, id, |ui, panel, pid| {
            grid_plot(ui, panel, style, 220.0, pid)
        }),
        ChartKind::Choropleth => facets(ui, &spec.panels, style, id, |ui, panel, pid| {
            state_map(ui, panel, pid)
        }),
        ChartKind::Bar | ChartKind::StackedBar => {
            let stacked = spec.kind == ChartKind::StackedBar;
            for (i, panel) in spec.panels.iter().enumerate() {
                bar_plot(ui, panel, style, stacked, &format!("{id}_{i}"));
            }
        }
        ChartKind::Line => {
            for (i, panel) in spec.panels.iter().enumerate() {
                line_plot(ui, panel, style, &format!("{id}_{i}"));
            }
        }
        ChartKind::Pie => {
            for (i, panel) in spec.panels.iter().enumerate() {
                pie_plot(ui, panel, style, &format!("{id}_{i}"));
            }
        }
    }
}

/// Lay panels out `facet_wrap` per row, each with its own sub-title.
fn facets(
    ui: &mut Ui,
    panels: &[Panel],
    style: &ChartStyle,
    id: &str,
    draw: impl Fn(&mut Ui, &Panel, &str),
) {
    let per_row = style.facet_wrap.unwrap_or(panels.len()).max(1);
    for (row_idx, row) in panels.chunks(per_row).enumerate() {
        ui.columns(per_row, |cols| {
            for (col_idx, panel) in row.iter().enumerate() {
                let ui = &mut cols[col_idx];
                if let Some(title) = &panel.title {
                    ui.small(title);
                }
                draw(ui, panel, &format!("{id}_{row_idx}_{col_idx}"));
            }
        });
    }
}

/// Formatter showing `labels[i]` at integer tick `i` (or `-i` when `flip`).
fn label_formatter(
    labels: Vec<String>,
    flip: bool,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = if flip { -mark.value } else { mark.value };
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn rect(x0: f64, x1: f64, y0: f64, y1: f64) -> PlotPoints<'static> {
    PlotPoints::new(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
}

// ---------------------------------------------------------------------------
// Heatmaps (correlation matrix and density facets)
// ---------------------------------------------------------------------------

/// Cell bounds along an axis: category `i` spans `i ± 0.5`, bins span their
/// edges.
fn cell_bounds(axis: &GridAxis, i: usize) -> Option<(f64, f64)> {
    match axis {
        GridAxis::Labels(_) => Some((i as f64 - 0.5, i as f64 + 0.5)),
        GridAxis::Edges(e) => Some((*e.get(i)?, *e.get(i + 1)?)),
    }
}

fn grid_plot(ui: &mut Ui, panel: &Panel, style: &ChartStyle, height: f32, id: &str) {
    let Some(Series::Grid { x, y, z, .. }) = panel.series.first() else {
        return;
    };
    let scale = panel.color_scale;
    let [zmin, zmax] = panel.z_range.unwrap_or([0.0, 1.0]);
    // Category rows are drawn top-down like a matrix.
    let flip_y = matches!(y, GridAxis::Labels(_));

    let mut plot = Plot::new(id.to_string())
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .show_grid(false);
    if let Some(label) = &panel.x_label {
        plot = plot.x_axis_label(label.clone());
    }
    if let Some(label) = &panel.y_label {
        plot = plot.y_axis_label(label.clone());
    }
    if let GridAxis::Labels(labels) = x {
        plot = plot.x_axis_formatter(label_formatter(labels.clone(), false));
    }
    if let GridAxis::Labels(labels) = y {
        plot = plot.y_axis_formatter(label_formatter(labels.clone(), true));
    }

    plot.show(ui, |plot_ui| {
        for (row, values) in z.iter().enumerate() {
            let Some((y0, y1)) = cell_bounds(y, row) else {
                continue;
            };
            let (y0, y1) = if flip_y { (-y1, -y0) } else { (y0, y1) };
            for (col, value) in values.iter().enumerate() {
                let Some((x0, x1)) = cell_bounds(x, col) else {
                    continue;
                };
                let fill = match (value, scale) {
                    (Some(v), Some(scale)) => scale.map(*v, zmin, zmax),
                    (Some(_), None) => Rgb::GRAY,
                    (None, _) => Rgb::new(235, 235, 235),
                };
                plot_ui.polygon(
                    Polygon::new(rect(x0, x1, y0, y1))
                        .fill_color(color32(fill))
                        .stroke(Stroke::new(0.5, Color32::WHITE)),
                );
                if let (true, Some(v)) = (style.show_values, value) {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new((x0 + x1) / 2.0, (y0 + y1) / 2.0),
                            RichText::new(format!("{v:.2}")).size(10.0),
                        )
                        .color(label_color(fill)),
                    );
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// State tile map
// ---------------------------------------------------------------------------

fn state_map(ui: &mut Ui, panel: &Panel, id: &str) {
    let Some(Series::Categories { labels, values, .. }) = panel.series.first() else {
        return;
    };
    let by_state: HashMap<&str, f64> = labels
        .iter()
        .map(String::as_str)
        .zip(values.iter().copied())
        .collect();
    let [zmin, zmax] = panel.z_range.unwrap_or([0.0, 1.0]);
    let scale = panel.color_scale;

    Plot::new(id.to_string())
        .height(240.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for &(code, col, row) in &STATE_TILES {
                let x = col as f64;
                let y = -(row as f64);
                let fill = match (by_state.get(code), scale) {
                    (Some(&v), Some(scale)) => scale.map(v, zmin, zmax),
                    (Some(_), None) => Rgb::GRAY,
                    (None, _) => Rgb::new(235, 235, 235),
                };
                plot_ui.polygon(
                    Polygon::new(rect(x - 0.45, x + 0.45, y - 0.45, y + 0.45))
                        .fill_color(color32(fill))
                        .stroke(Stroke::new(0.5, Color32::WHITE))
                        .name(code),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), RichText::new(code).size(9.0))
                        .color(label_color(fill)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

fn bar_plot(ui: &mut Ui, panel: &Panel, style: &ChartStyle, stacked: bool, id: &str) {
    let mut labels: Vec<String> = Vec::new();
    let mut charts: Vec<BarChart> = Vec::new();
    let mut annotations: Vec<(f64, f64)> = Vec::new();

    for series in &panel.series {
        let Series::Categories {
            name,
            labels: cats,
            values,
            color,
        } = series
        else {
            continue;
        };
        if labels.is_empty() {
            labels = cats.clone();
        }
        let fill = color32(color.unwrap_or(Rgb::GRAY));
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Bar::new(i as f64, v)
                    .name(cats.get(i).map(String::as_str).unwrap_or(""))
                    .fill(fill)
            })
            .collect();
        if style.show_values {
            annotations.extend(values.iter().enumerate().map(|(i, &v)| (i as f64, v)));
        }

        let mut bar_chart = BarChart::new(bars).name(name).color(fill);
        if stacked {
            let below: Vec<&BarChart> = charts.iter().collect();
            bar_chart = bar_chart.stack_on(&below);
        }
        charts.push(bar_chart);
    }

    let mut plot = Plot::new(id.to_string())
        .height(style.height)
        .legend(Legend::default())
        .x_axis_formatter(label_formatter(labels, false));
    if let Some(label) = &panel.x_label {
        plot = plot.x_axis_label(label.clone());
    }
    if let Some(label) = &panel.y_label {
        plot = plot.y_axis_label(label.clone());
    }

    plot.show(ui, |plot_ui| {
        for c in charts {
            plot_ui.bar_chart(c);
        }
        for (x, v) in annotations {
            plot_ui.text(Text::new(PlotPoint::new(x, v), format!("{v}")).anchor(Align2::CENTER_BOTTOM));
        }
    });
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

fn line_plot(ui: &mut Ui, panel: &Panel, style: &ChartStyle, id: &str) {
    let mut plot = Plot::new(id.to_string())
        .height(style.height)
        .legend(Legend::default())
        .allow_boxed_zoom(true);
    if let Some(label) = &panel.x_label {
        plot = plot.x_axis_label(label.clone());
    }
    if let Some(label) = &panel.y_label {
        plot = plot.y_axis_label(label.clone());
    }

    plot.show(ui, |plot_ui| {
        for series in &panel.series {
            let Series::Points { name, x, y, color } = series else {
                continue;
            };
            let color = color32(color.unwrap_or(Rgb::GRAY));
            let points: Vec<[f64; 2]> = x.iter().zip(y).map(|(&xi, &yi)| [xi, yi]).collect();

            plot_ui.line(
                Line::new(PlotPoints::new(points.clone()))
                    .name(name)
                    .color(color)
                    .width(2.0),
            );
            if style.markers {
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(name)
                        .color(color)
                        .radius(3.0),
                );
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Pie / donut
// ---------------------------------------------------------------------------

/// Arc segments per full turn; each segment is a convex quad.
const PIE_SEGMENTS: f64 = 180.0;

fn pie_plot(ui: &mut Ui, panel: &Panel, style: &ChartStyle, id: &str) {
    let Some(Series::Categories { labels, values, .. }) = panel.series.first() else {
        return;
    };
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return;
    }
    let hole = style.hole.unwrap_or(0.0).clamp(0.0, 0.95) as f64;
    let colors = generate_palette(values.len());

    Plot::new(id.to_string())
        .height(style.height)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // Start at 12 o'clock and go clockwise, like most pie renderers.
            let mut start = 0.25 * TAU;
            for ((label, &value), &rgb) in labels.iter().zip(values).zip(&colors) {
                let sweep = value / total * TAU;
                let steps = ((sweep / TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
                let fill = color32(rgb);
                for s in 0..steps {
                    let a0 = start - sweep * s as f64 / steps as f64;
                    let a1 = start - sweep * (s + 1) as f64 / steps as f64;
                    let quad = vec![
                        [hole * a0.cos(), hole * a0.sin()],
                        [a0.cos(), a0.sin()],
                        [a1.cos(), a1.sin()],
                        [hole * a1.cos(), hole * a1.sin()],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(quad))
                            .fill_color(fill)
                            .stroke(Stroke::new(0.0, fill))
                            .name(label),
                    );
                }

                let mid = start - sweep / 2.0;
                let r = (1.0 + hole) / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(r * mid.cos(), r * mid.sin()),
                        RichText::new(format!("{:.1}%", value / total * 100.0)).size(10.0),
                    )
                    .color(label_color(rgb)),
                );
                start -= sweep;
            }
        });
}
