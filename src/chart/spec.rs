use serde::Serialize;

use super::color::{ColorScale, Rgb};
use super::style::ChartStyle;

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Annotated matrix of labelled cells.
    Heatmap,
    /// Value per US state, one map per facet.
    Choropleth,
    Line,
    Bar,
    Pie,
    StackedBar,
    /// 2-D histogram over binned numeric axes.
    DensityHeatmap,
}

/// Axis of a grid series: either category labels or numeric bin edges
/// (`edges.len() == cells + 1`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAxis {
    Labels(Vec<String>),
    Edges(Vec<f64>),
}

impl GridAxis {
    pub fn cells(&self) -> usize {
        match self {
            GridAxis::Labels(l) => l.len(),
            GridAxis::Edges(e) => e.len().saturating_sub(1),
        }
    }
}

/// One data series of a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    /// Values keyed by category label (bars, pie slices, map regions).
    Categories {
        name: String,
        labels: Vec<String>,
        values: Vec<f64>,
        color: Option<Rgb>,
    },
    /// Numeric x/y pairs (lines).
    Points {
        name: String,
        x: Vec<f64>,
        y: Vec<f64>,
        color: Option<Rgb>,
    },
    /// `z[row][col]` over a `y` × `x` grid; `None` marks an undefined cell.
    Grid {
        name: String,
        x: GridAxis,
        y: GridAxis,
        z: Vec<Vec<Option<f64>>>,
    },
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Categories { name, .. } | Series::Points { name, .. } | Series::Grid { name, .. } => {
                name
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Series::Categories { values, .. } => values.is_empty(),
            Series::Points { x, .. } => x.is_empty(),
            Series::Grid { z, .. } => z.iter().all(Vec::is_empty),
        }
    }
}

/// One facet of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Continuous colour encoding for grids and maps.
    pub color_scale: Option<ColorScale>,
    /// Value range the colour scale spans; shared by sibling facets.
    pub z_range: Option<[f64; 2]>,
    pub series: Vec<Series>,
}

impl Panel {
    pub fn new(series: Vec<Series>) -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            color_scale: None,
            z_range: None,
            series,
        }
    }
}

/// Declarative, renderer-agnostic description of one visualization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub style: ChartStyle,
    pub panels: Vec<Panel>,
}

impl ChartSpec {
    /// True when no panel carries any data point.
    pub fn is_empty(&self) -> bool {
        self.panels
            .iter()
            .flat_map(|p| &p.series)
            .all(Series::is_empty)
    }
}
