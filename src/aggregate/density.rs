use std::collections::BTreeMap;

use crate::data::filter::{filtered_indices, FilterValue};
use crate::data::model::{AccidentTable, CellValue, Column};

/// 2-D histogram of one severity level. `counts[y][x]` is the number of
/// accidents in cell (`x_edges[x]..x_edges[x+1]`, `y_edges[y]..y_edges[y+1]`).
#[derive(Debug, Clone, PartialEq)]
pub struct DensityFacet {
    pub severity: CellValue,
    pub counts: Vec<Vec<usize>>,
}

impl DensityFacet {
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn max(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Density of one pair of numeric columns, one facet per severity, with
/// bin edges shared by all facets.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub x_column: String,
    pub y_column: String,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub facets: Vec<DensityFacet>,
}

impl DensityGrid {
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

/// Both density views of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityDensity {
    pub wind_pressure: DensityGrid,
    pub temperature_humidity: DensityGrid,
}

/// Wind speed × pressure and temperature × humidity densities for the
/// selected time of day, faceted by severity. `bins` is the number of bins
/// per axis and is at least 1.
pub fn severity_density(table: &AccidentTable, filter: &FilterValue, bins: usize) -> SeverityDensity {
    let rows = filtered_indices(table, filter);
    SeverityDensity {
        wind_pressure: density_grid(table, table.wind_speed(), table.pressure(), &rows, bins),
        temperature_humidity: density_grid(
            table,
            table.temperature(),
            table.humidity(),
            &rows,
            bins,
        ),
    }
}

fn density_grid(
    table: &AccidentTable,
    x: &Column,
    y: &Column,
    rows: &[usize],
    bins: usize,
) -> DensityGrid {
    let bins = bins.max(1);
    let severity = table.severity();

    let points: Vec<(&CellValue, f64, f64)> = rows
        .iter()
        .filter_map(|&row| {
            let s = severity.values.get(row).filter(|s| !s.is_null())?;
            Some((s, x.f64_at(row)?, y.f64_at(row)?))
        })
        .collect();

    let mut grid = DensityGrid {
        x_column: x.name.clone(),
        y_column: y.name.clone(),
        x_edges: Vec::new(),
        y_edges: Vec::new(),
        facets: Vec::new(),
    };
    if points.is_empty() {
        return grid;
    }

    let x_axis = Axis::spanning(points.iter().map(|p| p.1), bins);
    let y_axis = Axis::spanning(points.iter().map(|p| p.2), bins);

    let mut facets: BTreeMap<&CellValue, Vec<Vec<usize>>> = BTreeMap::new();
    for &(s, px, py) in &points {
        let cells = facets
            .entry(s)
            .or_insert_with(|| vec![vec![0; bins]; bins]);
        cells[y_axis.bin(py)][x_axis.bin(px)] += 1;
    }

    grid.x_edges = x_axis.edges();
    grid.y_edges = y_axis.edges();
    grid.facets = facets
        .into_iter()
        .map(|(s, counts)| DensityFacet {
            severity: s.clone(),
            counts,
        })
        .collect();
    grid
}

/// Equal-width binning over `[min, max]`; the maximum lands in the last bin.
struct Axis {
    min: f64,
    width: f64,
    bins: usize,
}

impl Axis {
    fn spanning(values: impl Iterator<Item = f64>, bins: usize) -> Self {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if min == max {
            // Single value: centre it in a unit-wide range.
            min -= 0.5;
            max += 0.5;
        }
        Axis {
            min,
            width: (max - min) / bins as f64,
            bins,
        }
    }

    fn bin(&self, v: f64) -> usize {
        let i = ((v - self.min) / self.width).floor();
        if i <= 0.0 {
            0
        } else {
            (i as usize).min(self.bins - 1)
        }
    }

    fn edges(&self) -> Vec<f64> {
        (0..=self.bins)
            .map(|i| self.min + i as f64 * self.width)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{table, Row};

    #[test]
    fn counts_are_faceted_by_severity() {
        let t = table(&[
            Row { severity: 2, wind: 0.0, pressure: 29.0, ..Default::default() },
            Row { severity: 2, wind: 10.0, pressure: 30.0, ..Default::default() },
            Row { severity: 3, wind: 10.0, pressure: 30.0, ..Default::default() },
            Row { severity: 3, time_of_day: "Night", ..Default::default() },
        ]);
        let d = severity_density(&t, &"Morning".into(), 2);
        let g = &d.wind_pressure;

        assert_eq!(g.x_edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(g.facets.len(), 2);
        assert_eq!(g.facets[0].severity, CellValue::Integer(2));
        assert_eq!(g.facets[0].counts, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(g.facets[1].counts, vec![vec![0, 0], vec![0, 1]]);
        let total: usize = g.facets.iter().map(DensityFacet::total).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn constant_values_still_bin() {
        let t = table(&[Row::default(), Row::default()]);
        let d = severity_density(&t, &"Morning".into(), 4);
        let g = &d.temperature_humidity;
        assert_eq!(g.x_edges.len(), 5);
        assert_eq!(g.facets[0].total(), 2);
        assert_eq!(g.facets[0].max(), 2);
    }

    #[test]
    fn unknown_filter_value_is_empty() {
        let t = table(&[Row::default()]);
        let d = severity_density(&t, &"Dusk".into(), 10);
        assert!(d.wind_pressure.is_empty());
        assert!(d.temperature_humidity.x_edges.is_empty());
    }
}
