/// Aggregations: every per-filter view of the dashboard is a pure function
/// `(&AccidentTable, &FilterValue) -> summary`.
///
/// ```text
///   AccidentTable ──filtered_indices(value)──▶ rows
///        │                                    │
///        │ correlation (whole table)          │ group / count / bin
///        ▼                                    ▼
///   CorrelationMatrix         CrossCount, TrendPoint, CategoryCount,
///                             SeverityDensity
/// ```
///
/// Rows with a blank grouping key are skipped. An unknown filter value
/// yields empty summaries.

pub mod correlation;
pub mod counts;
pub mod density;

use std::collections::HashMap;

use crate::data::model::{CellValue, Column};

pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use counts::{
    elapsed_trend, severity_by_elapsed, severity_by_top_weather, state_severity_counts,
    top_cities, weather_share, CategoryCount, CrossCount, TrendPoint, OTHER_LABEL,
};
pub use density::{severity_density, DensityFacet, DensityGrid, SeverityDensity};

/// Number of cities in the ranking.
pub const TOP_CITIES: usize = 20;
/// Weather conditions shown before the rest is folded into "Other".
pub const TOP_WEATHER_SHARE: usize = 9;
/// Weather conditions cross-tabulated with severity.
pub const TOP_WEATHER_SEVERITY: usize = 15;
/// Default number of bins along each density axis.
pub const DEFAULT_DENSITY_BINS: usize = 20;
/// Largest accepted bin count; each facet holds `bins * bins` cells.
pub const MAX_DENSITY_BINS: usize = 500;

/// Frequency of each non-null value of `column` over `rows`, most frequent
/// first. Ties keep first-encountered order.
pub(crate) fn value_counts(column: &Column, rows: &[usize]) -> Vec<(CellValue, usize)> {
    let mut slots: HashMap<&CellValue, usize> = HashMap::new();
    let mut counts: Vec<(CellValue, usize)> = Vec::new();

    for &row in rows {
        let Some(value) = column.values.get(row) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match slots.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }

    // `sort_by` is stable, so equal counts stay in encounter order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_counts_is_descending_and_stable() {
        let col = Column::new(
            "c",
            ["b", "a", "a", "c", "b", "d"]
                .iter()
                .map(|s| CellValue::Text(s.to_string()))
                .chain([CellValue::Null, CellValue::Null, CellValue::Null])
                .collect(),
        );
        let rows: Vec<usize> = (0..col.values.len()).collect();
        let counts = value_counts(&col, &rows);
        let labels: Vec<String> = counts.iter().map(|(v, _)| v.to_string()).collect();
        assert_eq!(labels, vec!["b", "a", "c", "d"]);
        assert_eq!(counts[0].1, 2);
    }
}
