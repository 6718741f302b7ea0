use std::collections::{BTreeMap, HashSet};

use super::value_counts;
use crate::data::filter::{filtered_indices, FilterValue};
use crate::data::model::{AccidentTable, CellValue, Column};

/// Label of the bucket collecting everything outside a top-N selection.
pub const OTHER_LABEL: &str = "Other";

/// Count of one categorical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Count of accidents for one (key, severity) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossCount {
    pub key: CellValue,
    pub severity: CellValue,
    pub count: usize,
}

/// Accidents sharing one Time_Elapsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub elapsed: f64,
    pub count: usize,
}

/// Counts per (`key` column, Severity) over `rows`, sorted by key then
/// severity.
fn cross_with_severity(
    table: &AccidentTable,
    key: &Column,
    rows: impl IntoIterator<Item = usize>,
) -> Vec<CrossCount> {
    let severity = table.severity();
    let mut groups: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    for row in rows {
        let (Some(k), Some(s)) = (key.values.get(row), severity.values.get(row)) else {
            continue;
        };
        if k.is_null() || s.is_null() {
            continue;
        }
        *groups.entry((k, s)).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((k, s), count)| CrossCount {
            key: k.clone(),
            severity: s.clone(),
            count,
        })
        .collect()
}

fn category_counts(counts: Vec<(CellValue, usize)>) -> Vec<CategoryCount> {
    counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            label: value.to_string(),
            count,
        })
        .collect()
}

/// Accidents per (State, Severity) for the selected time of day.
pub fn state_severity_counts(table: &AccidentTable, filter: &FilterValue) -> Vec<CrossCount> {
    let rows = filtered_indices(table, filter);
    cross_with_severity(table, table.state(), rows)
}

/// Accidents per Time_Elapsed value, ascending.
pub fn elapsed_trend(table: &AccidentTable, filter: &FilterValue) -> Vec<TrendPoint> {
    let elapsed = table.time_elapsed();
    let mut groups: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for row in filtered_indices(table, filter) {
        match elapsed.values.get(row) {
            Some(v) if v.as_f64().is_some() => *groups.entry(v).or_default() += 1,
            _ => {}
        }
    }
    groups
        .into_iter()
        .filter_map(|(v, count)| {
            Some(TrendPoint {
                elapsed: v.as_f64()?,
                count,
            })
        })
        .collect()
}

/// The `n` cities with the most accidents, most first.
pub fn top_cities(table: &AccidentTable, filter: &FilterValue, n: usize) -> Vec<CategoryCount> {
    let rows = filtered_indices(table, filter);
    let mut counts = value_counts(table.city(), &rows);
    counts.truncate(n);
    category_counts(counts)
}

/// The `n` most frequent weather conditions. When more distinct conditions
/// exist, the remainder is summed into a trailing [`OTHER_LABEL`] bucket so
/// the buckets always add up to the filtered (non-blank) row count.
pub fn weather_share(table: &AccidentTable, filter: &FilterValue, n: usize) -> Vec<CategoryCount> {
    let rows = filtered_indices(table, filter);
    let mut counts = value_counts(table.weather_condition(), &rows);
    if counts.len() <= n {
        return category_counts(counts);
    }
    let other: usize = counts[n..].iter().map(|(_, c)| c).sum();
    counts.truncate(n);
    let mut buckets = category_counts(counts);
    buckets.push(CategoryCount {
        label: OTHER_LABEL.to_string(),
        count: other,
    });
    buckets
}

/// Severity counts for each of the `n` most frequent weather conditions,
/// sorted by condition then severity.
pub fn severity_by_top_weather(
    table: &AccidentTable,
    filter: &FilterValue,
    n: usize,
) -> Vec<CrossCount> {
    let rows = filtered_indices(table, filter);
    let weather = table.weather_condition();
    let top: HashSet<CellValue> = value_counts(weather, &rows)
        .into_iter()
        .take(n)
        .map(|(v, _)| v)
        .collect();
    let kept = rows
        .into_iter()
        .filter(|&row| weather.values.get(row).is_some_and(|v| top.contains(v)));
    cross_with_severity(table, weather, kept)
}

/// Severity counts per Time_Elapsed value, sorted by elapsed then severity.
pub fn severity_by_elapsed(table: &AccidentTable, filter: &FilterValue) -> Vec<CrossCount> {
    let rows = filtered_indices(table, filter);
    cross_with_severity(table, table.time_elapsed(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{table, Row};

    fn rows_with_cities<'a>(spec: &[(&'a str, usize)], time_of_day: &'a str) -> Vec<Row<'a>> {
        spec.iter()
            .flat_map(|&(city, n)| {
                (0..n).map(move |_| Row {
                    city,
                    time_of_day,
                    ..Default::default()
                })
            })
            .collect()
    }

    #[test]
    fn top_cities_are_sorted_and_capped() {
        let names: Vec<String> = (0..25).map(|i| format!("City{i}")).collect();
        let mut spec: Vec<(&str, usize)> = vec![("Austin", 120), ("Dallas", 80)];
        spec.extend(names.iter().map(|name| (name.as_str(), 3)));
        let t = table(&rows_with_cities(&spec, "Morning"));
        let cities = top_cities(&t, &"Morning".into(), 20);

        assert_eq!(cities.len(), 20);
        assert_eq!(cities[0], CategoryCount { label: "Austin".into(), count: 120 });
        assert_eq!(cities[1].label, "Dallas");
        assert!(cities.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn top_cities_only_counts_filtered_rows() {
        let mut rows = rows_with_cities(&[("Austin", 2)], "Morning");
        rows.extend(rows_with_cities(&[("Houston", 5)], "Night"));
        let t = table(&rows);
        let cities = top_cities(&t, &"Morning".into(), 20);
        assert_eq!(cities, vec![CategoryCount { label: "Austin".into(), count: 2 }]);
    }

    #[test]
    fn weather_share_folds_remainder_into_other() {
        let weathers = [
            "Clear", "Rain", "Snow", "Fog", "Haze", "Cloudy", "Overcast", "Drizzle", "Sleet",
            "Hail", "Windy",
        ];
        let rows: Vec<Row> = weathers
            .iter()
            .enumerate()
            .flat_map(|(i, &weather)| {
                (0..(20 - i)).map(move |_| Row { weather, ..Default::default() })
            })
            .collect();
        let t = table(&rows);
        let share = weather_share(&t, &"Morning".into(), 9);

        assert_eq!(share.len(), 10);
        assert_eq!(share[0].label, "Clear");
        assert_eq!(share[9], CategoryCount { label: OTHER_LABEL.into(), count: 11 + 10 });
        assert_eq!(share.iter().map(|c| c.count).sum::<usize>(), t.len());
    }

    #[test]
    fn weather_share_without_overflow_has_no_other() {
        let t = table(&[Row::default(), Row { weather: "Rain", ..Default::default() }]);
        let share = weather_share(&t, &"Morning".into(), 9);
        assert_eq!(share.len(), 2);
        assert!(share.iter().all(|c| c.label != OTHER_LABEL));
    }

    #[test]
    fn state_severity_groups_by_both_keys() {
        let t = table(&[
            Row { state: "TX", severity: 2, ..Default::default() },
            Row { state: "TX", severity: 2, ..Default::default() },
            Row { state: "TX", severity: 3, ..Default::default() },
            Row { state: "CA", severity: 2, ..Default::default() },
            Row { state: "CA", severity: 4, time_of_day: "Night", ..Default::default() },
        ]);
        let counts = state_severity_counts(&t, &"Morning".into());
        let flat: Vec<(String, String, usize)> = counts
            .iter()
            .map(|c| (c.key.to_string(), c.severity.to_string(), c.count))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("CA".into(), "2".into(), 1),
                ("TX".into(), "2".into(), 2),
                ("TX".into(), "3".into(), 1),
            ]
        );
    }

    #[test]
    fn trend_is_ascending_by_elapsed() {
        let t = table(&[
            Row { elapsed: 5, ..Default::default() },
            Row { elapsed: 1, ..Default::default() },
            Row { elapsed: 5, ..Default::default() },
        ]);
        let trend = elapsed_trend(&t, &"Morning".into());
        assert_eq!(
            trend,
            vec![
                TrendPoint { elapsed: 1.0, count: 1 },
                TrendPoint { elapsed: 5.0, count: 2 },
            ]
        );
    }

    #[test]
    fn severity_by_weather_keeps_top_conditions_only() {
        let mut rows = Vec::new();
        for (weather, n) in [("Clear", 3), ("Rain", 2), ("Fog", 1)] {
            for _ in 0..n {
                rows.push(Row { weather, ..Default::default() });
            }
        }
        let t = table(&rows);
        let counts = severity_by_top_weather(&t, &"Morning".into(), 2);
        let keys: Vec<String> = counts.iter().map(|c| c.key.to_string()).collect();
        assert_eq!(keys, vec!["Clear", "Rain"]);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 5);
    }

    #[test]
    fn severity_by_elapsed_crosses_keys() {
        let t = table(&[
            Row { elapsed: 2, severity: 1, ..Default::default() },
            Row { elapsed: 2, severity: 3, ..Default::default() },
            Row { elapsed: 2, severity: 3, ..Default::default() },
        ]);
        let counts = severity_by_elapsed(&t, &"Morning".into());
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1].severity, CellValue::Integer(3));
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn absent_filter_value_gives_empty_summaries() {
        let t = table(&[Row::default(), Row::default()]);
        let dusk: FilterValue = "Dusk".into();
        assert!(state_severity_counts(&t, &dusk).is_empty());
        assert!(elapsed_trend(&t, &dusk).is_empty());
        assert!(top_cities(&t, &dusk, 20).is_empty());
        assert!(weather_share(&t, &dusk, 9).is_empty());
        assert!(severity_by_top_weather(&t, &dusk, 15).is_empty());
        assert!(severity_by_elapsed(&t, &dusk).is_empty());
    }
}
