use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use accident_dashboard::aggregate::{weather_share, OTHER_LABEL};
use accident_dashboard::chart::Series;
use accident_dashboard::config::DashboardConfig;
use accident_dashboard::data::filter::FilterValue;
use accident_dashboard::data::loader::load_file;
use accident_dashboard::error::LoadError;
use accident_dashboard::export::{export_views, write_json};
use accident_dashboard::view::{ChartId, Dashboard};

const HEADER: &str = "ID,Severity,City,State,Temperature(F),Humidity(%),Pressure(in),\
Wind_Speed(mph),Weather_Condition,Time_of_Day,Time_Elapsed";

const WEATHERS: [&str; 12] = [
    "Fair", "Clear", "Cloudy", "Rain", "Snow", "Fog", "Haze", "Overcast", "Drizzle", "Sleet",
    "Hail", "Windy",
];

/// 500 morning rows (Austin 120, Dallas 80, the rest spread over other
/// cities) plus a handful of night rows.
fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("accidents.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();

    let mut id = 0;
    let mut row = |file: &mut std::fs::File, city: &str, tod: &str, i: usize| {
        id += 1;
        let weather = WEATHERS[i % WEATHERS.len()];
        let severity = 1 + i % 4;
        let temp = 40.0 + (i % 50) as f64;
        let humidity = 20.0 + (i % 70) as f64;
        let pressure = 29.0 + (i % 20) as f64 / 10.0;
        let wind = (i % 15) as f64;
        let elapsed = i % 10;
        // Leave a blank temperature now and then.
        let temp = if i % 97 == 0 { String::new() } else { format!("{temp}") };
        writeln!(
            file,
            "A-{id},{severity},{city},TX,{temp},{humidity},{pressure},{wind},{weather},{tod},{elapsed}"
        )
        .unwrap();
    };

    let mut i = 0;
    for (city, n) in [("Austin", 120), ("Dallas", 80)] {
        for _ in 0..n {
            row(&mut file, city, "Morning", i);
            i += 1;
        }
    }
    for k in 0..300 {
        let city = format!("Town{}", k % 30);
        row(&mut file, &city, "Morning", i);
        i += 1;
    }
    for k in 0..40 {
        row(&mut file, "Houston", "Night", k);
    }
    path
}

fn dashboard(dir: &Path) -> Dashboard {
    let table = load_file(&write_fixture(dir)).unwrap();
    Dashboard::new(Arc::new(table), DashboardConfig::default())
}

#[test]
fn every_option_yields_eight_charts() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let options = d.options();
    assert_eq!(options, vec![FilterValue::new("Morning"), FilterValue::new("Night")]);

    for value in &options {
        let view = d.on_filter_change(value);
        assert_eq!(view.charts.len(), 8);
        assert_eq!(&view.filter, value);
    }
}

#[test]
fn city_chart_starts_with_austin() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let view = d.on_filter_change(&"Morning".into());
    let spec = view.chart(ChartId::TopCities).unwrap();
    let Series::Categories { labels, values, .. } = &spec.panels[0].series[0] else {
        panic!("expected category series");
    };

    assert!(labels.len() <= 20);
    assert_eq!(labels[0], "Austin");
    assert_eq!(values[0], 120.0);
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
    assert!(!labels.iter().any(|l| l == "Houston"));
}

#[test]
fn weather_buckets_sum_to_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let share = weather_share(d.table(), &"Morning".into(), 9);

    assert_eq!(share.len(), 10);
    assert_eq!(share.last().unwrap().label, OTHER_LABEL);
    assert_eq!(share.iter().map(|c| c.count).sum::<usize>(), 500);
}

#[test]
fn recomputation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let value = FilterValue::new("Night");
    assert_eq!(d.on_filter_change(&value), d.on_filter_change(&value));
}

#[test]
fn absent_value_gives_empty_charts() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let view = d.on_filter_change(&"Dawn".into());
    assert_eq!(view.charts.len(), 8);
    for id in &ChartId::ALL[1..] {
        assert!(view.chart(*id).unwrap().is_empty(), "{id:?}");
    }
}

#[test]
fn density_counts_cover_rows_with_both_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let view = d.on_filter_change(&"Morning".into());
    let spec = view.chart(ChartId::SeverityDensity).unwrap();

    // Four severity facets for each of the two variable pairs.
    assert_eq!(spec.panels.len(), 8);
    let total = |panels: &[accident_dashboard::chart::Panel]| -> f64 {
        panels
            .iter()
            .flat_map(|p| &p.series)
            .map(|s| match s {
                Series::Grid { z, .. } => z.iter().flatten().flatten().sum::<f64>(),
                _ => 0.0,
            })
            .sum()
    };
    // Wind/pressure is complete; temperature has blanks at i % 97 == 0.
    assert_eq!(total(&spec.panels[..4]), 500.0);
    let blanks = (0..500).filter(|i| i % 97 == 0).count() as f64;
    assert_eq!(total(&spec.panels[4..]), 500.0 - blanks);
}

#[test]
fn missing_column_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "Severity,City,State\n2,Austin,TX\n").unwrap();
    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(_)), "{err}");
}

#[test]
fn export_writes_every_view() {
    let dir = tempfile::tempdir().unwrap();
    let d = dashboard(dir.path());
    let out = dir.path().join("views.json");
    write_json(&export_views(&d), &out).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["rows"], 540);
    assert_eq!(json["options"], serde_json::json!(["Morning", "Night"]));
    let views = json["views"].as_array().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[1]["filter"], "Night");
    assert_eq!(views[0]["charts"].as_array().unwrap().len(), 8);
    assert_eq!(views[0]["charts"][3]["kind"], "bar");
    assert_eq!(views[0]["charts"][3]["style"]["color"], "#28a745");
}
