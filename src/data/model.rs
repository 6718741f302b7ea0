use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Column names of the accident dataset
// ---------------------------------------------------------------------------

pub const TIME_OF_DAY: &str = "Time_of_Day";
pub const STATE: &str = "State";
pub const CITY: &str = "City";
pub const WEATHER_CONDITION: &str = "Weather_Condition";
pub const SEVERITY: &str = "Severity";
pub const WIND_SPEED: &str = "Wind_Speed(mph)";
pub const PRESSURE: &str = "Pressure(in)";
pub const TEMPERATURE: &str = "Temperature(F)";
pub const HUMIDITY: &str = "Humidity(%)";
pub const TIME_ELAPSED: &str = "Time_Elapsed";

/// Columns the aggregations read. Loading fails if any is absent.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    TIME_OF_DAY,
    STATE,
    CITY,
    WEATHER_CONDITION,
    SEVERITY,
    WIND_SPEED,
    PRESSURE,
    TEMPERATURE,
    HUMIDITY,
    TIME_ELAPSED,
];

/// Required columns that must hold only numbers (or blanks).
pub const NUMERIC_COLUMNS: [&str; 6] = [
    SEVERITY,
    WIND_SPEED,
    PRESSURE,
    TEMPERATURE,
    HUMIDITY,
    TIME_ELAPSED,
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV column can infer to.
/// Used as a group-by key in `BTreeMap`s, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// One named column; `values.len()` equals the table's row count.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A column is numeric when every non-null cell is a number.
    /// An all-blank column counts as numeric (it reads as all-NaN).
    pub fn is_numeric(&self) -> bool {
        self.values.iter().all(|v| v.is_null() || v.is_numeric())
    }

    /// Numeric value at `row`, `None` for blanks and text.
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        self.values.get(row).and_then(CellValue::as_f64)
    }

    /// Promote integers to floats when the column mixes both, so that
    /// `3` and `3.0` land in the same group.
    fn widen_integers(&mut self) {
        let has_float = self
            .values
            .iter()
            .any(|v| matches!(v, CellValue::Float(_)));
        if !has_float {
            return;
        }
        for v in &mut self.values {
            if let CellValue::Integer(i) = v {
                *v = CellValue::Float(*i as f64);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AccidentTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Positions of the required columns inside `AccidentTable::columns`.
#[derive(Debug, Clone, Copy)]
struct Schema {
    time_of_day: usize,
    state: usize,
    city: usize,
    weather_condition: usize,
    severity: usize,
    wind_speed: usize,
    pressure: usize,
    temperature: usize,
    humidity: usize,
    time_elapsed: usize,
}

/// The full parsed dataset. Built once, never mutated afterwards; share it
/// as `Arc<AccidentTable>`.
#[derive(Debug, Clone)]
pub struct AccidentTable {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    schema: Schema,
    rows: usize,
}

impl AccidentTable {
    /// Validate and index the loaded columns.
    pub fn from_columns(mut columns: Vec<Column>) -> Result<Self, LoadError> {
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(LoadError::Malformed(format!(
                "column '{}' has {} values, expected {rows}",
                bad.name,
                bad.values.len()
            )));
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter_mut().enumerate() {
            col.widen_integers();
            index.insert(col.name.clone(), i);
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|name| !index.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumn(missing.join(", ")));
        }

        let position = |name: &str| -> Result<usize, LoadError> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        let schema = Schema {
            time_of_day: position(TIME_OF_DAY)?,
            state: position(STATE)?,
            city: position(CITY)?,
            weather_condition: position(WEATHER_CONDITION)?,
            severity: position(SEVERITY)?,
            wind_speed: position(WIND_SPEED)?,
            pressure: position(PRESSURE)?,
            temperature: position(TEMPERATURE)?,
            humidity: position(HUMIDITY)?,
            time_elapsed: position(TIME_ELAPSED)?,
        };

        for name in NUMERIC_COLUMNS {
            let col = &columns[position(name)?];
            if let Some((row, value)) = col
                .values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_null() && !v.is_numeric())
            {
                return Err(LoadError::NotNumeric {
                    column: name.to_string(),
                    row,
                    value: value.to_string(),
                });
            }
        }

        Ok(Self {
            columns,
            index,
            schema,
            rows,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in file order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// All numeric columns in file order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    /// Distinct non-null values of a column in first-encountered order.
    pub fn distinct_values(&self, name: &str) -> Vec<CellValue> {
        let Some(col) = self.column(name) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        col.values
            .iter()
            .filter(|v| !v.is_null() && seen.insert(*v))
            .cloned()
            .collect()
    }

    /// Dropdown options: distinct Time_of_Day values, first encountered first.
    pub fn time_of_day_options(&self) -> Vec<String> {
        self.distinct_values(TIME_OF_DAY)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn time_of_day(&self) -> &Column {
        &self.columns[self.schema.time_of_day]
    }

    pub fn state(&self) -> &Column {
        &self.columns[self.schema.state]
    }

    pub fn city(&self) -> &Column {
        &self.columns[self.schema.city]
    }

    pub fn weather_condition(&self) -> &Column {
        &self.columns[self.schema.weather_condition]
    }

    pub fn severity(&self) -> &Column {
        &self.columns[self.schema.severity]
    }

    pub fn wind_speed(&self) -> &Column {
        &self.columns[self.schema.wind_speed]
    }

    pub fn pressure(&self) -> &Column {
        &self.columns[self.schema.pressure]
    }

    pub fn temperature(&self) -> &Column {
        &self.columns[self.schema.temperature]
    }

    pub fn humidity(&self) -> &Column {
        &self.columns[self.schema.humidity]
    }

    pub fn time_elapsed(&self) -> &Column {
        &self.columns[self.schema.time_elapsed]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small in-memory table builder shared by the unit tests of other modules.
    pub(crate) struct Row<'a> {
        pub time_of_day: &'a str,
        pub state: &'a str,
        pub city: &'a str,
        pub weather: &'a str,
        pub severity: i64,
        pub wind: f64,
        pub pressure: f64,
        pub temperature: f64,
        pub humidity: f64,
        pub elapsed: i64,
    }

    impl Default for Row<'_> {
        fn default() -> Self {
            Row {
                time_of_day: "Morning",
                state: "TX",
                city: "Austin",
                weather: "Clear",
                severity: 2,
                wind: 5.0,
                pressure: 29.9,
                temperature: 70.0,
                humidity: 50.0,
                elapsed: 1,
            }
        }
    }

    fn text(rows: &[Row<'_>], f: impl Fn(&Row<'_>) -> String) -> Vec<CellValue> {
        rows.iter().map(|r| CellValue::Text(f(r))).collect()
    }

    fn float(rows: &[Row<'_>], f: impl Fn(&Row<'_>) -> f64) -> Vec<CellValue> {
        rows.iter().map(|r| CellValue::Float(f(r))).collect()
    }

    fn int(rows: &[Row<'_>], f: impl Fn(&Row<'_>) -> i64) -> Vec<CellValue> {
        rows.iter().map(|r| CellValue::Integer(f(r))).collect()
    }

    pub(crate) fn table(rows: &[Row<'_>]) -> AccidentTable {
        AccidentTable::from_columns(vec![
            Column::new(SEVERITY, int(rows, |r| r.severity)),
            Column::new(CITY, text(rows, |r| r.city.to_string())),
            Column::new(STATE, text(rows, |r| r.state.to_string())),
            Column::new(TEMPERATURE, float(rows, |r| r.temperature)),
            Column::new(HUMIDITY, float(rows, |r| r.humidity)),
            Column::new(PRESSURE, float(rows, |r| r.pressure)),
            Column::new(WIND_SPEED, float(rows, |r| r.wind)),
            Column::new(WEATHER_CONDITION, text(rows, |r| r.weather.to_string())),
            Column::new(TIME_OF_DAY, text(rows, |r| r.time_of_day.to_string())),
            Column::new(TIME_ELAPSED, int(rows, |r| r.elapsed)),
        ])
        .unwrap()
    }

    #[test]
    fn options_keep_first_encountered_order() {
        let t = table(&[
            Row { time_of_day: "Night", ..Default::default() },
            Row { time_of_day: "Morning", ..Default::default() },
            Row { time_of_day: "Night", ..Default::default() },
            Row { time_of_day: "Evening", ..Default::default() },
        ]);
        assert_eq!(t.time_of_day_options(), vec!["Night", "Morning", "Evening"]);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let err = AccidentTable::from_columns(vec![Column::new(
            TIME_OF_DAY,
            vec![CellValue::Text("Morning".into())],
        )])
        .unwrap_err();
        let LoadError::MissingColumn(names) = err else {
            panic!("unexpected error: {err}");
        };
        assert!(names.starts_with(STATE));
        assert!(names.contains(TIME_ELAPSED));
        assert!(!names.contains(TIME_OF_DAY));
    }

    #[test]
    fn text_in_numeric_column_is_rejected() {
        let t = table(&[Row::default()]);
        let mut columns: Vec<Column> = t.columns.clone();
        let sev = columns.iter_mut().find(|c| c.name == SEVERITY).unwrap();
        sev.values[0] = CellValue::Text("high".into());
        let err = AccidentTable::from_columns(columns).unwrap_err();
        assert!(matches!(err, LoadError::NotNumeric { column, row: 0, .. } if column == SEVERITY));
    }

    #[test]
    fn mixed_numeric_column_is_widened() {
        let mut col = Column::new(
            TIME_ELAPSED,
            vec![CellValue::Integer(3), CellValue::Float(3.0), CellValue::Null],
        );
        col.widen_integers();
        assert_eq!(col.values[0], col.values[1]);
        assert!(col.is_numeric());
    }

    #[test]
    fn ragged_columns_are_malformed() {
        let err = AccidentTable::from_columns(vec![
            Column::new("a", vec![CellValue::Null]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }
}
