use std::fmt;

use serde::Serialize;

use super::model::{AccidentTable, CellValue};

// ---------------------------------------------------------------------------
// Filter predicate: the selected Time_of_Day value
// ---------------------------------------------------------------------------

/// The single user-selected Time_of_Day value driving every per-filter view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FilterValue(String);

impl FilterValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank cells never match, whatever the selected value is.
    pub fn matches(&self, cell: &CellValue) -> bool {
        match cell {
            CellValue::Null => false,
            CellValue::Text(s) => *s == self.0,
            other => other.to_string() == self.0,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Return indices of records whose Time_of_Day equals `filter`.
///
/// A value absent from the dataset yields an empty list, not an error.
pub fn filtered_indices(table: &AccidentTable, filter: &FilterValue) -> Vec<usize> {
    table
        .time_of_day()
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| filter.matches(v))
        .map(|(i, _)| i)
        .collect()
}
