use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{AccidentTable, CellValue, Column};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the accident table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row + one accident per line (the published dataset)
/// * `.parquet` – same columns as typed Arrow fields (also `.pq`)
/// * `.json`    – `[{ "State": "TX", "Severity": 2, ... }, ...]`
pub fn load_file(path: &Path) -> Result<AccidentTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::debug!(
        "parsed {} ({} rows, {} columns)",
        path.display(),
        table.len(),
        table.column_names().count()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row one accident.
/// Cell types are inferred per cell; blanks and NaN markers become `Null`.
fn load_csv(path: &Path) -> Result<AccidentTable, LoadError> {
    let reader = csv::Reader::from_reader(open(path)?);
    read_csv(reader)
}

pub(crate) fn read_csv<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<AccidentTable, LoadError> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for result in reader.records() {
        let record = result?;
        for (col_idx, cell) in record.iter().enumerate() {
            values[col_idx].push(guess_cell_type(cell));
        }
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    AccidentTable::from_columns(columns)
}

/// Cell contents read as missing values.
const NA_TOKENS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema: an array of records, one object per accident.
/// Columns follow the order in which keys first appear; keys missing from
/// a record read as `Null`.
fn load_json(path: &Path) -> Result<AccidentTable, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".into()))?;

    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut values: Vec<Vec<CellValue>> = Vec::new();

    for (row, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {row} is not a JSON object")))?;

        for (key, val) in obj {
            let col = *positions.entry(key.clone()).or_insert_with(|| {
                names.push(key.clone());
                values.push(vec![CellValue::Null; row]);
                names.len() - 1
            });
            values[col].push(json_to_cell(val));
        }
        // Pad columns this record did not mention.
        for column in &mut values {
            column.resize(row + 1, CellValue::Null);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    AccidentTable::from_columns(columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the accident columns.
///
/// Integer columns of any width read as integers, floating columns as
/// floats; everything else (strings, dictionaries, booleans, dates) is
/// cast to text.
fn load_parquet(path: &Path) -> Result<AccidentTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result?;
        for (col_idx, column) in batch.columns().iter().enumerate() {
            append_arrow_column(column, &mut values[col_idx])?;
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    AccidentTable::from_columns(columns)
}

// -- Arrow helpers --

fn append_arrow_column(col: &ArrayRef, out: &mut Vec<CellValue>) -> Result<(), LoadError> {
    let target = match col.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 | DataType::Float32 | DataType::Float64 => DataType::Float64,
        _ => DataType::Utf8,
    };
    let normalized = cast(col.as_ref(), &target)?;
    let unexpected = || LoadError::Malformed(format!("cannot read arrow column as {target:?}"));

    match target {
        DataType::Int64 => {
            let arr = normalized.as_primitive_opt::<Int64Type>().ok_or_else(unexpected)?;
            out.extend(arr.iter().map(|v| v.map_or(CellValue::Null, CellValue::Integer)));
        }
        DataType::Float64 => {
            let arr = normalized.as_primitive_opt::<Float64Type>().ok_or_else(unexpected)?;
            out.extend(arr.iter().map(|v| match v {
                Some(f) if !f.is_nan() => CellValue::Float(f),
                _ => CellValue::Null,
            }));
        }
        _ => {
            let arr = normalized.as_string_opt::<i32>().ok_or_else(unexpected)?;
            out.extend(arr.iter().map(|v| match v {
                Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
                _ => CellValue::Null,
            }));
        }
    }
    Ok(())
}
