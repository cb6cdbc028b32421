//! Data frame construction from JSON-shaped input.
//!
//! Accepted shapes:
//! - records: `[{"a": 1, "b": "x"}, ...]`, every record with the same keys
//! - rows: `[[1, "x"], ...]`, every row with the same width
//! - columns: `{"a": [1, 2], "b": ["x", "y"]}`, every column the same length
//!
//! Anything else is rejected with [`TransformError::UnsupportedInput`].

use crate::error::{Result, TransformError};
use crate::transformer::{FittedTransformer, Transformer};
use crate::utils::ensure_columns_exist;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Scalar kind of a JSON column, used to pick the Series dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Empty,
    Int,
    Float,
    Bool,
    Str,
    Mixed,
}

impl CellKind {
    fn of(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Null => CellKind::Empty,
            Value::Bool(_) => CellKind::Bool,
            Value::Number(n) if n.is_i64() => CellKind::Int,
            Value::Number(_) => CellKind::Float,
            Value::String(_) => CellKind::Str,
            Value::Array(_) | Value::Object(_) => {
                return Err(TransformError::UnsupportedInput(
                    "nested arrays or objects are not valid cells".to_string(),
                ));
            }
        })
    }

    fn merge(self, other: CellKind) -> CellKind {
        use CellKind::{Empty, Float, Int, Mixed};
        match (self, other) {
            (Empty, k) | (k, Empty) => k,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            _ => Mixed,
        }
    }
}

/// Build a Series from one column of JSON cells.
fn series_from_cells(name: &str, cells: &[&Value]) -> Result<Series> {
    let mut kind = CellKind::Empty;
    for cell in cells {
        kind = kind.merge(CellKind::of(cell)?);
    }

    let name: PlSmallStr = name.into();
    let series = match kind {
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells.iter().map(|v| v.as_i64()).collect();
            Series::new(name, values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells.iter().map(|v| v.as_f64()).collect();
            Series::new(name, values)
        }
        CellKind::Bool => {
            let values: Vec<Option<bool>> = cells.iter().map(|v| v.as_bool()).collect();
            Series::new(name, values)
        }
        CellKind::Str | CellKind::Mixed | CellKind::Empty => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect();
            Series::new(name, values)
        }
    };
    Ok(series)
}

fn frame_from_records(records: &[Value]) -> Result<DataFrame> {
    let first = records[0]
        .as_object()
        .ok_or_else(|| unsupported("records must all be objects"))?;
    let names: Vec<&String> = first.keys().collect();
    let expected: HashSet<&String> = names.iter().copied().collect();

    let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or_else(|| unsupported("records must all be objects"))?;
        if object.len() != expected.len() || !object.keys().all(|k| expected.contains(k)) {
            return Err(TransformError::UnsupportedInput(format!(
                "record {} does not share the columns of record 0",
                row
            )));
        }
        objects.push(object);
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells: Vec<&Value> = objects.iter().map(|o| &o[name.as_str()]).collect();
            series_from_cells(name, &cells).map(Column::from)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new_with_height(records.len(), columns)?)
}

fn frame_from_rows(rows: &[Value]) -> Result<DataFrame> {
    let mut arrays: Vec<&Vec<Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        arrays.push(
            row.as_array()
                .ok_or_else(|| unsupported("rows must all be arrays"))?,
        );
    }
    let width = arrays[0].len();
    if let Some(row) = arrays.iter().position(|a| a.len() != width) {
        return Err(TransformError::UnsupportedInput(format!(
            "row {} has {} cells, expected {}",
            row,
            arrays[row].len(),
            width
        )));
    }

    let columns = (0..width)
        .map(|i| {
            let cells: Vec<&Value> = arrays.iter().map(|a| &a[i]).collect();
            series_from_cells(&format!("column_{}", i), &cells).map(Column::from)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new_with_height(rows.len(), columns)?)
}

fn frame_from_columns(map: &Map<String, Value>) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(map.len());
    let mut height = None;

    for (name, values) in map {
        let values = values.as_array().ok_or_else(|| {
            TransformError::UnsupportedInput(format!("column '{}' is not an array", name))
        })?;
        match height {
            None => height = Some(values.len()),
            Some(h) if h != values.len() => {
                return Err(TransformError::UnsupportedInput(format!(
                    "column '{}' has {} values, expected {}",
                    name,
                    values.len(),
                    h
                )));
            }
            Some(_) => {}
        }
        let cells: Vec<&Value> = values.iter().collect();
        columns.push(Column::from(series_from_cells(name, &cells)?));
    }

    Ok(DataFrame::new(columns)?)
}

fn unsupported(reason: &str) -> TransformError {
    TransformError::UnsupportedInput(reason.to_string())
}

/// Build a DataFrame from a JSON table.
///
/// # Errors
///
/// Returns [`TransformError::UnsupportedInput`] when `value` is not one of
/// the accepted table shapes.
pub fn frame_from_json(value: &Value) -> Result<DataFrame> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(DataFrame::empty()),
        Value::Array(items) => match &items[0] {
            Value::Object(_) => frame_from_records(items),
            Value::Array(_) => frame_from_rows(items),
            _ => Err(unsupported("array items must be records or rows")),
        },
        Value::Object(map) => frame_from_columns(map),
        _ => Err(unsupported("expected an array of records/rows or an object of columns")),
    }
}

/// Converts table-shaped input to a DataFrame, optionally naming or
/// narrowing its columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFrameConverter {
    /// Column names to apply. Positional rows take these names; named input
    /// is narrowed to exactly these columns in this order.
    pub columns: Option<Vec<String>>,
}

impl DataFrameConverter {
    /// A converter that keeps columns as they come.
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter that applies `columns`.
    pub fn with_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        crate::config::validate_column_list(&columns)?;
        Ok(Self {
            columns: Some(columns),
        })
    }

    /// Convert a JSON table.
    pub fn convert(&self, value: &Value) -> Result<DataFrame> {
        let positional = matches!(
            value,
            Value::Array(items) if matches!(items.first(), Some(Value::Array(_)))
        );
        let df = frame_from_json(value)?;
        debug!("Converted JSON input to frame of shape {:?}", df.shape());

        match &self.columns {
            Some(columns) if positional => {
                if columns.len() != df.width() {
                    return Err(TransformError::UnsupportedInput(format!(
                        "{} column names given for rows of width {}",
                        columns.len(),
                        df.width()
                    )));
                }
                let height = df.height();
                let renamed: Vec<Column> = df
                    .take_columns()
                    .into_iter()
                    .zip(columns)
                    .map(|(mut column, name)| {
                        column.rename(name.as_str().into());
                        column
                    })
                    .collect();
                Ok(DataFrame::new_with_height(height, renamed)?)
            }
            _ => self.narrow(&df),
        }
    }

    fn narrow(&self, df: &DataFrame) -> Result<DataFrame> {
        match &self.columns {
            Some(columns) => {
                ensure_columns_exist(df, columns)?;
                Ok(df.select(columns.iter().map(String::as_str))?)
            }
            None => Ok(df.clone()),
        }
    }
}

impl Transformer for DataFrameConverter {
    type Fitted = DataFrameConverter;

    fn name(&self) -> &'static str {
        "frame_converter"
    }

    fn fit(&self, _df: &DataFrame) -> Result<DataFrameConverter> {
        Ok(self.clone())
    }
}

impl FittedTransformer for DataFrameConverter {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.narrow(df)
    }
}
