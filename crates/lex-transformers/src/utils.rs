//! Shared utilities for the transformers.
//!
//! Column lookups, category rendering, and a few Series helpers used by
//! more than one module.

use crate::error::{Result, TransformError};
use polars::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Column Utilities
// =============================================================================

/// Column names of a DataFrame as owned strings, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Ensure every name in `columns` exists in `df`.
///
/// All absent names are reported together, in the order they were requested.
pub fn ensure_columns_exist(df: &DataFrame, columns: &[String]) -> Result<()> {
    let present: HashSet<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    let missing: Vec<String> = columns
        .iter()
        .filter(|column| !present.contains(column.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransformError::ColumnsNotFound(missing))
    }
}

/// Fetch a single column as a Series, with a checked missing-column error.
pub fn column_series(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| TransformError::ColumnNotFound(name.to_string()))?;
    Ok(column.as_materialized_series().clone())
}

// =============================================================================
// Category Utilities
// =============================================================================

/// Render every value of a Series as its category string.
///
/// Nulls stay `None`. Strings render without quotes, numbers and booleans
/// use their display form (`1`, `2.5`, `true`).
pub fn category_strings(series: &Series) -> Result<Vec<Option<String>>> {
    let as_str = series.cast(&DataType::String)?;
    let values = as_str.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Distinct non-null values in first-seen order.
pub fn first_seen_categories(values: &[Option<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    for value in values.iter().flatten() {
        if seen.insert(value.as_str()) {
            categories.push(value.clone());
        }
    }
    categories
}

/// Build a 0/1 indicator Series for one category.
pub fn indicator_series(name: &str, values: &[Option<String>], category: &str) -> Series {
    let flags: Vec<u8> = values
        .iter()
        .map(|value| u8::from(value.as_deref() == Some(category)))
        .collect();
    Series::new(name.into(), flags)
}

// =============================================================================
// Tests
// =============================================================================
