//! Converting source columns to the types the pipeline works with.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cast::{CastOptions, cast_with_options};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{AnalysisError, Result};
use crate::schema::RelationKind;

/// Outcome of coercing one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCoercion {
    /// Column name
    pub column: String,
    /// Values that were present but could not be converted (now null)
    pub failures: usize,
    /// First raw value that failed, for diagnostics
    pub first_failure: Option<String>,
}

/// Convert an Arrow array to `target_type`, turning unconvertible values into nulls
///
/// Returns the converted array and the number of values that were present in
/// the source but became null.
pub fn coerce_array(array: &ArrayRef, target_type: &DataType) -> Result<(ArrayRef, usize)> {
    if array.data_type() == target_type {
        return Ok((array.clone(), 0));
    }

    let options = CastOptions {
        safe: true,
        ..Default::default()
    };
    let converted = cast_with_options(array, target_type, &options).map_err(|e| {
        AnalysisError::Schema(format!(
            "cannot convert {:?} to {target_type:?}: {e}",
            array.data_type()
        ))
    })?;

    let failures = converted.null_count().saturating_sub(array.null_count());
    Ok((converted, failures))
}

/// Project `batch` onto the required columns of `kind` and coerce each to its target type
///
/// Every column keeps its rows; failed conversions surface as nulls and are
/// reported per column.
pub fn coerce_to_target(
    batch: &RecordBatch,
    kind: RelationKind,
) -> Result<(RecordBatch, Vec<ColumnCoercion>)> {
    let target = kind.target_schema();
    let mut columns = Vec::with_capacity(target.fields().len());
    let mut report = Vec::with_capacity(target.fields().len());

    for field in target.fields() {
        let source = batch
            .column_by_name(field.name())
            .ok_or_else(|| AnalysisError::missing_column(&kind.to_string(), field.name()))?;
        let (converted, failures) = coerce_array(source, field.data_type())?;

        let first_failure = if failures > 0 {
            first_failed_value(source, &converted)
        } else {
            None
        };

        report.push(ColumnCoercion {
            column: field.name().clone(),
            failures,
            first_failure,
        });
        columns.push(converted);
    }

    let coerced = RecordBatch::try_new(target, columns)?;
    Ok((coerced, report))
}

fn first_failed_value(source: &ArrayRef, converted: &ArrayRef) -> Option<String> {
    let index = (0..source.len()).find(|&i| source.is_valid(i) && converted.is_null(i))?;
    let as_text = arrow::compute::cast(&source.slice(index, 1), &DataType::Utf8).ok()?;
    let strings = as_text
        .as_any()
        .downcast_ref::<arrow::array::StringArray>()?;
    Some(strings.value(0).to_string())
}
