//! Source file loading
//!
//! Reads the customer and transaction sources into Arrow-backed relations.
//! CSV sources go through Arrow's CSV reader with every column read as text,
//! so a malformed value anywhere in the file reaches the cleaner's coercion
//! instead of failing the read. Parquet sources go through the Parquet Arrow
//! reader. The only check beyond parsing is the schema check: required
//! columns must exist and categorical columns may only hold known categories.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, StringArray};
use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::error::util::safe_open_file;
use crate::error::{AnalysisError, Result};
use crate::models::{Lifestage, PremiumTier};
use crate::relation::Relation;
use crate::schema::conversions::coerce_array;
use crate::schema::{LIFESTAGE, PREMIUM_CUSTOMER, RelationKind, check_required_columns};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// On-disk format of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl SourceFormat {
    /// Pick the format from the file extension; anything but `.parquet` is read as CSV
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Self::Parquet,
            _ => Self::Csv,
        }
    }
}

/// Cells read as missing values, matching the usual dataframe defaults
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options controlling how sources are parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Rows scanned to discover the CSV column layout; `None` scans the whole file
    pub infer_records: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_records: Some(10_000),
        }
    }
}

/// Pattern matching exactly the cells listed in `MISSING_VALUE_TOKENS`
pub fn missing_value_regex() -> Result<Regex> {
    let pattern = format!(
        "^(?:{})$",
        MISSING_VALUE_TOKENS.iter().map(|t| regex::escape(t)).join("|")
    );
    Regex::new(&pattern)
        .map_err(|e| AnalysisError::Config(format!("invalid missing-value pattern: {e}")))
}

/// Read a CSV file into a single record batch of text columns
///
/// Missing-value tokens become nulls. Typed conversion is left to the cleaner,
/// which turns unparseable values into counted nulls.
pub fn read_csv(path: &Path, options: LoadOptions) -> Result<RecordBatch> {
    let mut file = safe_open_file(path, "reading CSV source")?;

    let format = Format::default()
        .with_header(true)
        .with_null_regex(missing_value_regex()?);
    let (inferred, _) = format.infer_schema(&mut file, options.infer_records)?;
    file.rewind()?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema: SchemaRef = Arc::new(Schema::new(fields));
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Read a Parquet file into a single record batch
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file: File = safe_open_file(path, "reading Parquet source")?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Load one source as a relation of the given kind
///
/// # Errors
/// `SourceNotFound` when the file cannot be opened, `Schema` when a required
/// column is missing or a categorical column holds an unknown value.
pub fn load_relation(path: &Path, kind: RelationKind, options: LoadOptions) -> Result<Relation> {
    let start = Instant::now();
    log_operation_start(&format!("Loading {kind} data from"), path);

    let batch = match SourceFormat::from_path(path) {
        SourceFormat::Csv => read_csv(path, options)?,
        SourceFormat::Parquet => read_parquet(path)?,
    };

    check_required_columns(&batch.schema(), kind)?;
    let relation = Relation::new(kind, batch);
    validate_categories(&relation)?;

    log_operation_complete("loaded", path, relation.num_rows(), Some(start.elapsed()));
    Ok(relation)
}

/// Load the customer and transaction sources
pub fn load_sources(
    customers: &Path,
    transactions: &Path,
    options: LoadOptions,
) -> Result<(Relation, Relation)> {
    let customers = load_relation(customers, RelationKind::Customer, options)?;
    let transactions = load_relation(transactions, RelationKind::Transaction, options)?;
    Ok((customers, transactions))
}

/// Check every non-null categorical value against its closed enumeration
pub fn validate_categories(relation: &Relation) -> Result<()> {
    for column in relation.kind().categorical_columns() {
        let (values, _) = coerce_array(relation.column(column)?, &DataType::Utf8)?;
        let strings = values
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| {
                AnalysisError::Schema(format!("column '{column}' is not a text column"))
            })?;

        let distinct: FxHashSet<&str> = strings.iter().flatten().collect();
        for value in distinct {
            // blank cells are missing values, removed by the cleaner
            if value.trim().is_empty() {
                continue;
            }
            let known = match *column {
                LIFESTAGE => value.parse::<Lifestage>().is_ok(),
                PREMIUM_CUSTOMER => value.parse::<PremiumTier>().is_ok(),
                _ => true,
            };
            if !known {
                return Err(AnalysisError::Schema(format!(
                    "unrecognized value '{value}' in column '{column}' of the {} data",
                    relation.kind()
                )));
            }
        }
    }
    Ok(())
}
