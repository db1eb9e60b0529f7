//! In-memory tabular relations
//!
//! A `Relation` is a named Arrow record batch as read from a source, before
//! it is turned into typed records.

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use itertools::Itertools;

use crate::error::{AnalysisError, Result};
use crate::schema::RelationKind;

/// A named, immutable table
#[derive(Debug, Clone)]
pub struct Relation {
    kind: RelationKind,
    batch: RecordBatch,
}

impl Relation {
    /// Wrap a record batch
    #[must_use]
    pub const fn new(kind: RelationKind, batch: RecordBatch) -> Self {
        Self { kind, batch }
    }

    #[must_use]
    pub const fn kind(&self) -> RelationKind {
        self.kind
    }

    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| AnalysisError::missing_column(&self.kind.to_string(), name))
    }

    /// Number of missing values in each column, in schema order
    #[must_use]
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.batch
            .schema()
            .fields()
            .iter()
            .zip(self.batch.columns())
            .map(|(field, column)| (field.name().clone(), column.null_count()))
            .collect()
    }

    /// Whether any column holds a null
    #[must_use]
    pub fn has_nulls(&self) -> bool {
        self.batch.columns().iter().any(|c| c.null_count() > 0)
    }

    /// Replace the underlying batch, keeping the kind
    #[must_use]
    pub fn with_batch(&self, batch: RecordBatch) -> Self {
        Self {
            kind: self.kind,
            batch,
        }
    }

    /// Render the first `n` rows as an aligned text table
    pub fn head(&self, n: usize) -> Result<String> {
        let rows = n.min(self.num_rows());
        let options = FormatOptions::default().with_null("NULL");

        let header: Vec<String> = self
            .batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows);
        let formatters = self
            .batch
            .columns()
            .iter()
            .map(|c| ArrayFormatter::try_new(c.as_ref(), &options))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for row in 0..rows {
            cells.push(formatters.iter().map(|f| f.value(row).to_string()).collect());
        }

        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |values: &[String]| {
            values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{v:<w$}"))
                .join(" | ")
        };

        let mut out = render(&header);
        out.push('\n');
        out.push_str(&widths.iter().map(|w| "-".repeat(*w)).join("-+-"));
        for row in &cells {
            out.push('\n');
            out.push_str(&render(row));
        }
        Ok(out)
    }
}
