//! Host-side table representation and its builder.
//!
//! The host table is the plain-Rust half of the two columnar
//! representations this harness bridges. It is deliberately minimal:
//! named text columns sharing a uniform row count. Validation happens
//! while appending, so a failed append aborts construction instead of
//! leaving a partial table behind.

use snafu::prelude::*;

/// Logical type of a host-table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// UTF-8 text.
    Utf8,
}

/// A single named column with its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostColumn {
    name: String,
    values: Vec<String>,
}

impl HostColumn {
    /// Column name, unique within its table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell values in row order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Declared logical type.
    pub fn column_type(&self) -> ColumnType {
        ColumnType::Utf8
    }
}

/// Errors raised while assembling a host table.
#[derive(Debug, Snafu)]
pub enum TableBuildError {
    /// Column names must be unique within a table.
    #[snafu(display("Duplicate column name: {name}"))]
    DuplicateColumn {
        /// The name that was appended twice.
        name: String,
    },

    /// Every column must share the table's row count.
    #[snafu(display("Column {name} has {rows} rows, expected {expected}"))]
    RowCountMismatch {
        /// The offending column.
        name: String,
        /// Rows the column carries.
        rows: usize,
        /// Rows the table already has.
        expected: usize,
    },
}

/// Result alias for table construction.
pub type TableResult<T> = Result<T, TableBuildError>;

/// Ordered collection of equally sized named columns.
///
/// Read-only once built; downstream stages consume it through
/// [`crate::bridge::bridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTable {
    columns: Vec<HostColumn>,
}

impl HostTable {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, uniform across columns.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[HostColumn] {
        &self.columns
    }
}

/// Incrementally assembles a [`HostTable`], validating each append.
#[derive(Debug, Default)]
pub struct HostTableBuilder {
    columns: Vec<HostColumn>,
}

impl HostTableBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text column.
    ///
    /// Fails if the name is already taken or the value count differs
    /// from the columns appended so far.
    pub fn push_utf8_column<I, S>(&mut self, name: &str, values: I) -> TableResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ensure!(
            !self.columns.iter().any(|c| c.name == name),
            DuplicateColumnSnafu { name }
        );

        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if let Some(first) = self.columns.first() {
            ensure!(
                values.len() == first.values.len(),
                RowCountMismatchSnafu {
                    name,
                    rows: values.len(),
                    expected: first.values.len(),
                }
            );
        }

        self.columns.push(HostColumn {
            name: name.to_string(),
            values,
        });
        Ok(self)
    }

    /// Finish construction, yielding the immutable table.
    pub fn finish(self) -> TableResult<HostTable> {
        Ok(HostTable {
            columns: self.columns,
        })
    }
}

/// The fixed table exercised by the verification run: one text column
/// named `"binary"` holding the single row `"Hello"`.
pub fn sample_table() -> TableResult<HostTable> {
    let mut builder = HostTableBuilder::new();
    builder.push_utf8_column("binary", ["Hello"])?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_table_has_one_text_column_and_one_row() {
        let table = sample_table().expect("sample table builds");

        assert_eq!(table.column_count(), 1);
        assert_eq!(table.row_count(), 1);

        let col = &table.columns()[0];
        assert_eq!(col.name(), "binary");
        assert_eq!(col.column_type(), ColumnType::Utf8);
        assert_eq!(col.values(), ["Hello".to_string()]);
    }

    #[test]
    fn duplicate_column_name_errors() {
        let mut builder = HostTableBuilder::new();
        builder.push_utf8_column("a", ["x"]).unwrap();

        let err = builder.push_utf8_column("a", ["y"]).unwrap_err();
        assert!(matches!(err, TableBuildError::DuplicateColumn { name } if name == "a"));
    }

    #[test]
    fn row_count_mismatch_errors() {
        let mut builder = HostTableBuilder::new();
        builder.push_utf8_column("a", ["x", "y"]).unwrap();

        let err = builder.push_utf8_column("b", ["z"]).unwrap_err();
        assert!(matches!(
            err,
            TableBuildError::RowCountMismatch { rows: 1, expected: 2, .. }
        ));
    }

    #[test]
    fn empty_builder_finishes_to_empty_table() {
        let table = HostTableBuilder::new().finish().unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }
}
