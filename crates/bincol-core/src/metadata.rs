//! Per-column output-type overrides applied at serialization time.
//!
//! A [`WriteMetadata`] is a positional descriptor parallel to a
//! batch's columns: entry `i` governs how column `i`'s type is
//! recorded in the emitted file. It is purely a serialization hint.
//! Cell values and the in-memory batch are never modified; each format
//! writer derives its own output batch via [`WriteMetadata::apply`].
//!
//! Descriptors are cheap and are rebuilt per writer invocation so no
//! writer's state can leak into another's.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use snafu::prelude::*;

/// How a column's logical type is recorded in the emitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeOverride {
    /// Keep the type the batch declares.
    #[default]
    AsDeclared,
    /// Record the column as opaque binary.
    Binary,
}

/// Errors raised while configuring or applying overrides.
#[derive(Debug, Snafu)]
pub enum MetadataError {
    /// The override index does not name a column of the batch.
    #[snafu(display("Override index {index} out of range for {column_count} columns"))]
    ColumnOutOfRange {
        /// Requested column position.
        index: usize,
        /// Columns the descriptor covers.
        column_count: usize,
    },

    /// The descriptor was built for a different column layout.
    #[snafu(display(
        "Descriptor covers {descriptor} columns but the batch has {column_count}"
    ))]
    DescriptorLengthMismatch {
        /// Entries in the descriptor.
        descriptor: usize,
        /// Columns in the batch.
        column_count: usize,
    },

    /// A column could not be re-typed as binary.
    #[snafu(display("Failed to rewrite column {column} as binary: {source}"))]
    BinaryRewrite {
        /// The column being rewritten.
        column: String,
        /// Underlying Arrow cast error.
        source: ArrowError,
    },

    /// The output batch could not be assembled.
    #[snafu(display("Failed to rebuild output batch: {source}"))]
    BatchRebuild {
        /// Underlying Arrow error.
        source: ArrowError,
    },
}

/// Positional per-column serialization overrides for one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteMetadata {
    overrides: Vec<TypeOverride>,
}

impl WriteMetadata {
    /// Descriptor sized to the batch with every column as-declared.
    pub fn new(batch: &RecordBatch) -> Self {
        Self {
            overrides: vec![TypeOverride::AsDeclared; batch.num_columns()],
        }
    }

    /// Set the override for the column at `index`.
    ///
    /// Out-of-range indices are a configuration error, rejected here
    /// rather than surfacing later inside a format writer.
    pub fn set_override(&mut self, index: usize, kind: TypeOverride) -> Result<(), MetadataError> {
        ensure!(
            index < self.overrides.len(),
            ColumnOutOfRangeSnafu {
                index,
                column_count: self.overrides.len(),
            }
        );
        self.overrides[index] = kind;
        Ok(())
    }

    /// Per-column overrides, parallel to the batch columns.
    pub fn overrides(&self) -> &[TypeOverride] {
        &self.overrides
    }

    /// Build the batch a format writer actually serializes.
    ///
    /// Overridden columns are cast `Utf8 -> Binary` (the cast reuses
    /// the value buffers, no cell bytes change) and their schema
    /// fields rewritten to [`DataType::Binary`]. As-declared columns
    /// pass through untouched. The input batch is not modified.
    pub fn apply(&self, batch: &RecordBatch) -> Result<RecordBatch, MetadataError> {
        ensure!(
            self.overrides.len() == batch.num_columns(),
            DescriptorLengthMismatchSnafu {
                descriptor: self.overrides.len(),
                column_count: batch.num_columns(),
            }
        );

        let schema = batch.schema();
        let mut fields = Vec::with_capacity(batch.num_columns());
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

        for (index, field) in schema.fields().iter().enumerate() {
            match self.overrides[index] {
                TypeOverride::AsDeclared => {
                    fields.push(field.as_ref().clone());
                    columns.push(batch.column(index).clone());
                }
                TypeOverride::Binary => {
                    let rewritten = cast(batch.column(index), &DataType::Binary).context(
                        BinaryRewriteSnafu {
                            column: field.name().clone(),
                        },
                    )?;
                    fields.push(Field::new(
                        field.name(),
                        DataType::Binary,
                        field.is_nullable(),
                    ));
                    columns.push(rewritten);
                }
            }
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).context(BatchRebuildSnafu)
    }
}
