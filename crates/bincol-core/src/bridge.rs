//! Lossless conversion from the host table to the Arrow compute
//! representation.
//!
//! The bridge is a pure function: same input, same batch. It consumes
//! the host table so only the device-side representation flows
//! downstream. Column order, names, row count and cell values are
//! preserved exactly; there is no shared backing storage between the
//! two representations.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use snafu::prelude::*;

use crate::table::HostTable;

/// Errors raised while bridging table representations.
///
/// Bridging is fatal for the verification run: callers propagate this
/// error and stop, there is no recovery path.
#[derive(Debug, Snafu)]
pub enum BridgeError {
    /// The record batch could not be assembled from the columns.
    #[snafu(display("Failed to assemble record batch: {source}"))]
    BatchAssembly {
        /// Underlying Arrow error.
        source: ArrowError,
    },
}

/// Convert a host table into an Arrow [`RecordBatch`].
pub fn bridge(table: HostTable) -> Result<RecordBatch, BridgeError> {
    let mut fields = Vec::with_capacity(table.column_count());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.column_count());

    for column in table.columns() {
        fields.push(Field::new(column.name(), DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from_iter_values(
            column.values().iter().map(String::as_str),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).context(BatchAssemblySnafu)
}
