//! Columnar format backends and the write/read error taxonomy.
//!
//! Each backend pairs a writer (batch + overrides → atomic sink) with
//! a schema-only reader. Backends are stateless behind the
//! [`ColumnarFormat`] trait so the driver treats every format
//! uniformly and tests can substitute instrumented implementations.

pub mod orc;
pub mod parquet;

use std::fmt;
use std::io;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use snafu::Snafu;

use crate::metadata::{MetadataError, WriteMetadata};
use crate::schema::FileSchema;
use crate::sink::SinkError;

/// On-disk columnar formats exercised by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Apache Parquet.
    Parquet,
    /// Apache ORC.
    Orc,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Parquet => "parquet",
            FileFormat::Orc => "orc",
        })
    }
}

/// Errors raised while serializing a batch to a sink.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WriteError {
    /// The output batch could not be derived from the overrides.
    #[snafu(display("Failed to apply output metadata for {format} at {path}: {source}"))]
    ApplyMetadata {
        /// Target format.
        format: FileFormat,
        /// Sink path.
        path: String,
        /// Underlying metadata error.
        source: MetadataError,
    },

    /// The sink could not be opened or committed.
    #[snafu(display("Sink failure for {format} output at {path}: {source}"))]
    Sink {
        /// Target format.
        format: FileFormat,
        /// Sink path.
        path: String,
        /// Underlying sink error.
        source: SinkError,
    },

    /// The Parquet encoder failed.
    #[snafu(display("Parquet write failed for {path}: {source}"))]
    ParquetEncode {
        /// Sink path.
        path: String,
        /// Underlying Parquet error.
        source: ::parquet::errors::ParquetError,
    },

    /// The ORC encoder failed.
    #[snafu(display("ORC write failed for {path}: {source}"))]
    OrcEncode {
        /// Sink path.
        path: String,
        /// Underlying ORC error.
        source: orc_rust::error::OrcError,
    },
}

/// Errors raised while extracting a schema from a written file.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReadError {
    /// The file could not be opened.
    #[snafu(display("Failed to open {format} file {path}: {source}"))]
    Open {
        /// Expected format.
        format: FileFormat,
        /// File path.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The Parquet footer could not be decoded.
    #[snafu(display("Parquet schema read failed for {path}: {source}"))]
    ParquetFooter {
        /// File path.
        path: String,
        /// Underlying Parquet error.
        source: ::parquet::errors::ParquetError,
    },

    /// The ORC file tail could not be decoded.
    #[snafu(display("ORC schema read failed for {path}: {source}"))]
    OrcFooter {
        /// File path.
        path: String,
        /// Underlying ORC error.
        source: orc_rust::error::OrcError,
    },
}

/// A columnar file format backend.
///
/// `write` must leave a complete artifact at `path` or no readable
/// file at all. `read_schema` must work from file metadata alone and
/// never materialize row values.
pub trait ColumnarFormat {
    /// Which format this backend produces.
    fn format(&self) -> FileFormat;

    /// Serialize `batch`, with `metadata` applied, to `path`.
    fn write(
        &self,
        batch: &RecordBatch,
        metadata: &WriteMetadata,
        path: &Path,
    ) -> Result<(), WriteError>;

    /// Extract the declared schema from the file at `path`.
    fn read_schema(&self, path: &Path) -> Result<FileSchema, ReadError>;
}
