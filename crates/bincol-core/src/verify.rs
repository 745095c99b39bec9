//! Driver for the round-trip verification.
//!
//! Threads each format through a fresh override descriptor, a write,
//! and a schema-only read, then asserts that every overridden column
//! reads back with a binary declared type. Within one format the
//! composition is strict early-return: a write failure skips that
//! format's read. Across formats the pipelines are independent; one
//! format failing does not stop the other.

use std::path::{Path, PathBuf};

use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::debug;
use snafu::prelude::*;

use crate::bridge::{self, BridgeError};
use crate::formats::orc::OrcFormat;
use crate::formats::parquet::ParquetFormat;
use crate::formats::{ColumnarFormat, FileFormat, ReadError, WriteError};
use crate::metadata::{MetadataError, TypeOverride, WriteMetadata};
use crate::schema::FileSchema;
use crate::table::{self, TableBuildError};

/// Errors raised by the verification pipeline.
#[derive(Debug, Snafu)]
pub enum VerifyError {
    /// Table construction failed.
    #[snafu(display("Failed to build sample table: {source}"))]
    Build {
        /// Underlying build error.
        source: TableBuildError,
    },

    /// Host-to-device conversion failed; the run cannot proceed.
    #[snafu(display("Failed to bridge table representations: {source}"))]
    Bridge {
        /// Underlying bridge error.
        source: BridgeError,
    },

    /// The override descriptor could not be configured.
    #[snafu(display("Failed to configure output metadata: {source}"))]
    Metadata {
        /// Underlying metadata error.
        source: MetadataError,
    },

    /// Serialization to the sink failed.
    #[snafu(display("{source}"))]
    Write {
        /// Underlying write error, carrying format and path.
        source: WriteError,
    },

    /// Schema extraction failed.
    #[snafu(display("{source}"))]
    Read {
        /// Underlying read error, carrying format and path.
        source: ReadError,
    },

    /// The file's declared type ignored the binary override.
    #[snafu(display(
        "Column {column} in {format} file {path} reads back as {actual:?}, expected a binary type"
    ))]
    TypeNotOverridden {
        /// Format that produced the file.
        format: FileFormat,
        /// File path.
        path: String,
        /// Column name.
        column: String,
        /// The declared type actually read back.
        actual: DataType,
    },

    /// The read-back schema has fewer columns than were written.
    #[snafu(display("{format} file {path} is missing column {index} in its schema"))]
    MissingReadBackColumn {
        /// Format that produced the file.
        format: FileFormat,
        /// File path.
        path: String,
        /// Missing column position.
        index: usize,
    },
}

/// Result alias for pipeline stages.
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Schema read back from one verified file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaReport {
    /// Format that produced the file.
    pub format: FileFormat,
    /// Where the file was written.
    pub path: PathBuf,
    /// The declared schema.
    pub schema: FileSchema,
}

/// Outcome of verifying every format.
#[derive(Debug)]
pub struct RunSummary {
    /// Schemas from formats that round-tripped successfully.
    pub reports: Vec<SchemaReport>,
    /// First error from each format pipeline that failed.
    pub failures: Vec<VerifyError>,
}

impl RunSummary {
    /// True when every format verified cleanly.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run one format's pipeline: fresh descriptor, write, schema read,
/// declared-type assertion.
///
/// The descriptor is rebuilt on every call so no writer's state leaks
/// into another invocation.
pub fn verify_format(
    batch: &RecordBatch,
    format: &dyn ColumnarFormat,
    binary_columns: &[usize],
    path: &Path,
) -> VerifyResult<SchemaReport> {
    let mut metadata = WriteMetadata::new(batch);
    for &index in binary_columns {
        metadata
            .set_override(index, TypeOverride::Binary)
            .context(MetadataSnafu)?;
    }

    format.write(batch, &metadata, path).context(WriteSnafu)?;
    let schema = format.read_schema(path).context(ReadSnafu)?;

    for &index in binary_columns {
        match schema.fields().get(index) {
            Some(field) if field.is_binary() => {}
            Some(field) => {
                return TypeNotOverriddenSnafu {
                    format: format.format(),
                    path: path.display().to_string(),
                    column: field.name.clone(),
                    actual: field.data_type.clone(),
                }
                .fail();
            }
            None => {
                return MissingReadBackColumnSnafu {
                    format: format.format(),
                    path: path.display().to_string(),
                    index,
                }
                .fail();
            }
        }
    }

    debug!("verified {} schema at {}", format.format(), path.display());
    Ok(SchemaReport {
        format: format.format(),
        path: path.to_path_buf(),
        schema,
    })
}

/// File name each format writes under the output directory.
fn target_file(format: FileFormat) -> &'static str {
    match format {
        FileFormat::Parquet => "binary.parquet",
        FileFormat::Orc => "binary.orc",
    }
}

/// Build the sample table, bridge it once, and verify both formats.
///
/// Build and bridge failures are global and abort the run. Format
/// pipelines run independently; their outcomes are collected into the
/// returned summary.
pub fn run(out_dir: &Path) -> VerifyResult<RunSummary> {
    let table = table::sample_table().context(BuildSnafu)?;
    let batch = bridge::bridge(table).context(BridgeSnafu)?;

    let parquet = ParquetFormat::new();
    let orc = OrcFormat::new();
    let formats: [&dyn ColumnarFormat; 2] = [&parquet, &orc];

    let mut summary = RunSummary {
        reports: Vec::new(),
        failures: Vec::new(),
    };

    for format in formats {
        let path = out_dir.join(target_file(format.format()));
        match verify_format(&batch, format, &[0], &path) {
            Ok(report) => summary.reports.push(report),
            Err(err) => summary.failures.push(err),
        }
    }

    Ok(summary)
}
