//! Parquet backend: Arrow writer into an atomic sink, footer-only
//! schema read.

use std::fs::File;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use snafu::ResultExt;

use crate::formats::{
    ApplyMetadataSnafu, ColumnarFormat, FileFormat, OpenSnafu, ParquetEncodeSnafu,
    ParquetFooterSnafu, ReadError, SinkSnafu, WriteError,
};
use crate::metadata::WriteMetadata;
use crate::schema::FileSchema;
use crate::sink::AtomicFileSink;

/// Parquet format backend.
///
/// Writer properties are injectable so callers can constrain or
/// instrument the encoder; the default uses the parquet crate's
/// defaults.
#[derive(Debug, Default)]
pub struct ParquetFormat {
    props: Option<WriterProperties>,
}

impl ParquetFormat {
    /// Backend with default writer properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with explicit writer properties.
    pub fn with_properties(props: WriterProperties) -> Self {
        Self { props: Some(props) }
    }
}

impl ColumnarFormat for ParquetFormat {
    fn format(&self) -> FileFormat {
        FileFormat::Parquet
    }

    fn write(
        &self,
        batch: &RecordBatch,
        metadata: &WriteMetadata,
        path: &Path,
    ) -> Result<(), WriteError> {
        let path_str = path.display().to_string();

        let output = metadata.apply(batch).context(ApplyMetadataSnafu {
            format: FileFormat::Parquet,
            path: path_str.clone(),
        })?;

        let mut sink = AtomicFileSink::create(path).context(SinkSnafu {
            format: FileFormat::Parquet,
            path: path_str.clone(),
        })?;

        let mut writer = ArrowWriter::try_new(sink.writer(), output.schema(), self.props.clone())
            .context(ParquetEncodeSnafu {
                path: path_str.clone(),
            })?;
        writer.write(&output).context(ParquetEncodeSnafu {
            path: path_str.clone(),
        })?;
        writer.close().context(ParquetEncodeSnafu {
            path: path_str.clone(),
        })?;

        sink.commit().context(SinkSnafu {
            format: FileFormat::Parquet,
            path: path_str.clone(),
        })?;

        debug!("wrote {} rows as parquet to {path_str}", output.num_rows());
        Ok(())
    }

    fn read_schema(&self, path: &Path) -> Result<FileSchema, ReadError> {
        let path_str = path.display().to_string();

        let file = File::open(path).context(OpenSnafu {
            format: FileFormat::Parquet,
            path: path_str.clone(),
        })?;

        // Footer read only; no row groups are decoded.
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .context(ParquetFooterSnafu { path: path_str })?;

        Ok(FileSchema::from_arrow(builder.schema()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::bridge;
    use crate::metadata::TypeOverride;
    use crate::table::sample_table;
    use arrow::array::{Array, BinaryArray};
    use arrow::datatypes::DataType;
    use tempfile::TempDir;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn sample_batch() -> RecordBatch {
        bridge(sample_table().unwrap()).unwrap()
    }

    #[test]
    fn override_survives_parquet_round_trip() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("binary.parquet");
        let batch = sample_batch();

        let mut metadata = WriteMetadata::new(&batch);
        metadata.set_override(0, TypeOverride::Binary)?;

        let format = ParquetFormat::new();
        format.write(&batch, &metadata, &path)?;

        let schema = format.read_schema(&path)?;
        assert_eq!(schema.fields().len(), 1);
        assert_eq!(schema.fields()[0].name, "binary");
        assert!(schema.fields()[0].is_binary());
        Ok(())
    }

    #[test]
    fn without_override_schema_stays_text() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("text.parquet");
        let batch = sample_batch();

        let format = ParquetFormat::new();
        format.write(&batch, &WriteMetadata::new(&batch), &path)?;

        let schema = format.read_schema(&path)?;
        assert_eq!(schema.fields()[0].data_type, DataType::Utf8);
        Ok(())
    }

    #[test]
    fn row_value_is_preserved_byte_for_byte() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("binary.parquet");
        let batch = sample_batch();

        let mut metadata = WriteMetadata::new(&batch);
        metadata.set_override(0, TypeOverride::Binary)?;
        ParquetFormat::new().write(&batch, &metadata, &path)?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>()?;

        assert_eq!(batches.len(), 1);
        let values = batches[0]
            .column(0)
            .as_any()
            .downcast_ref::<BinaryArray>()
            .expect("binary column");
        assert_eq!(values.value(0), b"Hello");
        Ok(())
    }

    #[test]
    fn unwritable_sink_reports_write_error_and_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("binary.parquet");
        let batch = sample_batch();

        let err = ParquetFormat::new()
            .write(&batch, &WriteMetadata::new(&batch), &path)
            .unwrap_err();

        assert!(matches!(err, WriteError::Sink { format: FileFormat::Parquet, .. }));
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_reports_open_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.parquet");

        let err = ParquetFormat::new().read_schema(&path).unwrap_err();
        assert!(matches!(err, ReadError::Open { format: FileFormat::Parquet, .. }));
    }

    #[test]
    fn malformed_file_reports_footer_error() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("corrupt.parquet");
        std::fs::write(&path, b"PAR1PAR1garbage")?;

        let err = ParquetFormat::new().read_schema(&path).unwrap_err();
        assert!(matches!(err, ReadError::ParquetFooter { .. }));
        Ok(())
    }
}
