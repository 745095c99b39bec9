//! Atomic local-file sink: stage to a temp file, rename on commit.
//!
//! A reader must never observe a half-written file as a valid
//! artifact, so format writers stream into `<path>.tmp` and the file
//! only appears at its final path after flush + fsync + rename. If the
//! write fails before commit, a drop guard removes the temp file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use snafu::prelude::*;

/// Errors raised by the atomic sink.
#[derive(Debug, Snafu)]
pub enum SinkError {
    /// The temp file could not be created.
    #[snafu(display("Failed to create sink at {path}: {source}"))]
    Create {
        /// Temp path that failed to open.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Buffered bytes could not be flushed or synced to disk.
    #[snafu(display("Failed to flush sink at {path}: {source}"))]
    Flush {
        /// Temp path being flushed.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The temp file could not be moved to its final path.
    #[snafu(display("Failed to commit sink to {path}: {source}"))]
    Commit {
        /// Final path of the artifact.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Removes the staged temp file unless disarmed by a successful commit.
#[derive(Debug)]
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Write-once sink that is committed atomically from a reader's point
/// of view.
#[derive(Debug)]
pub struct AtomicFileSink {
    tmp_path: PathBuf,
    final_path: PathBuf,
    writer: BufWriter<File>,
    guard: TempFileGuard,
}

impl AtomicFileSink {
    /// Open a sink that will materialize at `path` on commit.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let tmp_path = path.with_extension("tmp");

        // std::fs::File because Arrow writers require std::io::Write.
        let file = File::create(&tmp_path).context(CreateSnafu {
            path: tmp_path.display().to_string(),
        })?;

        Ok(Self {
            writer: BufWriter::new(file),
            guard: TempFileGuard::new(tmp_path.clone()),
            tmp_path,
            final_path: path.to_path_buf(),
        })
    }

    /// Mutable handle for a format writer to stream bytes through.
    pub fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.writer
    }

    /// Flush, fsync, and rename into the final path.
    pub fn commit(mut self) -> Result<(), SinkError> {
        self.writer.flush().context(FlushSnafu {
            path: self.tmp_path.display().to_string(),
        })?;

        self.writer.get_ref().sync_all().context(FlushSnafu {
            path: self.tmp_path.display().to_string(),
        })?;

        std::fs::rename(&self.tmp_path, &self.final_path).context(CommitSnafu {
            path: self.final_path.display().to_string(),
        })?;

        self.guard.disarm();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn commit_materializes_final_file_and_removes_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.bin");

        let mut sink = AtomicFileSink::create(&path).unwrap();
        sink.writer().write_all(b"payload").unwrap();
        sink.commit().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
        assert!(!tmp.path().join("out.tmp").exists());
    }

    #[test]
    fn dropped_sink_leaves_no_files_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.bin");

        {
            let mut sink = AtomicFileSink::create(&path).unwrap();
            sink.writer().write_all(b"partial").unwrap();
            // No commit: simulates a failed write.
        }

        assert!(!path.exists());
        assert!(!tmp.path().join("out.tmp").exists());
    }

    #[test]
    fn create_in_missing_directory_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.bin");

        let err = AtomicFileSink::create(&path).unwrap_err();
        assert!(matches!(err, SinkError::Create { .. }));
    }
}
