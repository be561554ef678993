//! Request-scoped scratch files for uploaded documents.
//!
//! A [`ScratchFile`] owns a uniquely named file in the scratch directory. The file is removed
//! when the guard is dropped, so every exit path of a request (success, early return, error,
//! panic unwinding) releases it.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const SCRATCH_PREFIX: &str = "docsum-";
const SCRATCH_SUFFIX: &str = ".docx";

/// Errors raised while materializing an upload to disk.
#[derive(Debug, Error)]
pub enum ScratchError {
    /// The scratch file could not be created in the configured directory.
    #[error("failed to create scratch file in {dir}: {source}")]
    Create {
        /// Directory the file was requested in.
        dir: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Writing the uploaded bytes failed.
    #[error("failed to write scratch file: {0}")]
    Write(#[source] std::io::Error),
}

/// Uniquely named temporary file deleted on drop.
#[derive(Debug)]
pub struct ScratchFile {
    file: Option<NamedTempFile>,
    path: PathBuf,
}

impl ScratchFile {
    /// Create a scratch file under `dir` holding `bytes`.
    ///
    /// This performs blocking I/O; async callers should run it on the blocking pool.
    pub fn create(dir: &Path, bytes: &[u8]) -> Result<Self, ScratchError> {
        let mut file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(SCRATCH_SUFFIX)
            .tempfile_in(dir)
            .map_err(|source| ScratchError::Create {
                dir: dir.to_path_buf(),
                source,
            })?;
        file.write_all(bytes).map_err(ScratchError::Write)?;
        file.flush().map_err(ScratchError::Write)?;
        let path = file.path().to_path_buf();
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Created scratch file");
        Ok(Self {
            file: Some(file),
            path,
        })
    }

    /// Location of the scratch file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match self.file.take().map(NamedTempFile::close) {
            Some(Ok(())) => {
                tracing::debug!(path = %self.path.display(), "Released scratch file");
            }
            Some(Err(error)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Failed to remove scratch file"
                );
            }
            None => {}
        }
    }
}
