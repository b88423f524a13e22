use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

// Staging files start with a dot so directory listings served to readers skip them.
const STAGING_PREFIX: &str = ".trending-";
const STAGING_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{path} exists but is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` and its parents when missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let io_error = |source: io::Error| PersistError::Io {
        path: dir.to_path_buf(),
        source,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir).map_err(io_error),
        Err(err) => Err(io_error(err)),
    }
}

/// Publishes report files into one directory. Each file is staged beside its
/// final name and renamed over it, so a reader sees the old page or the new
/// one and nothing in between.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let io_error = |source: io::Error| PersistError::Io {
            path: target.clone(),
            source,
        };
        let mut staged = Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(io_error)?;
        staged.write_all(content.as_bytes()).map_err(io_error)?;
        staged.as_file().sync_all().map_err(io_error)?;
        staged.persist(&target).map_err(|err| io_error(err.error))?;
        Ok(target)
    }
}
