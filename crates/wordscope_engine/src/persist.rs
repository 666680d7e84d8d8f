use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("session directory unavailable: {0}")]
    SessionDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Scratch directory for rendered pages; removed when dropped, so nothing
/// outlives the session.
#[derive(Debug)]
pub struct SessionDir {
    dir: TempDir,
}

impl SessionDir {
    pub fn new() -> Result<Self, PersistError> {
        let dir = tempfile::Builder::new()
            .prefix("wordscope-")
            .tempdir()
            .map_err(|e| PersistError::SessionDir(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Atomically replace `{dir}/{filename}` so a viewer never sees a half-written page.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        write_atomic(self.dir.path(), filename, content)
    }
}

pub(crate) fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    if !dir.is_dir() {
        return Err(PersistError::SessionDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
