//! Per-run scratch space
//!
//! Everything a run writes before the final artifacts (slide images, concat
//! lists, intermediate WAVs) lives in one temporary directory that is removed
//! when the `ScratchDir` is dropped, on success and failure alike.

use std::io;
use std::path::Path;
use tempfile::TempDir;

pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("slidecast_").tempdir()?;
        log::debug!("Created scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        log::debug!("Removing scratch directory {}", self.dir.path().display());
    }
}
