//! Persistence of generated source files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sink for generated files, addressed relative to an output root.
pub trait CodeWriter {
    /// Persist one file, returning the location it ended up at.
    fn write(&mut self, relative: &Path, contents: &str) -> io::Result<PathBuf>;
}

/// Writes generated files beneath an output directory, creating package
/// subdirectories as needed. The output directory itself must exist.
#[derive(Debug)]
pub struct FileWriter {
    root: PathBuf,
}

impl FileWriter {
    pub fn new<P: Into<PathBuf>>(root: P) -> FileWriter {
        FileWriter { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CodeWriter for FileWriter {
    fn write(&mut self, relative: &Path, contents: &str) -> io::Result<PathBuf> {
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, contents)?;
        log::debug!("wrote {}", target.display());
        Ok(target)
    }
}
