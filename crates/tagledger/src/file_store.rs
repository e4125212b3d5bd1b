//! File handle acquisition for the record store.
//!
//! Handles are released when the returned box is dropped, so every exit path
//! of the caller closes the file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Result, TagledgerError};

/// Opens files for the record store.
pub trait FileOpener: Send + Sync {
    /// Create a file, truncating any existing contents.
    fn create(&self, path: &Path) -> Result<Box<dyn Write>>;

    /// Open a file read-only. A nonexistent path is `TagledgerError::MissingFile`.
    fn open(&self, path: &Path) -> Result<Box<dyn Read>>;
}

/// `FileOpener` bound to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileOpener;

impl FileOpener for OsFileOpener {
    fn create(&self, path: &Path) -> Result<Box<dyn Write>> {
        let file = File::create(path)?;
        Ok(Box::new(file))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        match File::open(path) {
            Ok(file) => Ok(Box::new(io::BufReader::new(file))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(TagledgerError::MissingFile(path.to_path_buf()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

type SharedFiles = Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>;

/// In-memory `FileOpener` for tests. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileOpener {
    files: SharedFiles,
}

impl MemoryFileOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with raw contents.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
    }

    /// Current contents of a file, if it exists.
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.contents(path).is_some()
    }
}

impl FileOpener for MemoryFileOpener {
    fn create(&self, path: &Path) -> Result<Box<dyn Write>> {
        let mut files = self.files.lock().map_err(|_| lock_poisoned())?;
        files.insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(MemoryFile {
            files: Arc::clone(&self.files),
            path: path.to_path_buf(),
        }))
    }

    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        let files = self.files.lock().map_err(|_| lock_poisoned())?;
        match files.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(TagledgerError::MissingFile(path.to_path_buf())),
        }
    }
}

struct MemoryFile {
    files: SharedFiles,
    path: PathBuf,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = self.files.lock().map_err(|_| lock_poisoned())?;
        files.entry(self.path.clone()).or_default().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn lock_poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "memory file lock poisoned")
}
