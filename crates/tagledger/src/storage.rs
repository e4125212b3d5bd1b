//! Record store: whole-file replace on write, tag-intersection scan on read.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::codec::{decode_row, encode_row};
use crate::error::Result;
use crate::file_store::{FileOpener, OsFileOpener};
use crate::rows::{CsvRowFormat, RowFormat, RowWriter};
use crate::types::UserRecord;

/// File used when the caller passes an empty path.
pub const DEFAULT_DATA_FILE: &str = "data.csv";

/// Map an empty path to `DEFAULT_DATA_FILE`.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_DATA_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Stateless store over a file opener and a row format.
#[derive(Clone)]
pub struct RecordStore {
    opener: Arc<dyn FileOpener>,
    format: Arc<dyn RowFormat>,
}

impl RecordStore {
    pub fn new(opener: Arc<dyn FileOpener>, format: Arc<dyn RowFormat>) -> Self {
        Self { opener, format }
    }

    /// Store bound to the local filesystem and CSV rows.
    pub fn os() -> Self {
        Self::new(Arc::new(OsFileOpener), Arc::new(CsvRowFormat))
    }

    /// Replace the file at `path` with one row per record, in input order.
    ///
    /// A failing record aborts the write and leaves the rows written so far
    /// in place. The writer is flushed on every exit path.
    pub fn store_all(&self, records: &[UserRecord], path: impl AsRef<Path>) -> Result<()> {
        let path = resolve_path(path.as_ref());
        let file = self.opener.create(&path)?;
        let mut writer = self.format.writer(file);

        let written = write_rows(writer.as_mut(), records);
        let flushed = writer.flush();
        written?;
        flushed?;

        info!("Stored {} user records to {}", records.len(), path.display());
        Ok(())
    }

    /// Records whose stored tags include every tag in `tags`, in file order.
    ///
    /// Only id and balance are populated on the returned records; the active
    /// flag and tags are stored but not read back. A missing file surfaces as
    /// `TagledgerError::MissingFile`. Any malformed row fails the whole scan.
    pub fn search_by_tags<S: AsRef<str>>(
        &self,
        tags: &[S],
        path: impl AsRef<Path>,
    ) -> Result<Vec<UserRecord>> {
        let path = resolve_path(path.as_ref());
        let required: HashSet<&str> = tags.iter().map(|tag| tag.as_ref()).collect();
        let mut reader = self.format.reader(self.opener.open(&path)?);

        let mut matched = Vec::new();
        let mut row_number = 0usize;
        while let Some(fields) = reader.read_row()? {
            row_number += 1;
            let row = decode_row(row_number, fields.as_slice())?;
            if row.matches(&required) {
                matched.push(row.into_summary());
            }
        }

        debug!(
            "Scanned {} rows in {}, {} matched",
            row_number,
            path.display(),
            matched.len()
        );
        Ok(matched)
    }
}

fn write_rows(writer: &mut dyn RowWriter, records: &[UserRecord]) -> Result<()> {
    for record in records {
        writer.write_row(&encode_row(record)?)?;
    }
    Ok(())
}
