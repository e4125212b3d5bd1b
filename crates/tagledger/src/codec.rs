//! Row codec: one `UserRecord` <-> one 4-field row.
//!
//! Row layout: `id, "true"|"false", balance, ["tag",...]`. The tag list is
//! stored as a compact JSON array inside the fourth field.

use std::collections::HashSet;

use crate::error::{Result, TagledgerError};
use crate::types::UserRecord;

/// Number of fields every stored row must carry.
pub const ROW_FIELDS: usize = 4;

/// Encode one record into its stored row.
pub fn encode_row(record: &UserRecord) -> Result<[String; ROW_FIELDS]> {
    let tags = serde_json::to_string(&record.tags).map_err(|source| TagledgerError::TagEncode {
        id: record.id.clone(),
        source,
    })?;
    Ok([
        record.id.clone(),
        record.is_active.to_string(),
        record.balance.clone(),
        tags,
    ])
}

/// Fields of a stored row that search needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub id: String,
    pub balance: String,
    pub tags: Vec<String>,
}

impl StoredRow {
    /// True when every required tag is present on this row.
    pub fn matches(&self, required: &HashSet<&str>) -> bool {
        if required.is_empty() {
            return true;
        }
        let present: HashSet<&str> = self.tags.iter().map(String::as_str).collect();
        required.is_subset(&present)
    }

    /// Search results only carry id and balance.
    pub fn into_summary(self) -> UserRecord {
        UserRecord::summary(self.id, self.balance)
    }
}

/// Decode a stored row. `row` is the 1-based row number used in errors.
///
/// The active flag (field 1) is not read back. A `null` tag field decodes as
/// an empty list.
pub fn decode_row<S: AsRef<str>>(row: usize, fields: &[S]) -> Result<StoredRow> {
    if fields.len() < ROW_FIELDS {
        return Err(TagledgerError::BadRowFormat {
            row,
            fields: fields.len(),
        });
    }
    let tags: Option<Vec<String>> = serde_json::from_str(fields[3].as_ref())
        .map_err(|source| TagledgerError::TagDecode { row, source })?;
    Ok(StoredRow {
        id: fields[0].as_ref().to_string(),
        balance: fields[2].as_ref().to_string(),
        tags: tags.unwrap_or_default(),
    })
}
