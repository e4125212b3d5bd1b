//! Error types for fetching, storing, and searching user records

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Tagledger error type
#[derive(Error, Debug)]
pub enum TagledgerError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid source address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid request method: {0}")]
    InvalidMethod(String),

    #[error("Transport error for {address}: {message}")]
    Transport { address: String, message: String },

    #[error("Unexpected response code {status} from {address}")]
    UnexpectedStatus { address: String, status: u16 },

    #[error("Failed to decode response from {address}: {source}")]
    Decode {
        address: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("All sources are invalid")]
    AllSourcesInvalid,

    #[error("All sources are down or gave an unexpected response")]
    AllSourcesUnavailable,

    #[error("Missing file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Bad row format at row {row}: expected at least 4 fields, got {fields}")]
    BadRowFormat { row: usize, fields: usize },

    #[error("Failed to decode tags at row {row}: {source}")]
    TagDecode {
        row: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode tags for record '{id}': {source}")]
    TagEncode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl TagledgerError {
    /// True when a search hit a data file that does not exist yet.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, TagledgerError::MissingFile(_))
    }

    pub(crate) fn transport(address: impl Into<String>, message: impl ToString) -> Self {
        TagledgerError::Transport {
            address: address.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TagledgerError>;
