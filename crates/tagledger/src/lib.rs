//! Tagledger - redundant-source user fetch and tag search
//!
//! Fetches a list of user records from the first healthy source among several
//! redundant addresses, persists them to a flat CSV file, and answers
//! tag-intersection queries against that file.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   Sources   │────▶│   Fetcher    │────▶│             │
//! │ (HTTP, 1..n)│     │ (in order)   │     │ Orchestrator│◀──── caller / CLI
//! └─────────────┘     └──────────────┘     │             │
//!                     ┌──────────────┐     │             │
//!   data.csv ◀───────▶│ RecordStore  │◀───▶│             │
//!                     │ (codec, rows)│     └─────────────┘
//!                     └──────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Source**: an address answering with a JSON array of user records
//! - **Row**: `id, active, balance, ["tag",...]` in the data file
//! - **Search**: records whose tags are a superset of the requested tags

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod fetch;
pub mod file_store;
pub mod orchestrator;
pub mod rows;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use config::TagledgerConfig;
pub use error::{Result, TagledgerError};
pub use fetch::{Fetcher, HttpTransport, Transport};
pub use file_store::{FileOpener, MemoryFileOpener, OsFileOpener};
pub use orchestrator::Orchestrator;
pub use rows::{CsvRowFormat, RowFormat, RowReader, RowWriter};
pub use storage::{RecordStore, DEFAULT_DATA_FILE};
pub use types::{RawResponse, SourceRequest, SourceResponse, UserRecord};
