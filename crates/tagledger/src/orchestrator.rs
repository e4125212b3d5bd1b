//! Composes the fetcher and the record store behind the three caller-facing
//! operations.

use std::path::Path;

use crate::config::TagledgerConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::storage::RecordStore;
use crate::types::UserRecord;

/// Fetcher + record store, built once and reused.
#[derive(Clone)]
pub struct Orchestrator {
    fetcher: Fetcher,
    store: RecordStore,
}

impl Orchestrator {
    pub fn new(fetcher: Fetcher, store: RecordStore) -> Self {
        Self { fetcher, store }
    }

    /// HTTP fetcher with the configured timeout and a filesystem-backed store.
    pub fn from_config(config: &TagledgerConfig) -> Result<Self> {
        let fetcher = Fetcher::http(config.request_timeout())?;
        Ok(Self::new(fetcher, RecordStore::os()))
    }

    pub fn fetch_all<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<UserRecord>> {
        self.fetcher.fetch_all(addresses)
    }

    pub fn store_all(&self, records: &[UserRecord], path: impl AsRef<Path>) -> Result<()> {
        self.store.store_all(records, path)
    }

    pub fn search<S: AsRef<str>>(
        &self,
        tags: &[S],
        path: impl AsRef<Path>,
    ) -> Result<Vec<UserRecord>> {
        self.store.search_by_tags(tags, path)
    }
}
