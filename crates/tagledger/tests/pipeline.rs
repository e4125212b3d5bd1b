//! End-to-end tests for the record store and orchestrator
//!
//! These tests run the full store -> search path over real files and check
//! the tag-subset property over generated datasets.

use proptest::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tagledger::{
    CsvRowFormat, Fetcher, MemoryFileOpener, Orchestrator, RawResponse, RecordStore,
    SourceRequest, TagledgerError, Transport, UserRecord,
};
use tempfile::TempDir;

/// Create a test environment with a temp data file
struct TestEnv {
    /// Temp directory (cleaned up on drop)
    _temp: TempDir,
    /// Data file path
    pub data_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp.path().join("data.csv");
        Self {
            _temp: temp,
            data_path,
        }
    }
}

fn user(id: &str, active: bool, balance: &str, tags: &[&str]) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        is_active: active,
        balance: balance.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

struct NeverCalled;

impl Transport for NeverCalled {
    fn execute(&self, request: &SourceRequest) -> tagledger::Result<RawResponse> {
        panic!("unexpected request to {}", request.url);
    }
}

fn os_orchestrator() -> Orchestrator {
    Orchestrator::new(Fetcher::new(Arc::new(NeverCalled)), RecordStore::os())
}

// ============================================================================
// Store / Search
// ============================================================================

#[test]
fn test_round_trip_single_record() {
    let env = TestEnv::new();
    let orch = os_orchestrator();
    let record = user("5f1c", true, "$2,312.95", &["sed", "quis", "dolor"]);

    orch.store_all(std::slice::from_ref(&record), &env.data_path)
        .unwrap();
    let found = orch.search(record.tags.as_slice(), &env.data_path).unwrap();

    assert_eq!(found, vec![UserRecord::summary("5f1c", "$2,312.95")]);
}

#[test]
fn test_stored_file_format() {
    let env = TestEnv::new();
    let orch = os_orchestrator();
    orch.store_all(
        &[
            user("1", true, "100", &["a", "b"]),
            user("2", false, "2,000", &[]),
        ],
        &env.data_path,
    )
    .unwrap();

    let content = fs::read_to_string(&env.data_path).unwrap();
    assert_eq!(
        content,
        "1,true,100,\"[\"\"a\"\",\"\"b\"\"]\"\n2,false,\"2,000\",[]\n"
    );
}

#[test]
fn test_store_replaces_existing_file() {
    let env = TestEnv::new();
    fs::write(&env.data_path, "garbage that is not a row\n").unwrap();

    let orch = os_orchestrator();
    orch.store_all(&[user("1", true, "1", &["x"])], &env.data_path)
        .unwrap();

    let empty: [&str; 0] = [];
    let found = orch.search(&empty, &env.data_path).unwrap();
    assert_eq!(found, vec![UserRecord::summary("1", "1")]);
}

#[test]
fn test_search_missing_file_is_distinguishable() {
    let env = TestEnv::new();
    let err = os_orchestrator()
        .search(&["a"], &env.data_path)
        .unwrap_err();

    match err {
        TagledgerError::MissingFile(path) => assert_eq!(path, env.data_path),
        other => panic!("expected MissingFile, got {other:?}"),
    }
}

#[test]
fn test_search_short_row_returns_no_partial_results() {
    let env = TestEnv::new();
    fs::write(&env.data_path, "1,true,10,[]\n2,true\n3,true,30,[]\n").unwrap();

    let empty: [&str; 0] = [];
    let err = os_orchestrator()
        .search(&empty, &env.data_path)
        .unwrap_err();
    assert!(matches!(err, TagledgerError::BadRowFormat { row: 2, fields: 2 }));
}

// ============================================================================
// Properties
// ============================================================================

fn record_strategy() -> impl Strategy<Value = UserRecord> {
    (
        "[a-z0-9]{1,6}",
        any::<bool>(),
        "[0-9$,.\" ]{0,8}",
        prop::collection::vec("[a-d]", 0..5),
    )
        .prop_map(|(id, is_active, balance, tags)| UserRecord {
            id,
            is_active,
            balance,
            tags,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_search_returns_exactly_supersets(
        records in prop::collection::vec(record_strategy(), 0..12),
        wanted in prop::collection::vec("[a-d]", 0..3),
    ) {
        let store = RecordStore::new(Arc::new(MemoryFileOpener::new()), Arc::new(CsvRowFormat));
        store.store_all(&records, "data.csv").unwrap();

        let found = store.search_by_tags(wanted.as_slice(), "data.csv").unwrap();

        let required: HashSet<&str> = wanted.iter().map(String::as_str).collect();
        let expected: Vec<UserRecord> = records
            .iter()
            .filter(|r| {
                let present: HashSet<&str> = r.tags.iter().map(String::as_str).collect();
                required.is_subset(&present)
            })
            .map(|r| UserRecord::summary(r.id.clone(), r.balance.clone()))
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_empty_search_returns_every_record_in_order(
        records in prop::collection::vec(record_strategy(), 0..12),
    ) {
        let store = RecordStore::new(Arc::new(MemoryFileOpener::new()), Arc::new(CsvRowFormat));
        store.store_all(&records, "data.csv").unwrap();

        let empty: Vec<String> = Vec::new();
        let found = store.search_by_tags(empty.as_slice(), "data.csv").unwrap();
        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(ids, expected);
    }
}
