//! HTTP transport tests against a local stub server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tagledger::{Fetcher, SourceResponse, TagledgerError, UserRecord};

/// Serve exactly one HTTP response, returning the address and a handle that
/// yields the request line that was received.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    serve_raw(response)
}

/// Write `response` verbatim to the first connection, then close it.
fn serve_raw(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            let read = reader.read_line(&mut header).unwrap();
            if read == 0 || header == "\r\n" {
                break;
            }
        }

        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_line
    });

    (format!("http://{}/users", addr), handle)
}

/// An address nothing listens on.
fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/users", addr)
}

fn fetcher() -> Fetcher {
    Fetcher::http(Duration::from_secs(5)).expect("Failed to build HTTP fetcher")
}

#[test]
fn test_unavailable_source_falls_through_to_next() {
    let (down, down_handle) = serve_once("503 Service Unavailable", "");
    let (up, up_handle) = serve_once(
        "200 OK",
        r#"[{"_id":"12","balance":"100","tags":["tag"]}]"#,
    );

    let records = fetcher().fetch_all(&[down, up]).unwrap();
    assert_eq!(
        records,
        vec![UserRecord {
            id: "12".to_string(),
            is_active: false,
            balance: "100".to_string(),
            tags: vec!["tag".to_string()],
        }]
    );

    assert!(down_handle.join().unwrap().starts_with("GET /users"));
    assert!(up_handle.join().unwrap().starts_with("GET /users"));
}

#[test]
fn test_truncated_body_on_unavailable_source_is_skipped() {
    // Declares 100 bytes, sends 5, then closes.
    let (down, down_handle) = serve_raw(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\nConnection: close\r\n\r\nbusy."
            .to_string(),
    );
    let (up, up_handle) = serve_once("200 OK", "[]");

    let records = fetcher().fetch_all(&[down, up]).unwrap();
    assert!(records.is_empty());

    down_handle.join().unwrap();
    assert!(up_handle.join().unwrap().starts_with("GET /users"));
}

#[test]
fn test_all_sources_unavailable() {
    let (first, first_handle) = serve_once("503 Service Unavailable", "");
    let (second, second_handle) = serve_once("404 Not Found", "");

    let err = fetcher().fetch_all(&[first, second]).unwrap_err();
    assert!(matches!(err, TagledgerError::AllSourcesUnavailable));

    first_handle.join().unwrap();
    second_handle.join().unwrap();
}

#[test]
fn test_connection_failure_aborts() {
    let err = fetcher()
        .fetch_all(&[dead_address(), dead_address()])
        .unwrap_err();
    assert!(matches!(err, TagledgerError::Transport { .. }));
}

#[test]
fn test_fetch_raw_reads_success_body() {
    let (addr, handle) = serve_once("202 Accepted", "[]");

    let response = fetcher().fetch_raw("PUT", &addr).unwrap();
    assert_eq!(response, SourceResponse::Success(b"[]".to_vec()));
    assert!(handle.join().unwrap().starts_with("PUT /users"));
}
