//! Redundant-source fetcher.
//!
//! Sources are tried strictly in order. The first source answering with a
//! success status wins; a 503 or any other non-success status moves on to the
//! next source. Hard failures (bad address, connection error, undecodable body)
//! stop the walk immediately.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use tracing::{debug, info, warn};

use crate::error::{Result, TagledgerError};
use crate::types::{RawResponse, SourceRequest, SourceResponse, UserRecord};

/// Default transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes a single request against a source.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &SourceRequest) -> Result<RawResponse>;
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TagledgerError::transport("<client>", e))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &SourceRequest) -> Result<RawResponse> {
        let address = request.url.as_str();
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .map_err(|e| TagledgerError::transport(address, e))?;

        let status = response.status();
        // Only success bodies are consumed; a broken body on a skipped
        // status must not abort the walk.
        if !is_success(status) {
            return Ok(RawResponse::new(status, Vec::new()));
        }
        let body = response
            .bytes()
            .map_err(|e| TagledgerError::transport(address, e))?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

/// Fetches user records from the first usable source.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetcher backed by `HttpTransport` with the given timeout.
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(timeout)?)))
    }

    /// Try each address in order and return the first decoded dataset.
    ///
    /// Blank addresses are skipped and not counted as attempted. A decode
    /// failure on a success status is returned as-is; later sources are not
    /// consulted.
    pub fn fetch_all<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<UserRecord>> {
        let mut attempted = 0usize;

        for address in addresses {
            let address = address.as_ref().trim();
            if address.is_empty() {
                continue;
            }
            attempted += 1;
            debug!("Fetching user records from {}", address);

            match self.fetch_raw(Method::GET.as_str(), address)? {
                SourceResponse::Success(body) => {
                    // A `null` body is an empty dataset.
                    let records: Option<Vec<UserRecord>> =
                        serde_json::from_slice(&body).map_err(|source| TagledgerError::Decode {
                            address: address.to_string(),
                            source,
                        })?;
                    let records = records.unwrap_or_default();
                    info!("Fetched {} user records from {}", records.len(), address);
                    return Ok(records);
                }
                SourceResponse::Unavailable => {
                    warn!("Source {} is unavailable, trying next source", address);
                }
                SourceResponse::Unexpected(status) => {
                    let err = TagledgerError::UnexpectedStatus {
                        address: address.to_string(),
                        status: status.as_u16(),
                    };
                    warn!("{}, trying next source", err);
                }
            }
        }

        if attempted == 0 {
            return Err(TagledgerError::AllSourcesInvalid);
        }
        // Every attempted source was skipped without answering.
        Err(TagledgerError::AllSourcesUnavailable)
    }

    /// Issue one request and classify the response status.
    pub fn fetch_raw(&self, method: &str, address: &str) -> Result<SourceResponse> {
        let (address, method) = (address.trim(), method.trim());
        if address.is_empty() {
            return Err(TagledgerError::MissingParameter("address"));
        }
        if method.is_empty() {
            return Err(TagledgerError::MissingParameter("method"));
        }

        let url = Url::parse(address).map_err(|e| TagledgerError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        let method = parse_method(method)?;

        let response = self.transport.execute(&SourceRequest { method, url })?;
        Ok(classify(response))
    }
}

fn parse_method(method: &str) -> Result<Method> {
    match method {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        other => Err(TagledgerError::InvalidMethod(other.to_string())),
    }
}

fn is_success(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    )
}

fn classify(response: RawResponse) -> SourceResponse {
    match response.status {
        status if is_success(status) => SourceResponse::Success(response.body),
        StatusCode::SERVICE_UNAVAILABLE => SourceResponse::Unavailable,
        other => SourceResponse::Unexpected(other),
    }
}
