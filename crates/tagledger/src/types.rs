//! Core data types shared by the fetcher and the record store.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

/// One user record as served by a remote source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque identifier. Uniqueness is not enforced.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    /// Decimal kept verbatim; never parsed.
    pub balance: String,
    /// Duplicates allowed; order is preserved on write. `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserRecord {
    /// Record carrying only the fields a tag search returns.
    pub fn summary(id: impl Into<String>, balance: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: balance.into(),
            ..Self::default()
        }
    }
}

/// A single request against one source address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub method: reqwest::Method,
    pub url: reqwest::Url,
}

/// Raw answer from a transport before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Classified answer from one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceResponse {
    /// 200/201/202/204 with the response body.
    Success(Vec<u8>),
    /// 503; the caller moves on to the next source.
    Unavailable,
    /// Any other status code.
    Unexpected(StatusCode),
}
