//! Error types for the AniList client.
//!
//! Construction problems surface as [`ClientError`] from the builder. Once a
//! client exists, nothing is returned as `Err`: transport trouble is carried
//! on the response envelope as an [`EngineError`], and errors reported by the
//! server arrive verbatim as [`GraphqlError`] values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint is not a valid absolute URL.
    #[error("invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// A default header could not be encoded.
    #[error("invalid value for header '{name}'")]
    InvalidHeader { name: String },

    /// The underlying HTTP client could not be created.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    pub message: String,
    pub status_code: Option<u16>,
    pub is_timeout: bool,
    pub is_connect: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// Failure to obtain a GraphQL response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    /// Network or protocol failure before a response was read.
    #[error("HTTP error: {}", .0.message)]
    Http(HttpErrorInfo),

    /// The server answered with a non-success status and no GraphQL body.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The request or response body was not valid JSON for the operation.
    #[error("JSON error: {message}")]
    Json { message: String },

    /// A cache-only fetch found nothing usable in the cache.
    #[error("no cached response for operation '{operation}'")]
    CacheMiss { operation: String },
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

/// Location of an error within the query document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Path segment pointing into the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    Key(String),
    Index(i64),
}

/// An error reported by the server inside the GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    /// HTTP-like status AniList attaches to most errors (404 for missing records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<GraphqlErrorLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<GraphqlPathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlError {
    /// Returns `true` when the server reports the requested record as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

pub(crate) fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_parses_anilist_shape() {
        let raw = serde_json::json!({
            "message": "Not Found.",
            "status": 404,
            "locations": [{"line": 2, "column": 3}]
        });

        let error: GraphqlError = serde_json::from_value(raw).unwrap();
        assert_eq!(error.message, "Not Found.");
        assert!(error.is_not_found());
        assert_eq!(error.locations, vec![GraphqlErrorLocation { line: 2, column: 3 }]);
        assert!(error.path.is_empty());
    }

    #[test]
    fn graphql_error_path_mixes_keys_and_indices() {
        let raw = serde_json::json!({
            "message": "boom",
            "path": ["Page", "media", 3, "title"]
        });

        let error: GraphqlError = serde_json::from_value(raw).unwrap();
        assert_eq!(error.path[2], GraphqlPathSegment::Index(3));
        assert_eq!(error.path[3], GraphqlPathSegment::Key("title".to_string()));
        assert!(!error.is_not_found());
    }

    #[test]
    fn engine_error_serializes_with_kind_tag() {
        let err = EngineError::HttpStatus {
            status: 500,
            body: "oops".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "http_status");
        assert_eq!(value["status"], 500);
        assert_eq!(err.to_string(), "HTTP status 500: oops");
    }

    #[test]
    fn truncate_body_caps_length() {
        let long = "x".repeat(5000);
        let body = truncate_body(long.as_bytes());
        assert!(body.ends_with('…'));
        assert!(body.len() < 5000);
    }
}
