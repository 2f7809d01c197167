//! GraphQL execution engine.
//!
//! A small reqwest-backed executor for typed operations. It posts the
//! standard `{query, operationName, variables}` envelope, decodes the
//! `{data, errors}` answer, and consults an optional [`MemoryCache`]
//! according to the [`FetchPolicy`] of each call. It never retries and never
//! returns `Err` from `execute`: failures travel on the [`EngineResponse`].

pub mod cache;

pub use cache::{CacheStats, MemoryCache};

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{truncate_body, ClientError, EngineError, GraphqlError};
use crate::types::ParseEnumError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("anilist-rs/", env!("CARGO_PKG_VERSION"));

/// How a query is resolved between the cache and the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// Serve from cache when possible, otherwise go to the network.
    #[default]
    CacheFirst,
    /// Serve from cache only; a miss is reported as an exception.
    CacheOnly,
    /// Go to the network, falling back to the cache on transport failure.
    NetworkFirst,
    /// Always go to the network.
    NetworkOnly,
}

impl FetchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchPolicy::CacheFirst => "cache-first",
            FetchPolicy::CacheOnly => "cache-only",
            FetchPolicy::NetworkFirst => "network-first",
            FetchPolicy::NetworkOnly => "network-only",
        }
    }
}

impl std::fmt::Display for FetchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchPolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "cachefirst" => Ok(FetchPolicy::CacheFirst),
            "cacheonly" => Ok(FetchPolicy::CacheOnly),
            "networkfirst" => Ok(FetchPolicy::NetworkFirst),
            "networkonly" => Ok(FetchPolicy::NetworkOnly),
            _ => Err(ParseEnumError::new("FetchPolicy", s)),
        }
    }
}

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Typed GraphQL operation definition.
///
/// Implement this trait for each query and mutation.
pub trait GraphqlOperation {
    /// Variables type; absent optional filters must not serialize.
    type Variables: Serialize + Send + Sync;
    /// Response data type.
    type Data: DeserializeOwned + Send;

    /// GraphQL document text.
    const QUERY: &'static str;
    /// Operation name, also used as part of the cache key.
    const OPERATION_NAME: &'static str;
    /// Mutations bypass the cache and invalidate it on success.
    const KIND: OperationKind = OperationKind::Query;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    operation_name: &'a str,
    variables: &'a V,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct GraphqlEnvelope<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

impl<T> GraphqlEnvelope<T> {
    fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

/// Outcome of a single execution.
#[derive(Debug, Clone)]
pub struct EngineResponse<T> {
    /// Decoded `data`, possibly partial when `errors` is set.
    pub data: Option<T>,
    /// Errors reported by the server.
    pub errors: Option<Vec<GraphqlError>>,
    /// Transport or decoding failure; `data` is `None` when this is set.
    pub exception: Option<EngineError>,
    /// Whether the response was served from the cache.
    pub from_cache: bool,
}

impl<T> EngineResponse<T> {
    fn failed(exception: EngineError) -> Self {
        Self {
            data: None,
            errors: None,
            exception: Some(exception),
            from_cache: false,
        }
    }

    fn from_envelope(envelope: GraphqlEnvelope<T>, from_cache: bool) -> Self {
        Self {
            data: envelope.data,
            errors: envelope.errors,
            exception: None,
            from_cache,
        }
    }

    /// Returns `true` when there is neither an exception nor a server error.
    pub fn is_success(&self) -> bool {
        self.exception.is_none() && self.errors.as_ref().map_or(true, Vec::is_empty)
    }
}

/// GraphQL engine builder.
#[derive(Debug, Clone)]
pub struct GraphqlEngineBuilder {
    endpoint: String,
    headers: HeaderMap,
    invalid_header: Option<String>,
    timeout: Duration,
    user_agent: String,
    http_client: Option<reqwest::Client>,
    cache: Option<(usize, Duration)>,
    default_policy: FetchPolicy,
}

impl GraphqlEngineBuilder {
    /// Create a new builder for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: HeaderMap::new(),
            invalid_header: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_client: None,
            cache: None,
            default_policy: FetchPolicy::NetworkOnly,
        }
    }

    /// Set the endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Add a header sent with every request. Invalid names or values are
    /// reported by [`build`](Self::build).
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.invalid_header = Some(name.to_string()),
        }
        self
    }

    /// Send `Authorization: Bearer <token>`. Blank tokens are ignored.
    pub fn bearer_token(mut self, token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return self;
        }
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => self.invalid_header = Some(AUTHORIZATION.to_string()),
        }
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a preconfigured HTTP client; timeout and user agent are then
    /// whatever that client was built with.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Enable the in-memory result cache.
    pub fn memory_cache(mut self, max_size_bytes: usize, expire_after: Duration) -> Self {
        self.cache = Some((max_size_bytes, expire_after));
        self
    }

    /// Disable the in-memory result cache.
    pub fn no_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Policy used when a call does not specify one.
    pub fn default_fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<GraphqlEngine, ClientError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        if let Some(name) = self.invalid_header {
            return Err(ClientError::InvalidHeader { name });
        }

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .user_agent(self.user_agent)
                .gzip(true)
                .build()?,
        };

        let cache = self
            .cache
            .map(|(max_size_bytes, expire_after)| Arc::new(MemoryCache::new(max_size_bytes, expire_after)));

        debug!(
            endpoint = %endpoint,
            cache = cache.is_some(),
            default_policy = %self.default_policy,
            "GraphQL engine built"
        );

        Ok(GraphqlEngine {
            endpoint,
            http,
            headers: self.headers,
            cache,
            default_policy: self.default_policy,
        })
    }
}

/// GraphQL engine.
#[derive(Debug, Clone)]
pub struct GraphqlEngine {
    endpoint: Url,
    http: reqwest::Client,
    headers: HeaderMap,
    cache: Option<Arc<MemoryCache>>,
    default_policy: FetchPolicy,
}

impl GraphqlEngine {
    /// Start building an engine for the given endpoint.
    pub fn builder(endpoint: impl Into<String>) -> GraphqlEngineBuilder {
        GraphqlEngineBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn default_fetch_policy(&self) -> FetchPolicy {
        self.default_policy
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Current cache statistics, if caching is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Execute a typed operation.
    ///
    /// `policy` overrides the engine default for this call; it is ignored
    /// for mutations, which always go to the network.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: &O::Variables,
        policy: Option<FetchPolicy>,
    ) -> EngineResponse<O::Data> {
        if O::KIND == OperationKind::Mutation {
            let response = self.network::<O>(variables, None).await;
            if response.is_success() {
                self.clear_cache();
            }
            return response;
        }

        let policy = policy.unwrap_or(self.default_policy);
        let key = match serde_json::to_vec(variables) {
            Ok(bytes) => MemoryCache::key(O::OPERATION_NAME, &bytes),
            Err(e) => return EngineResponse::failed(e.into()),
        };
        let cache = self.cache.as_deref();

        match (policy, cache) {
            (FetchPolicy::CacheOnly, cache) => cache
                .and_then(|cache| Self::cached::<O::Data>(cache, key))
                .unwrap_or_else(|| {
                    EngineResponse::failed(EngineError::CacheMiss {
                        operation: O::OPERATION_NAME.to_string(),
                    })
                }),
            (FetchPolicy::CacheFirst, Some(cache)) => match Self::cached::<O::Data>(cache, key) {
                Some(response) => response,
                None => self.network::<O>(variables, Some((cache, key))).await,
            },
            (FetchPolicy::NetworkFirst, Some(cache)) => {
                let response = self.network::<O>(variables, Some((cache, key))).await;
                if response.exception.is_some() {
                    if let Some(cached) = Self::cached::<O::Data>(cache, key) {
                        debug!(
                            operation = O::OPERATION_NAME,
                            "Network failed, serving cached response"
                        );
                        return cached;
                    }
                }
                response
            }
            (_, cache) => {
                self.network::<O>(variables, cache.map(|cache| (cache, key)))
                    .await
            }
        }
    }

    fn cached<T: DeserializeOwned>(cache: &MemoryCache, key: u64) -> Option<EngineResponse<T>> {
        let bytes = cache.get(key)?;
        match serde_json::from_slice::<GraphqlEnvelope<T>>(&bytes) {
            Ok(envelope) => Some(EngineResponse::from_envelope(envelope, true)),
            Err(e) => {
                warn!(error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn network<O: GraphqlOperation>(
        &self,
        variables: &O::Variables,
        store: Option<(&MemoryCache, u64)>,
    ) -> EngineResponse<O::Data> {
        let started = Instant::now();
        let body = GraphqlRequest {
            query: O::QUERY,
            operation_name: O::OPERATION_NAME,
            variables,
        };

        debug!(operation = O::OPERATION_NAME, url = %self.endpoint, "Sending GraphQL request");

        let result = self
            .http
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(operation = O::OPERATION_NAME, error = %e, "GraphQL request failed");
                return EngineResponse::failed(e.into());
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(operation = O::OPERATION_NAME, error = %e, "Failed to read response body");
                return EngineResponse::failed(e.into());
            }
        };

        let envelope = match decode::<O::Data>(status, &bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    operation = O::OPERATION_NAME,
                    status = status.as_u16(),
                    error = %e,
                    "Failed to decode GraphQL response"
                );
                return EngineResponse::failed(e);
            }
        };

        debug!(
            operation = O::OPERATION_NAME,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            errors = envelope.errors.as_ref().map_or(0, Vec::len),
            "GraphQL response received"
        );

        if let Some((cache, key)) = store {
            if status.is_success() && envelope.data.is_some() && !envelope.has_errors() {
                cache.insert(key, bytes.to_vec());
            }
        }

        EngineResponse::from_envelope(envelope, false)
    }
}

/// Decode a response body.
///
/// Non-success statuses are still treated as GraphQL answers when the body
/// carries an error list, so "not found" stays on the error channel.
fn decode<T: DeserializeOwned>(
    status: StatusCode,
    bytes: &[u8],
) -> Result<GraphqlEnvelope<T>, EngineError> {
    if status.is_success() {
        return serde_json::from_slice(bytes).map_err(EngineError::from);
    }

    match serde_json::from_slice::<GraphqlEnvelope<T>>(bytes) {
        Ok(envelope) if envelope.has_errors() => Ok(envelope),
        _ => Err(EngineError::HttpStatus {
            status: status.as_u16(),
            body: truncate_body(bytes),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct MediaData {
        #[serde(rename = "Media")]
        media: Option<serde_json::Value>,
    }

    #[test]
    fn test_fetch_policy_parsing() {
        assert_eq!("cache-first".parse::<FetchPolicy>().unwrap(), FetchPolicy::CacheFirst);
        assert_eq!("NETWORK_ONLY".parse::<FetchPolicy>().unwrap(), FetchPolicy::NetworkOnly);
        assert_eq!("networkFirst".parse::<FetchPolicy>().unwrap(), FetchPolicy::NetworkFirst);
        assert!("sometimes".parse::<FetchPolicy>().is_err());
        assert_eq!(FetchPolicy::CacheOnly.to_string(), "cache-only");
    }

    #[test]
    fn test_builder_rejects_invalid_endpoint() {
        let err = GraphqlEngine::builder("not a url").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let err = GraphqlEngine::builder("https://graphql.anilist.co")
            .header("X-Bad", "line\nbreak")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { name } if name == "X-Bad"));
    }

    #[test]
    fn test_blank_bearer_token_is_ignored() {
        let builder = GraphqlEngine::builder("https://graphql.anilist.co").bearer_token("   ");
        assert!(builder.headers.get(AUTHORIZATION).is_none());

        let builder = builder.bearer_token("abc");
        let value = builder.headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_engine_defaults() {
        let engine = GraphqlEngine::builder("https://graphql.anilist.co")
            .build()
            .unwrap();
        assert!(!engine.has_cache());
        assert_eq!(engine.cache_stats(), None);
        assert_eq!(engine.default_fetch_policy(), FetchPolicy::NetworkOnly);
    }

    #[test]
    fn test_request_body_shape() {
        #[derive(Serialize)]
        struct Vars {
            id: i32,
        }
        let body = GraphqlRequest {
            query: "query Media($id: Int) { Media(id: $id) { id } }",
            operation_name: "Media",
            variables: &Vars { id: 1 },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["operationName"], "Media");
        assert_eq!(value["variables"]["id"], 1);
    }

    #[test]
    fn test_decode_success() {
        let body = br#"{"data":{"Media":{"id":1}}}"#;
        let envelope = decode::<MediaData>(StatusCode::OK, body).unwrap();
        assert!(envelope.data.unwrap().media.is_some());
        assert!(envelope.errors.is_none());
    }

    #[test]
    fn test_decode_not_found_keeps_error_channel() {
        let body = br#"{"errors":[{"message":"Not Found.","status":404}],"data":{"Media":null}}"#;
        let envelope = decode::<MediaData>(StatusCode::NOT_FOUND, body).unwrap();
        assert_eq!(envelope.data, Some(MediaData { media: None }));
        assert!(envelope.errors.unwrap()[0].is_not_found());
    }

    #[test]
    fn test_decode_plain_http_failure() {
        let err = decode::<MediaData>(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>")
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::HttpStatus {
                status: 502,
                body: "<html>bad gateway</html>".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let err = decode::<MediaData>(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, EngineError::Json { .. }));
    }
}
