//! AniList client construction.
//!
//! The operations themselves live in [`crate::media`], [`crate::user`] and
//! [`crate::list`], each as its own `impl AnilistClient` block.

use std::time::Duration;

use shared::config::DEFAULT_ENDPOINT;
use shared::AnilistConfig;
use tracing::info;

use crate::engine::{CacheStats, FetchPolicy, GraphqlEngine, GraphqlEngineBuilder};
use crate::error::ClientError;

/// Default in-memory cache size in megabytes.
pub const DEFAULT_MEMORY_CACHE_SIZE_MB: i64 = 10;

/// Default cache entry lifetime in milliseconds.
pub const DEFAULT_CACHE_EXPIRE_MS: u64 = 30_000;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Client settings. Every field falls back to a default when `None`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Access token; blank tokens are treated as no token.
    pub token: Option<String>,
    /// Cache size in megabytes; zero or less disables caching.
    pub memory_cache_size_mb: Option<i64>,
    pub cache_expire_ms: Option<u64>,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl From<&AnilistConfig> for ClientConfig {
    fn from(config: &AnilistConfig) -> Self {
        Self {
            token: config.token.clone(),
            memory_cache_size_mb: Some(config.memory_cache_size_mb),
            cache_expire_ms: Some(config.cache_expire_ms),
            endpoint: Some(config.endpoint.clone()),
            timeout: Some(Duration::from_secs(config.timeout_seconds)),
            user_agent: config.user_agent.clone(),
        }
    }
}

type EngineHook = Box<dyn FnOnce(GraphqlEngineBuilder) -> GraphqlEngineBuilder + Send>;

/// Builder for [`AnilistClient`].
#[derive(Default)]
pub struct AnilistClientBuilder {
    config: ClientConfig,
    hooks: Vec<EngineHook>,
}

impl AnilistClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            hooks: Vec::new(),
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn memory_cache_size_mb(mut self, size_mb: i64) -> Self {
        self.config.memory_cache_size_mb = Some(size_mb);
        self
    }

    pub fn cache_expire_ms(mut self, expire_ms: u64) -> Self {
        self.config.cache_expire_ms = Some(expire_ms);
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Adjust the underlying engine builder directly.
    ///
    /// Hooks run in registration order after the settings above have been
    /// applied, so they can override any of them. Calling
    /// `builder.no_cache()` here, for instance, disables the cache even when
    /// a cache size is configured.
    pub fn configure_engine(
        mut self,
        hook: impl FnOnce(GraphqlEngineBuilder) -> GraphqlEngineBuilder + Send + 'static,
    ) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<AnilistClient, ClientError> {
        let config = self.config;
        let endpoint = config
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let cache_size_mb = config
            .memory_cache_size_mb
            .unwrap_or(DEFAULT_MEMORY_CACHE_SIZE_MB);
        let cache_expire =
            Duration::from_millis(config.cache_expire_ms.unwrap_or(DEFAULT_CACHE_EXPIRE_MS));
        let authenticated = config
            .token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());

        let mut builder = GraphqlEngine::builder(endpoint);
        if let Some(token) = config.token.as_deref() {
            builder = builder.bearer_token(token);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder = if cache_size_mb > 0 {
            let max_size_bytes = usize::try_from(cache_size_mb)
                .unwrap_or(usize::MAX)
                .saturating_mul(BYTES_PER_MB);
            builder
                .memory_cache(max_size_bytes, cache_expire)
                .default_fetch_policy(FetchPolicy::NetworkOnly)
        } else {
            builder.no_cache()
        };

        for hook in self.hooks {
            builder = hook(builder);
        }

        let engine = builder.build()?;

        info!(
            endpoint = %engine.endpoint(),
            authenticated,
            cache_size_mb = if engine.has_cache() { cache_size_mb } else { 0 },
            "AniList client created"
        );

        Ok(AnilistClient {
            engine,
            authenticated,
        })
    }
}

/// AniList GraphQL client.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Debug, Clone)]
pub struct AnilistClient {
    engine: GraphqlEngine,
    authenticated: bool,
}

impl AnilistClient {
    /// Create a client from settings.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        AnilistClientBuilder::new(config).build()
    }

    pub fn builder() -> AnilistClientBuilder {
        AnilistClientBuilder::default()
    }

    /// The engine every operation runs through.
    pub fn engine(&self) -> &GraphqlEngine {
        &self.engine
    }

    /// Whether a non-blank token was configured.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.engine.cache_stats()
    }

    pub fn clear_cache(&self) {
        self.engine.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_cache_with_network_only_default() {
        let client = AnilistClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.engine().endpoint().as_str(), "https://graphql.anilist.co/");
        assert_eq!(client.engine().default_fetch_policy(), FetchPolicy::NetworkOnly);

        let stats = client.cache_stats().unwrap();
        assert_eq!(stats.max_size_bytes, 10 * 1024 * 1024);
        assert_eq!(stats.entries, 0);
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_non_positive_cache_size_disables_cache() {
        for size in [0, -5] {
            let client = AnilistClient::builder()
                .memory_cache_size_mb(size)
                .build()
                .unwrap();
            assert!(!client.engine().has_cache());
            assert!(client.cache_stats().is_none());
        }
    }

    #[test]
    fn test_blank_token_is_unauthenticated() {
        let client = AnilistClient::builder().token("  ").build().unwrap();
        assert!(!client.is_authenticated());

        let client = AnilistClient::builder().token("secret").build().unwrap();
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_configure_engine_runs_after_settings() {
        let client = AnilistClient::builder()
            .endpoint("https://example.invalid/graphql")
            .configure_engine(|builder| {
                builder
                    .endpoint("http://localhost:9999/graphql")
                    .default_fetch_policy(FetchPolicy::CacheFirst)
            })
            .build()
            .unwrap();

        assert_eq!(client.engine().endpoint().as_str(), "http://localhost:9999/graphql");
        assert_eq!(client.engine().default_fetch_policy(), FetchPolicy::CacheFirst);
    }

    #[test]
    fn test_configure_engine_can_disable_configured_cache() {
        let client = AnilistClient::builder()
            .memory_cache_size_mb(5)
            .configure_engine(|builder| builder.no_cache())
            .build()
            .unwrap();
        assert!(!client.engine().has_cache());
    }

    #[test]
    fn test_invalid_endpoint_fails_construction() {
        let err = AnilistClient::builder().endpoint("::nope").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_from_shared_config() {
        let shared = AnilistConfig {
            token: Some("abc".to_string()),
            memory_cache_size_mb: 0,
            timeout_seconds: 5,
            ..AnilistConfig::default()
        };
        let config = ClientConfig::from(&shared);
        assert_eq!(config.memory_cache_size_mb, Some(0));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.endpoint.as_deref(), Some(DEFAULT_ENDPOINT));

        let client = AnilistClient::new(config).unwrap();
        assert!(client.is_authenticated());
        assert!(!client.engine().has_cache());
    }
}
