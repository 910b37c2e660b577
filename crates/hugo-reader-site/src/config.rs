//! Site client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by the HTTP fetcher and the query operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteClientConfig {
    /// Timeout for a single HTTP request.
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    http_timeout: Duration,

    /// `User-Agent` sent with every request.
    #[serde(default = "default_user_agent")]
    user_agent: String,

    /// TTL for cached search responses.
    #[serde(default = "default_search_ttl", with = "humantime_serde")]
    search_ttl: Duration,

    /// TTL for cached discovery responses.
    #[serde(default = "default_discovery_ttl", with = "humantime_serde")]
    discovery_ttl: Duration,
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("HugoReader/{}", env!("CARGO_PKG_VERSION"))
}

fn default_search_ttl() -> Duration {
    Duration::from_secs(120)
}

fn default_discovery_ttl() -> Duration {
    Duration::from_secs(600)
}

impl Default for SiteClientConfig {
    fn default() -> Self {
        Self {
            http_timeout: default_http_timeout(),
            user_agent: default_user_agent(),
            search_ttl: default_search_ttl(),
            discovery_ttl: default_discovery_ttl(),
        }
    }
}

impl SiteClientConfig {
    /// Creates a new builder for SiteClientConfig.
    pub fn builder() -> SiteClientConfigBuilder {
        SiteClientConfigBuilder::default()
    }

    /// Returns the per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Returns the `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the TTL applied to search results.
    pub fn search_ttl(&self) -> Duration {
        self.search_ttl
    }

    /// Returns the TTL applied to discovery results.
    pub fn discovery_ttl(&self) -> Duration {
        self.discovery_ttl
    }
}

/// Builder for SiteClientConfig.
#[derive(Debug, Default)]
pub struct SiteClientConfigBuilder {
    http_timeout: Option<Duration>,
    user_agent: Option<String>,
    search_ttl: Option<Duration>,
    discovery_ttl: Option<Duration>,
}

impl SiteClientConfigBuilder {
    /// Sets the HTTP timeout.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the search TTL.
    pub fn search_ttl(mut self, ttl: Duration) -> Self {
        self.search_ttl = Some(ttl);
        self
    }

    /// Sets the discovery TTL.
    pub fn discovery_ttl(mut self, ttl: Duration) -> Self {
        self.discovery_ttl = Some(ttl);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or the user agent is blank.
    pub fn build(self) -> Result<SiteClientConfig, &'static str> {
        let http_timeout = self.http_timeout.unwrap_or_else(default_http_timeout);
        if http_timeout.is_zero() {
            return Err("http_timeout must be greater than zero");
        }

        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        if user_agent.trim().is_empty() {
            return Err("user_agent must not be empty");
        }

        Ok(SiteClientConfig {
            http_timeout,
            user_agent,
            search_ttl: self.search_ttl.unwrap_or_else(default_search_ttl),
            discovery_ttl: self.discovery_ttl.unwrap_or_else(default_discovery_ttl),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteClientConfig::default();

        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert!(config.user_agent().starts_with("HugoReader/"));
        assert_eq!(config.search_ttl(), Duration::from_secs(120));
        assert_eq!(config.discovery_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_builder_full() {
        let config = SiteClientConfig::builder()
            .http_timeout(Duration::from_secs(3))
            .user_agent("test-agent")
            .search_ttl(Duration::from_secs(30))
            .discovery_ttl(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.http_timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent(), "test-agent");
        assert_eq!(config.search_ttl(), Duration::from_secs(30));
        assert_eq!(config.discovery_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = SiteClientConfig::builder()
            .http_timeout(Duration::ZERO)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_blank_user_agent() {
        assert!(SiteClientConfig::builder().user_agent("  ").build().is_err());
    }

    #[test]
    fn test_deserialize_human_durations() {
        let config: SiteClientConfig =
            serde_json::from_str(r#"{"http_timeout":"5s","search_ttl":"1m"}"#).unwrap();

        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert_eq!(config.search_ttl(), Duration::from_secs(60));
        assert_eq!(config.discovery_ttl(), Duration::from_secs(600));
    }
}
