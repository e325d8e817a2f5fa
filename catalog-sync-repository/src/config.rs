//! Configuration types for the document-store gateway.

use std::time::Duration;

/// Default timeout applied to every request sent to the document store.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a gateway connection.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host URLs of the document store for the current environment.
    pub hosts: Vec<String>,
    /// Timeout for a single request. `None` leaves the transport default.
    pub request_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Create a config for the given hosts with the default timeout.
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            hosts,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Create a config with a custom request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// The host requests are sent to.
    pub fn primary_host(&self) -> Option<&str> {
        self.hosts.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new(vec!["http://localhost:9200".to_string()]);
        assert_eq!(config.request_timeout, Some(DEFAULT_REQUEST_TIMEOUT));
        assert_eq!(config.primary_host(), Some("http://localhost:9200"));
    }

    #[test]
    fn test_no_hosts() {
        let config = GatewayConfig::new(vec![]).with_request_timeout(Duration::from_secs(5));
        assert!(config.primary_host().is_none());
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }
}
