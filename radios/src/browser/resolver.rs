//! API host discovery.
//!
//! Radio Browser runs several equivalent API servers and publishes them as
//! DNS SRV records. A host is picked at random on first use, cached, and
//! dropped again whenever a request to it fails so that the next attempt
//! discovers a fresh one.

use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use rand::seq::IndexedRandom;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::RadioBrowserError;

/// SRV record listing the API servers.
pub const DEFAULT_SERVICE_NAME: &str = "_api._tcp.radio-browser.info";

/// Source of candidate API hosts.
#[async_trait]
pub trait HostDiscovery: Send + Sync + std::fmt::Debug {
    /// Return every currently advertised host (`name` or `name:port`).
    async fn discover(&self) -> Result<Vec<String>, RadioBrowserError>;
}

/// Discovers hosts through a DNS SRV lookup using the system resolver.
#[derive(Debug, Clone)]
pub struct SrvDiscovery {
    service_name: String,
}

impl SrvDiscovery {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl Default for SrvDiscovery {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

#[async_trait]
impl HostDiscovery for SrvDiscovery {
    async fn discover(&self) -> Result<Vec<String>, RadioBrowserError> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(|e| {
            RadioBrowserError::connection(format!("failed to configure DNS resolver: {e}"))
        })?;

        let lookup = resolver
            .srv_lookup(self.service_name.as_str())
            .await
            .map_err(|e| {
                RadioBrowserError::connection(format!(
                    "SRV lookup for {} failed: {e}",
                    self.service_name
                ))
            })?;

        // Priority and weight are ignored; all servers are equivalent.
        let hosts: Vec<String> = lookup
            .iter()
            .map(|srv| srv.target().to_utf8().trim_end_matches('.').to_string())
            .filter(|host| !host.is_empty())
            .collect();

        debug!(service = %self.service_name, count = hosts.len(), "discovered API hosts");
        Ok(hosts)
    }
}

/// A fixed list of hosts, for pinning a server or for tests.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    hosts: Vec<String>,
}

impl StaticDiscovery {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl HostDiscovery for StaticDiscovery {
    async fn discover(&self) -> Result<Vec<String>, RadioBrowserError> {
        Ok(self.hosts.clone())
    }
}

/// Caches one discovered host until it is invalidated.
///
/// Concurrent callers may race to resolve or invalidate; every outcome
/// converges on a freshly discovered host.
#[derive(Debug)]
pub struct HostResolver {
    discovery: Arc<dyn HostDiscovery>,
    host: RwLock<Option<String>>,
}

impl HostResolver {
    pub fn new(discovery: Arc<dyn HostDiscovery>) -> Self {
        Self {
            discovery,
            host: RwLock::new(None),
        }
    }

    /// Return the cached host, discovering one if there is none.
    pub async fn resolve(&self) -> Result<String, RadioBrowserError> {
        if let Some(host) = self.host.read().await.as_ref() {
            return Ok(host.clone());
        }

        let candidates = self.discovery.discover().await?;
        let host = pick(&candidates).ok_or_else(|| {
            RadioBrowserError::connection("service discovery returned no API hosts")
        })?;

        debug!(%host, "resolved API host");
        *self.host.write().await = Some(host.clone());
        Ok(host)
    }

    /// Forget the cached host.
    pub async fn invalidate(&self) {
        if let Some(host) = self.host.write().await.take() {
            debug!(%host, "invalidated API host");
        }
    }

    /// The cached host, without triggering discovery.
    pub async fn current(&self) -> Option<String> {
        self.host.read().await.clone()
    }
}

/// Pick a candidate uniformly at random.
fn pick(candidates: &[String]) -> Option<String> {
    candidates.choose(&mut rand::rng()).cloned()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HostDiscovery for Counting {
        async fn discover(&self) -> Result<Vec<String>, RadioBrowserError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("host{n}.example")])
        }
    }

    #[derive(Debug)]
    struct Failing;

    #[async_trait]
    impl HostDiscovery for Failing {
        async fn discover(&self) -> Result<Vec<String>, RadioBrowserError> {
            Err(RadioBrowserError::connection("NXDOMAIN"))
        }
    }

    #[tokio::test]
    async fn caches_until_invalidated() {
        let discovery = Arc::new(Counting::default());
        let resolver = HostResolver::new(discovery.clone());

        assert_eq!(resolver.current().await, None);
        assert_eq!(resolver.resolve().await.unwrap(), "host0.example");
        assert_eq!(resolver.resolve().await.unwrap(), "host0.example");
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 1);

        resolver.invalidate().await;
        assert_eq!(resolver.current().await, None);
        assert_eq!(resolver.resolve().await.unwrap(), "host1.example");
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn discovery_failure_is_a_connection_error() {
        let resolver = HostResolver::new(Arc::new(Failing));
        let err = resolver.resolve().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(resolver.current().await, None);
    }

    #[tokio::test]
    async fn empty_discovery_is_a_connection_error() {
        let resolver = HostResolver::new(Arc::new(StaticDiscovery::new(Vec::<String>::new())));
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, RadioBrowserError::Connection { .. }));
    }

    #[tokio::test]
    async fn static_discovery_returns_hosts() {
        let discovery = StaticDiscovery::new(["a.example", "b.example"]);
        assert_eq!(
            discovery.discover().await.unwrap(),
            vec!["a.example", "b.example"]
        );
    }

    #[test]
    fn pick_spreads_over_candidates() {
        let candidates: Vec<String> = (0..4).map(|i| format!("h{i}")).collect();
        let seen: HashSet<String> = (0..200).filter_map(|_| pick(&candidates)).collect();
        // 200 draws from 4 hosts miss one with probability ~4 * 0.75^200.
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn pick_from_nothing() {
        assert_eq!(pick(&[]), None);
    }

    #[test]
    fn default_service_name() {
        let discovery = SrvDiscovery::default();
        assert_eq!(discovery.service_name, "_api._tcp.radio-browser.info");
    }
}
