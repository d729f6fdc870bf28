//! Radio Browser HTTP client.
//!
//! Provides one async method per directory query. Each call resolves an API
//! host, sends the request with retry, and decodes the payload.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;

use crate::domain::{
    Country, FilterBy, Language, ListOptions, SearchOptions, Station, StationFilter, Stats, Tag,
};

use super::convert::{
    decode_countries, decode_languages, decode_stations, decode_stats, decode_tags,
};
use super::error::RadioBrowserError;
use super::resolver::{
    DEFAULT_SERVICE_NAME, HostDiscovery, HostResolver, SrvDiscovery, StaticDiscovery,
};
use super::retry::RetryPolicy;
use super::transport::{Params, Session, Transport};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Configuration for the Radio Browser client.
#[derive(Debug, Clone)]
pub struct RadioBrowserConfig {
    /// Sent as the `User-Agent` header; identifies the application.
    pub user_agent: String,
    /// Timeout for each request attempt.
    pub request_timeout: Duration,
    /// URL scheme for API requests
    pub scheme: String,
    /// SRV record to discover API hosts from
    pub service_name: String,
    /// Fixed hosts to use instead of SRV discovery
    pub hosts: Option<Vec<String>>,
    pub retry: RetryPolicy,
}

impl RadioBrowserConfig {
    /// Create a new config with the given user agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            scheme: "https".to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            hosts: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the per-attempt request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the URL scheme (for testing against plain HTTP).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the SRV record used for discovery.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Pin the client to one host, bypassing discovery.
    pub fn with_host(self, host: impl Into<String>) -> Self {
        self.with_hosts([host.into()])
    }

    /// Choose among fixed hosts instead of discovering them.
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn discovery(&self) -> Arc<dyn HostDiscovery> {
        match &self.hosts {
            Some(hosts) => Arc::new(StaticDiscovery::new(hosts.clone())),
            None => Arc::new(SrvDiscovery::new(self.service_name.clone())),
        }
    }
}

/// Radio Browser API client.
///
/// Cheap to clone; clones share the cached host and HTTP session, so one
/// client can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct RadioBrowser {
    resolver: Arc<HostResolver>,
    transport: Arc<Transport>,
    retry: RetryPolicy,
}

impl RadioBrowser {
    /// Create a client that owns its HTTP session.
    pub fn new(config: RadioBrowserConfig) -> Result<Self, RadioBrowserError> {
        Self::build(config, Session::owned())
    }

    /// Create a client on top of an existing `reqwest::Client`.
    ///
    /// [`RadioBrowser::close`] leaves that client alone.
    pub fn with_session(
        config: RadioBrowserConfig,
        http: reqwest::Client,
    ) -> Result<Self, RadioBrowserError> {
        Self::build(config, Session::external(http))
    }

    fn build(config: RadioBrowserConfig, session: Session) -> Result<Self, RadioBrowserError> {
        let transport = Transport::new(
            session,
            config.scheme.clone(),
            &config.user_agent,
            config.request_timeout,
        )?;

        Ok(Self {
            resolver: Arc::new(HostResolver::new(config.discovery())),
            transport: Arc::new(transport),
            retry: config.retry,
        })
    }

    /// Replace the host discovery mechanism.
    pub fn with_discovery(mut self, discovery: Arc<dyn HostDiscovery>) -> Self {
        self.resolver = Arc::new(HostResolver::new(discovery));
        self
    }

    /// The API host currently in use, if one has been resolved.
    pub async fn host(&self) -> Option<String> {
        self.resolver.current().await
    }

    /// Release the HTTP session if this client created it.
    ///
    /// A later call opens a new session.
    pub fn close(&self) {
        self.transport.session().close();
    }

    /// GET `path` with retry, returning the body.
    async fn request(&self, path: &str, params: Params) -> Result<String, RadioBrowserError> {
        let params = &params;
        self.retry
            .run(
                || self.attempt(path, params),
                RadioBrowserError::is_retryable,
            )
            .await
    }

    async fn attempt(&self, path: &str, params: &Params) -> Result<String, RadioBrowserError> {
        let host = self.resolver.resolve().await?;
        let result = self.transport.send(&host, Method::GET, path, params).await;

        if let Err(e) = &result
            && e.invalidates_host()
        {
            self.resolver.invalidate().await;
        }

        result
    }

    /// Get statistics of the server that answers.
    pub async fn stats(&self) -> Result<Stats, RadioBrowserError> {
        let body = self.request("stats", Params::new()).await?;
        decode_stats(&body)
    }

    /// Register a click on a station.
    ///
    /// Call this whenever a user starts playing a stream. The directory
    /// counts one click per station per client IP per day.
    pub async fn station_click(&self, uuid: &str) -> Result<(), RadioBrowserError> {
        let path = format!("url/{}", urlencoding::encode(uuid));
        self.request(&path, Params::new()).await?;
        Ok(())
    }

    /// List countries with their station counts.
    ///
    /// With `Order::Name` the result is sorted by resolved country name,
    /// descending when `reverse` is set. The directory itself orders by
    /// code, so `reverse` applies to the names after resolution.
    pub async fn countries(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<Country>, RadioBrowserError> {
        let body = self.request("countrycodes", list_params(options)).await?;
        decode_countries(&body, options.order, options.reverse)
    }

    /// List languages with their station counts.
    pub async fn languages(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<Language>, RadioBrowserError> {
        let body = self.request("languages", list_params(options)).await?;
        decode_languages(&body)
    }

    /// List tags with their station counts.
    pub async fn tags(&self, options: &ListOptions) -> Result<Vec<Tag>, RadioBrowserError> {
        let body = self.request("tags", list_params(options)).await?;
        decode_tags(&body)
    }

    /// List stations, optionally filtered.
    pub async fn stations(
        &self,
        filter: Option<&StationFilter>,
        options: &ListOptions,
    ) -> Result<Vec<Station>, RadioBrowserError> {
        let path = station_path("stations", filter)?;
        let body = self.request(&path, list_params(options)).await?;
        decode_stations(&body)
    }

    /// Look up one station by UUID.
    ///
    /// A UUID that cannot name a station (`.` or `..`) is absent without a
    /// request being sent.
    pub async fn station(&self, uuid: &str) -> Result<Option<Station>, RadioBrowserError> {
        let filter = StationFilter::new(FilterBy::Uuid, uuid);
        if !filter.is_sendable() {
            return Ok(None);
        }
        let stations = self
            .stations(Some(&filter), &ListOptions::default().with_limit(1))
            .await?;
        Ok(stations.into_iter().next())
    }

    /// Advanced station search.
    pub async fn search(
        &self,
        filter: Option<&StationFilter>,
        options: &ListOptions,
        search: &SearchOptions,
    ) -> Result<Vec<Station>, RadioBrowserError> {
        let path = station_path("stations/search", filter)?;
        let body = self
            .request(&path, search_params(list_params(options), search))
            .await?;
        decode_stations(&body)
    }
}

fn station_path(
    base: &str,
    filter: Option<&StationFilter>,
) -> Result<String, RadioBrowserError> {
    match filter {
        Some(filter) => Ok(filter.apply_to(base)?),
        None => Ok(base.to_string()),
    }
}

fn list_params(options: &ListOptions) -> Params {
    Params::new()
        .flag("hidebroken", options.hide_broken)
        .number("limit", options.limit)
        .number("offset", options.offset)
        .text("order", options.order.as_str())
        .flag("reverse", options.reverse)
}

fn search_params(params: Params, search: &SearchOptions) -> Params {
    params
        .optional_text("name", search.name.as_deref())
        .flag("name_exact", search.name_exact)
        .optional_text("country", search.country.as_deref())
        .flag("country_exact", search.country_exact)
        .flag("state_exact", search.state_exact)
        .flag("language_exact", search.language_exact)
        .flag("tag_exact", search.tag_exact)
        .number("bitrate_min", search.bitrate_min)
        .number("bitrate_max", search.bitrate_max)
}
