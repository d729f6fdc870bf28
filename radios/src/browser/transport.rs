//! Single HTTP request against one API host.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use tracing::debug;
use url::Url;

use super::error::RadioBrowserError;

/// Path prefix of the JSON API.
const BASE_PATH: &str = "/json/";

/// Query parameters with the value normalization the API expects.
///
/// The API reads every query value as a string, so booleans are sent as
/// lowercase `true`/`false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, key: &'static str, value: bool) -> Self {
        let value = if value { "true" } else { "false" };
        self.pairs.push((key, value.to_string()));
        self
    }

    pub fn number(mut self, key: &'static str, value: impl Into<u64>) -> Self {
        self.pairs.push((key, value.into().to_string()));
        self
    }

    pub fn text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((key, value.into()));
        self
    }

    /// Add `value` only when present.
    pub fn optional_text(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.text(key, v),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The HTTP connection pool a client talks through.
///
/// An owned session builds its `reqwest::Client` on first use and drops it
/// on [`Session::close`]. An external session wraps a caller's client and
/// never drops it.
#[derive(Debug)]
pub struct Session {
    http: Mutex<Option<reqwest::Client>>,
    owned: bool,
}

impl Session {
    pub fn owned() -> Self {
        Self {
            http: Mutex::new(None),
            owned: true,
        }
    }

    pub fn external(http: reqwest::Client) -> Self {
        Self {
            http: Mutex::new(Some(http)),
            owned: false,
        }
    }

    #[cfg(test)]
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The HTTP client, creating it if this session owns one and has none.
    pub fn client(&self) -> Result<reqwest::Client, RadioBrowserError> {
        let mut guard = self.http.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(http) = guard.as_ref() {
            return Ok(http.clone());
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RadioBrowserError::InvalidConfig(format!("HTTP client: {e}")))?;
        debug!("opened HTTP session");
        *guard = Some(http.clone());
        Ok(http)
    }

    /// Release the HTTP client if this session created it.
    pub fn close(&self) {
        if !self.owned {
            return;
        }
        let mut guard = self.http.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("closed HTTP session");
        }
    }
}

/// Issues requests with the client's headers, timeout and error mapping.
#[derive(Debug)]
pub struct Transport {
    session: Session,
    scheme: String,
    user_agent: HeaderValue,
    timeout: Duration,
}

impl Transport {
    pub fn new(
        session: Session,
        scheme: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, RadioBrowserError> {
        let user_agent = HeaderValue::from_str(user_agent).map_err(|_| {
            RadioBrowserError::InvalidConfig(format!("invalid user agent: {user_agent:?}"))
        })?;

        Ok(Self {
            session,
            scheme: scheme.into(),
            user_agent,
            timeout,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Build the full URL for an API path on `host`.
    pub fn endpoint(&self, host: &str, path: &str) -> Result<Url, RadioBrowserError> {
        let base = Url::parse(&format!("{}://{}{}", self.scheme, host, BASE_PATH))?;
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Send one request and return the body text.
    ///
    /// The timeout covers the whole exchange, including reading the body.
    /// Non-2xx statuses surface as connection errors; a 2xx answer that is
    /// not JSON is a protocol error.
    pub async fn send(
        &self,
        host: &str,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<String, RadioBrowserError> {
        let url = self.endpoint(host, path)?;
        let http = self.session.client()?;

        debug!(%method, %url, "sending request");
        let request = http
            .request(method, url)
            .header(USER_AGENT, self.user_agent.clone())
            .header(ACCEPT, "application/json")
            .query(params.pairs());

        let exchange = async {
            let response = request.send().await?.error_for_status()?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, content_type, body))
        };

        let (status, content_type, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| RadioBrowserError::Timeout)??;

        if !content_type.contains("application/json") {
            return Err(RadioBrowserError::Protocol {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
