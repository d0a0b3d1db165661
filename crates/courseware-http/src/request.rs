//! Outbound request descriptors.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use courseware_core::Result;
use courseware_core::error::{Error, InvalidInputError};

/// Whether the client manages credentials for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Attach the stored access token and recover from a 401 by refreshing.
    Bearer,
    /// Send without credentials and surface a 401 as-is. Used for login,
    /// registration and the refresh exchange itself.
    Public,
}

/// One logical HTTP call.
///
/// Descriptors are immutable values: the client never mutates the one it is
/// handed. A replay after a refresh is a new descriptor produced by
/// [`retried`](Self::retried), whose attempt counter marks it as already
/// retried so it can never trigger another refresh.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    timeout: Option<Duration>,
    auth: AuthMode,
    attempt: u8,
}

impl RequestDescriptor {
    /// A request for `path`, relative to the API base URL (or a same-origin
    /// absolute URL, as found in pagination links).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout: None,
            auth: AuthMode::Bearer,
            attempt: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters.
    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add an extra header. `Authorization` is always managed by the client.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body from any serializable value.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("request body is not serializable: {}", e),
            })
        })?;
        Ok(self.body(value))
    }

    /// Set a JSON body.
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the client's timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send without credentials and without refresh handling.
    pub fn public(mut self) -> Self {
        self.auth = AuthMode::Public;
        self
    }

    /// The replay of this request: identical, but marked as retried.
    pub fn retried(&self) -> Self {
        let mut replay = self.clone();
        replay.attempt = self.attempt.saturating_add(1);
        replay
    }

    /// A GET for `link` that keeps this request's headers, timeout and
    /// auth mode. Query and body are dropped since `link` carries its own.
    pub fn follow(&self, link: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: link.into(),
            query: Vec::new(),
            headers: self.headers.clone(),
            body: None,
            timeout: self.timeout,
            auth: self.auth,
            attempt: 0,
        }
    }

    /// True once the request has been replayed after a refresh.
    pub fn is_retried(&self) -> bool {
        self.attempt > 0
    }

    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn json_body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn auth(&self) -> AuthMode {
        self.auth
    }
}
