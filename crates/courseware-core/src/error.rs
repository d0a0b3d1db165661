//! Error types for the courseware client.
//!
//! The variants follow what a caller has to do about a failure: retry later
//! (`Network`), send the user back to login (`AuthExpired`), show a message
//! (`Api`) or show per-field messages (`Validation`).

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// The unified error type for courseware operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS, TLS, connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The session could not be recovered and has been terminated.
    #[error("session expired")]
    AuthExpired,

    /// The server answered with a non-2xx status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The server rejected the request with structured field errors.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The server answered with a body we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Caller-supplied input was rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The account exists but its email address has not been verified.
    #[error("email address not verified")]
    EmailNotVerified,
}

impl Error {
    /// HTTP status associated with the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.status),
            Error::Validation(e) => Some(e.status),
            Error::Protocol(e) => e.status,
            _ => None,
        }
    }

    /// True for failures that mean the caller is not (or no longer) signed in.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::AuthExpired) || self.status() == Some(401)
    }

    /// The most specific human-readable message available.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => e.message.clone().unwrap_or_else(|| e.to_string()),
            Error::Validation(e) => e.message.clone().unwrap_or_else(|| e.to_string()),
            Error::AuthExpired => "Your session has expired. Please log in again.".to_string(),
            Error::EmailNotVerified => "Please verify your email address to log in.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Any other HTTP client failure (TLS, redirect loop, body read).
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-2xx response that carried no field errors.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Message extracted from the error envelope, if any.
    pub message: Option<String>,
    /// The raw response body (JSON, or a string for non-JSON bodies).
    pub payload: serde_json::Value,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// A 4xx response whose body maps fields to lists of messages.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// HTTP status code.
    pub status: u16,
    /// Top-level message, if any.
    pub message: Option<String>,
    /// Field name to messages.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Messages reported for a single field.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        for (field, messages) in &self.fields {
            write!(f, "; {}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A response body that did not have the expected shape.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code of the offending response, when there was one.
    pub status: Option<u16>,
    /// What was wrong with it.
    pub message: String,
}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A request path that cannot be resolved against the API URL.
    #[error("invalid request path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// A header name or value that cannot be sent.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// Stored data could not be decoded.
    #[error("corrupt stored value for '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// The backend's error envelope: `{ success: false, error: { message, details } }`.
///
/// Some views answer with a bare `{ message }` or DRF's `{ detail }`, so every
/// part is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// The `error` object inside [`ErrorEnvelope`].
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// The best available message.
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.detail.clone())
    }

    /// Field errors, when `details` is an object of `field -> [messages]`.
    ///
    /// A string value is accepted as a single message. `detail` and
    /// `non_field_errors` style keys are kept like any other field.
    pub fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let details = self.error.as_ref()?.details.as_ref()?.as_object()?;

        let mut fields = BTreeMap::new();
        for (name, value) in details {
            let messages = match value {
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect::<Vec<_>>(),
                serde_json::Value::String(s) => vec![s.clone()],
                _ => continue,
            };
            if !messages.is_empty() {
                fields.insert(name.clone(), messages);
            }
        }

        if fields.is_empty() { None } else { Some(fields) }
    }
}

/// Classify a non-2xx response body into the error taxonomy.
///
/// 4xx bodies carrying field errors become [`Error::Validation`]; everything
/// else becomes [`Error::Api`] with the raw payload preserved.
pub fn classify_error_response(status: u16, body: &[u8]) -> Error {
    let payload: serde_json::Value = serde_json::from_slice(body).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(body).into_owned())
    });

    let envelope: ErrorEnvelope = serde_json::from_value(payload.clone()).unwrap_or_default();
    let message = envelope.message();

    if (400..500).contains(&status) && status != 401 {
        if let Some(fields) = envelope.field_errors() {
            return Error::Validation(ValidationError {
                status,
                message,
                fields,
            });
        }
    }

    Error::Api(ApiError {
        status,
        message,
        payload,
    })
}
