//! Responses and their classification.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use courseware_core::Result;
use courseware_core::error::{Error, ProtocolError, classify_error_response};
use courseware_core::models::Envelope;

/// Status and body as read off the wire, before classification.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// 2xx becomes an [`ApiResponse`]; anything else goes through the error
    /// taxonomy.
    pub fn into_result(self) -> Result<ApiResponse> {
        if self.status.is_success() {
            Ok(ApiResponse {
                status: self.status,
                body: self.body,
            })
        } else {
            Err(classify_error_response(self.status.as_u16(), &self.body))
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Decode the body; a mismatch is a [`ProtocolError`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::Protocol(ProtocolError::new(
                Some(self.status()),
                format!("unexpected response body: {}", e),
            ))
        })
    }

    /// Decode `{ success, message, data }` and return `data`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        self.json::<Envelope<T>>().map(|envelope| envelope.data)
    }

    /// The body as a JSON value; an empty body reads as `null`.
    pub fn value(&self) -> Result<serde_json::Value> {
        if self.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            self.json()
        }
    }

    /// The `message` of an envelope, if the body has one.
    pub fn message(&self) -> Option<String> {
        self.value()
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}
