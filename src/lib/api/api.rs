use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request is a trait that all query-parameter requests must implement. Use
/// `#[derive(ApiRequest)]` to implement it.
pub trait Request: Serialize + Send + Sync {}

/// ApiError covers every way a call to a remote service can fail.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("VK error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Missing {0}")]
    MissingParameter(&'static str),
}

impl ApiError {
    /// Returns the HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error object VK sends in place of `response`, usually with HTTP 200.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VkError {
    pub error_code: i64,
    pub error_msg: String,
}

/// This is a wrapper around the VK API envelope. Exactly one of `response`
/// and `error` is expected to be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VkResponse<T> {
    pub response: Option<T>,
    pub error: Option<VkError>,
}

#[allow(clippy::should_implement_trait)]
impl<'de, T: Deserialize<'de>> VkResponse<T> {
    pub fn from_str(data: &'de str) -> Result<Self> {
        let response: VkResponse<T> =
            serde_json::from_str(data).map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(response)
    }
}

impl<T> VkResponse<T> {
    /// Wraps the result in a successful envelope.
    #[allow(non_snake_case)]
    pub fn Ok(result: T) -> Self {
        Self {
            response: Some(result),
            error: None,
        }
    }

    /// Creates an error envelope with the given code and message.
    #[allow(non_snake_case)]
    pub fn Err(code: i64, message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(VkError {
                error_code: code,
                error_msg: message.into(),
            }),
        }
    }

    /// Returns the payload, or the VK error if there is one.
    pub fn into_result(self) -> Result<T> {
        if let Some(error) = self.error {
            return Err(ApiError::Remote {
                code: error.error_code,
                message: error.error_msg,
            }
            .into());
        }

        self.response
            .ok_or_else(|| ApiError::Malformed("missing `response` field".to_string()).into())
    }
}
