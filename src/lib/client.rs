use anyhow::Result;
use derive_more::*;
use reqwest::{Method, StatusCode};

use crate::api::{ApiError, Request};

/// This is a wrapper around an OAuth access token. VK tokens are sent as a
/// query parameter, Yandex Disk tokens in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, From, Into, FromStr, Display)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status and raw body of a completed HTTP exchange. Callers decide which
/// statuses count as success.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turns this response into an [`ApiError::Status`] for `service`.
    pub fn into_error(self, service: &'static str) -> ApiError {
        ApiError::Status {
            service,
            status: self.status.as_u16(),
            body: self.body,
        }
    }
}

/// This is a thin shim around the HTTP client. Every request is relative to
/// `base_url` and carries its parameters in the query string.
#[derive(Debug, Clone)]
pub struct Client {
    /// This base URL is prepended to every request path.
    base_url: String,

    /// Value for the `Authorization` header, if the service wants one.
    authorization: Option<String>,

    /// The underlying HTTP client.
    client: reqwest::Client,
}

impl Client {
    /// Returns a new client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
            client: reqwest::Client::new(),
        }
    }

    /// Sends `value` as the `Authorization` header on every request.
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send `method` to `path` with `req` encoded as query parameters.
    pub async fn send<Req>(&self, method: Method, path: &str, req: &Req) -> Result<Response>
    where
        Req: Request,
    {
        // Query strings may hold credentials, so only the route is logged.
        debug!("{} /{}", method, path);
        let mut builder = self.client.request(method.clone(), self.url(path)).query(req);
        if let Some(ref authorization) = self.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::Transport)?;
        debug!("Response {} /{}: {}", method, path, status);

        Ok(Response { status, body })
    }

    pub async fn get<Req: Request>(&self, path: &str, req: &Req) -> Result<Response> {
        self.send(Method::GET, path, req).await
    }

    pub async fn put<Req: Request>(&self, path: &str, req: &Req) -> Result<Response> {
        self.send(Method::PUT, path, req).await
    }

    pub async fn post<Req: Request>(&self, path: &str, req: &Req) -> Result<Response> {
        self.send(Method::POST, path, req).await
    }
}
