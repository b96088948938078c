//! HTTP transport abstraction.
//!
//! Every Portainer call is expressed as an [`ApiRequest`] (method, URL,
//! optional bearer token, optional JSON body) and comes back as an
//! [`ApiResponse`] (status plus parsed JSON body). Non-2xx statuses are NOT
//! errors at this layer; classification happens in the session and service
//! layers, which need to see 401s to recover from them.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Errors raised by a transport implementation. These are failures to carry
/// the request at all; an HTTP error status is a normal [`ApiResponse`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response body was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP method subset used against Portainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A single request to the Portainer API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            bearer: None,
            body: None,
        }
    }

    pub fn post(url: Url) -> Self {
        Self {
            method: Method::Post,
            url,
            bearer: None,
            body: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response from the Portainer API.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Best-effort error message from a Portainer error body.
    pub fn error_message(&self) -> String {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.body.to_string())
    }
}

/// The HTTP capability the session and service layers are built on.
/// Supplied at construction time; defaults to [`ReqwestTransport`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Default transport over a shared [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        debug!(method = ?request.method, url = %request.url, "executing Portainer request");

        let mut builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        // Start/stop replies can be empty; treat that as a null JSON body.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        debug!(status, "Portainer request completed");
        Ok(ApiResponse { status, body })
    }
}
