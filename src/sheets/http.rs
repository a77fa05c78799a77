//! HTTP seam for the adapter.
//!
//! The adapter only needs "send one request, get status + body back", so
//! the trait is that and nothing more. `ReqwestClient` talks to the network;
//! `MockHttpClient` replays scripted responses and records what was sent.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::SheetError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Plain text keeps browser callers of the same proxy out of CORS preflight.
pub const CONTENT_TYPE_PROXY: &str = "text/plain;charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            content_type: None,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, content_type: &'static str, body: String) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            content_type: Some(content_type),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure: nothing came back.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct NetworkError(pub String);

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Real client. No timeout is set; reqwest's defaults apply.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, SheetError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SheetError::Network {
                context: "HTTP client setup",
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                NetworkError(format!("connection failed: {e}"))
            } else if e.is_timeout() {
                NetworkError(format!("request timed out: {e}"))
            } else {
                NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError(format!("failed to read body: {e}")))?;
        Ok(HttpResponse { status, body })
    }
}

struct Route {
    method: Method,
    url_contains: String,
    reply: Result<HttpResponse, NetworkError>,
}

/// Scripted client for tests. Routes match on method and URL substring;
/// the first registered match wins.
#[derive(Default)]
pub struct MockHttpClient {
    routes: Vec<Route>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: Method, url_contains: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method,
            url_contains: url_contains.to_string(),
            reply: Ok(HttpResponse::new(status, body)),
        });
        self
    }

    pub fn fail(mut self, method: Method, url_contains: &str, message: &str) -> Self {
        self.routes.push(Route {
            method,
            url_contains: url_contains.to_string(),
            reply: Err(NetworkError(message.to_string())),
        });
        self
    }

    /// Everything sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let reply = self
            .routes
            .iter()
            .find(|r| r.method == request.method && request.url.contains(&r.url_contains))
            .map(|r| r.reply.clone())
            .unwrap_or_else(|| Err(NetworkError(format!("no route for {}", request.url))));
        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }
        reply
    }
}
