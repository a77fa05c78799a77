//! Transport selection and the raw read/write calls behind it.
//!
//! `Direct` reads the public spreadsheet export and cannot write.
//! `Proxy` routes reads and writes through one intermediary endpoint.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::gviz;
use super::http::{HttpClient, HttpRequest, CONTENT_TYPE_JSON, CONTENT_TYPE_PROXY};
use super::normalize::{normalize_row, Row};
use crate::error::SheetError;
use crate::models::Dataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Direct {
        sheet_id: String,
    },
    Proxy {
        base_url: String,
        api_key: Option<String>,
    },
}

impl Transport {
    pub fn is_proxy(&self) -> bool {
        matches!(self, Self::Proxy { .. })
    }

    /// Fetch every row of `dataset`, normalized. The proxy is asked to
    /// filter by hospital; the direct export always returns the full tab.
    pub async fn fetch_rows<H: HttpClient + ?Sized>(
        &self,
        http: &H,
        dataset: Dataset,
        hospital_id: Option<&str>,
    ) -> Result<Vec<Row>, SheetError> {
        match self {
            Self::Direct { sheet_id } => fetch_direct(http, sheet_id, dataset).await,
            Self::Proxy { base_url, api_key } => {
                fetch_proxy(http, base_url, api_key.as_deref(), dataset, hospital_id).await
            }
        }
    }
}

/// Public export URL for one sheet tab.
pub fn direct_url(sheet_id: &str, dataset: Dataset) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{sheet_id}/gviz/tq?gid={}&tqx=out:json",
        dataset.gid()
    )
}

/// `{base}?dataset=..&hospital_id=..&api_key=..`, omitting absent values.
/// Keys already on the base URL are replaced, other query pairs are kept.
pub fn proxy_read_url(
    base_url: &str,
    api_key: Option<&str>,
    dataset: Dataset,
    hospital_id: Option<&str>,
) -> Result<Url, SheetError> {
    let mut url = parse_url(base_url)?;
    let mut params = vec![("dataset", dataset.name())];
    if let Some(id) = hospital_id.filter(|id| !id.is_empty()) {
        params.push(("hospital_id", id));
    }
    if let Some(key) = api_key {
        params.push(("api_key", key));
    }
    set_query(&mut url, &params);
    Ok(url)
}

pub fn proxy_write_url(base_url: &str, api_key: Option<&str>) -> Result<Url, SheetError> {
    let mut url = parse_url(base_url)?;
    if let Some(key) = api_key {
        set_query(&mut url, &[("api_key", key)]);
    }
    Ok(url)
}

fn set_query(url: &mut Url, params: &[(&str, &str)]) {
    if params.is_empty() {
        return;
    }
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !params.iter().any(|(p, _)| &**k == *p))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut query = url.query_pairs_mut();
    query.clear();
    query.extend_pairs(kept);
    query.extend_pairs(params);
}

fn parse_url(raw: &str) -> Result<Url, SheetError> {
    Url::parse(raw).map_err(|e| SheetError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// URL with the `api_key` value masked, for logs.
pub fn redacted(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "api_key") {
        return url.to_string();
    }
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

async fn fetch_direct<H: HttpClient + ?Sized>(
    http: &H,
    sheet_id: &str,
    dataset: Dataset,
) -> Result<Vec<Row>, SheetError> {
    let url = direct_url(sheet_id, dataset);
    tracing::debug!(dataset = %dataset, url = %url, "Direct sheet read");

    let response = http.send(HttpRequest::get(url)).await.map_err(|e| {
        tracing::debug!(dataset = %dataset, error = %e, "Sheet unreachable");
        SheetError::SheetUnreachable
    })?;

    match response.status {
        401 | 403 => return Err(SheetError::SheetPrivate { status: response.status }),
        _ if !response.is_success() => {
            return Err(SheetError::HttpStatus {
                context: "Sheet fetch",
                status: response.status,
            })
        }
        _ => {}
    }

    gviz::parse_rows(&response.body)
}

#[derive(Debug, Default, Deserialize)]
struct ProxyReadResponse {
    #[serde(default)]
    rows: Value,
    #[serde(default)]
    error: Value,
}

async fn fetch_proxy<H: HttpClient + ?Sized>(
    http: &H,
    base_url: &str,
    api_key: Option<&str>,
    dataset: Dataset,
    hospital_id: Option<&str>,
) -> Result<Vec<Row>, SheetError> {
    let url = proxy_read_url(base_url, api_key, dataset, hospital_id)?;
    tracing::debug!(dataset = %dataset, url = %redacted(&url), "Proxy read");

    let response = http
        .send(HttpRequest::get(url.as_str()))
        .await
        .map_err(|e| SheetError::Network {
            context: "Proxy fetch",
            message: e.0,
        })?;

    if !response.is_success() {
        return Err(SheetError::HttpStatus {
            context: "Proxy fetch",
            status: response.status,
        });
    }

    let parsed: ProxyReadResponse = serde_json::from_str(&response.body)?;
    if let Some(message) = upstream_error(&parsed.error) {
        return Err(SheetError::Upstream(message));
    }

    let rows = match &parsed.rows {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .map(normalize_row)
            .collect(),
        _ => Vec::new(),
    };
    Ok(rows)
}

/// POST a write action to the proxy. Returns the parsed response body,
/// or `Value::Null` when the body is not JSON.
pub async fn post_proxy<H, P>(
    http: &H,
    base_url: &str,
    api_key: Option<&str>,
    payload: &P,
) -> Result<Value, SheetError>
where
    H: HttpClient + ?Sized,
    P: Serialize,
{
    let url = proxy_write_url(base_url, api_key)?;
    let body = serde_json::to_string(payload)?;
    tracing::debug!(url = %redacted(&url), "Proxy write");

    let response = http
        .send(HttpRequest::post(url.as_str(), CONTENT_TYPE_PROXY, body))
        .await
        .map_err(|e| SheetError::Network {
            context: "Proxy write",
            message: e.0,
        })?;

    if !response.is_success() {
        return Err(SheetError::HttpStatus {
            context: "Proxy write",
            status: response.status,
        });
    }

    let parsed: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
    if let Some(message) = parsed.get("error").and_then(upstream_error) {
        return Err(SheetError::Upstream(message));
    }
    Ok(parsed)
}

/// POST a JSON payload to the appointment webhook.
pub async fn post_webhook<H, P>(http: &H, webhook_url: &str, payload: &P) -> Result<(), SheetError>
where
    H: HttpClient + ?Sized,
    P: Serialize,
{
    let url = parse_url(webhook_url)?;
    let body = serde_json::to_string(payload)?;
    tracing::debug!(url = %url, "Webhook write");

    let response = http
        .send(HttpRequest::post(url.as_str(), CONTENT_TYPE_JSON, body))
        .await
        .map_err(|e| SheetError::Network {
            context: "Webhook write",
            message: e.0,
        })?;

    if !response.is_success() {
        return Err(SheetError::HttpStatus {
            context: "Webhook write",
            status: response.status,
        });
    }
    Ok(())
}

/// An `error` field counts when it is truthy: anything but null, false,
/// zero or the empty string.
fn upstream_error(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
