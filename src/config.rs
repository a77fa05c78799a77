//! Adapter configuration.
//!
//! Every value is optional. Strings are trimmed on the way in and an empty
//! string is the same as an absent one.

use crate::sheets::transport::Transport;

/// Application-level constants
pub const APP_NAME: &str = "Hind Svaasth Seva";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production spreadsheet backing the direct transport.
pub const DEFAULT_SHEET_ID: &str = "1U4MmRMxxKbvCxiOZKkAKOEE0rIlu28fbvmVg_xkH6QQ";

pub const ENV_PROXY_URL: &str = "HINDSEVA_PROXY_URL";
pub const ENV_PROXY_API_KEY: &str = "HINDSEVA_PROXY_API_KEY";
pub const ENV_WEBHOOK_URL: &str = "HINDSEVA_WEBHOOK_URL";
pub const ENV_SHEET_ID: &str = "HINDSEVA_SHEET_ID";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,hindseva_lib=debug"
}

/// Explicit configuration handed to [`SheetAdapter`](crate::sheets::SheetAdapter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Proxy base URL. When set, every read and write goes through it.
    pub proxy_url: Option<String>,
    /// Appended as `api_key` to every proxy call.
    pub proxy_api_key: Option<String>,
    /// Appointment-only write fallback used when no proxy is configured.
    pub webhook_url: Option<String>,
    /// Spreadsheet id for the direct transport. `None` means the default.
    pub sheet_id: Option<String>,
}

impl AdapterConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            proxy_url: clean(lookup(ENV_PROXY_URL)),
            proxy_api_key: clean(lookup(ENV_PROXY_API_KEY)),
            webhook_url: clean(lookup(ENV_WEBHOOK_URL)),
            sheet_id: clean(lookup(ENV_SHEET_ID)),
        }
    }

    pub fn with_proxy(mut self, url: &str) -> Self {
        self.proxy_url = clean(Some(url.to_string()));
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.proxy_api_key = clean(Some(key.to_string()));
        self
    }

    pub fn with_webhook(mut self, url: &str) -> Self {
        self.webhook_url = clean(Some(url.to_string()));
        self
    }

    pub fn with_sheet_id(mut self, id: &str) -> Self {
        self.sheet_id = clean(Some(id.to_string()));
        self
    }

    pub fn sheet_id(&self) -> &str {
        self.sheet_id.as_deref().unwrap_or(DEFAULT_SHEET_ID)
    }

    pub fn is_proxy_configured(&self) -> bool {
        self.proxy_url.is_some()
    }

    /// Select the transport for one call. Pure function of the config.
    pub fn transport(&self) -> Transport {
        match &self.proxy_url {
            Some(base_url) => Transport::Proxy {
                base_url: base_url.clone(),
                api_key: self.proxy_api_key.clone(),
            },
            None => Transport::Direct {
                sheet_id: self.sheet_id().to_string(),
            },
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
