use thiserror::Error;

/// Coarse failure class, one per kind of remedy a caller can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Transport,
    Parse,
    Upstream,
}

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("hospital_id not found for this account.")]
    MissingHospitalId,

    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unable to reach Google Sheets. Configure the proxy URL for private-sheet access.")]
    SheetUnreachable,

    #[error("Google Sheet is private (status {status}). Configure the proxy and set its URL.")]
    SheetPrivate { status: u16 },

    #[error("{context} failed: {status}")]
    HttpStatus { context: &'static str, status: u16 },

    #[error("{context} failed: {message}")]
    Network {
        context: &'static str,
        message: String,
    },

    #[error("Unable to parse sheet response: {0}")]
    Parse(String),

    #[error("Proxy error: {0}")]
    Upstream(String),
}

impl SheetError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingHospitalId | Self::InvalidUrl { .. } => ErrorClass::Configuration,
            Self::SheetUnreachable
            | Self::SheetPrivate { .. }
            | Self::HttpStatus { .. }
            | Self::Network { .. } => ErrorClass::Transport,
            Self::Parse(_) => ErrorClass::Parse,
            Self::Upstream(_) => ErrorClass::Upstream,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SheetPrivate { status } | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(err: serde_json::Error) -> Self {
        SheetError::Parse(err.to_string())
    }
}
