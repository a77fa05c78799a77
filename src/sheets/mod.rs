//! Tabular data adapter over the hospital spreadsheet.

pub mod adapter;
pub mod gviz;
pub mod http;
pub mod normalize;
pub mod tenant;
pub mod transport;

pub use adapter::*;
pub use http::{HttpClient, MockHttpClient, ReqwestClient};
pub use tenant::TenantScope;
pub use transport::Transport;
