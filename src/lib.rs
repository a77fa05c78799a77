pub mod config;
pub mod dashboard; // Portal derivations (beds, blood stock, overview)
pub mod error;
pub mod identity; // Hospital accounts + roles
pub mod models;
pub mod sheets; // Tabular data adapter

pub use config::AdapterConfig;
pub use error::{ErrorClass, SheetError};
pub use sheets::{SheetAdapter, TenantScope, Transport};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. Safe to call more than once.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} data adapter v{}", config::APP_NAME, config::APP_VERSION);
    }
}
