//! Client core for the Haven vault: per-screen view-models over an
//! authenticated backend API, plus the settings and logging plumbing shared
//! by every frontend.

mod async_util;
pub mod crypto;
pub mod logging;
pub mod phrase;
pub mod settings;
pub mod vm;

use std::sync::Arc;

use haven_backend::VaultApi;
use haven_http::HttpVaultApi;
use haven_platform::AppPaths;

pub use settings::ClientSettings;

/// Load persisted settings and bring up logging.
#[must_use]
pub fn init() -> ClientSettings {
    let settings = AppPaths::new()
        .map(|paths| settings::load(&paths))
        .unwrap_or_default();
    logging::init_logging(settings.debug_logging, settings.max_log_size_bytes);
    settings
}

/// Build the production API client for the configured server.
#[must_use]
pub fn connect(settings: &ClientSettings) -> Arc<dyn VaultApi> {
    Arc::new(HttpVaultApi::new(settings.api_base_url.clone()))
}
