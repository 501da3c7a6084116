use std::sync::Arc;

use rv_directory::provider::DirectoryProvider;
use rv_domain::config::Config;
use rv_mapping::store::SideMapping;
use rv_reconcile::Reconciler;
use rv_resolver::IdentityResolver;

/// Shared application state passed to all API handlers.
///
/// Clients are constructed once in [`crate::bootstrap`] and injected here;
/// nothing holds module-level state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<dyn DirectoryProvider>,
    pub mapping: SideMapping,
    pub resolver: Arc<IdentityResolver>,
    pub reconciler: Arc<Reconciler>,
    /// SHA-256 of the API bearer token; `None` disables auth (dev mode).
    pub api_token_hash: Option<Vec<u8>>,
    /// SHA-256 of the admin bearer token for migration endpoints.
    pub admin_token_hash: Option<Vec<u8>>,
}
