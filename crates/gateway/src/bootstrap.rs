//! Construction of the shared clients and [`AppState`].
//!
//! Each builder reads its secrets from the environment variables named in
//! config and fails fast on misconfiguration. CLI one-shot commands use the
//! partial builders so, for example, `resolve` does not require datastore
//! credentials.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use rv_directory::provider::DirectoryProvider;
use rv_directory::rest::RestDirectoryClient;
use rv_domain::config::{Config, MappingBackend};
use rv_mapping::memory::MemoryMappingStore;
use rv_mapping::redis_store::RedisMappingStore;
use rv_mapping::store::{MappingStore, SideMapping};
use rv_reconcile::datastore::{OwnershipStore, RestOwnershipStore};
use rv_reconcile::Reconciler;
use rv_resolver::{IdentityResolver, ReRegistrationDetector};

use crate::state::AppState;

pub fn build_directory(config: &Config) -> anyhow::Result<Arc<dyn DirectoryProvider>> {
    Ok(Arc::new(RestDirectoryClient::new(&config.directory)?))
}

pub async fn build_mapping(config: &Config) -> anyhow::Result<SideMapping> {
    let store: Arc<dyn MappingStore> = match config.mapping_store.backend {
        MappingBackend::Redis => {
            info!(url = %config.mapping_store.redis_url, "connecting to side-mapping store");
            Arc::new(RedisMappingStore::connect(&config.mapping_store).await?)
        }
        MappingBackend::Memory => {
            warn!("side-mapping store running in memory — entries do not survive restarts");
            Arc::new(MemoryMappingStore::new())
        }
    };
    Ok(SideMapping::new(store, &config.mapping_store))
}

pub fn build_datastore(config: &Config) -> anyhow::Result<Arc<dyn OwnershipStore>> {
    Ok(Arc::new(RestOwnershipStore::new(&config.datastore)?))
}

pub async fn build_reconciler(config: &Config) -> anyhow::Result<Reconciler> {
    let mapping = build_mapping(config).await?;
    let datastore = build_datastore(config)?;
    Ok(Reconciler::new(mapping, datastore))
}

/// Build the full state for the `serve` path.
pub async fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let directory = build_directory(&config)?;
    let mapping = build_mapping(&config).await?;
    let datastore = build_datastore(&config)?;

    let detector = ReRegistrationDetector::new(
        directory.clone(),
        mapping.clone(),
        config.directory.email_page_size,
    );
    let resolver = Arc::new(
        IdentityResolver::new(directory.clone(), mapping.clone()).with_detector(detector),
    );
    let reconciler = Arc::new(Reconciler::new(mapping.clone(), datastore));

    let api_token_hash = token_hash(&config.server.api_token_env);
    let admin_token_hash = token_hash(&config.server.admin_token_env);

    Ok(AppState {
        config,
        directory,
        mapping,
        resolver,
        reconciler,
        api_token_hash,
        admin_token_hash,
    })
}

/// SHA-256 of the bearer token named by `env_name`, or `None` when unset.
fn token_hash(env_name: &str) -> Option<Vec<u8>> {
    match std::env::var(env_name) {
        Ok(token) if !token.is_empty() => Some(Sha256::digest(token.as_bytes()).to_vec()),
        _ => {
            warn!(env = %env_name, "bearer token not set — matching endpoints are unauthenticated");
            None
        }
    }
}
