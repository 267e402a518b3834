//! Wiring between the CLI and the request pipeline

use crate::session::{SessionStore, ShellRedirector};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use storefront_api_client::{ClientConfig, StorefrontClient};

/// Open the session store at `path`, or at the default location
pub fn session_store(path: Option<PathBuf>) -> Result<Arc<SessionStore>> {
    let path = match path {
        Some(path) => path,
        None => SessionStore::default_path()
            .context("No config directory available; pass --session-file")?,
    };
    Ok(Arc::new(SessionStore::new(path)))
}

/// Resolve configuration, preferring an explicit token over the stored one
pub fn load_config(store: &SessionStore) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
    if config.access_token.is_none() {
        if let Some(session) = store.load()? {
            config = config.with_access_token(session.access_token);
        }
    }
    Ok(config)
}

/// Build a client whose 401/403 side effects act on the session store
pub fn build_client(store: Arc<SessionStore>) -> Result<StorefrontClient> {
    let config = load_config(&store)?;
    let client = StorefrontClient::builder(config)
        .session(store)
        .redirector(Arc::new(ShellRedirector))
        .build()
        .context("Failed to create storefront client")?;
    Ok(client)
}
