//! Login and logout commands

use crate::session::SessionStore;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;
use storefront_api_client::SessionHandle;

/// Store a bearer token for subsequent requests
pub fn login(store: &SessionStore, token: &str, format: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        bail!("Token cannot be empty");
    }
    let session = store.save(token)?;

    if format == "json" {
        let output = json!({
            "loggedIn": true,
            "createdAt": session.created_at.to_rfc3339(),
            "sessionFile": store.path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} session stored in {}",
            "✓ Logged in:".green().bold(),
            store.path().display()
        );
    }
    Ok(())
}

/// Sign out through the same capability the pipeline uses on 401
pub async fn logout(store: Arc<SessionStore>, format: &str) -> Result<()> {
    let had_session = store.load().ok().flatten().is_some();
    store.sign_out().await?;

    if format == "json" {
        println!("{}", json!({ "loggedOut": had_session }));
    } else if had_session {
        println!("{}", "✓ Logged out".green().bold());
    } else {
        println!("{}", "No stored session".dimmed());
    }
    Ok(())
}
