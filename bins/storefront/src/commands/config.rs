//! Config command - show the resolved client configuration

use crate::app;
use crate::session::SessionStore;
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;

/// Print the configuration the pipeline would run with
pub fn run(store: &SessionStore, format: &str) -> Result<()> {
    let config = app::load_config(store)?;
    let base_url = config.base_url()?;
    let reauth_url = config.reauth_url()?;
    let token = if config.access_token.is_some() {
        "set"
    } else {
        "not set"
    };

    if format == "json" {
        let output = json!({
            "config": config,
            "baseUrl": base_url.as_str(),
            "reauthUrl": reauth_url.as_str(),
            "accessToken": token,
            "sessionFile": store.path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Storefront client configuration".blue().bold());
    println!("  API URL:       {}", base_url.as_str().cyan());
    println!("  Re-auth URL:   {}", reauth_url.as_str().cyan());
    println!("  Environment:   {:?}", config.environment);
    println!("  Response type: {}", config.response_type.accept());
    println!("  Timeout:       {}s", config.timeout.as_secs());
    println!(
        "  Access token:  {}",
        if config.access_token.is_some() {
            token.green().to_string()
        } else {
            token.yellow().to_string()
        }
    );
    println!("  Session file:  {}", store.path().display());
    Ok(())
}
