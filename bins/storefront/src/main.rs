//! Storefront CLI - run storefront API requests from a shell
//!
//! Hosts the request pipeline outside a browser: the CLI owns the session
//! token, signs out on 401 and prints a re-authentication hint on 403.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_telemetry::TelemetryConfig;

mod app;
mod commands;
mod session;

use commands::{config, login, request};

/// Storefront API command-line client
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    /// Session file (defaults to the user config directory)
    #[arg(long, global = true, env = "STOREFRONT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request through the pipeline and print the normalized result
    Request {
        /// HTTP method (get, post, put, patch, delete)
        method: String,

        /// Path relative to STOREFRONT_API_URL
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,

        /// Header as name:value (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,

        /// Print request metrics afterwards
        #[arg(long)]
        metrics: bool,
    },

    /// Show the resolved client configuration
    Config,

    /// Store an access token for later requests
    Login {
        /// Bearer token issued by the storefront
        #[arg(long, env = "STOREFRONT_LOGIN_TOKEN")]
        token: String,
    },

    /// Remove the stored session
    Logout,
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name:value, got '{raw}'"))
}

// Side effects are spawned onto this runtime, so it stays single-threaded and
// the request command yields to them before exiting.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose(&["storefront_api_client", "storefront"])
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = storefront_telemetry::init(&telemetry) {
        eprintln!("{} {e}", "Warning:".yellow().bold());
    }

    let result = match app::session_store(cli.session_file) {
        Ok(store) => match cli.command {
            Commands::Request {
                method,
                path,
                query,
                headers,
                data,
                metrics,
            } => {
                let args = request::RequestArgs {
                    method,
                    path,
                    query,
                    headers,
                    data,
                    metrics,
                };
                request::run(store, args, &cli.format).await
            }
            Commands::Config => config::run(&store, &cli.format).map(|()| true),
            Commands::Login { token } => login::login(&store, &token, &cli.format).map(|()| true),
            Commands::Logout => login::logout(store, &cli.format).await.map(|()| true),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
