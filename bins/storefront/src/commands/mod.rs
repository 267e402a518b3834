//! CLI commands

pub mod config;
pub mod login;
pub mod request;
