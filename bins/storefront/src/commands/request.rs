//! Request command - send one request through the pipeline

use crate::app;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use storefront_api_client::{NormalizedError, Outcome, RequestDescriptor};
use storefront_telemetry::Counter;

/// Arguments for a single request
#[derive(Debug, Clone)]
pub struct RequestArgs {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub data: Option<String>,
    pub metrics: bool,
}

impl RequestArgs {
    fn descriptor(&self) -> Result<RequestDescriptor> {
        let method: Method = self
            .method
            .to_ascii_uppercase()
            .parse()
            .with_context(|| format!("Invalid HTTP method '{}'", self.method))?;

        let mut descriptor = RequestDescriptor::new(method, self.path.clone())
            .with_query_pairs(self.query.iter().cloned());
        for (name, value) in &self.headers {
            descriptor = descriptor.with_header(name.clone(), value.clone());
        }
        if let Some(raw) = &self.data {
            let body: Value = serde_json::from_str(raw).context("--data is not valid JSON")?;
            descriptor = descriptor.with_body(body);
        }
        Ok(descriptor)
    }
}

/// Run the request; returns whether it succeeded
pub async fn run(store: Arc<SessionStore>, args: RequestArgs, format: &str) -> Result<bool> {
    let descriptor = args.descriptor()?;
    let client = app::build_client(store)?;

    let (outcome, elapsed) = client.execute_timed(descriptor).await;

    // Let spawned sign-out / redirect tasks finish before the runtime exits
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    let success = outcome.is_success();
    if format == "json" {
        print_json(outcome, elapsed, args.metrics)?;
    } else {
        print_text(outcome, elapsed, args.metrics)?;
    }
    Ok(success)
}

fn print_json(outcome: Outcome<Value>, elapsed: Duration, with_metrics: bool) -> Result<()> {
    let (data, error) = outcome.into_pair();
    let mut output = json!({
        "data": data,
        "error": error.as_ref().map(NormalizedError::to_value),
        "elapsed_ms": elapsed.as_millis(),
    });
    if with_metrics {
        output["metrics"] = serde_json::to_value(storefront_telemetry::pipeline().snapshot())?;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(outcome: Outcome<Value>, elapsed: Duration, with_metrics: bool) -> Result<()> {
    match outcome {
        Outcome::Success(data) => {
            eprintln!("{} in {}ms", "✓ Success".green().bold(), elapsed.as_millis());
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Outcome::Failure(error) => {
            eprintln!("{} {error}", "✗ Failed:".red().bold());
            println!("{}", serde_json::to_string_pretty(&error.to_value())?);
        }
    }

    if with_metrics {
        let metrics = storefront_telemetry::pipeline();
        eprintln!();
        eprintln!("{}", "Metrics".blue().bold());
        for counter in Counter::ALL {
            eprintln!("  {:<18} {}", counter.name(), metrics.get(counter));
        }
        let durations = metrics.durations();
        eprintln!(
            "  {:<18} {:.1}ms (p95 {:.1}ms)",
            "request.duration", durations.mean, durations.p95
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(method: &str) -> RequestArgs {
        RequestArgs {
            method: method.to_string(),
            path: "orders".to_string(),
            query: vec![("page".to_string(), "2".to_string())],
            headers: vec![("Accept-Language".to_string(), "tr".to_string())],
            data: None,
            metrics: false,
        }
    }

    #[test]
    fn test_descriptor_from_args() {
        let mut request = args("post");
        request.data = Some(r#"{"paymentType":"COD"}"#.to_string());

        let descriptor = request.descriptor().unwrap();
        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.path, "orders");
        assert_eq!(descriptor.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(descriptor.headers.len(), 1);
        assert_eq!(descriptor.body, Some(json!({"paymentType": "COD"})));
    }

    #[test]
    fn test_invalid_method_and_body() {
        assert!(args("not a method").descriptor().is_err());

        let mut request = args("put");
        request.data = Some("{broken".to_string());
        assert!(request.descriptor().is_err());
    }
}
