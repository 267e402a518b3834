//! Logging and request metrics for the storefront client
//!
//! Logging goes through `tracing` with either a compact or a JSON formatter on
//! stderr. Metrics are a fixed set of pipeline counters plus a request
//! duration series, kept in one process-wide [`PipelineMetrics`].

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static PIPELINE: Lazy<PipelineMetrics> = Lazy::new(PipelineMetrics::new);

static RUN_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            format: LogFormat::Compact,
            with_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Debug-level logging for the given crates, everything else at warn
    #[must_use]
    pub fn verbose(crates: &[&str]) -> Self {
        let filter = std::iter::once("warn".to_string())
            .chain(crates.iter().map(|krate| format!("{krate}=debug")))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            filter,
            with_target: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };

    let stderr = fmt::layer()
        .with_target(config.with_target)
        .with_writer(std::io::stderr);
    let installed = match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(stderr.compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(stderr.json())
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("tracing subscriber already set: {e}"))?;

    tracing::debug!(run_id = %run_id(), "Logging ready");
    Ok(())
}

/// Identifier shared by every log line and metrics snapshot of this process
pub fn run_id() -> &'static str {
    &RUN_ID
}

const COUNTER_SLOTS: usize = 5;

/// Pipeline events that are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    RequestsTotal,
    RequestsSuccess,
    RequestsFailure,
    SignOut,
    Redirect,
}

impl Counter {
    pub const ALL: [Counter; COUNTER_SLOTS] = [
        Counter::RequestsTotal,
        Counter::RequestsSuccess,
        Counter::RequestsFailure,
        Counter::SignOut,
        Counter::Redirect,
    ];

    /// Exported metric name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Counter::RequestsTotal => "requests.total",
            Counter::RequestsSuccess => "requests.success",
            Counter::RequestsFailure => "requests.failure",
            Counter::SignOut => "session.sign_out",
            Counter::Redirect => "session.redirect",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Counters and request durations for the request pipeline
pub struct PipelineMetrics {
    counts: [AtomicU64; COUNTER_SLOTS],
    durations_ms: Mutex<Vec<f64>>,
    created: Instant,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: Default::default(),
            durations_ms: Mutex::new(Vec::new()),
            created: Instant::now(),
        }
    }

    pub fn incr(&self, counter: Counter) {
        self.counts[counter.slot()].fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.counts[counter.slot()].load(Ordering::Relaxed)
    }

    /// Add one request duration to the series
    pub fn record_duration(&self, elapsed: Duration) {
        self.durations_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(elapsed.as_secs_f64() * 1000.0);
    }

    #[must_use]
    pub fn durations(&self) -> DurationSummary {
        let series = self.durations_ms.lock().unwrap_or_else(PoisonError::into_inner);
        DurationSummary::of(&series)
    }

    /// Point-in-time copy of every metric
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            run_id: run_id().to_string(),
            captured_at: Utc::now(),
            uptime_secs: self.created.elapsed().as_secs(),
            counters: Counter::ALL
                .iter()
                .map(|&counter| (counter.name(), self.get(counter)))
                .collect(),
            request_duration_ms: self.durations(),
        }
    }
}

/// Serializable view of [`PipelineMetrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub run_id: String,
    pub captured_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub counters: BTreeMap<&'static str, u64>,
    pub request_duration_ms: DurationSummary,
}

/// Nearest-rank summary of a duration series, in milliseconds
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct DurationSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl DurationSummary {
    #[allow(clippy::cast_precision_loss)]
    fn of(series: &[f64]) -> Self {
        if series.is_empty() {
            return Self::default();
        }
        let mut ordered = series.to_vec();
        ordered.sort_by(f64::total_cmp);

        let n = ordered.len();
        Self {
            count: n,
            min: ordered[0],
            max: ordered[n - 1],
            mean: ordered.iter().sum::<f64>() / n as f64,
            p50: nearest_rank(&ordered, 0.50),
            p95: nearest_rank(&ordered, 0.95),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn nearest_rank(ordered: &[f64], quantile: f64) -> f64 {
    let rank = (quantile * ordered.len() as f64).ceil() as usize;
    ordered[rank.clamp(1, ordered.len()) - 1]
}

/// The process-wide pipeline metrics
pub fn pipeline() -> &'static PipelineMetrics {
    &PIPELINE
}

/// Measures one request into [`pipeline`]'s duration series
///
/// Records when finished, or when dropped unfinished.
pub struct RequestTimer {
    started: Option<Instant>,
}

impl RequestTimer {
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Some(Instant::now()),
        }
    }

    pub fn finish(mut self) -> Duration {
        self.take().unwrap_or_default()
    }

    fn take(&mut self) -> Option<Duration> {
        let elapsed = self.started.take()?.elapsed();
        pipeline().record_duration(elapsed);
        Some(elapsed)
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        self.take();
    }
}
