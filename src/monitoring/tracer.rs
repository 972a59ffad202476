/*!
 * Structured Tracing
 * Diagnostics for the launch sequence using the tracing crate
 *
 * All output goes to stderr so the child's stdout passthrough stays clean.
 * Settings are fixed in code: the launcher consumes no environment variables,
 * everything in its environment is the child's.
 */

use tracing::{debug, Subscriber};
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter directives used by the binaries
pub const DEFAULT_FILTER: &str = "warn";

/// Tracing settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub filter: String,
    pub json: bool,
}

impl TracingConfig {
    pub fn new() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: false,
        }
    }

    /// Replace the filter directives; blank input keeps the default
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        if !filter.trim().is_empty() {
            self.filter = filter.trim().to_string();
        }
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize structured tracing with the launcher's fixed settings
///
/// Warnings and errors reach stderr; nothing is read from the environment.
pub fn init_tracing() {
    init_with(&TracingConfig::default());
}

/// Initialize structured tracing with explicit settings
///
/// Does nothing if a global subscriber is already installed.
pub fn init_with(config: &TracingConfig) {
    if subscriber(config, std::io::stderr).try_init().is_ok() {
        debug!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
}

/// Build the subscriber for `config`, writing through `writer`
pub fn subscriber<W>(config: &TracingConfig, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer.clone())
            .with_target(true)
            .with_current_span(true)
            .with_span_list(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    let compact = (!config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE)
            .compact()
    });

    tracing_subscriber::registry().with(env_filter).with(json).with(compact)
}
