/*!
 * Monitoring
 * Structured diagnostics for the launcher
 */

mod tracer;

pub use tracer::{init_tracing, init_with, subscriber, TracingConfig, DEFAULT_FILTER};
