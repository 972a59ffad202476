/*!
 * rununiproc Library
 * Launch one child process confined to a single logical CPU
 */

pub mod core;
pub mod launcher;
pub mod monitoring;
pub mod platform;

// Re-exports
pub use crate::core::{LaunchError, LaunchResult};
pub use launcher::{launch, run_with, LaunchConfig, LaunchOutcome, Platform, ResolutionMode};
pub use monitoring::init_tracing;
pub use platform::run_native;

#[cfg(windows)]
pub use platform::WindowsPlatform;
