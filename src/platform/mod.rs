/*!
 * Platform Module
 * OS bindings for the launcher; only Windows provides job objects
 */

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use self::windows::WindowsPlatform;

use std::ffi::OsString;

use crate::launcher::ResolutionMode;

/// Run the launcher against the host OS and return its exit code
#[cfg(windows)]
pub fn run_native(mode: ResolutionMode, args: &[OsString]) -> i32 {
    let platform = WindowsPlatform::new();
    crate::launcher::run_with(&platform, &crate::launcher::LaunchConfig::new(mode), args)
}

/// Run the launcher against the host OS and return its exit code
#[cfg(not(windows))]
pub fn run_native(_mode: ResolutionMode, _args: &[OsString]) -> i32 {
    tracing::error!("Job objects are not available on this platform");
    eprintln!("rununiproc requires Windows job objects; this platform is not supported.");
    crate::core::LAUNCH_FAILURE_EXIT_CODE
}
