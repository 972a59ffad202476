/*!
 * Core Module
 * Error handling and RAII guards shared by the launcher and platform layers
 */

pub mod errors;
pub mod guard;

// Re-export for convenience
pub use errors::*;
pub use guard::{Guard, GuardDrop, GuardError, GuardMetadata, GuardResult, ResourceGuard};
