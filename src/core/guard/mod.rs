/*!
 * RAII Resource Guards
 *
 * Owned OS resources with automatic, exactly-once release.
 *
 * ## Design Principles
 *
 * 1. **Single owner**: each guard owns one resource and its release function
 * 2. **Every exit path**: release runs on drop, so early returns need no cleanup code
 * 3. **Never panics**: release failures during drop are logged
 *
 * ## Example
 *
 * ```rust
 * use rununiproc::core::guard::{Guard, ResourceGuard};
 *
 * let guard = ResourceGuard::new("buffer", vec![0u8; 16], |buffer: &mut Vec<u8>| {
 *     buffer.clear();
 *     Ok(())
 * });
 * assert!(guard.is_active());
 * // Released on drop
 * ```
 */

mod resource;
mod traits;

pub use resource::ResourceGuard;
pub use traits::{Guard, GuardDrop};

/// Result type for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur during guard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Resource already released")]
    AlreadyReleased,

    #[error("Release failed: {0}")]
    OperationFailed(String),
}

/// Guard metadata for observability
#[derive(Debug, Clone)]
pub struct GuardMetadata {
    pub resource_type: &'static str,
    pub creation_time: std::time::Instant,
}

impl GuardMetadata {
    #[inline]
    pub fn new(resource_type: &'static str) -> Self {
        Self {
            resource_type,
            creation_time: std::time::Instant::now(),
        }
    }

    #[inline]
    pub fn lifetime_micros(&self) -> u64 {
        self.creation_time.elapsed().as_micros() as u64
    }
}
