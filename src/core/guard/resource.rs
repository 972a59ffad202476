/*!
 * Resource Guards
 *
 * Generic RAII guard pairing a raw OS resource with its release function
 */

use super::traits::{Guard, GuardDrop};
use super::{GuardError, GuardMetadata, GuardResult};
use std::fmt;
use tracing::{debug, error};

type ReleaseFn<R> = Box<dyn FnOnce(&mut R) -> Result<(), String>>;

/// Owned resource released exactly once
///
/// The release function runs on drop unless [`Guard::release`] already ran
/// it. The resource value itself is dropped after release, so a
/// buffer backing an OS structure outlives the OS-side teardown.
///
/// # Example
///
/// ```rust
/// use rununiproc::core::guard::ResourceGuard;
///
/// let guard = ResourceGuard::new("handle", 42usize, |_handle: &mut usize| Ok(()));
/// assert_eq!(*guard.get(), 42);
/// ```
pub struct ResourceGuard<R> {
    resource: R,
    release_fn: Option<ReleaseFn<R>>,
    metadata: GuardMetadata,
}

impl<R> ResourceGuard<R> {
    /// Take ownership of `resource`
    pub fn new<F>(resource_type: &'static str, resource: R, release_fn: F) -> Self
    where
        F: FnOnce(&mut R) -> Result<(), String> + 'static,
    {
        Self {
            resource,
            release_fn: Some(Box::new(release_fn)),
            metadata: GuardMetadata::new(resource_type),
        }
    }

    /// Borrow the guarded resource
    #[inline]
    pub fn get(&self) -> &R {
        &self.resource
    }

    /// Mutably borrow the guarded resource
    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

impl<R> Guard for ResourceGuard<R> {
    fn resource_type(&self) -> &'static str {
        self.metadata.resource_type
    }

    fn metadata(&self) -> &GuardMetadata {
        &self.metadata
    }

    fn is_active(&self) -> bool {
        self.release_fn.is_some()
    }

    fn release(&mut self) -> GuardResult<()> {
        let release_fn = self.release_fn.take().ok_or(GuardError::AlreadyReleased)?;
        release_fn(&mut self.resource).map_err(GuardError::OperationFailed)?;

        debug!(
            resource = self.metadata.resource_type,
            lifetime_micros = self.metadata.lifetime_micros(),
            "Released"
        );
        Ok(())
    }
}

impl<R> GuardDrop for ResourceGuard<R> {
    fn on_drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.release() {
                error!(resource = self.metadata.resource_type, error = %e, "Guard drop failed");
            }
        }
    }
}

impl<R> Drop for ResourceGuard<R> {
    fn drop(&mut self) {
        self.on_drop();
    }
}

impl<R: fmt::Debug> fmt::Debug for ResourceGuard<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceGuard")
            .field("resource_type", &self.metadata.resource_type)
            .field("resource", &self.resource)
            .field("active", &self.is_active())
            .finish()
    }
}
