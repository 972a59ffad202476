/*!
 * Inheritable Handle Filter
 * Attribute list that limits inheritance to the standard streams
 */

use std::ffi::c_void;
use std::mem;
use tracing::debug;

use super::traits::Platform;
use super::types::StdHandles;
use crate::core::{LaunchError, LaunchResult};

/// Number of entries in the creation attribute list: the handle allow-list
pub const ATTRIBUTE_COUNT: u32 = 1;

/// Heap storage for an OS creation attribute list
///
/// Word-aligned, zero-filled, and at least `size` bytes long. Its address is
/// stable for its whole lifetime, so the OS may keep pointers into it.
#[derive(Debug)]
pub struct AttributeBuffer {
    storage: Vec<usize>,
    size: usize,
}

impl AttributeBuffer {
    /// Allocate `size` bytes, reporting failure instead of aborting
    pub fn allocate(size: usize) -> LaunchResult<Self> {
        let words = size.div_ceil(mem::size_of::<usize>());

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(words)
            .map_err(|_| LaunchError::Allocation { size })?;
        storage.resize(words, 0);

        Ok(Self { storage, size })
    }

    /// Size requested by the OS, in bytes
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut c_void {
        self.storage.as_mut_ptr().cast()
    }
}

/// Build the attribute list restricting inheritance to `stdio`
///
/// Any handle outside the three standard streams is not inherited by the
/// child, whatever else is open and inheritable in the launcher.
pub fn build_inherit_filter<P: Platform>(
    platform: &P,
    stdio: StdHandles<P::Handle>,
) -> LaunchResult<P::AttributeList> {
    let size = platform
        .attribute_list_size(ATTRIBUTE_COUNT)
        .map_err(LaunchError::AttributeSizeQuery)?;

    let buffer = AttributeBuffer::allocate(size)?;

    let mut attributes = platform
        .initialize_attribute_list(buffer, ATTRIBUTE_COUNT)
        .map_err(LaunchError::AttributeListInit)?;

    let allowed = stdio.inherit_list();
    platform
        .inherit_only(&mut attributes, allowed)
        .map_err(LaunchError::AttributeUpdate)?;

    debug!(size, handles = ?allowed.as_slice(), "Inheritable handle list registered");
    Ok(attributes)
}
