/*!
 * Launcher Traits
 * The OS seam the launch sequence is written against
 */

use std::ffi::OsStr;
use std::fmt;
use std::io;

use super::affinity::AffinityMask;
use super::cmdline::CommandLine;
use super::handles::AttributeBuffer;
use super::types::{InheritList, SearchOutcome, StdHandles};

/// OS operations needed to launch one contained child
///
/// Every associated resource type owns its OS object and releases it when
/// dropped. The launch sequence therefore never cleans up by hand.
pub trait Platform {
    /// Borrowed OS handle value, such as a standard stream
    type Handle: Copy + fmt::Debug;

    /// Owned containment object
    type Containment;

    /// Owned, initialised creation attribute list
    type AttributeList;

    /// Owned child process together with its initial thread
    type Child;

    /// Read the launcher's own allowed-CPU mask
    fn affinity_mask(&self) -> io::Result<AffinityMask>;

    /// Create an anonymous containment object
    fn create_containment(&self) -> io::Result<Self::Containment>;

    /// Limit members of `containment` to the CPUs in `mask`
    fn restrict_affinity(&self, containment: &Self::Containment, mask: AffinityMask) -> io::Result<()>;

    /// The launcher's standard stream handles
    fn std_handles(&self) -> StdHandles<Self::Handle>;

    /// Bytes needed for an attribute list of `count` entries
    fn attribute_list_size(&self, count: u32) -> io::Result<usize>;

    /// Initialise `buffer` as an attribute list of `count` entries
    fn initialize_attribute_list(&self, buffer: AttributeBuffer, count: u32) -> io::Result<Self::AttributeList>;

    /// Register `handles` as the only handles the child may inherit
    fn inherit_only(&self, attributes: &mut Self::AttributeList, handles: InheritList<Self::Handle>) -> io::Result<()>;

    /// Look `name` up on the search path with `extension` appended
    fn search_path(&self, name: &OsStr, extension: &OsStr, capacity: usize) -> SearchOutcome;

    /// Create the child with its initial thread not yet running
    fn create_suspended(
        &self,
        command: &CommandLine,
        attributes: &Self::AttributeList,
        stdio: StdHandles<Self::Handle>,
    ) -> io::Result<Self::Child>;

    /// OS process id of `child`
    fn child_id(&self, child: &Self::Child) -> u32;

    /// Bind `child` to `containment`
    fn assign(&self, containment: &Self::Containment, child: &Self::Child) -> io::Result<()>;

    /// Start the child's initial thread
    fn resume(&self, child: &Self::Child) -> io::Result<()>;

    /// Force-terminate `child` with `exit_code`
    fn terminate(&self, child: &Self::Child, exit_code: u32) -> io::Result<()>;

    /// Block until `child` terminates
    fn wait(&self, child: &Self::Child) -> io::Result<()>;

    /// Terminal exit code of `child`
    fn exit_code(&self, child: &Self::Child) -> io::Result<u32>;
}
