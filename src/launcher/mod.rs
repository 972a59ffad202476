/*!
 * Launcher Module
 * Single-CPU child launch: affinity, containment, handle filter, command line, supervision
 */

pub mod affinity;
pub mod cmdline;
pub mod containment;
pub mod handles;
pub mod launch;
pub mod supervisor;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use affinity::{select_cpu, AffinityMask, CpuIndex};
pub use cmdline::{build_command_line, quote_args, CommandLine};
pub use containment::create_containment;
pub use handles::{build_inherit_filter, AttributeBuffer, ATTRIBUTE_COUNT};
pub use launch::{launch, run_with};
pub use supervisor::run_child;
pub use traits::Platform;
pub use types::{
    ChildExit, InheritList, LaunchConfig, LaunchOutcome, ObservationFailure, ResolutionMode,
    SearchOutcome, StdHandles,
};
