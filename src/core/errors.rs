/*!
 * Error Types
 * Launch failures with thiserror and miette diagnostics
 */

use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Exit code reported for every launch-time failure
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// Launch operation result
pub type LaunchResult<T> = Result<T, LaunchError>;

/// Fatal failures of the launch sequence
///
/// Every variant that wraps an `io::Error` carries the raw OS error code of
/// the call that failed.
#[derive(Error, Debug, Diagnostic)]
pub enum LaunchError {
    #[error("At least one argument required")]
    #[diagnostic(
        code(launch::missing_executable),
        help("Usage: rununiproc <executable> [args...]")
    )]
    MissingExecutable,

    #[error("Unable to obtain our CPU affinity mask: {0}")]
    #[diagnostic(
        code(affinity::query_failed),
        help("The process affinity mask could not be read from the OS.")
    )]
    EnvironmentQuery(io::Error),

    #[error("CPU affinity mask is zero")]
    #[diagnostic(
        code(affinity::no_cpu),
        help("The launcher itself has no runnable CPU; check the parent's job or affinity settings.")
    )]
    NoAvailableCpu,

    #[error("Failed to create job object: {0}")]
    #[diagnostic(code(containment::create_failed))]
    ContainmentCreate(io::Error),

    #[error("Unable to set basic limit information on job object: {0}")]
    #[diagnostic(
        code(containment::configure_failed),
        help("The launcher may already run inside a job that forbids affinity changes.")
    )]
    ContainmentConfigure(io::Error),

    #[error("Sizing the process attribute list failed: {0}")]
    #[diagnostic(code(handles::size_query_failed))]
    AttributeSizeQuery(io::Error),

    #[error("Could not allocate process attribute list of size {size}")]
    #[diagnostic(
        code(handles::allocation_failed),
        help("System may be low on memory.")
    )]
    Allocation { size: usize },

    #[error("Initializing the process attribute list failed: {0}")]
    #[diagnostic(code(handles::init_failed))]
    AttributeListInit(io::Error),

    #[error("Registering the inheritable handle list failed: {0}")]
    #[diagnostic(code(handles::update_failed))]
    AttributeUpdate(io::Error),

    #[error("Executable '{name}' not found: {cause}")]
    #[diagnostic(
        code(command::not_found),
        help("Search mode looks the name up on the search path with a fixed extension.")
    )]
    ExecutableNotFound { name: String, cause: io::Error },

    #[error("Resolved path for '{name}' needs {required} characters, buffer holds {capacity}")]
    #[diagnostic(code(command::path_too_long))]
    PathTooLong {
        name: String,
        required: usize,
        capacity: usize,
    },

    #[error("Command line of {length} characters exceeds the limit of {limit}")]
    #[diagnostic(
        code(command::too_long),
        help("Pass fewer or shorter arguments.")
    )]
    CommandLineTooLong { length: usize, limit: usize },

    #[error("CreateProcess failed: {0}")]
    #[diagnostic(code(process::create_failed))]
    ProcessCreate(io::Error),

    #[error("AssignProcessToJobObject failed: {0}")]
    #[diagnostic(
        code(process::assign_failed),
        help("The child was terminated before it could run outside the job.")
    )]
    ContainmentAssign(io::Error),

    #[error("ResumeThread failed: {0}")]
    #[diagnostic(
        code(process::resume_failed),
        help("The suspended child was terminated.")
    )]
    Resume(io::Error),
}

impl LaunchError {
    /// Exit code the launcher reports for this failure
    #[inline]
    pub fn exit_code(&self) -> i32 {
        LAUNCH_FAILURE_EXIT_CODE
    }

    /// Raw OS error code of the failing call, when there was one
    pub fn os_error_code(&self) -> Option<i32> {
        match self {
            LaunchError::EnvironmentQuery(e)
            | LaunchError::ContainmentCreate(e)
            | LaunchError::ContainmentConfigure(e)
            | LaunchError::AttributeSizeQuery(e)
            | LaunchError::AttributeListInit(e)
            | LaunchError::AttributeUpdate(e)
            | LaunchError::ProcessCreate(e)
            | LaunchError::ContainmentAssign(e)
            | LaunchError::Resume(e) => e.raw_os_error(),
            LaunchError::ExecutableNotFound { cause, .. } => cause.raw_os_error(),
            LaunchError::MissingExecutable
            | LaunchError::NoAvailableCpu
            | LaunchError::Allocation { .. }
            | LaunchError::PathTooLong { .. }
            | LaunchError::CommandLineTooLong { .. } => None,
        }
    }

    /// Whether a child process existed when this failure happened
    pub fn after_process_creation(&self) -> bool {
        matches!(
            self,
            LaunchError::ContainmentAssign(_) | LaunchError::Resume(_)
        )
    }
}
