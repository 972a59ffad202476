/*!
 * Launcher Types
 * Configuration, handle sets and outcomes of a launch
 */

use std::ffi::OsString;
use std::io;

use super::affinity::CpuIndex;

/// Extension appended during search-mode resolution
pub const DEFAULT_SEARCH_EXTENSION: &str = ".exe";

/// Capacity of the path buffer used by search-mode resolution (`MAX_PATH`)
pub const DEFAULT_PATH_CAPACITY: usize = 260;

/// OS command-line limit in UTF-16 units, terminator included
pub const DEFAULT_COMMAND_LINE_LIMIT: usize = 32_767;

/// Exit code given to a child that is force-terminated before it ran
pub const FORCED_EXIT_CODE: u32 = 1;

/// Exit status reported when the child's own status cannot be observed
pub const DEFAULT_EXIT_STATUS: u32 = 0;

/// How the first argument becomes the executable path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// First argument is the executable path, used verbatim
    #[default]
    Direct,
    /// First argument is a bare name looked up on the search path
    Search,
}

/// Configuration for one launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub resolution: ResolutionMode,
    pub search_extension: OsString,
    pub path_capacity: usize,
    pub command_line_limit: usize,
}

impl LaunchConfig {
    pub fn new(resolution: ResolutionMode) -> Self {
        Self {
            resolution,
            search_extension: OsString::from(DEFAULT_SEARCH_EXTENSION),
            path_capacity: DEFAULT_PATH_CAPACITY,
            command_line_limit: DEFAULT_COMMAND_LINE_LIMIT,
        }
    }

    pub fn with_search_extension(mut self, extension: impl Into<OsString>) -> Self {
        self.search_extension = extension.into();
        self
    }

    pub fn with_path_capacity(mut self, capacity: usize) -> Self {
        self.path_capacity = capacity;
        self
    }

    pub fn with_command_line_limit(mut self, limit: usize) -> Self {
        self.command_line_limit = limit;
        self
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::new(ResolutionMode::default())
    }
}

/// The launcher's standard input, output and error handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdHandles<H> {
    pub input: H,
    pub output: H,
    pub error: H,
}

impl<H: Copy> StdHandles<H> {
    pub fn new(input: H, output: H, error: H) -> Self {
        Self {
            input,
            output,
            error,
        }
    }

    /// The allow-list of handles the child may inherit
    pub fn inherit_list(&self) -> InheritList<H> {
        InheritList([self.input, self.output, self.error])
    }
}

/// Allow-list of inheritable handles: exactly stdin, stdout and stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritList<H>([H; 3]);

impl<H> InheritList<H> {
    #[inline]
    pub fn as_slice(&self) -> &[H] {
        &self.0
    }

    #[inline]
    pub fn into_array(self) -> [H; 3] {
        self.0
    }
}

/// Result of a search-path lookup
#[derive(Debug)]
pub enum SearchOutcome {
    /// Absolute path of the match
    Found(OsString),
    /// A match exists but needs `required` units of buffer
    Truncated { required: usize },
    /// No match
    NotFound(io::Error),
}

/// Failure to observe a child that did launch
#[derive(Debug)]
pub enum ObservationFailure {
    /// Waiting for termination failed
    Wait(io::Error),
    /// Reading the terminal exit code failed
    ExitCode(io::Error),
}

/// What the supervisor observed about the child's termination
#[derive(Debug)]
pub struct ChildExit {
    pub code: u32,
    pub observation: Option<ObservationFailure>,
}

impl ChildExit {
    pub fn observed(code: u32) -> Self {
        Self {
            code,
            observation: None,
        }
    }

    pub fn unobserved(failure: ObservationFailure) -> Self {
        Self {
            code: DEFAULT_EXIT_STATUS,
            observation: Some(failure),
        }
    }
}

/// Result of a completed launch
#[derive(Debug)]
pub struct LaunchOutcome {
    pub cpu: CpuIndex,
    pub pid: u32,
    pub exit_code: u32,
    pub observation: Option<ObservationFailure>,
}

impl LaunchOutcome {
    /// Exit code the launcher itself reports
    #[inline]
    pub fn process_exit_code(&self) -> i32 {
        self.exit_code as i32
    }
}
