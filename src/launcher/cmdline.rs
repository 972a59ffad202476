/*!
 * Command Line Builder
 * Executable resolution and argument re-quoting
 */

use std::ffi::{OsStr, OsString};
use tracing::debug;

use super::traits::Platform;
use super::types::{LaunchConfig, ResolutionMode, SearchOutcome};
use crate::core::{LaunchError, LaunchResult};

/// Executable path plus the full quoted command line for the child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    application: OsString,
    line: OsString,
}

impl CommandLine {
    /// Path handed to the OS as the image to run
    #[inline]
    pub fn application(&self) -> &OsStr {
        &self.application
    }

    /// Quoted, space-separated argument string
    #[inline]
    pub fn line(&self) -> &OsStr {
        &self.line
    }

    /// Length of the command line in UTF-16 units, terminator excluded
    #[inline]
    pub fn units(&self) -> usize {
        wide_len(&self.line)
    }
}

/// Length of `s` in UTF-16 units, as the OS counts it
pub fn wide_len(s: &OsStr) -> usize {
    #[cfg(windows)]
    {
        use std::os::windows::ffi::OsStrExt;
        s.encode_wide().count()
    }

    #[cfg(not(windows))]
    {
        s.to_string_lossy().encode_utf16().count()
    }
}

/// Wrap every argument in double quotes and join with single spaces
///
/// Arguments are copied verbatim: embedded quotes are not escaped.
pub fn quote_args<I, S>(args: I) -> OsString
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = OsString::new();
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            line.push(" ");
        }
        line.push("\"");
        line.push(arg.as_ref());
        line.push("\"");
    }
    line
}

/// Resolve the executable and assemble the child's command line
///
/// In direct mode the first argument is the executable. In search mode it is
/// replaced by the absolute path found on the search path.
pub fn build_command_line<P: Platform>(
    platform: &P,
    config: &LaunchConfig,
    args: &[OsString],
) -> LaunchResult<CommandLine> {
    let (program, rest) = args.split_first().ok_or(LaunchError::MissingExecutable)?;

    let application = match config.resolution {
        ResolutionMode::Direct => program.clone(),
        ResolutionMode::Search => resolve(platform, config, program)?,
    };

    let line = quote_args(std::iter::once(application.as_os_str()).chain(rest.iter().map(OsString::as_os_str)));

    let command = CommandLine { application, line };

    // The limit counts the terminating NUL
    let length = command.units();
    if length >= config.command_line_limit {
        return Err(LaunchError::CommandLineTooLong {
            length,
            limit: config.command_line_limit,
        });
    }

    debug!(
        application = %command.application.to_string_lossy(),
        command_line = %command.line.to_string_lossy(),
        length,
        "Command line assembled"
    );

    Ok(command)
}

fn resolve<P: Platform>(platform: &P, config: &LaunchConfig, program: &OsStr) -> LaunchResult<OsString> {
    let name = || program.to_string_lossy().into_owned();
    let capacity = config.path_capacity;

    match platform.search_path(program, &config.search_extension, capacity) {
        SearchOutcome::Found(path) => {
            let required = wide_len(&path);
            if required >= capacity {
                return Err(LaunchError::PathTooLong {
                    name: name(),
                    required,
                    capacity,
                });
            }
            debug!(name = %name(), path = %path.to_string_lossy(), "Executable resolved");
            Ok(path)
        }
        SearchOutcome::Truncated { required } => Err(LaunchError::PathTooLong {
            name: name(),
            required,
            capacity,
        }),
        SearchOutcome::NotFound(cause) => Err(LaunchError::ExecutableNotFound { name: name(), cause }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_args() {
        let line = quote_args(["x.exe", "a b", "c"]);
        assert_eq!(line, OsString::from("\"x.exe\" \"a b\" \"c\""));
    }

    #[test]
    fn test_quote_single_arg_has_no_trailing_space() {
        assert_eq!(quote_args(["x.exe"]), OsString::from("\"x.exe\""));
    }

    #[test]
    fn test_quote_empty_arg() {
        assert_eq!(quote_args(["x.exe", ""]), OsString::from("\"x.exe\" \"\""));
    }

    #[test]
    fn test_embedded_quotes_are_not_escaped() {
        assert_eq!(
            quote_args(["x.exe", "say \"hi\""]),
            OsString::from("\"x.exe\" \"say \"hi\"\"")
        );
    }

    #[test]
    fn test_wide_len_counts_utf16_units() {
        assert_eq!(wide_len(OsStr::new("abc")), 3);
        // U+1F600 is a surrogate pair in UTF-16
        assert_eq!(wide_len(OsStr::new("\u{1F600}")), 2);
    }
}
