/*!
 * Launch Sequence
 * Wires the five launcher components together
 */

use std::ffi::OsString;
use tracing::{debug, info_span};

use super::affinity::select_cpu;
use super::cmdline::build_command_line;
use super::containment::create_containment;
use super::handles::build_inherit_filter;
use super::supervisor::run_child;
use super::traits::Platform;
use super::types::{LaunchConfig, LaunchOutcome};
use crate::core::{LaunchError, LaunchResult};

/// Launch `args[0]` with `args[1..]` on a single CPU and wait for it
///
/// Steps run strictly in order: select CPU, create the containment object,
/// build the inheritable handle list, assemble the command line, then
/// create, bind, resume and wait for the child. Resources acquired by earlier
/// steps are released when this function returns, on success and failure
/// alike; the containment object is closed last.
pub fn launch<P: Platform>(platform: &P, config: &LaunchConfig, args: &[OsString]) -> LaunchResult<LaunchOutcome> {
    let program = args.first().ok_or(LaunchError::MissingExecutable)?;

    let span = info_span!(
        "launch",
        program = %program.to_string_lossy(),
        mode = ?config.resolution,
    );
    let _entered = span.enter();

    let cpu = select_cpu(platform)?;
    let containment = create_containment(platform, cpu)?;

    let stdio = platform.std_handles();
    let attributes = build_inherit_filter(platform, stdio)?;

    let command = build_command_line(platform, config, args)?;

    let (pid, exit) = run_child(platform, &containment, &attributes, stdio, &command)?;

    Ok(LaunchOutcome {
        cpu,
        pid,
        exit_code: exit.code,
        observation: exit.observation,
    })
}

/// Launch and map the result to the launcher's own exit code
///
/// The child's exit code is forwarded; launch failures are rendered to
/// stderr and give 1.
pub fn run_with<P: Platform>(platform: &P, config: &LaunchConfig, args: &[OsString]) -> i32 {
    match launch(platform, config, args) {
        Ok(outcome) => outcome.process_exit_code(),
        Err(e) => {
            let code = e.exit_code();
            debug!(
                error = %e,
                os_error = ?e.os_error_code(),
                child_created = e.after_process_creation(),
                "Launch failed"
            );
            eprintln!("{:?}", miette::Report::new(e));
            code
        }
    }
}
