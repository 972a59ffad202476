/*!
 * Process Supervisor
 * Create suspended, bind to the containment object, resume, wait
 */

use tracing::{debug, warn};

use super::cmdline::CommandLine;
use super::traits::Platform;
use super::types::{ChildExit, ObservationFailure, StdHandles, FORCED_EXIT_CODE};
use crate::core::{LaunchError, LaunchResult};

/// Run the child to completion inside `containment`
///
/// The child is bound before its thread is resumed, so it never executes
/// outside the containment limits. A child that cannot be bound or resumed is
/// force-terminated before the error is returned. Failing to observe the
/// child after it started is logged and yields the default exit status.
pub fn run_child<P: Platform>(
    platform: &P,
    containment: &P::Containment,
    attributes: &P::AttributeList,
    stdio: StdHandles<P::Handle>,
    command: &CommandLine,
) -> LaunchResult<(u32, ChildExit)> {
    let child = platform
        .create_suspended(command, attributes, stdio)
        .map_err(LaunchError::ProcessCreate)?;

    let pid = platform.child_id(&child);
    debug!(pid, "Child created suspended");

    if let Err(e) = platform.assign(containment, &child) {
        abort(platform, &child, pid);
        return Err(LaunchError::ContainmentAssign(e));
    }
    debug!(pid, "Child bound to containment object");

    if let Err(e) = platform.resume(&child) {
        abort(platform, &child, pid);
        return Err(LaunchError::Resume(e));
    }
    debug!(pid, "Child resumed");

    Ok((pid, observe(platform, &child, pid)))
}

fn abort<P: Platform>(platform: &P, child: &P::Child, pid: u32) {
    match platform.terminate(child, FORCED_EXIT_CODE) {
        Ok(()) => debug!(pid, "Child terminated"),
        Err(e) => warn!(pid, error = %e, "Failed to terminate child"),
    }
}

fn observe<P: Platform>(platform: &P, child: &P::Child, pid: u32) -> ChildExit {
    if let Err(e) = platform.wait(child) {
        warn!(pid, error = %e, "Waiting for child failed, reporting success");
        return ChildExit::unobserved(ObservationFailure::Wait(e));
    }

    match platform.exit_code(child) {
        Ok(code) => {
            debug!(pid, exit_code = code, "Child exited");
            ChildExit::observed(code)
        }
        Err(e) => {
            warn!(pid, error = %e, "Reading child exit code failed, reporting success");
            ChildExit::unobserved(ObservationFailure::ExitCode(e))
        }
    }
}
