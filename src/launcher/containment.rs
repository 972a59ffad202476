/*!
 * Containment Object Manager
 * Job object restricted to the selected CPU
 */

use tracing::debug;

use super::affinity::CpuIndex;
use super::traits::Platform;
use crate::core::{LaunchError, LaunchResult};

/// Create an anonymous containment object limited to `cpu`
///
/// The object carries exactly one limit: affinity equal to the singleton set
/// `{cpu}`. It is closed when the returned value drops, also on the error path
/// where configuring it fails.
pub fn create_containment<P: Platform>(platform: &P, cpu: CpuIndex) -> LaunchResult<P::Containment> {
    let containment = platform
        .create_containment()
        .map_err(LaunchError::ContainmentCreate)?;

    let limit = cpu.single_mask();
    debug_assert_eq!(limit.count(), 1);

    platform
        .restrict_affinity(&containment, limit)
        .map_err(LaunchError::ContainmentConfigure)?;

    debug!(cpu = cpu.index(), limit = %limit, "Containment object restricted");
    Ok(containment)
}
