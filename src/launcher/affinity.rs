/*!
 * CPU Affinity Selector
 * Picks the lowest CPU the launcher itself is allowed to run on
 */

use std::fmt;
use tracing::debug;

use super::traits::Platform;
use crate::core::{LaunchError, LaunchResult};

/// Set of logical CPUs a process may run on, one bit per CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AffinityMask(usize);

impl AffinityMask {
    #[inline]
    pub const fn new(bits: usize) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> usize {
        self.0
    }

    /// Number of CPUs in the set
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Position of the least significant set bit
    pub const fn lowest_cpu(self) -> Option<CpuIndex> {
        if self.0 == 0 {
            None
        } else {
            Some(CpuIndex(self.0.trailing_zeros()))
        }
    }
}

impl fmt::Display for AffinityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Zero-based index of a logical CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpuIndex(u32);

impl CpuIndex {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Mask with exactly this CPU's bit set
    ///
    /// Shifted in full pointer width so indices above 31 stay correct.
    #[inline]
    pub const fn single_mask(self) -> AffinityMask {
        AffinityMask(1usize << self.0)
    }
}

impl fmt::Display for CpuIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpu{}", self.0)
    }
}

/// Read the launcher's affinity mask once and select its lowest CPU
pub fn select_cpu<P: Platform>(platform: &P) -> LaunchResult<CpuIndex> {
    let mask = platform
        .affinity_mask()
        .map_err(LaunchError::EnvironmentQuery)?;

    let cpu = mask.lowest_cpu().ok_or(LaunchError::NoAvailableCpu)?;

    debug!(mask = %mask, cpu = cpu.index(), available = mask.count(), "Selected CPU");
    Ok(cpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_set_bit() {
        assert_eq!(AffinityMask::new(0b0110).lowest_cpu(), Some(CpuIndex::new(1)));
        assert_eq!(AffinityMask::new(0b0001).lowest_cpu(), Some(CpuIndex::new(0)));
        assert_eq!(AffinityMask::new(0b1000_0000).lowest_cpu(), Some(CpuIndex::new(7)));
    }

    #[test]
    fn test_zero_mask_has_no_cpu() {
        assert_eq!(AffinityMask::new(0).lowest_cpu(), None);
    }

    #[test]
    fn test_high_cpu_index() {
        let top = usize::BITS - 1;
        let mask = AffinityMask::new(1usize << top);

        let cpu = mask.lowest_cpu().unwrap();
        assert_eq!(cpu.index(), top);
        assert_eq!(cpu.single_mask(), mask);
    }

    #[test]
    fn test_single_mask() {
        let cpu = CpuIndex::new(3);
        let mask = cpu.single_mask();

        assert_eq!(mask.bits(), 0b1000);
        assert_eq!(mask.count(), 1);
        assert_eq!(cpu.single_mask().lowest_cpu(), Some(cpu));
    }

    #[test]
    fn test_display() {
        assert_eq!(AffinityMask::new(0xf0).to_string(), "0xf0");
        assert_eq!(CpuIndex::new(4).to_string(), "cpu4");
    }
}
