//! Bus configuration.

use crate::registers::{BUSY_WAIT_LIMIT, MEGA_DRIVE_BASE};

/// Port location and timing of a YM2612 bus.
///
/// The [`Default`] describes a stock Mega Drive: ports at `0xA04000` and a
/// busy-wait of `0x400` status polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Address of the bank A address port. The other ports follow it
    /// byte by byte.
    pub base_address: usize,
    /// Maximum status polls per port write. `0` skips the busy check.
    pub busy_wait_limit: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            base_address: MEGA_DRIVE_BASE,
            busy_wait_limit: BUSY_WAIT_LIMIT,
        }
    }
}
