//! [`RegisterWriter`] implementation for real YM2612 ports.
//!
//! [`Ym2612Bus`] wraps the low-level port driver and maps each register
//! write to the address/data port pair of its bank.

use megafm::registers::{Bank, RegisterWriter};

use crate::config::BusConfig;
use crate::driver::{MemoryMappedPorts, PortDriver, PortIo};
use crate::registers::{ADDRESS_A, ADDRESS_B, DATA_A, DATA_B};

/// Register-write boundary to a YM2612.
///
/// Every [`write_register()`](RegisterWriter::write_register) waits for the
/// busy flag, selects the register on the bank's address port and writes
/// the byte to its data port. A chip that stays busy is written to anyway
/// and the event is counted in [`timeouts()`](Self::timeouts).
///
/// # Example
///
/// ```no_run
/// use megafm::fm::Synth;
/// use ym2612_bus::{BusConfig, Ym2612Bus};
///
/// // SAFETY: running on a Mega Drive with the 68000 owning the Z80 bus.
/// let bus = unsafe { Ym2612Bus::memory_mapped(BusConfig::default()) };
/// let mut synth = Synth::new(bus);
/// synth.play_note(0).unwrap();
/// ```
pub struct Ym2612Bus<IO> {
    driver: PortDriver<IO>,
    config: BusConfig,
}

impl<IO: PortIo> Ym2612Bus<IO> {
    /// Create a bus over `io`.
    ///
    /// Only `config.busy_wait_limit` applies here; the ports are whatever
    /// `io` addresses.
    pub fn new(io: IO, config: BusConfig) -> Self {
        Self {
            driver: PortDriver::new(io, config.busy_wait_limit),
            config,
        }
    }

    /// Configuration the bus was created with.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Number of port writes issued while the chip was still busy.
    pub fn timeouts(&self) -> u32 {
        self.driver.timeouts()
    }

    /// Release the port access.
    pub fn into_inner(self) -> IO {
        self.driver.into_inner()
    }
}

impl Ym2612Bus<MemoryMappedPorts> {
    /// Create a bus over the memory-mapped ports at `config.base_address`.
    ///
    /// # Safety
    ///
    /// Same contract as [`MemoryMappedPorts::new()`] for
    /// `config.base_address`.
    pub unsafe fn memory_mapped(config: BusConfig) -> Self {
        Self::new(MemoryMappedPorts::new(config.base_address), config)
    }
}

impl<IO: PortIo> RegisterWriter for Ym2612Bus<IO> {
    fn write_register(&mut self, bank: Bank, address: u8, data: u8) {
        #[cfg(feature = "defmt")]
        defmt::trace!("YM2612 {} {=u8:#x} <- {=u8:#x}", bank, address, data);

        let (address_port, data_port) = match bank {
            Bank::A => (ADDRESS_A, DATA_A),
            Bank::B => (ADDRESS_B, DATA_B),
        };
        self.driver.write_pair(address_port, address, data_port, data);
    }
}
