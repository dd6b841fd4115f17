//! Low-level port access.
//!
//! [`PortIo`] abstracts the four chip ports so the driver can run against
//! real memory-mapped hardware or a test double. [`PortDriver`] adds the
//! busy-flag handshake the chip requires before every port write.
//!
//! The driver is crate-private; consumers use [`Ym2612Bus`] in `bus.rs`.
//!
//! [`Ym2612Bus`]: crate::Ym2612Bus

use crate::registers::{STATUS, STATUS_BUSY};

/// Byte access to the chip's ports, addressed by offset (`0..PORT_COUNT`).
///
/// See [`registers`](crate::registers) for the offset assignments.
pub trait PortIo {
    /// Read the byte at port `offset`.
    fn read(&mut self, offset: u8) -> u8;

    /// Write `value` to port `offset`.
    fn write(&mut self, offset: u8, value: u8);
}

impl<T: PortIo + ?Sized> PortIo for &mut T {
    fn read(&mut self, offset: u8) -> u8 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: u8, value: u8) {
        (**self).write(offset, value)
    }
}

/// Ports mapped into the CPU address space at consecutive bytes.
#[derive(Debug)]
pub struct MemoryMappedPorts {
    base: *mut u8,
}

impl MemoryMappedPorts {
    /// Access the ports starting at `base`.
    ///
    /// # Safety
    ///
    /// `base..base + PORT_COUNT` must be the YM2612 ports, valid for
    /// volatile byte reads and writes for as long as this value exists, and
    /// not accessed through any other handle in the meantime.
    pub unsafe fn new(base: usize) -> Self {
        Self {
            base: base as *mut u8,
        }
    }
}

impl PortIo for MemoryMappedPorts {
    fn read(&mut self, offset: u8) -> u8 {
        // SAFETY: the constructor contract covers every port offset.
        unsafe { self.base.add(offset as usize).read_volatile() }
    }

    fn write(&mut self, offset: u8, value: u8) {
        // SAFETY: the constructor contract covers every port offset.
        unsafe { self.base.add(offset as usize).write_volatile(value) }
    }
}

/// Busy-flag aware port driver.
///
/// Owns the port access and counts how often the chip stayed busy for the
/// whole wait budget.
pub(crate) struct PortDriver<IO> {
    io: IO,
    busy_wait_limit: u32,
    timeouts: u32,
}

impl<IO: PortIo> PortDriver<IO> {
    pub fn new(io: IO, busy_wait_limit: u32) -> Self {
        Self {
            io,
            busy_wait_limit,
            timeouts: 0,
        }
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    pub fn into_inner(self) -> IO {
        self.io
    }

    // -----------------------------------------------------------------------
    // Port primitives
    // -----------------------------------------------------------------------

    /// Write `address` to `address_port`, then `data` to `data_port`,
    /// waiting for the chip before each.
    pub fn write_pair(&mut self, address_port: u8, address: u8, data_port: u8, data: u8) {
        self.wait_ready();
        self.io.write(address_port, address);
        self.wait_ready();
        self.io.write(data_port, data);
    }

    /// Poll the status port until the busy flag clears.
    ///
    /// Gives up after `busy_wait_limit` polls; the caller writes anyway.
    fn wait_ready(&mut self) {
        if self.busy_wait_limit == 0 {
            return;
        }
        for _ in 0..self.busy_wait_limit {
            if self.io.read(STATUS) & STATUS_BUSY == 0 {
                return;
            }
        }
        self.timeouts = self.timeouts.saturating_add(1);

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "YM2612 still busy after {} polls ({} timeouts)",
            self.busy_wait_limit,
            self.timeouts
        );
    }
}
