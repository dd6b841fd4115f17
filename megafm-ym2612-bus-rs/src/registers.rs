//! YM2612 port layout and status flags.
//!
//! The chip is reached through four byte-wide ports: an address/data pair
//! for each register bank. Reading the first port returns the status byte.

// ---------------------------------------------------------------------------
// Port offsets
// ---------------------------------------------------------------------------

/// Bank A register address port.
pub const ADDRESS_A: u8 = 0;

/// Bank A data port.
pub const DATA_A: u8 = 1;

/// Bank B register address port.
pub const ADDRESS_B: u8 = 2;

/// Bank B data port.
pub const DATA_B: u8 = 3;

/// Status is read from the bank A address port.
pub const STATUS: u8 = ADDRESS_A;

/// Number of port offsets a [`PortIo`](crate::PortIo) must serve.
pub const PORT_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Status flags
// ---------------------------------------------------------------------------

/// Set while the chip is still processing the previous write.
pub const STATUS_BUSY: u8 = 0x80;

// ---------------------------------------------------------------------------
// Mega Drive defaults
// ---------------------------------------------------------------------------

/// Base of the YM2612 ports in the Z80 address window of the 68000 bus.
pub const MEGA_DRIVE_BASE: usize = 0xA0_4000;

/// Status polls before a busy chip is written to anyway.
pub const BUSY_WAIT_LIMIT: u32 = 0x400;
