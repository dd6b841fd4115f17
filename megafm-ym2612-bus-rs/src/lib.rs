//! YM2612 port driver for the `megafm` voice model.
//!
//! This crate delivers the register writes produced by [`megafm`] to a real
//! chip, honouring the busy flag the YM2612 raises while it digests each
//! write.
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **`driver`**: the [`PortIo`] port abstraction, its memory-mapped
//!   implementation, and the crate-private busy-wait primitives.
//! - **[`Ym2612Bus`]** (public): the
//!   [`RegisterWriter`](megafm::registers::RegisterWriter) handed to
//!   [`Synth`](megafm::fm::Synth).
//!
//! # Quick start
//!
//! ```no_run
//! use megafm::fm::Synth;
//! use ym2612_bus::{BusConfig, Ym2612Bus};
//!
//! // SAFETY: the ports at the configured base belong to the YM2612.
//! let bus = unsafe { Ym2612Bus::memory_mapped(BusConfig::default()) };
//! let synth = Synth::new(bus);
//! ```
//!
//! # Features
//!
//! - **`defmt`**: traces every register write and warns on busy-flag
//!   timeouts.

#![no_std]

pub use bus::Ym2612Bus;
pub use config::BusConfig;
pub use driver::{MemoryMappedPorts, PortIo};

mod bus;
mod config;
mod driver;
pub mod registers;
