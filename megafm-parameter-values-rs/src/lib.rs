//! YM2612 FM voice parameters for the Sega Mega Drive.
//!
//! This crate models the chip's voice parameters as bounded values and
//! translates every edit into the register bytes the chip expects.
//!
//! - [`fm`]: the parameter model: [`Synth`](fm::Synth), channels,
//!   operators, global LFO settings, presets and the editing context.
//! - [`registers`]: the register map and the [`RegisterWriter`]
//!   boundary through which every byte reaches the chip.
//! - [`recorder`]: in-memory writers that capture register traffic.
//!
//! # Quick start
//!
//! ```
//! use megafm::fm::{ChannelParameter, Synth};
//! use megafm::recorder::RegisterShadow;
//! use megafm::registers::{Bank, ALGORITHM_FEEDBACK};
//!
//! let mut synth = Synth::new(RegisterShadow::new());
//! synth
//!     .set_channel_parameter(0, ChannelParameter::Algorithm, 4)
//!     .unwrap();
//! synth.play_note(0).unwrap();
//!
//! assert_eq!(synth.writer().read(Bank::A, ALGORITHM_FEEDBACK), 0x04);
//! ```
//!
//! # Features
//!
//! - **`defmt`**: structured logging and `defmt::Format` implementations
//!   for embedded targets.
//!
//! [`RegisterWriter`]: registers::RegisterWriter

#![no_std]

pub mod fm;
pub mod recorder;
pub mod registers;
