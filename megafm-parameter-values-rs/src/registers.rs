//! YM2612 register map and the register-write boundary.
//!
//! The chip exposes two banks of 256 write-only registers. Bank A holds the
//! global registers and channels 0–2; bank B holds channels 3–5 at the same
//! addresses. Per-channel registers add `channel % 3` to their base address,
//! per-operator registers additionally add `operator * 4`.

// ---------------------------------------------------------------------------
// Global registers (bank A only)
// ---------------------------------------------------------------------------

/// LFO enable (bit 3) and LFO rate (bits 0–2).
pub const LFO: u8 = 0x22;

/// Timer control and channel 3 mode.
pub const TIMER_CONTROL: u8 = 0x27;

/// Key on/off. Bits 4–7 select operators, bits 0–2 the channel code.
pub const KEY_ON_OFF: u8 = 0x28;

// ---------------------------------------------------------------------------
// Operator registers (base addresses)
// ---------------------------------------------------------------------------

/// Detune (bits 4–6) and frequency multiple (bits 0–3).
pub const DETUNE_MULTIPLE: u8 = 0x30;

/// Total level.
pub const TOTAL_LEVEL: u8 = 0x40;

/// Rate scaling (bits 6–7) and attack rate (bits 0–4).
pub const RATE_SCALING_ATTACK: u8 = 0x50;

/// Amplitude modulation enable (bit 7) and first decay rate (bits 0–4).
pub const AM_DECAY_1: u8 = 0x60;

/// Second decay rate.
pub const DECAY_2: u8 = 0x70;

/// First decay level (bits 4–7) and release rate (bits 0–3).
pub const DECAY_LEVEL_RELEASE: u8 = 0x80;

/// SSG-EG registers, one per operator slot of channel 0. Undocumented by the
/// manufacturer and zeroed on reset.
pub const SSG_EG: [u8; 4] = [0x90, 0x94, 0x98, 0x9C];

// ---------------------------------------------------------------------------
// Channel registers (base addresses)
// ---------------------------------------------------------------------------

/// Frequency number, low 8 bits.
pub const FREQUENCY_LOW: u8 = 0xA0;

/// Octave (bits 3–5) and frequency number high 3 bits (bits 0–2).
/// Must be written before [`FREQUENCY_LOW`].
pub const FREQUENCY_HIGH_OCTAVE: u8 = 0xA4;

/// Feedback (bits 3–5) and algorithm (bits 0–2).
pub const ALGORITHM_FEEDBACK: u8 = 0xB0;

/// Stereo (bits 6–7), AM sensitivity (bits 4–5), FM sensitivity (bits 0–2).
pub const STEREO_LFO_SENSITIVITY: u8 = 0xB4;

// ---------------------------------------------------------------------------
// Key on/off data
// ---------------------------------------------------------------------------

/// Operator mask that keys on all four operators.
pub const KEY_ON_ALL_OPERATORS: u8 = 0xF0;

/// Register bank of the YM2612.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Global registers and channels 0–2.
    A = 0,
    /// Channels 3–5.
    B = 1,
}

impl Bank {
    /// Bank serving the given channel.
    pub const fn for_channel(channel: u8) -> Self {
        if channel > 2 {
            Bank::B
        } else {
            Bank::A
        }
    }

    /// Zero-based bank number, usable as an array index.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Address offset of a channel within its bank.
pub const fn channel_offset(channel: u8) -> u8 {
    channel % 3
}

/// A single register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    /// Bank the register lives in.
    pub bank: Bank,
    /// Register address within the bank.
    pub address: u8,
    /// Byte written.
    pub data: u8,
}

/// Destination for register writes.
///
/// Writes are fire-and-forget: the chip acknowledges nothing and has no
/// readable register state, so implementations cannot fail.
pub trait RegisterWriter {
    /// Write `data` to `address` in `bank`.
    fn write_register(&mut self, bank: Bank, address: u8, data: u8);
}

impl<W: RegisterWriter + ?Sized> RegisterWriter for &mut W {
    fn write_register(&mut self, bank: Bank, address: u8, data: u8) {
        (**self).write_register(bank, address, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_split_across_banks() {
        for channel in 0..3 {
            assert_eq!(Bank::for_channel(channel), Bank::A);
        }
        for channel in 3..6 {
            assert_eq!(Bank::for_channel(channel), Bank::B);
        }
    }

    #[test]
    fn channel_offset_repeats_per_bank() {
        assert_eq!(channel_offset(0), 0);
        assert_eq!(channel_offset(2), 2);
        assert_eq!(channel_offset(3), 0);
        assert_eq!(channel_offset(5), 2);
    }

    #[test]
    fn writer_through_mutable_reference() {
        struct Last(Option<RegisterWrite>);
        impl RegisterWriter for Last {
            fn write_register(&mut self, bank: Bank, address: u8, data: u8) {
                self.0 = Some(RegisterWrite { bank, address, data });
            }
        }

        fn send<W: RegisterWriter>(mut writer: W) {
            writer.write_register(Bank::B, 0x30, 0x12);
        }

        let mut last = Last(None);
        send(&mut last);
        assert_eq!(
            last.0,
            Some(RegisterWrite { bank: Bank::B, address: 0x30, data: 0x12 })
        );
    }
}
