//! In-memory register writers.
//!
//! The YM2612 cannot be read back, so these writers stand in for the chip
//! wherever the written state has to be inspected: [`RegisterShadow`] keeps
//! the last byte of every register, [`RegisterLog`] keeps the ordered write
//! sequence.

use heapless::Vec;

use crate::registers::{Bank, RegisterWrite, RegisterWriter};

const BANK_SIZE: usize = 256;

// ── RegisterShadow ───────────────────────────────────────────────────────

/// Image of the last byte written to every register of both banks.
///
/// Registers that were never written read as `0`; use
/// [`is_written()`](Self::is_written) to tell the two apart.
#[derive(Debug, Clone)]
pub struct RegisterShadow {
    bytes: [[u8; BANK_SIZE]; 2],
    written: [[bool; BANK_SIZE]; 2],
    write_count: usize,
}

impl Default for RegisterShadow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterShadow {
    /// Create an empty shadow with every register reading `0`.
    pub const fn new() -> Self {
        Self {
            bytes: [[0; BANK_SIZE]; 2],
            written: [[false; BANK_SIZE]; 2],
            write_count: 0,
        }
    }

    /// Last byte written to `address` in `bank`, or `0` if never written.
    pub fn read(&self, bank: Bank, address: u8) -> u8 {
        self.bytes[bank.index()][address as usize]
    }

    /// Returns `true` if `address` in `bank` has been written at least once.
    pub fn is_written(&self, bank: Bank, address: u8) -> bool {
        self.written[bank.index()][address as usize]
    }

    /// Total number of writes received, repeated writes included.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Forget all written state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl RegisterWriter for RegisterShadow {
    fn write_register(&mut self, bank: Bank, address: u8, data: u8) {
        self.bytes[bank.index()][address as usize] = data;
        self.written[bank.index()][address as usize] = true;
        self.write_count += 1;
    }
}

impl PartialEq for RegisterShadow {
    /// Two shadows are equal when they hold the same register image; the
    /// number of writes it took to get there is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes && self.written == other.written
    }
}

impl Eq for RegisterShadow {}

// ── RegisterLog ──────────────────────────────────────────────────────────

/// Ordered journal of register writes with a fixed capacity of `N`.
///
/// Writes arriving after the journal is full are counted in
/// [`dropped()`](Self::dropped) and otherwise discarded.
///
/// # Examples
///
/// ```
/// use megafm::recorder::RegisterLog;
/// use megafm::registers::{Bank, RegisterWriter};
///
/// let mut log: RegisterLog<4> = RegisterLog::new();
/// log.write_register(Bank::A, 0x28, 0xF0);
///
/// assert_eq!(log.writes().len(), 1);
/// assert_eq!(log.last_value(Bank::A, 0x28), Some(0xF0));
/// assert_eq!(log.last_value(Bank::B, 0x28), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterLog<const N: usize> {
    writes: Vec<RegisterWrite, N>,
    dropped: usize,
}

impl<const N: usize> RegisterLog<N> {
    pub const fn new() -> Self {
        Self {
            writes: Vec::new(),
            dropped: 0,
        }
    }

    /// Recorded writes, oldest first.
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Number of writes discarded because the journal was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Most recent byte recorded for `address` in `bank`.
    pub fn last_value(&self, bank: Bank, address: u8) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.bank == bank && w.address == address)
            .map(|w| w.data)
    }

    pub fn clear(&mut self) {
        self.writes.clear();
        self.dropped = 0;
    }
}

impl<const N: usize> RegisterWriter for RegisterLog<N> {
    fn write_register(&mut self, bank: Bank, address: u8, data: u8) {
        if self
            .writes
            .push(RegisterWrite { bank, address, data })
            .is_err()
        {
            self.dropped += 1;
        }
    }
}
