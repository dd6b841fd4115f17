//! YM2612 voice model and register encoding.
//!
//! This module holds the complete editable state of the chip, made up of
//! two global LFO settings, six channels and four operators per channel,
//! and keeps the chip's registers in step with it. It is the only place
//! that knows how parameters are packed into register bytes.
//!
//! # Architecture
//!
//! ```text
//! Synth<W: RegisterWriter>
//! ├── GlobalParameters      [LFO On] [LFO Frq]              -> 0x22
//! └── Channel × 6           [Note] [Freq Num] [Octave] ...  -> 0xA0..0xB6
//!     └── Operator × 4      [DT1] [MUL] [TL] ...            -> 0x30..0x8E
//! ```
//!
//! Each parameter kind is an enum with a static descriptor table
//! ([`ParameterSpec`]) giving its name, maximum, edit step and the
//! register group to recompute when it changes. Setting a value runs it
//! through [`ParameterSpec::wrap()`], stores it, and immediately writes
//! every register the parameter contributes to.
//!
//! # Banks and addresses
//!
//! Channels 0–2 live on bank A and channels 3–5 on bank B. Within a bank
//! a channel register is at `base + channel % 3` and an operator register
//! at `base + channel % 3 + operator * 4`. Global registers and the key
//! on/off register are always written to bank A.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. All state is fixed-size arrays sized by
//! [`CHANNEL_COUNT`] and [`OPERATOR_COUNT`].

mod channel;
mod editor;
mod error;
mod global;
mod operator;
mod parameter;
mod preset;
mod synth;

pub use channel::{
    key_code, Channel, ChannelParameter, ChannelRegister, ChannelUpdate, NoteState,
    CHANNEL_PARAMETER_COUNT, DEFAULT_CHANNEL_VALUES, NOTE_FREQUENCIES, NOTE_NAMES,
};
pub use editor::{Editor, Selection, SELECTION_COUNT};
pub use error::SynthError;
pub use global::{
    GlobalParameter, GlobalParameters, GlobalRegister, DEFAULT_GLOBAL_VALUES,
    GLOBAL_PARAMETER_COUNT,
};
pub use operator::{
    Operator, OperatorParameter, OperatorRegister, DEFAULT_OPERATOR_VALUES,
    OPERATOR_PARAMETER_COUNT,
};
pub use parameter::{ParameterKind, ParameterSpec, ParameterValues, WRAP_SENTINEL};
pub use preset::Preset;
pub use synth::{Synth, PRESET_CHANNEL};

/// Number of FM channels on the chip.
pub const CHANNEL_COUNT: usize = 6;

/// Number of operators per channel.
pub const OPERATOR_COUNT: usize = 4;
