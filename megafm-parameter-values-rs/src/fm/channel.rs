use super::error::SynthError;
use super::operator::{Operator, DEFAULT_OPERATOR_VALUES};
use super::parameter::{ParameterKind, ParameterSpec, ParameterValues};
use super::OPERATOR_COUNT;
use crate::registers::{
    channel_offset, Bank, RegisterWriter, ALGORITHM_FEEDBACK, FREQUENCY_HIGH_OCTAVE,
    FREQUENCY_LOW, KEY_ON_ALL_OPERATORS, KEY_ON_OFF, STEREO_LFO_SENSITIVITY,
};

/// Number of parameters owned by each channel.
pub const CHANNEL_PARAMETER_COUNT: usize = 8;

/// Power-on channel values: note C at octave 4, algorithm 0, both speakers.
pub const DEFAULT_CHANNEL_VALUES: [u16; CHANNEL_PARAMETER_COUNT] = [1, 653, 4, 0, 0, 0, 0, 3];

/// 11-bit frequency numbers for the 12 note indices, starting at B.
pub const NOTE_FREQUENCIES: [u16; 12] = [
    617, 653, 692, 733, 777, 823, 872, 924, 979, 1037, 1099, 1164,
];

/// Display names for the 12 note indices, matching [`NOTE_FREQUENCIES`].
pub const NOTE_NAMES: [&str; 12] = [
    "B ", "C ", "C#", "D ", "D#", "E ", "F ", "F#", "G ", "G#", "A ", "A#",
];

/// Per-channel synthesis parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelParameter {
    /// Note index into [`NOTE_FREQUENCIES`], 0–11.
    Note,
    /// 11-bit frequency number, 0–2047.
    Frequency,
    /// Octave (block), 0–7.
    Octave,
    /// Operator connection graph, 0–7.
    Algorithm,
    /// Operator 1 self-modulation depth, 0–7.
    Feedback,
    /// LFO amplitude modulation sensitivity, 0–3.
    AmSensitivity,
    /// LFO frequency modulation sensitivity, 0–7.
    FmSensitivity,
    /// Output routing, 0–3 (bit 1 = left, bit 0 = right).
    Stereo,
}

/// Channel register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelRegister {
    /// 0xA4: octave and frequency bits 8–10.
    FrequencyHighOctave,
    /// 0xA0: frequency bits 0–7.
    FrequencyLow,
    /// 0xB0: algorithm and feedback.
    AlgorithmFeedback,
    /// 0xB4: stereo, AMS and FMS.
    StereoLfoSensitivity,
}

impl ChannelRegister {
    /// Address for channel 0.
    pub const fn base_address(self) -> u8 {
        match self {
            ChannelRegister::FrequencyHighOctave => FREQUENCY_HIGH_OCTAVE,
            ChannelRegister::FrequencyLow => FREQUENCY_LOW,
            ChannelRegister::AlgorithmFeedback => ALGORITHM_FEEDBACK,
            ChannelRegister::StereoLfoSensitivity => STEREO_LFO_SENSITIVITY,
        }
    }
}

/// Recompute routine for a channel parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelUpdate {
    /// Look the note up, store it as the frequency, then run [`Frequency`](Self::Frequency).
    Note,
    /// Write the frequency registers, high byte first.
    Frequency,
    /// Write the algorithm/feedback register.
    AlgorithmFeedback,
    /// Write the stereo/LFO sensitivity register.
    StereoLfoSensitivity,
}

impl ChannelUpdate {
    /// Registers written by this update, in write order.
    ///
    /// [`Note`](Self::Note) writes nothing itself; its writes happen
    /// through the frequency cascade.
    pub const fn registers(self) -> &'static [ChannelRegister] {
        match self {
            ChannelUpdate::Note => &[],
            // The high byte latches on the low byte write.
            ChannelUpdate::Frequency => &[
                ChannelRegister::FrequencyHighOctave,
                ChannelRegister::FrequencyLow,
            ],
            ChannelUpdate::AlgorithmFeedback => &[ChannelRegister::AlgorithmFeedback],
            ChannelUpdate::StereoLfoSensitivity => &[ChannelRegister::StereoLfoSensitivity],
        }
    }
}

static CHANNEL_PARAMETERS: [ParameterSpec<ChannelUpdate>; CHANNEL_PARAMETER_COUNT] = [
    ParameterSpec::new("Note", 11, ChannelUpdate::Note).with_width(2),
    ParameterSpec::new("Freq Num", 2047, ChannelUpdate::Frequency)
        .with_step(4)
        .with_width(4),
    ParameterSpec::new("Octave", 7, ChannelUpdate::Frequency),
    ParameterSpec::new("Algorithm", 7, ChannelUpdate::AlgorithmFeedback),
    ParameterSpec::new("Feedback", 7, ChannelUpdate::AlgorithmFeedback),
    ParameterSpec::new("LFO AMS", 3, ChannelUpdate::StereoLfoSensitivity),
    ParameterSpec::new("LFO FMS", 7, ChannelUpdate::StereoLfoSensitivity),
    ParameterSpec::new("Stereo", 3, ChannelUpdate::StereoLfoSensitivity),
];

impl ParameterKind for ChannelParameter {
    type Update = ChannelUpdate;

    const ALL: &'static [Self] = &[
        ChannelParameter::Note,
        ChannelParameter::Frequency,
        ChannelParameter::Octave,
        ChannelParameter::Algorithm,
        ChannelParameter::Feedback,
        ChannelParameter::AmSensitivity,
        ChannelParameter::FmSensitivity,
        ChannelParameter::Stereo,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn spec(self) -> &'static ParameterSpec<ChannelUpdate> {
        &CHANNEL_PARAMETERS[self.index()]
    }
}

impl TryFrom<usize> for ChannelParameter {
    type Error = SynthError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(SynthError::InvalidParameterIndex)
    }
}

/// Whether a channel is currently keyed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteState {
    /// Keyed off.
    #[default]
    Silent,
    /// Keyed on; further play requests are ignored.
    Sounding,
}

/// Key code of a channel in the key on/off register.
///
/// Code 3 is unused by the chip, so channels 3–5 map to codes 4–6.
///
/// ```
/// use megafm::fm::key_code;
///
/// assert_eq!(key_code(1), 1);
/// assert_eq!(key_code(4), 5);
/// ```
pub const fn key_code(channel: u8) -> u8 {
    if channel > 2 {
        channel + 1
    } else {
        channel
    }
}

/// One of the six FM voices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    index: u8,
    values: ParameterValues<ChannelParameter, CHANNEL_PARAMETER_COUNT>,
    operators: [Operator; OPERATOR_COUNT],
    state: NoteState,
}

impl Channel {
    /// Create channel `index` with default parameters and operators.
    pub(crate) fn new(index: u8) -> Self {
        Self {
            index,
            values: ParameterValues::from_array(DEFAULT_CHANNEL_VALUES),
            operators: core::array::from_fn(|op| {
                Operator::new(index, op as u8, DEFAULT_OPERATOR_VALUES[op])
            }),
            state: NoteState::Silent,
        }
    }

    /// Channel index (0–5).
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Whether the channel is keyed on.
    pub fn state(&self) -> NoteState {
        self.state
    }

    /// Current value of `parameter`.
    pub fn parameter_value(&self, parameter: ChannelParameter) -> u16 {
        self.values.get(parameter)
    }

    /// All parameter values in [`ChannelParameter`] order.
    pub fn parameter_values(&self) -> &[u16; CHANNEL_PARAMETER_COUNT] {
        self.values.as_array()
    }

    /// Returns [`SynthError::InvalidOperatorIndex`] if `index >= OPERATOR_COUNT`.
    pub fn operator(&self, index: u8) -> Result<&Operator, SynthError> {
        self.operators
            .get(index as usize)
            .ok_or(SynthError::InvalidOperatorIndex)
    }

    /// Returns [`SynthError::InvalidOperatorIndex`] if `index >= OPERATOR_COUNT`.
    pub fn operator_mut(&mut self, index: u8) -> Result<&mut Operator, SynthError> {
        self.operators
            .get_mut(index as usize)
            .ok_or(SynthError::InvalidOperatorIndex)
    }

    /// The four operators, in index order.
    pub fn operators(&self) -> &[Operator; OPERATOR_COUNT] {
        &self.operators
    }

    pub(crate) fn operators_mut(&mut self) -> &mut [Operator; OPERATOR_COUNT] {
        &mut self.operators
    }

    /// Set a parameter and rewrite the registers that depend on it.
    ///
    /// Setting [`Note`](ChannelParameter::Note) overwrites
    /// [`Frequency`](ChannelParameter::Frequency) with the note's table
    /// value and writes the frequency registers.
    pub fn set_parameter_value<W: RegisterWriter + ?Sized>(
        &mut self,
        parameter: ChannelParameter,
        value: u16,
        writer: &mut W,
    ) {
        self.values.set(parameter, value);
        self.recompute(parameter.spec().update, writer);
    }

    /// Returns [`SynthError::InvalidParameterIndex`] if
    /// `index >= CHANNEL_PARAMETER_COUNT`.
    pub fn set_parameter_value_at<W: RegisterWriter + ?Sized>(
        &mut self,
        index: usize,
        value: u16,
        writer: &mut W,
    ) -> Result<(), SynthError> {
        let parameter = ChannelParameter::try_from(index)?;
        self.set_parameter_value(parameter, value, writer);
        Ok(())
    }

    /// Rewrite every operator register, then the channel's own registers.
    pub fn update<W: RegisterWriter + ?Sized>(&self, writer: &mut W) {
        for op in &self.operators {
            op.update(writer);
        }
        self.recompute_registers(ChannelUpdate::AlgorithmFeedback, writer);
        self.recompute_registers(ChannelUpdate::StereoLfoSensitivity, writer);
        self.recompute_registers(ChannelUpdate::Frequency, writer);
    }

    /// Key the channel on after refreshing all of its registers.
    ///
    /// Only acts when the channel is [`Silent`](NoteState::Silent); returns
    /// `true` if the note was started.
    pub fn play_note<W: RegisterWriter + ?Sized>(&mut self, writer: &mut W) -> bool {
        if self.state == NoteState::Sounding {
            return false;
        }
        self.key_off(writer);
        self.update(writer);
        self.key_on(writer);
        self.state = NoteState::Sounding;
        true
    }

    /// Key the channel off. Registers are not refreshed.
    pub fn stop_note<W: RegisterWriter + ?Sized>(&mut self, writer: &mut W) {
        self.key_off(writer);
        self.state = NoteState::Silent;
    }

    /// Register byte for `register` derived from the current values.
    pub fn encode(&self, register: ChannelRegister) -> u8 {
        use ChannelParameter::*;

        let v = |parameter| self.values.get(parameter);
        let byte = match register {
            ChannelRegister::FrequencyHighOctave => (v(Frequency) >> 8) | (v(Octave) << 3),
            ChannelRegister::FrequencyLow => v(Frequency) & 0xFF,
            ChannelRegister::AlgorithmFeedback => v(Algorithm) | (v(Feedback) << 3),
            ChannelRegister::StereoLfoSensitivity => {
                (v(Stereo) << 6) | (v(AmSensitivity) << 4) | v(FmSensitivity)
            }
        };
        byte as u8
    }

    /// Address of `register` for this channel within its bank.
    pub fn register_address(&self, register: ChannelRegister) -> u8 {
        register.base_address() + channel_offset(self.index)
    }

    pub(crate) fn key_on<W: RegisterWriter + ?Sized>(&self, writer: &mut W) {
        #[cfg(feature = "defmt")]
        defmt::debug!("channel {}: key on", self.index);

        writer.write_register(Bank::A, KEY_ON_OFF, KEY_ON_ALL_OPERATORS | key_code(self.index));
    }

    pub(crate) fn key_off<W: RegisterWriter + ?Sized>(&self, writer: &mut W) {
        #[cfg(feature = "defmt")]
        defmt::debug!("channel {}: key off", self.index);

        writer.write_register(Bank::A, KEY_ON_OFF, key_code(self.index));
    }

    fn recompute<W: RegisterWriter + ?Sized>(&mut self, update: ChannelUpdate, writer: &mut W) {
        if update == ChannelUpdate::Note {
            let note = self.values.get(ChannelParameter::Note) as usize;
            self.values
                .set(ChannelParameter::Frequency, NOTE_FREQUENCIES[note]);
            self.recompute(ChannelParameter::Frequency.spec().update, writer);
            return;
        }
        self.recompute_registers(update, writer);
    }

    fn recompute_registers<W: RegisterWriter + ?Sized>(&self, update: ChannelUpdate, writer: &mut W) {
        for &register in update.registers() {
            writer.write_register(
                Bank::for_channel(self.index),
                self.register_address(register),
                self.encode(register),
            );
        }
    }
}
