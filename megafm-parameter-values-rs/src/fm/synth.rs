use super::channel::{Channel, ChannelParameter};
use super::error::SynthError;
use super::global::{GlobalParameter, GlobalParameters};
use super::operator::{Operator, OperatorParameter};
use super::parameter::ParameterKind;
use super::preset::Preset;
use super::CHANNEL_COUNT;
use crate::registers::{Bank, RegisterWriter, SSG_EG, TIMER_CONTROL};

/// Channel that [`Synth::apply_preset()`] writes to.
pub const PRESET_CHANNEL: u8 = 0;

/// The YM2612 voice model: global LFO settings and six channels, bound to
/// the writer that delivers register bytes to the chip.
///
/// Every mutating call writes the affected registers before it returns, so
/// the chip always reflects the model.
///
/// # Examples
///
/// ```
/// use megafm::fm::{OperatorParameter, Synth};
/// use megafm::recorder::RegisterShadow;
/// use megafm::registers::Bank;
///
/// let mut synth = Synth::new(RegisterShadow::new());
/// synth.set_operator_parameter(0, 0, OperatorParameter::Multiple, 5).unwrap();
/// synth.set_operator_parameter(0, 0, OperatorParameter::Detune, 3).unwrap();
///
/// assert_eq!(synth.writer().read(Bank::A, 0x30), 0x35);
/// ```
pub struct Synth<W: RegisterWriter> {
    writer: W,
    globals: GlobalParameters,
    channels: [Channel; CHANNEL_COUNT],
}

impl<W: RegisterWriter> Synth<W> {
    /// Build the default voice model and reset the chip through `writer`.
    pub fn new(writer: W) -> Self {
        let mut synth = Self {
            writer,
            globals: GlobalParameters::new(),
            channels: core::array::from_fn(|index| Channel::new(index as u8)),
        };
        synth.reset_chip();
        synth
    }

    /// Restore every parameter to its default and bring the chip to a
    /// silent, known register state.
    ///
    /// Writes, all on bank A: the LFO register, channel 3 normal mode, key
    /// off for all six channels, and zero to the four SSG-EG registers.
    pub fn initialize(&mut self) {
        self.globals = GlobalParameters::new();
        self.channels = core::array::from_fn(|index| Channel::new(index as u8));
        self.reset_chip();
    }

    // ── Access ───────────────────────────────────────────────────────

    /// The register writer, for inspecting what reached the chip.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Mutable access to the register writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the synth and return its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Chip-wide LFO settings.
    pub fn globals(&self) -> &GlobalParameters {
        &self.globals
    }

    /// Current value of a global parameter.
    pub fn global_parameter_value(&self, parameter: GlobalParameter) -> u16 {
        self.globals.parameter_value(parameter)
    }

    /// Returns [`SynthError::InvalidChannelIndex`] if `index >= CHANNEL_COUNT`.
    pub fn channel(&self, index: u8) -> Result<&Channel, SynthError> {
        self.channels.get(index as usize).ok_or_else(|| {
            #[cfg(feature = "defmt")]
            defmt::warn!("channel index {} out of bounds", index);
            SynthError::InvalidChannelIndex
        })
    }

    /// All six channels, in index order.
    pub fn channels(&self) -> &[Channel; CHANNEL_COUNT] {
        &self.channels
    }

    /// Operator `index` of `channel`.
    ///
    /// Returns [`SynthError::InvalidChannelIndex`] or
    /// [`SynthError::InvalidOperatorIndex`] for an out-of-range index.
    pub fn operator(&self, channel: u8, index: u8) -> Result<&Operator, SynthError> {
        self.channel(channel)?.operator(index)
    }

    // ── Parameter edits ──────────────────────────────────────────────

    /// Set a global parameter and rewrite the LFO register.
    pub fn set_global_parameter(&mut self, parameter: GlobalParameter, value: u16) {
        self.globals
            .set_parameter_value(parameter, value, &mut self.writer);
    }

    /// Set a channel parameter and rewrite the registers that depend on it.
    ///
    /// Nothing is written if `channel` is out of range.
    pub fn set_channel_parameter(
        &mut self,
        channel: u8,
        parameter: ChannelParameter,
        value: u16,
    ) -> Result<(), SynthError> {
        let channel = self.channel_index(channel)?;
        self.channels[channel].set_parameter_value(parameter, value, &mut self.writer);
        Ok(())
    }

    /// Set an operator parameter and rewrite its register.
    ///
    /// Nothing is written if `channel` or `operator` is out of range.
    pub fn set_operator_parameter(
        &mut self,
        channel: u8,
        operator: u8,
        parameter: OperatorParameter,
        value: u16,
    ) -> Result<(), SynthError> {
        let channel = self.channel_index(channel)?;
        self.channels[channel]
            .operator_mut(operator)?
            .set_parameter_value(parameter, value, &mut self.writer);
        Ok(())
    }

    /// Index-based form of [`set_global_parameter()`](Self::set_global_parameter).
    pub fn set_global_parameter_at(&mut self, index: usize, value: u16) -> Result<(), SynthError> {
        self.set_global_parameter(GlobalParameter::try_from(index)?, value);
        Ok(())
    }

    /// Index-based form of [`set_channel_parameter()`](Self::set_channel_parameter).
    pub fn set_channel_parameter_at(
        &mut self,
        channel: u8,
        index: usize,
        value: u16,
    ) -> Result<(), SynthError> {
        self.set_channel_parameter(channel, ChannelParameter::try_from(index)?, value)
    }

    /// Index-based form of [`set_operator_parameter()`](Self::set_operator_parameter).
    pub fn set_operator_parameter_at(
        &mut self,
        channel: u8,
        operator: u8,
        index: usize,
        value: u16,
    ) -> Result<(), SynthError> {
        self.set_operator_parameter(channel, operator, OperatorParameter::try_from(index)?, value)
    }

    // ── Notes ────────────────────────────────────────────────────────

    /// Start a note on `channel`.
    ///
    /// A silent channel is keyed off, has every operator and channel
    /// register rewritten from the model, and is then keyed on. A channel
    /// that is already sounding is left untouched.
    pub fn play_note(&mut self, channel: u8) -> Result<(), SynthError> {
        let channel = self.channel_index(channel)?;
        self.channels[channel].play_note(&mut self.writer);
        Ok(())
    }

    /// Key `channel` off without rewriting its parameters.
    pub fn stop_note(&mut self, channel: u8) -> Result<(), SynthError> {
        let channel = self.channel_index(channel)?;
        self.channels[channel].stop_note(&mut self.writer);
        Ok(())
    }

    /// Rewrite every register derived from the model: the LFO register and
    /// all operator and channel registers of the six channels.
    ///
    /// Key state is not touched.
    pub fn update_all(&mut self) {
        self.globals.update(&mut self.writer);
        for channel in &self.channels {
            channel.update(&mut self.writer);
        }
    }

    // ── Presets ──────────────────────────────────────────────────────

    /// Apply `preset` to the global settings and to channel
    /// [`PRESET_CHANNEL`].
    ///
    /// Values go through the normal setters in order: globals, channel
    /// parameters, then each operator's parameters. Out-of-range values
    /// wrap exactly as manual edits do.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.apply_globals(preset);
        self.apply_voice(PRESET_CHANNEL as usize, preset);
    }

    /// Like [`apply_preset()`](Self::apply_preset), but writes the voice to
    /// `channel` instead of [`PRESET_CHANNEL`].
    pub fn apply_preset_to_channel(&mut self, channel: u8, preset: &Preset) -> Result<(), SynthError> {
        let channel = self.channel_index(channel)?;
        self.apply_globals(preset);
        self.apply_voice(channel, preset);
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn channel_index(&self, channel: u8) -> Result<usize, SynthError> {
        self.channel(channel).map(|_| channel as usize)
    }

    fn apply_globals(&mut self, preset: &Preset) {
        for (&parameter, &value) in GlobalParameter::ALL.iter().zip(&preset.global) {
            self.globals
                .set_parameter_value(parameter, value, &mut self.writer);
        }
    }

    fn apply_voice(&mut self, channel: usize, preset: &Preset) {
        let channel = &mut self.channels[channel];
        for (&parameter, &value) in ChannelParameter::ALL.iter().zip(&preset.channel) {
            channel.set_parameter_value(parameter, value, &mut self.writer);
        }
        for (op, values) in preset.operators.iter().enumerate() {
            let operator = &mut channel.operators_mut()[op];
            for (&parameter, &value) in OperatorParameter::ALL.iter().zip(values) {
                operator.set_parameter_value(parameter, value, &mut self.writer);
            }
        }
    }

    fn reset_chip(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("resetting YM2612 register state");

        self.globals.update(&mut self.writer);
        // Channel 3 normal mode, timers stopped.
        self.writer.write_register(Bank::A, TIMER_CONTROL, 0);
        for channel in &mut self.channels {
            channel.stop_note(&mut self.writer);
        }
        for address in SSG_EG {
            self.writer.write_register(Bank::A, address, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fm::channel::{key_code, NoteState};
    use crate::fm::operator::OperatorRegister;
    use crate::fm::parameter::WRAP_SENTINEL;
    use crate::fm::OPERATOR_COUNT;
    use crate::recorder::{RegisterLog, RegisterShadow};
    use crate::registers::{RegisterWrite, KEY_ON_OFF, LFO};

    type Log = RegisterLog<256>;

    // ── Initialization ───────────────────────────────────────────────

    #[test]
    fn startup_write_sequence() {
        let synth = Synth::new(Log::new());
        let writes = synth.writer().writes();

        let expected: [(u8, u8); 12] = [
            (0x22, 0x0B),
            (0x27, 0x00),
            (0x28, 0x00),
            (0x28, 0x01),
            (0x28, 0x02),
            (0x28, 0x04),
            (0x28, 0x05),
            (0x28, 0x06),
            (0x90, 0x00),
            (0x94, 0x00),
            (0x98, 0x00),
            (0x9C, 0x00),
        ];
        assert_eq!(writes.len(), expected.len());
        for (write, (address, data)) in writes.iter().zip(expected) {
            assert_eq!(*write, RegisterWrite { bank: Bank::A, address, data });
        }
    }

    #[test]
    fn startup_is_deterministic() {
        let first = Synth::new(Log::new()).into_writer();
        let second = Synth::new(Log::new()).into_writer();
        assert_eq!(first, second);
    }

    #[test]
    fn initialize_restores_defaults_and_repeats_reset() {
        let mut synth = Synth::new(Log::new());
        let startup = synth.writer().clone();

        synth
            .set_channel_parameter(3, ChannelParameter::Octave, 1)
            .unwrap();
        synth.set_global_parameter(GlobalParameter::LfoEnable, 0);
        synth.play_note(3).unwrap();
        synth.writer_mut().clear();

        synth.initialize();

        assert_eq!(synth.writer(), &startup);
        assert_eq!(synth.channel(3).unwrap().parameter_value(ChannelParameter::Octave), 4);
        assert_eq!(synth.global_parameter_value(GlobalParameter::LfoEnable), 1);
        assert!(synth
            .channels()
            .iter()
            .all(|c| c.state() == NoteState::Silent));
    }

    // ── Access ───────────────────────────────────────────────────────

    #[test]
    fn invalid_indices_are_rejected() {
        let mut synth = Synth::new(RegisterShadow::new());
        let writes = synth.writer().write_count();

        assert_eq!(synth.channel(6).err(), Some(SynthError::InvalidChannelIndex));
        assert_eq!(synth.operator(0, 4).err(), Some(SynthError::InvalidOperatorIndex));
        assert_eq!(synth.play_note(6), Err(SynthError::InvalidChannelIndex));
        assert_eq!(synth.stop_note(200), Err(SynthError::InvalidChannelIndex));
        assert_eq!(
            synth.set_channel_parameter_at(0, 8, 1),
            Err(SynthError::InvalidParameterIndex)
        );
        assert_eq!(
            synth.set_operator_parameter(0, 4, OperatorParameter::TotalLevel, 1),
            Err(SynthError::InvalidOperatorIndex)
        );
        assert_eq!(
            synth.set_global_parameter_at(2, 1),
            Err(SynthError::InvalidParameterIndex)
        );

        // Nothing reached the chip.
        assert_eq!(synth.writer().write_count(), writes);
    }

    #[test]
    fn operator_edits_target_channel_bank() {
        let mut synth = Synth::new(RegisterShadow::new());
        synth
            .set_operator_parameter_at(4, 2, OperatorParameter::TotalLevel as usize, 0x55)
            .unwrap();

        let op = synth.operator(4, 2).unwrap();
        let address = op.register_address(OperatorRegister::TotalLevel);
        assert_eq!(address, 0x40 + 1 + 8);
        assert_eq!(synth.writer().read(Bank::B, address), 0x55);
        assert!(!synth.writer().is_written(Bank::A, address));
    }

    // ── Notes ────────────────────────────────────────────────────────

    #[test]
    fn play_and_stop_use_key_codes() {
        let mut synth = Synth::new(Log::new());

        synth.play_note(4).unwrap();
        assert_eq!(synth.writer().last_value(Bank::A, KEY_ON_OFF), Some(0xF0 | key_code(4)));
        assert_eq!(synth.writer().last_value(Bank::A, KEY_ON_OFF), Some(0xF5));
        assert_eq!(synth.channel(4).unwrap().state(), NoteState::Sounding);

        synth.stop_note(4).unwrap();
        assert_eq!(synth.writer().last_value(Bank::A, KEY_ON_OFF), Some(0x05));
        assert_eq!(synth.channel(4).unwrap().state(), NoteState::Silent);
    }

    #[test]
    fn play_note_rebroadcasts_parameters() {
        let mut synth = Synth::new(RegisterShadow::new());
        synth
            .set_channel_parameter(1, ChannelParameter::Feedback, 5)
            .unwrap();

        // A lost write: the model and the chip disagree.
        synth.writer_mut().clear();
        synth.play_note(1).unwrap();

        assert_eq!(synth.writer().read(Bank::A, 0xB1), 5 << 3);
        for op in 0..OPERATOR_COUNT as u8 {
            let operator = synth.operator(1, op).unwrap();
            for register in OperatorRegister::ALL {
                assert_eq!(
                    synth.writer().read(Bank::A, operator.register_address(register)),
                    operator.encode(register)
                );
            }
        }
    }

    #[test]
    fn update_all_is_idempotent() {
        let mut synth = Synth::new(RegisterShadow::new());
        synth
            .set_channel_parameter(5, ChannelParameter::Stereo, 1)
            .unwrap();
        synth.set_global_parameter(GlobalParameter::LfoRate, 6);

        synth.writer_mut().clear();
        synth.update_all();
        let once = synth.writer().clone();

        synth.update_all();
        assert_eq!(synth.writer(), &once);
        assert_eq!(once.read(Bank::A, LFO), 0x0E);
        assert_eq!(once.read(Bank::B, 0xB6), 0x40);
    }

    // ── Presets ──────────────────────────────────────────────────────

    fn sample_preset() -> Preset {
        Preset {
            global: [0, 5],
            channel: [3, 733, 5, 4, 6, 1, 2, 2],
            operators: [
                [3, 5, 20, 1, 31, 1, 10, 3, 4, 7],
                [1, 2, 30, 0, 28, 0, 12, 4, 5, 8],
                [2, 1, 40, 2, 25, 0, 14, 5, 6, 9],
                [0, 4, 0, 3, 20, 1, 16, 6, 7, 10],
            ],
        }
    }

    #[test]
    fn apply_preset_sets_channel_zero_only() {
        let mut synth = Synth::new(RegisterShadow::new());
        let preset = sample_preset();

        synth.apply_preset(&preset);

        assert_eq!(Preset::capture(&synth, 0), Ok(preset));
        for channel in 1..CHANNEL_COUNT as u8 {
            let untouched = Preset::capture(&synth, channel).unwrap();
            assert_eq!(untouched.channel, Preset::default().channel);
            assert_eq!(untouched.operators, Preset::default().operators);
        }
        assert_eq!(synth.writer().read(Bank::A, 0xB0), 0x34);
        assert_eq!(synth.writer().read(Bank::A, 0x30), 0x35);
        assert_eq!(synth.writer().read(Bank::A, LFO), 0x05);
    }

    #[test]
    fn apply_preset_writes_in_fixed_order() {
        let mut synth = Synth::new(Log::new());
        synth.writer_mut().clear();

        synth.apply_preset(&sample_preset());
        let writes = synth.writer().writes();

        // 2 global writes, channel: note (2) + freq (2) + octave (2) +
        // 5 single-register writes, then 40 operator writes.
        assert_eq!(writes.len(), 2 + 6 + 5 + 40);

        let globals_and_channel: [u8; 13] = [
            LFO, LFO, // LFO on, LFO rate
            0xA4, 0xA0, // note
            0xA4, 0xA0, // frequency
            0xA4, 0xA0, // octave
            0xB0, 0xB0, // algorithm, feedback
            0xB4, 0xB4, 0xB4, // AMS, FMS, stereo
        ];
        for (write, address) in writes.iter().zip(globals_and_channel) {
            assert_eq!(write.address, address);
        }

        let operator_zero: [u8; 10] = [
            0x30, 0x30, 0x40, 0x50, 0x50, 0x60, 0x60, 0x70, 0x80, 0x80,
        ];
        for (write, address) in writes[13..].iter().zip(operator_zero) {
            assert_eq!(write.address, address);
        }
        assert_eq!(writes[23].address, 0x34);
        assert_eq!(writes[writes.len() - 1].address, 0x8C);
    }

    #[test]
    fn apply_preset_wraps_out_of_range_values() {
        let mut synth = Synth::new(RegisterShadow::new());
        let mut preset = sample_preset();
        preset.global[1] = 8;
        preset.channel[ChannelParameter::Algorithm as usize] = WRAP_SENTINEL;
        preset.operators[2][OperatorParameter::TotalLevel as usize] = 200;

        synth.apply_preset(&preset);

        assert_eq!(synth.global_parameter_value(GlobalParameter::LfoRate), 0);
        assert_eq!(
            synth.channel(0).unwrap().parameter_value(ChannelParameter::Algorithm),
            7
        );
        assert_eq!(
            synth.operator(0, 2).unwrap().parameter_value(OperatorParameter::TotalLevel),
            0
        );
    }

    #[test]
    fn apply_preset_to_other_channel() {
        let mut synth = Synth::new(RegisterShadow::new());
        let preset = sample_preset();

        synth.apply_preset_to_channel(3, &preset).unwrap();

        assert_eq!(Preset::capture(&synth, 3), Ok(preset));
        assert_eq!(Preset::capture(&synth, 0).unwrap().channel, Preset::default().channel);
        assert_eq!(synth.writer().read(Bank::B, 0xB0), 0x34);
        assert_eq!(
            synth.apply_preset_to_channel(6, &preset),
            Err(SynthError::InvalidChannelIndex)
        );
    }
}
