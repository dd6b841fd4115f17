use core::fmt::Write;

use super::channel::{ChannelParameter, CHANNEL_PARAMETER_COUNT, NOTE_NAMES};
use super::error::SynthError;
use super::operator::{OperatorParameter, OPERATOR_PARAMETER_COUNT};
use super::parameter::ParameterKind;
use super::synth::Synth;
use super::{CHANNEL_COUNT, OPERATOR_COUNT};
use crate::registers::RegisterWriter;

/// Number of editable entries per channel: the channel's own parameters
/// followed by every operator's parameters.
pub const SELECTION_COUNT: usize =
    CHANNEL_PARAMETER_COUNT + OPERATOR_COUNT * OPERATOR_PARAMETER_COUNT;

/// One editable entry of the focused channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// A parameter of the channel itself.
    Channel(ChannelParameter),
    /// Operator index and parameter.
    Operator(u8, OperatorParameter),
}

/// Cursor over the parameters of one channel, driven by a front panel.
///
/// The editor holds no parameter values of its own. Every edit goes
/// through the [`Synth`] setters, so values wrap and registers are written
/// exactly as for any other change.
///
/// # Examples
///
/// ```
/// use megafm::fm::{ChannelParameter, Editor, Selection, Synth};
/// use megafm::recorder::RegisterShadow;
///
/// let mut synth = Synth::new(RegisterShadow::new());
/// let editor = Editor::new();
///
/// assert_eq!(editor.selected(), Selection::Channel(ChannelParameter::Note));
/// assert_eq!(editor.format_value(&synth).unwrap(), "C ");
///
/// editor.decrement(&mut synth).unwrap();
/// editor.decrement(&mut synth).unwrap();
/// assert_eq!(editor.format_value(&synth).unwrap(), "A#");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Editor {
    channel: u8,
    cursor: u8,
}

impl Editor {
    /// Editor focused on channel 0 with the note selected.
    pub const fn new() -> Self {
        Self {
            channel: 0,
            cursor: 0,
        }
    }

    /// Channel being edited.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Move focus to another channel, keeping the cursor position.
    pub fn focus(&mut self, channel: u8) -> Result<(), SynthError> {
        if channel as usize >= CHANNEL_COUNT {
            return Err(SynthError::InvalidChannelIndex);
        }
        self.channel = channel;
        Ok(())
    }

    // ── Cursor ───────────────────────────────────────────────────────

    /// Entry under the cursor.
    pub fn selected(&self) -> Selection {
        let cursor = self.cursor as usize;
        if cursor < CHANNEL_PARAMETER_COUNT {
            return Selection::Channel(ChannelParameter::ALL[cursor]);
        }
        let entry = cursor - CHANNEL_PARAMETER_COUNT;
        Selection::Operator(
            (entry / OPERATOR_PARAMETER_COUNT) as u8,
            OperatorParameter::ALL[entry % OPERATOR_PARAMETER_COUNT],
        )
    }

    /// Display name of the selected parameter.
    pub fn name(&self) -> &'static str {
        match self.selected() {
            Selection::Channel(parameter) => parameter.spec().name,
            Selection::Operator(_, parameter) => parameter.spec().name,
        }
    }

    /// Move the cursor to `selection`.
    ///
    /// Returns [`SynthError::InvalidOperatorIndex`] for an operator index
    /// `>= OPERATOR_COUNT`; the cursor is left unchanged.
    pub fn select(&mut self, selection: Selection) -> Result<(), SynthError> {
        let cursor = match selection {
            Selection::Channel(parameter) => parameter.index(),
            Selection::Operator(op, parameter) => {
                if op as usize >= OPERATOR_COUNT {
                    return Err(SynthError::InvalidOperatorIndex);
                }
                CHANNEL_PARAMETER_COUNT
                    + op as usize * OPERATOR_PARAMETER_COUNT
                    + parameter.index()
            }
        };
        self.cursor = cursor as u8;
        Ok(())
    }

    /// Advance the cursor, wrapping from the last entry to the first.
    pub fn select_next(&mut self) {
        self.cursor = ((self.cursor as usize + 1) % SELECTION_COUNT) as u8;
    }

    /// Move the cursor back, wrapping from the first entry to the last.
    pub fn select_previous(&mut self) {
        self.cursor = ((self.cursor as usize + SELECTION_COUNT - 1) % SELECTION_COUNT) as u8;
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Current value of the selected parameter.
    pub fn value<W: RegisterWriter>(&self, synth: &Synth<W>) -> Result<u16, SynthError> {
        match self.selected() {
            Selection::Channel(parameter) => {
                Ok(synth.channel(self.channel)?.parameter_value(parameter))
            }
            Selection::Operator(op, parameter) => {
                Ok(synth.operator(self.channel, op)?.parameter_value(parameter))
            }
        }
    }

    /// Add the parameter's step to the selected value. Returns the stored
    /// value, `0` if the step went past the maximum.
    pub fn increment<W: RegisterWriter>(&self, synth: &mut Synth<W>) -> Result<u16, SynthError> {
        self.adjust(synth, u16::wrapping_add)
    }

    /// Subtract the parameter's step from the selected value. Returns the
    /// stored value; stepping down from `0` by one lands on the maximum.
    pub fn decrement<W: RegisterWriter>(&self, synth: &mut Synth<W>) -> Result<u16, SynthError> {
        self.adjust(synth, u16::wrapping_sub)
    }

    /// Play gate for the focused channel, called on every poll of the note
    /// button.
    ///
    /// A press starts the note unless it is already sounding; no press
    /// keys the channel off.
    pub fn note_button<W: RegisterWriter>(
        &self,
        pressed: bool,
        synth: &mut Synth<W>,
    ) -> Result<(), SynthError> {
        if pressed {
            synth.play_note(self.channel)
        } else {
            synth.stop_note(self.channel)
        }
    }

    /// Display text for the selected value: the note name for
    /// [`Note`](ChannelParameter::Note), otherwise the number zero-padded
    /// to the parameter's width.
    pub fn format_value<W: RegisterWriter>(
        &self,
        synth: &Synth<W>,
    ) -> Result<heapless::String<8>, SynthError> {
        let value = self.value(synth)?;
        let mut text = heapless::String::new();

        let width = match self.selected() {
            Selection::Channel(ChannelParameter::Note) => {
                // Stored notes are always within the table.
                let _ = text.push_str(NOTE_NAMES[value as usize]);
                return Ok(text);
            }
            Selection::Channel(parameter) => parameter.spec().width,
            Selection::Operator(_, parameter) => parameter.spec().width,
        };
        // A u16 never exceeds the capacity.
        let _ = write!(text, "{:0width$}", value, width = width as usize);
        Ok(text)
    }

    fn adjust<W: RegisterWriter>(
        &self,
        synth: &mut Synth<W>,
        step: fn(u16, u16) -> u16,
    ) -> Result<u16, SynthError> {
        let current = self.value(synth)?;
        match self.selected() {
            Selection::Channel(parameter) => {
                let value = step(current, parameter.spec().step);
                synth.set_channel_parameter(self.channel, parameter, value)?;
            }
            Selection::Operator(op, parameter) => {
                let value = step(current, parameter.spec().step);
                synth.set_operator_parameter(self.channel, op, parameter, value)?;
            }
        }
        self.value(synth)
    }
}
