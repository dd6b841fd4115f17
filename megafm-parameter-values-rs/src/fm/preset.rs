use super::channel::{CHANNEL_PARAMETER_COUNT, DEFAULT_CHANNEL_VALUES};
use super::error::SynthError;
use super::global::{DEFAULT_GLOBAL_VALUES, GLOBAL_PARAMETER_COUNT};
use super::operator::{DEFAULT_OPERATOR_VALUES, OPERATOR_PARAMETER_COUNT};
use super::synth::Synth;
use super::OPERATOR_COUNT;
use crate::registers::RegisterWriter;

/// A complete voice: global LFO settings, one channel and its operators.
///
/// Values are raw and in the same units as the live parameters. They are
/// not validated here; applying a preset passes every value through the
/// normal setter, which wraps out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preset {
    /// Values in [`GlobalParameter`](super::GlobalParameter) order.
    pub global: [u16; GLOBAL_PARAMETER_COUNT],
    /// Values in [`ChannelParameter`](super::ChannelParameter) order.
    pub channel: [u16; CHANNEL_PARAMETER_COUNT],
    /// `[operator][parameter]`, parameters in
    /// [`OperatorParameter`](super::OperatorParameter) order.
    pub operators: [[u16; OPERATOR_PARAMETER_COUNT]; OPERATOR_COUNT],
}

impl Default for Preset {
    /// The power-on voice.
    fn default() -> Self {
        Self {
            global: DEFAULT_GLOBAL_VALUES,
            channel: DEFAULT_CHANNEL_VALUES,
            operators: DEFAULT_OPERATOR_VALUES,
        }
    }
}

impl Preset {
    /// Snapshot the global settings and one channel of `synth`.
    ///
    /// Returns [`SynthError::InvalidChannelIndex`] if `channel >= CHANNEL_COUNT`.
    pub fn capture<W: RegisterWriter>(synth: &Synth<W>, channel: u8) -> Result<Self, SynthError> {
        let source = synth.channel(channel)?;
        let operators = source.operators();

        Ok(Self {
            global: *synth.globals().parameter_values(),
            channel: *source.parameter_values(),
            operators: core::array::from_fn(|op| *operators[op].parameter_values()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fm::{ChannelParameter, OperatorParameter};
    use crate::recorder::RegisterShadow;

    #[test]
    fn default_matches_power_on_state() {
        let synth = Synth::new(RegisterShadow::new());
        assert_eq!(Preset::capture(&synth, 0), Ok(Preset::default()));
        assert_eq!(Preset::capture(&synth, 5), Ok(Preset::default()));
    }

    #[test]
    fn capture_reads_requested_channel() {
        let mut synth = Synth::new(RegisterShadow::new());
        synth
            .set_channel_parameter(2, ChannelParameter::Algorithm, 5)
            .unwrap();
        synth
            .set_operator_parameter(2, 1, OperatorParameter::TotalLevel, 64)
            .unwrap();

        let preset = Preset::capture(&synth, 2).unwrap();
        assert_eq!(preset.channel[ChannelParameter::Algorithm as usize], 5);
        assert_eq!(preset.operators[1][OperatorParameter::TotalLevel as usize], 64);

        let untouched = Preset::capture(&synth, 0).unwrap();
        assert_eq!(untouched, Preset::default());
    }

    #[test]
    fn capture_rejects_invalid_channel() {
        let synth = Synth::new(RegisterShadow::new());
        assert_eq!(Preset::capture(&synth, 6), Err(SynthError::InvalidChannelIndex));
    }
}
