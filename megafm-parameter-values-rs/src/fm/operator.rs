use super::error::SynthError;
use super::parameter::{ParameterKind, ParameterSpec, ParameterValues};
use crate::registers::{
    channel_offset, Bank, RegisterWriter, AM_DECAY_1, DECAY_2, DECAY_LEVEL_RELEASE,
    DETUNE_MULTIPLE, RATE_SCALING_ATTACK, TOTAL_LEVEL,
};

/// Number of parameters owned by each operator.
pub const OPERATOR_PARAMETER_COUNT: usize = 10;

/// Power-on parameter values, indexed by `[operator][parameter]`.
///
/// Operator 1's first decay rate of 36 is above its maximum of 31. It is
/// stored as-is and only wrapped by the first edit of that parameter.
pub const DEFAULT_OPERATOR_VALUES: [[u16; OPERATOR_PARAMETER_COUNT]; 4] = [
    [1, 1, 35, 1, 2, 1, 5, 2, 1, 1],
    [0, 13, 45, 2, 25, 0, 36, 2, 1, 1],
    [3, 3, 38, 1, 31, 0, 5, 2, 1, 1],
    [0, 1, 0, 2, 25, 0, 7, 2, 10, 6],
];

/// Per-operator synthesis parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorParameter {
    /// DT1, 0–7.
    Detune,
    /// MUL, 0–15.
    Multiple,
    /// TL, 0–127.
    TotalLevel,
    /// RS, 0–3.
    RateScaling,
    /// AR, 0–31.
    AttackRate,
    /// AM, 0–1.
    AmplitudeModulation,
    /// D1R, 0–31.
    Decay1Rate,
    /// D2R, 0–31.
    Decay2Rate,
    /// D1L, 0–15.
    Decay1Level,
    /// RR, 0–15.
    ReleaseRate,
}

/// Operator register, the unit of recomputation for operator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorRegister {
    /// 0x30: DT1 and MUL.
    DetuneMultiple,
    /// 0x40: TL.
    TotalLevel,
    /// 0x50: RS and AR.
    RateScalingAttack,
    /// 0x60: AM and D1R.
    AmDecay1,
    /// 0x70: D2R.
    Decay2,
    /// 0x80: D1L and RR.
    Decay1LevelRelease,
}

impl OperatorRegister {
    /// Every operator register, in broadcast order.
    pub const ALL: [OperatorRegister; 6] = [
        OperatorRegister::DetuneMultiple,
        OperatorRegister::TotalLevel,
        OperatorRegister::RateScalingAttack,
        OperatorRegister::AmDecay1,
        OperatorRegister::Decay2,
        OperatorRegister::Decay1LevelRelease,
    ];

    /// Address for channel 0, operator 0.
    pub const fn base_address(self) -> u8 {
        match self {
            OperatorRegister::DetuneMultiple => DETUNE_MULTIPLE,
            OperatorRegister::TotalLevel => TOTAL_LEVEL,
            OperatorRegister::RateScalingAttack => RATE_SCALING_ATTACK,
            OperatorRegister::AmDecay1 => AM_DECAY_1,
            OperatorRegister::Decay2 => DECAY_2,
            OperatorRegister::Decay1LevelRelease => DECAY_LEVEL_RELEASE,
        }
    }
}

static OPERATOR_PARAMETERS: [ParameterSpec<OperatorRegister>; OPERATOR_PARAMETER_COUNT] = [
    ParameterSpec::new("DT1", 7, OperatorRegister::DetuneMultiple),
    ParameterSpec::new("MUL", 15, OperatorRegister::DetuneMultiple).with_width(2),
    ParameterSpec::new("TL", 127, OperatorRegister::TotalLevel).with_width(3),
    ParameterSpec::new("RS", 3, OperatorRegister::RateScalingAttack),
    ParameterSpec::new("AR", 31, OperatorRegister::RateScalingAttack).with_width(2),
    ParameterSpec::new("AM", 1, OperatorRegister::AmDecay1),
    ParameterSpec::new("D1R", 31, OperatorRegister::AmDecay1).with_width(2),
    ParameterSpec::new("D2R", 31, OperatorRegister::Decay2).with_width(2),
    ParameterSpec::new("D1L", 15, OperatorRegister::Decay1LevelRelease).with_width(2),
    ParameterSpec::new("RR", 15, OperatorRegister::Decay1LevelRelease).with_width(2),
];

impl ParameterKind for OperatorParameter {
    type Update = OperatorRegister;

    const ALL: &'static [Self] = &[
        OperatorParameter::Detune,
        OperatorParameter::Multiple,
        OperatorParameter::TotalLevel,
        OperatorParameter::RateScaling,
        OperatorParameter::AttackRate,
        OperatorParameter::AmplitudeModulation,
        OperatorParameter::Decay1Rate,
        OperatorParameter::Decay2Rate,
        OperatorParameter::Decay1Level,
        OperatorParameter::ReleaseRate,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn spec(self) -> &'static ParameterSpec<OperatorRegister> {
        &OPERATOR_PARAMETERS[self.index()]
    }
}

impl TryFrom<usize> for OperatorParameter {
    type Error = SynthError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(SynthError::InvalidParameterIndex)
    }
}

/// One of the four FM operators of a channel.
///
/// Every parameter change rewrites exactly one register: the one holding the
/// changed parameter and its partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    index: u8,
    channel: u8,
    values: ParameterValues<OperatorParameter, OPERATOR_PARAMETER_COUNT>,
}

impl Operator {
    pub(crate) fn new(channel: u8, index: u8, values: [u16; OPERATOR_PARAMETER_COUNT]) -> Self {
        Self {
            index,
            channel,
            values: ParameterValues::from_array(values),
        }
    }

    /// Operator index within its channel (0–3).
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Index of the owning channel (0–5).
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn parameter_value(&self, parameter: OperatorParameter) -> u16 {
        self.values.get(parameter)
    }

    /// All parameter values in [`OperatorParameter`] order.
    pub fn parameter_values(&self) -> &[u16; OPERATOR_PARAMETER_COUNT] {
        self.values.as_array()
    }

    /// Set a parameter and rewrite its register.
    ///
    /// `value` goes through [`ParameterSpec::wrap()`] first; the register
    /// is written even when the stored value did not change.
    pub fn set_parameter_value<W: RegisterWriter + ?Sized>(
        &mut self,
        parameter: OperatorParameter,
        value: u16,
        writer: &mut W,
    ) {
        self.values.set(parameter, value);
        self.write(parameter.spec().update, writer);
    }

    /// Index-based form of [`set_parameter_value()`](Self::set_parameter_value).
    ///
    /// Returns [`SynthError::InvalidParameterIndex`] if
    /// `index >= OPERATOR_PARAMETER_COUNT`.
    pub fn set_parameter_value_at<W: RegisterWriter + ?Sized>(
        &mut self,
        index: usize,
        value: u16,
        writer: &mut W,
    ) -> Result<(), SynthError> {
        let parameter = OperatorParameter::try_from(index)?;
        self.set_parameter_value(parameter, value, writer);
        Ok(())
    }

    /// Rewrite all six operator registers from the current values.
    pub fn update<W: RegisterWriter + ?Sized>(&self, writer: &mut W) {
        for register in OperatorRegister::ALL {
            self.write(register, writer);
        }
    }

    /// Register byte for `register` derived from the current values.
    pub fn encode(&self, register: OperatorRegister) -> u8 {
        use OperatorParameter::*;

        let v = |parameter| self.values.get(parameter);
        let byte = match register {
            OperatorRegister::DetuneMultiple => v(Multiple) | (v(Detune) << 4),
            OperatorRegister::TotalLevel => v(TotalLevel),
            OperatorRegister::RateScalingAttack => v(AttackRate) | (v(RateScaling) << 6),
            OperatorRegister::AmDecay1 => (v(AmplitudeModulation) << 7) | v(Decay1Rate),
            OperatorRegister::Decay2 => v(Decay2Rate),
            OperatorRegister::Decay1LevelRelease => v(ReleaseRate) | (v(Decay1Level) << 4),
        };
        byte as u8
    }

    /// Address of `register` for this operator within its bank.
    pub fn register_address(&self, register: OperatorRegister) -> u8 {
        register.base_address() + channel_offset(self.channel) + self.index * 4
    }

    fn write<W: RegisterWriter + ?Sized>(&self, register: OperatorRegister, writer: &mut W) {
        writer.write_register(
            Bank::for_channel(self.channel),
            self.register_address(register),
            self.encode(register),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fm::parameter::WRAP_SENTINEL;
    use crate::recorder::{RegisterLog, RegisterShadow};
    use crate::registers::RegisterWrite;

    fn make_operator(channel: u8, index: u8) -> Operator {
        Operator::new(channel, index, DEFAULT_OPERATOR_VALUES[index as usize])
    }

    // ── Descriptor table ─────────────────────────────────────────────

    #[test]
    fn descriptor_maxima() {
        let maxima: [u16; OPERATOR_PARAMETER_COUNT] = [7, 15, 127, 3, 31, 1, 31, 31, 15, 15];
        for (parameter, max) in OperatorParameter::ALL.iter().zip(maxima) {
            assert_eq!(parameter.spec().max_value, max, "{:?}", parameter);
        }
    }

    #[test]
    fn try_from_index() {
        assert_eq!(OperatorParameter::try_from(2), Ok(OperatorParameter::TotalLevel));
        assert_eq!(
            OperatorParameter::try_from(OPERATOR_PARAMETER_COUNT),
            Err(SynthError::InvalidParameterIndex)
        );
    }

    // ── Clamp/wrap law ───────────────────────────────────────────────

    #[test]
    fn every_parameter_wraps_circularly() {
        let mut op = make_operator(0, 0);
        let mut shadow = RegisterShadow::new();

        for &parameter in OperatorParameter::ALL {
            let max = parameter.spec().max_value;

            op.set_parameter_value(parameter, WRAP_SENTINEL, &mut shadow);
            assert_eq!(op.parameter_value(parameter), max, "{:?}", parameter);

            op.set_parameter_value(parameter, max + 1, &mut shadow);
            assert_eq!(op.parameter_value(parameter), 0, "{:?}", parameter);

            for v in 0..=max {
                op.set_parameter_value(parameter, v, &mut shadow);
                assert_eq!(op.parameter_value(parameter), v, "{:?}", parameter);
            }
        }
    }

    // ── Encoding ─────────────────────────────────────────────────────

    #[test]
    fn detune_multiple_packing() {
        let mut op = make_operator(0, 0);
        let mut shadow = RegisterShadow::new();
        op.set_parameter_value(OperatorParameter::Multiple, 5, &mut shadow);
        op.set_parameter_value(OperatorParameter::Detune, 3, &mut shadow);

        assert_eq!(op.encode(OperatorRegister::DetuneMultiple), 0x35);
        assert_eq!(shadow.read(Bank::A, 0x30), 0x35);
    }

    #[test]
    fn pair_packing_layouts() {
        let mut op = make_operator(0, 0);
        let mut log: RegisterLog<16> = RegisterLog::new();

        op.set_parameter_value(OperatorParameter::RateScaling, 3, &mut log);
        op.set_parameter_value(OperatorParameter::AttackRate, 31, &mut log);
        assert_eq!(op.encode(OperatorRegister::RateScalingAttack), 0xDF);

        op.set_parameter_value(OperatorParameter::AmplitudeModulation, 1, &mut log);
        op.set_parameter_value(OperatorParameter::Decay1Rate, 4, &mut log);
        assert_eq!(op.encode(OperatorRegister::AmDecay1), 0x84);

        op.set_parameter_value(OperatorParameter::Decay1Level, 10, &mut log);
        op.set_parameter_value(OperatorParameter::ReleaseRate, 6, &mut log);
        assert_eq!(op.encode(OperatorRegister::Decay1LevelRelease), 0xA6);

        op.set_parameter_value(OperatorParameter::TotalLevel, 127, &mut log);
        assert_eq!(op.encode(OperatorRegister::TotalLevel), 0x7F);

        op.set_parameter_value(OperatorParameter::Decay2Rate, 17, &mut log);
        assert_eq!(op.encode(OperatorRegister::Decay2), 17);
    }

    #[test]
    fn default_out_of_range_decay_is_kept_until_edited() {
        let mut op = make_operator(0, 1);
        assert_eq!(op.parameter_value(OperatorParameter::Decay1Rate), 36);
        assert_eq!(op.encode(OperatorRegister::AmDecay1), 36);

        // Stepping up from 36 overflows to zero.
        let mut shadow = RegisterShadow::new();
        op.set_parameter_value(OperatorParameter::Decay1Rate, 37, &mut shadow);
        assert_eq!(op.parameter_value(OperatorParameter::Decay1Rate), 0);
    }

    // ── Addressing and dispatch ──────────────────────────────────────

    #[test]
    fn one_write_per_edit_with_operator_stride() {
        let mut op = make_operator(4, 2);
        let mut log: RegisterLog<4> = RegisterLog::new();

        op.set_parameter_value(OperatorParameter::TotalLevel, 20, &mut log);

        assert_eq!(
            log.writes(),
            &[RegisterWrite { bank: Bank::B, address: 0x40 + 1 + 8, data: 20 }]
        );
    }

    #[test]
    fn partner_parameter_shares_register() {
        let mut op = make_operator(0, 3);
        let mut log: RegisterLog<4> = RegisterLog::new();

        op.set_parameter_value(OperatorParameter::Decay1Level, 2, &mut log);
        op.set_parameter_value(OperatorParameter::ReleaseRate, 9, &mut log);

        let writes = log.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].address, 0x8C);
        assert_eq!(writes[1].address, 0x8C);
        assert_eq!(writes[1].data, 0x29);
    }

    #[test]
    fn unchanged_value_still_writes() {
        let mut op = make_operator(0, 0);
        let mut log: RegisterLog<4> = RegisterLog::new();
        let current = op.parameter_value(OperatorParameter::TotalLevel);

        op.set_parameter_value(OperatorParameter::TotalLevel, current, &mut log);
        assert_eq!(log.writes().len(), 1);
    }

    #[test]
    fn index_based_setter() {
        let mut op = make_operator(0, 0);
        let mut shadow = RegisterShadow::new();

        op.set_parameter_value_at(1, 9, &mut shadow).unwrap();
        assert_eq!(op.parameter_value(OperatorParameter::Multiple), 9);

        assert_eq!(
            op.set_parameter_value_at(10, 1, &mut shadow),
            Err(SynthError::InvalidParameterIndex)
        );
        assert_eq!(shadow.write_count(), 1);
    }

    #[test]
    fn update_writes_all_six_registers() {
        let op = make_operator(2, 1);
        let mut log: RegisterLog<8> = RegisterLog::new();
        op.update(&mut log);

        let addresses: [u8; 6] = [0x36, 0x46, 0x56, 0x66, 0x76, 0x86];
        assert_eq!(log.writes().len(), 6);
        for (write, address) in log.writes().iter().zip(addresses) {
            assert_eq!(write.bank, Bank::A);
            assert_eq!(write.address, address);
        }
    }
}
