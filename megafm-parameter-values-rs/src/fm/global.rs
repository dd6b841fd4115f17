use super::error::SynthError;
use super::parameter::{ParameterKind, ParameterSpec, ParameterValues};
use crate::registers::{Bank, RegisterWriter, LFO};

/// Number of chip-wide parameters.
pub const GLOBAL_PARAMETER_COUNT: usize = 2;

/// Power-on values: LFO enabled at rate 3.
pub const DEFAULT_GLOBAL_VALUES: [u16; GLOBAL_PARAMETER_COUNT] = [1, 3];

/// Chip-wide parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlobalParameter {
    /// LFO on/off, 0–1.
    LfoEnable,
    /// LFO rate, 0–7.
    LfoRate,
}

/// Global register, the unit of recomputation for global parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlobalRegister {
    /// 0x22: LFO enable and rate.
    Lfo,
}

static GLOBAL_PARAMETERS: [ParameterSpec<GlobalRegister>; GLOBAL_PARAMETER_COUNT] = [
    ParameterSpec::new("G.LFO On", 1, GlobalRegister::Lfo),
    ParameterSpec::new("G.LFO Frq", 7, GlobalRegister::Lfo),
];

impl ParameterKind for GlobalParameter {
    type Update = GlobalRegister;

    const ALL: &'static [Self] = &[GlobalParameter::LfoEnable, GlobalParameter::LfoRate];

    fn index(self) -> usize {
        self as usize
    }

    fn spec(self) -> &'static ParameterSpec<GlobalRegister> {
        &GLOBAL_PARAMETERS[self.index()]
    }
}

impl TryFrom<usize> for GlobalParameter {
    type Error = SynthError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(SynthError::InvalidParameterIndex)
    }
}

/// Chip-wide LFO settings, shared by all channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalParameters {
    values: ParameterValues<GlobalParameter, GLOBAL_PARAMETER_COUNT>,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalParameters {
    /// Power-on settings, [`DEFAULT_GLOBAL_VALUES`].
    pub fn new() -> Self {
        Self {
            values: ParameterValues::from_array(DEFAULT_GLOBAL_VALUES),
        }
    }

    /// Current value of `parameter`.
    pub fn parameter_value(&self, parameter: GlobalParameter) -> u16 {
        self.values.get(parameter)
    }

    /// All values in [`GlobalParameter`] order.
    pub fn parameter_values(&self) -> &[u16; GLOBAL_PARAMETER_COUNT] {
        self.values.as_array()
    }

    /// Set a parameter and rewrite the LFO register.
    pub fn set_parameter_value<W: RegisterWriter + ?Sized>(
        &mut self,
        parameter: GlobalParameter,
        value: u16,
        writer: &mut W,
    ) {
        self.values.set(parameter, value);
        self.write(parameter.spec().update, writer);
    }

    /// Index-based form of [`set_parameter_value()`](Self::set_parameter_value).
    ///
    /// Returns [`SynthError::InvalidParameterIndex`] if
    /// `index >= GLOBAL_PARAMETER_COUNT`.
    pub fn set_parameter_value_at<W: RegisterWriter + ?Sized>(
        &mut self,
        index: usize,
        value: u16,
        writer: &mut W,
    ) -> Result<(), SynthError> {
        let parameter = GlobalParameter::try_from(index)?;
        self.set_parameter_value(parameter, value, writer);
        Ok(())
    }

    /// Rewrite the LFO register from the current values.
    pub fn update<W: RegisterWriter + ?Sized>(&self, writer: &mut W) {
        self.write(GlobalRegister::Lfo, writer);
    }

    /// `(enable << 3) | rate`.
    pub fn encode(&self, register: GlobalRegister) -> u8 {
        match register {
            GlobalRegister::Lfo => {
                let enable = self.values.get(GlobalParameter::LfoEnable);
                let rate = self.values.get(GlobalParameter::LfoRate);
                ((enable << 3) | rate) as u8
            }
        }
    }

    fn write<W: RegisterWriter + ?Sized>(&self, register: GlobalRegister, writer: &mut W) {
        let address = match register {
            GlobalRegister::Lfo => LFO,
        };
        writer.write_register(Bank::A, address, self.encode(register));
    }
}
