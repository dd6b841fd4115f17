use core::fmt;

/// Errors that can occur when addressing synth entities by raw index.
///
/// Parameter *values* never produce an error: out-of-range values are
/// wrapped by the parameter's [`ParameterSpec`](super::ParameterSpec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SynthError {
    /// Channel index is out of bounds (must be < CHANNEL_COUNT).
    InvalidChannelIndex,
    /// Operator index is out of bounds (must be < OPERATOR_COUNT).
    InvalidOperatorIndex,
    /// Parameter index is out of bounds for the entity's parameter table.
    InvalidParameterIndex,
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SynthError::InvalidChannelIndex => write!(f, "Invalid channel index (must be 0-5)"),
            SynthError::InvalidOperatorIndex => write!(f, "Invalid operator index (must be 0-3)"),
            SynthError::InvalidParameterIndex => write!(f, "Invalid parameter index"),
        }
    }
}
