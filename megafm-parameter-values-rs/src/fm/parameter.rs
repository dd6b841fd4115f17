use core::marker::PhantomData;

/// Value a decrement past zero produces in `u16` storage.
///
/// [`ParameterSpec::wrap()`] maps it to the parameter's maximum so that
/// stepping down from `0` lands on `max_value`.
pub const WRAP_SENTINEL: u16 = u16::MAX;

/// Immutable descriptor shared by every instance of one parameter kind.
///
/// `U` identifies the recompute routine run after every change: a
/// register group for operators and globals, a [`ChannelUpdate`] for
/// channels.
///
/// [`ChannelUpdate`]: super::ChannelUpdate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterSpec<U> {
    /// Display name.
    pub name: &'static str,
    /// Maximum allowed value (inclusive). The minimum is always 0.
    pub max_value: u16,
    /// Amount a single edit step adds or subtracts.
    pub step: u16,
    /// Minimum number of digits when the value is displayed.
    pub width: u8,
    /// Recompute routine invoked after every change.
    pub update: U,
}

impl<U: Copy> ParameterSpec<U> {
    /// Descriptor with a step of 1 and a width of one digit.
    pub const fn new(name: &'static str, max_value: u16, update: U) -> Self {
        Self {
            name,
            max_value,
            step: 1,
            width: 1,
            update,
        }
    }

    /// Replace the edit step.
    pub const fn with_step(mut self, step: u16) -> Self {
        self.step = step;
        self
    }

    /// Replace the display width in digits.
    pub const fn with_width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    /// Apply the wraparound policy to a requested value.
    ///
    /// - [`WRAP_SENTINEL`] becomes `max_value`.
    /// - Anything above `max_value` becomes `0`, however far above it is.
    /// - Everything else is kept unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use megafm::fm::{ParameterSpec, WRAP_SENTINEL};
    ///
    /// let spec = ParameterSpec::new("Octave", 7, ());
    /// assert_eq!(spec.wrap(5), 5);
    /// assert_eq!(spec.wrap(8), 0);
    /// assert_eq!(spec.wrap(100), 0);
    /// assert_eq!(spec.wrap(WRAP_SENTINEL), 7);
    /// assert_eq!(spec.wrap(0u16.wrapping_sub(1)), 7);
    /// ```
    pub const fn wrap(&self, requested: u16) -> u16 {
        if requested == WRAP_SENTINEL {
            self.max_value
        } else if requested > self.max_value {
            0
        } else {
            requested
        }
    }
}

/// A parameter enumeration backed by a static descriptor table.
///
/// The discriminant of each variant is its index into the owning entity's
/// value array and into the descriptor table.
pub trait ParameterKind: Copy + 'static {
    /// Recompute routine identifier stored in each descriptor.
    type Update: Copy + 'static;

    /// Every variant, in index order.
    const ALL: &'static [Self];

    /// Position of this parameter in the value array.
    fn index(self) -> usize;

    /// Shared descriptor for this parameter.
    fn spec(self) -> &'static ParameterSpec<Self::Update>;

    /// Look up a parameter by its index.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Fixed-size value storage for one entity, indexed by a [`ParameterKind`].
///
/// Values only change through [`set()`](Self::set), which enforces the
/// wraparound policy of the parameter's descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValues<P, const N: usize> {
    values: [u16; N],
    kind: PhantomData<P>,
}

impl<P: ParameterKind, const N: usize> ParameterValues<P, N> {
    /// Store `values` verbatim, in [`ParameterKind::ALL`] order.
    pub const fn from_array(values: [u16; N]) -> Self {
        Self {
            values,
            kind: PhantomData,
        }
    }

    /// Current value of `parameter`.
    pub fn get(&self, parameter: P) -> u16 {
        self.values[parameter.index()]
    }

    /// Wrap `requested` into range, store it, and return the stored value.
    pub fn set(&mut self, parameter: P, requested: u16) -> u16 {
        let value = parameter.spec().wrap(requested);
        self.values[parameter.index()] = value;
        value
    }

    /// All values in [`ParameterKind::ALL`] order.
    pub fn as_array(&self) -> &[u16; N] {
        &self.values
    }
}
