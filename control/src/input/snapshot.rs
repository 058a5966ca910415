//! Structure used to pass the current state of the input peripherals.

/// Raw button levels polled once per tick, plus the tick's wall clock.
///
/// `Snapshot` is meant to be passed from the hardware binding to the
/// control package. Levels are raw; debouncing happens in this crate.
/// The clock must be monotonic; it is allowed to wrap.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// The start/stop/power button.
    pub toggle: bool,
    /// The string selection button.
    pub string: bool,
    /// The tuning mode button.
    pub mode: bool,
    pub now_ms: u32,
}
