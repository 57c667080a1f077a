//! Lighting output bus trait

/// Single-slot lighting bus (e.g. a DMX512 universe)
///
/// Writes are fire-and-forget: the bus does not acknowledge values.
pub trait OutputBus {
    /// Error type for transmit failures
    type Error;

    /// Set `channel` (1-512) to `value` and transmit
    fn write(&mut self, channel: u16, value: u8) -> Result<(), Self::Error>;
}
