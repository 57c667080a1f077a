//! DMX512 transmitter
//!
//! DMX512 is 250 kbaud 8N2 serial. Each packet is:
//!
//! ```text
//!   BREAK (>= 92 us low) | MAB (>= 12 us high) | start code | slot 1 .. slot N
//! ```
//!
//! The transmitter keeps a full 513-byte universe (start code + 512
//! slots) and sends slots 1..=N, where N covers every non-zero slot and
//! the slot written last, padded so a packet is never shorter than
//! [`MIN_SLOTS`]. A full universe takes about 22 ms on the wire, so
//! packets shrink again once high slots return to 0.

use dmxtimer_core::config::MAX_CHANNEL;
use dmxtimer_core::traits::OutputBus;
use dmxtimer_hal::uart::UartTx;
use embedded_hal::delay::DelayNs;

/// Start code plus 512 slots
pub const UNIVERSE_SIZE: usize = MAX_CHANNEL as usize + 1;

/// Null start code (dimmer data)
pub const START_CODE: u8 = 0x00;

/// Break length; the standard minimum is 92 us
pub const BREAK_US: u32 = 100;

/// Mark-after-break length; the standard minimum is 12 us
pub const MAB_US: u32 = 12;

/// Shortest packet sent, in slots
///
/// Keeps break-to-break time above the 1204 us the standard requires.
pub const MIN_SLOTS: u16 = 24;

/// DMX transmit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmxError<E> {
    /// Slot outside 1-512
    InvalidChannel(u16),
    /// UART failure
    Uart(E),
}

/// DMX512 universe transmitter over a break-capable UART
pub struct DmxOutput<T, D> {
    uart: T,
    delay: D,
    universe: [u8; UNIVERSE_SIZE],
    /// Highest slot holding a non-zero value
    highest: u16,
    /// Slot of the most recent write
    last: u16,
}

impl<T: UartTx, D: DelayNs> DmxOutput<T, D> {
    /// Create a transmitter with every slot at 0
    ///
    /// `uart` must already be configured for
    /// [`UartConfig::dmx512`](dmxtimer_hal::uart::UartConfig::dmx512).
    pub fn new(uart: T, delay: D) -> Self {
        let mut universe = [0u8; UNIVERSE_SIZE];
        universe[0] = START_CODE;
        Self {
            uart,
            delay,
            universe,
            highest: 0,
            last: 0,
        }
    }

    /// Current value of a slot
    pub fn slot(&self, channel: u16) -> Option<u8> {
        match channel {
            1..=MAX_CHANNEL => Some(self.universe[channel as usize]),
            _ => None,
        }
    }

    /// Update a slot without transmitting
    pub fn set(&mut self, channel: u16, value: u8) -> Result<(), DmxError<T::Error>> {
        if !(1..=MAX_CHANNEL).contains(&channel) {
            return Err(DmxError::InvalidChannel(channel));
        }
        self.universe[channel as usize] = value;
        self.last = channel;

        if value != 0 {
            self.highest = self.highest.max(channel);
        } else if channel == self.highest {
            self.highest = self.universe[1..channel as usize]
                .iter()
                .rposition(|v| *v != 0)
                .map_or(0, |i| i as u16 + 1);
        }
        Ok(())
    }

    /// Number of slots in the next packet
    pub fn packet_slots(&self) -> u16 {
        self.highest.max(self.last).max(MIN_SLOTS)
    }

    /// Transmit one packet
    pub fn send_frame(&mut self) -> Result<(), DmxError<T::Error>> {
        // Previous packet must be fully on the wire before the break
        self.uart.flush().map_err(DmxError::Uart)?;

        self.uart.set_break(true).map_err(DmxError::Uart)?;
        self.delay.delay_us(BREAK_US);
        self.uart.set_break(false).map_err(DmxError::Uart)?;
        self.delay.delay_us(MAB_US);

        let len = self.packet_slots() as usize + 1;
        self.uart
            .write_blocking(&self.universe[..len])
            .map_err(DmxError::Uart)
    }

    /// Give back the UART and delay
    pub fn release(self) -> (T, D) {
        (self.uart, self.delay)
    }
}

impl<T: UartTx, D: DelayNs> OutputBus for DmxOutput<T, D> {
    type Error = DmxError<T::Error>;

    fn write(&mut self, channel: u16, value: u8) -> Result<(), Self::Error> {
        self.set(channel, value)?;
        self.send_frame()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Line {
        Flush,
        Break(bool),
        Data(Vec<u8>),
        Delay(u32),
    }

    /// UART and delay share one event log
    #[derive(Default)]
    struct Log(std::rc::Rc<core::cell::RefCell<Vec<Line>>>);

    impl Log {
        fn pair(&self) -> (MockUart, MockDelay) {
            (
                MockUart {
                    log: self.0.clone(),
                    fail: false,
                },
                MockDelay(self.0.clone()),
            )
        }

        fn take(&self) -> Vec<Line> {
            core::mem::take(&mut *self.0.borrow_mut())
        }
    }

    struct MockUart {
        log: std::rc::Rc<core::cell::RefCell<Vec<Line>>>,
        fail: bool,
    }

    impl UartTx for MockUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.log.borrow_mut().push(Line::Data(data.to_vec()));
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.log.borrow_mut().push(Line::Flush);
            Ok(())
        }

        fn set_break(&mut self, on: bool) -> Result<(), ()> {
            self.log.borrow_mut().push(Line::Break(on));
            Ok(())
        }
    }

    struct MockDelay(std::rc::Rc<core::cell::RefCell<Vec<Line>>>);

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Line::Delay(ns / 1_000));
        }
    }

    #[test]
    fn test_frame_timing_and_layout() {
        let log = Log::default();
        let (uart, delay) = log.pair();
        let mut dmx = DmxOutput::new(uart, delay);

        dmx.write(3, 200).unwrap();

        let lines = log.take();
        assert_eq!(lines[0], Line::Flush);
        assert_eq!(lines[1], Line::Break(true));
        assert!(matches!(lines[2], Line::Delay(us) if us >= 92));
        assert_eq!(lines[3], Line::Break(false));
        assert!(matches!(lines[4], Line::Delay(us) if us >= 12));

        let Line::Data(packet) = &lines[5] else {
            panic!("expected packet, got {:?}", lines[5]);
        };
        assert_eq!(packet.len(), MIN_SLOTS as usize + 1);
        assert_eq!(packet[0], START_CODE);
        assert_eq!(packet[3], 200);
        assert!(packet.iter().enumerate().all(|(i, v)| i == 3 || *v == 0));
    }

    #[test]
    fn test_packet_grows_to_highest_slot() {
        let log = Log::default();
        let (uart, delay) = log.pair();
        let mut dmx = DmxOutput::new(uart, delay);

        dmx.write(512, 1).unwrap();
        dmx.write(10, 0).unwrap();

        let packets: Vec<_> = log
            .take()
            .into_iter()
            .filter_map(|l| match l {
                Line::Data(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1].len(), UNIVERSE_SIZE);
        assert_eq!(packets[1][512], 1);
    }

    fn packet_lengths(log: &Log) -> Vec<usize> {
        log.take()
            .into_iter()
            .filter_map(|l| match l {
                Line::Data(p) => Some(p.len()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_packet_shrinks_when_high_slots_return_to_zero() {
        let log = Log::default();
        let (uart, delay) = log.pair();
        let mut dmx = DmxOutput::new(uart, delay);

        // Channel knob wraps 1 -> 512 -> 1 while idle
        dmx.write(1, 0).unwrap();
        dmx.write(512, 0).unwrap();
        dmx.write(1, 0).unwrap();
        dmx.write(1, 255).unwrap();

        let min = MIN_SLOTS as usize + 1;
        assert_eq!(packet_lengths(&log), [min, UNIVERSE_SIZE, min, min]);
    }

    #[test]
    fn test_packet_covers_lit_slots_below_last_write() {
        let log = Log::default();
        let (uart, delay) = log.pair();
        let mut dmx = DmxOutput::new(uart, delay);

        dmx.write(300, 200).unwrap();
        dmx.write(100, 50).unwrap();
        // Zeroing 300 still sends it once, then falls back to slot 100
        dmx.write(300, 0).unwrap();
        dmx.write(5, 0).unwrap();

        assert_eq!(packet_lengths(&log), [301, 301, 301, 101]);
        assert_eq!(dmx.slot(300), Some(0));
    }

    #[test]
    fn test_invalid_slot_rejected() {
        let log = Log::default();
        let (uart, delay) = log.pair();
        let mut dmx = DmxOutput::new(uart, delay);

        assert_eq!(dmx.write(0, 1), Err(DmxError::InvalidChannel(0)));
        assert_eq!(dmx.write(513, 1), Err(DmxError::InvalidChannel(513)));
        assert!(log.take().is_empty());
        assert_eq!(dmx.slot(0), None);
    }

    #[test]
    fn test_uart_error_propagates() {
        let log = Log::default();
        let (mut uart, delay) = log.pair();
        uart.fail = true;
        let mut dmx = DmxOutput::new(uart, delay);

        assert_eq!(dmx.write(1, 255), Err(DmxError::Uart(())));
        // Slot keeps the new value for the next packet
        assert_eq!(dmx.slot(1), Some(255));
    }
}
