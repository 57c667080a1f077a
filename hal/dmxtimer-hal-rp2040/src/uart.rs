//! Blocking UART transmitter with break control
//!
//! embassy-rp only offers an async break, so the break condition is
//! driven directly through the UARTLCR_H.BRK bit of the peripheral.

use dmxtimer_hal::uart::{DataBits, Parity, StopBits, UartConfig, UartTx};
use embassy_rp::pac;
use embassy_rp::uart::{self, Blocking};

/// Convert the shared line settings to embassy-rp's
pub fn to_rp_config(config: &UartConfig) -> uart::Config {
    let mut rp = uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    rp.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    rp
}

/// UART transmitter
///
/// `regs` must be the register block of the same peripheral `tx` was
/// created from (e.g. `pac::UART1` for `p.UART1`).
pub struct RpUartTx<'d> {
    tx: uart::UartTx<'d, Blocking>,
    regs: pac::uart::Uart,
}

impl<'d> RpUartTx<'d> {
    pub fn new(tx: uart::UartTx<'d, Blocking>, regs: pac::uart::Uart) -> Self {
        Self { tx, regs }
    }
}

impl UartTx for RpUartTx<'_> {
    type Error = uart::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush()
    }

    fn set_break(&mut self, on: bool) -> Result<(), Self::Error> {
        self.regs.uartlcr_h().modify(|w| w.set_brk(on));
        Ok(())
    }
}
