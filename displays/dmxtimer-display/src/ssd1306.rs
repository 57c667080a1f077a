//! SSD1306 OLED Display Driver
//!
//! Driver for 128x64 SSD1306-based OLED displays via I2C.
//! Drawing goes to a page-organized frame buffer; [`Panel::flush`] sends
//! only the pages touched since the previous flush.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::i2c::I2c;

use crate::surface::Panel;

/// SSD1306 I2C address (0x3C, or 0x3D with SA0 high)
pub const SSD1306_ADDR: u8 = 0x3C;

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Control bytes
const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    /// Frame buffer (1 bit per pixel, LSB = top row of the page)
    buffer: [[u8; WIDTH]; PAGES],
    /// Bit n set = page n changed since the last flush
    dirty: u8,
}

impl<I2C: I2c> Ssd1306<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SSD1306_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [[0; WIDTH]; PAGES],
            dirty: 0,
        }
    }

    /// Initialize the display and blank it
    ///
    /// Leaves the panel off; power it with [`Panel::set_power`].
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEMORY_MODE,
            0x02,                  // Page addressing
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::RESUME_FROM_RAM,
            cmd::SET_NORMAL,
        ];
        self.commands(init_cmds)?;

        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        self.dirty = 0xFF;
        self.flush()
    }

    /// Pages waiting for the next flush (bit per page)
    pub fn dirty_pages(&self) -> u8 {
        self.dirty
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn commands(&mut self, cmds: &[u8]) -> Result<(), I2C::Error> {
        for &c in cmds {
            self.i2c.write(self.address, &[CONTROL_CMD, c])?;
        }
        Ok(())
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let page = y / 8;
        let mask = 1 << (y % 8);
        let byte = &mut self.buffer[page][x];
        let next = if on { *byte | mask } else { *byte & !mask };
        if next != *byte {
            *byte = next;
            self.dirty |= 1 << page;
        }
    }
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C: I2c> DrawTarget for Ssd1306<I2C> {
    type Color = BinaryColor;
    type Error = I2C::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Off-screen pixels are clipped
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.set_pixel(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }
}

impl<I2C: I2c> Panel for Ssd1306<I2C> {
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error> {
        let c = if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF };
        self.commands(&[c])
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        for page in 0..PAGES {
            if self.dirty & (1 << page) == 0 {
                continue;
            }

            self.commands(&[
                cmd::SET_PAGE_ADDR | page as u8,
                cmd::SET_LOW_COLUMN,
                cmd::SET_HIGH_COLUMN,
            ])?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c.write(self.address, &data)?;

            self.dirty &= !(1 << page);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::convert::Infallible;
    use std::vec::Vec;

    use embedded_hal::i2c::{ErrorType, Operation};

    use super::*;

    #[derive(Default)]
    struct Bus {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl Bus {
        fn data_writes(&self) -> usize {
            self.writes
                .iter()
                .filter(|(_, bytes)| bytes[0] == CONTROL_DATA)
                .count()
        }

        fn page_selects(&self) -> Vec<u8> {
            self.writes
                .iter()
                .filter_map(|(_, bytes)| match bytes.as_slice() {
                    [CONTROL_CMD, c] if c & 0xF0 == cmd::SET_PAGE_ADDR => Some(c & 0x0F),
                    _ => None,
                })
                .collect()
        }
    }

    impl ErrorType for Bus {
        type Error = Infallible;
    }

    impl I2c for Bus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn ready() -> Ssd1306<Bus> {
        let mut display = Ssd1306::new(Bus::default());
        display.init().unwrap();
        display.i2c.writes.clear();
        display
    }

    #[test]
    fn test_init_clears_every_page() {
        let mut display = Ssd1306::new(Bus::default());
        display.init().unwrap();

        assert_eq!(display.i2c.data_writes(), PAGES);
        assert!(display.i2c.writes.iter().all(|(a, _)| *a == SSD1306_ADDR));
        assert_eq!(display.dirty_pages(), 0);
    }

    #[test]
    fn test_flush_sends_only_dirty_pages() {
        let mut display = ready();

        Pixel(Point::new(5, 20), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        Pixel(Point::new(127, 63), BinaryColor::On)
            .draw(&mut display)
            .unwrap();
        assert_eq!(display.dirty_pages(), 0b1000_0100);

        display.flush().unwrap();
        assert_eq!(display.i2c.page_selects(), [2, 7]);
        assert_eq!(display.i2c.data_writes(), 2);

        let (_, page2) = &display.i2c.writes[3];
        assert_eq!(page2.len(), WIDTH + 1);
        assert_eq!(page2[1 + 5], 1 << (20 % 8));
    }

    #[test]
    fn test_unchanged_pixels_do_not_dirty() {
        let mut display = ready();

        Pixel(Point::new(0, 0), BinaryColor::Off)
            .draw(&mut display)
            .unwrap();
        assert_eq!(display.dirty_pages(), 0);

        display.flush().unwrap();
        assert!(display.i2c.writes.is_empty());
    }

    #[test]
    fn test_offscreen_pixels_clipped() {
        let mut display = ready();

        display
            .draw_iter([
                Pixel(Point::new(-1, 0), BinaryColor::On),
                Pixel(Point::new(128, 0), BinaryColor::On),
                Pixel(Point::new(0, 64), BinaryColor::On),
            ])
            .unwrap();
        assert_eq!(display.dirty_pages(), 0);
    }

    #[test]
    fn test_power_commands() {
        let mut display = ready();

        display.set_power(false).unwrap();
        display.set_power(true).unwrap();
        assert_eq!(
            display.i2c.writes,
            [
                (SSD1306_ADDR, std::vec![CONTROL_CMD, cmd::DISPLAY_OFF]),
                (SSD1306_ADDR, std::vec![CONTROL_CMD, cmd::DISPLAY_ON]),
            ]
        );
    }
}
