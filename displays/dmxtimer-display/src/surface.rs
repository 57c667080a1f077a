//! `DisplaySurface` over embedded-graphics
//!
//! Text uses the 6x10 mono font, top-left anchored, with no background
//! fill so callers control exactly which pixels are cleared.

use dmxtimer_core::traits::{DisplaySurface, Rect, Shade};
use embedded_graphics::image::{GetPixel, ImageRaw};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use embedded_graphics::text::{Baseline, Text};

/// Monochrome draw target with power control and an explicit flush
///
/// Buffered panels draw into RAM and transfer on [`Panel::flush`];
/// unbuffered ones may treat it as a no-op.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Switch the panel on or off, keeping its contents
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Push buffered drawing to the glass
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Adapter from the core drawing primitives to an embedded-graphics panel
pub struct GraphicsSurface<P> {
    panel: P,
}

fn color(shade: Shade) -> BinaryColor {
    match shade {
        Shade::Background => BinaryColor::Off,
        Shade::Foreground => BinaryColor::On,
    }
}

fn rectangle(area: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(area.x, area.y),
        Size::new(area.width, area.height),
    )
}

impl<P: Panel> GraphicsSurface<P> {
    pub fn new(panel: P) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn into_inner(self) -> P {
        self.panel
    }
}

impl<P: Panel> DisplaySurface for GraphicsSurface<P> {
    type Error = P::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.panel.clear(BinaryColor::Off)
    }

    fn fill_rect(&mut self, area: Rect, shade: Shade) -> Result<(), Self::Error> {
        self.panel.fill_solid(&rectangle(area), color(shade))
    }

    fn outline_rect(&mut self, area: Rect, shade: Shade) -> Result<(), Self::Error> {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(color(shade))
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        rectangle(area).into_styled(style).draw(&mut self.panel)
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, ink: Shade) -> Result<(), Self::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, color(ink));
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.panel)?;
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        data: &[u8],
        ink: Shade,
    ) -> Result<(), Self::Error> {
        let raw = ImageRaw::<BinaryColor>::new(data, width);
        let origin = Point::new(x, y);
        let ink = color(ink);

        // Only set bits are drawn; the rest of the area is left alone
        let pixels = raw
            .bounding_box()
            .points()
            .filter(|p| raw.pixel(*p) == Some(BinaryColor::On))
            .map(|p| Pixel(p + origin, ink));
        self.panel.draw_iter(pixels)
    }

    fn set_power(&mut self, on: bool) -> Result<(), Self::Error> {
        self.panel.set_power(on)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.panel.flush()
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;

    /// 128x64 in-memory panel
    struct Canvas {
        pixels: [[bool; 128]; 64],
        on: bool,
        flushes: usize,
    }

    impl Canvas {
        fn new() -> Self {
            Self {
                pixels: [[false; 128]; 64],
                on: false,
                flushes: 0,
            }
        }

        fn get(&self, x: usize, y: usize) -> bool {
            self.pixels[y][x]
        }

        fn lit_in(&self, area: Rect) -> usize {
            let mut n = 0;
            for y in area.y..area.y + area.height as i32 {
                for x in area.x..area.x + area.width as i32 {
                    n += self.get(x as usize, y as usize) as usize;
                }
            }
            n
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size {
            Size::new(128, 64)
        }
    }

    impl DrawTarget for Canvas {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, c) in pixels {
                if (0..128).contains(&p.x) && (0..64).contains(&p.y) {
                    self.pixels[p.y as usize][p.x as usize] = c.is_on();
                }
            }
            Ok(())
        }
    }

    impl Panel for Canvas {
        fn set_power(&mut self, on: bool) -> Result<(), Infallible> {
            self.on = on;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_fill_and_outline() {
        let mut surface = GraphicsSurface::new(Canvas::new());
        let area = Rect::new(96, 14, 22, 10);

        surface.fill_rect(area, Shade::Foreground).unwrap();
        assert_eq!(surface.panel().lit_in(area), 22 * 10);
        assert!(!surface.panel().get(95, 14));
        assert!(!surface.panel().get(118, 14));

        surface.outline_rect(area, Shade::Background).unwrap();
        // Border cleared, interior untouched
        assert!(!surface.panel().get(96, 14));
        assert!(!surface.panel().get(117, 23));
        assert!(surface.panel().get(97, 15));
        assert_eq!(surface.panel().lit_in(area), 20 * 8);
    }

    #[test]
    fn test_text_stays_in_cell() {
        let mut surface = GraphicsSurface::new(Canvas::new());
        surface.draw_text(98, 14, "512", Shade::Foreground).unwrap();

        let cell = Rect::new(98, 14, 18, 10);
        assert!(surface.panel().lit_in(cell) > 0);
        assert_eq!(
            surface.panel().lit_in(Rect::new(0, 0, 128, 14)),
            0,
            "text drawn above its row"
        );
    }

    #[test]
    fn test_bitmap_is_transparent() {
        let mut surface = GraphicsSurface::new(Canvas::new());
        surface
            .fill_rect(Rect::new(0, 0, 16, 2), Shade::Foreground)
            .unwrap();

        // One row of 10 pixels: only the first and last set
        let data = [0x80, 0x40, 0x00, 0x00];
        surface
            .draw_bitmap(0, 0, 10, &data, Shade::Background)
            .unwrap();

        assert!(!surface.panel().get(0, 0));
        assert!(surface.panel().get(1, 0));
        assert!(!surface.panel().get(9, 0));
        // Clear bits left what was there
        assert!(surface.panel().get(0, 1));
    }

    #[test]
    fn test_power_and_flush_forwarded() {
        let mut surface = GraphicsSurface::new(Canvas::new());
        surface.set_power(true).unwrap();
        surface.flush().unwrap();

        assert!(surface.panel().on);
        assert_eq!(surface.panel().flushes, 1);

        surface.clear().unwrap();
        assert_eq!(surface.into_inner().lit_in(Rect::new(0, 0, 128, 64)), 0);
    }
}
