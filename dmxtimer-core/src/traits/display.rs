//! Display surface trait
//!
//! A monochrome pixel canvas with rectangle, text and bitmap primitives.
//! There is no double buffering contract: whatever a caller draws may
//! become visible on the next [`DisplaySurface::flush`], so every redraw
//! must clear exactly the area it owns before drawing into it.

/// Pixel rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width as i32 <= self.x + self.width as i32
            && other.y + other.height as i32 <= self.y + self.height as i32
    }
}

/// Monochrome pixel value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shade {
    /// Pixel off (canvas color)
    Background,
    /// Pixel lit
    Foreground,
}

impl Shade {
    /// The opposite shade (ink color on a filled background)
    pub fn inverse(self) -> Self {
        match self {
            Shade::Background => Shade::Foreground,
            Shade::Foreground => Shade::Background,
        }
    }
}

/// Drawing surface consumed by the render cache
///
/// Text is drawn with a fixed 6x10 monospace font, top-left anchored,
/// with a transparent background.
pub trait DisplaySurface {
    /// Error type for drawing and bus operations
    type Error;

    /// Clear the whole canvas to [`Shade::Background`]
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Fill a rectangle
    fn fill_rect(&mut self, area: Rect, shade: Shade) -> Result<(), Self::Error>;

    /// Draw a one-pixel rectangle outline on the border of `area`
    fn outline_rect(&mut self, area: Rect, shade: Shade) -> Result<(), Self::Error>;

    /// Draw text with its top-left corner at (`x`, `y`)
    fn draw_text(&mut self, x: i32, y: i32, text: &str, ink: Shade) -> Result<(), Self::Error>;

    /// Draw a 1-bit bitmap (MSB first, rows padded to whole bytes)
    ///
    /// Set bits are drawn in `ink`; clear bits are left untouched.
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        data: &[u8],
        ink: Shade,
    ) -> Result<(), Self::Error>;

    /// Switch the panel on or off; content is retained while off
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Push pending drawing to the panel
    fn flush(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(0, 14, 128, 10);
        assert!(outer.contains(&Rect::new(96, 14, 22, 10)));
        assert!(!outer.contains(&Rect::new(96, 13, 22, 10)));
        assert!(!outer.contains(&Rect::new(120, 14, 22, 10)));
    }

    #[test]
    fn test_shade_inverse() {
        assert_eq!(Shade::Background.inverse(), Shade::Foreground);
        assert_eq!(Shade::Foreground.inverse(), Shade::Background);
    }
}
