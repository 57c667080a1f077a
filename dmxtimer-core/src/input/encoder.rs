//! Rotary encoder decoding
//!
//! Edge-gated quadrature decoding: a step is reported on each rising edge
//! of phase A, with phase B sampled on that edge giving the direction.
//! There is no filtering on B. Chatter on A can produce a wrong-direction
//! step; the menu absorbs that by clamping and wrapping values.

use super::Direction;

/// Phase-A edge decoder
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    last_a: bool,
}

impl QuadratureDecoder {
    /// Create a decoder seeded with the current level of phase A
    ///
    /// Seeding avoids a phantom step when A idles high at power-on.
    pub const fn new(initial_a: bool) -> Self {
        Self { last_a: initial_a }
    }

    /// Feed one sample of both phases
    ///
    /// Returns a direction on the rising edge of A:
    /// B high -> clockwise (+1), B low -> counter-clockwise (-1).
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        let rising = a && !self.last_a;
        self.last_a = a;

        if !rising {
            return None;
        }

        Some(if b {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_edge_with_b_high_is_clockwise() {
        let mut dec = QuadratureDecoder::new(false);
        assert_eq!(dec.update(true, true), Some(Direction::Clockwise));
    }

    #[test]
    fn test_rising_edge_with_b_low_is_counter_clockwise() {
        let mut dec = QuadratureDecoder::new(false);
        assert_eq!(dec.update(true, false), Some(Direction::CounterClockwise));
    }

    #[test]
    fn test_level_and_falling_edge_ignored() {
        let mut dec = QuadratureDecoder::new(false);
        assert_eq!(dec.update(true, true), Some(Direction::Clockwise));
        // A held high
        assert_eq!(dec.update(true, false), None);
        // Falling edge
        assert_eq!(dec.update(false, false), None);
        // B toggling alone
        assert_eq!(dec.update(false, true), None);
    }

    #[test]
    fn test_seeded_high_does_not_step() {
        let mut dec = QuadratureDecoder::new(true);
        assert_eq!(dec.update(true, true), None);
    }

    #[test]
    fn test_full_detents() {
        let mut dec = QuadratureDecoder::new(false);
        let mut steps = 0i32;

        // Three clockwise cycles: B is high whenever A rises
        for _ in 0..3 {
            for (a, b) in [(false, true), (true, true), (true, false), (false, false)] {
                if let Some(dir) = dec.update(a, b) {
                    steps += dir.delta() as i32;
                }
            }
        }
        assert_eq!(steps, 3);
    }
}
