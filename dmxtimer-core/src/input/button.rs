//! Push-button debouncing
//!
//! A press is accepted when the line is active and the quiet interval has
//! elapsed since the previous accepted press. After that the debouncer is
//! disarmed and ignores the line until it observes one inactive sample,
//! so a held button produces exactly one click.

/// Edge-triggered debouncer
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    quiet_ms: u64,
    /// Set once the line has been seen inactive since the last click
    armed: bool,
    last_accept_ms: Option<u64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet interval
    pub const fn new(quiet_ms: u16) -> Self {
        Self {
            quiet_ms: quiet_ms as u64,
            armed: true,
            last_accept_ms: None,
        }
    }

    /// Feed one sample; returns `true` when a click is accepted
    pub fn update(&mut self, active: bool, now_ms: u64) -> bool {
        if !active {
            self.armed = true;
            return false;
        }

        if !self.armed {
            return false;
        }

        let quiet = match self.last_accept_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.quiet_ms,
            None => true,
        };

        if quiet {
            self.last_accept_ms = Some(now_ms);
            self.armed = false;
        }

        quiet
    }

    /// Whether the next active sample may be accepted
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_accepted() {
        let mut db = Debouncer::new(180);
        assert!(db.update(true, 0));
        assert!(!db.is_armed());
    }

    #[test]
    fn test_hold_is_single_click() {
        let mut db = Debouncer::new(180);
        assert!(db.update(true, 100));
        assert!(!db.update(true, 400));
        assert!(!db.update(true, 5000));
    }

    #[test]
    fn test_bounce_within_window_rejected() {
        let mut db = Debouncer::new(180);
        assert!(db.update(true, 1000));
        // Contact bounce on release
        assert!(!db.update(false, 1010));
        assert!(!db.update(true, 1020));
        assert!(!db.update(false, 1030));
        // Clean second press after the window
        assert!(db.update(true, 1180));
    }

    #[test]
    fn test_requires_release_before_rearm() {
        let mut db = Debouncer::new(180);
        assert!(db.update(true, 0));
        // Still held long after the window
        assert!(!db.update(true, 1000));
        assert!(!db.update(false, 1001));
        assert!(db.update(true, 1002));
    }
}
