//! Device settings compiled in from timer.toml

use dmxtimer_core::config::{Defaults, RepeatMode, TimerSettings};

include!(concat!(env!("OUT_DIR"), "/settings.rs"));
