//! Timed output engine
//!
//! Drives the output channel through idle / wait / active phases from
//! deadlines on the monotonic clock, and rewrites the channel value at a
//! fixed cadence whether or not anything changed.

pub mod engine;

pub use engine::{Phase, Readout, SequenceEngine, StartError, Transition};
