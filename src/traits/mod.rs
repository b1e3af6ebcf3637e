//! Trait definitions for hardware abstraction.
//!
//! This module defines the abstraction that allows the motor controller to:
//! - Run on ESP32 hardware through the MCPWM peripheral
//! - Run on desktop against a recording mock for tests
//!
//! # Submodules
//!
//! - `hardware`: PWM peripheral trait, unit/operator identifiers, direction
//!
//! # Hardware Abstraction
//!
//! The key hardware trait is [`PwmDriver`]: channel-pair setup, timer
//! configuration, forced output levels and duty-cycle writes.

pub mod hardware;

pub use hardware::*;
