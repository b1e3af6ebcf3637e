//! PWM backends for [`MotorController`](crate::MotorController).
//!
//! - [`MockPwm`]: records every call and models what each operator output
//!   would show. Used by the tests and for running off-target.
//! - `Esp32Mcpwm`: drives both MCPWM units of an ESP32 through ESP-IDF.
//!   Needs the `esp32` feature.
//!
//! Pin assignments for the demo board are in `esp32::pins`.

pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
