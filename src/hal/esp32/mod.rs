//! ESP32 hardware abstraction layer for dual DC motor control.
//!
//! This module provides the MCPWM-backed [`PwmDriver`] for an ESP32 driving
//! a dual H-bridge such as the DRV8833, DRV8825 or L298.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 (two MCPWM units)
//! - **Motor Driver**: DRV8833 dual H-bridge (IN1/IN2 per channel)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for the default GPIO assignments.
//!
//! [`PwmDriver`]: crate::traits::PwmDriver

mod mcpwm;

pub use mcpwm::Esp32Mcpwm;

/// Default pin assignments for a DRV8833 breakout.
pub mod pins {
    use crate::traits::GpioPin;

    // =========================================================================
    // Motor 0 (MCPWM unit 0)
    // =========================================================================

    /// Motor 0 forward input (AIN1)
    pub const MOTOR0_IN1: GpioPin = 25;

    /// Motor 0 reverse input (AIN2)
    pub const MOTOR0_IN2: GpioPin = 26;

    // =========================================================================
    // Motor 1 (MCPWM unit 1)
    // =========================================================================

    /// Motor 1 forward input (BIN1)
    pub const MOTOR1_IN1: GpioPin = 27;

    /// Motor 1 reverse input (BIN2)
    pub const MOTOR1_IN2: GpioPin = 14;
}
