//! # esp32-motor-control
//!
//! Control of up to two DC motors through a dual H-bridge driver chip
//! (DRV8833, DRV8825, L298) using the motor-control PWM peripheral of a
//! microcontroller.
//!
//! ## Features
//!
//! - **Signed speed commands**: `-100..=100`, split into direction and duty
//! - **Full-speed bypass**: 100% drives the output high instead of modulating
//! - **Safe defaults**: commands to unknown or unattached motors are skipped,
//!   queries report them as stopped
//! - **Hardware abstraction**: the PWM peripheral is a trait, with a recording
//!   mock for desktop tests and an ESP32 MCPWM backend
//!
//! ## Architecture
//!
//! - `traits` - PWM peripheral abstraction and shared types
//! - `commands` - Command outcomes and rejection reasons
//! - `controller` - Motor slot state and command translation
//! - `config` - PWM timer and controller settings
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use esp32_motor_control::{MotorController, hal::MockPwm};
//!
//! let mut controller = MotorController::new(MockPwm::new());
//! controller.attach(0, 25, 26).unwrap();
//!
//! controller.set_speed(0, -40.0).unwrap();
//! assert_eq!(controller.speed(0), 40.0);
//! assert!(!controller.is_forward(0));
//!
//! controller.stop(0).unwrap();
//! assert!(controller.is_stopped(0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Command outcomes and rejection reasons.
pub mod commands;
/// Controller configuration.
pub mod config;
/// Dual motor controller translating speed commands into PWM writes.
pub mod controller;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use commands::{CommandOutcome, RejectReason};
pub use config::{ControllerConfig, PwmConfig};
pub use controller::{MotorController, MotorState, MAX_SPEED, MOTOR_COUNT, NO_PIN};
pub use traits::{
    CounterMode, Direction, DutyMode, GpioPin, Operator, PwmDriver, PwmUnit, TimerConfig,
};
