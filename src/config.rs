//! Controller configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use esp32_motor_control::config::{ControllerConfig, PwmConfig};
//!
//! // Use defaults (5 kHz carrier, 160 MHz timer clock)
//! let config = ControllerConfig::default();
//!
//! // Or customize
//! let config = ControllerConfig::default()
//!     .with_name("rover")
//!     .with_pwm(PwmConfig::default().with_frequency_hz(20_000));
//! ```

use crate::traits::{CounterMode, DutyMode, TimerConfig};
use heapless::String as HString;

/// Maximum length for the controller name
pub const MAX_NAME_LEN: usize = 32;

/// Type alias for the controller name
pub type NameString = HString<MAX_NAME_LEN>;

/// Create a NameString from a &str, truncating if too long
pub fn name_string(s: &str) -> NameString {
    let mut hs = NameString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete controller configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    /// Name used to tag log output
    pub name: NameString,
    /// PWM timer settings applied to every attached unit
    pub pwm: PwmConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            name: name_string("motors"),
            pwm: PwmConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Set the controller name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name_string(name);
        self
    }

    /// Set PWM configuration
    pub fn with_pwm(mut self, pwm: PwmConfig) -> Self {
        self.pwm = pwm;
        self
    }
}

// ============================================================================
// PWM Config
// ============================================================================

/// PWM timer configuration
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PwmConfig {
    /// Carrier frequency in Hz
    pub frequency_hz: u32,
    /// Timer tick rate in Hz
    pub timer_frequency_hz: u32,
    /// Counting mode
    pub counter_mode: CounterMode,
    /// Duty modulation mode, also re-asserted on every duty write
    pub duty_mode: DutyMode,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 5_000,
            timer_frequency_hz: 160_000_000,
            counter_mode: CounterMode::UpDown,
            duty_mode: DutyMode::ActiveHigh,
        }
    }
}

impl PwmConfig {
    /// Set the carrier frequency
    pub fn with_frequency_hz(mut self, hz: u32) -> Self {
        self.frequency_hz = hz;
        self
    }

    /// Set the timer tick rate
    pub fn with_timer_frequency_hz(mut self, hz: u32) -> Self {
        self.timer_frequency_hz = hz;
        self
    }

    /// Set the counting mode
    pub fn with_counter_mode(mut self, mode: CounterMode) -> Self {
        self.counter_mode = mode;
        self
    }

    /// Set the duty mode
    pub fn with_duty_mode(mut self, mode: DutyMode) -> Self {
        self.duty_mode = mode;
        self
    }

    /// Timer configuration for a freshly attached unit (0% duty on both operators)
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            frequency_hz: self.frequency_hz,
            duty_a: 0.0,
            duty_b: 0.0,
            counter_mode: self.counter_mode,
            duty_mode: self.duty_mode,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.name.as_str(), "motors");
        assert_eq!(config.pwm.frequency_hz, 5_000);
        assert_eq!(config.pwm.timer_frequency_hz, 160_000_000);
        assert_eq!(config.pwm.counter_mode, CounterMode::UpDown);
        assert_eq!(config.pwm.duty_mode, DutyMode::ActiveHigh);
    }

    #[test]
    fn builder_pattern() {
        let config = ControllerConfig::default().with_name("rover").with_pwm(
            PwmConfig::default()
                .with_frequency_hz(20_000)
                .with_timer_frequency_hz(80_000_000)
                .with_counter_mode(CounterMode::Up)
                .with_duty_mode(DutyMode::ActiveLow),
        );

        assert_eq!(config.name.as_str(), "rover");
        assert_eq!(config.pwm.frequency_hz, 20_000);
        assert_eq!(config.pwm.timer_frequency_hz, 80_000_000);
        assert_eq!(config.pwm.counter_mode, CounterMode::Up);
        assert_eq!(config.pwm.duty_mode, DutyMode::ActiveLow);
    }

    #[test]
    fn timer_config_starts_at_zero_duty() {
        let pwm = PwmConfig::default().with_frequency_hz(1_000);
        let timer = pwm.timer_config();
        assert_eq!(timer.frequency_hz, 1_000);
        assert_eq!(timer.duty_a, 0.0);
        assert_eq!(timer.duty_b, 0.0);
        assert_eq!(timer.counter_mode, pwm.counter_mode);
        assert_eq!(timer.duty_mode, pwm.duty_mode);
    }

    #[test]
    fn name_string_truncation() {
        let long_input = "m".repeat(100);
        let s = name_string(&long_input);
        assert_eq!(s.len(), MAX_NAME_LEN);
    }

    #[test]
    fn name_string_utf8_boundary() {
        // 3-byte characters do not divide 32 evenly
        let input = "€€€€€€€€€€€€€€€€";
        let s = name_string(input);
        assert!(s.len() <= MAX_NAME_LEN);
        assert_eq!(s.len() % 3, 0);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
