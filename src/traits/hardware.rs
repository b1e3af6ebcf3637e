//! Hardware abstraction traits for the PWM peripheral driving the H-bridge.
//!
//! This module defines the narrow interface the [`MotorController`] needs
//! from a motor-control PWM peripheral, so the command logic can run
//! unchanged on ESP32 hardware or against a recording test double.
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`PwmDriver`] | Channel-pair setup, timer config, level and duty writes |
//! | [`PwmUnit`] | One PWM unit (and its timer) per motor slot |
//! | [`Operator`] | Operator output A (forward) or B (reverse) |
//! | [`TimerConfig`] | Carrier frequency, initial duties, counting/duty mode |
//! | [`Direction`] | Sign of the last drive command |
//!
//! # Implementation
//!
//! For testing and desktop development, use [`MockPwm`] from
//! [`crate::hal::mock`]. For ESP32 hardware, use `hal::esp32::Esp32Mcpwm`
//! (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use esp32_motor_control::traits::{DutyMode, Operator, PwmDriver, PwmUnit};
//! use esp32_motor_control::hal::{ChannelOutput, MockPwm};
//!
//! let mut pwm = MockPwm::new();
//! pwm.init_channel_pair(PwmUnit::Unit0, 25, 26).unwrap();
//! pwm.set_modulated(PwmUnit::Unit0, Operator::A, 40.0, DutyMode::ActiveHigh).unwrap();
//!
//! assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Duty(40.0));
//! ```
//!
//! [`MotorController`]: crate::MotorController
//! [`MockPwm`]: crate::hal::MockPwm

/// GPIO number as understood by the platform.
///
/// `0` is reserved by [`MotorController::attach_pair`] to mean "no pin".
///
/// [`MotorController::attach_pair`]: crate::MotorController::attach_pair
pub type GpioPin = u8;

/// Direction of the last drive command.
///
/// A stopped motor keeps whatever flag was last stored; use
/// [`MotorController::is_forward`] to get the moving-only view.
///
/// [`MotorController::is_forward`]: crate::MotorController::is_forward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Current flows through operator A (forward line).
    #[default]
    Forward,
    /// Current flows through operator B (reverse line).
    Reverse,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use esp32_motor_control::Direction;
    ///
    /// assert_eq!(Direction::Forward.as_str(), "forward");
    /// assert_eq!(Direction::Reverse.as_str(), "reverse");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }

    /// The operator that carries the drive signal for this direction.
    #[inline]
    pub const fn active_operator(&self) -> Operator {
        match self {
            Direction::Forward => Operator::A,
            Direction::Reverse => Operator::B,
        }
    }
}

/// A PWM unit. Motor slot N is bound to unit N, which always runs timer N.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PwmUnit {
    /// Unit 0, timer 0 (motor slot 0).
    Unit0,
    /// Unit 1, timer 1 (motor slot 1).
    Unit1,
}

impl PwmUnit {
    /// Both units in slot order.
    pub const ALL: [PwmUnit; 2] = [PwmUnit::Unit0, PwmUnit::Unit1];

    /// Maps a motor index to its unit; `None` for anything but 0 or 1.
    ///
    /// ```
    /// use esp32_motor_control::traits::PwmUnit;
    ///
    /// assert_eq!(PwmUnit::for_motor(1), Some(PwmUnit::Unit1));
    /// assert_eq!(PwmUnit::for_motor(2), None);
    /// ```
    #[inline]
    pub const fn for_motor(index: u8) -> Option<Self> {
        match index {
            0 => Some(PwmUnit::Unit0),
            1 => Some(PwmUnit::Unit1),
            _ => None,
        }
    }

    /// Slot index of this unit.
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            PwmUnit::Unit0 => 0,
            PwmUnit::Unit1 => 1,
        }
    }
}

/// One of the two complementary outputs of a PWM timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Forward drive line.
    A,
    /// Reverse drive line.
    B,
}

impl Operator {
    /// The other output of the same timer.
    #[inline]
    pub const fn opposite(&self) -> Operator {
        match self {
            Operator::A => Operator::B,
            Operator::B => Operator::A,
        }
    }
}

/// Timer counting mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CounterMode {
    /// Asymmetric, counts up then wraps.
    Up,
    /// Asymmetric, counts down then wraps.
    Down,
    /// Symmetric up-down counting (center-aligned PWM).
    #[default]
    UpDown,
}

/// Duty modulation polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DutyMode {
    /// Output is high for the duty portion of the period.
    #[default]
    ActiveHigh,
    /// Output is low for the duty portion of the period.
    ActiveLow,
}

/// Initial timer configuration applied once per attached unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerConfig {
    /// PWM carrier frequency in Hz.
    pub frequency_hz: u32,
    /// Initial duty on operator A (percent).
    pub duty_a: f32,
    /// Initial duty on operator B (percent).
    pub duty_b: f32,
    /// Counting mode.
    pub counter_mode: CounterMode,
    /// Duty modulation mode.
    pub duty_mode: DutyMode,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 5_000,
            duty_a: 0.0,
            duty_b: 0.0,
            counter_mode: CounterMode::UpDown,
            duty_mode: DutyMode::ActiveHigh,
        }
    }
}

/// Motor-control PWM peripheral.
///
/// Implement this for the PWM hardware that drives the H-bridge inputs.
/// Every call is a plain register-level write with no decision logic;
/// the [`MotorController`] decides what to write.
///
/// # Implementation Notes
///
/// - `init_channel_pair` is called once per unit before any other call on it
/// - Forcing a level with `set_signal_high`/`set_signal_low` overrides duty
///   modulation until `set_duty_mode` is asserted again
/// - Duty values are percentages in `[0.0, 100.0]`
///
/// # Example Implementation
///
/// ```rust,ignore
/// use esp32_motor_control::traits::*;
///
/// struct MyPwm { /* peripheral handles */ }
///
/// impl PwmDriver for MyPwm {
///     type Error = ();
///
///     fn set_duty(&mut self, unit: PwmUnit, op: Operator, percent: f32) -> Result<(), ()> {
///         // Write comparator register...
///         Ok(())
///     }
///     // ...
/// }
/// ```
///
/// [`MotorController`]: crate::MotorController
pub trait PwmDriver {
    /// Error type for peripheral operations.
    type Error;

    /// Bind two GPIO lines as the A/B outputs of `unit`.
    fn init_channel_pair(
        &mut self,
        unit: PwmUnit,
        pin_a: GpioPin,
        pin_b: GpioPin,
    ) -> Result<(), Self::Error>;

    /// Set carrier frequency, initial duties, counting and duty mode.
    fn configure_timer(&mut self, unit: PwmUnit, config: &TimerConfig)
        -> Result<(), Self::Error>;

    /// Set the timer tick rate, independent of the carrier frequency.
    fn set_timer_frequency(&mut self, unit: PwmUnit, hz: u32) -> Result<(), Self::Error>;

    /// Force an operator output to a constant high level.
    fn set_signal_high(&mut self, unit: PwmUnit, op: Operator) -> Result<(), Self::Error>;

    /// Force an operator output to a constant low level.
    fn set_signal_low(&mut self, unit: PwmUnit, op: Operator) -> Result<(), Self::Error>;

    /// Set the duty cycle of an operator output (percent).
    fn set_duty(&mut self, unit: PwmUnit, op: Operator, percent: f32) -> Result<(), Self::Error>;

    /// Re-enable duty modulation on an operator output.
    fn set_duty_mode(
        &mut self,
        unit: PwmUnit,
        op: Operator,
        mode: DutyMode,
    ) -> Result<(), Self::Error>;

    /// Apply `percent` duty to `op` and re-assert modulated mode.
    ///
    /// A channel that was forced high or low keeps that level until its
    /// duty mode is set again, so both writes are always issued.
    fn set_modulated(
        &mut self,
        unit: PwmUnit,
        op: Operator,
        percent: f32,
        mode: DutyMode,
    ) -> Result<(), Self::Error> {
        self.set_duty(unit, op, percent)?;
        self.set_duty_mode(unit, op, mode)
    }
}
