//! Dual DC motor controller on top of a two-unit PWM peripheral.
//!
//! This module provides [`MotorController`], which owns the state of two
//! motor slots and turns signed speed commands into forced levels and duty
//! writes on the [`PwmDriver`].
//!
//! # Overview
//!
//! Each slot is bound to one PWM unit. Operator A drives the forward input
//! of the H-bridge, operator B the reverse input:
//!
//! | Command | Operator A | Operator B |
//! |---------|------------|------------|
//! | forward, `0 <= s < 100` | duty `s`% | low |
//! | forward, `s >= 100` | high | low |
//! | reverse, `0 <= s < 100` | low | duty `s`% |
//! | reverse, `s >= 100` | low | high |
//! | stop | low | low |
//!
//! # Example
//!
//! ```rust
//! use esp32_motor_control::{MotorController, hal::MockPwm};
//!
//! let mut controller = MotorController::new(MockPwm::new());
//!
//! // Left motor on GPIO25/26, right motor on GPIO27/14
//! controller.attach_pair(25, 26, 27, 14).unwrap();
//!
//! controller.set_speed(0, 60.0).unwrap();
//! controller.set_speed(1, -60.0).unwrap();
//!
//! assert!(controller.is_forward(0));
//! assert!(!controller.is_forward(1));
//! assert_eq!(controller.speed(1), 60.0);
//!
//! controller.stop_all().unwrap();
//! assert!(controller.is_stopped(0) && controller.is_stopped(1));
//! ```
//!
//! # Invalid Motors
//!
//! Commands for a motor index other than 0 or 1, or for a slot that has
//! not been attached, write nothing and return
//! [`CommandOutcome::Rejected`]. Queries fall back to the stopped view:
//! speed 0, not forward, stopped.

use crate::commands::{CommandOutcome, RejectReason};
use crate::config::ControllerConfig;
use crate::traits::{Direction, GpioPin, Operator, PwmDriver, PwmUnit};

/// Number of motor slots.
pub const MOTOR_COUNT: usize = 2;

/// Pin value meaning "no pin" for the second motor in [`MotorController::attach_pair`].
pub const NO_PIN: GpioPin = 0;

/// Full-scale speed (percent).
pub const MAX_SPEED: f32 = 100.0;

/// State of one motor slot.
///
/// `direction` keeps the last stored flag even when `speed` is 0; use
/// [`is_forward`](Self::is_forward) for the moving-only view.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorState {
    /// Whether a channel pair has been bound to this slot.
    pub attached: bool,
    /// Commanded magnitude, 0.0 to 100.0.
    pub speed: f32,
    /// Direction flag of the last command.
    pub direction: Direction,
}

impl Default for MotorState {
    fn default() -> Self {
        Self {
            attached: false,
            speed: 0.0,
            direction: Direction::Forward,
        }
    }
}

impl MotorState {
    /// True when no drive is applied.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0
    }

    /// True when moving forward. A stopped motor is never forward.
    #[inline]
    pub fn is_forward(&self) -> bool {
        !self.is_stopped() && self.direction == Direction::Forward
    }

    /// True when moving in reverse. A stopped motor is never in reverse.
    #[inline]
    pub fn is_reverse(&self) -> bool {
        !self.is_stopped() && self.direction == Direction::Reverse
    }
}

/// Controller for up to two DC motors on a dual H-bridge.
///
/// # Type Parameter
///
/// - `P`: The PWM peripheral implementation ([`PwmDriver`] trait)
///
/// # Thread Safety
///
/// The controller is not thread-safe and every call writes straight to the
/// peripheral. If a control loop and an interrupt handler both command the
/// same motor, serialize access externally (e.g. `Mutex<MotorController<_>>`).
pub struct MotorController<P: PwmDriver> {
    pwm: P,
    config: ControllerConfig,
    slots: [MotorState; MOTOR_COUNT],
}

impl<P: PwmDriver> MotorController<P> {
    /// Create a controller with default configuration; nothing is attached.
    pub fn new(pwm: P) -> Self {
        Self::with_config(pwm, ControllerConfig::default())
    }

    /// Create a controller with the given configuration; nothing is attached.
    pub fn with_config(pwm: P, config: ControllerConfig) -> Self {
        Self {
            pwm,
            config,
            slots: [MotorState::default(); MOTOR_COUNT],
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Borrow the PWM driver.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Mutably borrow the PWM driver.
    pub fn pwm_mut(&mut self) -> &mut P {
        &mut self.pwm
    }

    /// Consume the controller and return the PWM driver.
    pub fn into_inner(self) -> P {
        self.pwm
    }

    // ========================================================================
    // Attachment
    // ========================================================================

    /// Bind `pin_a`/`pin_b` to motor `motor` and initialize its PWM unit.
    ///
    /// The unit's timer is configured from [`ControllerConfig::pwm`] with
    /// 0% duty on both operators. A slot is attached once; attaching it
    /// again returns [`RejectReason::AlreadyAttached`] without touching
    /// the hardware.
    pub fn attach(
        &mut self,
        motor: u8,
        pin_a: GpioPin,
        pin_b: GpioPin,
    ) -> Result<CommandOutcome, P::Error> {
        let Some(unit) = PwmUnit::for_motor(motor) else {
            return Ok(self.reject(motor, "attach", RejectReason::InvalidIndex));
        };
        if self.slots[unit.index()].attached {
            return Ok(self.reject(motor, "attach", RejectReason::AlreadyAttached));
        }

        log::info!(
            "[{}] attaching motor {} (A=GPIO{}, B=GPIO{})",
            self.config.name,
            motor,
            pin_a,
            pin_b
        );

        let pwm_config = self.config.pwm;
        self.pwm.init_channel_pair(unit, pin_a, pin_b)?;
        self.pwm.configure_timer(unit, &pwm_config.timer_config())?;
        self.pwm
            .set_timer_frequency(unit, pwm_config.timer_frequency_hz)?;

        self.slots[unit.index()] = MotorState {
            attached: true,
            ..MotorState::default()
        };
        Ok(CommandOutcome::Applied)
    }

    /// Attach motor 0, and motor 1 unless both of its pins are [`NO_PIN`].
    ///
    /// Returns the outcome for motor 0 and, if it was requested, motor 1.
    ///
    /// ```rust
    /// use esp32_motor_control::{MotorController, NO_PIN, hal::MockPwm};
    ///
    /// let mut controller = MotorController::new(MockPwm::new());
    /// let (first, second) = controller.attach_pair(25, 26, NO_PIN, NO_PIN).unwrap();
    ///
    /// assert!(first.is_applied());
    /// assert!(second.is_none());
    /// assert!(!controller.is_valid(1));
    /// ```
    pub fn attach_pair(
        &mut self,
        pin_a0: GpioPin,
        pin_b0: GpioPin,
        pin_a1: GpioPin,
        pin_b1: GpioPin,
    ) -> Result<(CommandOutcome, Option<CommandOutcome>), P::Error> {
        let first = self.attach(0, pin_a0, pin_b0)?;
        let second = if pin_a1 == NO_PIN && pin_b1 == NO_PIN {
            None
        } else {
            Some(self.attach(1, pin_a1, pin_b1)?)
        };
        Ok((first, second))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Drive `motor` at a signed speed: positive is forward, otherwise reverse
    /// at `|speed|`.
    ///
    /// A speed of exactly 0 takes the reverse path with magnitude 0. The
    /// motor stops and the stored flag becomes [`Direction::Reverse`].
    pub fn set_speed(&mut self, motor: u8, speed: f32) -> Result<CommandOutcome, P::Error> {
        if speed > 0.0 {
            self.drive_forward(motor, speed)
        } else {
            self.drive_reverse(motor, -speed)
        }
    }

    /// Drive `motor` forward at `magnitude` percent (clamped to 0..=100).
    pub fn drive_forward(
        &mut self,
        motor: u8,
        magnitude: f32,
    ) -> Result<CommandOutcome, P::Error> {
        self.drive(motor, Direction::Forward, magnitude)
    }

    /// Drive `motor` in reverse at `magnitude` percent (clamped to 0..=100).
    pub fn drive_reverse(
        &mut self,
        motor: u8,
        magnitude: f32,
    ) -> Result<CommandOutcome, P::Error> {
        self.drive(motor, Direction::Reverse, magnitude)
    }

    /// Full speed forward: A forced high, B forced low.
    pub fn drive_full_forward(&mut self, motor: u8) -> Result<CommandOutcome, P::Error> {
        match self.check(motor) {
            Ok(unit) => self.apply_full(unit, Direction::Forward),
            Err(reason) => Ok(self.reject(motor, "drive_full_forward", reason)),
        }
    }

    /// Full speed reverse: A forced low, B forced high.
    pub fn drive_full_reverse(&mut self, motor: u8) -> Result<CommandOutcome, P::Error> {
        match self.check(motor) {
            Ok(unit) => self.apply_full(unit, Direction::Reverse),
            Err(reason) => Ok(self.reject(motor, "drive_full_reverse", reason)),
        }
    }

    /// Force both outputs of `motor` low.
    ///
    /// The direction flag is set to [`Direction::Forward`]; queries still
    /// report the motor as neither forward nor reverse while stopped.
    pub fn stop(&mut self, motor: u8) -> Result<CommandOutcome, P::Error> {
        let unit = match self.check(motor) {
            Ok(unit) => unit,
            Err(reason) => return Ok(self.reject(motor, "stop", reason)),
        };

        self.release(unit, Operator::A)?;
        self.release(unit, Operator::B)?;

        let slot = &mut self.slots[unit.index()];
        slot.speed = 0.0;
        slot.direction = Direction::Forward;
        log::debug!("[{}] motor {} stop", self.config.name, motor);
        Ok(CommandOutcome::Applied)
    }

    /// Stop motor 0 then motor 1. Unattached slots are skipped.
    ///
    /// Both slots are always attempted; the first peripheral error, if any,
    /// is returned after the second attempt.
    pub fn stop_all(&mut self) -> Result<(), P::Error> {
        let mut first_err = None;
        for motor in 0..MOTOR_COUNT as u8 {
            if let Err(err) = self.stop(motor) {
                log::error!("[{}] stop motor {} failed", self.config.name, motor);
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn drive(
        &mut self,
        motor: u8,
        direction: Direction,
        magnitude: f32,
    ) -> Result<CommandOutcome, P::Error> {
        let unit = match self.check(motor) {
            Ok(unit) => unit,
            Err(reason) => {
                let command = match direction {
                    Direction::Forward => "drive_forward",
                    Direction::Reverse => "drive_reverse",
                };
                return Ok(self.reject(motor, command, reason));
            }
        };

        let magnitude = clamp_percent(magnitude);
        if magnitude >= MAX_SPEED {
            return self.apply_full(unit, direction);
        }

        let active = direction.active_operator();
        self.release(unit, active.opposite())?;
        let duty_mode = self.config.pwm.duty_mode;
        if let Err(err) = self.pwm.set_modulated(unit, active, magnitude, duty_mode) {
            self.recover(unit, active);
            return Err(err);
        }

        let slot = &mut self.slots[unit.index()];
        slot.speed = magnitude;
        slot.direction = direction;
        log::debug!(
            "[{}] motor {} {} {}%",
            self.config.name,
            unit.index(),
            direction.as_str(),
            magnitude
        );
        Ok(CommandOutcome::Applied)
    }

    fn apply_full(
        &mut self,
        unit: PwmUnit,
        direction: Direction,
    ) -> Result<CommandOutcome, P::Error> {
        let active = direction.active_operator();
        self.release(unit, active.opposite())?;
        if let Err(err) = self.pwm.set_signal_high(unit, active) {
            self.recover(unit, active);
            return Err(err);
        }

        let slot = &mut self.slots[unit.index()];
        slot.speed = MAX_SPEED;
        slot.direction = direction;
        log::debug!(
            "[{}] motor {} full {}",
            self.config.name,
            unit.index(),
            direction.as_str()
        );
        Ok(CommandOutcome::Applied)
    }

    /// Force `op` low and record the effect on the slot.
    ///
    /// While a slot is moving, only the operator of its stored direction
    /// carries drive; the other one is low. Releasing the driving operator
    /// therefore leaves the motor stopped.
    fn release(&mut self, unit: PwmUnit, op: Operator) -> Result<(), P::Error> {
        self.pwm.set_signal_low(unit, op)?;
        let slot = &mut self.slots[unit.index()];
        if !slot.is_stopped() && slot.direction.active_operator() == op {
            slot.speed = 0.0;
        }
        Ok(())
    }

    /// After a drive write failed with the opposite operator already low,
    /// try to force `active` low too so the slot ends up in a known state.
    ///
    /// If this also fails the slot keeps its last recorded state.
    fn recover(&mut self, unit: PwmUnit, active: Operator) {
        match self.pwm.set_signal_low(unit, active) {
            Ok(()) => {
                log::warn!(
                    "[{}] motor {} write failed, forced stop",
                    self.config.name,
                    unit.index()
                );
                self.slots[unit.index()].speed = 0.0;
            }
            Err(_) => log::error!(
                "[{}] motor {} write failed, output state unknown",
                self.config.name,
                unit.index()
            ),
        }
    }

    fn reject(&self, motor: u8, command: &str, reason: RejectReason) -> CommandOutcome {
        match reason {
            // stop_all routinely hits an unattached second slot
            RejectReason::NotAttached => {
                log::debug!("[{}] {} motor {}: {}", self.config.name, command, motor, reason)
            }
            _ => log::warn!("[{}] {} motor {}: {}", self.config.name, command, motor, reason),
        }
        CommandOutcome::Rejected(reason)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The validity gate: the unit for `motor` if it exists and is attached.
    ///
    /// ```rust
    /// use esp32_motor_control::{MotorController, RejectReason, hal::MockPwm};
    ///
    /// let controller = MotorController::new(MockPwm::new());
    /// assert_eq!(controller.check(1), Err(RejectReason::NotAttached));
    /// assert_eq!(controller.check(2), Err(RejectReason::InvalidIndex));
    /// ```
    pub fn check(&self, motor: u8) -> Result<PwmUnit, RejectReason> {
        let unit = PwmUnit::for_motor(motor).ok_or(RejectReason::InvalidIndex)?;
        if self.slots[unit.index()].attached {
            Ok(unit)
        } else {
            Err(RejectReason::NotAttached)
        }
    }

    /// True if `motor` is 0 or 1 and attached.
    pub fn is_valid(&self, motor: u8) -> bool {
        self.check(motor).is_ok()
    }

    /// Commanded magnitude of `motor` (0.0 to 100.0); 0.0 if invalid.
    pub fn speed(&self, motor: u8) -> f32 {
        self.valid_slot(motor).map_or(0.0, |slot| slot.speed)
    }

    /// True if `motor` is valid and moving forward.
    pub fn is_forward(&self, motor: u8) -> bool {
        self.valid_slot(motor).is_some_and(MotorState::is_forward)
    }

    /// True if `motor` is invalid or has zero speed.
    pub fn is_stopped(&self, motor: u8) -> bool {
        self.valid_slot(motor).map_or(true, MotorState::is_stopped)
    }

    /// Stored direction flag of `motor`, if valid.
    pub fn direction(&self, motor: u8) -> Option<Direction> {
        self.valid_slot(motor).map(|slot| slot.direction)
    }

    /// Snapshot of slot `motor`, attached or not. `None` past slot 1.
    pub fn state(&self, motor: u8) -> Option<MotorState> {
        PwmUnit::for_motor(motor).map(|unit| self.slots[unit.index()])
    }

    /// Snapshot of both slots.
    pub fn states(&self) -> [MotorState; MOTOR_COUNT] {
        self.slots
    }

    fn valid_slot(&self, motor: u8) -> Option<&MotorState> {
        self.check(motor).ok().map(|unit| &self.slots[unit.index()])
    }
}

/// Clamp a magnitude into `0..=MAX_SPEED`; NaN becomes 0.
fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_SPEED)
    }
}

// ============================================================================
// Tests
// ============================================================================
