//! Mock implementation for testing without hardware.
//!
//! [`MockPwm`] stands in for the motor-control PWM peripheral. It keeps the
//! output each operator would produce and a bounded log of every call, so
//! tests can check both the resulting pin levels and the exact write order.
//!
//! # Example
//!
//! ```rust
//! use esp32_motor_control::MotorController;
//! use esp32_motor_control::hal::{ChannelOutput, MockPwm};
//! use esp32_motor_control::traits::{Operator, PwmUnit};
//!
//! let mut controller = MotorController::new(MockPwm::new());
//! controller.attach(0, 25, 26).unwrap();
//! controller.set_speed(0, 60.0).unwrap();
//!
//! let pwm = controller.pwm();
//! assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Duty(60.0));
//! assert_eq!(pwm.output(PwmUnit::Unit0, Operator::B), ChannelOutput::Low);
//! ```

use crate::traits::{DutyMode, GpioPin, Operator, PwmDriver, PwmUnit, TimerConfig};
use core::fmt;
use heapless::Deque;

/// Number of calls kept by [`MockPwm`]; older entries are dropped first.
pub const MOCK_CALL_CAPACITY: usize = 64;

/// Output an operator is currently producing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelOutput {
    /// Never written since init.
    Idle,
    /// Forced constant high.
    High,
    /// Forced constant low.
    Low,
    /// Duty-modulated at the given percentage.
    Duty(f32),
}

/// One recorded peripheral call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PwmCall {
    /// `init_channel_pair`
    InitChannelPair {
        /// Target unit.
        unit: PwmUnit,
        /// GPIO bound to operator A.
        pin_a: GpioPin,
        /// GPIO bound to operator B.
        pin_b: GpioPin,
    },
    /// `configure_timer`
    ConfigureTimer(PwmUnit, TimerConfig),
    /// `set_timer_frequency`
    SetTimerFrequency(PwmUnit, u32),
    /// `set_signal_high`
    SignalHigh(PwmUnit, Operator),
    /// `set_signal_low`
    SignalLow(PwmUnit, Operator),
    /// `set_duty`
    Duty(PwmUnit, Operator, f32),
    /// `set_duty_mode`
    DutyMode(PwmUnit, Operator, DutyMode),
}

/// Error returned by [`MockPwm`] when a failure has been armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockPwmError;

impl fmt::Display for MockPwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mock PWM failure")
    }
}

#[derive(Clone, Copy, Debug)]
struct UnitState {
    pins: Option<(GpioPin, GpioPin)>,
    timer: Option<TimerConfig>,
    timer_frequency_hz: Option<u32>,
    /// Last duty written per operator, even while forced.
    duty: [f32; 2],
    /// Whether the operator is being modulated (false after a forced level).
    modulated: [bool; 2],
    forced: [Option<bool>; 2],
    written: [bool; 2],
}

impl Default for UnitState {
    fn default() -> Self {
        Self {
            pins: None,
            timer: None,
            timer_frequency_hz: None,
            duty: [0.0; 2],
            modulated: [false; 2],
            forced: [None; 2],
            written: [false; 2],
        }
    }
}

/// Mock PWM peripheral for testing.
///
/// Records all calls for verification and models the output each operator
/// would produce. A forced level sticks until duty mode is re-asserted,
/// matching the real MCPWM behaviour.
///
/// # Example
///
/// ```rust
/// use esp32_motor_control::hal::{ChannelOutput, MockPwm, PwmCall};
/// use esp32_motor_control::traits::{Operator, PwmDriver, PwmUnit, DutyMode};
///
/// let mut pwm = MockPwm::new();
/// pwm.set_signal_high(PwmUnit::Unit1, Operator::B).unwrap();
/// assert_eq!(pwm.output(PwmUnit::Unit1, Operator::B), ChannelOutput::High);
///
/// // Duty alone does not undo the forced level
/// pwm.set_duty(PwmUnit::Unit1, Operator::B, 30.0).unwrap();
/// assert_eq!(pwm.output(PwmUnit::Unit1, Operator::B), ChannelOutput::High);
///
/// pwm.set_duty_mode(PwmUnit::Unit1, Operator::B, DutyMode::ActiveHigh).unwrap();
/// assert_eq!(pwm.output(PwmUnit::Unit1, Operator::B), ChannelOutput::Duty(30.0));
/// assert_eq!(pwm.call_count, 3);
/// ```
#[derive(Debug)]
pub struct MockPwm {
    units: [UnitState; 2],
    calls: Deque<PwmCall, MOCK_CALL_CAPACITY>,
    fail_in: Option<usize>,
    /// Total number of calls made, including dropped and failed ones.
    pub call_count: usize,
}

impl Default for MockPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPwm {
    /// Creates a new mock with both units untouched.
    pub fn new() -> Self {
        Self {
            units: [UnitState::default(); 2],
            calls: Deque::new(),
            fail_in: None,
            call_count: 0,
        }
    }

    /// Makes the next peripheral call fail with [`MockPwmError`].
    pub fn fail_next(&mut self) {
        self.fail_after(0);
    }

    /// Lets `n` calls succeed, then fails the one after with [`MockPwmError`].
    ///
    /// Only one failure is armed at a time; a later call replaces it.
    pub fn fail_after(&mut self, n: usize) {
        self.fail_in = Some(n);
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> impl Iterator<Item = &PwmCall> + '_ {
        self.calls.iter()
    }

    /// The most recent `n` calls, oldest first.
    pub fn last_calls(&self, n: usize) -> impl Iterator<Item = &PwmCall> + '_ {
        let skip = self.calls.len().saturating_sub(n);
        self.calls.iter().skip(skip)
    }

    /// Forgets recorded calls, keeping output state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.call_count = 0;
    }

    /// Output currently produced by `op` on `unit`.
    pub fn output(&self, unit: PwmUnit, op: Operator) -> ChannelOutput {
        let state = &self.units[unit.index()];
        let i = op_index(op);
        if !state.written[i] {
            return ChannelOutput::Idle;
        }
        match state.forced[i] {
            Some(true) => ChannelOutput::High,
            Some(false) => ChannelOutput::Low,
            None if state.modulated[i] => ChannelOutput::Duty(state.duty[i]),
            None => ChannelOutput::Idle,
        }
    }

    /// Pins bound to `unit`, if its channel pair was initialized.
    pub fn pins(&self, unit: PwmUnit) -> Option<(GpioPin, GpioPin)> {
        self.units[unit.index()].pins
    }

    /// Timer configuration applied to `unit`, if any.
    pub fn timer_config(&self, unit: PwmUnit) -> Option<TimerConfig> {
        self.units[unit.index()].timer
    }

    /// Timer tick rate applied to `unit`, if any.
    pub fn timer_frequency_hz(&self, unit: PwmUnit) -> Option<u32> {
        self.units[unit.index()].timer_frequency_hz
    }

    fn record(&mut self, call: PwmCall) -> Result<(), MockPwmError> {
        self.call_count += 1;
        match self.fail_in {
            Some(0) => {
                self.fail_in = None;
                return Err(MockPwmError);
            }
            Some(n) => self.fail_in = Some(n - 1),
            None => {}
        }
        if self.calls.is_full() {
            self.calls.pop_front();
        }
        let _ = self.calls.push_back(call);
        Ok(())
    }
}

fn op_index(op: Operator) -> usize {
    match op {
        Operator::A => 0,
        Operator::B => 1,
    }
}

impl PwmDriver for MockPwm {
    type Error = MockPwmError;

    fn init_channel_pair(
        &mut self,
        unit: PwmUnit,
        pin_a: GpioPin,
        pin_b: GpioPin,
    ) -> Result<(), MockPwmError> {
        self.record(PwmCall::InitChannelPair { unit, pin_a, pin_b })?;
        self.units[unit.index()].pins = Some((pin_a, pin_b));
        Ok(())
    }

    fn configure_timer(
        &mut self,
        unit: PwmUnit,
        config: &TimerConfig,
    ) -> Result<(), MockPwmError> {
        self.record(PwmCall::ConfigureTimer(unit, *config))?;
        let state = &mut self.units[unit.index()];
        state.timer = Some(*config);
        state.duty = [config.duty_a, config.duty_b];
        state.modulated = [true; 2];
        state.forced = [None; 2];
        state.written = [true; 2];
        Ok(())
    }

    fn set_timer_frequency(&mut self, unit: PwmUnit, hz: u32) -> Result<(), MockPwmError> {
        self.record(PwmCall::SetTimerFrequency(unit, hz))?;
        self.units[unit.index()].timer_frequency_hz = Some(hz);
        Ok(())
    }

    fn set_signal_high(&mut self, unit: PwmUnit, op: Operator) -> Result<(), MockPwmError> {
        self.record(PwmCall::SignalHigh(unit, op))?;
        let state = &mut self.units[unit.index()];
        let i = op_index(op);
        state.forced[i] = Some(true);
        state.modulated[i] = false;
        state.written[i] = true;
        Ok(())
    }

    fn set_signal_low(&mut self, unit: PwmUnit, op: Operator) -> Result<(), MockPwmError> {
        self.record(PwmCall::SignalLow(unit, op))?;
        let state = &mut self.units[unit.index()];
        let i = op_index(op);
        state.forced[i] = Some(false);
        state.modulated[i] = false;
        state.written[i] = true;
        Ok(())
    }

    fn set_duty(
        &mut self,
        unit: PwmUnit,
        op: Operator,
        percent: f32,
    ) -> Result<(), MockPwmError> {
        self.record(PwmCall::Duty(unit, op, percent))?;
        let state = &mut self.units[unit.index()];
        state.duty[op_index(op)] = percent;
        Ok(())
    }

    fn set_duty_mode(
        &mut self,
        unit: PwmUnit,
        op: Operator,
        mode: DutyMode,
    ) -> Result<(), MockPwmError> {
        self.record(PwmCall::DutyMode(unit, op, mode))?;
        let state = &mut self.units[unit.index()];
        let i = op_index(op);
        state.forced[i] = None;
        state.modulated[i] = true;
        state.written[i] = true;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mock_is_idle() {
        let pwm = MockPwm::new();
        for unit in PwmUnit::ALL {
            assert_eq!(pwm.output(unit, Operator::A), ChannelOutput::Idle);
            assert_eq!(pwm.output(unit, Operator::B), ChannelOutput::Idle);
            assert_eq!(pwm.pins(unit), None);
            assert_eq!(pwm.timer_config(unit), None);
        }
        assert_eq!(pwm.call_count, 0);
        assert_eq!(pwm.calls().count(), 0);
    }

    #[test]
    fn configure_timer_sets_initial_duty() {
        let mut pwm = MockPwm::new();
        pwm.configure_timer(PwmUnit::Unit0, &TimerConfig::default())
            .unwrap();

        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Duty(0.0));
        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::B), ChannelOutput::Duty(0.0));
        assert_eq!(pwm.output(PwmUnit::Unit1, Operator::A), ChannelOutput::Idle);
    }

    #[test]
    fn forced_level_overrides_duty() {
        let mut pwm = MockPwm::new();
        pwm.set_duty(PwmUnit::Unit0, Operator::A, 50.0).unwrap();
        pwm.set_duty_mode(PwmUnit::Unit0, Operator::A, DutyMode::ActiveHigh)
            .unwrap();
        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Duty(50.0));

        pwm.set_signal_low(PwmUnit::Unit0, Operator::A).unwrap();
        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Low);
    }

    #[test]
    fn fail_next_fails_once() {
        let mut pwm = MockPwm::new();
        pwm.fail_next();

        assert_eq!(
            pwm.set_signal_high(PwmUnit::Unit0, Operator::A),
            Err(MockPwmError)
        );
        // Failed call leaves output untouched
        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Idle);

        assert!(pwm.set_signal_high(PwmUnit::Unit0, Operator::A).is_ok());
        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::High);
        assert_eq!(pwm.call_count, 2);
        assert_eq!(pwm.calls().count(), 1);
    }

    #[test]
    fn fail_after_skips_n_calls() {
        let mut pwm = MockPwm::new();
        pwm.fail_after(2);

        assert!(pwm.set_signal_low(PwmUnit::Unit0, Operator::A).is_ok());
        assert!(pwm.set_signal_low(PwmUnit::Unit0, Operator::B).is_ok());
        assert_eq!(
            pwm.set_signal_high(PwmUnit::Unit0, Operator::A),
            Err(MockPwmError)
        );
        assert_eq!(pwm.output(PwmUnit::Unit0, Operator::A), ChannelOutput::Low);

        // Disarmed after firing
        assert!(pwm.set_signal_high(PwmUnit::Unit0, Operator::A).is_ok());
        assert_eq!(pwm.call_count, 4);
    }

    #[test]
    fn call_log_drops_oldest_when_full() {
        let mut pwm = MockPwm::new();
        for hz in 0..(MOCK_CALL_CAPACITY as u32 + 3) {
            pwm.set_timer_frequency(PwmUnit::Unit0, hz).unwrap();
        }

        assert_eq!(pwm.calls().count(), MOCK_CALL_CAPACITY);
        assert_eq!(
            pwm.calls().next(),
            Some(&PwmCall::SetTimerFrequency(PwmUnit::Unit0, 3))
        );
        assert_eq!(pwm.call_count, MOCK_CALL_CAPACITY + 3);
    }

    #[test]
    fn last_calls_returns_tail() {
        let mut pwm = MockPwm::new();
        pwm.set_signal_low(PwmUnit::Unit0, Operator::A).unwrap();
        pwm.set_signal_low(PwmUnit::Unit0, Operator::B).unwrap();
        pwm.set_signal_high(PwmUnit::Unit1, Operator::A).unwrap();

        let tail: Vec<_> = pwm.last_calls(2).copied().collect();
        assert_eq!(
            tail,
            vec![
                PwmCall::SignalLow(PwmUnit::Unit0, Operator::B),
                PwmCall::SignalHigh(PwmUnit::Unit1, Operator::A),
            ]
        );
    }

    #[test]
    fn clear_calls_keeps_outputs() {
        let mut pwm = MockPwm::new();
        pwm.init_channel_pair(PwmUnit::Unit1, 12, 13).unwrap();
        pwm.set_signal_high(PwmUnit::Unit1, Operator::B).unwrap();
        pwm.clear_calls();

        assert_eq!(pwm.calls().count(), 0);
        assert_eq!(pwm.call_count, 0);
        assert_eq!(pwm.pins(PwmUnit::Unit1), Some((12, 13)));
        assert_eq!(pwm.output(PwmUnit::Unit1, Operator::B), ChannelOutput::High);
    }
}
