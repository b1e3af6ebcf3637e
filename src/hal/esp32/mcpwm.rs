//! Motor-control PWM (MCPWM) implementation on the ESP-IDF legacy driver.
//!
//! Unit 0 runs timer 0 and unit 1 runs timer 1. Each timer's operator A and
//! B outputs go to the IN1/IN2 inputs of one H-bridge channel:
//!
//! - Forward: A = duty% (or high), B = low
//! - Reverse: A = low, B = duty% (or high)
//! - Stopped: A = low, B = low

use crate::traits::{
    CounterMode, DutyMode, GpioPin, Operator, PwmDriver, PwmUnit, TimerConfig,
};
use esp_idf_hal::sys::{
    esp, mcpwm_config_t, mcpwm_counter_type_t, mcpwm_counter_type_t_MCPWM_DOWN_COUNTER,
    mcpwm_counter_type_t_MCPWM_UP_COUNTER, mcpwm_counter_type_t_MCPWM_UP_DOWN_COUNTER,
    mcpwm_duty_type_t, mcpwm_duty_type_t_MCPWM_DUTY_MODE_0,
    mcpwm_duty_type_t_MCPWM_DUTY_MODE_1, mcpwm_generator_t, mcpwm_generator_t_MCPWM_GEN_A,
    mcpwm_generator_t_MCPWM_GEN_B, mcpwm_gpio_init, mcpwm_init, mcpwm_io_signals_t,
    mcpwm_io_signals_t_MCPWM0A, mcpwm_io_signals_t_MCPWM0B, mcpwm_io_signals_t_MCPWM1A,
    mcpwm_io_signals_t_MCPWM1B, mcpwm_set_duty, mcpwm_set_duty_type, mcpwm_set_frequency,
    mcpwm_set_signal_high, mcpwm_set_signal_low, mcpwm_timer_t, mcpwm_timer_t_MCPWM_TIMER_0,
    mcpwm_timer_t_MCPWM_TIMER_1, mcpwm_unit_t, mcpwm_unit_t_MCPWM_UNIT_0,
    mcpwm_unit_t_MCPWM_UNIT_1, EspError,
};

/// Both MCPWM units of the ESP32, driven through the legacy `driver/mcpwm.h` API.
///
/// # Hardware Setup
///
/// Connect each DRV8833/L298 channel:
/// - operator A GPIO → IN1 (forward)
/// - operator B GPIO → IN2 (reverse)
///
/// # Example
///
/// ```ignore
/// use esp32_motor_control::hal::esp32::{pins, Esp32Mcpwm};
/// use esp32_motor_control::MotorController;
///
/// let mut controller = MotorController::new(Esp32Mcpwm::new());
/// controller.attach_pair(pins::MOTOR0_IN1, pins::MOTOR0_IN2, pins::MOTOR1_IN1, pins::MOTOR1_IN2)?;
/// controller.set_speed(0, 50.0)?;
/// ```
///
/// The MCPWM registers are global; create at most one instance.
#[derive(Debug, Default)]
pub struct Esp32Mcpwm {
    _private: (),
}

impl Esp32Mcpwm {
    /// Creates the driver. No hardware is touched until a unit is initialized.
    pub fn new() -> Self {
        Self::default()
    }
}

fn unit_id(unit: PwmUnit) -> mcpwm_unit_t {
    match unit {
        PwmUnit::Unit0 => mcpwm_unit_t_MCPWM_UNIT_0,
        PwmUnit::Unit1 => mcpwm_unit_t_MCPWM_UNIT_1,
    }
}

fn timer_id(unit: PwmUnit) -> mcpwm_timer_t {
    match unit {
        PwmUnit::Unit0 => mcpwm_timer_t_MCPWM_TIMER_0,
        PwmUnit::Unit1 => mcpwm_timer_t_MCPWM_TIMER_1,
    }
}

fn io_signals(unit: PwmUnit) -> (mcpwm_io_signals_t, mcpwm_io_signals_t) {
    match unit {
        PwmUnit::Unit0 => (mcpwm_io_signals_t_MCPWM0A, mcpwm_io_signals_t_MCPWM0B),
        PwmUnit::Unit1 => (mcpwm_io_signals_t_MCPWM1A, mcpwm_io_signals_t_MCPWM1B),
    }
}

fn generator(op: Operator) -> mcpwm_generator_t {
    match op {
        Operator::A => mcpwm_generator_t_MCPWM_GEN_A,
        Operator::B => mcpwm_generator_t_MCPWM_GEN_B,
    }
}

fn counter_type(mode: CounterMode) -> mcpwm_counter_type_t {
    match mode {
        CounterMode::Up => mcpwm_counter_type_t_MCPWM_UP_COUNTER,
        CounterMode::Down => mcpwm_counter_type_t_MCPWM_DOWN_COUNTER,
        CounterMode::UpDown => mcpwm_counter_type_t_MCPWM_UP_DOWN_COUNTER,
    }
}

fn duty_type(mode: DutyMode) -> mcpwm_duty_type_t {
    match mode {
        DutyMode::ActiveHigh => mcpwm_duty_type_t_MCPWM_DUTY_MODE_0,
        DutyMode::ActiveLow => mcpwm_duty_type_t_MCPWM_DUTY_MODE_1,
    }
}

impl PwmDriver for Esp32Mcpwm {
    type Error = EspError;

    fn init_channel_pair(
        &mut self,
        unit: PwmUnit,
        pin_a: GpioPin,
        pin_b: GpioPin,
    ) -> Result<(), EspError> {
        let (signal_a, signal_b) = io_signals(unit);
        // SAFETY: unit and signal ids come from the closed PwmUnit/Operator
        // mappings, so the driver receives only valid enum values.
        unsafe {
            esp!(mcpwm_gpio_init(unit_id(unit), signal_a, pin_a as i32))?;
            esp!(mcpwm_gpio_init(unit_id(unit), signal_b, pin_b as i32))?;
        }
        Ok(())
    }

    fn configure_timer(&mut self, unit: PwmUnit, config: &TimerConfig) -> Result<(), EspError> {
        let cfg = mcpwm_config_t {
            frequency: config.frequency_hz,
            cmpr_a: config.duty_a,
            cmpr_b: config.duty_b,
            duty_mode: duty_type(config.duty_mode),
            counter_mode: counter_type(config.counter_mode),
        };
        // SAFETY: `cfg` lives across the call and the driver copies it.
        unsafe { esp!(mcpwm_init(unit_id(unit), timer_id(unit), &cfg)) }
    }

    fn set_timer_frequency(&mut self, unit: PwmUnit, hz: u32) -> Result<(), EspError> {
        // SAFETY: ids map to a unit/timer pair this driver owns.
        unsafe { esp!(mcpwm_set_frequency(unit_id(unit), timer_id(unit), hz)) }
    }

    fn set_signal_high(&mut self, unit: PwmUnit, op: Operator) -> Result<(), EspError> {
        // SAFETY: ids map to a unit/timer/generator this driver owns; no
        // pointers cross the boundary.
        unsafe {
            esp!(mcpwm_set_signal_high(
                unit_id(unit),
                timer_id(unit),
                generator(op)
            ))
        }
    }

    fn set_signal_low(&mut self, unit: PwmUnit, op: Operator) -> Result<(), EspError> {
        // SAFETY: ids map to a unit/timer/generator this driver owns; no
        // pointers cross the boundary.
        unsafe {
            esp!(mcpwm_set_signal_low(
                unit_id(unit),
                timer_id(unit),
                generator(op)
            ))
        }
    }

    fn set_duty(&mut self, unit: PwmUnit, op: Operator, percent: f32) -> Result<(), EspError> {
        // SAFETY: ids map to a unit/timer/generator this driver owns; no
        // pointers cross the boundary.
        unsafe {
            esp!(mcpwm_set_duty(
                unit_id(unit),
                timer_id(unit),
                generator(op),
                percent
            ))
        }
    }

    fn set_duty_mode(
        &mut self,
        unit: PwmUnit,
        op: Operator,
        mode: DutyMode,
    ) -> Result<(), EspError> {
        // SAFETY: ids map to a unit/timer/generator this driver owns; no
        // pointers cross the boundary.
        unsafe {
            esp!(mcpwm_set_duty_type(
                unit_id(unit),
                timer_id(unit),
                generator(op),
                duty_type(mode)
            ))
        }
    }
}
