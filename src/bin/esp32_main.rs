//! ESP32 dual motor demo firmware.
//!
//! Attaches two motors on a DRV8833 and runs a repeating drive pattern:
//! ramp motor 0 forward while motor 1 ramps in reverse, full speed,
//! stop, then the mirror image.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/xtensa-esp32-espidf/release/esp32_main
//! ```

use esp32_motor_control::hal::esp32::{pins, Esp32Mcpwm};
use esp32_motor_control::{ControllerConfig, MotorController, PwmConfig};
use std::thread;
use std::time::Duration;

/// Delay between ramp steps
const STEP_INTERVAL_MS: u64 = 50;

/// Speed change per ramp step (percent)
const SPEED_STEP: f32 = 5.0;

/// Pause between pattern phases
const PHASE_PAUSE_MS: u64 = 1000;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("esp32-motor-control demo starting");

    let config = ControllerConfig::default()
        .with_name("demo")
        .with_pwm(PwmConfig::default().with_frequency_hz(5_000));
    let mut controller = MotorController::with_config(Esp32Mcpwm::new(), config);

    let (first, second) = controller.attach_pair(
        pins::MOTOR0_IN1,
        pins::MOTOR0_IN2,
        pins::MOTOR1_IN1,
        pins::MOTOR1_IN2,
    )?;
    log::info!("motor 0: {:?}, motor 1: {:?}", first, second);

    loop {
        for sign in [1.0_f32, -1.0] {
            // Ramp up; motor 1 runs opposite to motor 0
            let mut speed = 0.0;
            while speed < 100.0 {
                controller.set_speed(0, sign * speed)?;
                controller.set_speed(1, -sign * speed)?;
                speed += SPEED_STEP;
                thread::sleep(Duration::from_millis(STEP_INTERVAL_MS));
            }

            if sign > 0.0 {
                controller.drive_full_forward(0)?;
                controller.drive_full_reverse(1)?;
            } else {
                controller.drive_full_reverse(0)?;
                controller.drive_full_forward(1)?;
            }
            log::info!(
                "full speed: motor 0 forward={}, motor 1 forward={}",
                controller.is_forward(0),
                controller.is_forward(1)
            );
            thread::sleep(Duration::from_millis(PHASE_PAUSE_MS));

            controller.stop_all()?;
            log::info!("stopped");
            thread::sleep(Duration::from_millis(PHASE_PAUSE_MS));
        }
    }
}
