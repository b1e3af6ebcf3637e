//! Integration tests for the motor controller

use esp32_motor_control::{
    hal::{ChannelOutput, MockPwm},
    CommandOutcome, MotorController, Operator, PwmUnit, RejectReason, NO_PIN,
};

fn controller_with_motor0() -> MotorController<MockPwm> {
    let mut controller = MotorController::new(MockPwm::new());
    controller.attach(0, 25, 26).unwrap();
    controller
}

fn controller_with_both() -> MotorController<MockPwm> {
    let mut controller = MotorController::new(MockPwm::new());
    controller.attach_pair(25, 26, 27, 14).unwrap();
    controller
}

// ============================================================================
// Attachment
// ============================================================================

#[test]
fn attach_makes_motor_valid_and_stopped() {
    let controller = controller_with_motor0();

    assert!(controller.is_valid(0));
    assert_eq!(controller.speed(0), 0.0);
    assert!(controller.is_stopped(0));
    assert!(!controller.is_forward(0));
}

#[test]
fn attach_configures_timer_with_zero_duty() {
    let controller = controller_with_motor0();
    let pwm = controller.pwm();

    assert_eq!(pwm.pins(PwmUnit::Unit0), Some((25, 26)));
    let timer = pwm.timer_config(PwmUnit::Unit0).unwrap();
    assert_eq!(timer.frequency_hz, 5_000);
    assert_eq!(timer.duty_a, 0.0);
    assert_eq!(timer.duty_b, 0.0);
    assert_eq!(pwm.timer_frequency_hz(PwmUnit::Unit0), Some(160_000_000));

    // Unit 1 untouched
    assert_eq!(pwm.pins(PwmUnit::Unit1), None);
    assert_eq!(pwm.timer_config(PwmUnit::Unit1), None);
}

#[test]
fn attach_pair_attaches_both() {
    let mut controller = MotorController::new(MockPwm::new());
    let (first, second) = controller.attach_pair(25, 26, 27, 14).unwrap();

    assert_eq!(first, CommandOutcome::Applied);
    assert_eq!(second, Some(CommandOutcome::Applied));
    assert!(controller.is_valid(0));
    assert!(controller.is_valid(1));
    assert_eq!(controller.pwm().pins(PwmUnit::Unit1), Some((27, 14)));
    assert_eq!(
        controller.pwm().timer_config(PwmUnit::Unit0),
        controller.pwm().timer_config(PwmUnit::Unit1)
    );
}

#[test]
fn attach_pair_skips_second_with_sentinel_pins() {
    let mut controller = MotorController::new(MockPwm::new());
    let (_, second) = controller.attach_pair(25, 26, NO_PIN, NO_PIN).unwrap();

    assert_eq!(second, None);
    assert!(controller.is_valid(0));
    assert!(!controller.is_valid(1));
    assert_eq!(controller.pwm().pins(PwmUnit::Unit1), None);
}

#[test]
fn attach_pair_with_one_zero_pin_still_attaches() {
    // Only both pins at zero mean "absent"
    let mut controller = MotorController::new(MockPwm::new());
    let (_, second) = controller.attach_pair(25, 26, 0, 14).unwrap();

    assert_eq!(second, Some(CommandOutcome::Applied));
    assert!(controller.is_valid(1));
}

#[test]
fn reattach_is_rejected_without_writes() {
    let mut controller = controller_with_motor0();
    controller.set_speed(0, 50.0).unwrap();
    let calls_before = controller.pwm().call_count;

    let outcome = controller.attach(0, 32, 33).unwrap();

    assert_eq!(
        outcome,
        CommandOutcome::Rejected(RejectReason::AlreadyAttached)
    );
    assert_eq!(controller.pwm().call_count, calls_before);
    assert_eq!(controller.pwm().pins(PwmUnit::Unit0), Some((25, 26)));
    assert_eq!(controller.speed(0), 50.0);
}

// ============================================================================
// Signed Speed
// ============================================================================

#[test]
fn positive_speed_drives_forward() {
    let mut controller = controller_with_motor0();
    let outcome = controller.set_speed(0, 60.0).unwrap();

    assert!(outcome.is_applied());
    assert_eq!(controller.speed(0), 60.0);
    assert!(controller.is_forward(0));
    assert!(!controller.is_stopped(0));
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::Duty(60.0)
    );
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::B),
        ChannelOutput::Low
    );
}

#[test]
fn negative_speed_drives_reverse() {
    let mut controller = controller_with_motor0();
    controller.set_speed(0, -60.0).unwrap();

    assert_eq!(controller.speed(0), 60.0);
    assert!(!controller.is_forward(0));
    assert!(!controller.is_stopped(0));
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::Low
    );
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::B),
        ChannelOutput::Duty(60.0)
    );
}

#[test]
fn full_forward_forces_levels() {
    let mut controller = controller_with_motor0();
    controller.drive_full_forward(0).unwrap();

    assert_eq!(controller.speed(0), 100.0);
    assert!(controller.is_forward(0));
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::High
    );
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::B),
        ChannelOutput::Low
    );
}

#[test]
fn speed_100_takes_full_speed_path() {
    let mut controller = controller_with_motor0();
    controller.set_speed(0, 100.0).unwrap();
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::High
    );

    controller.set_speed(0, -100.0).unwrap();
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::Low
    );
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::B),
        ChannelOutput::High
    );
    assert_eq!(controller.speed(0), 100.0);
}

#[test]
fn duty_restored_after_full_speed() {
    let mut controller = controller_with_motor0();
    controller.drive_full_forward(0).unwrap();
    controller.drive_forward(0, 25.0).unwrap();

    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::Duty(25.0)
    );
}

#[test]
fn direction_change_releases_other_channel() {
    let mut controller = controller_with_motor0();
    controller.drive_forward(0, 80.0).unwrap();
    controller.drive_reverse(0, 30.0).unwrap();

    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::Low
    );
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::B),
        ChannelOutput::Duty(30.0)
    );
}

// ============================================================================
// Stopping
// ============================================================================

#[test]
fn stop_after_any_command() {
    let mut controller = controller_with_motor0();
    for speed in [60.0, -60.0, 100.0, -100.0, 0.5] {
        controller.set_speed(0, speed).unwrap();
        controller.stop(0).unwrap();

        assert_eq!(controller.speed(0), 0.0);
        assert!(controller.is_stopped(0));
        assert!(!controller.is_forward(0));
    }
}

#[test]
fn stop_is_idempotent() {
    let mut controller = controller_with_motor0();
    controller.set_speed(0, -45.0).unwrap();

    controller.stop(0).unwrap();
    let first = controller.state(0);
    controller.stop(0).unwrap();
    let second = controller.state(0);

    assert_eq!(first, second);
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::A),
        ChannelOutput::Low
    );
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit0, Operator::B),
        ChannelOutput::Low
    );
}

#[test]
fn stop_all_with_only_motor0_attached() {
    let mut controller = controller_with_motor0();
    controller.set_speed(0, 70.0).unwrap();

    controller.stop_all().unwrap();

    assert!(controller.is_stopped(0));
    assert!(!controller.is_valid(1));
    assert_eq!(controller.pwm().output(PwmUnit::Unit1, Operator::A), ChannelOutput::Idle);
}

#[test]
fn stop_all_stops_both() {
    let mut controller = controller_with_both();
    controller.set_speed(0, 70.0).unwrap();
    controller.set_speed(1, -20.0).unwrap();

    controller.stop_all().unwrap();

    assert!(controller.is_stopped(0));
    assert!(controller.is_stopped(1));
}

// ============================================================================
// Independence
// ============================================================================

#[test]
fn commanding_motor0_leaves_motor1_alone() {
    let mut controller = controller_with_both();
    controller.set_speed(1, -35.0).unwrap();
    let before = controller.state(1);

    controller.set_speed(0, 90.0).unwrap();
    controller.drive_full_reverse(0).unwrap();
    controller.stop(0).unwrap();

    assert_eq!(controller.state(1), before);
    assert_eq!(controller.speed(1), 35.0);
    assert!(!controller.is_forward(1));
    assert!(!controller.is_stopped(1));
    assert_eq!(
        controller.pwm().output(PwmUnit::Unit1, Operator::B),
        ChannelOutput::Duty(35.0)
    );
}

#[test]
fn states_snapshot() {
    let mut controller = controller_with_motor0();
    controller.set_speed(0, -10.0).unwrap();

    let [m0, m1] = controller.states();
    assert!(m0.attached);
    assert!(m0.is_reverse());
    assert_eq!(m0.speed, 10.0);
    assert!(!m1.attached);
    assert!(m1.is_stopped());
}
