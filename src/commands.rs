//! Outcomes of motor commands.
//!
//! Addressing a motor that does not exist, or one that has not been
//! attached yet, is not an error: the command is skipped and the outcome
//! says why. `Err` from the controller is reserved for failures reported
//! by the PWM peripheral itself.
//!
//! # Example
//!
//! ```rust
//! use esp32_motor_control::{CommandOutcome, MotorController, RejectReason, hal::MockPwm};
//!
//! let mut controller = MotorController::new(MockPwm::new());
//!
//! // Nothing attached yet
//! let outcome = controller.set_speed(0, 50.0).unwrap();
//! assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::NotAttached));
//!
//! // There is no motor 5
//! let outcome = controller.stop(5).unwrap();
//! assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::InvalidIndex));
//! ```

use core::fmt;

/// Result of a mutating controller command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandOutcome {
    /// The command was written to the peripheral and the slot state updated.
    Applied,

    /// The command was skipped; nothing was written.
    Rejected(RejectReason),
}

impl CommandOutcome {
    /// Returns true if the command took effect.
    #[inline]
    pub const fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }

    /// Returns the rejection reason, if any.
    #[inline]
    pub const fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            CommandOutcome::Applied => None,
            CommandOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

impl From<RejectReason> for CommandOutcome {
    fn from(reason: RejectReason) -> Self {
        CommandOutcome::Rejected(reason)
    }
}

/// Reason a command was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectReason {
    /// Motor index is not 0 or 1.
    InvalidIndex,

    /// Motor index is in range but the slot has no channel pair yet.
    NotAttached,

    /// Attach was requested for a slot that is already attached.
    ///
    /// Attachment happens once per slot; later attach calls are ignored.
    AlreadyAttached,
}

impl RejectReason {
    /// Returns the reason as a snake_case string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InvalidIndex => "invalid_index",
            RejectReason::NotAttached => "not_attached",
            RejectReason::AlreadyAttached => "already_attached",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
