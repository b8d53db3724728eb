// libs/appointment-cell/src/services/state_machine.rs
use tracing::{debug, warn};

use crate::models::{ApptStatus, SchedulingError};

/// All statuses an appointment may move to from its current one.
///
/// `reschedule_requested` is representable (requested may move there) but
/// no operation currently drives that edge; it is reserved for a future
/// renegotiation flow. Once there, only cancellation applies.
pub fn valid_transitions(current: ApptStatus) -> Vec<ApptStatus> {
    match current {
        ApptStatus::Requested => vec![
            ApptStatus::Confirmed,
            ApptStatus::Denied,
            ApptStatus::RescheduleRequested,
            ApptStatus::Cancelled,
        ],
        ApptStatus::Confirmed => vec![ApptStatus::Cancelled],
        ApptStatus::RescheduleRequested => vec![ApptStatus::Cancelled],
        // Terminal states - no transitions allowed
        ApptStatus::Denied => vec![],
        ApptStatus::Cancelled => vec![],
    }
}

/// Validate that a status transition is allowed. The error names the
/// current status so callers can report why the transition was refused.
pub fn validate_transition(
    current: ApptStatus,
    next: ApptStatus,
) -> Result<(), SchedulingError> {
    debug!("Validating status transition {} -> {}", current, next);

    if !valid_transitions(current).contains(&next) {
        warn!("Invalid status transition attempted: {} -> {}", current, next);
        return Err(SchedulingError::InvalidTransition(current));
    }

    Ok(())
}
