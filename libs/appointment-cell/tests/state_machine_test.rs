use assert_matches::assert_matches;

use appointment_cell::models::{ApptStatus, SchedulingError};
use appointment_cell::services::state_machine::{valid_transitions, validate_transition};

#[test]
fn requested_can_be_confirmed_denied_or_cancelled() {
    assert!(validate_transition(ApptStatus::Requested, ApptStatus::Confirmed).is_ok());
    assert!(validate_transition(ApptStatus::Requested, ApptStatus::Denied).is_ok());
    assert!(validate_transition(ApptStatus::Requested, ApptStatus::Cancelled).is_ok());
}

#[test]
fn requested_may_enter_reserved_reschedule_state() {
    assert!(validate_transition(ApptStatus::Requested, ApptStatus::RescheduleRequested).is_ok());
}

#[test]
fn confirmed_can_only_be_cancelled() {
    assert!(validate_transition(ApptStatus::Confirmed, ApptStatus::Cancelled).is_ok());
    assert_matches!(
        validate_transition(ApptStatus::Confirmed, ApptStatus::Denied),
        Err(SchedulingError::InvalidTransition(ApptStatus::Confirmed))
    );
    assert_matches!(
        validate_transition(ApptStatus::Confirmed, ApptStatus::Requested),
        Err(SchedulingError::InvalidTransition(ApptStatus::Confirmed))
    );
}

#[test]
fn terminal_states_admit_no_transitions() {
    for terminal in [ApptStatus::Denied, ApptStatus::Cancelled] {
        assert!(valid_transitions(terminal).is_empty());
        for next in [
            ApptStatus::Requested,
            ApptStatus::Confirmed,
            ApptStatus::Denied,
            ApptStatus::Cancelled,
            ApptStatus::RescheduleRequested,
        ] {
            assert_matches!(
                validate_transition(terminal, next),
                Err(SchedulingError::InvalidTransition(current)) if current == terminal
            );
        }
    }
}

#[test]
fn confirming_an_already_confirmed_appointment_is_invalid() {
    // The approve guard relies on this: a second approval of the same
    // appointment reports the current status instead of double-confirming.
    let err = validate_transition(ApptStatus::Confirmed, ApptStatus::Confirmed).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot change appointment from status=confirmed"
    );
}

#[test]
fn terminality_matches_the_transition_table() {
    for status in [
        ApptStatus::Requested,
        ApptStatus::Confirmed,
        ApptStatus::Denied,
        ApptStatus::Cancelled,
        ApptStatus::RescheduleRequested,
    ] {
        assert_eq!(status.is_terminal(), valid_transitions(status).is_empty());
    }
}
