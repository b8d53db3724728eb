use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use appointment_cell::models::{Appointment, ApptStatus, SchedulingError, VisitType};
use appointment_cell::validate::{BookingInput, ReschedulePatch};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
}

fn telehealth_input() -> BookingInput {
    BookingInput {
        patient_id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        facility_id: None,
        availability_id: None,
        start_at: at(9, 0),
        end_at: at(9, 30),
        visit_type: VisitType::Telehealth,
        location: None,
        reason: Some("checkup".to_string()),
    }
}

fn requested_appointment() -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
        facility_id: None,
        availability_id: None,
        start_at: at(9, 0),
        end_at: at(9, 30),
        visit_type: VisitType::Telehealth,
        location: None,
        reason: None,
        status: ApptStatus::Requested,
        video_url: None,
        created_at: at(8, 0),
        updated_at: at(8, 0),
    }
}

#[test]
fn booking_input_accepts_valid_telehealth() {
    assert!(telehealth_input().validate().is_ok());
}

#[test]
fn booking_input_rejects_inverted_times() {
    let mut input = telehealth_input();
    input.end_at = at(8, 0);
    assert_matches!(
        input.validate(),
        Err(SchedulingError::InvalidTime(msg)) if msg == "end_at must be after start_at"
    );
}

#[test]
fn booking_input_rejects_in_person_without_facility() {
    let mut input = telehealth_input();
    input.visit_type = VisitType::InPerson;
    assert_matches!(
        input.validate(),
        Err(SchedulingError::Validation(msg)) if msg == "in_person requires facility_id"
    );
}

#[test]
fn booking_input_rejects_telehealth_with_facility() {
    let mut input = telehealth_input();
    input.facility_id = Some(Uuid::new_v4());
    assert_matches!(
        input.validate(),
        Err(SchedulingError::Validation(msg)) if msg == "telehealth must not include facility_id"
    );
}

#[test]
fn patch_merge_keeps_unset_fields() {
    let appt = requested_appointment();
    let patch = ReschedulePatch {
        reason: Some("follow-up".to_string()),
        ..Default::default()
    };

    let merged = patch.merge(&appt).unwrap();
    assert_eq!(merged.start_at, appt.start_at);
    assert_eq!(merged.end_at, appt.end_at);
    assert_eq!(merged.visit_type, appt.visit_type);
    assert_eq!(merged.reason.as_deref(), Some("follow-up"));
    assert!(!merged.times_changed);
}

#[test]
fn patch_merge_flags_time_changes() {
    let appt = requested_appointment();
    let patch = ReschedulePatch {
        start_at: Some(at(10, 0)),
        end_at: Some(at(10, 30)),
        ..Default::default()
    };

    let merged = patch.merge(&appt).unwrap();
    assert!(merged.times_changed);
    assert_eq!(merged.start_at, at(10, 0));
}

#[test]
fn patch_merge_rejects_inverted_result() {
    let appt = requested_appointment();
    // Moving only the start past the existing end must fail as a whole.
    let patch = ReschedulePatch {
        start_at: Some(at(11, 0)),
        ..Default::default()
    };
    assert_matches!(patch.merge(&appt), Err(SchedulingError::InvalidTime(_)));
}

#[test]
fn patch_merge_revalidates_visit_pairing() {
    let appt = requested_appointment();
    let patch = ReschedulePatch {
        visit_type: Some(VisitType::InPerson),
        ..Default::default()
    };
    // Switching to in_person without supplying a facility is refused.
    assert_matches!(patch.merge(&appt), Err(SchedulingError::Validation(_)));

    let patch = ReschedulePatch {
        visit_type: Some(VisitType::InPerson),
        facility_id: Some(Some(Uuid::new_v4())),
        ..Default::default()
    };
    let merged = patch.merge(&appt).unwrap();
    assert_eq!(merged.visit_type, VisitType::InPerson);
    assert!(merged.facility_id.is_some());
}

#[test]
fn patch_distinguishes_absent_from_explicit_null_facility() {
    let absent: ReschedulePatch = serde_json::from_str(r#"{}"#).unwrap();
    assert_eq!(absent.facility_id, None);

    let nulled: ReschedulePatch = serde_json::from_str(r#"{"facility_id": null}"#).unwrap();
    assert_eq!(nulled.facility_id, Some(None));

    let set: ReschedulePatch = serde_json::from_str(
        r#"{"facility_id": "4be07603-7c03-4e0e-b137-7d72ae96f9b8"}"#,
    )
    .unwrap();
    assert_matches!(set.facility_id, Some(Some(_)));
}

#[test]
fn empty_patch_is_detected() {
    let patch: ReschedulePatch = serde_json::from_str("{}").unwrap();
    assert!(patch.is_empty());

    let patch: ReschedulePatch = serde_json::from_str(r#"{"reason":"x"}"#).unwrap();
    assert!(!patch.is_empty());
}
