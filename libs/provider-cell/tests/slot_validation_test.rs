use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use provider_cell::models::{AvailabilityError, VisitType};
use provider_cell::services::availability::validate_slot;

fn at(hour: u32, min: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
}

#[test]
fn accepts_well_formed_telehealth_slot() {
    assert!(validate_slot(at(9, 0), at(9, 30), VisitType::Telehealth, None, 1).is_ok());
}

#[test]
fn accepts_in_person_slot_with_facility() {
    let facility = Some(Uuid::new_v4());
    assert!(validate_slot(at(9, 0), at(10, 0), VisitType::InPerson, facility, 3).is_ok());
}

#[test]
fn rejects_inverted_or_empty_window() {
    assert_matches!(
        validate_slot(at(10, 0), at(9, 0), VisitType::Telehealth, None, 1),
        Err(AvailabilityError::InvalidTime(_))
    );
    // Zero-length windows are empty intervals and never bookable.
    assert_matches!(
        validate_slot(at(9, 0), at(9, 0), VisitType::Telehealth, None, 1),
        Err(AvailabilityError::InvalidTime(_))
    );
}

#[test]
fn rejects_in_person_without_facility() {
    assert_matches!(
        validate_slot(at(9, 0), at(9, 30), VisitType::InPerson, None, 1),
        Err(AvailabilityError::Validation(msg)) if msg.contains("facility_id")
    );
}

#[test]
fn rejects_telehealth_with_facility() {
    assert_matches!(
        validate_slot(at(9, 0), at(9, 30), VisitType::Telehealth, Some(Uuid::new_v4()), 1),
        Err(AvailabilityError::Validation(msg)) if msg.contains("telehealth")
    );
}

#[test]
fn rejects_non_positive_capacity() {
    assert_matches!(
        validate_slot(at(9, 0), at(9, 30), VisitType::Telehealth, None, 0),
        Err(AvailabilityError::Validation(msg)) if msg.contains("capacity")
    );
}

#[test]
fn visit_type_parses_loose_input() {
    assert_eq!(VisitType::parse(" Telehealth "), Some(VisitType::Telehealth));
    assert_eq!(VisitType::parse("IN_PERSON"), Some(VisitType::InPerson));
    assert_eq!(VisitType::parse("house_call"), None);
}
