// libs/appointment-cell/src/validate.rs
//
// The single parse-and-validate adapter shared by the REST handlers and
// the voice tool-call surface, so the two entry paths cannot drift apart
// in validation or conflict semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::models::{Appointment, SchedulingError, VisitType};

/// Fully-resolved input for creating an appointment, whichever surface it
/// arrived through.
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub facility_id: Option<Uuid>,
    pub availability_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visit_type: VisitType,
    pub location: Option<String>,
    pub reason: Option<String>,
}

impl BookingInput {
    pub fn validate(&self) -> Result<(), SchedulingError> {
        check_ordering(self.start_at, self.end_at)?;
        check_visit_pairing(self.visit_type, self.facility_id)
    }
}

/// Partial reschedule/edit. Only fields present in the payload are
/// applied; `facility_id` distinguishes "absent" from an explicit null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReschedulePatch {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub visit_type: Option<VisitType>,
    #[serde(default, deserialize_with = "double_option")]
    pub facility_id: Option<Option<Uuid>>,
    pub location: Option<String>,
    pub reason: Option<String>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// The merged picture of an appointment after a patch is applied.
#[derive(Debug, Clone)]
pub struct MergedAppointment {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visit_type: VisitType,
    pub facility_id: Option<Uuid>,
    pub location: Option<String>,
    pub reason: Option<String>,
    pub times_changed: bool,
}

impl ReschedulePatch {
    pub fn is_empty(&self) -> bool {
        self.start_at.is_none()
            && self.end_at.is_none()
            && self.visit_type.is_none()
            && self.facility_id.is_none()
            && self.location.is_none()
            && self.reason.is_none()
    }

    /// Merge the patch over the current row and re-validate the result.
    /// Returns an error before anything is written, so a conflicting or
    /// malformed patch never applies partially.
    pub fn merge(&self, current: &Appointment) -> Result<MergedAppointment, SchedulingError> {
        let start_at = self.start_at.unwrap_or(current.start_at);
        let end_at = self.end_at.unwrap_or(current.end_at);
        let visit_type = self.visit_type.unwrap_or(current.visit_type);
        let facility_id = match self.facility_id {
            Some(explicit) => explicit,
            None => current.facility_id,
        };

        check_ordering(start_at, end_at)?;
        check_visit_pairing(visit_type, facility_id)?;

        Ok(MergedAppointment {
            start_at,
            end_at,
            visit_type,
            facility_id,
            location: self.location.clone().or_else(|| current.location.clone()),
            reason: self.reason.clone().or_else(|| current.reason.clone()),
            times_changed: start_at != current.start_at || end_at != current.end_at,
        })
    }
}

fn check_ordering(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<(), SchedulingError> {
    if end_at <= start_at {
        return Err(SchedulingError::InvalidTime(
            "end_at must be after start_at".to_string(),
        ));
    }
    Ok(())
}

/// In-person requires a facility; telehealth forbids one.
fn check_visit_pairing(
    visit_type: VisitType,
    facility_id: Option<Uuid>,
) -> Result<(), SchedulingError> {
    if visit_type == VisitType::InPerson && facility_id.is_none() {
        return Err(SchedulingError::Validation(
            "in_person requires facility_id".to_string(),
        ));
    }
    if visit_type == VisitType::Telehealth && facility_id.is_some() {
        return Err(SchedulingError::Validation(
            "telehealth must not include facility_id".to_string(),
        ));
    }
    Ok(())
}
