// libs/voice-cell/src/services/tools.rs
//
// Dispatch for the voice-agent tools. Each tool coerces its loosely-typed
// arguments and then drives the exact same services and validation
// adapter as the REST surface; booking semantics cannot fork between the
// two entry paths.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use appointment_cell::services::booking::BookingService;
use appointment_cell::validate::{BookingInput, ReschedulePatch};
use provider_cell::models::{AvailabilityQuery, VisitType};
use provider_cell::services::availability::AvailabilityService;
use shared_database::AppState;

use crate::models::ToolError;
use crate::services::coerce;

const SLOT_LIST_LIMIT: i64 = 200;
const APPOINTMENT_LIST_LIMIT: i64 = 100;

fn iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Run one named tool invocation against the shared services.
pub async fn dispatch(state: &AppState, name: &str, raw_args: &Value) -> Result<Value, ToolError> {
    let args = coerce::as_arguments(raw_args);
    debug!("Dispatching tool call: {}", name);

    match name {
        "list_availability" => {
            let provider_id = coerce::req_uuid(&args, "provider_id")?;
            let start_from = coerce::opt_datetime(&args, "start_from")?;

            let service = AvailabilityService::new(state.db.clone());
            let query = AvailabilityQuery {
                provider_id: Some(provider_id),
                visit_type: None,
                start_from,
            };
            let slots = service.list(&query, SLOT_LIST_LIMIT).await?;

            let slots: Vec<Value> = slots
                .iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "provider_id": s.provider_id,
                        "start_at": iso(s.start_at),
                        "end_at": iso(s.end_at),
                        "visit_type": s.visit_type,
                        "facility_id": s.facility_id,
                        "location": s.location,
                    })
                })
                .collect();

            Ok(json!({ "slots": slots }))
        }

        "create_appointment" => {
            let patient_id = coerce::req_uuid(&args, "patient_id")?;
            let provider_id = coerce::req_uuid(&args, "provider_id")?;
            let start_at = coerce::req_datetime(&args, "start_at")?;
            let end_at = coerce::req_datetime(&args, "end_at")?;

            let visit_type_raw = coerce::opt_str(&args, "visit_type")
                .ok_or_else(|| ToolError::bad_request("visit_type is required"))?;
            let visit_type = VisitType::parse(&visit_type_raw).ok_or_else(|| {
                ToolError::bad_request("visit_type must be 'telehealth' or 'in_person'")
            })?;

            let input = BookingInput {
                patient_id,
                provider_id,
                facility_id: coerce::opt_uuid(&args, "facility_id")?,
                availability_id: coerce::opt_uuid(&args, "availability_id")?,
                start_at,
                end_at,
                visit_type,
                location: coerce::opt_str(&args, "location"),
                reason: coerce::opt_str(&args, "reason"),
            };

            let service = BookingService::new(state.db.clone());
            let appt = service.create(input).await?;

            Ok(json!({
                "appointment_id": appt.id,
                "status": appt.status,
                "start_at": iso(appt.start_at),
                "end_at": iso(appt.end_at),
                "provider_id": appt.provider_id,
            }))
        }

        "update_appointment" => {
            let appointment_id = coerce::req_uuid(&args, "appointment_id")?;
            let caller_id = caller_identity(&args)?;

            let visit_type = match coerce::opt_str(&args, "visit_type") {
                Some(raw) => Some(VisitType::parse(&raw).ok_or_else(|| {
                    ToolError::bad_request("visit_type must be 'telehealth' or 'in_person'")
                })?),
                None => None,
            };

            // A present-but-null facility_id clears the reference, which
            // matters when a visit moves back to telehealth.
            let facility_id = if args.contains_key("facility_id") {
                Some(coerce::opt_uuid(&args, "facility_id")?)
            } else {
                None
            };

            let patch = ReschedulePatch {
                start_at: coerce::opt_datetime(&args, "start_at")?,
                end_at: coerce::opt_datetime(&args, "end_at")?,
                visit_type,
                facility_id,
                location: coerce::opt_str(&args, "location"),
                reason: coerce::opt_str(&args, "reason"),
            };

            let service = BookingService::new(state.db.clone());
            let appt = service.reschedule(caller_id, appointment_id, patch).await?;

            Ok(json!({
                "id": appt.id,
                "start_at": iso(appt.start_at),
                "end_at": iso(appt.end_at),
                "visit_type": appt.visit_type,
                "status": appt.status,
                "provider_id": appt.provider_id,
                "facility_id": appt.facility_id,
            }))
        }

        "cancel_appointment" => {
            let appointment_id = coerce::req_uuid(&args, "appointment_id")?;
            let caller_id = caller_identity(&args)?;

            let service = BookingService::new(state.db.clone());
            let appt = service.cancel(caller_id, appointment_id).await?;

            Ok(json!({ "ok": true, "status": appt.status }))
        }

        "list_my_appointments" => {
            let patient_id = coerce::req_uuid(&args, "patient_id")?;
            let active_only = coerce::opt_bool(&args, "active_only", true);

            let service = BookingService::new(state.db.clone());
            let rows = service
                .list_for_patient(patient_id, active_only, Some(APPOINTMENT_LIST_LIMIT))
                .await?;

            let data: Vec<Value> = rows
                .iter()
                .map(|a| {
                    json!({
                        "id": a.id,
                        "start_at": iso(a.start_at),
                        "end_at": iso(a.end_at),
                        "visit_type": a.visit_type,
                        "status": a.status,
                        "provider_id": a.provider_id,
                        "facility_id": a.facility_id,
                    })
                })
                .collect();

            Ok(json!({ "appointments": data }))
        }

        _ => Err(ToolError::new(format!("Unknown tool '{}'", name), 404)),
    }
}

/// The upstream platform is trusted to state on whose behalf it acts: the
/// caller supplies their own patient or provider id and the booking
/// service still verifies that the id is a party to the appointment.
fn caller_identity(args: &serde_json::Map<String, Value>) -> Result<Uuid, ToolError> {
    if let Some(id) = coerce::opt_uuid(args, "patient_id")? {
        return Ok(id);
    }
    if let Some(id) = coerce::opt_uuid(args, "provider_id")? {
        return Ok(id);
    }
    Err(ToolError::bad_request(
        "patient_id or provider_id is required",
    ))
}
