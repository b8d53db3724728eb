// libs/voice-cell/src/models.rs
use serde::Deserialize;
use serde_json::Value;

/// Webhook envelope. The voice platform posts several message kinds to
/// the same endpoint; only `tool-calls` carries work for us.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub message: Option<ToolMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "toolCallList", default)]
    pub tool_call_list: Vec<ToolCall>,
}

/// One named invocation in a batch. Arguments arrive loosely typed and
/// occasionally as a JSON-encoded string.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Per-invocation failure surfaced inside that invocation's own result,
/// never as a transport-level error: a short message plus a numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub message: String,
    pub code: u16,
}

impl ToolError {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, 400)
    }

    /// Internal faults are shrunk to a fixed message; no store detail or
    /// backtrace ever reaches the caller.
    pub fn internal() -> Self {
        Self::new("Internal error", 500)
    }

    pub fn to_result(&self) -> Value {
        serde_json::json!({ "error": self.message, "code": self.code })
    }
}

impl From<appointment_cell::models::SchedulingError> for ToolError {
    fn from(e: appointment_cell::models::SchedulingError) -> Self {
        use appointment_cell::models::SchedulingError as E;
        match &e {
            E::NotFound | E::ProviderNotFound | E::PatientNotFound => {
                ToolError::new(e.to_string(), 404)
            }
            E::SlotTaken | E::PatientDoubleBooked => ToolError::new(e.to_string(), 409),
            E::Forbidden(_) => ToolError::new(e.to_string(), 403),
            E::InvalidTime(_) | E::InvalidTransition(_) | E::Validation(_) => {
                ToolError::new(e.to_string(), 400)
            }
            E::Database(msg) => {
                tracing::error!("tool call hit a store fault: {}", msg);
                ToolError::internal()
            }
        }
    }
}

impl From<provider_cell::models::AvailabilityError> for ToolError {
    fn from(e: provider_cell::models::AvailabilityError) -> Self {
        use provider_cell::models::AvailabilityError as E;
        match &e {
            E::NotFound => ToolError::new(e.to_string(), 404),
            E::Duplicate => ToolError::new(e.to_string(), 409),
            E::InvalidTime(_) | E::Validation(_) => ToolError::new(e.to_string(), 400),
            E::Database(msg) => {
                tracing::error!("tool call hit a store fault: {}", msg);
                ToolError::internal()
            }
        }
    }
}
