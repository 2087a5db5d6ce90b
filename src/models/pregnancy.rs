use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::utils::time::Nanos;

/// Fixed vocabulary of loggable pregnancy events. The keys are resolved to
/// localized labels by the presentation layer.
pub const EVENT_TYPES: [&str; 7] = [
    "checkup",
    "ultrasound",
    "firstMovement",
    "tetanusDose",
    "ironFolate",
    "dangerSign",
    "delivery",
];

/// Whether an event type belongs to the fixed vocabulary.
pub fn is_known_event_type(event_type: &str) -> bool {
    EVENT_TYPES.contains(&event_type)
}

/// A dated pregnancy milestone logged by the user. Append-only per caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyEvent {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub date: Nanos,
}

impl PregnancyEvent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_known_event_type(&self.event_type) {
            return Err(ValidationError::UnknownEventType(self.event_type.clone()));
        }
        Ok(())
    }
}
