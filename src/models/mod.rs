//! Domain records exchanged with the remote service.
//!
//! This module contains the data structures the tracker works with:
//!
//! - `UserProfile`, `RoleDetails`: account holder with role-specific fields
//! - `PregnancyEvent`: dated milestones against a fixed vocabulary
//! - `AncVisit`: antenatal visits against the fixed contact schedule
//! - `ImmunizationRecord`: doses against the fixed vaccine schedule
//! - `GrowthMeasurement`: weight/height/head readings for charting
//! - `Post`, `PostCategory`: community board posts with nested replies
//! - `Language`: supported display languages
//!
//! Records serialize to the service's wire shape (camelCase fields,
//! nanosecond timestamps).

pub mod growth;
pub mod immunization;
pub mod language;
pub mod post;
pub mod pregnancy;
pub mod profile;
pub mod visit;

pub use growth::{chart_order, GrowthMeasurement};
pub use immunization::{
    schedule_entry, upsert_record, ImmunizationRecord, VaccineDose, VACCINE_SCHEDULE,
};
pub use language::Language;
pub use post::{Post, PostCategory};
pub use pregnancy::{is_known_event_type, PregnancyEvent, EVENT_TYPES};
pub use profile::{AccessRole, ProfileRecord, RoleDetails, UserProfile, UserRole};
pub use visit::{next_pending, upsert_visit, AncContact, AncVisit, ANC_SCHEDULE};

use thiserror::Error;

/// A record rejected locally before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("age must be between {min} and {max}")]
    AgeOutOfRange { min: u32, max: u32 },

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("visit number must be between 1 and {max}")]
    VisitNumberOutOfRange { max: u32 },

    #[error("unknown vaccine: {0}")]
    UnknownVaccine(String),
}
