//! Child immunization records against the fixed vaccine schedule.

use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::utils::time::{Millis, Nanos, MILLIS_PER_DAY};

/// One dose in the fixed immunization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaccineDose {
    pub vaccine: &'static str,
    /// Child age in weeks at which the dose is due.
    pub due_weeks: u32,
}

impl VaccineDose {
    /// The calendar instant this dose is due for a child born at `dob`.
    pub fn due_date(&self, dob: Millis) -> Millis {
        Millis(dob.0 + self.due_weeks as i64 * 7 * MILLIS_PER_DAY)
    }

    pub fn is_overdue(&self, dob: Millis, now: Millis) -> bool {
        now > self.due_date(dob)
    }
}

/// The fixed immunization schedule, in due order.
pub static VACCINE_SCHEDULE: [VaccineDose; 12] = [
    VaccineDose { vaccine: "BCG", due_weeks: 0 },
    VaccineDose { vaccine: "OPV 0", due_weeks: 0 },
    VaccineDose { vaccine: "Hepatitis B birth dose", due_weeks: 0 },
    VaccineDose { vaccine: "Pentavalent 1", due_weeks: 6 },
    VaccineDose { vaccine: "OPV 1", due_weeks: 6 },
    VaccineDose { vaccine: "Rotavirus 1", due_weeks: 6 },
    VaccineDose { vaccine: "Pentavalent 2", due_weeks: 10 },
    VaccineDose { vaccine: "OPV 2", due_weeks: 10 },
    VaccineDose { vaccine: "Pentavalent 3", due_weeks: 14 },
    VaccineDose { vaccine: "OPV 3", due_weeks: 14 },
    VaccineDose { vaccine: "Measles-Rubella 1", due_weeks: 39 },
    VaccineDose { vaccine: "Japanese Encephalitis 1", due_weeks: 39 },
];

/// Look up a schedule entry by vaccine name.
pub fn schedule_entry(vaccine: &str) -> Option<&'static VaccineDose> {
    VACCINE_SCHEDULE.iter().find(|d| d.vaccine == vaccine)
}

/// A logged dose. Saves upsert by vaccine name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmunizationRecord {
    pub vaccine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Nanos>,
    pub completed: bool,
}

impl ImmunizationRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if schedule_entry(&self.vaccine).is_none() {
            return Err(ValidationError::UnknownVaccine(self.vaccine.clone()));
        }
        Ok(())
    }
}

/// Replace the record for the same vaccine, or append.
pub fn upsert_record(records: &mut Vec<ImmunizationRecord>, record: ImmunizationRecord) {
    match records.iter_mut().find(|r| r.vaccine == record.vaccine) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

// ============================================================================
// Tests
// ============================================================================
