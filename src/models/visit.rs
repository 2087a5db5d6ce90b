//! Antenatal care visits against the fixed contact schedule.

use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::utils::time::Nanos;

/// One contact in the fixed antenatal schedule (WHO eight-contact model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncContact {
    pub visit: u32,
    /// Recommended gestational week for the contact.
    pub week: u32,
}

/// The fixed antenatal contact schedule, in visit order.
pub static ANC_SCHEDULE: [AncContact; 8] = [
    AncContact { visit: 1, week: 12 },
    AncContact { visit: 2, week: 20 },
    AncContact { visit: 3, week: 26 },
    AncContact { visit: 4, week: 30 },
    AncContact { visit: 5, week: 34 },
    AncContact { visit: 6, week: 36 },
    AncContact { visit: 7, week: 38 },
    AncContact { visit: 8, week: 40 },
];

/// A logged antenatal visit. Saves upsert by `visit_number`: re-saving a
/// number replaces the earlier record rather than duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncVisit {
    #[serde(rename = "visitNumber")]
    pub visit_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Nanos>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AncVisit {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let max = ANC_SCHEDULE.len() as u32;
        if self.visit_number < 1 || self.visit_number > max {
            return Err(ValidationError::VisitNumberOutOfRange { max });
        }
        Ok(())
    }
}

/// Replace the record with the same visit number, or append. Mirrors the
/// service's upsert semantics so optimistic local lists stay consistent
/// with a later refetch.
pub fn upsert_visit(visits: &mut Vec<AncVisit>, visit: AncVisit) {
    match visits
        .iter_mut()
        .find(|v| v.visit_number == visit.visit_number)
    {
        Some(existing) => *existing = visit,
        None => visits.push(visit),
    }
}

/// The first scheduled contact with no completed record, if any remain.
pub fn next_pending(visits: &[AncVisit]) -> Option<&'static AncContact> {
    ANC_SCHEDULE.iter().find(|contact| {
        !visits
            .iter()
            .any(|v| v.visit_number == contact.visit && v.completed)
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(number: u32, completed: bool) -> AncVisit {
        AncVisit {
            visit_number: number,
            date: None,
            completed,
            notes: None,
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(visit(1, false).validate().is_ok());
        assert!(visit(8, false).validate().is_ok());
        assert!(visit(0, false).validate().is_err());
        assert!(visit(9, false).validate().is_err());
    }

    #[test]
    fn test_upsert_replaces_by_visit_number() {
        let mut visits = vec![visit(1, true), visit(2, false)];
        let mut updated = visit(2, true);
        updated.notes = Some("BP normal".to_string());
        upsert_visit(&mut visits, updated.clone());

        assert_eq!(visits.len(), 2);
        let stored: Vec<&AncVisit> = visits.iter().filter(|v| v.visit_number == 2).collect();
        assert_eq!(stored.len(), 1);
        assert_eq!(*stored[0], updated);
    }

    #[test]
    fn test_upsert_appends_new_number() {
        let mut visits = vec![visit(1, true)];
        upsert_visit(&mut visits, visit(3, false));
        assert_eq!(visits.len(), 2);
    }

    #[test]
    fn test_next_pending() {
        assert_eq!(next_pending(&[]).map(|c| c.visit), Some(1));

        let logged = vec![visit(1, true), visit(2, true), visit(3, false)];
        // Visit 3 exists but is not completed, so it is still pending.
        assert_eq!(next_pending(&logged).map(|c| c.visit), Some(3));

        let all: Vec<AncVisit> = (1..=8).map(|n| visit(n, true)).collect();
        assert!(next_pending(&all).is_none());
    }
}
