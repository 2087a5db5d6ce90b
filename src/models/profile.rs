//! User profile in a clean domain form, decoupled from the flat wire record.
//!
//! The wire shape carries a role tag plus two optional timestamps; only one
//! of them is meaningful for any given role. The domain type makes the
//! invalid combinations unrepresentable by hanging the timestamp off the
//! role variant itself.

use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::utils::time::Nanos;

/// Youngest plausible profile age in years.
const MIN_AGE: u32 = 10;

/// Oldest plausible profile age in years.
const MAX_AGE: u32 = 120;

/// Who the account holder is, as the remote service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "pregnantWoman")]
    PregnantWoman,
    #[serde(rename = "mother")]
    Mother,
    #[serde(rename = "familyMember")]
    FamilyMember,
    #[serde(rename = "healthWorker")]
    HealthWorker,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::PregnantWoman => write!(f, "Pregnant woman"),
            UserRole::Mother => write!(f, "Mother"),
            UserRole::FamilyMember => write!(f, "Family member"),
            UserRole::HealthWorker => write!(f, "Health worker"),
        }
    }
}

/// Access level reported by the remote service for the calling identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRole {
    Admin,
    User,
    Guest,
}

/// Role-specific profile fields. Each variant carries only the timestamp
/// meaningful for that role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDetails {
    PregnantWoman { expected_due_date: Option<Nanos> },
    Mother { child_dob: Option<Nanos> },
    FamilyMember { child_dob: Option<Nanos> },
    HealthWorker,
}

/// Profile of an account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileRecord", into = "ProfileRecord")]
pub struct UserProfile {
    pub name: String,
    /// Age in whole years.
    pub age: u32,
    pub country: String,
    pub role: RoleDetails,
}

impl UserProfile {
    pub fn role(&self) -> UserRole {
        match self.role {
            RoleDetails::PregnantWoman { .. } => UserRole::PregnantWoman,
            RoleDetails::Mother { .. } => UserRole::Mother,
            RoleDetails::FamilyMember { .. } => UserRole::FamilyMember,
            RoleDetails::HealthWorker => UserRole::HealthWorker,
        }
    }

    /// Expected due date, present only for pregnant-woman profiles.
    pub fn expected_due_date(&self) -> Option<Nanos> {
        match self.role {
            RoleDetails::PregnantWoman { expected_due_date } => expected_due_date,
            _ => None,
        }
    }

    /// Child's date of birth, present only for mother/family profiles.
    pub fn child_dob(&self) -> Option<Nanos> {
        match self.role {
            RoleDetails::Mother { child_dob } | RoleDetails::FamilyMember { child_dob } => {
                child_dob
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::MissingField("country"));
        }
        if self.age < MIN_AGE || self.age > MAX_AGE {
            return Err(ValidationError::AgeOutOfRange {
                min: MIN_AGE,
                max: MAX_AGE,
            });
        }
        Ok(())
    }
}

/// Flat wire shape of a profile as the remote service stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub age: u32,
    pub country: String,
    pub role: UserRole,
    #[serde(
        rename = "expectedDueDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_due_date: Option<Nanos>,
    #[serde(rename = "childDob", default, skip_serializing_if = "Option::is_none")]
    pub child_dob: Option<Nanos>,
}

impl From<ProfileRecord> for UserProfile {
    /// Reads only the timestamp relevant to the record's role; a stray
    /// field left over from an earlier role change is dropped.
    fn from(record: ProfileRecord) -> Self {
        let role = match record.role {
            UserRole::PregnantWoman => RoleDetails::PregnantWoman {
                expected_due_date: record.expected_due_date,
            },
            UserRole::Mother => RoleDetails::Mother {
                child_dob: record.child_dob,
            },
            UserRole::FamilyMember => RoleDetails::FamilyMember {
                child_dob: record.child_dob,
            },
            UserRole::HealthWorker => RoleDetails::HealthWorker,
        };
        UserProfile {
            name: record.name,
            age: record.age,
            country: record.country,
            role,
        }
    }
}

impl From<UserProfile> for ProfileRecord {
    fn from(profile: UserProfile) -> Self {
        let role = profile.role();
        let (expected_due_date, child_dob) = match profile.role {
            RoleDetails::PregnantWoman { expected_due_date } => (expected_due_date, None),
            RoleDetails::Mother { child_dob } | RoleDetails::FamilyMember { child_dob } => {
                (None, child_dob)
            }
            RoleDetails::HealthWorker => (None, None),
        };
        ProfileRecord {
            name: profile.name,
            age: profile.age,
            country: profile.country,
            role,
            expected_due_date,
            child_dob,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pregnant(due: Option<i128>) -> UserProfile {
        UserProfile {
            name: "Sita".to_string(),
            age: 28,
            country: "Nepal".to_string(),
            role: RoleDetails::PregnantWoman {
                expected_due_date: due.map(Nanos),
            },
        }
    }

    #[test]
    fn test_wire_round_trip() {
        let profile = pregnant(Some(1_700_000_000_000_000_000));
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"expectedDueDate\""));
        assert!(!json.contains("childDob"));
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_decode_drops_role_irrelevant_field() {
        // A mother record carrying a leftover due date: only childDob is read.
        let json = r#"{
            "name": "Asha", "age": 30, "country": "India", "role": "mother",
            "expectedDueDate": 1, "childDob": 2
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role(), UserRole::Mother);
        assert_eq!(profile.child_dob(), Some(Nanos(2)));
        assert_eq!(profile.expected_due_date(), None);
    }

    #[test]
    fn test_health_worker_has_no_dates() {
        let json = r#"{"name": "Maya", "age": 35, "country": "Nepal", "role": "healthWorker"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role(), UserRole::HealthWorker);
        assert_eq!(profile.expected_due_date(), None);
        assert_eq!(profile.child_dob(), None);
    }

    #[test]
    fn test_validate() {
        assert!(pregnant(None).validate().is_ok());

        let mut no_name = pregnant(None);
        no_name.name = "  ".to_string();
        assert!(matches!(
            no_name.validate(),
            Err(ValidationError::MissingField("name"))
        ));

        let mut too_young = pregnant(None);
        too_young.age = 5;
        assert!(matches!(
            too_young.validate(),
            Err(ValidationError::AgeOutOfRange { .. })
        ));
    }
}
