//! Abstract contract of the remote health-record service.
//!
//! Every operation is asynchronous and may fail with a [`ServiceError`].
//! Caller-scoped operations are implicitly authenticated by the identity
//! token the implementation carries; admin variants take an explicit user
//! reference and are authorized server-side.

use super::ServiceError;
use crate::auth::Principal;
use crate::models::{
    AccessRole, AncVisit, GrowthMeasurement, ImmunizationRecord, Language, Post, PregnancyEvent,
    UserProfile,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[allow(async_fn_in_trait)]
pub trait RemoteService {
    // ===== Profiles =====

    /// Profile of the calling user, or `None` before first save.
    async fn get_caller_profile(&self) -> ServiceResult<Option<UserProfile>>;

    /// Create or overwrite the calling user's profile.
    async fn save_caller_profile(&self, profile: &UserProfile) -> ServiceResult<()>;

    /// Profile of any user. Non-admin callers may only read their own.
    async fn get_user_profile(&self, user: &Principal) -> ServiceResult<Option<UserProfile>>;

    // ===== Pregnancy events =====

    async fn get_pregnancy_events(&self) -> ServiceResult<Vec<PregnancyEvent>>;

    /// Append a pregnancy event for the calling user.
    async fn save_pregnancy_event(&self, event: &PregnancyEvent) -> ServiceResult<()>;

    async fn get_pregnancy_events_for(
        &self,
        user: &Principal,
    ) -> ServiceResult<Vec<PregnancyEvent>>;

    // ===== ANC visits =====

    async fn get_anc_visits(&self) -> ServiceResult<Vec<AncVisit>>;

    /// Upsert an ANC visit by visit number for the calling user.
    async fn save_anc_visit(&self, visit: &AncVisit) -> ServiceResult<()>;

    async fn get_anc_visits_for(&self, user: &Principal) -> ServiceResult<Vec<AncVisit>>;

    // ===== Immunizations =====

    async fn get_immunizations(&self) -> ServiceResult<Vec<ImmunizationRecord>>;

    /// Upsert an immunization record by vaccine name for the calling user.
    async fn save_immunization(&self, record: &ImmunizationRecord) -> ServiceResult<()>;

    async fn get_immunizations_for(
        &self,
        user: &Principal,
    ) -> ServiceResult<Vec<ImmunizationRecord>>;

    // ===== Growth measurements =====

    async fn get_measurements(&self) -> ServiceResult<Vec<GrowthMeasurement>>;

    /// Append a growth measurement for the calling user's child.
    async fn save_measurement(&self, measurement: &GrowthMeasurement) -> ServiceResult<()>;

    async fn get_measurements_for(
        &self,
        user: &Principal,
    ) -> ServiceResult<Vec<GrowthMeasurement>>;

    // ===== Community posts =====

    /// A single post by id. Available to everyone.
    async fn get_post(&self, id: &str) -> ServiceResult<Option<Post>>;

    /// All board posts, newest first. Available to everyone.
    async fn list_posts(&self) -> ServiceResult<Vec<Post>>;

    /// Create or update a post. Users may only modify their own posts;
    /// admins may modify any post.
    async fn save_post(&self, id: &str, post: &Post) -> ServiceResult<()>;

    // ===== Localized content =====

    /// Localized page content. Available to everyone.
    async fn get_page_content(&self, path: &str, language: Language)
        -> ServiceResult<Option<String>>;

    /// Save localized page content. Admin-only.
    async fn save_page_content(
        &self,
        path: &str,
        content: &str,
        language: Language,
    ) -> ServiceResult<()>;

    // ===== Analytics =====

    /// Record a visit. Any caller, including anonymous, may call this;
    /// only aggregate counters are updated.
    async fn record_visit(&self) -> ServiceResult<()>;

    async fn total_visitors(&self) -> ServiceResult<u64>;

    // ===== Roles =====

    async fn get_caller_role(&self) -> ServiceResult<AccessRole>;

    async fn is_caller_admin(&self) -> ServiceResult<bool>;

    /// Assign an access role to a user. Admin-only.
    async fn assign_role(&self, user: &Principal, role: AccessRole) -> ServiceResult<()>;
}
