//! Typed read/write surface over the remote service.
//!
//! `HealthClient` is what views consume. Reads go through the
//! [`SyncCache`]: cached when fresh, joined when already in flight,
//! suppressed when the resource is caller-scoped and nobody is signed in.
//! Writes validate locally first, call the service, and then invalidate
//! the read keys that depend on the written record so the next read
//! refetches. Failed writes surface to the caller; nothing retries
//! automatically.

use thiserror::Error;
use tracing::debug;

use crate::api::{RemoteService, ServiceError};
use crate::auth::{IdentityProvider, Principal};
use crate::cache::{ResourceKey, ResourceState, SyncCache};
use crate::models::{
    next_pending, AccessRole, AncContact, AncVisit, GrowthMeasurement, ImmunizationRecord,
    Language, Post, PostCategory, PregnancyEvent, UserProfile, ValidationError,
};
use crate::utils::age::{child_age, gestational_age, ChildAge, GestationalAge, Trimester};
use crate::utils::ids::{IdGenerator, RandomIdGenerator};
use crate::utils::time::Millis;

/// Why a write did not reach the service, or failed there.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] ServiceError),
}

/// Pregnancy figures derived from a profile's expected due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PregnancySummary {
    pub gestational_age: GestationalAge,
    pub trimester: Trimester,
}

/// Everything the home view needs, loaded in one pass.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub profile: ResourceState<Option<UserProfile>>,
    pub visits: ResourceState<Vec<AncVisit>>,
    pub events: ResourceState<Vec<PregnancyEvent>>,
    /// Present when the profile carries an expected due date.
    pub pregnancy: Option<PregnancySummary>,
    /// Present when the profile carries a child date of birth.
    pub child_age: Option<ChildAge>,
    /// The next antenatal contact still to be completed.
    pub next_contact: Option<&'static AncContact>,
}

/// Client facade: remote service + identity + cache, one per process.
pub struct HealthClient<S, I, G = RandomIdGenerator> {
    service: S,
    identity: I,
    ids: G,
    cache: SyncCache,
}

impl<S, I> HealthClient<S, I, RandomIdGenerator>
where
    S: RemoteService,
    I: IdentityProvider,
{
    pub fn new(service: S, identity: I) -> Self {
        Self::with_ids(service, identity, RandomIdGenerator)
    }
}

impl<S, I, G> HealthClient<S, I, G>
where
    S: RemoteService,
    I: IdentityProvider,
    G: IdGenerator,
{
    pub fn with_ids(service: S, identity: I, ids: G) -> Self {
        Self {
            service,
            identity,
            ids,
            cache: SyncCache::new(),
        }
    }

    fn caller(&self) -> Option<Principal> {
        self.identity.current()
    }

    /// Drop every cached record. The cache also clears itself when the
    /// identity provider reports a different caller.
    pub async fn clear_cache(&self) {
        self.cache.clear_all().await;
    }

    // ===== Reads =====

    pub async fn profile(&self) -> ResourceState<Option<UserProfile>> {
        self.cache
            .fetch(self.caller(), ResourceKey::Profile, || {
                self.service.get_caller_profile()
            })
            .await
    }

    pub async fn pregnancy_events(&self) -> ResourceState<Vec<PregnancyEvent>> {
        self.cache
            .fetch(self.caller(), ResourceKey::PregnancyEvents, || {
                self.service.get_pregnancy_events()
            })
            .await
    }

    pub async fn anc_visits(&self) -> ResourceState<Vec<AncVisit>> {
        self.cache
            .fetch(self.caller(), ResourceKey::AncVisits, || {
                self.service.get_anc_visits()
            })
            .await
    }

    pub async fn immunizations(&self) -> ResourceState<Vec<ImmunizationRecord>> {
        self.cache
            .fetch(self.caller(), ResourceKey::Immunizations, || {
                self.service.get_immunizations()
            })
            .await
    }

    pub async fn measurements(&self) -> ResourceState<Vec<GrowthMeasurement>> {
        self.cache
            .fetch(self.caller(), ResourceKey::Measurements, || {
                self.service.get_measurements()
            })
            .await
    }

    pub async fn post(&self, id: &str) -> ResourceState<Option<Post>> {
        self.cache
            .fetch(self.caller(), ResourceKey::Post(id.to_string()), || {
                self.service.get_post(id)
            })
            .await
    }

    pub async fn community_posts(&self) -> ResourceState<Vec<Post>> {
        self.cache
            .fetch(self.caller(), ResourceKey::CommunityPosts, || {
                self.service.list_posts()
            })
            .await
    }

    pub async fn page_content(&self, path: &str, language: Language) -> ResourceState<Option<String>> {
        let key = ResourceKey::PageContent {
            path: path.to_string(),
            language,
        };
        self.cache
            .fetch(self.caller(), key, || {
                self.service.get_page_content(path, language)
            })
            .await
    }

    pub async fn caller_role(&self) -> ResourceState<AccessRole> {
        self.cache
            .fetch(self.caller(), ResourceKey::CallerRole, || {
                self.service.get_caller_role()
            })
            .await
    }

    pub async fn total_visitors(&self) -> ResourceState<u64> {
        self.cache
            .fetch(self.caller(), ResourceKey::TotalVisitors, || {
                self.service.total_visitors()
            })
            .await
    }

    // ===== Writes =====
    //
    // Each write lists the read keys that depend on the record it touches;
    // those keys go stale on success so the next read refetches.

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), SaveError> {
        profile.validate()?;
        self.service.save_caller_profile(profile).await?;
        self.cache.invalidate([ResourceKey::Profile]).await;
        Ok(())
    }

    pub async fn save_pregnancy_event(&self, event: &PregnancyEvent) -> Result<(), SaveError> {
        event.validate()?;
        self.service.save_pregnancy_event(event).await?;
        self.cache.invalidate([ResourceKey::PregnancyEvents]).await;
        Ok(())
    }

    pub async fn save_anc_visit(&self, visit: &AncVisit) -> Result<(), SaveError> {
        visit.validate()?;
        self.service.save_anc_visit(visit).await?;
        self.cache.invalidate([ResourceKey::AncVisits]).await;
        Ok(())
    }

    pub async fn save_immunization(&self, record: &ImmunizationRecord) -> Result<(), SaveError> {
        record.validate()?;
        self.service.save_immunization(record).await?;
        self.cache.invalidate([ResourceKey::Immunizations]).await;
        Ok(())
    }

    pub async fn save_measurement(&self, measurement: &GrowthMeasurement) -> Result<(), SaveError> {
        measurement.validate()?;
        self.service.save_measurement(measurement).await?;
        self.cache.invalidate([ResourceKey::Measurements]).await;
        Ok(())
    }

    pub async fn save_post(&self, post: &Post) -> Result<(), SaveError> {
        post.validate()?;
        self.service.save_post(&post.id, post).await?;
        self.cache
            .invalidate([
                ResourceKey::Post(post.id.clone()),
                ResourceKey::CommunityPosts,
            ])
            .await;
        Ok(())
    }

    pub async fn save_page_content(
        &self,
        path: &str,
        content: &str,
        language: Language,
    ) -> Result<(), SaveError> {
        self.service
            .save_page_content(path, content, language)
            .await?;
        self.cache
            .invalidate([ResourceKey::PageContent {
                path: path.to_string(),
                language,
            }])
            .await;
        Ok(())
    }

    /// Anonymous analytics ping; never fails the caller's flow loudly.
    pub async fn record_visit(&self) -> Result<(), ServiceError> {
        self.service.record_visit().await
    }

    // ===== Builders =====

    /// Build a new top-level post authored by the current caller, ready
    /// for [`save_post`](Self::save_post).
    pub fn new_post(
        &self,
        title: &str,
        content: &str,
        category: PostCategory,
        author: &str,
    ) -> Result<Post, SaveError> {
        let principal = self.caller().ok_or(SaveError::NotAuthenticated)?;
        let post = Post {
            id: self.ids.mint("post"),
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            author: author.to_string(),
            author_principal: principal,
            category,
            timestamp: Millis::now().to_nanos(),
            replies: Vec::new(),
        };
        post.validate()?;
        Ok(post)
    }

    /// Build the parent post with a reply by the current caller appended.
    /// Saving the result re-saves the whole post under the parent's id.
    pub fn new_reply(
        &self,
        parent: &Post,
        content: &str,
        author: &str,
    ) -> Result<Post, SaveError> {
        let principal = self.caller().ok_or(SaveError::NotAuthenticated)?;
        let reply = Post {
            id: self.ids.mint("reply"),
            title: String::new(),
            content: content.trim().to_string(),
            author: author.to_string(),
            author_principal: principal,
            category: parent.category,
            timestamp: Millis::now().to_nanos(),
            replies: Vec::new(),
        };
        let updated = parent.with_reply(reply);
        updated.validate()?;
        Ok(updated)
    }

    /// Build a growth measurement stamped now, ready for
    /// [`save_measurement`](Self::save_measurement).
    pub fn new_measurement(
        &self,
        weight: Option<f64>,
        height: Option<f64>,
        head_circumference: Option<f64>,
    ) -> Result<GrowthMeasurement, SaveError> {
        let measurement = GrowthMeasurement {
            measurement_id: self.ids.mint("m"),
            timestamp: Millis::now().to_nanos(),
            weight,
            height,
            head_circumference,
        };
        measurement.validate()?;
        Ok(measurement)
    }

    // ===== Admin / one-shot =====
    //
    // Admin reads are authorized server-side and not cached; admin views
    // issue them on demand.

    pub async fn profile_for(&self, user: &Principal) -> Result<Option<UserProfile>, ServiceError> {
        self.service.get_user_profile(user).await
    }

    pub async fn anc_visits_for(&self, user: &Principal) -> Result<Vec<AncVisit>, ServiceError> {
        self.service.get_anc_visits_for(user).await
    }

    pub async fn immunizations_for(
        &self,
        user: &Principal,
    ) -> Result<Vec<ImmunizationRecord>, ServiceError> {
        self.service.get_immunizations_for(user).await
    }

    pub async fn measurements_for(
        &self,
        user: &Principal,
    ) -> Result<Vec<GrowthMeasurement>, ServiceError> {
        self.service.get_measurements_for(user).await
    }

    pub async fn pregnancy_events_for(
        &self,
        user: &Principal,
    ) -> Result<Vec<PregnancyEvent>, ServiceError> {
        self.service.get_pregnancy_events_for(user).await
    }

    pub async fn is_admin(&self) -> Result<bool, ServiceError> {
        self.service.is_caller_admin().await
    }

    pub async fn assign_role(&self, user: &Principal, role: AccessRole) -> Result<(), SaveError> {
        self.service.assign_role(user, role).await?;
        // Covers the self-assignment case; other callers' caches are theirs.
        self.cache.invalidate([ResourceKey::CallerRole]).await;
        Ok(())
    }

    // ===== Dashboard =====

    /// Load the home-view resources concurrently and derive the display
    /// figures from whatever is available.
    pub async fn dashboard(&self) -> DashboardSnapshot {
        let (profile, visits, events) =
            futures::join!(self.profile(), self.anc_visits(), self.pregnancy_events());

        let now = Millis::now();
        let current = profile.data.as_ref().and_then(|p| p.as_ref());

        let pregnancy = current
            .and_then(|p| p.expected_due_date())
            .map(|due| {
                let ga = gestational_age(due.to_millis(), now);
                PregnancySummary {
                    gestational_age: ga,
                    trimester: Trimester::from_weeks(ga.weeks),
                }
            });
        let child = current
            .and_then(|p| p.child_dob())
            .map(|dob| child_age(dob.to_millis(), now));
        let next_contact = visits.data.as_deref().and_then(next_pending);

        debug!(
            pregnant = pregnancy.is_some(),
            child = child.is_some(),
            "Dashboard snapshot assembled"
        );

        DashboardSnapshot {
            profile,
            visits,
            events,
            pregnancy,
            child_age: child,
            next_contact,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
