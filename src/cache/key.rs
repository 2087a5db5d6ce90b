use std::fmt;

use crate::models::Language;

/// Whether a resource is bound to the calling identity or readable by
/// anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Caller,
    Public,
}

/// Logical identity of a cached resource.
///
/// Writes declare which of these keys they invalidate; reads use them to
/// find the cached value and to join in-flight requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Profile,
    PregnancyEvents,
    AncVisits,
    Immunizations,
    Measurements,
    Post(String),
    CommunityPosts,
    PageContent { path: String, language: Language },
    CallerRole,
    TotalVisitors,
}

impl ResourceKey {
    pub fn scope(&self) -> Scope {
        match self {
            ResourceKey::Profile
            | ResourceKey::PregnancyEvents
            | ResourceKey::AncVisits
            | ResourceKey::Immunizations
            | ResourceKey::Measurements
            | ResourceKey::CallerRole => Scope::Caller,
            ResourceKey::Post(_)
            | ResourceKey::CommunityPosts
            | ResourceKey::PageContent { .. }
            | ResourceKey::TotalVisitors => Scope::Public,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Profile => write!(f, "profile"),
            ResourceKey::PregnancyEvents => write!(f, "pregnancy_events"),
            ResourceKey::AncVisits => write!(f, "anc_visits"),
            ResourceKey::Immunizations => write!(f, "immunizations"),
            ResourceKey::Measurements => write!(f, "measurements"),
            ResourceKey::Post(id) => write!(f, "post:{}", id),
            ResourceKey::CommunityPosts => write!(f, "community_posts"),
            ResourceKey::PageContent { path, language } => {
                write!(f, "content:{}:{}", path, language.code())
            }
            ResourceKey::CallerRole => write!(f, "caller_role"),
            ResourceKey::TotalVisitors => write!(f, "total_visitors"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope() {
        assert_eq!(ResourceKey::Profile.scope(), Scope::Caller);
        assert_eq!(ResourceKey::CommunityPosts.scope(), Scope::Public);
        assert_eq!(
            ResourceKey::PageContent {
                path: "nutrition".to_string(),
                language: Language::Nepali,
            }
            .scope(),
            Scope::Public
        );
    }

    #[test]
    fn test_display_carries_parameters() {
        let key = ResourceKey::Post("post_1".to_string());
        assert_eq!(key.to_string(), "post:post_1");
    }
}
