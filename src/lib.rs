//! Maternal and child health companion core.
//!
//! Client-side building blocks for a mobile health tracker: domain records
//! for profiles, pregnancy events, antenatal visits, immunizations, growth
//! measurements, and community posts; the [`RemoteService`] contract with
//! an HTTP implementation; a synchronization cache with request
//! de-duplication and write-triggered invalidation; and the pregnancy and
//! child age calculators.
//!
//! The typical embedding creates one [`HealthClient`] per process from a
//! service implementation and an identity provider, and renders the
//! [`cache::ResourceState`] snapshots its read methods return.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod queries;
pub mod utils;

pub use api::{HttpService, RemoteService, ServiceError};
pub use auth::{IdentityProvider, Principal, Session};
pub use cache::{ResourceKey, ResourceState, ResourceStatus, SyncCache};
pub use config::Preferences;
pub use queries::{DashboardSnapshot, HealthClient, SaveError};
