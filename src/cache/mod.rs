//! Client-side data synchronization.
//!
//! This module provides the `SyncCache`, the read path between views and
//! the remote service: cache-then-network reads keyed by logical resource,
//! request de-duplication, write-triggered invalidation, and a full clear
//! when the calling identity changes.

pub mod key;
pub mod store;

pub use key::{ResourceKey, Scope};
pub use store::{ResourceState, ResourceStatus, SyncCache};
