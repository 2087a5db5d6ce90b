//! Caller identity and session management.
//!
//! This module provides:
//! - `Principal`: opaque reference to an authenticated caller
//! - `IdentityProvider`: capability supplying the optional current caller
//! - `Session`: delegated-identity session persisted to disk with expiry
//! - `CredentialStore`: identity token at rest via the OS keychain
//!
//! Authentication itself happens in the external identity service; this
//! client never handles a password.

pub mod credentials;
pub mod identity;
pub mod session;

pub use credentials::CredentialStore;
pub use identity::{IdentityProvider, MemoryIdentity, Principal};
pub use session::{Session, SessionData};
