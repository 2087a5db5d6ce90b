//! Remote service interface.
//!
//! This module defines the abstract `RemoteService` contract the rest of
//! the crate programs against, the `HttpService` implementation that talks
//! to the hosted backend over HTTPS with bearer-token identity, and the
//! `ServiceError` taxonomy every remote call can fail with.

pub mod client;
pub mod error;
pub mod service;

pub use client::HttpService;
pub use error::ServiceError;
pub use service::{RemoteService, ServiceResult};
