//! HTTP implementation of the remote service contract.
//!
//! Requests carry the caller's identity token as a bearer header; the
//! service resolves the calling principal from it. Failed calls surface a
//! [`ServiceError`] and are never retried here - retry is a caller
//! decision.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::service::{RemoteService, ServiceResult};
use super::ServiceError;
use crate::auth::Principal;
use crate::models::{
    AccessRole, AncVisit, GrowthMeasurement, ImmunizationRecord, Language, Post, PregnancyEvent,
    UserProfile,
};

/// HTTP request timeout in seconds.
/// 30s allows for slow responses over rural mobile links while still
/// failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the health-record service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpService {
    /// Create a new client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Create a client carrying the given identity token, sharing the
    /// connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> ServiceResult<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ServiceError::InvalidResponse("identity token is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> ServiceResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ServiceError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e)))
    }

    /// GET where the resource may legitimately be absent: 404 maps to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<Option<T>> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_response(response).await?;
        let value = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e)))?;
        Ok(Some(value))
    }

    /// PUT a record whose save semantics are replace/upsert.
    async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ServiceResult<()> {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// POST a record whose save semantics are append.
    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ServiceResult<()> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }
}

impl RemoteService for HttpService {
    async fn get_caller_profile(&self) -> ServiceResult<Option<UserProfile>> {
        self.get_optional("/profile").await
    }

    async fn save_caller_profile(&self, profile: &UserProfile) -> ServiceResult<()> {
        self.put_json("/profile", profile).await
    }

    async fn get_user_profile(&self, user: &Principal) -> ServiceResult<Option<UserProfile>> {
        self.get_optional(&format!("/users/{}/profile", user)).await
    }

    async fn get_pregnancy_events(&self) -> ServiceResult<Vec<PregnancyEvent>> {
        self.get_json("/pregnancy-events").await
    }

    async fn save_pregnancy_event(&self, event: &PregnancyEvent) -> ServiceResult<()> {
        self.post_json("/pregnancy-events", event).await
    }

    async fn get_pregnancy_events_for(
        &self,
        user: &Principal,
    ) -> ServiceResult<Vec<PregnancyEvent>> {
        self.get_json(&format!("/users/{}/pregnancy-events", user))
            .await
    }

    async fn get_anc_visits(&self) -> ServiceResult<Vec<AncVisit>> {
        self.get_json("/anc-visits").await
    }

    async fn save_anc_visit(&self, visit: &AncVisit) -> ServiceResult<()> {
        self.put_json("/anc-visits", visit).await
    }

    async fn get_anc_visits_for(&self, user: &Principal) -> ServiceResult<Vec<AncVisit>> {
        self.get_json(&format!("/users/{}/anc-visits", user)).await
    }

    async fn get_immunizations(&self) -> ServiceResult<Vec<ImmunizationRecord>> {
        self.get_json("/immunizations").await
    }

    async fn save_immunization(&self, record: &ImmunizationRecord) -> ServiceResult<()> {
        self.put_json("/immunizations", record).await
    }

    async fn get_immunizations_for(
        &self,
        user: &Principal,
    ) -> ServiceResult<Vec<ImmunizationRecord>> {
        self.get_json(&format!("/users/{}/immunizations", user))
            .await
    }

    async fn get_measurements(&self) -> ServiceResult<Vec<GrowthMeasurement>> {
        self.get_json("/measurements").await
    }

    async fn save_measurement(&self, measurement: &GrowthMeasurement) -> ServiceResult<()> {
        self.post_json("/measurements", measurement).await
    }

    async fn get_measurements_for(
        &self,
        user: &Principal,
    ) -> ServiceResult<Vec<GrowthMeasurement>> {
        self.get_json(&format!("/users/{}/measurements", user))
            .await
    }

    async fn get_post(&self, id: &str) -> ServiceResult<Option<Post>> {
        self.get_optional(&format!("/posts/{}", id)).await
    }

    async fn list_posts(&self) -> ServiceResult<Vec<Post>> {
        self.get_json("/posts").await
    }

    async fn save_post(&self, id: &str, post: &Post) -> ServiceResult<()> {
        self.put_json(&format!("/posts/{}", id), post).await
    }

    async fn get_page_content(
        &self,
        path: &str,
        language: Language,
    ) -> ServiceResult<Option<String>> {
        self.get_optional(&format!(
            "/content/{}?language={}",
            path,
            language.wire_name()
        ))
        .await
    }

    async fn save_page_content(
        &self,
        path: &str,
        content: &str,
        language: Language,
    ) -> ServiceResult<()> {
        self.put_json(
            &format!("/content/{}?language={}", path, language.wire_name()),
            content,
        )
        .await
    }

    async fn record_visit(&self) -> ServiceResult<()> {
        // Anonymous analytics ping; auth headers are sent when present but
        // are not required.
        self.post_json("/visits", &serde_json::json!({})).await
    }

    async fn total_visitors(&self) -> ServiceResult<u64> {
        self.get_json("/visitors").await
    }

    async fn get_caller_role(&self) -> ServiceResult<AccessRole> {
        self.get_json("/roles/me").await
    }

    async fn is_caller_admin(&self) -> ServiceResult<bool> {
        self.get_json("/roles/me/admin").await
    }

    async fn assign_role(&self, user: &Principal, role: AccessRole) -> ServiceResult<()> {
        self.put_json(&format!("/roles/{}", user), &role).await
    }
}
