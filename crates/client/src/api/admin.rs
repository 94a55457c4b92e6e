//! Admin endpoints: stats, users, quotes, approvals and business moderation.

use buzzgram_core::models::{AdminStats, Approval, Business, QuoteRequest, User};
use buzzgram_core::{ApprovalId, ApprovalStatus, BusinessId, BusinessStatus};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::ApiClient;

/// Body of `PATCH /admin/businesses/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminBusinessStatusUpdate {
    pub status: BusinessStatus,
}

#[derive(Serialize)]
struct ApprovalQuery {
    status: &'static str,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_admin_stats(&self) -> Result<AdminStats, ClientError> {
        self.get("/admin/stats").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/admin/users").await
    }

    /// Every per-business quote request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_all_business_quotes(&self) -> Result<Vec<QuoteRequest>, ClientError> {
        self.get("/admin/quote-requests").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_approvals(&self, status: ApprovalStatus) -> Result<Vec<Approval>, ClientError> {
        self.get_with_query(
            "/admin/approvals",
            &ApprovalQuery {
                status: status.as_str(),
            },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, notes), fields(approval_id = %id))]
    pub async fn approve(&self, id: ApprovalId, notes: Option<&str>) -> Result<(), ClientError> {
        let body = notes.map_or_else(|| json!({}), |notes| json!({ "notes": notes }));
        self.execute(
            Method::POST,
            &format!("/admin/approvals/{id}/approve"),
            Some(&body),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, notes), fields(approval_id = %id))]
    pub async fn reject(&self, id: ApprovalId, notes: &str) -> Result<(), ClientError> {
        self.execute(
            Method::POST,
            &format!("/admin/approvals/{id}/reject"),
            Some(&json!({ "notes": notes })),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_admin_businesses(&self) -> Result<Vec<Business>, ClientError> {
        self.get("/admin/businesses").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(business_id = %id))]
    pub async fn set_business_status(
        &self,
        id: BusinessId,
        status: BusinessStatus,
    ) -> Result<(), ClientError> {
        self.execute(
            Method::PATCH,
            &format!("/admin/businesses/{id}/status"),
            Some(&AdminBusinessStatusUpdate { status }),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(business_id = %id))]
    pub async fn delete_business(&self, id: BusinessId) -> Result<(), ClientError> {
        self.delete(&format!("/admin/businesses/{id}")).await
    }
}
