//! Wire models returned by the BuzzGram REST API.
//!
//! Everything here deserializes from the `data` field of the response
//! envelope. Field names are camelCase on the wire; optional fields tolerate
//! being absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    ApprovalId, ApprovalKind, BusinessId, BusinessStatus, CategoryId, CityId, FavoriteId,
    GeneralQuoteId, OwnerId, QuoteRequestId, Role, SubcategoryId, UserId,
};

// =============================================================================
// Identities
// =============================================================================

/// Consumer/admin profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Business-owner profile.
///
/// There is no role field: holding this identity is the capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessOwner {
    pub id: OwnerId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BusinessOwner {
    /// Greeting name: the first name, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.email)
    }

    /// "First Last" with missing parts dropped.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_owned()
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub subcategories: Option<Vec<Subcategory>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub category_id: CategoryId,
}

/// A directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub city_id: CityId,
    pub category_id: CategoryId,
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub business_owner_id: Option<OwnerId>,
    #[serde(default)]
    pub status: Option<BusinessStatus>,
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approval_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: Option<Subcategory>,
}

impl Business {
    /// Status as seen by the owner dashboard; listings without a status are
    /// treated as active directory entries.
    #[must_use]
    pub fn effective_status(&self) -> BusinessStatus {
        self.status.unwrap_or(BusinessStatus::Active)
    }
}

/// Query parameters accepted by `GET /businesses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<CityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

// =============================================================================
// Consumer activity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub business_id: BusinessId,
    #[serde(default)]
    pub business: Option<Business>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Quote request addressed to a single business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub business_id: BusinessId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub business: Option<Business>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Quote request broadcast to every provider in a subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralQuote {
    pub id: GeneralQuoteId,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /quote-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuoteRequest {
    pub business_id: BusinessId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// Payload for `POST /general-quotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGeneralQuote {
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

// =============================================================================
// Owner workflows
// =============================================================================

/// Payload for `POST /owner/businesses` and `PUT /owner/businesses/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDraft {
    pub name: String,
    pub city_id: CityId,
    pub category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<SubcategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payload for `POST /owner/claim` and `POST /business-claims`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub business_id: BusinessId,
    pub owner_name: String,
    pub owner_email: String,
    pub verification_message: String,
}

/// A consumer-submitted ownership claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessClaim {
    pub id: i32,
    pub business_id: BusinessId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub business: Option<Business>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalBusiness {
    pub id: BusinessId,
    pub name: String,
    pub city_id: CityId,
    pub category_id: CategoryId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Claim or creation request awaiting admin review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: ApprovalId,
    pub business_id: BusinessId,
    pub owner_id: OwnerId,
    #[serde(rename = "type")]
    pub kind: ApprovalKind,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub verification_message: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub approval_status: String,
    #[serde(default)]
    pub approval_notes: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub business: ApprovalBusiness,
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_businesses: u64,
    pub total_users: u64,
    pub total_quotes: u64,
    pub pending_approvals: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_business_deserializes_minimal_payload() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Blue Cafe",
            "cityId": 2,
            "categoryId": 5
        });
        let business: Business = serde_json::from_value(json).unwrap();
        assert_eq!(business.category_id, CategoryId::new(5));
        assert!(business.subcategory_id.is_none());
        assert_eq!(business.effective_status(), BusinessStatus::Active);
    }

    #[test]
    fn test_owner_names() {
        let owner: BusinessOwner = serde_json::from_value(serde_json::json!({
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "email": "sam@shop.com",
            "firstName": "Sam",
            "lastName": null
        }))
        .unwrap();
        assert_eq!(owner.display_name(), "Sam");
        assert_eq!(owner.full_name(), "Sam");

        let anonymous = BusinessOwner {
            first_name: None,
            ..owner
        };
        assert_eq!(anonymous.display_name(), "sam@shop.com");
        assert_eq!(anonymous.full_name(), "");
    }

    #[test]
    fn test_search_params_skip_empty_fields() {
        let params = BusinessSearchParams {
            city_id: Some(CityId::new(3)),
            ..BusinessSearchParams::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "cityId": 3 })
        );
    }

    #[test]
    fn test_approval_type_field() {
        let approval: Approval = serde_json::from_value(serde_json::json!({
            "id": "0b7f8f5e-5b0c-4c8a-9d3e-1f2a3b4c5d6e",
            "businessId": 9,
            "ownerId": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "type": "claim",
            "submissionDate": "2026-01-02T03:04:05Z",
            "approvalStatus": "pending",
            "business": { "id": 9, "name": "Glow", "cityId": 1, "categoryId": 2 }
        }))
        .unwrap();
        assert_eq!(approval.kind, ApprovalKind::Claim);
        assert_eq!(approval.business.name, "Glow");
    }
}
