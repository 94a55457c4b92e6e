//! Page models against a mock API: cached loads, mutation invalidation and
//! the messages shown on failure.

#![allow(clippy::unwrap_used)]

use buzzgram_client::pages::{
    AdminApprovalsPage, BusinessDetailPage, CityPage, ClaimBusinessFlow, CreateBusinessWizard,
    OWNER_DASHBOARD_PATH, query_keys,
};
use buzzgram_client::storage::keys;
use buzzgram_client::{ClientError, LocalStore, MemoryStore};
use buzzgram_core::{ApprovalId, BusinessId, CategoryId, CityId};
use buzzgram_integration_tests::{
    TestContext, business_json, envelope, failure, ok, owner_json, user_json,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const OWNER_ID: &str = "6f1c2b9e-3d4a-4f5b-8c7d-1e2f3a4b5c6d";
const APPROVAL_ID: &str = "0b6e8d52-7a1f-4c3e-9d2b-5f4a3c2b1a09";

async fn mount_catalog(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/api/cities"))
        .respond_with(envelope(json!([
            { "id": 3, "name": "Austin", "slug": "austin" },
            { "id": 4, "name": "Denver", "slug": "denver" },
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(envelope(json!([
            { "id": 1, "name": "Food", "slug": "food" },
            { "id": 2, "name": "Beauty", "slug": "beauty" },
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subcategories"))
        .respond_with(envelope(json!([
            { "id": 10, "name": "Coffee", "slug": "coffee", "categoryId": 1 },
            { "id": 20, "name": "Nails", "slug": "nails", "categoryId": 2 },
        ])))
        .mount(&ctx.server)
        .await;
}

async fn signed_in_admin() -> TestContext {
    let ctx = TestContext::with_store(MemoryStore::with_entries([(keys::CONSUMER_TOKEN, "admin")]))
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(envelope(user_json(1, "admin")))
        .mount(&ctx.server)
        .await;
    ctx.app.init().await;
    ctx
}

async fn signed_in_owner() -> TestContext {
    let ctx = TestContext::with_store(MemoryStore::with_entries([(keys::OWNER_TOKEN, "owner")]))
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/business-owner/me"))
        .respond_with(envelope(owner_json(OWNER_ID)))
        .mount(&ctx.server)
        .await;
    ctx.app.init().await;
    ctx
}

// =============================================================================
// City page
// =============================================================================

#[tokio::test]
async fn test_city_page_filters_and_serves_second_load_from_cache() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx).await;
    let mut cafe = business_json(1, "Blue Cafe", 3, 1);
    cafe["subcategoryId"] = json!(10);
    Mock::given(method("GET"))
        .and(path("/api/businesses"))
        .and(query_param("cityId", "3"))
        .respond_with(envelope(json!([
            cafe,
            business_json(2, "Glow Studio", 3, 2),
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut page = CityPage::new(&ctx.app, CityId::new(3), None);
    page.load().await.unwrap();
    page.load().await.unwrap();

    assert_eq!(page.city().unwrap().name, "Austin");
    assert_eq!(page.businesses().len(), 2);
    assert_eq!(
        ctx.store.get(keys::LAST_SELECTED_CITY).unwrap().as_deref(),
        Some("3")
    );

    page.select_category(Some(CategoryId::new(1)));
    let names: Vec<&str> = page.businesses().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Blue Cafe"]);
    assert_eq!(page.visible_subcategories().len(), 1);

    page.set_search("nothing matches");
    assert!(page.businesses().is_empty());
    assert_eq!(
        page.empty_message(),
        Some("Try adjusting your search or filters")
    );
}

#[tokio::test]
async fn test_invalidating_businesses_refetches_city_list() {
    let ctx = TestContext::new().await;
    mount_catalog(&ctx).await;
    Mock::given(method("GET"))
        .and(path("/api/businesses"))
        .respond_with(envelope(json!([business_json(1, "Blue Cafe", 3, 1)])))
        .expect(2)
        .mount(&ctx.server)
        .await;

    let mut page = CityPage::new(&ctx.app, CityId::new(3), None);
    page.load().await.unwrap();
    ctx.app.cache.invalidate(&query_keys::businesses()).await;
    page.load().await.unwrap();
}

// =============================================================================
// Business detail
// =============================================================================

#[tokio::test]
async fn test_envelope_failure_message_reaches_the_page() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/businesses/9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Business is hidden" })),
        )
        .mount(&ctx.server)
        .await;

    let mut page = BusinessDetailPage::new(&ctx.app, BusinessId::new(9));
    let err = page.load().await.unwrap_err();

    assert!(matches!(err, ClientError::Envelope { .. }));
    assert!(page.business().is_none());
}

#[tokio::test]
async fn test_favorite_toggle_requires_sign_in() {
    let ctx = TestContext::new().await;
    ctx.app.init().await;
    Mock::given(method("GET"))
        .and(path("/api/businesses/1"))
        .respond_with(envelope(business_json(1, "Blue Cafe", 3, 1)))
        .mount(&ctx.server)
        .await;

    let mut page = BusinessDetailPage::new(&ctx.app, BusinessId::new(1));
    page.load().await.unwrap();

    assert_eq!(page.is_favorited(), None);
    assert!(matches!(
        page.toggle_favorite().await,
        Err(ClientError::NotAuthenticated)
    ));
}

// =============================================================================
// Admin approvals
// =============================================================================

#[tokio::test]
async fn test_reject_requires_notes_then_reloads_queue() {
    let ctx = signed_in_admin().await;
    let approval = json!({
        "id": APPROVAL_ID,
        "businessId": 4,
        "ownerId": OWNER_ID,
        "type": "claim",
        "ownerName": "Sam Rivera",
        "verificationMessage": "I run this shop",
        "submissionDate": "2026-03-01T12:00:00Z",
        "approvalStatus": "pending",
        "business": { "id": 4, "name": "Glow Studio", "cityId": 3, "categoryId": 2 },
    });
    Mock::given(method("GET"))
        .and(path("/api/admin/approvals"))
        .and(query_param("status", "pending"))
        .and(header("authorization", "Bearer admin"))
        .respond_with(envelope(json!([approval])))
        .expect(2)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/admin/approvals/{APPROVAL_ID}/reject")))
        .and(body_json(json!({ "notes": "Could not verify" })))
        .respond_with(ok())
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut page = AdminApprovalsPage::new(&ctx.app);
    page.load().await.unwrap();
    page.select(APPROVAL_ID.parse::<ApprovalId>().unwrap());
    assert_eq!(page.selected().unwrap().business.name, "Glow Studio");

    page.notes = "   ".to_owned();
    let err = page.reject().await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(page.error.is_some());
    assert!(page.selected().is_some());

    page.notes = "  Could not verify ".to_owned();
    page.reject().await.unwrap();

    assert!(page.selected().is_none());
    assert!(page.error.is_none());
}

#[tokio::test]
async fn test_approve_failure_keeps_panel_open_with_message() {
    let ctx = signed_in_admin().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/approvals"))
        .respond_with(envelope(json!([])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/admin/approvals/{APPROVAL_ID}/approve")))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut page = AdminApprovalsPage::new(&ctx.app);
    page.load().await.unwrap();
    page.select(APPROVAL_ID.parse::<ApprovalId>().unwrap());
    page.approve().await.unwrap_err();

    assert_eq!(page.error.as_deref(), Some("Approval failed"));
    assert!(!page.is_pending());
}

// =============================================================================
// Owner flows
// =============================================================================

#[tokio::test]
async fn test_wizard_submit_refreshes_owner_businesses() {
    let ctx = signed_in_owner().await;
    let created = json!({
        "id": 12,
        "name": "Glow Studio",
        "cityId": 3,
        "categoryId": 2,
        "status": "pending",
    });
    Mock::given(method("POST"))
        .and(path("/api/owner/businesses"))
        .and(header("authorization", "Bearer owner"))
        .respond_with(envelope(created.clone()))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/owner/my-businesses"))
        .respond_with(envelope(json!([created])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut wizard = CreateBusinessWizard::new(&ctx.app);
    wizard.form.name = "Glow Studio".to_owned();
    wizard.form.city_id = Some(CityId::new(3));
    wizard.select_category(Some(CategoryId::new(2)));
    wizard.next().unwrap();
    wizard.form.instagram_handle = "@glow.studio".to_owned();
    wizard.form.description =
        "Nail art, lash lifts and brow shaping in a quiet downtown studio.".to_owned();
    wizard.next().unwrap();

    let business = wizard.submit().await.unwrap();

    assert_eq!(business.id, BusinessId::new(12));
    assert!(wizard.error.is_none());
    let mine = ctx.app.owner.my_businesses().await;
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn test_claim_sends_owner_details_and_returns_dashboard() {
    let ctx = signed_in_owner().await;
    Mock::given(method("GET"))
        .and(path("/api/owner/businesses/search"))
        .and(query_param("name", "glow"))
        .respond_with(envelope(json!([business_json(4, "Glow Studio", 3, 2)])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/owner/claim"))
        .and(body_json(json!({
            "businessId": 4,
            "ownerName": "Sam Rivera",
            "ownerEmail": "sam@shop.com",
            "verificationMessage": "I own it",
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/owner/my-businesses"))
        .respond_with(envelope(json!([])))
        .mount(&ctx.server)
        .await;

    let mut flow = ClaimBusinessFlow::new(&ctx.app);
    flow.search_name = " glow ".to_owned();
    assert_eq!(flow.search().await.unwrap().len(), 1);

    flow.select(BusinessId::new(4));
    flow.verification_message = " I own it ".to_owned();
    let next = flow.claim().await.unwrap();

    assert_eq!(next, Some(OWNER_DASHBOARD_PATH));
}

#[tokio::test]
async fn test_owner_request_without_session_is_rejected_by_server() {
    let ctx = TestContext::new().await;
    ctx.app.init().await;
    Mock::given(method("POST"))
        .and(path("/api/owner/businesses"))
        .respond_with(failure(401, "Authentication required"))
        .mount(&ctx.server)
        .await;

    let mut wizard = CreateBusinessWizard::new(&ctx.app);
    wizard.form.name = "Glow Studio".to_owned();
    wizard.form.city_id = Some(CityId::new(3));
    wizard.select_category(Some(CategoryId::new(2)));
    wizard.form.description =
        "Nail art, lash lifts and brow shaping in a quiet downtown studio.".to_owned();

    wizard.submit().await.unwrap_err();

    assert_eq!(wizard.error.as_deref(), Some("Authentication required"));
}
