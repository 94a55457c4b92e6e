//! Page view models.
//!
//! Each page does what its screen does minus the rendering: fetch through the
//! query cache, derive display state, validate input and run mutations.
//! Failures of user actions are kept as an inline `error` message (the
//! server's `message` when it sent one, otherwise a fixed fallback) and are
//! also returned to the caller.

mod admin;
mod approvals;
mod business;
mod city;
mod city_selector;
mod claim;
mod dashboard;
mod owner;
mod quote;
mod register;
mod settings;
mod wizard;

pub use admin::{AdminBusinesses, AdminDashboard, STATS_REFRESH_INTERVAL, toggled_status};
pub use approvals::AdminApprovalsPage;
pub use business::{BusinessDetailPage, BusinessQuoteForm};
pub use city::CityPage;
pub use city_selector::{CitySelector, NO_CITY_LABEL};
pub use claim::{ClaimBusinessFlow, NO_RESULTS_MESSAGE};
pub use dashboard::UserDashboard;
pub use owner::OwnerDashboard;
pub use quote::QuotePage;
pub use register::RegisterPage;
pub use settings::{PASSWORD_CHANGED, SettingsPage};
pub use wizard::{CreateBusinessWizard, EditBusinessForm, OWNER_DASHBOARD_PATH};

use buzzgram_core::CategoryId;
use buzzgram_core::models::{Category, City, Subcategory};

use crate::app::App;
use crate::error::ClientError;

/// Query keys shared between pages, so a mutation on one page invalidates
/// what another shows.
pub mod query_keys {
    use buzzgram_core::{ApprovalStatus, BusinessId, CityId};

    use crate::cache::QueryKey;

    #[must_use]
    pub fn cities() -> QueryKey {
        QueryKey::new("cities")
    }

    #[must_use]
    pub fn categories() -> QueryKey {
        QueryKey::new("categories")
    }

    #[must_use]
    pub fn subcategories() -> QueryKey {
        QueryKey::new("subcategories")
    }

    /// Every city's business list.
    #[must_use]
    pub fn businesses() -> QueryKey {
        QueryKey::new("businesses")
    }

    #[must_use]
    pub fn city_businesses(city_id: CityId) -> QueryKey {
        businesses().with(city_id)
    }

    #[must_use]
    pub fn business(id: BusinessId) -> QueryKey {
        QueryKey::new("business").with(id)
    }

    #[must_use]
    pub fn favorites() -> QueryKey {
        QueryKey::new("favorites")
    }

    #[must_use]
    pub fn favorite_check(id: BusinessId) -> QueryKey {
        favorites().with("check").with(id)
    }

    #[must_use]
    pub fn my_quotes() -> QueryKey {
        QueryKey::new("myQuotes")
    }

    #[must_use]
    pub fn admin_stats() -> QueryKey {
        QueryKey::new("adminStats")
    }

    #[must_use]
    pub fn all_users() -> QueryKey {
        QueryKey::new("allUsers")
    }

    #[must_use]
    pub fn all_general_quotes() -> QueryKey {
        QueryKey::new("allGeneralQuotes")
    }

    #[must_use]
    pub fn all_business_quotes() -> QueryKey {
        QueryKey::new("allBusinessQuotes")
    }

    /// Every approval list.
    #[must_use]
    pub fn admin_approvals() -> QueryKey {
        QueryKey::new("admin-approvals")
    }

    #[must_use]
    pub fn admin_approvals_by_status(status: ApprovalStatus) -> QueryKey {
        admin_approvals().with(status.as_str())
    }

    #[must_use]
    pub fn admin_businesses() -> QueryKey {
        QueryKey::new("admin-businesses")
    }

    /// Prefixes whose data depends on who is signed in as a consumer.
    #[must_use]
    pub fn consumer_scoped() -> [QueryKey; 8] {
        [
            favorites(),
            my_quotes(),
            admin_stats(),
            all_users(),
            all_general_quotes(),
            all_business_quotes(),
            admin_approvals(),
            admin_businesses(),
        ]
    }
}

// =============================================================================
// Shared catalog loaders
// =============================================================================

async fn load_cities(app: &App) -> Result<Vec<City>, ClientError> {
    app.cache
        .fetch(query_keys::cities(), || app.api.get_cities())
        .await
}

async fn load_categories(app: &App) -> Result<Vec<Category>, ClientError> {
    app.cache
        .fetch(query_keys::categories(), || app.api.get_categories())
        .await
}

async fn load_subcategories(app: &App) -> Result<Vec<Subcategory>, ClientError> {
    app.cache
        .fetch(query_keys::subcategories(), || app.api.get_subcategories())
        .await
}

/// Catalog lists behind a form's city, category and subcategory pickers.
#[derive(Debug, Clone, Default)]
struct Pickers {
    cities: Vec<City>,
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
}

impl Pickers {
    async fn load(app: &App) -> Result<Self, ClientError> {
        let (cities, categories, subcategories) = tokio::try_join!(
            load_cities(app),
            load_categories(app),
            load_subcategories(app),
        )?;
        Ok(Self {
            cities,
            categories,
            subcategories,
        })
    }

    fn subcategories_of(&self, category: Option<CategoryId>) -> Vec<&Subcategory> {
        category.map_or_else(Vec::new, |category| {
            self.subcategories
                .iter()
                .filter(|s| s.category_id == category)
                .collect()
        })
    }
}

/// Keep the inline error in sync with an action's outcome.
fn record<T>(error: &mut Option<String>, result: &Result<T, ClientError>, fallback: &str) {
    *error = result.as_ref().err().map(|e| e.user_message(fallback));
}
