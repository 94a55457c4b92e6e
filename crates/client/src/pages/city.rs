//! City browsing page.

use std::sync::Arc;

use buzzgram_core::filter::CityFilter;
use buzzgram_core::models::{Business, BusinessSearchParams, Category, City, Subcategory};
use buzzgram_core::{CategoryId, CityId, SubcategoryId};
use tracing::instrument;

use super::city_selector::CitySelector;
use super::{Pickers, query_keys};
use crate::app::App;
use crate::error::ClientError;

/// Every business of one city, narrowed in memory.
pub struct CityPage {
    app: App,
    city_id: CityId,
    pub filter: CityFilter,
    catalog: Pickers,
    businesses: Vec<Business>,
}

impl CityPage {
    /// Page for `/city/{city_id}`, with the `?search=` term if present.
    #[must_use]
    pub fn new(app: &App, city_id: CityId, search: Option<&str>) -> Self {
        Self {
            app: app.clone(),
            city_id,
            filter: search.map(CityFilter::with_search).unwrap_or_default(),
            catalog: Pickers::default(),
            businesses: Vec::new(),
        }
    }

    #[must_use]
    pub const fn city_id(&self) -> CityId {
        self.city_id
    }

    /// Fetch the catalog and the city's businesses, and remember the city.
    ///
    /// # Errors
    ///
    /// Returns the first failing query's error.
    #[instrument(skip(self), fields(city_id = %self.city_id))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        CitySelector::new(Arc::clone(&self.app.store)).remember(self.city_id);

        let api = &self.app.api;
        let params = BusinessSearchParams {
            city_id: Some(self.city_id),
            ..BusinessSearchParams::default()
        };
        let businesses = self
            .app
            .cache
            .fetch(query_keys::city_businesses(self.city_id), || async move {
                api.get_businesses(&params).await
            });

        let (catalog, businesses) = tokio::try_join!(Pickers::load(&self.app), businesses)?;

        tracing::debug!(businesses = businesses.len(), "Loaded city page");
        self.catalog = catalog;
        self.businesses = businesses;
        Ok(())
    }

    /// The city being shown, once loaded. `None` for an unknown id.
    #[must_use]
    pub fn city(&self) -> Option<&City> {
        CitySelector::current_city(Some(self.city_id), &self.catalog.cities)
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.catalog.cities
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.catalog.categories
    }

    /// Subcategory pills for the selected category.
    #[must_use]
    pub fn visible_subcategories(&self) -> Vec<&Subcategory> {
        self.filter.visible_subcategories(&self.catalog.subcategories)
    }

    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.filter.select_category(category);
    }

    pub fn select_subcategory(&mut self, subcategory: Option<SubcategoryId>) {
        self.filter.select_subcategory(subcategory);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.set_search(search);
    }

    /// Businesses passing the current filter.
    #[must_use]
    pub fn businesses(&self) -> Vec<&Business> {
        self.filter.apply(&self.businesses)
    }

    /// Message for an empty list, `None` while there is something to show.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.businesses()
            .is_empty()
            .then(|| self.filter.empty_message())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    #[test]
    fn test_empty_state_depends_on_filters() {
        let config = ClientConfig::for_origin("http://127.0.0.1:9").unwrap();
        let app = App::new(config, Arc::new(MemoryStore::new())).unwrap();

        let mut page = CityPage::new(&app, CityId::new(1), None);
        assert_eq!(
            page.empty_message(),
            Some("No businesses are available in this city yet")
        );

        page.set_search("yoga");
        assert_eq!(
            page.empty_message(),
            Some("Try adjusting your search or filters")
        );
        assert!(page.city().is_none());
    }
}
