//! Header city picker.
//!
//! Remembers the last city a visitor looked at so the home page can send a
//! returning visitor straight back to it.

use std::sync::Arc;

use buzzgram_core::CityId;
use buzzgram_core::guard::HOME_PATH;
use buzzgram_core::models::City;

use crate::storage::{LocalStore, keys};

/// Label shown when no city is selected.
pub const NO_CITY_LABEL: &str = "Select City";

pub struct CitySelector {
    store: Arc<dyn LocalStore>,
}

impl CitySelector {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Persist `city_id` as the last selected city. Failures are logged only.
    pub fn remember(&self, city_id: CityId) {
        if let Err(e) = self
            .store
            .set(keys::LAST_SELECTED_CITY, &city_id.to_string())
        {
            tracing::warn!(error = %e, city_id = %city_id, "Failed to remember city");
        }
    }

    /// Last remembered city. Unreadable or malformed entries read as none.
    #[must_use]
    pub fn last_city(&self) -> Option<CityId> {
        match self.store.get(keys::LAST_SELECTED_CITY) {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read last selected city");
                None
            }
        }
    }

    /// Where a visit to `path` should go instead, if anywhere.
    ///
    /// Only the home page redirects, and only when a city is remembered.
    #[must_use]
    pub fn home_redirect(&self, path: &str) -> Option<String> {
        if path != HOME_PATH {
            return None;
        }
        self.last_city().map(|id| format!("/city/{id}"))
    }

    /// Pick a city: remember it and return the path to navigate to.
    #[must_use]
    pub fn select(&self, city_id: CityId) -> String {
        self.remember(city_id);
        format!("/city/{city_id}")
    }

    /// The city named by the current route, if it exists in `cities`.
    #[must_use]
    pub fn current_city<'a>(route_city: Option<CityId>, cities: &'a [City]) -> Option<&'a City> {
        route_city.and_then(|id| cities.iter().find(|c| c.id == id))
    }

    /// Button label for the current route.
    #[must_use]
    pub fn label(route_city: Option<CityId>, cities: &[City]) -> &str {
        Self::current_city(route_city, cities).map_or(NO_CITY_LABEL, |c| c.name.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn city(id: i32, name: &str) -> City {
        City {
            id: CityId::new(id),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            description: None,
        }
    }

    #[test]
    fn test_home_redirects_to_remembered_city() {
        let selector = CitySelector::new(Arc::new(MemoryStore::new()));
        assert_eq!(selector.home_redirect("/"), None);

        assert_eq!(selector.select(CityId::new(4)), "/city/4");
        assert_eq!(selector.last_city(), Some(CityId::new(4)));
        assert_eq!(selector.home_redirect("/"), Some("/city/4".to_owned()));
        assert_eq!(selector.home_redirect("/quote"), None);
    }

    #[test]
    fn test_malformed_entry_is_ignored() {
        let store = MemoryStore::with_entries([(keys::LAST_SELECTED_CITY, "austin")]);
        let selector = CitySelector::new(Arc::new(store));
        assert_eq!(selector.last_city(), None);
        assert_eq!(selector.home_redirect("/"), None);
    }

    #[test]
    fn test_label_follows_route_city() {
        let cities = vec![city(1, "Austin"), city(2, "Denver")];
        assert_eq!(CitySelector::label(Some(CityId::new(2)), &cities), "Denver");
        assert_eq!(CitySelector::label(Some(CityId::new(9)), &cities), NO_CITY_LABEL);
        assert_eq!(CitySelector::label(None, &cities), NO_CITY_LABEL);
    }
}
