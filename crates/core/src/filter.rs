//! Client-side derivations over already-fetched collections.
//!
//! The city page fetches every business in a city once and narrows it in
//! memory; the owner dashboard splits its businesses by review state.

use crate::models::{Business, Subcategory};
use crate::types::{BusinessStatus, CategoryId, SubcategoryId};

/// Filter state of the city page.
///
/// Fields are private so the "changing category clears subcategory" rule
/// cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    category: Option<CategoryId>,
    subcategory: Option<SubcategoryId>,
    search: String,
}

impl CityFilter {
    /// Filter with only a search term (the `?search=` query parameter).
    #[must_use]
    pub fn with_search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn category(&self) -> Option<CategoryId> {
        self.category
    }

    #[must_use]
    pub const fn subcategory(&self) -> Option<SubcategoryId> {
        self.subcategory
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Select (or clear) the category. Always clears the subcategory.
    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.category = category;
        self.subcategory = None;
    }

    pub fn select_subcategory(&mut self, subcategory: Option<SubcategoryId>) {
        self.subcategory = subcategory;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Whether any narrowing is applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.subcategory.is_some() || !self.search.is_empty()
    }

    /// Whether a single business passes the filter.
    #[must_use]
    pub fn matches(&self, business: &Business) -> bool {
        let matches_category = self.category.is_none_or(|c| business.category_id == c);
        let matches_subcategory = self
            .subcategory
            .is_none_or(|s| business.subcategory_id == Some(s));
        matches_category && matches_subcategory && self.matches_search(business)
    }

    fn matches_search(&self, business: &Business) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        business.name.to_lowercase().contains(&needle)
            || business
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    /// Businesses passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, businesses: &'a [Business]) -> Vec<&'a Business> {
        businesses.iter().filter(|b| self.matches(b)).collect()
    }

    /// Subcategory pills to offer: those of the selected category, none when
    /// no category is selected.
    #[must_use]
    pub fn visible_subcategories<'a>(&self, all: &'a [Subcategory]) -> Vec<&'a Subcategory> {
        self.category.map_or_else(Vec::new, |category| {
            all.iter().filter(|s| s.category_id == category).collect()
        })
    }

    /// Text for an empty result list.
    #[must_use]
    pub fn empty_message(&self) -> &'static str {
        if self.is_active() {
            "Try adjusting your search or filters"
        } else {
            "No businesses are available in this city yet"
        }
    }
}

/// An owner's businesses split by review state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessGroups<'a> {
    /// `pending` or `claimed_pending`.
    pub awaiting_review: Vec<&'a Business>,
    pub active: Vec<&'a Business>,
    pub rejected: Vec<&'a Business>,
}

/// Group businesses for the owner dashboard. Unknown statuses are left out.
#[must_use]
pub fn group_by_status(businesses: &[Business]) -> BusinessGroups<'_> {
    let mut groups = BusinessGroups::default();
    for business in businesses {
        match business.effective_status() {
            BusinessStatus::Pending | BusinessStatus::ClaimedPending => {
                groups.awaiting_review.push(business);
            }
            BusinessStatus::Active => groups.active.push(business),
            BusinessStatus::Rejected => groups.rejected.push(business),
            BusinessStatus::Unknown => {}
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BusinessId, CityId};

    fn business(
        id: i32,
        name: &str,
        description: Option<&str>,
        category: i32,
        subcategory: Option<i32>,
    ) -> Business {
        Business {
            id: BusinessId::new(id),
            name: name.to_owned(),
            description: description.map(str::to_owned),
            city_id: CityId::new(1),
            category_id: CategoryId::new(category),
            subcategory_id: subcategory.map(SubcategoryId::new),
            instagram_handle: None,
            instagram_url: None,
            website: None,
            phone: None,
            email: None,
            image_url: None,
            featured: false,
            business_owner_id: None,
            status: None,
            claimed_at: None,
            approved_at: None,
            approval_notes: None,
            created_at: None,
            city: None,
            category: None,
            subcategory: None,
        }
    }

    fn fixtures() -> Vec<Business> {
        vec![
            business(1, "Sunrise CAFE", None, 5, Some(50)),
            business(2, "Bakery", Some("Bread and a tiny cafe corner"), 5, None),
            business(3, "Cafe Nails", None, 6, None),
            business(4, "Deli", Some("sandwiches"), 5, Some(51)),
            business(5, "Bistro", None, 5, None),
        ]
    }

    #[test]
    fn test_category_and_case_insensitive_search() {
        let businesses = fixtures();
        let mut filter = CityFilter::with_search("cafe");
        filter.select_category(Some(CategoryId::new(5)));

        let ids: Vec<i32> = filter.apply(&businesses).iter().map(|b| b.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_no_filter_returns_everything() {
        let businesses = fixtures();
        let filter = CityFilter::default();
        assert_eq!(filter.apply(&businesses).len(), businesses.len());
        assert!(!filter.is_active());
        assert_eq!(filter.empty_message(), "No businesses are available in this city yet");
    }

    #[test]
    fn test_subcategory_narrows_within_category() {
        let businesses = fixtures();
        let mut filter = CityFilter::default();
        filter.select_category(Some(CategoryId::new(5)));
        filter.select_subcategory(Some(SubcategoryId::new(51)));
        let ids: Vec<i32> = filter.apply(&businesses).iter().map(|b| b.id.as_i32()).collect();
        assert_eq!(ids, vec![4]);
        assert_eq!(filter.empty_message(), "Try adjusting your search or filters");
    }

    #[test]
    fn test_changing_category_resets_subcategory() {
        let mut filter = CityFilter::default();
        filter.select_category(Some(CategoryId::new(1)));
        filter.select_subcategory(Some(SubcategoryId::new(10)));
        assert_eq!(filter.subcategory(), Some(SubcategoryId::new(10)));

        filter.select_category(Some(CategoryId::new(2)));
        assert_eq!(filter.subcategory(), None);
        assert_eq!(filter.category(), Some(CategoryId::new(2)));
    }

    #[test]
    fn test_visible_subcategories_follow_category() {
        let subs = vec![
            Subcategory {
                id: SubcategoryId::new(10),
                name: "Nails".to_owned(),
                slug: "nails".to_owned(),
                icon: None,
                category_id: CategoryId::new(1),
            },
            Subcategory {
                id: SubcategoryId::new(20),
                name: "Bakery".to_owned(),
                slug: "bakery".to_owned(),
                icon: None,
                category_id: CategoryId::new(2),
            },
        ];
        let mut filter = CityFilter::default();
        assert!(filter.visible_subcategories(&subs).is_empty());
        filter.select_category(Some(CategoryId::new(2)));
        let visible = filter.visible_subcategories(&subs);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Bakery");
    }

    #[test]
    fn test_group_by_status() {
        let mut businesses = fixtures();
        businesses[0].status = Some(BusinessStatus::Pending);
        businesses[1].status = Some(BusinessStatus::ClaimedPending);
        businesses[2].status = Some(BusinessStatus::Rejected);
        businesses[3].status = Some(BusinessStatus::Unknown);
        // businesses[4] has no status and counts as active

        let groups = group_by_status(&businesses);
        assert_eq!(groups.awaiting_review.len(), 2);
        assert_eq!(groups.rejected.len(), 1);
        assert_eq!(groups.active.len(), 1);
        assert_eq!(groups.active[0].name, "Bistro");
    }
}
