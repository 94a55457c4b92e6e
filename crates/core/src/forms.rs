//! Form state and validation.
//!
//! Validation runs before any request is made. Each check fails with the
//! message shown next to the form, in the order the checks are listed; the
//! first failure wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{Business, BusinessDraft, NewGeneralQuote};
use crate::types::{CategoryId, CityId, EmailError, SubcategoryId, UserType};

/// Minimum password length for registration and password changes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum business description length, counted in characters.
pub const MIN_DESCRIPTION_LENGTH: usize = 50;

static INSTAGRAM_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[A-Za-z0-9_.]+$").expect("Invalid regex"));

/// A form rejected before submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    // Business forms
    #[error("Business name is required")]
    BusinessNameRequired,
    #[error("Please select a city")]
    CityRequired,
    #[error("Please select a category")]
    CategoryRequired,
    #[error("Invalid Instagram handle format")]
    InvalidInstagramHandle,
    #[error("Business description is required")]
    DescriptionRequired,
    #[error("Description must be at least 50 characters")]
    DescriptionTooShort,

    // Claim search
    #[error("Please enter a business name")]
    SearchNameRequired,

    // Settings
    #[error("New password must be at least 8 characters")]
    NewPasswordTooShort,
    #[error("New passwords do not match")]
    NewPasswordMismatch,
    #[error("Password is required")]
    PasswordRequired,

    // Quotes
    #[error("Please select both category and subcategory")]
    QuoteCategoryRequired,

    // Registration
    #[error("Please select whether you are a customer or business owner")]
    UserTypeRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Business name is required for business owners")]
    OwnerBusinessNameRequired,
    #[error("Phone number is required for business owners")]
    OwnerPhoneRequired,

    // Moderation
    #[error("Please provide feedback for rejection")]
    RejectionNotesRequired,

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Whether `handle` is an acceptable Instagram handle (`@` optional).
#[must_use]
pub fn is_valid_instagram_handle(handle: &str) -> bool {
    INSTAGRAM_HANDLE_RE.is_match(handle)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}

// =============================================================================
// Business create / edit
// =============================================================================

/// Steps of the business creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum WizardStep {
    /// Name, city, category, subcategory.
    #[default]
    Basics,
    /// Instagram, description, contact details.
    Details,
    /// Read-only summary before submission.
    Review,
}

impl WizardStep {
    /// 1-based step number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Basics => 1,
            Self::Details => 2,
            Self::Review => 3,
        }
    }

    /// The following step; `Review` stays on `Review`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Basics => Self::Details,
            Self::Details | Self::Review => Self::Review,
        }
    }

    /// The preceding step; `Basics` stays on `Basics`.
    #[must_use]
    pub const fn back(self) -> Self {
        match self {
            Self::Basics | Self::Details => Self::Basics,
            Self::Review => Self::Details,
        }
    }
}

/// Fields shared by the create wizard and the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessForm {
    pub name: String,
    pub city_id: Option<CityId>,
    category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub instagram_handle: String,
    pub description: String,
    pub email: String,
    pub phone: String,
}

impl BusinessForm {
    /// Prefill from an existing listing.
    #[must_use]
    pub fn from_business(business: &Business) -> Self {
        Self {
            name: business.name.clone(),
            city_id: Some(business.city_id),
            category_id: Some(business.category_id),
            subcategory_id: business.subcategory_id,
            instagram_handle: business.instagram_handle.clone().unwrap_or_default(),
            description: business.description.clone().unwrap_or_default(),
            email: business.email.clone().unwrap_or_default(),
            phone: business.phone.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    /// Select a category. The subcategory always resets.
    pub fn select_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id;
        self.subcategory_id = None;
    }

    /// Step 1 checks.
    ///
    /// # Errors
    ///
    /// Returns the first missing field among name, city and category.
    pub fn validate_basics(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BusinessNameRequired);
        }
        if self.city_id.is_none() {
            return Err(ValidationError::CityRequired);
        }
        if self.category_id.is_none() {
            return Err(ValidationError::CategoryRequired);
        }
        Ok(())
    }

    /// Step 2 checks.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed Instagram handle or a missing or
    /// short description.
    pub fn validate_details(&self) -> Result<(), ValidationError> {
        if !self.instagram_handle.is_empty() && !is_valid_instagram_handle(&self.instagram_handle)
        {
            return Err(ValidationError::InvalidInstagramHandle);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        if self.description.chars().count() < MIN_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooShort);
        }
        Ok(())
    }

    /// Run every check and build the request payload.
    ///
    /// # Errors
    ///
    /// Returns the first failing check of [`Self::validate_basics`] or
    /// [`Self::validate_details`].
    pub fn to_draft(&self) -> Result<BusinessDraft, ValidationError> {
        self.validate_basics()?;
        self.validate_details()?;
        let (Some(city_id), Some(category_id)) = (self.city_id, self.category_id) else {
            return Err(ValidationError::CityRequired);
        };
        Ok(BusinessDraft {
            name: self.name.clone(),
            city_id,
            category_id,
            subcategory_id: self.subcategory_id,
            instagram_handle: non_empty(&self.instagram_handle),
            description: self.description.clone(),
            email: non_empty(&self.email),
            phone: non_empty(&self.phone),
        })
    }
}

// =============================================================================
// Claims, settings, moderation
// =============================================================================

/// Trimmed business name for the claim search.
///
/// # Errors
///
/// Returns [`ValidationError::SearchNameRequired`] for blank input.
pub fn validate_search_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ValidationError::SearchNameRequired)
    } else {
        Ok(name)
    }
}

/// Change-password form. The current password is checked by the server.
#[derive(Clone, Default)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange")
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("confirm_new_password", &"[REDACTED]")
            .finish()
    }
}

impl PasswordChange {
    /// # Errors
    ///
    /// Returns an error if the new password is too short or the confirmation
    /// differs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::NewPasswordTooShort);
        }
        if self.new_password != self.confirm_new_password {
            return Err(ValidationError::NewPasswordMismatch);
        }
        Ok(())
    }
}

/// Account deletion needs the password re-entered.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordRequired`] for an empty password.
pub const fn validate_delete_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        Err(ValidationError::PasswordRequired)
    } else {
        Ok(())
    }
}

/// Rejections must explain themselves; approvals may not.
///
/// # Errors
///
/// Returns [`ValidationError::RejectionNotesRequired`] for blank notes.
pub fn validate_rejection_notes(notes: &str) -> Result<&str, ValidationError> {
    let notes = notes.trim();
    if notes.is_empty() {
        Err(ValidationError::RejectionNotesRequired)
    } else {
        Ok(notes)
    }
}

// =============================================================================
// General quote
// =============================================================================

/// Multi-provider quote form on the quote landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralQuoteForm {
    pub city_id: Option<CityId>,
    category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub budget: String,
}

impl GeneralQuoteForm {
    /// Form prefilled with the signed-in user's contact details.
    #[must_use]
    pub fn for_contact(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn select_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id;
        self.subcategory_id = None;
    }

    /// Description with the budget appended when one is given.
    #[must_use]
    pub fn message(&self) -> String {
        compose_quote_message(&self.description, &self.budget)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::QuoteCategoryRequired`] unless both a
    /// category and a subcategory are selected.
    pub fn to_request(&self) -> Result<NewGeneralQuote, ValidationError> {
        let (Some(category_id), Some(subcategory_id)) = (self.category_id, self.subcategory_id)
        else {
            return Err(ValidationError::QuoteCategoryRequired);
        };
        Ok(NewGeneralQuote {
            category_id,
            subcategory_id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: non_empty(&self.phone),
            message: self.message(),
        })
    }

    /// Clear the request fields after a successful submission. Contact
    /// details are kept for signed-in users.
    pub fn reset(&mut self, keep_contact: bool) {
        self.category_id = None;
        self.subcategory_id = None;
        self.description.clear();
        self.budget.clear();
        if !keep_contact {
            self.name.clear();
            self.email.clear();
            self.phone.clear();
        }
    }
}

/// `description`, followed by `"\n\nBudget: <budget>"` when `budget` is set.
#[must_use]
pub fn compose_quote_message(description: &str, budget: &str) -> String {
    if budget.is_empty() {
        description.to_owned()
    } else {
        format!("{description}\n\nBudget: {budget}")
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Payload for the registration page's `POST /auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("user_type", &self.user_type)
            .field("business_name", &self.business_name)
            .finish_non_exhaustive()
    }
}

/// Registration page form.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub user_type: Option<UserType>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub business_name: String,
    pub instagram_handle: String,
    pub phone: String,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("user_type", &self.user_type)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Validate and build the request. Owner-only fields are dropped for
    /// customers.
    ///
    /// # Errors
    ///
    /// Checks run in order: user type, confirmation, length, then the
    /// business name and phone for business owners.
    pub fn to_request(&self) -> Result<RegistrationRequest, ValidationError> {
        let user_type = self.user_type.ok_or(ValidationError::UserTypeRequired)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }

        let mut request = RegistrationRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            name: self.name.clone(),
            user_type,
            business_name: None,
            instagram_handle: None,
            phone: None,
        };

        if user_type == UserType::BusinessOwner {
            if self.business_name.is_empty() {
                return Err(ValidationError::OwnerBusinessNameRequired);
            }
            if self.phone.is_empty() {
                return Err(ValidationError::OwnerPhoneRequired);
            }
            request.business_name = Some(self.business_name.clone());
            request.instagram_handle = non_empty(&self.instagram_handle);
            request.phone = Some(self.phone.clone());
        }

        Ok(request)
    }
}
