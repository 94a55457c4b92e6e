//! The capability view of a session that the route guard consumes.
//!
//! Both session domains (consumer/admin and business owner) expose the same
//! small read-only surface. The guard receives each one as an explicit
//! argument, so which session a route depends on is visible at the call site.

use crate::models::{BusinessOwner, User};

/// Role-derived permissions, used only to show or hide UI and gate routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleFlags {
    pub admin: bool,
    pub business_owner: bool,
}

/// Read-only state of one authentication domain.
pub trait Identity {
    /// Hydration or a login is still resolving.
    fn is_loading(&self) -> bool;

    /// A profile is present.
    fn is_authenticated(&self) -> bool;

    /// Permissions carried by the profile. Unauthenticated identities have none.
    fn role_flags(&self) -> RoleFlags;
}

/// Snapshot of the consumer/admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerState {
    pub user: Option<User>,
    pub loading: bool,
}

impl ConsumerState {
    /// State before hydration has run.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    /// Resolved state with no user.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    #[must_use]
    pub fn is_business_owner(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_business_owner())
    }
}

impl Identity for ConsumerState {
    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_authenticated(&self) -> bool {
        Self::is_authenticated(self)
    }

    fn role_flags(&self) -> RoleFlags {
        RoleFlags {
            admin: self.is_admin(),
            business_owner: self.is_business_owner(),
        }
    }
}

/// Snapshot of the business-owner session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerState {
    pub owner: Option<BusinessOwner>,
    pub loading: bool,
}

impl OwnerState {
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            owner: None,
            loading: true,
        }
    }

    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            owner: None,
            loading: false,
        }
    }
}

impl Identity for OwnerState {
    fn is_loading(&self) -> bool {
        self.loading
    }

    fn is_authenticated(&self) -> bool {
        self.owner.is_some()
    }

    // No implicit admin escalation in this domain.
    fn role_flags(&self) -> RoleFlags {
        RoleFlags {
            admin: false,
            business_owner: self.owner.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, UserId};

    fn state_with(role: Role) -> ConsumerState {
        ConsumerState {
            user: Some(User {
                id: UserId::new(1),
                email: "a@b.co".to_owned(),
                name: "A".to_owned(),
                role,
                created_at: None,
                updated_at: None,
            }),
            loading: false,
        }
    }

    #[test]
    fn test_consumer_flags_follow_role() {
        for (role, admin, owner) in [
            (Role::User, false, false),
            (Role::BusinessOwner, false, true),
            (Role::Admin, true, true),
        ] {
            let state = state_with(role);
            assert!(state.is_authenticated());
            assert_eq!(state.is_admin(), admin);
            assert_eq!(state.is_business_owner(), owner);
            assert_eq!(
                state.role_flags(),
                RoleFlags {
                    admin,
                    business_owner: owner
                }
            );
        }
    }

    #[test]
    fn test_signed_out_has_no_flags() {
        let state = ConsumerState::signed_out();
        assert!(!state.is_authenticated());
        assert_eq!(state.role_flags(), RoleFlags::default());
        assert!(ConsumerState::loading().is_loading());
    }

    #[test]
    fn test_owner_state_never_admin() {
        assert_eq!(OwnerState::signed_out().role_flags(), RoleFlags::default());
        assert!(OwnerState::loading().is_loading());
    }
}
