//! Route guard: decides whether a navigation target may render.
//!
//! The guard is a pure function of the route's requirement and the two
//! session snapshots. It never mutates session state; the only side effect a
//! caller derives from it is navigation.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Consumer login page.
pub const CONSUMER_LOGIN_PATH: &str = "/login";
/// Business-owner login page.
pub const OWNER_LOGIN_PATH: &str = "/business-owner/login";
/// Home page.
pub const HOME_PATH: &str = "/";

/// What a route needs before it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Requirement {
    #[default]
    None,
    Authenticated,
    Admin,
    BusinessOwner,
}

/// Which session a `BusinessOwner` requirement is checked against.
///
/// Two behaviours have shipped: one reads the consumer session's derived
/// `is_business_owner` flag (so a consumer-authenticated admin passes), the
/// other requires a login in the separate business-owner domain. The policy
/// is configuration, applied uniformly to every owner route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessOwnerPolicy {
    /// Check the business-owner session only.
    #[default]
    OwnerSession,
    /// Check the consumer session's `role ∈ {business_owner, admin}`.
    ConsumerRole,
}

impl std::str::FromStr for BusinessOwnerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner_session" => Ok(Self::OwnerSession),
            "consumer_role" => Ok(Self::ConsumerRole),
            _ => Err(format!("invalid business owner policy: {s}")),
        }
    }
}

/// Guard result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the route's children.
    Render,
    /// The relevant session is still resolving; show a spinner and decide later.
    Spinner,
    /// Navigate elsewhere, replacing the history entry.
    Redirect(&'static str),
}

impl GuardOutcome {
    /// Redirect target, if any.
    #[must_use]
    pub const fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Redirect(path) => Some(path),
            Self::Render | Self::Spinner => None,
        }
    }
}

/// Decide the outcome for one navigation.
///
/// `consumer` and `owner` are the two session domains; only the one the
/// requirement (and policy) names is consulted.
#[must_use]
pub fn decide(
    requirement: Requirement,
    policy: BusinessOwnerPolicy,
    consumer: &impl Identity,
    owner: &impl Identity,
) -> GuardOutcome {
    match requirement {
        Requirement::None => GuardOutcome::Render,
        Requirement::Authenticated => require_login(consumer, CONSUMER_LOGIN_PATH)
            .unwrap_or(GuardOutcome::Render),
        Requirement::Admin => require_login(consumer, CONSUMER_LOGIN_PATH).unwrap_or_else(|| {
            if consumer.role_flags().admin {
                GuardOutcome::Render
            } else {
                GuardOutcome::Redirect(HOME_PATH)
            }
        }),
        Requirement::BusinessOwner => match policy {
            BusinessOwnerPolicy::OwnerSession => {
                require_login(owner, OWNER_LOGIN_PATH).unwrap_or(GuardOutcome::Render)
            }
            BusinessOwnerPolicy::ConsumerRole => require_login(consumer, CONSUMER_LOGIN_PATH)
                .unwrap_or_else(|| {
                    if consumer.role_flags().business_owner {
                        GuardOutcome::Render
                    } else {
                        GuardOutcome::Redirect(HOME_PATH)
                    }
                }),
        },
    }
}

/// Spinner while loading, redirect when signed out, `None` when signed in.
fn require_login(identity: &impl Identity, login_path: &'static str) -> Option<GuardOutcome> {
    if identity.is_loading() {
        Some(GuardOutcome::Spinner)
    } else if identity.is_authenticated() {
        None
    } else {
        Some(GuardOutcome::Redirect(login_path))
    }
}
