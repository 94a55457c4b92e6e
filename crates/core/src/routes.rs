//! Application route table.
//!
//! Maps every navigable path to the requirement the guard enforces. Patterns
//! use `:name` segments for parameters (`/city/:cityId`).

use crate::guard::{self, BusinessOwnerPolicy, GuardOutcome, Requirement};
use crate::identity::Identity;

/// One entry in the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub pattern: &'static str,
    pub requirement: Requirement,
}

const fn route(pattern: &'static str, requirement: Requirement) -> Route {
    Route {
        pattern,
        requirement,
    }
}

/// Every route the client knows about.
pub const ROUTES: &[Route] = &[
    // Public
    route("/", Requirement::None),
    route("/city/:cityId", Requirement::None),
    route("/business/:id", Requirement::None),
    route("/quote", Requirement::None),
    route("/business-signup", Requirement::None),
    route("/login", Requirement::None),
    route("/register", Requirement::None),
    route("/verify-email", Requirement::None),
    route("/auth/google/callback", Requirement::None),
    route("/business-owner/login", Requirement::None),
    // Consumer
    route("/dashboard", Requirement::Authenticated),
    route("/settings", Requirement::Authenticated),
    route("/favorites", Requirement::Authenticated),
    route("/profile", Requirement::Authenticated),
    route("/claim-business", Requirement::Authenticated),
    // Admin
    route("/admin", Requirement::Admin),
    route("/admin/approvals", Requirement::Admin),
    // Business owner
    route("/business-dashboard", Requirement::BusinessOwner),
    route("/edit-business", Requirement::BusinessOwner),
    route("/business-owner/dashboard", Requirement::BusinessOwner),
    route("/business-owner/claim", Requirement::BusinessOwner),
    route("/business-owner/create", Requirement::BusinessOwner),
    route("/business-owner/edit/:businessId", Requirement::BusinessOwner),
];

/// A matched route plus its extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'p> {
    pub route: Route,
    pub params: Vec<(&'static str, &'p str)>,
}

impl RouteMatch<'_> {
    /// Look up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

/// Match a path (query string and trailing slash ignored) against [`ROUTES`].
#[must_use]
pub fn match_path(path: &str) -> Option<RouteMatch<'_>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES.iter().find_map(|route| {
        let pattern: Vec<&'static str> = route
            .pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (&expected, &actual) in pattern.iter().zip(&segments) {
            if let Some(name) = expected.strip_prefix(':') {
                params.push((name, actual));
            } else if expected != actual {
                return None;
            }
        }
        Some(RouteMatch {
            route: *route,
            params,
        })
    })
}

/// Requirement for a path; unknown paths are not gated.
#[must_use]
pub fn requirement_for(path: &str) -> Requirement {
    match_path(path).map_or(Requirement::None, |m| m.route.requirement)
}

/// Look up the path and run the guard on it.
#[must_use]
pub fn decide_path(
    path: &str,
    policy: BusinessOwnerPolicy,
    consumer: &impl Identity,
    owner: &impl Identity,
) -> GuardOutcome {
    guard::decide(requirement_for(path), policy, consumer, owner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identity::{ConsumerState, OwnerState};

    #[test]
    fn test_match_extracts_params() {
        let m = match_path("/city/12?search=cafe").unwrap();
        assert_eq!(m.route.pattern, "/city/:cityId");
        assert_eq!(m.param("cityId"), Some("12"));
        assert_eq!(m.param("id"), None);
    }

    #[test]
    fn test_match_root_and_trailing_slash() {
        assert_eq!(match_path("/").unwrap().route.pattern, "/");
        assert_eq!(match_path("/admin/").unwrap().route.pattern, "/admin");
    }

    #[test]
    fn test_requirements() {
        assert_eq!(requirement_for("/admin"), Requirement::Admin);
        assert_eq!(requirement_for("/favorites"), Requirement::Authenticated);
        assert_eq!(requirement_for("/business-owner/edit/4"), Requirement::BusinessOwner);
        assert_eq!(requirement_for("/business/4"), Requirement::None);
        assert_eq!(requirement_for("/no/such/page"), Requirement::None);
    }

    #[test]
    fn test_decide_path_uses_table() {
        let outcome = decide_path(
            "/business-owner/dashboard",
            BusinessOwnerPolicy::OwnerSession,
            &ConsumerState::signed_out(),
            &OwnerState::signed_out(),
        );
        assert_eq!(outcome, GuardOutcome::Redirect(guard::OWNER_LOGIN_PATH));
    }

    #[test]
    fn test_patterns_are_unique() {
        for (i, a) in ROUTES.iter().enumerate() {
            for b in ROUTES.iter().skip(i + 1) {
                assert_ne!(a.pattern, b.pattern);
            }
        }
    }
}
