//! Role and status enums shared by sessions, pages and the route guard.

use serde::{Deserialize, Serialize};

/// Consumer-domain account role.
///
/// The role is opaque server data: the client only reads it to show or hide
/// UI and to evaluate route requirements, never to grant itself anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Consumer account that manages listings.
    BusinessOwner,
    /// Regular consumer.
    #[default]
    User,
}

impl Role {
    /// Whether this role passes admin gates.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this role passes business-owner gates.
    ///
    /// Admins implicitly satisfy business-owner gates.
    #[must_use]
    pub const fn is_business_owner(self) -> bool {
        matches!(self, Self::BusinessOwner | Self::Admin)
    }

    /// Landing path after a federated sign-in for this role.
    #[must_use]
    pub const fn landing_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::BusinessOwner => "/business-dashboard",
            Self::User => "/",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::BusinessOwner => write!(f, "business_owner"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "business_owner" => Ok(Self::BusinessOwner),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Account type chosen at signup or passed to federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Customer,
    BusinessOwner,
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "business_owner" => Ok(Self::BusinessOwner),
            _ => Err(format!("invalid user type: {s}")),
        }
    }
}

/// Listing lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    /// Newly created by an owner, waiting for admin review.
    #[default]
    Pending,
    /// Existing listing claimed by an owner, waiting for admin review.
    ClaimedPending,
    /// Visible in the directory.
    Active,
    /// Turned down by an admin.
    Rejected,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl BusinessStatus {
    /// Whether an admin still has to review this listing.
    #[must_use]
    pub const fn is_awaiting_review(self) -> bool {
        matches!(self, Self::Pending | Self::ClaimedPending)
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::ClaimedPending => "claimed_pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for BusinessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "claimed_pending" => Ok(Self::ClaimedPending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid business status: {s}")),
        }
    }
}

/// Review state of an admin approval item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Wire value used in the `status` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid approval status: {s}")),
        }
    }
}

/// What an approval item asks the admin to sign off on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Claim,
    Create,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_flags() {
        for (role, admin, owner) in [
            (Role::User, false, false),
            (Role::BusinessOwner, false, true),
            (Role::Admin, true, true),
        ] {
            assert_eq!(role.is_admin(), admin, "{role}");
            assert_eq!(role.is_business_owner(), owner, "{role}");
        }
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::BusinessOwner).unwrap(), "\"business_owner\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_business_status_is_tolerated() {
        let status: BusinessStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(status, BusinessStatus::Unknown);
        let status: BusinessStatus = serde_json::from_str("\"claimed_pending\"").unwrap();
        assert!(status.is_awaiting_review());
        assert!(!BusinessStatus::Active.is_awaiting_review());
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Admin.landing_path(), "/admin");
        assert_eq!(Role::BusinessOwner.landing_path(), "/business-dashboard");
        assert_eq!(Role::User.landing_path(), "/");
    }
}
