//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Route parameters such
//! as `/city/:cityId` parse straight into these types through `FromStr`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a route or CLI parameter is not a valid ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} id: {value:?}")]
pub struct ParseIdError {
    /// Name of the ID type being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>`, `Into<i32>`, `Display` and `FromStr`
///
/// # Example
///
/// ```rust
/// # use buzzgram_core::define_id;
/// define_id!(CityId);
/// define_id!(CategoryId);
///
/// let city: CityId = "7".parse().unwrap();
/// assert_eq!(city.as_i32(), 7);
///
/// // These are different types, so this won't compile:
/// // let _: CategoryId = city;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::ParseIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| $crate::types::id::ParseIdError {
                        kind: stringify!($name),
                        value: s.to_owned(),
                    })
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Consumer/catalog entity IDs (integer keys on the backend)
define_id!(UserId);
define_id!(CityId);
define_id!(CategoryId);
define_id!(SubcategoryId);
define_id!(BusinessId);
define_id!(FavoriteId);
define_id!(QuoteRequestId);
define_id!(GeneralQuoteId);

/// Business owner identity.
///
/// The business-owner domain uses UUID keys, unlike consumer accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

/// Admin approval (claim or creation request) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalId(Uuid);

macro_rules! impl_uuid_id {
    ($name:ident) => {
        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                    value: s.to_owned(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

impl_uuid_id!(OwnerId);
impl_uuid_id!(ApprovalId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_param() {
        let id: CityId = "12".parse().unwrap();
        assert_eq!(id, CityId::new(12));
        assert_eq!(id.to_string(), "12");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "abc".parse::<BusinessId>().unwrap_err();
        assert_eq!(err.kind, "BusinessId");
        assert_eq!(err.to_string(), "invalid BusinessId id: \"abc\"");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&CategoryId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: CategoryId = serde_json::from_str("5").unwrap();
        assert_eq!(back.as_i32(), 5);
    }

    #[test]
    fn test_owner_id_roundtrip_from_str() {
        let raw = "6f9619ff-8b86-d011-b42d-00cf4fc964ff";
        let id: OwnerId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert!("not-a-uuid".parse::<ApprovalId>().is_err());
    }
}
