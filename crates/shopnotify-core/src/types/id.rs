//! Newtype wrappers around `i64` for all domain entity identifiers.
//!
//! Using distinct types prevents accidentally passing a `UserId` where a
//! `ProductId` is expected. When the `sqlx` feature is enabled each ID
//! type is encoded transparently as `BIGINT`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user.
    UserId
);

define_id!(
    /// Unique identifier for a notification.
    NotificationId
);

define_id!(
    /// Unique identifier for a product.
    ProductId
);

define_id!(
    /// Unique identifier for an order.
    OrderId
);

define_id!(
    /// Unique identifier for a cart line.
    CartItemId
);

define_id!(
    /// Unique identifier for a group purchase.
    GroupId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId(7).to_string(), "7");
    }

    #[test]
    fn test_user_id_from_str() {
        let id: UserId = " 42 ".parse().expect("should parse");
        assert_eq!(id, UserId(42));
        assert!("abc".parse::<UserId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&GroupId(9)).expect("serialize");
        assert_eq!(json, "9");
        let parsed: GroupId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, GroupId(9));
    }
}
