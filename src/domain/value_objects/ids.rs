//! # Identifiers
//!
//! UUID-based identifiers for catalog items, quotes and reservations.
//!
//! All identifiers are assigned by the remote service; the client only
//! parses, compares and forwards them.
//!
//! # Examples
//!
//! ```
//! use dealer_reservation::domain::value_objects::QuoteId;
//!
//! let id: QuoteId = "0b6f1d9c-5a54-4c1b-9d7e-2f3a4b5c6d7e".parse().unwrap();
//! assert_eq!(id.to_string(), "0b6f1d9c-5a54-4c1b-9d7e-2f3a4b5c6d7e");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Creates a new random (v4) identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            #[inline]
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the first eight hex digits, as shown to users.
            #[must_use]
            pub fn short(&self) -> String {
                self.0.simple().to_string().chars().take(8).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id! {
    /// Identifier of a vehicle in the catalog.
    VehicleId
}

uuid_id! {
    /// Identifier of an accessory in the catalog.
    AccessoryId
}

uuid_id! {
    /// Identifier of a quote issued by the remote service.
    QuoteId
}

uuid_id! {
    /// Identifier of a reservation created by the remote service.
    ReservationId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_v4_is_unique() {
        assert_ne!(VehicleId::new_v4(), VehicleId::new_v4());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<AccessoryId>().is_err());
    }

    #[test]
    fn short_is_eight_hex_digits() {
        let id: ReservationId = "0b6f1d9c-5a54-4c1b-9d7e-2f3a4b5c6d7e".parse().unwrap();
        assert_eq!(id.short(), "0b6f1d9c");
    }

    #[test]
    fn serde_is_transparent() {
        let id = QuoteId::new_v4();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: QuoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
