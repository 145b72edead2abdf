//! Type-safe identifiers for showtimes, bookings, and users.
//!
//! Each id is a newtype over [`uuid::Uuid`] so a showtime id can never be
//! passed where a booking id is expected. [`BookingId`] is the only one
//! the core mints itself (at commit time); showtime and user ids are
//! supplied by the external catalog and auth collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single screening of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowtimeId(uuid::Uuid);

/// Identifier of one booking record in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(uuid::Uuid);

/// Identifier of an authenticated user, issued by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(uuid::Uuid);

macro_rules! uuid_id_impls {
    ($name:ident) => {
        impl $name {
            /// Creates a new random id (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id_impls!(ShowtimeId);
uuid_id_impls!(BookingId);
uuid_id_impls!(UserId);
