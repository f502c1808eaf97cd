//! Identifier types for tally.
//!
//! All primary keys are integers assigned by the database (`BIGSERIAL` /
//! `SERIAL`). The `int_id_type!` macro wraps them in newtypes so a user id
//! can never be passed where a record id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to define an integer-backed identifier type with standard trait
/// implementations: `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`,
/// transparent `Serialize`/`Deserialize`, `FromStr`, `Display`, and
/// conversions to and from the raw integer.
macro_rules! int_id_type {
    ($name:ident, $raw:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($raw);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(raw: $raw) -> Self {
                Self(raw)
            }

            /// Return the raw database key.
            #[must_use]
            pub const fn get(self) -> $raw {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<$raw>().map(Self).map_err(|_| IdError::InvalidInteger)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$raw> for $name {
            fn from(raw: $raw) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $raw {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

int_id_type!(UserId, i64, "A user identifier (`users.id`, BIGSERIAL).");
int_id_type!(
    OperationId,
    i32,
    "An operation catalog identifier (`operations.id`, SERIAL)."
);
int_id_type!(RecordId, i64, "A charge record identifier (`records.id`, BIGSERIAL).");

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid integer key.
    #[error("invalid integer identifier")]
    InvalidInteger,
}
