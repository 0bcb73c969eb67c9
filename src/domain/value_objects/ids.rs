//! # Identifiers
//!
//! String-based identifiers for solicitations, requirements and catalog
//! products.
//!
//! All identifiers are ordered lexically so they can serve as the final
//! deterministic tie-break in rankings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a solicitation (RFP).
    SolicitationId
);

string_id!(
    /// Identifier of one requirement line item within a solicitation.
    RequirementId
);

string_id!(
    /// Stock keeping unit; the unique key of a catalog product.
    Sku
);

string_id!(
    /// Identifier of an acceptance criterion.
    CriterionId
);
