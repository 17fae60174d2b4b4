//! String-backed identifier types.
//!
//! Each ID type wraps its own `String` to prevent cross-type confusion.
//! A `DataItemUid` cannot be accidentally used where an `OrgUnitUid` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_uid {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(uid: impl Into<String>) -> Self {
                Self(uid.into())
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(uid: &str) -> Self {
                Self(uid.to_string())
            }
        }

        impl From<String> for $name {
            fn from(uid: String) -> Self {
                Self(uid)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_uid!(
    /// Data item (data element) identifier.
    DataItemUid
);

define_uid!(
    /// Organisation unit identifier.
    OrgUnitUid
);

define_uid!(
    /// Category option combo identifier.
    CategoryComboUid
);
