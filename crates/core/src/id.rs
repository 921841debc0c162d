// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prefixed newtype identifiers.

/// Define a newtype ID wrapper around `String` with a fixed display prefix.
///
/// Generates `new()` (which prefixes the given suffix if not already
/// prefixed), `generate()` (prefix + random UUIDv4), `as_str()`, `Display`,
/// `From<String>`, `From<&str>`, `PartialEq<str>`, and `Borrow<str>`.
#[macro_export]
macro_rules! define_prefixed_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident = $prefix:literal;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Prefix constant used by this id type.
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an existing string, adding the prefix if missing.
            pub fn new(id: impl Into<String>) -> Self {
                let id = id.into();
                if id.starts_with($prefix) {
                    Self(id)
                } else {
                    Self(format!("{}{}", $prefix, id))
                }
            }

            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(format!("{}{}", $prefix, uuid::Uuid::new_v4()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_prefixed_id! {
    /// Globally unique event identifier, e.g. `evt_3f9a...`.
    pub struct EventId = "evt_";
}

define_prefixed_id! {
    /// Trace identifier grouping every log record for one event's journey.
    pub struct TraceId = "trc_";
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
