//! Tri-state field values.

use serde::{Serialize, Serializer};

/// A field that may be absent, explicitly `null`, or set.
///
/// `Option<T>` cannot tell "the client did not send this key" apart from
/// "the client sent `null`". For a parent reference those mean different
/// things on update: keep the current parent versus detach from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    /// The key was not present.
    Absent,
    /// The key was present with a `null` value.
    Null,
    /// The key was present with a value.
    Value(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Nullable<T> {
    /// Returns `true` if the key was not present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Serializes `Absent` and `Null` as `null`.
///
/// Pair with `#[serde(skip_serializing_if = "Nullable::is_absent")]` to drop
/// absent keys from the output.
impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}
