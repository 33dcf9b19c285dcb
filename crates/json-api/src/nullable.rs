//! Patch fields that distinguish "absent" from an explicit `null`.
//!
//! Use with `#[serde(default, deserialize_with = "crate::nullable::deserialize")]`:
//! a missing field stays `None`, `null` becomes `Some(None)`.

use serde::{Deserialize, Deserializer};

pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
