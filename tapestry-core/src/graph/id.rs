//! Identifiers
//!
//! Node and user ids are integers, but the host page hands them over in
//! whatever shape it has at hand: plain numbers, numeric strings, or strings
//! with trailing garbage (`"12px"`). Parsing follows integer-prefix rules,
//! so all of these deserialize to the same id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;

/// Parse the leading decimal integer of `raw`, ignoring leading whitespace
/// and anything after the digits.
pub(crate) fn parse_int_prefix(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = unsigned
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, c)| &unsigned[..i + c.len_utf8()])?;
    digits.parse().ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(u64),
    Text(String),
}

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw id value.
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_int_prefix(s)
                    .map(Self)
                    .ok_or_else(|| StoreError::InvalidNodeId(s.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Int(id) => Ok(Self(id)),
                    RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

integer_id! {
    /// Identifier of a node in the learning map.
    NodeId
}

integer_id! {
    /// Identifier of a host-environment user.
    UserId
}
