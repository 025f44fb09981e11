//! Entity identifier value object.
//!
//! Wraps a UUID so the raw representation never leaks into the domain. The
//! nil UUID is the "empty" identifier: constructible, but never valid for a
//! persisted entity.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;

/// Identifier parsing and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("ID cannot be empty")]
    Empty,

    #[error("invalid UUID format: {0}")]
    InvalidFormat(String),
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        let message = err.to_string();
        AppError::invalid_input_with(err, message)
    }
}

/// Globally unique entity identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(Uuid);

impl Id {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The empty (nil) identifier.
    pub const fn empty() -> Self {
        Self(Uuid::nil())
    }

    /// Wrap an existing UUID, e.g. one read back from storage.
    pub const fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parse the canonical hyphenated form.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    /// Bitwise equality of the underlying values.
    pub fn equals(&self, other: &Id) -> bool {
        self.0 == other.0
    }

    /// Reject the empty identifier.
    pub fn validate(&self) -> Result<(), IdError> {
        if self.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Id> for Uuid {
    fn from(id: Id) -> Self {
        id.0
    }
}

// Empty identifiers encode as `null`.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.collect_str(self)
        }
    }
}

// A bare `Id` never decodes from `null`; use `Option<Id>` for optional fields.
impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(s) => Id::parse(&s).map_err(de::Error::custom),
            None => Err(de::Error::custom(IdError::Empty)),
        }
    }
}
