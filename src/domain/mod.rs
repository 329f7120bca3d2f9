//! Domain types for the movie catalog with strong typing.
//!
//! Newtypes keep movie identifiers apart from the reference-entity ids, and
//! the closed enums/validated strings here are the only way values cross the
//! validation boundary into storage.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Movie in the catalog.
///
/// # Examples
///
/// ```rust
/// use movie_catalog::domain::MovieId;
///
/// let id = MovieId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Production status of a movie.
///
/// Stored as its literal label, so the database column holds exactly the
/// strings clients send and receive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MovieStatus {
    #[sea_orm(string_value = "Released")]
    #[serde(rename = "Released")]
    Released,
    #[sea_orm(string_value = "Post Production")]
    #[serde(rename = "Post Production")]
    PostProduction,
    #[sea_orm(string_value = "In Production")]
    #[serde(rename = "In Production")]
    InProduction,
}

impl MovieStatus {
    pub const ALL: [Self; 3] = [Self::Released, Self::PostProduction, Self::InProduction];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Released => "Released",
            Self::PostProduction => "Post Production",
            Self::InProduction => "In Production",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown movie status '{0}'")]
pub struct UnknownStatus(pub String);

/// Upper-cased ISO 3166 country code (alpha-2 or alpha-3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 3;

    /// Parses a raw code, normalizing it to upper case.
    ///
    /// Returns `None` unless the input is 2 or 3 ASCII letters.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = (Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len())
            && raw.chars().all(|c| c.is_ascii_alphabetic());

        valid.then(|| Self(raw.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
