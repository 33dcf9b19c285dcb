//! Regions
//!
//! A region is the unit that point rates, redemption windows and regional
//! admin scope are keyed by. Values are normalised on the way in so that
//! `" North-East "` and `"north-east"` address the same configuration row.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::{
    Decode, Encode, Postgres, Type,
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
};
use thiserror::Error;

/// Longest accepted region code.
pub const MAX_REGION_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("region cannot be empty")]
    Empty,

    #[error("region cannot be longer than {MAX_REGION_LENGTH} characters")]
    TooLong,

    #[error("region contains invalid character {0:?}")]
    InvalidCharacter(char),
}

impl Region {
    /// Normalise and validate a region code.
    pub fn parse(value: &str) -> Result<Self, RegionError> {
        let normalised = value.trim().to_ascii_lowercase();

        if normalised.is_empty() {
            return Err(RegionError::Empty);
        }

        if normalised.chars().count() > MAX_REGION_LENGTH {
            return Err(RegionError::TooLong);
        }

        if let Some(invalid) = normalised
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
        {
            return Err(RegionError::InvalidCharacter(invalid));
        }

        Ok(Self(normalised))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Region {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.0
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for Region {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}

impl Encode<'_, Postgres> for Region {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <String as Encode<'_, Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, Postgres> for Region {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <String as Decode<'r, Postgres>>::decode(value)?;

        Ok(Self::parse(&raw)?)
    }
}
