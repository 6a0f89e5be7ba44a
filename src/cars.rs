//! Car sizes

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Error returned when a car size tag is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown car size tag: {0}")]
pub struct UnknownCarSize(pub String);

/// Vehicle size categories used to key size-dependent pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarSize {
    /// Small car
    Small,

    /// Medium car
    Medium,

    /// Big car / SUV
    Big,

    /// Long GMC
    LongGmc,

    /// Microbus
    Microbus,

    /// Long coaster bus
    LongCoaster,
}

impl CarSize {
    /// Every car size, smallest first.
    pub const ALL: [CarSize; 6] = [
        CarSize::Small,
        CarSize::Medium,
        CarSize::Big,
        CarSize::LongGmc,
        CarSize::Microbus,
        CarSize::LongCoaster,
    ];

    /// The kebab-case tag for this size.
    pub fn tag(self) -> &'static str {
        match self {
            CarSize::Small => "small",
            CarSize::Medium => "medium",
            CarSize::Big => "big",
            CarSize::LongGmc => "long-gmc",
            CarSize::Microbus => "microbus",
            CarSize::LongCoaster => "long-coaster",
        }
    }
}

impl fmt::Display for CarSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CarSize {
    type Err = UnknownCarSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarSize::ALL
            .into_iter()
            .find(|size| size.tag() == s.trim())
            .ok_or_else(|| UnknownCarSize(s.to_string()))
    }
}

/// Key into a service type's price table.
///
/// Flat-priced services use [`PriceKey::Default`]; size-priced services use one
/// entry per supported [`CarSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceKey {
    /// The single price of a service that does not depend on car size.
    Default,

    /// The price for a specific car size.
    Size(CarSize),
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceKey::Default => f.write_str("default"),
            PriceKey::Size(size) => size.fmt(f),
        }
    }
}

impl FromStr for PriceKey {
    type Err = UnknownCarSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "default" {
            return Ok(PriceKey::Default);
        }

        s.parse().map(PriceKey::Size)
    }
}

impl From<CarSize> for PriceKey {
    fn from(size: CarSize) -> Self {
        PriceKey::Size(size)
    }
}
