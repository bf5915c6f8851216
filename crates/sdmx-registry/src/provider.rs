//! Statistical agencies with a built-in configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// A statistical agency publishing SDMX-ML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// European Central Bank.
    Ecb,
    /// International Monetary Fund.
    Imf,
    /// French National Institute of Statistics and Economic Studies.
    Insee,
    /// Organisation for Economic Co-operation and Development (legacy OECD.Stat).
    Oecd,
}

impl Provider {
    /// Every provider, in display order.
    pub const ALL: [Provider; 4] = [Self::Ecb, Self::Imf, Self::Insee, Self::Oecd];

    /// Short agency code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Ecb => "ECB",
            Self::Imf => "IMF",
            Self::Insee => "INSEE",
            Self::Oecd => "OECD",
        }
    }

    /// Full agency name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ecb => "European Central Bank",
            Self::Imf => "International Monetary Fund",
            Self::Insee => "Institut national de la statistique et des études économiques",
            Self::Oecd => "Organisation for Economic Co-operation and Development",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Provider {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RegistryError::UnknownProvider(s.to_string()))
    }
}
