//! Error types shared by the SDMX data model.

use thiserror::Error;

/// Errors raised while normalizing an SDMX time period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PeriodError {
    /// Year part is missing or not numeric.
    #[error("invalid year in period '{period}'")]
    InvalidYear { period: String },

    /// Second segment is neither a semester/quarter, a week, nor a month.
    #[error("unrecognized period suffix '{suffix}' in '{period}'")]
    UnknownSuffix { period: String, suffix: String },

    /// Week number that does not exist in the given ISO year.
    #[error("week {week} does not exist in ISO year {year} (period '{period}')")]
    InvalidWeek {
        period: String,
        year: i32,
        week: u32,
    },

    /// Full date that does not name a calendar day.
    #[error("invalid date '{period}'")]
    InvalidDate { period: String },
}

/// An identifier that is not part of a provider's catalog.
///
/// Carries every legal identifier so callers can correct the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown identifier '{identifier}'; available identifiers: {}", available.join(", "))]
pub struct ValidationError {
    /// The identifier as supplied by the caller.
    pub identifier: String,
    /// All identifiers present in the catalog, in catalog order.
    pub available: Vec<String>,
}

/// Result type for period normalization.
pub type PeriodResult<T> = std::result::Result<T, PeriodError>;
