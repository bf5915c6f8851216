//! Error types for SDMX-ML parsing.

use sdmx_model::PeriodError;
use thiserror::Error;

/// Errors raised while reading an SDMX-ML document.
///
/// All of these describe a document the parser cannot interpret. A document
/// that is well formed but holds no data is not an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    // === XML Errors ===
    /// The bytes are not well-formed XML.
    #[error("malformed XML: {message}")]
    Xml { message: String },

    // === Shape Errors ===
    /// An element lacks an attribute the dialect requires.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// An element lacks a child the dialect requires.
    #[error("<{element}> has no <{child}>")]
    MissingElement {
        element: &'static str,
        child: &'static str,
    },

    /// A flat-attribute row does not match the header taken from the first series.
    #[error("row {row} has {found} values but the header has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    // === Value Errors ===
    /// An observation time is not a valid SDMX period.
    #[error(transparent)]
    Period(#[from] PeriodError),

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl ExtractError {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(err: quick_xml::Error) -> Self {
        Self::xml(err)
    }
}

impl From<polars::prelude::PolarsError> for ExtractError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
