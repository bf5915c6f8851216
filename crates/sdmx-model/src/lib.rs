//! Data model for the SDMX query toolkit.
//!
//! This crate provides:
//!
//! - **Period normalization**: SDMX period strings to calendar dates ([`period`])
//! - **Catalogs**: data-flow listings with case-insensitive lookup ([`catalog`])
//! - **Observation tables**: the uniform output of every extractor ([`observation`])
//! - **Code lists** and **query options**
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sdmx_model::normalize_period;
//!
//! let date = normalize_period("2020-Q3")?;
//! assert_eq!(date, NaiveDate::from_ymd_opt(2020, 9, 30).unwrap());
//! # Ok::<(), sdmx_model::PeriodError>(())
//! ```

pub mod catalog;
pub mod codelist;
pub mod error;
pub mod observation;
pub mod period;
pub mod query;

// === Error Types ===
pub use error::{PeriodError, PeriodResult, ValidationError};

// === Period Normalization ===
pub use period::{PeriodKind, classify as classify_period, normalize as normalize_period};

// === Catalog ===
pub use catalog::{Catalog, CatalogEntry};

// === Observations ===
pub use observation::{FlatRow, FlatTable, ObservationRow, ObservationTable, Provenance, columns};

// === Code Lists and Queries ===
pub use codelist::{CodeListEntry, CodeListScope};
pub use query::QueryOptions;
