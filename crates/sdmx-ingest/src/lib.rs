//! SDMX-ML parsing for the query toolkit.
//!
//! This crate turns raw response bytes into the model types:
//!
//! - **Observations**: generic 2.1, flat-attribute and legacy OECD data ([`extract`])
//! - **Catalogs**: 2.1 data-flow listings and 2.0 key families ([`parse_catalog`])
//! - **Code lists**: 2.1, 2.0 and XML Schema enumerations ([`parse_code_lists`])
//! - **Frames**: Polars DataFrames of each of the above
//!
//! Documents are read with a streaming, namespace-aware reader; nothing is
//! held in memory beyond the rows produced.

mod catalog;
mod codelist;
mod error;
mod extract;
mod frame;
mod xml;

// === Error Types ===
pub use error::{ExtractError, Result};

// === Parsing ===
pub use catalog::parse_catalog;
pub use codelist::parse_code_lists;
pub use extract::extract;

// === DataFrames ===
pub use frame::{catalog_frame, code_list_frame, observations_frame};
