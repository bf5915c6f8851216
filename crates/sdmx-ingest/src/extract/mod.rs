//! Observation extraction, dispatched on the provider's data dialect.

mod flat;
mod generic;
mod legacy;

use sdmx_model::ObservationTable;
use sdmx_registry::DataDialect;
use tracing::{debug, info_span};

use crate::error::Result;

/// Extracts every observation of a data document.
///
/// A document without observations yields an empty table rather than an
/// error; a query that matches nothing is a normal outcome.
///
/// # Errors
///
/// Returns [`ExtractError`](crate::ExtractError) when the bytes are not
/// well-formed XML, when an element the dialect requires is missing, or when
/// an observation time is not a valid SDMX period.
pub fn extract(bytes: &[u8], dialect: &DataDialect) -> Result<ObservationTable> {
    let span = info_span!("extract", bytes = bytes.len());
    let _guard = span.enter();

    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!("Empty document");
        return Ok(ObservationTable::empty());
    }

    let table = match dialect {
        DataDialect::Generic => ObservationTable::Rows(generic::extract_generic(bytes)?),
        DataDialect::FlatAttribute {
            index_column,
            time_column,
        } => ObservationTable::Flat(flat::extract_flat(
            bytes,
            index_column.as_deref(),
            time_column.as_deref(),
        )?),
        DataDialect::Legacy { namespace } => {
            ObservationTable::Rows(legacy::extract_legacy(bytes, namespace)?)
        }
    };
    debug!(rows = table.len(), "Extracted observations");
    Ok(table)
}
