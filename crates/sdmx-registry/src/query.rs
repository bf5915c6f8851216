//! Query-string building from caller options.

use sdmx_model::QueryOptions;
use tracing::debug;
use url::form_urlencoded::byte_serialize;

use crate::config::{OptionTemplates, fill_template};

/// Builds a query string from the options the registry knows about.
///
/// Options are emitted in the caller's order and joined with `&`. Values are
/// form-encoded before they fill their template, so a value can never add a
/// parameter of its own. Names without a registered template are dropped, so
/// callers may pass options meant for other providers. Returns an empty
/// string when nothing matches.
///
/// # Example
///
/// ```
/// use sdmx_model::QueryOptions;
/// use sdmx_registry::{OptionTemplates, build_query};
///
/// let registry = OptionTemplates::new().with("start_period", "startPeriod={}");
/// let options = QueryOptions::new()
///     .with("start_period", "2020")
///     .with("bogus", "x");
/// assert_eq!(build_query(&options, &registry), "startPeriod=2020");
/// ```
pub fn build_query(options: &QueryOptions, registry: &OptionTemplates) -> String {
    options
        .iter()
        .filter_map(|(name, value)| match registry.get(name) {
            Some(template) => Some(fill_template(template, &encode_value(value))),
            None => {
                debug!(option = name, "Dropping unregistered query option");
                None
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_value(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Appends a query string to a URL, using `&` when it already has one.
pub fn with_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}
