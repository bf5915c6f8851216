//! Provider registry for the SDMX query toolkit.
//!
//! Holds the static, per-provider knowledge the clients need: endpoint URLs,
//! the query options each service accepts, and which XML dialect each
//! endpoint speaks. Configurations are immutable values built once per
//! client, either from the built-in table or from a TOML file.
//!
//! # Example
//!
//! ```
//! use sdmx_model::QueryOptions;
//! use sdmx_registry::{Provider, ProviderConfig, build_query, with_query};
//!
//! let config = ProviderConfig::builtin(Provider::Ecb);
//! let options = QueryOptions::new().with("start_period", "2020");
//! let url = with_query(&config.data_url("EXR"), &build_query(&options, &config.inputs));
//! assert_eq!(url, "https://data-api.ecb.europa.eu/service/data/EXR?startPeriod=2020");
//! ```

mod builtin;
mod config;
mod error;
mod provider;
mod query;

// === Error Types ===
pub use error::{RegistryError, Result};

// === Providers and Configuration ===
pub use config::{
    CatalogDialect, CodeListDialect, DataDialect, Endpoints, FlowCodeListEndpoint, FlowKey,
    HistoryEndpoint, OptionTemplates, PLACEHOLDER, ProviderConfig, RevisionKey, fill_template,
};
pub use provider::Provider;

// === Query Building ===
pub use query::{build_query, with_query};
