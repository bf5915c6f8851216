//! Provider clients for the SDMX query toolkit.
//!
//! A [`SourceClient`] composes a provider configuration, a [`Transport`] and
//! the parsers from `sdmx-ingest`. The catalog is fetched once at
//! construction; data, code-list and revision requests validate their
//! identifiers against it before touching the network.
//!
//! ```no_run
//! use sdmx_client::SourceClient;
//! use sdmx_model::QueryOptions;
//! use sdmx_registry::Provider;
//!
//! let client = SourceClient::new(Provider::Ecb)?;
//! let options = QueryOptions::new().with("start_period", "2020");
//! let table = client.fetch_data("EXR", &options)?;
//! println!("{} observations", table.len());
//! # Ok::<(), sdmx_client::ClientError>(())
//! ```

mod client;
mod error;
mod transport;

// === Error Types ===
pub use error::{ClientError, Result, TransportError};

// === Clients ===
pub use client::SourceClient;

// === Transport ===
pub use transport::{DEFAULT_TIMEOUT, HttpConfig, HttpTransport, Transport};
