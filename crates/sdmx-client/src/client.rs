//! Provider client composing catalog validation, query building and extraction.

use sdmx_ingest::{extract, parse_catalog, parse_code_lists};
use sdmx_model::{
    Catalog, CatalogEntry, CodeListEntry, CodeListScope, ObservationTable, QueryOptions,
};
use sdmx_registry::{
    FlowKey, Provider, ProviderConfig, RevisionKey, build_query, fill_template, with_query,
};
use tracing::{debug, info, info_span, warn};

use crate::error::{ClientError, Result};
use crate::transport::{HttpConfig, HttpTransport, Transport};

/// Client for one statistical provider.
///
/// The catalog is fetched when the client is built and is only replaced by
/// an explicit [`refresh`](Self::refresh). Every operation that names a
/// data-flow validates it against that catalog before anything else is
/// requested.
#[derive(Debug)]
pub struct SourceClient<T: Transport = HttpTransport> {
    config: ProviderConfig,
    transport: T,
    catalog: Catalog,
}

impl SourceClient<HttpTransport> {
    /// Connects to a provider with its built-in configuration over HTTP.
    pub fn new(provider: Provider) -> Result<Self> {
        let transport = HttpTransport::new(&HttpConfig::default())?;
        Self::connect(ProviderConfig::builtin(provider), transport)
    }
}

impl<T: Transport> SourceClient<T> {
    /// Builds a client and fetches the provider's catalog.
    pub fn connect(config: ProviderConfig, transport: T) -> Result<Self> {
        let span = info_span!("connect", provider = %config.provider);
        let _guard = span.enter();

        let catalog = load_catalog(&config, &transport)?;
        info!(flows = catalog.len(), "Catalog loaded");
        Ok(Self {
            config,
            transport,
            catalog,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    /// The catalog loaded at construction or by the last refresh.
    pub fn list_flows(&self) -> &Catalog {
        &self.catalog
    }

    /// Re-fetches the catalog.
    pub fn refresh(&mut self) -> Result<&Catalog> {
        let span = info_span!("refresh", provider = %self.config.provider);
        let _guard = span.enter();

        self.catalog = load_catalog(&self.config, &self.transport)?;
        Ok(&self.catalog)
    }

    /// Fetches every observation of a data-flow.
    ///
    /// Options the provider does not register are dropped from the query.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::Validation`] before any request when `flow`
    /// is not in the catalog.
    pub fn fetch_data(&self, flow: &str, options: &QueryOptions) -> Result<ObservationTable> {
        let span = info_span!("fetch_data", provider = %self.config.provider, flow);
        let _guard = span.enter();

        let entry = self.catalog.require(flow)?;
        let target = flow_target(self.config.endpoints.data_key, entry);
        let query = build_query(options, &self.config.inputs);
        let url = with_query(&self.config.data_url(target), &query);
        let bytes = self.get(&url)?;
        let table = extract(&bytes, &self.config.data_dialect)?;
        info!(rows = table.len(), "Data fetched");
        Ok(table)
    }

    /// Fetches code lists, either all of them or those of one data-flow.
    pub fn fetch_code_list(&self, scope: &CodeListScope) -> Result<Vec<CodeListEntry>> {
        let span = info_span!("fetch_code_list", provider = %self.config.provider);
        let _guard = span.enter();

        let url = match scope {
            CodeListScope::All => self
                .config
                .endpoints
                .code_list
                .clone()
                .ok_or_else(|| self.unsupported("whole code-list download"))?,
            CodeListScope::Flow(flow) => {
                let endpoint = self
                    .config
                    .endpoints
                    .flow_code_list
                    .as_ref()
                    .ok_or_else(|| self.unsupported("per-flow code lists"))?;
                let entry = self.catalog.require(flow)?;
                fill_template(&endpoint.url, flow_target(endpoint.key, entry))
            }
        };

        let bytes = self.get(&url)?;
        let entries = parse_code_lists(
            &bytes,
            self.config.code_list_dialect,
            &self.config.language,
        )?;
        info!(codes = entries.len(), "Code lists fetched");
        Ok(entries)
    }

    /// Fetches the revision history of one series.
    ///
    /// INSEE takes a series identifier (`IDBANK`); ECB takes `FLOW.KEY`,
    /// whose flow is validated against the catalog.
    pub fn fetch_revisions(&self, series_key: &str) -> Result<ObservationTable> {
        let span = info_span!("fetch_revisions", provider = %self.config.provider, series_key);
        let _guard = span.enter();

        let endpoint = self
            .config
            .endpoints
            .include_history
            .as_ref()
            .ok_or_else(|| self.unsupported("revision history"))?;
        if !is_series_token(series_key) {
            return Err(invalid_key(series_key));
        }

        let target = match endpoint.key {
            RevisionKey::Series => series_key.to_string(),
            RevisionKey::FlowAndKey => {
                let (flow, key) = series_key
                    .split_once('.')
                    .filter(|(flow, key)| !flow.is_empty() && !key.is_empty())
                    .ok_or_else(|| invalid_key(series_key))?;
                let entry = self.catalog.require(flow)?;
                format!("{}/{key}", entry.id)
            }
        };

        let bytes = self.get(&fill_template(&endpoint.url, &target))?;
        let table = extract(&bytes, &self.config.data_dialect)?;
        info!(rows = table.len(), "Revisions fetched");
        Ok(table)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "Fetching");
        Ok(self.transport.fetch(url)?)
    }

    fn unsupported(&self, operation: &'static str) -> ClientError {
        ClientError::Unsupported {
            provider: self.config.provider,
            operation,
        }
    }
}

fn load_catalog<T: Transport>(config: &ProviderConfig, transport: &T) -> Result<Catalog> {
    let url = &config.endpoints.data_flow_list;
    debug!(url = %url, "Fetching catalog");
    let bytes = transport.fetch(url)?;
    Ok(parse_catalog(
        &bytes,
        config.catalog_dialect,
        &config.language,
    )?)
}

/// Catalog field a flow-keyed template receives.
fn flow_target(key: FlowKey, entry: &CatalogEntry) -> &str {
    match (key, entry.structure.as_deref()) {
        (FlowKey::Structure, Some(structure)) => structure,
        (FlowKey::Structure, None) => {
            warn!(flow = %entry.id, "Flow has no structure reference; using its id");
            entry.id.as_str()
        }
        (FlowKey::Flow, _) => entry.id.as_str(),
    }
}

/// A non-empty token of ASCII alphanumerics and `_ . - +`.
fn is_series_token(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'+'))
}

fn invalid_key(key: &str) -> ClientError {
    ClientError::InvalidSeriesKey {
        key: key.to_string(),
    }
}
