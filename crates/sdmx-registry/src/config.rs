//! Provider configuration: endpoints, option templates, and wire dialects.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::error::{RegistryError, Result};
use crate::provider::Provider;

/// Placeholder substituted in endpoint and option templates.
pub const PLACEHOLDER: &str = "{}";

/// Wire format of a provider's data responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataDialect {
    /// SDMX-ML 2.1 generic data (`generic:Series`, `generic:Obs`).
    Generic,
    /// Series and observations carry their values as XML attributes.
    FlatAttribute {
        /// Natural unique key used as the index when present (`IDBANK`).
        #[serde(default)]
        index_column: Option<String>,
        /// Column holding the SDMX period to normalize (`TIME_PERIOD`).
        #[serde(default)]
        time_column: Option<String>,
    },
    /// Legacy SDMX-ML 2.0 compact data from OECD.Stat.
    Legacy {
        /// Namespace prefix of the dataset-specific `Series` elements.
        namespace: String,
    },
}

/// Format of a provider's data-flow listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogDialect {
    /// SDMX-ML 2.1 `structure:Dataflows`.
    Sdmx21,
    /// SDMX-ML 2.0 `message:KeyFamilies`.
    KeyFamilies20,
    /// SDMX-ML 2.0 `message:Dataflows`, structure taken from `KeyFamilyRef`.
    Dataflows20,
}

/// Format of a provider's code-list documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeListDialect {
    /// SDMX-ML 2.1 `structure:Codelists`.
    Sdmx21,
    /// SDMX-ML 2.0 `structure:CodeLists`.
    Sdmx20,
    /// XML Schema enumerations (`xs:simpleType`), as served by OECD.Stat.
    XmlSchema,
}

/// Which catalog field fills a flow-keyed URL template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKey {
    /// The data-flow identifier itself.
    #[default]
    Flow,
    /// The data structure definition the flow references.
    Structure,
}

/// How a revision-history request identifies its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKey {
    /// A provider-wide series identifier (INSEE `IDBANK`).
    Series,
    /// `FLOW.KEY`: the flow is validated against the catalog and the URL
    /// receives `FLOW/KEY`.
    FlowAndKey,
}

/// Per-flow code-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCodeListEndpoint {
    /// URL template with one `{}` placeholder.
    pub url: String,
    pub key: FlowKey,
}

/// Revision-history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEndpoint {
    /// URL template with one `{}` placeholder.
    pub url: String,
    pub key: RevisionKey,
}

/// Endpoints of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Data-flow listing URL.
    pub data_flow_list: String,
    /// Data URL template; `{}` receives the field chosen by `data_key`.
    pub data: String,
    #[serde(default)]
    pub data_key: FlowKey,
    /// URL of the provider's complete code-list document.
    #[serde(default)]
    pub code_list: Option<String>,
    /// Per-flow code-list endpoint.
    #[serde(default)]
    pub flow_code_list: Option<FlowCodeListEndpoint>,
    /// Revision-history endpoint.
    #[serde(default)]
    pub include_history: Option<HistoryEndpoint>,
}

/// Query option templates keyed by caller-facing option name.
///
/// Each template holds a single `{}` placeholder, e.g.
/// `start_period -> "startPeriod={}"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionTemplates(BTreeMap<String, String>);

impl OptionTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`OptionTemplates::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.0.insert(name.into(), template.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Registered option names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, template)| (name.as_str(), template.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionTemplates {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, template)| (name.into(), template.into()))
                .collect(),
        )
    }
}

/// Static description of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: Provider,
    /// Documentation page for the provider's SDMX service.
    pub help_url: String,
    /// Preferred `xml:lang` for display names.
    #[serde(default = "default_language")]
    pub language: String,
    pub endpoints: Endpoints,
    #[serde(default)]
    pub inputs: OptionTemplates,
    pub data_dialect: DataDialect,
    pub catalog_dialect: CatalogDialect,
    pub code_list_dialect: CodeListDialect,
}

fn default_language() -> String {
    "en".to_string()
}

impl ProviderConfig {
    /// Built-in configuration of a provider.
    pub fn builtin(provider: Provider) -> Self {
        match provider {
            Provider::Ecb => builtin::ecb(),
            Provider::Imf => builtin::imf(),
            Provider::Insee => builtin::insee(),
            Provider::Oecd => builtin::oecd(),
        }
    }

    /// Parses a configuration from TOML and checks its templates.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that every endpoint template carries its placeholder.
    pub fn validate(&self) -> Result<()> {
        require_placeholder("data", &self.endpoints.data)?;
        if let Some(endpoint) = &self.endpoints.flow_code_list {
            require_placeholder("flow_code_list", &endpoint.url)?;
        }
        if let Some(endpoint) = &self.endpoints.include_history {
            require_placeholder("include_history", &endpoint.url)?;
        }
        for (_, template) in self.inputs.iter() {
            require_placeholder("inputs", template)?;
        }
        Ok(())
    }

    /// Data URL for a flow, without query string.
    pub fn data_url(&self, flow: &str) -> String {
        fill_template(&self.endpoints.data, flow)
    }
}

/// Substitutes the first `{}` in `template` with `value`.
pub fn fill_template(template: &str, value: &str) -> String {
    template.replacen(PLACEHOLDER, value, 1)
}

fn require_placeholder(field: &'static str, template: &str) -> Result<()> {
    if template.contains(PLACEHOLDER) {
        Ok(())
    } else {
        Err(RegistryError::MissingPlaceholder {
            field,
            template: template.to_string(),
        })
    }
}
