//! Integration tests for provider configuration loading.

use std::io::Write;

use sdmx_model::QueryOptions;
use sdmx_registry::{
    CatalogDialect, CodeListDialect, DataDialect, FlowKey, Provider, ProviderConfig,
    RegistryError, RevisionKey, build_query, with_query,
};
use tempfile::NamedTempFile;

const INSEE_MIRROR: &str = r#"
provider = "insee"
help_url = "https://mirror.example.org/help"

catalog_dialect = "sdmx21"
code_list_dialect = "sdmx21"

[data_dialect]
kind = "flat_attribute"
index_column = "IDBANK"
time_column = "TIME_PERIOD"

[endpoints]
data_flow_list = "https://mirror.example.org/dataflow"
data = "https://mirror.example.org/data/{}"
code_list = "https://mirror.example.org/codelist"

[endpoints.include_history]
url = "https://mirror.example.org/data/SERIES_BDM/{}?includeHistory=true"
key = "series"

[inputs]
start_period = "startPeriod={}"
last_n_observations = "lastNObservations={}"
"#;

#[test]
fn test_load_from_toml_string() {
    let config = ProviderConfig::from_toml_str(INSEE_MIRROR).unwrap();

    assert_eq!(config.provider, Provider::Insee);
    assert_eq!(config.language, "en");
    assert_eq!(config.catalog_dialect, CatalogDialect::Sdmx21);
    assert_eq!(config.code_list_dialect, CodeListDialect::Sdmx21);
    assert_eq!(
        config.data_dialect,
        DataDialect::FlatAttribute {
            index_column: Some("IDBANK".to_string()),
            time_column: Some("TIME_PERIOD".to_string()),
        }
    );
    assert_eq!(
        config.endpoints.include_history.as_ref().map(|h| h.key),
        Some(RevisionKey::Series)
    );
    assert!(config.endpoints.flow_code_list.is_none());
    assert_eq!(config.endpoints.data_key, FlowKey::Flow);
    assert_eq!(config.inputs.len(), 2);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{INSEE_MIRROR}").unwrap();

    let config = ProviderConfig::from_path(file.path()).unwrap();
    let options = QueryOptions::new()
        .with("last_n_observations", "3")
        .with("end_period", "2020");
    let url = with_query(
        &config.data_url("CLIMAT-AFFAIRES"),
        &build_query(&options, &config.inputs),
    );

    assert_eq!(
        url,
        "https://mirror.example.org/data/CLIMAT-AFFAIRES?lastNObservations=3"
    );
}

#[test]
fn test_missing_file() {
    let result = ProviderConfig::from_path(std::path::Path::new("/nonexistent/provider.toml"));
    assert!(matches!(result, Err(RegistryError::ConfigRead { .. })));
}

#[test]
fn test_invalid_toml() {
    let result = ProviderConfig::from_toml_str("provider = \"bis\"");
    assert!(matches!(result, Err(RegistryError::ConfigParse { .. })));
}

#[test]
fn test_builtin_ecb_query() {
    let config = ProviderConfig::builtin(Provider::Ecb);
    let options = QueryOptions::new()
        .with("start_period", "2020")
        .with("bogus", "x");

    assert_eq!(build_query(&options, &config.inputs), "startPeriod=2020");
}

#[test]
fn test_builtin_imf_is_keyed_by_structure() {
    let config = ProviderConfig::builtin(Provider::Imf);
    assert_eq!(config.catalog_dialect, CatalogDialect::Dataflows20);
    assert_eq!(config.endpoints.data_key, FlowKey::Structure);
    assert_eq!(
        config.endpoints.flow_code_list.as_ref().map(|e| e.key),
        Some(FlowKey::Structure)
    );
    assert_eq!(
        config.data_url("IFS"),
        "https://dataservices.imf.org/REST/SDMX_XML.svc/CompactData/IFS"
    );
}
