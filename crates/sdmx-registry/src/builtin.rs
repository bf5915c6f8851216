//! Built-in provider definitions.

use crate::config::{
    CatalogDialect, CodeListDialect, DataDialect, Endpoints, FlowCodeListEndpoint, FlowKey,
    HistoryEndpoint, OptionTemplates, ProviderConfig, RevisionKey,
};
use crate::provider::Provider;

const ECB_SERVICE: &str = "https://data-api.ecb.europa.eu/service/";
const IMF_SERVICE: &str = "https://dataservices.imf.org/REST/SDMX_XML.svc/";
const INSEE_SERVICE: &str = "https://bdm.insee.fr/series/sdmx/";
const OECD_SERVICE: &str = "https://stats.oecd.org/restsdmx/sdmx.ashx/";

/// SDMX 2.1 REST query parameters shared by ECB and INSEE.
fn sdmx21_inputs() -> OptionTemplates {
    OptionTemplates::new()
        .with("start_period", "startPeriod={}")
        .with("end_period", "endPeriod={}")
        .with("first_n_observations", "firstNObservations={}")
        .with("last_n_observations", "lastNObservations={}")
        .with("updated_after", "updatedAfter={}")
        .with("detail", "detail={}")
        .with("include_history", "includeHistory={}")
}

pub(crate) fn ecb() -> ProviderConfig {
    ProviderConfig {
        provider: Provider::Ecb,
        help_url: "https://data.ecb.europa.eu/help/api/overview".to_string(),
        language: "en".to_string(),
        endpoints: Endpoints {
            data_flow_list: format!("{ECB_SERVICE}dataflow/ECB"),
            data: format!("{ECB_SERVICE}data/{{}}"),
            data_key: FlowKey::Flow,
            code_list: Some(format!("{ECB_SERVICE}codelist/ECB")),
            flow_code_list: Some(FlowCodeListEndpoint {
                url: format!("{ECB_SERVICE}datastructure/ECB/{{}}?references=children"),
                key: FlowKey::Structure,
            }),
            include_history: Some(HistoryEndpoint {
                url: format!("{ECB_SERVICE}data/{{}}?includeHistory=true"),
                key: RevisionKey::FlowAndKey,
            }),
        },
        inputs: sdmx21_inputs(),
        data_dialect: DataDialect::Generic,
        catalog_dialect: CatalogDialect::Sdmx21,
        code_list_dialect: CodeListDialect::Sdmx21,
    }
}

pub(crate) fn imf() -> ProviderConfig {
    ProviderConfig {
        provider: Provider::Imf,
        help_url: "https://datahelp.imf.org/knowledgebase/articles/667681".to_string(),
        language: "en".to_string(),
        endpoints: Endpoints {
            data_flow_list: format!("{IMF_SERVICE}Dataflow"),
            data: format!("{IMF_SERVICE}CompactData/{{}}"),
            data_key: FlowKey::Structure,
            code_list: None,
            flow_code_list: Some(FlowCodeListEndpoint {
                url: format!("{IMF_SERVICE}DataStructure/{{}}"),
                key: FlowKey::Structure,
            }),
            include_history: None,
        },
        inputs: OptionTemplates::new()
            .with("start_period", "startPeriod={}")
            .with("end_period", "endPeriod={}"),
        data_dialect: DataDialect::FlatAttribute {
            index_column: None,
            time_column: Some("TIME_PERIOD".to_string()),
        },
        catalog_dialect: CatalogDialect::Dataflows20,
        code_list_dialect: CodeListDialect::Sdmx20,
    }
}

pub(crate) fn insee() -> ProviderConfig {
    ProviderConfig {
        provider: Provider::Insee,
        help_url: "https://www.insee.fr/en/information/2868055".to_string(),
        language: "en".to_string(),
        endpoints: Endpoints {
            data_flow_list: format!("{INSEE_SERVICE}dataflow"),
            data: format!("{INSEE_SERVICE}data/{{}}"),
            data_key: FlowKey::Flow,
            code_list: Some(format!("{INSEE_SERVICE}codelist")),
            flow_code_list: None,
            include_history: Some(HistoryEndpoint {
                url: format!("{INSEE_SERVICE}data/SERIES_BDM/{{}}?includeHistory=true"),
                key: RevisionKey::Series,
            }),
        },
        inputs: sdmx21_inputs(),
        data_dialect: DataDialect::FlatAttribute {
            index_column: Some("IDBANK".to_string()),
            time_column: Some("TIME_PERIOD".to_string()),
        },
        catalog_dialect: CatalogDialect::Sdmx21,
        code_list_dialect: CodeListDialect::Sdmx21,
    }
}

pub(crate) fn oecd() -> ProviderConfig {
    ProviderConfig {
        provider: Provider::Oecd,
        help_url: "https://data.oecd.org/api/sdmx-ml-documentation/".to_string(),
        language: "en".to_string(),
        endpoints: Endpoints {
            data_flow_list: format!("{OECD_SERVICE}GetDataStructure/ALL"),
            data: format!("{OECD_SERVICE}GetData/{{}}"),
            data_key: FlowKey::Flow,
            code_list: None,
            flow_code_list: Some(FlowCodeListEndpoint {
                url: format!("{OECD_SERVICE}GetSchema/{{}}"),
                key: FlowKey::Flow,
            }),
            include_history: None,
        },
        inputs: OptionTemplates::new()
            .with("start_period", "startTime={}")
            .with("end_period", "endTime={}")
            .with("dimension_at_observation", "dimensionAtObservation={}"),
        data_dialect: DataDialect::Legacy {
            namespace: "http://oecd.stat.org/Data".to_string(),
        },
        catalog_dialect: CatalogDialect::KeyFamilies20,
        code_list_dialect: CodeListDialect::XmlSchema,
    }
}
