//! SDMX-ML 2.1 generic data.
//!
//! ```text
//! message:DataSet
//!   generic:Series
//!     generic:SeriesKey   generic:Value@id,@value ...
//!     generic:Attributes  generic:Value@id,@value ...
//!     generic:Obs
//!       generic:ObsDimension@value
//!       generic:ObsValue@value
//!       generic:Attributes generic:Value@id,@value ...
//! ```

use sdmx_model::{ObservationRow, Provenance, normalize_period};

use crate::error::{ExtractError, Result};
use crate::xml::{Element, GENERIC_21, MESSAGE_21, Node, SdmxReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    DataSet,
    Series,
    SeriesKey,
    SeriesAttributes,
    Obs,
    ObsAttributes,
    Other,
}

#[derive(Debug, Default)]
struct SeriesState {
    key: Vec<String>,
    attributes: Vec<String>,
}

#[derive(Debug, Default)]
struct ObsState {
    dimension: Option<String>,
    value: Option<String>,
    attributes: Vec<(String, String)>,
}

pub(crate) fn extract_generic(bytes: &[u8]) -> Result<Vec<ObservationRow>> {
    let mut reader = SdmxReader::new(bytes);
    let mut stack: Vec<Scope> = Vec::new();
    let mut provenance = Provenance::default();
    let mut series = SeriesState::default();
    let mut obs = ObsState::default();
    let mut rows = Vec::new();

    while let Some(node) = reader.next_node()? {
        match node {
            Node::Start(element) => {
                let parent = stack.last().copied();
                let scope = open(&element, parent, &mut series, &mut obs)?;
                match scope {
                    Scope::DataSet => {
                        provenance = Provenance {
                            action: element.attr("action").map(str::to_string),
                            valid_from: element.attr("validFromDate").map(str::to_string),
                        };
                    }
                    Scope::Series => series = SeriesState::default(),
                    Scope::Obs => obs = ObsState::default(),
                    _ => {}
                }
                stack.push(scope);
            }
            Node::End => {
                if stack.pop() == Some(Scope::Obs) {
                    let state = std::mem::take(&mut obs);
                    rows.push(finish_obs(&series, state, &provenance)?);
                }
            }
            Node::Text(_) => {}
        }
    }

    Ok(rows)
}

/// Classifies an opening element and records any values it carries.
fn open(
    element: &Element,
    parent: Option<Scope>,
    series: &mut SeriesState,
    obs: &mut ObsState,
) -> Result<Scope> {
    if element.is(MESSAGE_21, "DataSet") {
        return Ok(Scope::DataSet);
    }
    if element.namespace.as_deref() != Some(GENERIC_21) {
        return Ok(Scope::Other);
    }
    let scope = match (parent, element.name.as_str()) {
        (Some(Scope::DataSet), "Series") => Scope::Series,
        (Some(Scope::Series), "SeriesKey") => Scope::SeriesKey,
        (Some(Scope::Series), "Attributes") => Scope::SeriesAttributes,
        (Some(Scope::Series), "Obs") => Scope::Obs,
        (Some(Scope::Obs), "Attributes") => Scope::ObsAttributes,
        (Some(Scope::Obs), "ObsDimension") => {
            obs.dimension = Some(element.required_attr("value")?.to_string());
            Scope::Other
        }
        (Some(Scope::Obs), "ObsValue") => {
            obs.value = element.attr("value").map(str::to_string);
            Scope::Other
        }
        (Some(Scope::SeriesKey), "Value") => {
            series.key.push(element.required_attr("value")?.to_string());
            Scope::Other
        }
        (Some(Scope::SeriesAttributes), "Value") => {
            series
                .attributes
                .push(element.required_attr("value")?.to_string());
            Scope::Other
        }
        (Some(Scope::ObsAttributes), "Value") => {
            let id = element.required_attr("id")?.to_string();
            let value = element.required_attr("value")?.to_string();
            obs.attributes.push((id, value));
            Scope::Other
        }
        _ => Scope::Other,
    };
    Ok(scope)
}

fn finish_obs(series: &SeriesState, obs: ObsState, provenance: &Provenance) -> Result<ObservationRow> {
    let dimension = obs.dimension.ok_or(ExtractError::MissingElement {
        element: "Obs",
        child: "ObsDimension",
    })?;
    Ok(ObservationRow {
        series_id: series.key.join("."),
        series_attributes: series.attributes.join(","),
        time: normalize_period(&dimension)?,
        value: obs.value,
        obs_attributes: obs.attributes,
        provenance: provenance.clone(),
    })
}
