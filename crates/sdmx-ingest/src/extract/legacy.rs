//! OECD.Stat SDMX-ML 2.0 compact data.
//!
//! Series live in a dataset-specific namespace under `http://oecd.stat.org/Data`;
//! the series key is the series' attribute values and each `Obs` carries
//! `TIME` and `OBS_VALUE`.

use sdmx_model::{ObservationRow, Provenance, normalize_period};

use crate::error::Result;
use crate::xml::{Element, Node, SdmxReader};

pub(crate) fn extract_legacy(bytes: &[u8], namespace: &str) -> Result<Vec<ObservationRow>> {
    let in_namespace = |element: &Element| {
        element
            .namespace
            .as_deref()
            .is_some_and(|uri| uri.starts_with(namespace))
    };

    let mut reader = SdmxReader::new(bytes);
    let mut depth = 0usize;
    // Depth of the open Series element and its key.
    let mut series: Option<(usize, String)> = None;
    let mut rows = Vec::new();

    while let Some(node) = reader.next_node()? {
        match node {
            Node::Start(element) => {
                depth += 1;
                if series.is_none() {
                    if element.name == "Series" && in_namespace(&element) {
                        let key: Vec<&str> =
                            element.attributes.iter().map(|(_, v)| v.as_str()).collect();
                        series = Some((depth, key.join(".")));
                    }
                } else if let Some((series_depth, series_id)) = &series
                    && depth == series_depth + 1
                    && element.name == "Obs"
                    && in_namespace(&element)
                {
                    let time = element.required_attr("TIME")?;
                    rows.push(ObservationRow {
                        series_id: series_id.clone(),
                        series_attributes: String::new(),
                        time: normalize_period(time)?,
                        value: element.attr("OBS_VALUE").map(str::to_string),
                        obs_attributes: Vec::new(),
                        provenance: Provenance::default(),
                    });
                }
            }
            Node::End => {
                if series.as_ref().is_some_and(|(d, _)| *d == depth) {
                    series = None;
                }
                depth = depth.saturating_sub(1);
            }
            Node::Text(_) => {}
        }
    }

    rows.sort_by(|a, b| a.series_id.cmp(&b.series_id));
    Ok(rows)
}
