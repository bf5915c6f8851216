//! Attribute-bag data (SDMX 2.0 compact style, as served by INSEE and IMF).
//!
//! Every child of a `DataSet` is a series and every child of a series is an
//! observation; both carry their values as XML attributes. The column header
//! is built from the first series and observation of the document and every
//! later row is read positionally against it.

use sdmx_model::{FlatRow, FlatTable, Provenance, columns, normalize_period};
use tracing::{debug, warn};

use crate::error::{ExtractError, Result};
use crate::xml::{Node, SdmxReader};

#[derive(Debug)]
struct Header {
    columns: Vec<String>,
    /// Number of leading columns produced by the row builder itself.
    synthesized: usize,
    provenance: bool,
    time_position: Option<usize>,
}

pub(crate) fn extract_flat(
    bytes: &[u8],
    index_column: Option<&str>,
    time_column: Option<&str>,
) -> Result<FlatTable> {
    let mut reader = SdmxReader::new(bytes);
    // Depth below the current DataSet; None outside any DataSet.
    let mut depth: Option<usize> = None;
    let mut provenance = Provenance::default();
    let mut series: Vec<(String, String)> = Vec::new();
    let mut header: Option<Header> = None;
    let mut rows = Vec::new();

    while let Some(node) = reader.next_node()? {
        match node {
            Node::Start(element) => match depth {
                None if element.name == "DataSet" => {
                    provenance = Provenance {
                        action: element.attr("action").map(str::to_string),
                        valid_from: element.attr("validFromDate").map(str::to_string),
                    };
                    depth = Some(0);
                }
                None => {}
                Some(level) => {
                    match level {
                        0 => series = element.attributes,
                        1 if !element.attributes.is_empty() => {
                            let header = header.get_or_insert_with(|| {
                                build_header(
                                    &series,
                                    &element.attributes,
                                    &provenance,
                                    index_column,
                                    time_column,
                                )
                            });
                            let row = build_row(
                                header,
                                &series,
                                &element.attributes,
                                &provenance,
                                rows.len(),
                            )?;
                            rows.push(row);
                        }
                        _ => {}
                    }
                    depth = Some(level + 1);
                }
            },
            Node::End => {
                depth = match depth {
                    Some(0) | None => None,
                    Some(level) => Some(level - 1),
                };
            }
            Node::Text(_) => {}
        }
    }

    let index_column = match &header {
        Some(header) if header.synthesized == 0 => index_column.unwrap_or(columns::SERIES_ID),
        _ => columns::SERIES_ID,
    };
    let (columns, time_column) = match header {
        Some(header) => (header.columns, header.time_position),
        None => (vec![index_column.to_string()], None),
    };
    debug!(rows = rows.len(), columns = columns.len(), "Extracted flat table");

    Ok(FlatTable {
        columns,
        index_column: index_column.to_string(),
        time_column,
        rows,
    })
}

fn build_header(
    series: &[(String, String)],
    obs: &[(String, String)],
    provenance: &Provenance,
    index_column: Option<&str>,
    time_column: Option<&str>,
) -> Header {
    let has_index = index_column.is_some_and(|name| series.iter().any(|(key, _)| key == name));
    if let (Some(name), false) = (index_column, has_index) {
        warn!(
            column = name,
            "Index column absent from series attributes; synthesizing SERIES_ID"
        );
    }

    let mut columns = Vec::with_capacity(series.len() + obs.len() + 3);
    let synthesized = if has_index {
        0
    } else {
        columns.push(columns::SERIES_ID.to_string());
        1
    };
    columns.extend(series.iter().map(|(key, _)| key.clone()));
    columns.extend(obs.iter().map(|(key, _)| key.clone()));
    let with_provenance = !provenance.is_empty();
    if with_provenance {
        columns.push(columns::ACTION.to_string());
        columns.push(columns::VALID_FROM_DATE.to_string());
    }

    let time_position = time_column.and_then(|name| columns.iter().position(|c| c == name));
    Header {
        columns,
        synthesized,
        provenance: with_provenance,
        time_position,
    }
}

fn build_row(
    header: &Header,
    series: &[(String, String)],
    obs: &[(String, String)],
    provenance: &Provenance,
    row: usize,
) -> Result<FlatRow> {
    let provenance_width = if header.provenance { 2 } else { 0 };
    let expected = header.columns.len() - header.synthesized - provenance_width;
    let found = series.len() + obs.len();
    if found != expected {
        return Err(ExtractError::RowWidth {
            row,
            expected,
            found,
        });
    }

    let mut values = Vec::with_capacity(header.columns.len());
    if header.synthesized > 0 {
        let key: Vec<&str> = series.iter().map(|(_, value)| value.as_str()).collect();
        values.push(key.join("."));
    }
    values.extend(series.iter().map(|(_, value)| value.clone()));
    values.extend(obs.iter().map(|(_, value)| value.clone()));
    if header.provenance {
        values.push(provenance.action.clone().unwrap_or_default());
        values.push(provenance.valid_from.clone().unwrap_or_default());
    }

    let time = match header.time_position.and_then(|position| values.get(position)) {
        Some(period) => Some(normalize_period(period)?),
        None => None,
    };
    Ok(FlatRow { values, time })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const INSEE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<message:StructureSpecificData xmlns:message="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message">
  <message:DataSet action="Replace" validFromDate="2021-01-15T12:00:00">
    <Series IDBANK="001565530" FREQ="M" TITLE_FR="Climat des affaires">
      <Obs TIME_PERIOD="2020-02" OBS_VALUE="104.8" OBS_STATUS="A"/>
      <Obs TIME_PERIOD="2020-01" OBS_VALUE="105.2" OBS_STATUS="A"/>
      <Obs/>
    </Series>
    <Series IDBANK="001565531" FREQ="Q" TITLE_FR="Autre">
      <Obs TIME_PERIOD="2019-Q4" OBS_VALUE="99.1" OBS_STATUS="P"/>
    </Series>
  </message:DataSet>
</message:StructureSpecificData>"#;

    #[test]
    fn test_insee_series_with_idbank_index() {
        let table = extract_flat(INSEE.as_bytes(), Some("IDBANK"), Some("TIME_PERIOD")).unwrap();

        assert_eq!(table.index_column, "IDBANK");
        assert_eq!(
            table.columns,
            vec![
                "IDBANK",
                "FREQ",
                "TITLE_FR",
                "TIME_PERIOD",
                "OBS_VALUE",
                "OBS_STATUS",
                "ACTION",
                "VALID_FROM_DATE",
            ]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.index_values(), vec!["001565530", "001565530", "001565531"]);
        assert_eq!(table.value(0, "OBS_VALUE"), Some("104.8"));
        assert_eq!(table.value(2, "ACTION"), Some("Replace"));
        assert_eq!(table.time_column, Some(3));
        assert_eq!(table.rows[0].time, NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(table.rows[2].time, NaiveDate::from_ymd_opt(2019, 12, 31));
    }

    #[test]
    fn test_missing_index_synthesizes_series_id() {
        let xml = r#"<CompactData><DataSet>
  <Series FREQ="A" REF_AREA="FR" INDICATOR="NGDP"><Obs TIME_PERIOD="2019" OBS_VALUE="2.4"/></Series>
</DataSet></CompactData>"#;
        let table = extract_flat(xml.as_bytes(), None, Some("TIME_PERIOD")).unwrap();

        assert_eq!(table.index_column, "SERIES_ID");
        assert_eq!(table.columns[0], "SERIES_ID");
        assert_eq!(table.value(0, "SERIES_ID"), Some("A.FR.NGDP"));
        assert_eq!(table.rows[0].time, NaiveDate::from_ymd_opt(2019, 12, 31));
        assert!(table.column_position("ACTION").is_none());
    }

    #[test]
    fn test_row_width_mismatch_is_an_error() {
        let xml = r#"<CompactData><DataSet>
  <Series FREQ="A"><Obs TIME_PERIOD="2019" OBS_VALUE="1"/></Series>
  <Series FREQ="A" EXTRA="x"><Obs TIME_PERIOD="2019" OBS_VALUE="1"/></Series>
</DataSet></CompactData>"#;
        let err = extract_flat(xml.as_bytes(), None, None).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::RowWidth {
                row: 1,
                expected: 3,
                found: 4
            }
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let xml = r#"<CompactData><DataSet/></CompactData>"#;
        let table = extract_flat(xml.as_bytes(), Some("IDBANK"), Some("TIME_PERIOD")).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.columns, vec!["SERIES_ID"]);
    }
}
