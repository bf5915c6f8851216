//! Polars DataFrame views of extracted tables.
//!
//! The designated index column always comes first; normalized times become a
//! `Date` column.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use sdmx_model::{Catalog, CodeListEntry, FlatTable, ObservationRow, ObservationTable, columns};

use crate::error::Result;

/// Days from 0001-01-01 to 1970-01-01 in the proleptic Gregorian calendar.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Builds a DataFrame from an observation table.
pub fn observations_frame(table: &ObservationTable) -> Result<DataFrame> {
    match table {
        ObservationTable::Rows(rows) => rows_frame(rows),
        ObservationTable::Flat(flat) => flat_frame(flat),
    }
}

/// Builds a DataFrame listing every data-flow of a catalog.
pub fn catalog_frame(catalog: &Catalog) -> Result<DataFrame> {
    let ids: Vec<&str> = catalog.iter().map(|e| e.id.as_str()).collect();
    let names: Vec<Option<&str>> = catalog.iter().map(|e| e.name.as_deref()).collect();
    let structures: Vec<Option<&str>> = catalog.iter().map(|e| e.structure.as_deref()).collect();
    let counts: Vec<Option<u64>> = catalog.iter().map(|e| e.series_count).collect();
    let agencies: Vec<Option<&str>> = catalog.iter().map(|e| e.agency.as_deref()).collect();

    let df = DataFrame::new(vec![
        Series::new("ID".into(), ids).into_column(),
        Series::new("NAME".into(), names).into_column(),
        Series::new("STRUCTURE".into(), structures).into_column(),
        Series::new("SERIES_COUNT".into(), counts).into_column(),
        Series::new("AGENCY".into(), agencies).into_column(),
    ])?;
    Ok(df)
}

/// Builds a DataFrame with one row per code.
pub fn code_list_frame(entries: &[CodeListEntry]) -> Result<DataFrame> {
    let text = |f: fn(&CodeListEntry) -> &str| entries.iter().map(f).collect::<Vec<_>>();
    let optional =
        |f: fn(&CodeListEntry) -> Option<&str>| entries.iter().map(f).collect::<Vec<_>>();

    let df = DataFrame::new(vec![
        Series::new("CODELIST_ID".into(), text(|e| e.codelist_id.as_str())).into_column(),
        Series::new("CODELIST_NAME".into(), optional(|e| e.codelist_name.as_deref()))
            .into_column(),
        Series::new("AGENCY".into(), optional(|e| e.agency.as_deref())).into_column(),
        Series::new("VALUE_TYPE".into(), optional(|e| e.value_type.as_deref())).into_column(),
        Series::new("CODE".into(), text(|e| e.code.as_str())).into_column(),
        Series::new("DESCRIPTION".into(), optional(|e| e.description.as_deref())).into_column(),
    ])?;
    Ok(df)
}

fn rows_frame(rows: &[ObservationRow]) -> Result<DataFrame> {
    let series_ids: Vec<&str> = rows.iter().map(|r| r.series_id.as_str()).collect();
    let series_attributes: Vec<&str> = rows.iter().map(|r| r.series_attributes.as_str()).collect();
    let times: Vec<Option<NaiveDate>> = rows.iter().map(|r| Some(r.time)).collect();
    let values: Vec<Option<&str>> = rows.iter().map(|r| r.value.as_deref()).collect();
    let obs_attributes: Vec<String> = rows.iter().map(ObservationRow::flat_obs_attributes).collect();
    let actions: Vec<Option<&str>> = rows.iter().map(|r| r.provenance.action.as_deref()).collect();
    let valid_from: Vec<Option<&str>> = rows
        .iter()
        .map(|r| r.provenance.valid_from.as_deref())
        .collect();

    let df = DataFrame::new(vec![
        Series::new(columns::SERIES_ID.into(), series_ids).into_column(),
        Series::new(columns::SERIES_ATTRIBUTES.into(), series_attributes).into_column(),
        date_column(columns::TIME_PERIOD, &times)?,
        Series::new(columns::OBS_VALUE.into(), values).into_column(),
        Series::new(columns::OBS_ATTRIBUTES.into(), obs_attributes).into_column(),
        Series::new(columns::ACTION.into(), actions).into_column(),
        Series::new(columns::VALID_FROM_DATE.into(), valid_from).into_column(),
    ])?;
    Ok(df)
}

fn flat_frame(table: &FlatTable) -> Result<DataFrame> {
    let index = table.column_position(&table.index_column);
    let order = index
        .into_iter()
        .chain((0..table.columns.len()).filter(|&position| Some(position) != index));

    let mut frame_columns = Vec::with_capacity(table.columns.len());
    for position in order {
        let name = table.columns[position].as_str();
        if Some(position) == table.time_column {
            let times: Vec<Option<NaiveDate>> = table.rows.iter().map(|row| row.time).collect();
            frame_columns.push(date_column(name, &times)?);
        } else {
            let values: Vec<&str> = table
                .rows
                .iter()
                .map(|row| row.values.get(position).map(String::as_str).unwrap_or_default())
                .collect();
            frame_columns.push(Series::new(name.into(), values).into_column());
        }
    }
    Ok(DataFrame::new(frame_columns)?)
}

fn date_column(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Column> {
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|date| date.map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
        .collect();
    Ok(Series::new(name.into(), days)
        .cast(&DataType::Date)?
        .into_column())
}
