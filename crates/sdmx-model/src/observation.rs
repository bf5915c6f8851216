//! Observation tables produced by the SDMX extractors.

use chrono::NaiveDate;

/// Column names shared by every observation table.
pub mod columns {
    pub const SERIES_ID: &str = "SERIES_ID";
    pub const SERIES_ATTRIBUTES: &str = "SERIES_ATTRIBUTES";
    pub const TIME_PERIOD: &str = "TIME_PERIOD";
    pub const OBS_VALUE: &str = "OBS_VALUE";
    pub const OBS_ATTRIBUTES: &str = "OBS_ATTRIBUTES";
    pub const ACTION: &str = "ACTION";
    pub const VALID_FROM_DATE: &str = "VALID_FROM_DATE";
}

/// Dataset-level revision metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Revision action (`Replace`, `Information`, ...).
    pub action: Option<String>,
    /// Timestamp from which the dataset is valid.
    pub valid_from: Option<String>,
}

impl Provenance {
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.valid_from.is_none()
    }
}

/// One observation of one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationRow {
    /// Dimension values of the series key joined with `.`.
    pub series_id: String,
    /// Series-level attribute values joined with `,`.
    pub series_attributes: String,
    /// Normalized observation time.
    pub time: NaiveDate,
    /// Observation value as published (may be `NaN` or absent).
    pub value: Option<String>,
    /// Observation-level attributes as (id, value) pairs.
    pub obs_attributes: Vec<(String, String)>,
    /// Revision metadata of the enclosing dataset.
    pub provenance: Provenance,
}

impl ObservationRow {
    /// Observation attributes flattened to `id,value,id,value`.
    pub fn flat_obs_attributes(&self) -> String {
        self.obs_attributes
            .iter()
            .flat_map(|(id, value)| [id.as_str(), value.as_str()])
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One row of a flat attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    /// Values aligned positionally with [`FlatTable::columns`].
    pub values: Vec<String>,
    /// Normalized value of the time column, if the table has one.
    pub time: Option<NaiveDate>,
}

/// Table whose columns are the XML attributes of series and observations.
///
/// The header comes from the first series/observation pair of the document;
/// every later row is read positionally against it. Documents whose series
/// carry different attribute sets in the same count will therefore misalign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTable {
    /// Column names; the index column is always present.
    pub columns: Vec<String>,
    /// Name of the designated index column.
    pub index_column: String,
    /// Position of the normalized time column, if any.
    pub time_column: Option<usize>,
    pub rows: Vec<FlatRow>,
}

impl FlatTable {
    /// Position of a column by name.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Value of `column` in row `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let position = self.column_position(column)?;
        self.rows
            .get(row)
            .and_then(|r| r.values.get(position))
            .map(String::as_str)
    }

    /// Values of the index column, one per row.
    pub fn index_values(&self) -> Vec<&str> {
        let Some(position) = self.column_position(&self.index_column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.values.get(position).map(String::as_str))
            .collect()
    }
}

/// Result of extracting a data document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationTable {
    /// Typed rows indexed by [`columns::SERIES_ID`].
    Rows(Vec<ObservationRow>),
    /// Attribute-bag table indexed by [`FlatTable::index_column`].
    Flat(FlatTable),
}

impl ObservationTable {
    /// An empty table; the outcome of a query that matched nothing.
    pub fn empty() -> Self {
        Self::Rows(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Flat(table) => table.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the designated index column.
    pub fn index_column(&self) -> &str {
        match self {
            Self::Rows(_) => columns::SERIES_ID,
            Self::Flat(table) => &table.index_column,
        }
    }

    /// Index value of every row, in row order.
    pub fn index_values(&self) -> Vec<&str> {
        match self {
            Self::Rows(rows) => rows.iter().map(|row| row.series_id.as_str()).collect(),
            Self::Flat(table) => table.index_values(),
        }
    }

    /// Normalized observation times, in row order.
    pub fn times(&self) -> Vec<Option<NaiveDate>> {
        match self {
            Self::Rows(rows) => rows.iter().map(|row| Some(row.time)).collect(),
            Self::Flat(table) => table.rows.iter().map(|row| row.time).collect(),
        }
    }
}
