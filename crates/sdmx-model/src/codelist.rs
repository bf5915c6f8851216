//! Code-list rows.

/// One code of one code list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeListEntry {
    /// Code-list identifier (`CL_FREQ`).
    pub codelist_id: String,
    /// Code-list display name.
    pub codelist_name: Option<String>,
    /// Maintenance agency.
    pub agency: Option<String>,
    /// Base type of the enumeration, for schema-described code lists.
    pub value_type: Option<String>,
    /// The code itself (`M`).
    pub code: String,
    /// Code description (`Monthly`).
    pub description: Option<String>,
}

/// Which code lists to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeListScope {
    /// Every code list the provider maintains.
    All,
    /// Code lists referenced by one data-flow.
    Flow(String),
}
