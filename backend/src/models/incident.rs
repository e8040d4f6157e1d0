//! Incident record shapes.
//!
//! The store keeps `date_time` as `YYYY/MM/DD HH:MM:SS`. Clients always see
//! `-` as the date separator: they send `date` and `time` separately when
//! creating an incident and read back a single `YYYY-MM-DD HH:MM:SS` string.

use serde::{Deserialize, Serialize};

/// Separator used for dates inside the store.
pub const STORED_DATE_SEPARATOR: char = '/';

/// Separator used for dates at the API boundary.
pub const DISPLAY_DATE_SEPARATOR: char = '-';

/// Default and maximum number of rows returned by a listing.
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Convert an API date (`YYYY-MM-DD`) into the stored form (`YYYY/MM/DD`).
pub fn to_stored_date(date: &str) -> String {
    date.replace(DISPLAY_DATE_SEPARATOR, &STORED_DATE_SEPARATOR.to_string())
}

/// Convert a stored timestamp (`YYYY/MM/DD HH:MM:SS`) into the API form.
pub fn to_display_date_time(date_time: &str) -> String {
    date_time.replace(STORED_DATE_SEPARATOR, &DISPLAY_DATE_SEPARATOR.to_string())
}

/// Compose the stored `date_time` value from an API date and time.
pub fn compose_stored_date_time(date: &str, time: &str) -> String {
    format!("{} {}", to_stored_date(date), time)
}

/// A single crime incident as stored and listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub case_number: String,
    pub date_time: String,
    pub code: i64,
    pub incident: String,
    pub police_grid: i64,
    pub neighborhood_number: i64,
    pub block: String,
}

impl Incident {
    /// Return this incident with `date_time` rendered for clients.
    pub fn into_display(mut self) -> Self {
        self.date_time = to_display_date_time(&self.date_time);
        self
    }
}

/// Validated body of `POST /new-incident`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncident {
    pub case_number: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    pub code: i64,
    pub incident: String,
    pub police_grid: i64,
    pub neighborhood_number: i64,
    pub block: String,
}

impl NewIncident {
    /// The `date_time` value this incident is stored with.
    pub fn stored_date_time(&self) -> String {
        compose_stored_date_time(&self.date, &self.time)
    }
}

/// Validated body of `DELETE /remove-incident`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveIncident {
    pub case_number: String,
}

/// Validated query string of `GET /incidents`.
///
/// The list filters keep the raw comma-separated text; splitting happens when
/// the statement is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub grid: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ListQuery {
    /// Row limit to apply, falling back to [`MAX_LIST_LIMIT`].
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(MAX_LIST_LIMIT)
    }
}
