//! SQL assembly for the incident listing.
//!
//! Filters are accumulated as [`FilterClause`] values, each a SQL fragment
//! with `?` placeholders plus the values bound to them, and folded into a
//! single [`SelectStatement`]. Only column names defined in this module are
//! ever written into SQL text; request values always travel as parameters.

use crate::models::{to_stored_date, ListQuery};

/// Table holding the incident rows.
pub const INCIDENTS_TABLE: &str = "Incidents";

/// Column used for ordering and date range filters.
pub const DATE_TIME_COLUMN: &str = "date_time";

/// A boolean SQL fragment and its bound values, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterClause {
    pub sql: String,
    pub params: Vec<String>,
}

impl FilterClause {
    /// `column IN (?, ?, ...)` with one placeholder per comma-separated value.
    ///
    /// An absent or empty `raw` value yields an empty clause. Values are not
    /// trimmed, de-duplicated, or converted; the store compares them with its
    /// own type affinity.
    pub fn in_list(column: &str, raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Self::default(),
        };

        let params: Vec<String> = raw.split(',').map(str::to_string).collect();
        let placeholders = vec!["?"; params.len()].join(", ");
        Self {
            sql: format!("{} IN ({})", column, placeholders),
            params,
        }
    }

    /// `column <op> ?` bound to a single value.
    pub fn compare(column: &str, operator: &str, value: impl Into<String>) -> Self {
        Self {
            sql: format!("{} {} ?", column, operator),
            params: vec![value.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// A complete parameterized statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub sql: String,
    pub params: Vec<String>,
}

/// Collect the filter clauses a listing query asks for, in a fixed order:
/// code, neighborhood, grid, start date, end date.
pub fn list_filters(query: &ListQuery) -> Vec<FilterClause> {
    let mut clauses = vec![
        FilterClause::in_list("code", query.code.as_deref()),
        FilterClause::in_list("neighborhood_number", query.neighborhood.as_deref()),
        FilterClause::in_list("police_grid", query.grid.as_deref()),
    ];

    if let Some(start) = &query.start_date {
        clauses.push(FilterClause::compare(DATE_TIME_COLUMN, ">=", to_stored_date(start)));
    }
    if let Some(end) = &query.end_date {
        clauses.push(FilterClause::compare(DATE_TIME_COLUMN, "<=", to_stored_date(end)));
    }

    clauses.retain(|clause| !clause.is_empty());
    clauses
}

/// Build the `SELECT` for a listing query, newest incidents first.
pub fn build_list_statement(query: &ListQuery) -> SelectStatement {
    let clauses = list_filters(query);

    let mut sql = format!("SELECT * FROM {}", INCIDENTS_TABLE);
    if !clauses.is_empty() {
        let conditions: Vec<&str> = clauses.iter().map(|clause| clause.sql.as_str()).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    // The limit is a validated integer, not request text.
    sql.push_str(&format!(
        " ORDER BY {} DESC LIMIT {}",
        DATE_TIME_COLUMN,
        query.effective_limit()
    ));

    let params = clauses.into_iter().flat_map(|clause| clause.params).collect();
    SelectStatement { sql, params }
}
