//! Schemas for the three incident endpoints.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldRule, Schema};
use crate::models::MAX_LIST_LIMIT;

/// One or more comma-separated non-negative integers.
pub static ID_LIST_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(,\d+)*$").expect("id list pattern"));

/// `YYYY-MM-DD`
pub static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern"));

/// `HH:MM:SS`
pub static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("time pattern"));

/// Query string of `GET /incidents`.
pub static LIST_QUERY: Lazy<Schema> = Lazy::new(|| {
    Schema::new("incident list query")
        .field(FieldRule::text("code").non_empty().pattern(&ID_LIST_PATTERN))
        .field(FieldRule::text("neighborhood").non_empty().pattern(&ID_LIST_PATTERN))
        .field(FieldRule::text("grid").non_empty().pattern(&ID_LIST_PATTERN))
        .field(FieldRule::integer("limit").positive().max(i64::from(MAX_LIST_LIMIT)))
        .field(FieldRule::text("start_date").non_empty().pattern(&DATE_PATTERN))
        .field(FieldRule::text("end_date").non_empty().pattern(&DATE_PATTERN))
});

/// Body of `POST /new-incident`.
pub static NEW_INCIDENT: Lazy<Schema> = Lazy::new(|| {
    Schema::new("new incident")
        .field(FieldRule::text("case_number").required().non_empty())
        .field(FieldRule::text("date").required().non_empty().pattern(&DATE_PATTERN))
        .field(FieldRule::text("time").required().non_empty().pattern(&TIME_PATTERN))
        .field(FieldRule::integer("code").required().positive())
        .field(FieldRule::text("incident").required().non_empty())
        .field(FieldRule::integer("police_grid").required().positive())
        .field(FieldRule::integer("neighborhood_number").required().positive())
        .field(FieldRule::text("block").required().non_empty())
});

/// Body of `DELETE /remove-incident`.
pub static REMOVE_INCIDENT: Lazy<Schema> = Lazy::new(|| {
    Schema::new("remove incident").field(FieldRule::text("case_number").required().non_empty())
});
