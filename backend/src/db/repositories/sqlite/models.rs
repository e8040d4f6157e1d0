use diesel::prelude::*;

use super::schema::incidents;
use crate::models::{Incident, NewIncident};

#[derive(Debug, Clone, QueryableByName)]
#[diesel(table_name = incidents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncidentRow {
    pub case_number: String,
    pub date_time: String,
    pub code: i64,
    pub incident: String,
    pub police_grid: i64,
    pub neighborhood_number: i64,
    pub block: String,
}

impl From<IncidentRow> for Incident {
    fn from(row: IncidentRow) -> Self {
        Self {
            case_number: row.case_number,
            date_time: row.date_time,
            code: row.code,
            incident: row.incident,
            police_grid: row.police_grid,
            neighborhood_number: row.neighborhood_number,
            block: row.block,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = incidents)]
pub struct NewIncidentRow {
    pub case_number: String,
    pub date_time: String,
    pub code: i64,
    pub incident: String,
    pub police_grid: i64,
    pub neighborhood_number: i64,
    pub block: String,
}

impl From<&NewIncident> for NewIncidentRow {
    fn from(incident: &NewIncident) -> Self {
        Self {
            case_number: incident.case_number.clone(),
            date_time: incident.stored_date_time(),
            code: incident.code,
            incident: incident.incident.clone(),
            police_grid: incident.police_grid,
            neighborhood_number: incident.neighborhood_number,
            block: incident.block.clone(),
        }
    }
}
