//! SQLite repository implementation using Diesel.
//!
//! Statements run on pooled `SqliteConnection`s inside
//! `tokio::task::spawn_blocking`, so the async side only waits at store I/O.

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteConnection};
use log::{debug, info};
use tokio::task;

use crate::db::query::build_list_statement;
use crate::db::repository::{IncidentRepository, RepositoryError, RepositoryResult};
use crate::models::{Incident, ListQuery, NewIncident};

mod models;
mod schema;

use models::{IncidentRow, NewIncidentRow};
use schema::incidents;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Path that opens a private in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

const CREATE_INCIDENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS Incidents (
    case_number TEXT PRIMARY KEY,
    date_time TEXT NOT NULL,
    code INTEGER NOT NULL,
    incident TEXT NOT NULL,
    police_grid INTEGER NOT NULL,
    neighborhood_number INTEGER NOT NULL,
    block TEXT NOT NULL
);";

/// Configuration for opening the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:`
    pub database_path: String,
    /// Maximum pooled connections (forced to 1 for `:memory:`)
    pub max_pool_size: u32,
    /// How long a connection waits on a locked database
    pub busy_timeout_ms: u64,
    /// Issue `CREATE TABLE IF NOT EXISTS Incidents` on open
    pub create_table: bool,
}

impl SqliteConfig {
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            max_pool_size: 4,
            busy_timeout_ms: 5000,
            create_table: true,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_DATABASE)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == MEMORY_DATABASE
    }
}

/// Per-connection pragmas applied when the pool hands out a new connection.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Diesel-backed repository for SQLite.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open the pool and make sure the `Incidents` table exists.
    ///
    /// This blocks while the pool establishes its connections.
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_path.clone());
        let builder = Pool::builder().connection_customizer(Box::new(ConnectionOptions {
            busy_timeout_ms: config.busy_timeout_ms,
        }));

        // Each in-memory connection is its own database, so keep exactly one
        // alive for the lifetime of the pool.
        let builder = if config.is_in_memory() {
            builder
                .max_size(1)
                .min_idle(Some(1))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            builder.max_size(config.max_pool_size.max(1))
        };

        let pool = builder.build(manager).map_err(|e| {
            RepositoryError::connection(format!(
                "Failed to open {}: {}",
                config.database_path, e
            ))
        })?;

        if config.create_table {
            let mut conn = pool.get()?;
            conn.batch_execute(CREATE_INCIDENTS_TABLE)?;
        }

        info!(
            "Opened SQLite incident store at {} (pool size {})",
            config.database_path,
            pool.max_size()
        );

        Ok(Self { pool })
    }

    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| RepositoryError::internal(e.to_string()))?
    }
}

#[async_trait]
impl IncidentRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn list_incidents(&self, query: &ListQuery) -> RepositoryResult<Vec<Incident>> {
        let statement = build_list_statement(query);
        debug!("list_incidents: {} {:?}", statement.sql, statement.params);

        self.with_conn(move |conn| {
            let mut select = sql_query(statement.sql).into_boxed::<Sqlite>();
            for param in statement.params {
                select = select.bind::<Text, _>(param);
            }
            let rows: Vec<IncidentRow> = select.load(conn)?;
            Ok(rows.into_iter().map(Incident::from).collect())
        })
        .await
        .map_err(|e| e.with_operation("list_incidents"))
    }

    async fn insert_incident(&self, incident: &NewIncident) -> RepositoryResult<()> {
        let row = NewIncidentRow::from(incident);

        self.with_conn(move |conn| {
            diesel::insert_into(incidents::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| e.with_operation("insert_incident"))
    }

    async fn delete_incident(&self, case_number: &str) -> RepositoryResult<usize> {
        let case_number = case_number.to_string();

        self.with_conn(move |conn| {
            let removed = diesel::delete(
                incidents::table.filter(incidents::case_number.eq(case_number.as_str())),
            )
            .execute(conn)?;
            Ok(removed)
        })
        .await
        .map_err(|e| e.with_operation("delete_incident"))
    }

    async fn count_incidents(&self) -> RepositoryResult<i64> {
        self.with_conn(|conn| Ok(incidents::table.count().get_result::<i64>(conn)?))
            .await
    }
}
