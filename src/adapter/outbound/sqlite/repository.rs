//! SQLite opportunity repository.
//!
//! Implements [`OpportunityRepository`] on a Diesel r2d2 pool. Writes run on
//! the blocking thread pool so the async runtime never waits on SQLite.

use async_trait::async_trait;
use diesel::prelude::*;
use tracing::{debug, warn};

use super::database::connection::{
    configure_sqlite_connection, create_pool, run_migrations, DbPool,
};
use super::database::model::{NewOpportunityRow, OpportunityRow};
use super::database::schema::opportunities;
use crate::domain::opportunity::Opportunity;
use crate::error::{Error, Result};
use crate::port::OpportunityRepository;

/// SQLite-backed opportunity log.
#[derive(Clone)]
pub struct SqliteOpportunityRepository {
    pool: DbPool,
}

impl SqliteOpportunityRepository {
    /// Wrap an existing pool. Migrations must already have run.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        if let Err(e) = configure_sqlite_connection(&mut conn) {
            warn!(error = %e, "Failed to configure SQLite connection");
        }
        Ok(conn)
    }

    /// Insert one row. Blocking.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub fn insert(&self, row: &NewOpportunityRow) -> Result<()> {
        let mut conn = self.connection()?;
        diesel::insert_into(opportunities::table)
            .values(row)
            .execute(&mut conn)?;
        debug!(id = %row.opportunity_id, "Recorded opportunity");
        Ok(())
    }

    /// Most recent rows first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn recent(&self, limit: i64) -> Result<Vec<OpportunityRow>> {
        let mut conn = self.connection()?;
        let rows = opportunities::table
            .order(opportunities::id.desc())
            .limit(limit)
            .select(OpportunityRow::as_select())
            .load(&mut conn)?;
        Ok(rows)
    }

    /// Total number of persisted opportunities.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub fn count(&self) -> Result<i64> {
        let mut conn = self.connection()?;
        let count = opportunities::table.count().get_result(&mut conn)?;
        Ok(count)
    }
}

#[async_trait]
impl OpportunityRepository for SqliteOpportunityRepository {
    async fn log_opportunity(&self, opportunity: &Opportunity) -> Result<()> {
        let row = NewOpportunityRow::from(opportunity);
        let repo = self.clone();
        tokio::task::spawn_blocking(move || repo.insert(&row))
            .await
            .map_err(|e| Error::Database(format!("insert task failed: {e}")))?
    }
}
