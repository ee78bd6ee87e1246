//! `PostgreSQL` implementation of [`SeatingStore`].

use crate::config::PostgresConfig;
use chrono::{DateTime, Utc};
use guestlist_core::store::{SeatingStore, StoreError, StoreFuture};
use guestlist_core::types::{GuestEntry, GuestName, GuestStatus, Page, Table, TableId};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const SELECT_GUEST_COLUMNS: &str = "SELECT guest_name, planned_accompanying_guests, table_id, status, \
     actual_accompanying_guests, arrived_time FROM guest_list";

/// Row shape of the `guest_list` table.
#[derive(Debug, sqlx::FromRow)]
struct GuestRow {
    guest_name: String,
    planned_accompanying_guests: i32,
    table_id: i64,
    status: String,
    actual_accompanying_guests: Option<i32>,
    arrived_time: Option<DateTime<Utc>>,
}

impl TryFrom<GuestRow> for GuestEntry {
    type Error = StoreError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let status = match (
            row.status.as_str(),
            row.actual_accompanying_guests,
            row.arrived_time,
        ) {
            ("NOT_ARRIVED", _, _) => GuestStatus::NotArrived,
            ("ARRIVED", Some(actual), Some(arrived_at)) => GuestStatus::Arrived {
                actual_party_size: to_u32(actual, "actual_accompanying_guests")?,
                arrived_at,
            },
            (other, actual, at) => {
                return Err(StoreError::DatabaseError(format!(
                    "Inconsistent guest row for {}: status={other}, actual={actual:?}, arrived_time={at:?}",
                    row.guest_name
                )));
            }
        };

        Ok(Self {
            planned_party_size: to_u32(row.planned_accompanying_guests, "planned_accompanying_guests")?,
            table_id: TableId::new(row.table_id),
            name: GuestName::new(row.guest_name),
            status,
        })
    }
}

fn to_u32(value: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value)
        .map_err(|_| StoreError::DatabaseError(format!("Negative value {value} in column {column}")))
}

fn to_i32(value: u32, column: &str) -> Result<i32, StoreError> {
    i32::try_from(value)
        .map_err(|_| StoreError::DatabaseError(format!("Value {value} too large for column {column}")))
}

fn database_error(context: &str, error: &sqlx::Error) -> StoreError {
    StoreError::DatabaseError(format!("{context}: {error}"))
}

/// `PostgreSQL`-backed seating store.
///
/// Persists tables in `tables` and guest entries in `guest_list` (see
/// `migrations/`). Admission relies on the `guest_list_table_unique`
/// constraint and arrival on a `WHERE status = 'NOT_ARRIVED'` guard, so both
/// writes stay correct under concurrent requests sharing the pool.
///
/// # Example
///
/// ```no_run
/// use guestlist_postgres::{PostgresConfig, PostgresSeatingStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = PostgresSeatingStore::connect(&PostgresConfig::from_env()).await?;
/// store.migrate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PostgresSeatingStore {
    pool: PgPool,
}

impl PostgresSeatingStore {
    /// Create a store using an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a connection pool from configuration and wrap it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the connection cannot be established.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .connect(&config.url)
            .await
            .map_err(|e| database_error("Failed to connect", &e))?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL seating store"
        );

        Ok(Self::new(pool))
    }

    /// Run database migrations.
    ///
    /// Creates the `tables` and `guest_list` tables if they don't already exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Migration failed: {e}")))?;
        tracing::info!("Seating store migrations applied");
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_entries(
        &self,
        filter: &str,
        page: Page,
    ) -> Result<Vec<GuestEntry>, StoreError> {
        let query = format!(
            "{SELECT_GUEST_COLUMNS} {filter} ORDER BY created_at, guest_name LIMIT $1 OFFSET $2"
        );

        let rows: Vec<GuestRow> = sqlx::query_as(&query)
            .bind(i64::from(page.limit))
            .bind(i64::from(page.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to list guests", &e))?;

        rows.into_iter().map(GuestEntry::try_from).collect()
    }
}

impl SeatingStore for PostgresSeatingStore {
    fn insert_table(&self, table: Table) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("INSERT INTO tables (table_id, capacity) VALUES ($1, $2)")
                .bind(table.table_id.value())
                .bind(to_i32(table.capacity, "capacity")?)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.is_unique_violation() {
                            return StoreError::DuplicateTable(table.table_id);
                        }
                    }
                    database_error("Failed to insert table", &e)
                })?;

            tracing::debug!(table_id = %table.table_id, "Inserted table");
            Ok(())
        })
    }

    fn find_table_capacity(&self, table_id: TableId) -> StoreFuture<'_, Option<u32>> {
        Box::pin(async move {
            let capacity: Option<(i32,)> =
                sqlx::query_as("SELECT capacity FROM tables WHERE table_id = $1")
                    .bind(table_id.value())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| database_error("Failed to get table capacity", &e))?;

            capacity
                .map(|(capacity,)| to_u32(capacity, "capacity"))
                .transpose()
        })
    }

    fn has_reservation(&self, table_id: TableId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM guest_list WHERE table_id = $1)")
                    .bind(table_id.value())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| database_error("Failed to check table reservation", &e))?;

            Ok(exists)
        })
    }

    fn insert_guest_entry(&self, entry: GuestEntry) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let (actual, arrived_at) = match entry.status {
                GuestStatus::NotArrived => (None, None),
                GuestStatus::Arrived {
                    actual_party_size,
                    arrived_at,
                } => (
                    Some(to_i32(actual_party_size, "actual_accompanying_guests")?),
                    Some(arrived_at),
                ),
            };

            sqlx::query(
                r"
                INSERT INTO guest_list
                    (guest_name, planned_accompanying_guests, table_id, status,
                     actual_accompanying_guests, arrived_time)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(entry.name.as_str())
            .bind(to_i32(entry.planned_party_size, "planned_accompanying_guests")?)
            .bind(entry.table_id.value())
            .bind(entry.status.as_str())
            .bind(actual)
            .bind(arrived_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return match db_err.constraint() {
                            Some("guest_list_table_unique") => {
                                StoreError::TableOccupied(entry.table_id)
                            }
                            _ => StoreError::DuplicateGuest(entry.name.clone()),
                        };
                    }
                    if db_err.is_foreign_key_violation() {
                        return StoreError::UnknownTable(entry.table_id);
                    }
                }
                database_error("Failed to add guest", &e)
            })?;

            tracing::debug!(guest = %entry.name, table_id = %entry.table_id, "Inserted guest entry");
            Ok(())
        })
    }

    fn find_guest_entry(&self, name: &GuestName) -> StoreFuture<'_, Option<GuestEntry>> {
        let name = name.clone();
        Box::pin(async move {
            let query = format!("{SELECT_GUEST_COLUMNS} WHERE guest_name = $1");
            let row: Option<GuestRow> = sqlx::query_as(&query)
                .bind(name.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("Failed to get guest", &e))?;

            row.map(GuestEntry::try_from).transpose()
        })
    }

    fn update_arrival(
        &self,
        name: &GuestName,
        actual_party_size: u32,
        arrived_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<GuestEntry>> {
        let name = name.clone();
        Box::pin(async move {
            let row: Option<GuestRow> = sqlx::query_as(
                r"
                UPDATE guest_list
                SET status = 'ARRIVED',
                    actual_accompanying_guests = $2,
                    arrived_time = $3
                WHERE guest_name = $1 AND status = 'NOT_ARRIVED'
                RETURNING guest_name, planned_accompanying_guests, table_id, status,
                          actual_accompanying_guests, arrived_time
                ",
            )
            .bind(name.as_str())
            .bind(to_i32(actual_party_size, "actual_accompanying_guests")?)
            .bind(arrived_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to update guest arrival", &e))?;

            tracing::debug!(guest = %name, updated = row.is_some(), "Arrival update issued");
            row.map(GuestEntry::try_from).transpose()
        })
    }

    fn delete_guest_entry(&self, name: &GuestName) -> StoreFuture<'_, u64> {
        let name = name.clone();
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM guest_list WHERE guest_name = $1")
                .bind(name.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| database_error("Failed to delete guest", &e))?;

            tracing::debug!(guest = %name, rows = result.rows_affected(), "Deleted guest entry");
            Ok(result.rows_affected())
        })
    }

    fn list_guest_entries(&self, page: Page) -> StoreFuture<'_, Vec<GuestEntry>> {
        Box::pin(async move { self.fetch_entries("", page).await })
    }

    fn list_arrived_entries(&self, page: Page) -> StoreFuture<'_, Vec<GuestEntry>> {
        Box::pin(async move { self.fetch_entries("WHERE status = 'ARRIVED'", page).await })
    }

    fn sum_capacity_across_tables(&self) -> StoreFuture<'_, i64> {
        Box::pin(async move {
            let (total,): (i64,) =
                sqlx::query_as("SELECT COALESCE(SUM(capacity), 0)::BIGINT FROM tables")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| database_error("Failed to sum table capacity", &e))?;

            Ok(total)
        })
    }

    fn sum_occupied_seats(&self) -> StoreFuture<'_, i64> {
        Box::pin(async move {
            let (occupied,): (i64,) = sqlx::query_as(
                "SELECT COALESCE(SUM(actual_accompanying_guests + 1), 0)::BIGINT
                 FROM guest_list
                 WHERE status = 'ARRIVED'",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("Failed to sum occupied seats", &e))?;

            Ok(occupied)
        })
    }
}
