//! Seating store trait and related types.
//!
//! This module defines the persistence collaborator the engine depends on:
//! table definitions (capacity) and guest list entries (reservation plus
//! arrival state). The engine only ever talks to this trait; it never reaches
//! for a connection of its own.
//!
//! # Implementations
//!
//! - `PostgresSeatingStore` (in `guestlist-postgres` crate): Production implementation
//! - `InMemorySeatingStore` (in `guestlist-testing` crate): Fast, deterministic testing
//!
//! # Atomic writes
//!
//! [`SeatingStore::insert_guest_entry`] and [`SeatingStore::update_arrival`] are
//! conditional writes. The engine still performs its read-side checks first to
//! produce precise errors, but the store re-validates inside the write so that
//! two concurrent admissions for one table cannot both succeed, and a guest
//! cannot be marked as arrived twice.

use crate::types::{GuestEntry, GuestName, Page, Table, TableId};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors that can occur during store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A table with this id already exists.
    #[error("Table {0} already exists")]
    DuplicateTable(TableId),

    /// The table already carries a reservation.
    ///
    /// Raised by the conditional insert when another entry references the
    /// table, including one written concurrently after the engine's check.
    #[error("Table {0} already has a reservation")]
    TableOccupied(TableId),

    /// A guest entry with this name already exists.
    #[error("Guest already listed: {0}")]
    DuplicateGuest(GuestName),

    /// The entry references a table that does not exist.
    #[error("Unknown table: {0}")]
    UnknownTable(TableId),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Persistence for tables and guest list entries.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. One store instance (and its
/// connection pool) is shared by every concurrent engine call, and the
/// engine adds no locking of its own.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so the engine can hold it as `Arc<dyn SeatingStore>`.
pub trait SeatingStore: Send + Sync {
    /// Persist a new table definition.
    ///
    /// # Errors
    ///
    /// - `DuplicateTable`: A table with this id already exists
    /// - `DatabaseError`: Database connection or query failed
    fn insert_table(&self, table: Table) -> StoreFuture<'_, ()>;

    /// Look up the capacity of a table.
    ///
    /// # Returns
    ///
    /// `None` if the table does not exist.
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn find_table_capacity(&self, table_id: TableId) -> StoreFuture<'_, Option<u32>>;

    /// Check whether any guest entry references the table.
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn has_reservation(&self, table_id: TableId) -> StoreFuture<'_, bool>;

    /// Insert a new guest entry, provided its table is still free.
    ///
    /// # Errors
    ///
    /// - `TableOccupied`: Another entry already references the table
    /// - `DuplicateGuest`: An entry with the same name exists
    /// - `UnknownTable`: The referenced table does not exist
    /// - `DatabaseError`: Database connection or query failed
    fn insert_guest_entry(&self, entry: GuestEntry) -> StoreFuture<'_, ()>;

    /// Look up a guest entry by name.
    ///
    /// # Returns
    ///
    /// `None` if no entry has this name.
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn find_guest_entry(&self, name: &GuestName) -> StoreFuture<'_, Option<GuestEntry>>;

    /// Mark a not-yet-arrived guest as arrived.
    ///
    /// Sets the status, the actual party size and the arrival time in one
    /// write. Entries that have already arrived are left untouched.
    ///
    /// # Returns
    ///
    /// The updated entry, or `None` if no entry with this name was still
    /// waiting to arrive.
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn update_arrival(
        &self,
        name: &GuestName,
        actual_party_size: u32,
        arrived_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<GuestEntry>>;

    /// Delete a guest entry regardless of its status.
    ///
    /// # Returns
    ///
    /// Number of entries removed (0 or 1).
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn delete_guest_entry(&self, name: &GuestName) -> StoreFuture<'_, u64>;

    /// List guest entries in the store's natural order.
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn list_guest_entries(&self, page: Page) -> StoreFuture<'_, Vec<GuestEntry>>;

    /// List entries whose guests have arrived, in the store's natural order.
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn list_arrived_entries(&self, page: Page) -> StoreFuture<'_, Vec<GuestEntry>>;

    /// Sum of capacity over all tables (0 when there are none).
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn sum_capacity_across_tables(&self) -> StoreFuture<'_, i64>;

    /// Sum of `actual_party_size + 1` over arrived entries (0 when there are none).
    ///
    /// # Errors
    ///
    /// - `DatabaseError`: Database connection or query failed
    fn sum_occupied_seats(&self) -> StoreFuture<'_, i64>;
}
