//! In-memory seating store testing utilities
//!
//! Provides fast, deterministic stand-ins for the `PostgreSQL` store:
//! - [`InMemorySeatingStore`]: Lock-protected tables and guest list
//! - [`UnavailableSeatingStore`]: Fails every call, for storage failure paths

use chrono::{DateTime, Utc};
use guestlist_core::store::{SeatingStore, StoreError, StoreFuture};
use guestlist_core::types::{GuestEntry, GuestName, GuestStatus, Page, Table, TableId};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct SeatingState {
    tables: BTreeMap<TableId, Table>,
    /// Guest entries in insertion order (the store's natural order).
    guests: Vec<GuestEntry>,
    guest_inserts: usize,
}

impl SeatingState {
    fn guest(&self, name: &GuestName) -> Option<&GuestEntry> {
        self.guests.iter().find(|entry| &entry.name == name)
    }
}

fn paginate(entries: impl Iterator<Item = GuestEntry>, page: Page) -> Vec<GuestEntry> {
    entries
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

/// In-memory seating store for fast, deterministic testing.
///
/// Every write holds a single write lock, so the conditional insert and the
/// guarded arrival update are atomic just like their `PostgreSQL`
/// counterparts. Clones share the same state.
///
/// # Example
///
/// ```
/// use guestlist_testing::InMemorySeatingStore;
/// use guestlist_core::store::SeatingStore;
/// use guestlist_core::types::{Table, TableId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemorySeatingStore::new();
/// store.insert_table(Table::new(TableId::new(1), 4)).await?;
///
/// assert_eq!(store.find_table_capacity(TableId::new(1)).await?, Some(4));
/// assert_eq!(store.sum_capacity_across_tables().await?, 4);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemorySeatingStore {
    state: Arc<RwLock<SeatingState>>,
}

impl InMemorySeatingStore {
    /// Create a new empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with tables.
    #[must_use]
    pub fn with_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        let store = Self::new();
        {
            let mut state = store.write();
            for table in tables {
                state.tables.insert(table.table_id, table);
            }
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, SeatingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SeatingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every guest entry, in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<GuestEntry> {
        self.read().guests.clone()
    }

    /// Look up an entry without going through the async trait.
    #[must_use]
    pub fn entry(&self, name: &GuestName) -> Option<GuestEntry> {
        self.read().guest(name).cloned()
    }

    /// Number of guest entries currently stored.
    #[must_use]
    pub fn guest_count(&self) -> usize {
        self.read().guests.len()
    }

    /// Number of guest inserts that reached the store, successful or not.
    ///
    /// Useful for asserting that a rejected admission never issued a write.
    #[must_use]
    pub fn guest_insert_attempts(&self) -> usize {
        self.read().guest_inserts
    }

    /// Remove every table definition, leaving guest entries in place.
    ///
    /// Simulates tables dropped outside the engine.
    pub fn drop_tables(&self) {
        self.write().tables.clear();
    }

    /// Remove every table and guest entry (for test isolation).
    pub fn clear(&self) {
        *self.write() = SeatingState::default();
    }
}

impl SeatingStore for InMemorySeatingStore {
    fn insert_table(&self, table: Table) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.write();
            if state.tables.contains_key(&table.table_id) {
                return Err(StoreError::DuplicateTable(table.table_id));
            }
            state.tables.insert(table.table_id, table);
            Ok(())
        })
    }

    fn find_table_capacity(&self, table_id: TableId) -> StoreFuture<'_, Option<u32>> {
        Box::pin(async move { Ok(self.read().tables.get(&table_id).map(|t| t.capacity)) })
    }

    fn has_reservation(&self, table_id: TableId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            Ok(self.read().guests.iter().any(|entry| entry.table_id == table_id))
        })
    }

    fn insert_guest_entry(&self, entry: GuestEntry) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.write();
            state.guest_inserts += 1;

            if state.guest(&entry.name).is_some() {
                return Err(StoreError::DuplicateGuest(entry.name));
            }
            if !state.tables.contains_key(&entry.table_id) {
                return Err(StoreError::UnknownTable(entry.table_id));
            }
            if state.guests.iter().any(|e| e.table_id == entry.table_id) {
                return Err(StoreError::TableOccupied(entry.table_id));
            }

            state.guests.push(entry);
            Ok(())
        })
    }

    fn find_guest_entry(&self, name: &GuestName) -> StoreFuture<'_, Option<GuestEntry>> {
        let name = name.clone();
        Box::pin(async move { Ok(self.entry(&name)) })
    }

    fn update_arrival(
        &self,
        name: &GuestName,
        actual_party_size: u32,
        arrived_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<GuestEntry>> {
        let name = name.clone();
        Box::pin(async move {
            let mut state = self.write();
            let updated = state
                .guests
                .iter_mut()
                .find(|entry| entry.name == name && !entry.is_arrived())
                .map(|entry| {
                    entry.status = GuestStatus::Arrived {
                        actual_party_size,
                        arrived_at,
                    };
                    entry.clone()
                });
            Ok(updated)
        })
    }

    fn delete_guest_entry(&self, name: &GuestName) -> StoreFuture<'_, u64> {
        let name = name.clone();
        Box::pin(async move {
            let mut state = self.write();
            let before = state.guests.len();
            state.guests.retain(|entry| entry.name != name);
            Ok((before - state.guests.len()) as u64)
        })
    }

    fn list_guest_entries(&self, page: Page) -> StoreFuture<'_, Vec<GuestEntry>> {
        Box::pin(async move { Ok(paginate(self.read().guests.iter().cloned(), page)) })
    }

    fn list_arrived_entries(&self, page: Page) -> StoreFuture<'_, Vec<GuestEntry>> {
        Box::pin(async move {
            let state = self.read();
            let arrived = state.guests.iter().filter(|e| e.is_arrived()).cloned();
            Ok(paginate(arrived, page))
        })
    }

    fn sum_capacity_across_tables(&self) -> StoreFuture<'_, i64> {
        Box::pin(async move {
            Ok(self
                .read()
                .tables
                .values()
                .map(|table| i64::from(table.capacity))
                .sum())
        })
    }

    fn sum_occupied_seats(&self) -> StoreFuture<'_, i64> {
        Box::pin(async move {
            Ok(self
                .read()
                .guests
                .iter()
                .filter_map(GuestEntry::actual_party_size)
                .map(|actual| i64::from(actual) + 1)
                .sum())
        })
    }
}

/// Store whose every operation fails with [`StoreError::DatabaseError`].
///
/// Stands in for a lost database connection.
#[derive(Clone, Debug)]
pub struct UnavailableSeatingStore {
    message: String,
}

impl UnavailableSeatingStore {
    /// Create a store that fails with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T: Send + 'static>(&self) -> StoreFuture<'_, T> {
        let error = StoreError::DatabaseError(self.message.clone());
        Box::pin(async move { Err(error) })
    }
}

impl Default for UnavailableSeatingStore {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

impl SeatingStore for UnavailableSeatingStore {
    fn insert_table(&self, _table: Table) -> StoreFuture<'_, ()> {
        self.fail()
    }

    fn find_table_capacity(&self, _table_id: TableId) -> StoreFuture<'_, Option<u32>> {
        self.fail()
    }

    fn has_reservation(&self, _table_id: TableId) -> StoreFuture<'_, bool> {
        self.fail()
    }

    fn insert_guest_entry(&self, _entry: GuestEntry) -> StoreFuture<'_, ()> {
        self.fail()
    }

    fn find_guest_entry(&self, _name: &GuestName) -> StoreFuture<'_, Option<GuestEntry>> {
        self.fail()
    }

    fn update_arrival(
        &self,
        _name: &GuestName,
        _actual_party_size: u32,
        _arrived_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<GuestEntry>> {
        self.fail()
    }

    fn delete_guest_entry(&self, _name: &GuestName) -> StoreFuture<'_, u64> {
        self.fail()
    }

    fn list_guest_entries(&self, _page: Page) -> StoreFuture<'_, Vec<GuestEntry>> {
        self.fail()
    }

    fn list_arrived_entries(&self, _page: Page) -> StoreFuture<'_, Vec<GuestEntry>> {
        self.fail()
    }

    fn sum_capacity_across_tables(&self) -> StoreFuture<'_, i64> {
        self.fail()
    }

    fn sum_occupied_seats(&self) -> StoreFuture<'_, i64> {
        self.fail()
    }
}
